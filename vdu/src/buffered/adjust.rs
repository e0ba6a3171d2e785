// SPDX-License-Identifier: Apache-2.0

use amplify_derive::Display;
use log::{debug, warn};
use crate::{Context, ErrorKind, Id, Result, ResultContext};
use crate::processor::{Processor, Session};
use crate::screen::Screen;
use crate::streams::Transport;

/// Adjust command flag: offsets and counts are 24-bit.
pub const ADJUST_24BIT_OFFSETS: u8 = 0x10;
/// Adjust command flag: operands are fetched from a buffer.
pub const ADJUST_BUFFER_VALUE: u8 = 0x20;
/// Adjust command flag: adjust `count` consecutive target bytes.
pub const ADJUST_MULTI_TARGET: u8 = 0x40;
/// Adjust command flag: use `count` consecutive operands.
pub const ADJUST_MULTI_OPERAND: u8 = 0x80;
/// Adjust command operation mask.
pub const ADJUST_OP_MASK: u8 = 0x0F;

/// A byte operation applied by the adjust command.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
#[repr(u8)]
pub enum AdjustOp {
	#[display("NOT")]
	Not = 0,
	#[display("NEG")]
	Neg,
	#[display("SET")]
	Set,
	#[display("ADD")]
	Add,
	#[display("ADD_CARRY")]
	AddCarry,
	#[display("AND")]
	And,
	#[display("OR")]
	Or,
	#[display("XOR")]
	Xor,
}

impl AdjustOp {
	/// Decodes an operation code, or `None` if it's out of range.
	pub fn from_code(code: u8) -> Option<Self> {
		Some(match code {
			0 => Self::Not,
			1 => Self::Neg,
			2 => Self::Set,
			3 => Self::Add,
			4 => Self::AddCarry,
			5 => Self::And,
			6 => Self::Or,
			7 => Self::Xor,
			_ => return None
		})
	}

	/// Applies the operation to a `source` byte, returning the result and the carry
	/// out. Only [`AddCarry`](Self::AddCarry) reads `carry` or produces a non-zero
	/// carry; everything else wraps.
	pub fn apply(self, source: u8, operand: u8, carry: u8) -> (u8, u8) {
		match self {
			Self::Not => (!source, 0),
			Self::Neg => (source.wrapping_neg(), 0),
			Self::Set => (operand, 0),
			Self::Add => (source.wrapping_add(operand), 0),
			Self::AddCarry => {
				let sum = source as u16 + operand as u16 + carry as u16;
				(sum as u8, (sum >> 8) as u8)
			}
			Self::And => (source & operand, 0),
			Self::Or => (source | operand, 0),
			Self::Xor => (source ^ operand, 0)
		}
	}
}

/// A decoded adjust command byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AdjustCommand {
	pub wide: bool,
	pub buffer_operand: bool,
	pub multi_target: bool,
	pub multi_operand: bool,
	pub code: u8,
}

impl From<u8> for AdjustCommand {
	fn from(value: u8) -> Self {
		Self {
			wide: value & ADJUST_24BIT_OFFSETS != 0,
			buffer_operand: value & ADJUST_BUFFER_VALUE != 0,
			multi_target: value & ADJUST_MULTI_TARGET != 0,
			multi_operand: value & ADJUST_MULTI_OPERAND != 0,
			code: value & ADJUST_OP_MASK,
		}
	}
}

impl AdjustCommand {
	/// Returns `true` if the operation takes an operand. Every code past `NEG` does,
	/// including undefined ones.
	pub fn has_operand(&self) -> bool { self.code > AdjustOp::Neg as u8 }

	/// Returns `true` if a count follows the offset.
	pub fn has_count(&self) -> bool { self.multi_target || self.multi_operand }
}

/// Where operands come from.
#[derive(Copy, Clone, Debug)]
enum Operand {
	None,
	/// Read from the command stream; the number of bytes not yet read.
	Immediate { pending: usize },
	/// Fetched from a buffer at an offset.
	Buffer { id: u16, offset: usize },
}

impl<T: Transport, S: Screen> Session<T, S> {
	/// `VDU 23, 0, &A0, id; 5, command, offset; [count;] [operandId; operandOffset;] [operands]`:
	/// applies a byte operation to the contents of buffer `id`.
	///
	/// With neither multi flag set, one target byte is adjusted by one operand. A
	/// multi-target command adjusts `count` consecutive bytes; a multi-operand command
	/// uses `count` consecutive operands, accumulating into the one target unless
	/// multi-target is also set. With add-with-carry, the carry ripples from byte to
	/// byte and the final carry is stored after the last one, at `offset + count`.
	///
	/// Any lookup failure stops the operation. Bytes already stored are kept.
	pub(crate) fn buffer_adjust(&mut self, processor: &mut Processor, id: Id) -> Result {
		let command = AdjustCommand::from(self.read_byte(processor).context(Context::Adjust)?);
		let offset = self.read_offset(processor, command.wide).context(Context::Adjust)?;
		let count = if command.has_count() {
			self.read_offset(processor, command.wide).context(Context::Adjust)?
		} else {
			1
		};

		let mut operand = match (command.has_operand(), command.buffer_operand) {
			(false, _) => Operand::None,
			(true, true) => {
				let id = self.read_word(processor).context(Context::Adjust)?;
				let offset = self.read_offset(processor, command.wide).context(Context::Adjust)?;
				Operand::Buffer { id, offset }
			}
			(true, false) => Operand::Immediate {
				pending: if command.multi_operand { count } else { 1 }
			}
		};

		let result = match AdjustOp::from_code(command.code) {
			Some(op) => self.adjust(processor, id.raw(), command, op, offset, count, &mut operand),
			None => {
				warn!("buffer adjust: unknown operation {}", command.code);
				Ok(())
			}
		};

		// Keep the stream aligned when stopping early: skip unread immediate operands.
		if let Operand::Immediate { pending: pending @ 1.. } = operand {
			if result.as_ref().is_ok() || result.as_ref().is_err_and(is_lookup_failure) {
				self.discard(processor, pending).context(Context::Adjust)?;
			}
		}
		result
	}

	#[allow(clippy::too_many_arguments)]
	fn adjust(
		&mut self,
		processor: &mut Processor,
		id: u16,
		command: AdjustCommand,
		op: AdjustOp,
		offset: usize,
		count: usize,
		operand: &mut Operand,
	) -> Result {
		debug!(
			"buffer adjust: {op} on buffer {id}, offset {offset}, count {count}, {command:?}"
		);

		let mut value = 0;
		let mut carry = 0;
		let mut single_operand = 0;

		if !command.multi_target {
			value = self.store.get_byte(id, offset).context(Context::Adjust)?;
		}
		if command.has_operand() && !command.multi_operand {
			single_operand = self.next_operand(processor, operand, 0)?;
		}

		for i in 0..count {
			if command.multi_target {
				value = self.store.get_byte(id, offset + i).context(Context::Adjust)?;
			}
			let operand = if command.multi_operand {
				self.next_operand(processor, operand, i)?
			} else {
				single_operand
			};

			(value, carry) = op.apply(value, operand, carry);

			if command.multi_target {
				self.store.set_byte(id, offset + i, value).context(Context::Adjust)?;
			}
		}

		if !command.multi_target {
			self.store.set_byte(id, offset, value).context(Context::Adjust)?;
		}
		if op == AdjustOp::AddCarry {
			self.store.set_byte(id, offset + count, carry).context(Context::Adjust)?;
		}
		Ok(())
	}

	fn next_operand(&mut self, processor: &mut Processor, operand: &mut Operand, index: usize) -> Result<u8> {
		match operand {
			Operand::None => Ok(0),
			Operand::Immediate { pending } => {
				let byte = self.read_byte(processor).context(Context::Adjust)?;
				*pending -= 1;
				Ok(byte)
			}
			Operand::Buffer { id, offset } =>
				self.store.get_byte(*id, *offset + index).context(Context::Adjust)
		}
	}
}

fn is_lookup_failure(err: &crate::Error) -> bool {
	matches!(err.kind(), ErrorKind::NotFound(_) | ErrorKind::OutOfRange(..))
}
