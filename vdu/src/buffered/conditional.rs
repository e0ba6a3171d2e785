// SPDX-License-Identifier: Apache-2.0

use amplify_derive::Display;
use log::{debug, warn};
use crate::{Context, Id, Result, ResultContext};
use crate::processor::{Processor, Session};
use crate::screen::Screen;
use crate::streams::Transport;

/// Conditional command flag: offsets are 24-bit.
pub const COND_24BIT_OFFSETS: u8 = 0x10;
/// Conditional command flag: the operand is fetched from a buffer.
pub const COND_BUFFER_VALUE: u8 = 0x20;
/// Conditional command comparator mask.
pub const COND_OP_MASK: u8 = 0x0F;

/// A test applied to a source byte by the conditional call command.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
#[repr(u8)]
pub enum Comparator {
	#[display("EXISTS")]
	Exists = 0,
	#[display("NOT_EXISTS")]
	NotExists,
	#[display("==")]
	Equal,
	#[display("!=")]
	NotEqual,
	#[display("<")]
	Less,
	#[display(">")]
	Greater,
	#[display("<=")]
	LessEqual,
	#[display(">=")]
	GreaterEqual,
	#[display("&&")]
	And,
	#[display("||")]
	Or,
}

impl Comparator {
	pub fn from_code(code: u8) -> Option<Self> {
		Some(match code {
			0 => Self::Exists,
			1 => Self::NotExists,
			2 => Self::Equal,
			3 => Self::NotEqual,
			4 => Self::Less,
			5 => Self::Greater,
			6 => Self::LessEqual,
			7 => Self::GreaterEqual,
			8 => Self::And,
			9 => Self::Or,
			_ => return None
		})
	}

	/// Returns `true` if the comparator reads an operand.
	pub fn has_operand(self) -> bool { self as u8 > Self::NotExists as u8 }

	/// Tests `source` against `operand`. "Exists" means non-zero; the logical
	/// comparators treat any non-zero byte as true.
	pub fn test(self, source: u8, operand: u8) -> bool {
		match self {
			Self::Exists       => source != 0,
			Self::NotExists    => source == 0,
			Self::Equal        => source == operand,
			Self::NotEqual     => source != operand,
			Self::Less         => source < operand,
			Self::Greater      => source > operand,
			Self::LessEqual    => source <= operand,
			Self::GreaterEqual => source >= operand,
			Self::And          => source != 0 && operand != 0,
			Self::Or           => source != 0 || operand != 0
		}
	}
}

/// A decoded conditional command byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ConditionCommand {
	pub wide: bool,
	pub buffer_operand: bool,
	pub code: u8,
}

impl From<u8> for ConditionCommand {
	fn from(value: u8) -> Self {
		Self {
			wide: value & COND_24BIT_OFFSETS != 0,
			buffer_operand: value & COND_BUFFER_VALUE != 0,
			code: value & COND_OP_MASK,
		}
	}
}

impl ConditionCommand {
	/// Returns `true` if an immediate operand byte follows. Undefined comparator
	/// codes are treated as taking one.
	fn has_immediate(&self) -> bool {
		!self.buffer_operand && self.code > Comparator::NotExists as u8
	}
}

impl<T: Transport, S: Screen> Session<T, S> {
	/// `VDU 23, 0, &A0, id; 6, command, checkId; offset; [operandId; operandOffset;] [operand]`:
	/// calls buffer `id` if the byte at `offset` in buffer `checkId` passes the
	/// comparator. The call behaves exactly like the call command.
	pub(crate) fn buffer_conditional_call(&mut self, processor: &mut Processor, id: Id) -> Result {
		let command = ConditionCommand::from(self.read_byte(processor).context(Context::Conditional)?);
		let check_id = self.read_word(processor).context(Context::Conditional)?;
		let offset = self.read_offset(processor, command.wide).context(Context::Conditional)?;

		let operand_at = if command.buffer_operand {
			let id = self.read_word(processor).context(Context::Conditional)?;
			let offset = self.read_offset(processor, command.wide).context(Context::Conditional)?;
			Some((id, offset))
		} else {
			None
		};
		let immediate = if command.has_immediate() {
			self.read_byte(processor).context(Context::Conditional)?
		} else {
			0
		};

		let Some(comparator) = Comparator::from_code(command.code) else {
			warn!("conditional call: unknown comparator {}", command.code);
			return Ok(())
		};

		let source = self.store.get_byte(check_id, offset).context(Context::Conditional)?;
		let operand = match operand_at {
			Some((id, offset)) if comparator.has_operand() =>
				self.store.get_byte(id, offset).context(Context::Conditional)?,
			_ => immediate
		};

		let passed = comparator.test(source, operand);
		debug!(
			"conditional call: buffer {check_id}[{offset}] = {source} {comparator} {operand}: {passed}"
		);
		if passed {
			self.buffer_call(processor, id)
		} else {
			Ok(())
		}
	}
}
