// SPDX-License-Identifier: Apache-2.0

//! The command decode loop.
//!
//! A [`Session`] owns everything shared between command processors: the buffer
//! store, the transport, the screen, and the options. A [`Processor`] is the state
//! of one command stream: where its bytes come from, where its responses go, and
//! which buffer (if any) it's executing. The top-level processor reads from the
//! transport and lives as long as the session; calling a buffer runs a nested
//! processor over that buffer's contents until they're exhausted.

use std::mem;
use arrayvec::ArrayVec;
use log::{debug, error, trace, warn};
use crate::{BufferStore, Context, Error, ErrorKind, Id, MultiSegmentReader, Options, Result};
use crate::protocol::*;
use crate::screen::{NullScreen, Screen};
use crate::streams::Transport;

/// Where a processor's response bytes go.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Output {
	/// The transport back to the host.
	#[default]
	Transport,
	/// The write cursor of a buffer's first, writable, segment.
	Buffer(u16),
	/// Nowhere; responses are discarded.
	None,
}

/// Where a processor's command bytes come from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) enum Input {
	#[default]
	Transport,
	Buffer(MultiSegmentReader),
}

/// The state of one command stream.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Processor {
	pub(crate) input: Input,
	pub(crate) output: Output,
	pub(crate) original_output: Output,
	pub(crate) id: Id,
	pub(crate) depth: usize,
}

impl Processor {
	/// Creates a processor executing buffer `id` through `reader`, sending
	/// responses to `output`.
	pub(crate) fn nested(id: u16, reader: MultiSegmentReader, output: Output, depth: usize) -> Self {
		Self {
			input: Input::Buffer(reader),
			output,
			original_output: output,
			id: Id::Buffer(id),
			depth,
		}
	}

	/// Returns the id of the buffer being executed, or [`Id::None`] for the
	/// top-level processor.
	pub fn id(&self) -> Id { self.id }

	/// Returns the current output.
	pub fn output(&self) -> Output { self.output }

	/// Returns the output restored by setting output to the default id.
	pub fn original_output(&self) -> Output { self.original_output }

	/// Returns the call nesting depth, `0` at the top level.
	pub fn depth(&self) -> usize { self.depth }

	/// Restarts a buffer-bound processor from its first byte.
	pub(crate) fn rewind(&mut self) {
		if let Input::Buffer(ref mut reader) = self.input {
			reader.rewind();
		}
	}
}

/// A coprocessor session: the buffer store, the host transport, and the screen
/// that rendering commands are handed to.
pub struct Session<T: Transport, S: Screen = NullScreen> {
	pub(crate) store: BufferStore,
	pub(crate) transport: T,
	pub(crate) screen: S,
	pub(crate) options: Options,
	top: Processor,
	initialised: bool,
}

impl<T: Transport> Session<T> {
	/// Creates a session with default options, discarding rendering commands.
	pub fn new(transport: T) -> Self {
		Self::with_screen(transport, NullScreen, Options::default())
	}

	/// Creates a session with `options`, discarding rendering commands.
	pub fn with_options(transport: T, options: Options) -> Self {
		Self::with_screen(transport, NullScreen, options)
	}
}

impl<T: Transport, S: Screen> Session<T, S> {
	/// Creates a session handing rendering commands to `screen`.
	pub fn with_screen(transport: T, screen: S, options: Options) -> Self {
		Self {
			store: BufferStore::with_limit(options.memory_limit()),
			transport,
			screen,
			options,
			top: Processor::default(),
			initialised: false,
		}
	}

	/// Returns the buffer store.
	pub fn store(&self) -> &BufferStore { &self.store }

	/// Returns the buffer store, mutably.
	pub fn store_mut(&mut self) -> &mut BufferStore { &mut self.store }

	/// Returns the transport.
	pub fn transport(&self) -> &T { &self.transport }

	/// Returns the transport, mutably.
	pub fn transport_mut(&mut self) -> &mut T { &mut self.transport }

	/// Returns the screen.
	pub fn screen(&self) -> &S { &self.screen }

	/// Returns the screen, mutably.
	pub fn screen_mut(&mut self) -> &mut S { &mut self.screen }

	/// Returns the session options.
	pub fn options(&self) -> &Options { &self.options }

	/// Returns the top-level processor.
	pub fn processor(&self) -> &Processor { &self.top }

	/// Returns `true` once the host has sent a general poll.
	pub fn is_initialised(&self) -> bool { self.initialised }

	/// Splits the session into its transport and screen.
	pub fn into_parts(self) -> (T, S) { (self.transport, self.screen) }

	/// Processes one top-level command, if a byte is waiting. Returns `false` if
	/// nothing was available.
	pub fn process_next(&mut self) -> bool {
		if !self.transport.available() {
			return false
		}

		match self.transport.read_byte() {
			Ok(code) => self.dispatch(code),
			Err(err) => log_abort(&err)
		}
		true
	}

	/// Processes top-level commands until the transport has no more bytes waiting.
	pub fn process_all_available(&mut self) {
		while self.process_next() { }
	}

	/// Processes top-level commands until the transport closes.
	pub fn run(&mut self) {
		while !self.transport.is_closed() {
			match self.transport.read_byte_timeout(self.options.comms_timeout()) {
				Ok(code) => self.dispatch(code),
				Err(err) if err.kind() == ErrorKind::Timeout => continue,
				Err(err) => {
					debug!("transport ended: {err}");
					break
				}
			}
		}
	}

	fn dispatch(&mut self, code: u8) {
		let mut top = mem::take(&mut self.top);
		let result = self.vdu(&mut top, code);
		self.top = top;

		if let Err(err) = result {
			log_abort(&err);
		}
		if let Err(err) = self.transport.flush() {
			debug!("flush failed: {err}");
		}
	}

	/// Runs a buffer-bound processor until its input is exhausted. Recoverable
	/// errors abort only the command that raised them.
	pub(crate) fn run_nested(&mut self, processor: &mut Processor) -> Result {
		while self.input_available(processor) {
			let code = self.read_byte(processor)?;
			if let Err(err) = self.vdu(processor, code) {
				if !err.is_recoverable() {
					return Err(err)
				}
				log_abort(&err);
			}
		}
		Ok(())
	}

	fn input_available(&mut self, processor: &mut Processor) -> bool {
		match processor.input {
			Input::Transport => self.transport.available(),
			Input::Buffer(ref mut reader) => reader.available()
		}
	}

	/// Reads a byte. Transport reads wait up to the comms timeout; buffer reads
	/// fail at the end of the buffer.
	pub(crate) fn read_byte(&mut self, processor: &mut Processor) -> Result<u8> {
		match processor.input {
			Input::Transport =>
				self.transport.read_byte_timeout(self.options.comms_timeout()),
			Input::Buffer(ref mut reader) =>
				reader.read().ok_or_else(|| Error::eos(Context::Read))
		}
	}

	/// Reads a little-endian 16-bit word.
	pub(crate) fn read_word(&mut self, processor: &mut Processor) -> Result<u16> {
		let lo = self.read_byte(processor)?;
		let hi = self.read_byte(processor)?;
		Ok(u16::from_le_bytes([lo, hi]))
	}

	/// Reads a little-endian 24-bit value.
	pub(crate) fn read_u24(&mut self, processor: &mut Processor) -> Result<u32> {
		let lo = self.read_byte(processor)?;
		let mid = self.read_byte(processor)?;
		let hi = self.read_byte(processor)?;
		Ok(u32::from_le_bytes([lo, mid, hi, 0]))
	}

	/// Reads a 24-bit offset if `wide` is set, a 16-bit offset otherwise.
	pub(crate) fn read_offset(&mut self, processor: &mut Processor, wide: bool) -> Result<usize> {
		if wide {
			Ok(self.read_u24(processor)? as usize)
		} else {
			Ok(self.read_word(processor)? as usize)
		}
	}

	/// Reads and drops `count` bytes.
	pub(crate) fn discard(&mut self, processor: &mut Processor, count: usize) -> Result {
		for _ in 0..count {
			self.read_byte(processor)?;
		}
		Ok(())
	}

	/// Writes a byte to the processor's current output.
	pub(crate) fn write_byte(&mut self, processor: &Processor, value: u8) {
		match processor.output {
			Output::Transport =>
				if let Err(err) = self.transport.write_byte(value) {
					debug!("dropped output byte: {err}");
				},
			Output::Buffer(id) => match self.store.write_output(id, value) {
				Ok(true) => { }
				Ok(false) => trace!("output buffer {id} is full"),
				Err(err) => debug!("dropped output byte: {err}")
			},
			Output::None => { }
		}
	}

	/// Sends a response packet: `code | 0x80`, the data length, then the data.
	pub(crate) fn send_packet(&mut self, processor: &Processor, code: u8, data: &[u8]) {
		debug_assert!(data.len() <= u8::MAX as usize);
		self.write_byte(processor, code | 0x80);
		self.write_byte(processor, data.len() as u8);
		for &byte in data {
			self.write_byte(processor, byte);
		}
	}

	fn read_args(&mut self, processor: &mut Processor, count: usize) -> Result<ArrayVec<u8, MAX_VDU_ARGS>> {
		debug_assert!(count <= MAX_VDU_ARGS, "{count} argument bytes won't fit");
		let mut args = ArrayVec::new();
		for _ in 0..count {
			args.push(self.read_byte(processor)?);
		}
		Ok(args)
	}

	/// Handles one VDU code.
	pub(crate) fn vdu(&mut self, processor: &mut Processor, code: u8) -> Result {
		trace!("vdu {code:#04X} (depth {})", processor.depth);
		match code {
			VDU_SYS => self.vdu_sys(processor),
			_ => {
				let args = self.read_args(processor, vdu_arg_len(code))?;
				self.screen.vdu(code, &args);
				Ok(())
			}
		}
	}

	/// `VDU 23, mode, ...`
	fn vdu_sys(&mut self, processor: &mut Processor) -> Result {
		let mode = self.read_byte(processor)?;
		match mode {
			SYS_VIDEO => self.vdu_sys_video(processor),
			SYS_CURSOR => {
				let args = self.read_args(processor, 1)?;
				self.screen.sys(mode, &args);
				Ok(())
			}
			SYS_UDG_FIRST..=u8::MAX => {
				let args = self.read_args(processor, SYS_UDG_LEN)?;
				self.screen.sys(mode, &args);
				Ok(())
			}
			_ => {
				self.screen.sys(mode, &[]);
				Ok(())
			}
		}
	}

	/// `VDU 23, 0, command, ...`
	fn vdu_sys_video(&mut self, processor: &mut Processor) -> Result {
		let command = self.read_byte(processor)?;
		match command {
			VDP_GP => self.general_poll(processor),
			VDP_BUFFERED => self.vdu_sys_buffered(processor),
			_ => {
				trace!("unhandled video command {command:#04X}");
				Ok(())
			}
		}
	}

	/// `VDU 23, 0, &80, b`: echoes `b` back in a general poll packet.
	fn general_poll(&mut self, processor: &mut Processor) -> Result {
		let echo = self.read_byte(processor)?;
		self.send_packet(processor, PACKET_GP, &[echo]);
		self.initialised = true;
		Ok(())
	}
}

/// Logs a command abandoned because of `err`, at a level matching its severity.
pub(crate) fn log_abort(err: &Error) {
	match err.kind() {
		ErrorKind::DepthExceeded(_) =>
			error!("command aborted: {err}"),
		ErrorKind::Reserved(_) |
		ErrorKind::Exists(_) |
		ErrorKind::ReadOnly(_) |
		ErrorKind::Alloc(_) =>
			warn!("command rejected: {err}"),
		_ =>
			debug!("command aborted: {err}")
	}
}
