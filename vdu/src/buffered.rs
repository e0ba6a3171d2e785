// SPDX-License-Identifier: Apache-2.0

//! Buffered commands: `VDU 23, 0, &A0, id; command, ...`
//!
//! These give the host persistent memory on the coprocessor. Command sequences can
//! be stored in a buffer and later executed as if they had arrived over the wire,
//! letting the host batch many operations into one round trip. Buffers can call
//! other buffers, restart themselves, do byte arithmetic on buffer contents, and
//! branch on buffer values.

mod adjust;
mod conditional;

pub use adjust::*;
pub use conditional::*;

use itertools::Itertools;
use log::{debug, error, trace, warn};
use crate::{Context, Error, ErrorKind, Id, MultiSegmentReader, Result, ResultContext, Segment};
use crate::processor::{Output, Processor, Session};
use crate::protocol::*;
use crate::screen::Screen;
use crate::segment::try_alloc;
use crate::streams::Transport;

impl<T: Transport, S: Screen> Session<T, S> {
	pub(crate) fn vdu_sys_buffered(&mut self, processor: &mut Processor) -> Result {
		let id = Id::from(self.read_word(processor)?);
		let command = self.read_byte(processor)?;

		match command {
			BUFFERED_WRITE       => self.buffer_write(processor, id),
			BUFFERED_CALL        => self.buffer_call(processor, id),
			BUFFERED_CLEAR       => {
				self.buffer_clear(id);
				Ok(())
			}
			BUFFERED_CREATE      => self.buffer_create(processor, id),
			BUFFERED_SET_OUTPUT  => self.set_output(processor, id),
			BUFFERED_ADJUST      => self.buffer_adjust(processor, id),
			BUFFERED_CONDITIONAL => self.buffer_conditional_call(processor, id),
			BUFFERED_DEBUG_INFO  => {
				self.buffer_debug_info(id);
				Ok(())
			}
			_ => {
				warn!("unknown buffered command {command:#04X} for buffer {id}");
				Ok(())
			}
		}
	}

	/// `VDU 23, 0, &A0, id; 0, length; data...`: appends `length` bytes as a new
	/// segment of buffer `id`. Writes to a reserved id are read and dropped. If the
	/// segment can't be allocated, its bytes are still read so the stream stays in
	/// step.
	pub(crate) fn buffer_write(&mut self, processor: &mut Processor, id: Id) -> Result {
		let len = self.read_word(processor).context(Context::BufWrite)? as usize;

		let Id::Buffer(id) = id else {
			debug!("buffer write: dropping {len} bytes written to reserved buffer {id}");
			return self.discard(processor, len).context(Context::BufWrite)
		};

		let Some(mut data) = self.store.check_capacity(len).ok().and_then(|()| try_alloc(len)) else {
			self.discard(processor, len).context(Context::BufWrite)?;
			return Err(Error::alloc(Context::BufWrite, len))
		};

		for _ in 0..len {
			data.push(self.read_byte(processor).context(Context::BufWrite)?);
		}

		self.store.append_segment(id, Segment::read_only(data))?;
		debug!(
			"buffer write: stored {len} bytes in buffer {id}, {} segments stored",
			self.store.buffer(id).map_or(0, |buffer| buffer.segment_count())
		);
		Ok(())
	}

	/// `VDU 23, 0, &A0, id; 1`: executes buffer `id` as a nested command stream,
	/// returning once it's exhausted. Calling the sentinel id does nothing; calling
	/// the buffer being executed restarts it from the start instead of nesting.
	///
	/// The call runs over the segments the buffer holds when it starts. Writing to
	/// or clearing the buffer during the call doesn't change what the call runs.
	pub(crate) fn buffer_call(&mut self, processor: &mut Processor, id: Id) -> Result {
		let id = match id {
			Id::None => return Ok(()),
			id if id == processor.id => {
				trace!("buffer call: restarting buffer {id}");
				processor.rewind();
				return Ok(())
			}
			id => id.raw()
		};

		let Some(buffer) = self.store.buffer(id) else {
			debug!("buffer call: buffer {id} not found");
			return Ok(())
		};

		let depth = processor.depth + 1;
		let max_depth = self.options.max_call_depth();
		if depth > max_depth {
			error!("buffer call: calling buffer {id} would nest deeper than {max_depth}");
			return Err(Error::new(Context::Call, ErrorKind::DepthExceeded(max_depth)))
		}

		debug!("buffer call: buffer {id} at depth {depth}");
		let reader = MultiSegmentReader::new(buffer);
		let mut nested = Processor::nested(id, reader, processor.output, depth);
		self.run_nested(&mut nested)
	}

	/// `VDU 23, 0, &A0, id; 2`: removes buffer `id`, or every buffer if `id` is the
	/// sentinel.
	pub(crate) fn buffer_clear(&mut self, id: Id) {
		match id {
			Id::None => {
				debug!("buffer clear: clearing all {} buffers", self.store.len());
				self.store.clear_all();
			}
			id if self.store.clear(id.raw()) => debug!("buffer clear: cleared buffer {id}"),
			id => debug!("buffer clear: buffer {id} not found")
		}
	}

	/// `VDU 23, 0, &A0, id; 3, size;`: creates buffer `id` holding one zeroed,
	/// writable segment of `size` bytes.
	pub(crate) fn buffer_create(&mut self, processor: &mut Processor, id: Id) -> Result {
		let size = self.read_word(processor).context(Context::Create)? as usize;
		self.store.create_writable(id.raw(), size)?;
		debug!("buffer create: created buffer {id}, size {size}");
		Ok(())
	}

	/// `VDU 23, 0, &A0, id; 4`: redirects the processor's output. The sentinel id
	/// discards output, the default id restores the original output, and any other
	/// id sends output into that buffer if its first segment is writable.
	pub(crate) fn set_output(&mut self, processor: &mut Processor, id: Id) -> Result {
		processor.output = match id {
			Id::None => Output::None,
			Id::Default => processor.original_output,
			Id::Buffer(id) if self.store.is_output_target(id) => Output::Buffer(id),
			Id::Buffer(id) if self.store.contains(id) =>
				return Err(Error::new(Context::SetOutput, ErrorKind::ReadOnly(id))),
			Id::Buffer(id) =>
				return Err(Error::not_found(Context::SetOutput, id))
		};
		debug!("set output: {:?}", processor.output);
		Ok(())
	}

	/// `VDU 23, 0, &A0, id; &10`: logs the segment count and first segment of
	/// buffer `id`.
	pub(crate) fn buffer_debug_info(&self, id: Id) {
		let Some(buffer) = self.store.buffer(id.raw()) else {
			debug!("buffer debug: buffer {id} not found");
			return
		};

		debug!("buffer debug: buffer {id}, {} segments stored", buffer.segment_count());
		if let Some(first) = buffer.segments().first() {
			debug!("{}", first.data().iter().map(|byte| format!("{byte:02X}")).join(" "));
		}
	}
}
