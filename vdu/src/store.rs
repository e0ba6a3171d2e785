// SPDX-License-Identifier: Apache-2.0

//! Buffer storage. Each buffer is a *multi-segment log*: writing to a buffer adds
//! a segment instead of replacing its contents, so one id can collect many chunks
//! of data over several commands. Offsets address the concatenation of a buffer's
//! segments, in the order they were added.

use std::collections::HashMap;
use log::trace;
use crate::{Context, Error, ErrorKind, Result, Segment};
use crate::id::{DEFAULT_ID, NONE_ID};

/// An ordered list of [`Segment`]s stored under one id.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Buffer {
	segments: Vec<Segment>,
}

impl Buffer {
	/// Returns the buffer's segments, in the order they were added.
	pub fn segments(&self) -> &[Segment] { &self.segments }

	/// Returns the number of segments.
	pub fn segment_count(&self) -> usize { self.segments.len() }

	/// Returns the logical length, the sum of all segment lengths.
	pub fn len(&self) -> usize {
		self.segments.iter().map(Segment::len).sum()
	}

	/// Returns `true` if the buffer holds no bytes.
	pub fn is_empty(&self) -> bool {
		self.segments.iter().all(Segment::is_empty)
	}

	/// Resolves a logical offset into a segment index and an offset within that
	/// segment.
	fn locate(&self, mut offset: usize) -> Option<(usize, usize)> {
		for (index, seg) in self.segments.iter().enumerate() {
			if offset < seg.len() {
				return Some((index, offset))
			}
			offset -= seg.len();
		}
		None
	}

	/// Returns the byte at a logical offset.
	pub fn get(&self, offset: usize) -> Option<u8> {
		let (index, offset) = self.locate(offset)?;
		self.segments[index].get(offset)
	}

	/// Sets the byte at a logical offset, returning `false` if the offset is past
	/// the end of the buffer.
	pub fn set(&mut self, offset: usize, value: u8) -> bool {
		match self.locate(offset) {
			Some((index, offset)) => self.segments[index].set(offset, value),
			None => false
		}
	}

	/// Returns a copy of the logical contents.
	pub fn to_vec(&self) -> Vec<u8> {
		let mut bytes = Vec::with_capacity(self.len());
		for seg in &self.segments {
			bytes.extend_from_slice(&seg.data());
		}
		bytes
	}
}

/// The table of buffers, keyed by 16-bit id.
///
/// Ids `0` and `0xFFFF` are reserved and can never name a stored buffer. Giving
/// them any meaning beyond that is left to the caller.
#[derive(Clone, Debug, Default)]
pub struct BufferStore {
	buffers: HashMap<u16, Buffer>,
	used: usize,
	limit: Option<usize>,
}

fn check_id(context: Context, id: u16) -> Result {
	if id == DEFAULT_ID || id == NONE_ID {
		Err(Error::new(context, ErrorKind::Reserved(id)))
	} else {
		Ok(())
	}
}

impl BufferStore {
	/// Creates an empty store with unlimited memory.
	pub fn new() -> Self { Self::default() }

	/// Creates an empty store holding at most `limit` bytes, if set.
	pub fn with_limit(limit: Option<usize>) -> Self {
		Self { limit, ..Self::default() }
	}

	/// Returns the number of stored buffers.
	pub fn len(&self) -> usize { self.buffers.len() }

	/// Returns `true` if no buffers are stored.
	pub fn is_empty(&self) -> bool { self.buffers.is_empty() }

	/// Returns the number of bytes held across all buffers.
	pub fn used(&self) -> usize { self.used }

	/// Returns `true` if a buffer is stored under `id`.
	pub fn contains(&self, id: u16) -> bool { self.buffers.contains_key(&id) }

	/// Returns the buffer stored under `id`.
	pub fn buffer(&self, id: u16) -> Option<&Buffer> { self.buffers.get(&id) }

	/// Returns an iterator over the stored ids, in no particular order.
	pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
		self.buffers.keys().copied()
	}

	/// Checks that `len` more bytes fit under the memory limit.
	pub fn check_capacity(&self, len: usize) -> Result {
		match self.limit {
			Some(limit) if self.used.saturating_add(len) > limit =>
				Err(Error::alloc(Context::Unknown, len)),
			_ => Ok(())
		}
	}

	/// Returns the byte at `offset` in the logical contents of buffer `id`.
	pub fn get_byte(&self, id: u16, offset: usize) -> Result<u8> {
		let buffer = self.buffers
						 .get(&id)
						 .ok_or_else(|| Error::not_found(Context::Lookup, id))?;
		buffer.get(offset).ok_or_else(||
			Error::new(Context::Lookup, ErrorKind::OutOfRange(id, offset))
		)
	}

	/// Sets the byte at `offset` in the logical contents of buffer `id`. Never
	/// grows the buffer; on failure nothing is changed.
	pub fn set_byte(&mut self, id: u16, offset: usize, value: u8) -> Result {
		let buffer = self.buffers
						 .get_mut(&id)
						 .ok_or_else(|| Error::not_found(Context::Lookup, id))?;
		if buffer.set(offset, value) {
			Ok(())
		} else {
			Err(Error::new(Context::Lookup, ErrorKind::OutOfRange(id, offset)))
		}
	}

	/// Appends a segment to buffer `id`, creating the buffer if needed.
	pub fn append_segment(&mut self, id: u16, segment: Segment) -> Result {
		check_id(Context::BufWrite, id)?;
		let len = segment.len();
		self.check_capacity(len).map_err(|err| err.with_context(Context::BufWrite))?;
		let buffer = self.buffers.entry(id).or_default();
		buffer.segments.push(segment);
		self.used += len;
		trace!("appended {len} bytes to buffer {id}, {} segments", buffer.segment_count());
		Ok(())
	}

	/// Creates buffer `id` with a single zeroed, writable segment of length `len`.
	/// Fails if the id is reserved or already in use.
	pub fn create_writable(&mut self, id: u16, len: usize) -> Result {
		check_id(Context::Create, id)?;
		if self.contains(id) {
			return Err(Error::new(Context::Create, ErrorKind::Exists(id)))
		}
		self.check_capacity(len).map_err(|err| err.with_context(Context::Create))?;
		let segment = Segment::writable(len).ok_or_else(|| Error::alloc(Context::Create, len))?;
		self.buffers.insert(id, Buffer { segments: vec![segment] });
		self.used += len;
		Ok(())
	}

	/// Removes buffer `id`, returning `true` if it existed. Readers already made
	/// from the buffer keep its segments.
	pub fn clear(&mut self, id: u16) -> bool {
		if let Some(buffer) = self.buffers.remove(&id) {
			self.used -= buffer.len();
			true
		} else {
			false
		}
	}

	/// Removes every buffer.
	pub fn clear_all(&mut self) {
		self.buffers.clear();
		self.used = 0;
	}

	/// Writes a byte at the write cursor of buffer `id`'s first segment. Returns
	/// `false` if the segment is already full.
	pub fn write_output(&mut self, id: u16, value: u8) -> Result<bool> {
		let seg = self.buffers
					  .get_mut(&id)
					  .and_then(|buffer| buffer.segments.first_mut())
					  .ok_or_else(|| Error::not_found(Context::Write, id))?;
		if !seg.is_writable() {
			return Err(Error::new(Context::Write, ErrorKind::ReadOnly(id)))
		}
		Ok(seg.write(value))
	}

	/// Returns `true` if buffer `id` exists and its first segment is writable.
	pub fn is_output_target(&self, id: u16) -> bool {
		self.buffers
			.get(&id)
			.and_then(|buffer| buffer.segments.first())
			.is_some_and(Segment::is_writable)
	}
}
