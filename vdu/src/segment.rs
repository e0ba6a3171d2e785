// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use all_asserts::assert_le;

/// Allocates an empty vector with room for exactly `len` bytes, or `None` if the
/// allocation fails.
pub(crate) fn try_alloc(len: usize) -> Option<Vec<u8>> {
	let mut vec = Vec::new();
	vec.try_reserve_exact(len).ok()?;
	Some(vec)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Kind {
	/// Populated once at creation.
	ReadOnly,
	/// Created zeroed, filled by byte-level writes at a cursor.
	Writable { pos: usize },
}

/// A fixed-length chunk of buffer memory. Segments never change length once they
/// are created.
///
/// There are two kinds of segment: *read-only* segments are fully populated when
/// created, usually from bytes read off the command stream. *Writable* segments
/// are created zeroed, then filled by writing bytes at a cursor; these can be used
/// as an output target. Either kind can have its bytes modified in place.
///
/// Cloning a segment shares its memory, not its write cursor. A byte set through
/// one clone is seen by all of them, and the memory lives until the last clone is
/// dropped.
#[derive(Clone, Eq, PartialEq)]
pub struct Segment {
	data: Rc<RefCell<Box<[u8]>>>,
	kind: Kind,
}

impl Segment {
	fn new(data: Box<[u8]>, kind: Kind) -> Self {
		Self { data: Rc::new(RefCell::new(data)), kind }
	}

	/// Creates a read-only segment holding `data`.
	pub fn read_only(data: impl Into<Box<[u8]>>) -> Self {
		Self::new(data.into(), Kind::ReadOnly)
	}

	/// Creates a zero-filled writable segment of length `len`, or `None` if memory
	/// couldn't be allocated.
	pub fn writable(len: usize) -> Option<Self> {
		let mut data = try_alloc(len)?;
		data.resize(len, 0);
		Some(Self::new(data.into_boxed_slice(), Kind::Writable { pos: 0 }))
	}

	/// Returns the segment length.
	pub fn len(&self) -> usize { self.data.borrow().len() }

	/// Returns `true` if the segment is empty.
	pub fn is_empty(&self) -> bool { self.len() == 0 }

	/// Returns `true` if the segment accepts writes at its cursor.
	pub fn is_writable(&self) -> bool {
		matches!(self.kind, Kind::Writable { .. })
	}

	/// Returns `true` if the segment's memory is shared with another clone.
	pub fn is_shared(&self) -> bool { Rc::strong_count(&self.data) > 1 }

	/// Borrows the segment contents.
	pub fn data(&self) -> Ref<'_, [u8]> {
		Ref::map(self.data.borrow(), |data| &**data)
	}

	/// Returns the byte at `offset`.
	pub fn get(&self, offset: usize) -> Option<u8> {
		self.data.borrow().get(offset).copied()
	}

	/// Sets the byte at `offset`, returning `false` if `offset` is out of range.
	pub fn set(&mut self, offset: usize, value: u8) -> bool {
		if let Some(byte) = self.data.borrow_mut().get_mut(offset) {
			*byte = value;
			true
		} else {
			false
		}
	}

	/// Returns the write cursor position, or `None` if the segment is read-only.
	pub fn write_pos(&self) -> Option<usize> {
		match self.kind {
			Kind::Writable { pos } => Some(pos),
			Kind::ReadOnly => None
		}
	}

	/// Writes a byte at the write cursor, advancing it. Returns `false` if the
	/// segment is read-only or full.
	pub fn write(&mut self, value: u8) -> bool {
		let Kind::Writable { ref mut pos } = self.kind else {
			return false
		};

		let mut data = self.data.borrow_mut();
		if *pos >= data.len() {
			return false
		}

		data[*pos] = value;
		*pos += 1;
		assert_le!(*pos, data.len());
		true
	}

	/// Moves the write cursor back to the start.
	pub fn rewind_write(&mut self) {
		if let Kind::Writable { ref mut pos } = self.kind {
			*pos = 0;
		}
	}
}

impl From<Vec<u8>> for Segment {
	fn from(value: Vec<u8>) -> Self { Self::read_only(value) }
}

impl From<&[u8]> for Segment {
	fn from(value: &[u8]) -> Self { Self::read_only(value) }
}

impl Debug for Segment {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Segment")
			.field("len", &self.len())
			.field("write_pos", &self.write_pos())
			.finish_non_exhaustive()
	}
}
