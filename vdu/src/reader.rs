// SPDX-License-Identifier: Apache-2.0

use crate::{Buffer, Segment};

/// Reads the segments of one buffer, in order, as a single byte stream. Empty and
/// exhausted segments are skipped.
///
/// The reader takes the buffer's segment list as it stands when the reader is
/// made. Segments share memory with the store, so bytes changed in place are seen
/// by the reader, but segments appended afterwards are not, and clearing the
/// buffer doesn't cut the reader short.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MultiSegmentReader {
	segments: Vec<Segment>,
	segment: usize,
	pos: usize,
}

impl MultiSegmentReader {
	/// Creates a reader positioned at the start of `buffer`.
	pub fn new(buffer: &Buffer) -> Self {
		Self {
			segments: buffer.segments().to_vec(),
			segment: 0,
			pos: 0,
		}
	}

	/// Returns the logical offset of the next byte.
	pub fn position(&self) -> usize {
		self.segments
			.iter()
			.take(self.segment)
			.map(Segment::len)
			.sum::<usize>() + self.pos
	}

	/// Moves back to the start of the buffer.
	pub fn rewind(&mut self) {
		self.segment = 0;
		self.pos = 0;
	}

	/// Advances past exhausted segments, returning `false` at the end.
	fn advance(&mut self) -> bool {
		while let Some(seg) = self.segments.get(self.segment) {
			if self.pos < seg.len() {
				return true
			}
			self.segment += 1;
			self.pos = 0;
		}
		false
	}

	/// Returns `true` if there are more bytes to read.
	pub fn available(&mut self) -> bool { self.advance() }

	/// Reads the next byte, or `None` at the end of the buffer.
	pub fn read(&mut self) -> Option<u8> {
		if !self.advance() {
			return None
		}
		let byte = self.segments[self.segment].get(self.pos)?;
		self.pos += 1;
		Some(byte)
	}
}
