// SPDX-License-Identifier: Apache-2.0

use std::io::{ErrorKind, Write};
use crate::{Context, Error, Result};
use crate::streams::Sink;

/// A [`Sink`] writing to a wrapped [`Write`]r.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
	writer: Option<W>,
}

impl<W: Write> From<W> for WriterSink<W> {
	fn from(writer: W) -> Self {
		Self { writer: Some(writer) }
	}
}

impl<W: Write> WriterSink<W> {
	/// Returns `true` if the writer has been closed.
	pub fn is_closed(&self) -> bool { self.writer.is_none() }

	/// Closes the underlying writer by letting it fall out of scope. Subsequent
	/// writes will fail.
	pub fn close(&mut self) {
		self.writer.take();
	}

	/// Unwraps the writer, if not closed.
	pub fn into_inner(self) -> Option<W> { self.writer }
}

impl<W: Write> Sink for WriterSink<W> {
	fn write_byte(&mut self, value: u8) -> Result {
		let writer = self.writer.as_mut().ok_or_else(|| Error::closed(Context::Write))?;
		loop {
			match writer.write_all(&[value]) {
				Ok(()) => return Ok(()),
				Err(err) if err.kind() == ErrorKind::Interrupted => continue,
				Err(_) => {
					self.writer.take();
					return Err(Error::closed(Context::Write))
				}
			}
		}
	}

	fn flush(&mut self) -> Result {
		self.writer
			.as_mut()
			.ok_or_else(|| Error::closed(Context::Write))?
			.flush()
			.map_err(|_| Error::closed(Context::Write))
	}
}

#[cfg(test)]
mod test {
	use crate::streams::Sink;
	use super::WriterSink;

	#[test]
	fn writes_through() {
		let mut sink = WriterSink::from(Vec::new());
		sink.write_byte(1).unwrap();
		sink.write_byte(2).unwrap();
		sink.flush().unwrap();
		assert_eq!(sink.into_inner().unwrap(), vec![1, 2]);
	}

	#[test]
	fn closed_sink_fails() {
		let mut sink = WriterSink::from(Vec::new());
		sink.close();
		assert!(sink.is_closed());
		assert!(sink.write_byte(1).is_err());
	}
}
