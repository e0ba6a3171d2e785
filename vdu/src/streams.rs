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

//! Byte-level transport streams connecting the session to its host.

mod channel;
mod memory;
mod void;

pub use channel::*;
pub use memory::*;
pub use void::*;

use std::time::Duration;
use crate::Result;

/// A source of command bytes from the host.
pub trait Source {
	/// Returns `true` if a byte can be read without waiting.
	fn available(&mut self) -> bool;

	/// Reads one byte, waiting as long as it takes.
	fn read_byte(&mut self) -> Result<u8>;

	/// Reads one byte, waiting at most `timeout` for it to arrive.
	fn read_byte_timeout(&mut self, timeout: Duration) -> Result<u8>;

	/// Returns `true` if no more bytes will ever arrive.
	fn is_closed(&self) -> bool { false }
}

/// A sink for response bytes to the host.
pub trait Sink {
	/// Writes one byte.
	fn write_byte(&mut self, value: u8) -> Result;

	/// Writes all buffered bytes to their final target.
	fn flush(&mut self) -> Result { Ok(()) }
}

/// A two-way link to the host: a [`Source`] and [`Sink`] in one.
pub trait Transport: Source + Sink { }

impl<T: Source + Sink> Transport for T { }

/// A [`Transport`] made from a separate source and sink.
#[derive(Clone, Debug, Default)]
pub struct Duplex<S: Source, K: Sink> {
	pub source: S,
	pub sink: K,
}

impl<S: Source, K: Sink> Duplex<S, K> {
	pub fn new(source: S, sink: K) -> Self {
		Self { source, sink }
	}

	/// Splits into the source and sink.
	pub fn into_inner(self) -> (S, K) {
		(self.source, self.sink)
	}
}

impl<S: Source, K: Sink> Source for Duplex<S, K> {
	fn available(&mut self) -> bool { self.source.available() }

	fn read_byte(&mut self) -> Result<u8> { self.source.read_byte() }

	fn read_byte_timeout(&mut self, timeout: Duration) -> Result<u8> {
		self.source.read_byte_timeout(timeout)
	}

	fn is_closed(&self) -> bool { self.source.is_closed() }
}

impl<S: Source, K: Sink> Sink for Duplex<S, K> {
	fn write_byte(&mut self, value: u8) -> Result { self.sink.write_byte(value) }

	fn flush(&mut self) -> Result { self.sink.flush() }
}
