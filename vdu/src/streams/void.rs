// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;
use crate::{Context, Error, Result};
use super::{Sink, Source};

/// Returns a [`Sink`] that writes to nowhere, dropping any data written to it.
pub fn void_sink() -> VoidSink { VoidSink }

/// Returns a [`Source`] that reads from nowhere, producing no data.
pub fn void_source() -> VoidSource { VoidSource }

/// A [`Sink`] that writes to nowhere, dropping any data written to it.
#[derive(Copy, Clone, Debug, Default)]
pub struct VoidSink;

impl Sink for VoidSink {
	/// Drops `value`.
	fn write_byte(&mut self, _value: u8) -> Result { Ok(()) }
}

/// A [`Source`] that reads from nowhere, producing no data.
#[derive(Copy, Clone, Debug, Default)]
pub struct VoidSource;

impl Source for VoidSource {
	fn available(&mut self) -> bool { false }

	/// Reads nothing, returning an end-of-stream error.
	fn read_byte(&mut self) -> Result<u8> { Err(Error::eos(Context::Read)) }

	/// Reads nothing, returning a timeout error.
	fn read_byte_timeout(&mut self, _timeout: Duration) -> Result<u8> {
		Err(Error::timeout(Context::Read))
	}

	fn is_closed(&self) -> bool { true }
}
