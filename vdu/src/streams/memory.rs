// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;
use std::time::Duration;
use crate::{Context, Error, Result};
use super::{Sink, Source};

/// An in-memory [`Transport`](super::Transport): bytes pushed to its input are
/// read as commands, response bytes are collected into its output. All input is
/// resident, so a timed read on an empty queue times out straight away.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
	input: VecDeque<u8>,
	output: Vec<u8>,
}

impl MemoryTransport {
	/// Creates a transport with `input` queued for reading.
	pub fn new(input: impl AsRef<[u8]>) -> Self {
		Self {
			input: input.as_ref().iter().copied().collect(),
			output: Vec::new(),
		}
	}

	/// Queues more bytes for reading.
	pub fn push(&mut self, input: impl AsRef<[u8]>) {
		self.input.extend(input.as_ref())
	}

	/// Returns the number of unread input bytes.
	pub fn remaining(&self) -> usize { self.input.len() }

	/// Returns the bytes written so far.
	pub fn output(&self) -> &[u8] { &self.output }

	/// Takes the bytes written so far, leaving the output empty.
	pub fn take_output(&mut self) -> Vec<u8> {
		std::mem::take(&mut self.output)
	}
}

impl Source for MemoryTransport {
	fn available(&mut self) -> bool { !self.input.is_empty() }

	fn read_byte(&mut self) -> Result<u8> {
		self.input.pop_front().ok_or_else(|| Error::eos(Context::Read))
	}

	fn read_byte_timeout(&mut self, _timeout: Duration) -> Result<u8> {
		self.input.pop_front().ok_or_else(|| Error::timeout(Context::Read))
	}

	/// Closed once the input is drained.
	fn is_closed(&self) -> bool { self.input.is_empty() }
}

impl Sink for MemoryTransport {
	fn write_byte(&mut self, value: u8) -> Result {
		self.output.push(value);
		Ok(())
	}
}
