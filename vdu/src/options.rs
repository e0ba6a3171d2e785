// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// The default per-byte timeout for reads from the transport.
pub const COMMS_TIMEOUT: Duration = Duration::from_millis(100);
/// The default maximum nesting of buffer calls.
pub const MAX_CALL_DEPTH: usize = 32;

/// Options for tuning a [`Session`](crate::Session)'s behavior.
///
/// # Comms timeout
///
/// The longest a top-level command waits for each of its bytes to arrive over the
/// transport, `100ms` by default. When it expires, the command in progress is
/// abandoned and the session goes back to scanning for the next command byte. Bytes
/// read from buffers never time out.
///
/// # Max call depth
///
/// The deepest a chain of buffer calls may nest, `32` by default. A call past this
/// depth fails and unwinds the whole chain back to the top-level command. Restarting
/// the calling buffer from the start doesn't count as nesting.
///
/// # Memory limit
///
/// The total number of bytes all buffers may hold. Writes and creates that would
/// exceed it fail as if allocation failed. Unlimited by default.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Options {
	pub comms_timeout: Duration,
	pub max_call_depth: usize,
	pub memory_limit: Option<usize>,
}

impl Default for Options {
	fn default() -> Self { Self::new() }
}

impl Options {
	/// Creates a new set of session options.
	pub const fn new() -> Self {
		Self {
			comms_timeout: COMMS_TIMEOUT,
			max_call_depth: MAX_CALL_DEPTH,
			memory_limit: None,
		}
	}

	/// Returns the transport read timeout.
	#[inline]
	pub const fn comms_timeout(&self) -> Duration { self.comms_timeout }

	/// Returns the maximum call depth.
	#[inline]
	pub const fn max_call_depth(&self) -> usize { self.max_call_depth }

	/// Returns the buffer memory limit, if any.
	#[inline]
	pub const fn memory_limit(&self) -> Option<usize> { self.memory_limit }

	/// Sets the transport read timeout.
	#[inline]
	pub fn set_comms_timeout(&mut self, value: Duration) {
		self.comms_timeout = value;
	}

	/// Sets the maximum call depth.
	#[inline]
	pub fn set_max_call_depth(&mut self, value: usize) {
		self.max_call_depth = value;
	}

	/// Sets the buffer memory limit.
	#[inline]
	pub fn set_memory_limit(&mut self, value: Option<usize>) {
		self.memory_limit = value;
	}

	/// Sets the transport read timeout.
	#[inline]
	pub const fn with_comms_timeout(mut self, value: Duration) -> Self {
		self.comms_timeout = value;
		self
	}

	/// Sets the maximum call depth.
	#[inline]
	pub const fn with_max_call_depth(mut self, value: usize) -> Self {
		self.max_call_depth = value;
		self
	}

	/// Limits buffer memory to `value` bytes.
	#[inline]
	pub const fn with_memory_limit(mut self, value: usize) -> Self {
		self.memory_limit = Some(value);
		self
	}

	/// Removes the buffer memory limit.
	#[inline]
	pub const fn unlimited_memory(mut self) -> Self {
		self.memory_limit = None;
		self
	}
}
