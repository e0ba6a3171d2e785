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

use std::result;
use amplify_derive::Display;
use thiserror::Error;

pub type Result<T = ()> = result::Result<T, Error>;

/// The operation during which an error occurred.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq)]
pub enum Context {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("read from input")]
	Read,
	#[display("write to output")]
	Write,
	#[display("buffer write")]
	BufWrite,
	#[display("buffer call")]
	Call,
	#[display("buffer clear")]
	Clear,
	#[display("buffer create")]
	Create,
	#[display("set output")]
	SetOutput,
	#[display("buffer adjust")]
	Adjust,
	#[display("conditional call")]
	Conditional,
	#[display("buffer lookup")]
	Lookup,
}

#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum ErrorKind {
	#[display("timed out waiting for input")]
	Timeout,
	#[display("premature end-of-stream")]
	Eos,
	#[display("transport closed")]
	Closed,
	#[display("buffer {0} not found")]
	NotFound(u16),
	#[display("offset {1} is out of range for buffer {0}")]
	OutOfRange(u16, usize),
	#[display("buffer id {0} is reserved")]
	Reserved(u16),
	#[display("buffer {0} already exists")]
	Exists(u16),
	#[display("buffer {0} is not writable")]
	ReadOnly(u16),
	#[display("could not allocate {0} bytes")]
	Alloc(usize),
	#[display("call depth exceeded the limit of {0}")]
	DepthExceeded(usize),
}

impl ErrorKind {
	/// Returns `true` if the decode loop can carry on scanning for the next command
	/// after this error. Only a call depth overflow is fatal to the command chain.
	pub fn is_recoverable(&self) -> bool {
		!matches!(self, Self::DepthExceeded(_))
	}
}

#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
#[error("{context} failed; {kind}")]
pub struct Error {
	context: Context,
	kind: ErrorKind,
}

impl Error {
	pub fn new(context: Context, kind: ErrorKind) -> Self {
		Self { context, kind }
	}

	/// Creates a new "timeout" error.
	pub fn timeout(context: Context) -> Self { Self::new(context, ErrorKind::Timeout) }

	/// Creates a new "end-of-stream" error.
	pub fn eos(context: Context) -> Self { Self::new(context, ErrorKind::Eos) }

	/// Creates a new "closed" error.
	pub fn closed(context: Context) -> Self { Self::new(context, ErrorKind::Closed) }

	/// Creates a new "not found" error.
	pub fn not_found(context: Context, id: u16) -> Self {
		Self::new(context, ErrorKind::NotFound(id))
	}

	/// Creates a new allocation error.
	pub fn alloc(context: Context, size: usize) -> Self {
		Self::new(context, ErrorKind::Alloc(size))
	}

	/// Returns the operation context.
	pub fn context(&self) -> Context { self.context }

	/// Sets the operation context.
	pub fn with_context(mut self, context: Context) -> Self {
		self.context = context;
		self
	}

	/// Returns the error kind.
	pub fn kind(&self) -> ErrorKind { self.kind }

	/// Shorthand for `kind().is_recoverable()`.
	pub fn is_recoverable(&self) -> bool { self.kind.is_recoverable() }
}

pub trait ResultContext<T> {
	/// Replaces the error context.
	fn context(self, context: Context) -> Result<T>;
}

impl<T> ResultContext<T> for Result<T> {
	#[inline]
	fn context(self, context: Context) -> Result<T> {
		self.map_err(|err| err.with_context(context))
	}
}
