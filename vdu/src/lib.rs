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

//! ## How it works
//!
//! A host drives a video coprocessor by sending it a stream of VDU command bytes.
//! Most commands are handed straight to a [`Screen`](screen::Screen); this crate
//! handles the ones that give the host *memory* on the coprocessor side: the
//! buffered commands, `VDU 23, 0, &A0, id; command, ...`.
//!
//! ### Buffers
//!
//! Buffers live in a [`BufferStore`], keyed by a 16-bit id. Each buffer is a list
//! of *segments*. Writing to a buffer appends a read-only segment holding the
//! written bytes; creating a buffer allocates a single zeroed, writable segment.
//! Offsets address the concatenation of a buffer's segments, so a byte can be read
//! or replaced anywhere in a buffer without knowing where one segment ends and the
//! next begins. Buffers never grow from a byte write. Two ids are reserved: `0`
//! names a processor's original output, `0xFFFF` means "nothing" or "everything".
//!
//! ### Processors
//!
//! A [`Session`] reads commands from its transport with a top-level [`Processor`].
//! Calling a buffer runs a nested processor over that buffer's bytes, as if they
//! had arrived over the wire, until they're exhausted. A [`MultiSegmentReader`]
//! tracks the nested processor's place in the buffer. It holds the segments the
//! buffer had when the call started, sharing their memory with the store: bytes
//! changed in place are seen, segments added or removed later are not.
//!
//! Calls nest up to a set depth. A buffer calling itself restarts from its first
//! byte instead of nesting.
//!
//! Responses go to the processor's output: the transport, a writable buffer, or
//! nowhere. Nested processors inherit their caller's output.
//!
//! ### Errors
//!
//! A command that fails is abandoned, logged, and the loop moves on to the next.
//! Failing commands still read their whole payload where they can, so the stream
//! stays aligned. The one exception is exceeding the call depth, which unwinds
//! every nested call back to the top level.

mod buffered;
mod error;
mod id;
mod options;
mod processor;
pub mod protocol;
mod reader;
pub mod screen;
mod segment;
mod std_io;
mod store;
pub mod streams;

pub use buffered::*;
pub use error::*;
pub use id::*;
pub use options::*;
pub use processor::{Output, Processor, Session};
pub use reader::MultiSegmentReader;
pub use segment::Segment;
pub use std_io::WriterSink;
pub use store::{Buffer, BufferStore};
