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

#![allow(dead_code)]

use vdu::{Options, Session};
use vdu::screen::Screen;
use vdu::streams::MemoryTransport;

/// A screen recording every command it's handed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RecordingScreen {
	pub vdu: Vec<(u8, Vec<u8>)>,
	pub sys: Vec<(u8, Vec<u8>)>,
}

impl Screen for RecordingScreen {
	fn vdu(&mut self, code: u8, args: &[u8]) {
		self.vdu.push((code, args.to_vec()))
	}

	fn sys(&mut self, mode: u8, args: &[u8]) {
		self.sys.push((mode, args.to_vec()))
	}
}

pub type TestSession = Session<MemoryTransport, RecordingScreen>;

/// Creates a session over `input` with default options.
pub fn session(input: impl AsRef<[u8]>) -> TestSession {
	session_with(input, Options::default())
}

pub fn session_with(input: impl AsRef<[u8]>, options: Options) -> TestSession {
	Session::with_screen(MemoryTransport::new(input), RecordingScreen::default(), options)
}

/// Runs every command in `input`, returning the finished session.
pub fn run(input: impl AsRef<[u8]>) -> TestSession {
	let mut session = session(input);
	session.process_all_available();
	session
}

pub fn word(value: u16) -> [u8; 2] { value.to_le_bytes() }

/// Concatenates command byte strings.
pub fn commands<const N: usize>(parts: [Vec<u8>; N]) -> Vec<u8> {
	parts.concat()
}

/// `VDU 23, 0, &A0, id; command`
pub fn buffered(id: u16, command: u8) -> Vec<u8> {
	let mut bytes = vec![0x17, 0x00, 0xA0];
	bytes.extend(word(id));
	bytes.push(command);
	bytes
}

pub fn write(id: u16, data: &[u8]) -> Vec<u8> {
	let mut bytes = buffered(id, 0);
	bytes.extend(word(data.len() as u16));
	bytes.extend(data);
	bytes
}

pub fn call(id: u16) -> Vec<u8> { buffered(id, 1) }

pub fn clear(id: u16) -> Vec<u8> { buffered(id, 2) }

pub fn create(id: u16, size: u16) -> Vec<u8> {
	let mut bytes = buffered(id, 3);
	bytes.extend(word(size));
	bytes
}

pub fn set_output(id: u16) -> Vec<u8> { buffered(id, 4) }

/// An adjust command; `args` holds everything after the command byte.
pub fn adjust(id: u16, command: u8, args: &[u8]) -> Vec<u8> {
	let mut bytes = buffered(id, 5);
	bytes.push(command);
	bytes.extend(args);
	bytes
}

/// A conditional call with 16-bit offsets; `args` holds any operand bytes.
pub fn conditional(id: u16, command: u8, check: u16, offset: u16, args: &[u8]) -> Vec<u8> {
	let mut bytes = buffered(id, 6);
	bytes.push(command);
	bytes.extend(word(check));
	bytes.extend(word(offset));
	bytes.extend(args);
	bytes
}

pub fn debug_info(id: u16) -> Vec<u8> { buffered(id, 0x10) }

/// `VDU 23, 0, &80, echo`
pub fn general_poll(echo: u8) -> Vec<u8> { vec![0x17, 0x00, 0x80, echo] }

/// Returns the logical contents of buffer `id`, or `None` if it doesn't exist.
pub fn contents(session: &TestSession, id: u16) -> Option<Vec<u8>> {
	session.store().buffer(id).map(|buffer| buffer.to_vec())
}
