// SPDX-License-Identifier: Apache-2.0

//! The rendering side of the session. Text, graphics, sprite, and sound commands
//! aren't interpreted here; their bytes are collected and handed to a [`Screen`].

/// Receives the VDU commands that aren't handled by the session itself.
pub trait Screen {
	/// Handles a single VDU code with its argument bytes.
	fn vdu(&mut self, code: u8, args: &[u8]);

	/// Handles a `VDU 23, mode, ...` system command with its argument bytes.
	fn sys(&mut self, mode: u8, args: &[u8]);
}

/// A [`Screen`] ignoring every command.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullScreen;

impl Screen for NullScreen {
	fn vdu(&mut self, _code: u8, _args: &[u8]) { }

	fn sys(&mut self, _mode: u8, _args: &[u8]) { }
}

impl<S: Screen + ?Sized> Screen for &mut S {
	fn vdu(&mut self, code: u8, args: &[u8]) { (**self).vdu(code, args) }

	fn sys(&mut self, mode: u8, args: &[u8]) { (**self).sys(mode, args) }
}

impl<S: Screen + ?Sized> Screen for Box<S> {
	fn vdu(&mut self, code: u8, args: &[u8]) { (**self).vdu(code, args) }

	fn sys(&mut self, mode: u8, args: &[u8]) { (**self).sys(mode, args) }
}
