// SPDX-License-Identifier: Apache-2.0

//! VDU code values and argument lengths.

/// `VDU 23`: system command prefix.
pub const VDU_SYS: u8 = 0x17;

/// `VDU 23, 0`: video system control.
pub const SYS_VIDEO: u8 = 0x00;
/// `VDU 23, 1, n`: cursor control.
pub const SYS_CURSOR: u8 = 0x01;
/// `VDU 23, n` with `n` at or above this value redefines character `n`.
pub const SYS_UDG_FIRST: u8 = 0x20;
/// Argument bytes following a character redefinition.
pub const SYS_UDG_LEN: usize = 8;

/// The most argument bytes any single forwarded command carries.
pub const MAX_VDU_ARGS: usize = 8;

/// `VDU 23, 0, &80, b`: general poll.
pub const VDP_GP: u8 = 0x80;
/// `VDU 23, 0, &A0, id; cmd, ...`: buffered commands.
pub const VDP_BUFFERED: u8 = 0xA0;

/// Response packet code for a general poll.
pub const PACKET_GP: u8 = 0x00;

/// Buffered sub-command: append a segment.
pub const BUFFERED_WRITE: u8 = 0x00;
/// Buffered sub-command: execute a buffer.
pub const BUFFERED_CALL: u8 = 0x01;
/// Buffered sub-command: remove a buffer, or all buffers.
pub const BUFFERED_CLEAR: u8 = 0x02;
/// Buffered sub-command: create a writable buffer.
pub const BUFFERED_CREATE: u8 = 0x03;
/// Buffered sub-command: redirect output.
pub const BUFFERED_SET_OUTPUT: u8 = 0x04;
/// Buffered sub-command: arithmetic on buffer bytes.
pub const BUFFERED_ADJUST: u8 = 0x05;
/// Buffered sub-command: execute a buffer if a condition holds.
pub const BUFFERED_CONDITIONAL: u8 = 0x06;
/// Buffered sub-command: log buffer details.
pub const BUFFERED_DEBUG_INFO: u8 = 0x10;

/// Returns the number of argument bytes following single-byte VDU `code`. `VDU 23`
/// is variable-length and handled separately.
pub const fn vdu_arg_len(code: u8) -> usize {
	match code {
		0x11 => 1, // COLOUR
		0x12 => 2, // GCOL
		0x13 => 5, // define logical colour
		0x16 => 1, // MODE
		0x18 => 8, // graphics viewport
		0x19 => 5, // PLOT
		0x1C => 4, // text viewport
		0x1D => 4, // graphics origin
		0x1F => 2, // TAB
		_ => 0
	}
}

#[cfg(test)]
mod test {
	use super::{MAX_VDU_ARGS, SYS_UDG_LEN, vdu_arg_len};

	#[test]
	fn plain_characters_have_no_args() {
		assert!((0x20..=0x7E).all(|c| vdu_arg_len(c) == 0));
		assert_eq!(vdu_arg_len(0x19), 5);
	}

	#[test]
	fn args_fit_the_argument_buffer() {
		assert!((0..=u8::MAX).all(|code| vdu_arg_len(code) <= MAX_VDU_ARGS));
		assert!(SYS_UDG_LEN <= MAX_VDU_ARGS);
	}
}
