// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fmt::{Display, Formatter};

/// The reserved id referring to a processor's original output.
pub const DEFAULT_ID: u16 = 0;
/// The reserved sentinel id, meaning "no buffer", "no output", or "all buffers"
/// depending on the operation.
pub const NONE_ID: u16 = 0xFFFF;

/// A buffer id decoded from the wire, with the two reserved values split out.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Id {
	/// Id `0`: the original output sink.
	Default,
	/// Id `0xFFFF`: nothing, or everything.
	#[default]
	None,
	/// Any other id, naming an ordinary buffer.
	Buffer(u16),
}

impl Id {
	/// Returns the raw wire value.
	pub const fn raw(self) -> u16 {
		match self {
			Self::Default => DEFAULT_ID,
			Self::None => NONE_ID,
			Self::Buffer(id) => id
		}
	}

	/// Returns `true` if the id is one of the two reserved values.
	pub const fn is_reserved(self) -> bool {
		!matches!(self, Self::Buffer(_))
	}
}

impl From<u16> for Id {
	fn from(value: u16) -> Self {
		match value {
			DEFAULT_ID => Self::Default,
			NONE_ID => Self::None,
			id => Self::Buffer(id)
		}
	}
}

impl From<Id> for u16 {
	fn from(value: Id) -> Self { value.raw() }
}

impl Display for Id {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default => f.write_str("default"),
			Self::None => f.write_str("none"),
			Self::Buffer(id) => write!(f, "{id}")
		}
	}
}
