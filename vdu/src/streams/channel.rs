// SPDX-License-Identifier: Apache-2.0

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use crate::{Context, Error, Result};
use super::{Duplex, Sink, Source};

/// Returns a connected pair: a host-side sender for command bytes and a
/// receiver for responses, and the session-side [`Transport`](super::Transport).
pub fn channel_transport() -> ((Sender<u8>, Receiver<u8>), Duplex<ChannelSource, ChannelSink>) {
	let (host_tx, vdp_rx) = channel();
	let (vdp_tx, host_rx) = channel();
	(
		(host_tx, host_rx),
		Duplex::new(ChannelSource::from(vdp_rx), ChannelSink::from(vdp_tx))
	)
}

/// A [`Source`] receiving bytes from another thread.
#[derive(Debug)]
pub struct ChannelSource {
	rx: Receiver<u8>,
	peeked: Option<u8>,
	closed: bool,
}

impl From<Receiver<u8>> for ChannelSource {
	fn from(rx: Receiver<u8>) -> Self {
		Self { rx, peeked: None, closed: false }
	}
}

impl Source for ChannelSource {
	fn available(&mut self) -> bool {
		if self.peeked.is_some() { return true }

		match self.rx.try_recv() {
			Ok(byte) => {
				self.peeked = Some(byte);
				true
			}
			Err(TryRecvError::Empty) => false,
			Err(TryRecvError::Disconnected) => {
				self.closed = true;
				false
			}
		}
	}

	fn read_byte(&mut self) -> Result<u8> {
		if let Some(byte) = self.peeked.take() { return Ok(byte) }

		self.rx.recv().map_err(|_| {
			self.closed = true;
			Error::closed(Context::Read)
		})
	}

	fn read_byte_timeout(&mut self, timeout: Duration) -> Result<u8> {
		if let Some(byte) = self.peeked.take() { return Ok(byte) }

		match self.rx.recv_timeout(timeout) {
			Ok(byte) => Ok(byte),
			Err(RecvTimeoutError::Timeout) => Err(Error::timeout(Context::Read)),
			Err(RecvTimeoutError::Disconnected) => {
				self.closed = true;
				Err(Error::closed(Context::Read))
			}
		}
	}

	fn is_closed(&self) -> bool { self.closed && self.peeked.is_none() }
}

/// A [`Sink`] sending bytes to another thread.
#[derive(Clone, Debug)]
pub struct ChannelSink {
	tx: Sender<u8>,
}

impl From<Sender<u8>> for ChannelSink {
	fn from(tx: Sender<u8>) -> Self { Self { tx } }
}

impl Sink for ChannelSink {
	fn write_byte(&mut self, value: u8) -> Result {
		self.tx.send(value).map_err(|_| Error::closed(Context::Write))
	}
}
