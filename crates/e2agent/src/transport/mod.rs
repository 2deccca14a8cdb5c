// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport endpoints connecting the agent to the RIC.
//!
//! The reactor only needs a pollable handle, a way to send one PDU and a way
//! to take the next received PDU. Two endpoints implement [`Transport`]:
//!
//! - [`TcpEndpoint`]: length-prefixed PDUs over a TCP stream
//! - [`ChannelTransport`]: in-process pair for simulators and tests

mod channel;
pub mod frame_codec;
mod tcp;

pub use channel::{ChannelPeer, ChannelTransport};
pub use frame_codec::{FrameCodec, FRAME_HEADER_SIZE};
pub use tcp::TcpEndpoint;

use std::io;

use crate::rt::SourceHandle;

/// Outcome of one receive on a readable endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportMessage {
    /// One complete PDU.
    Payload(Vec<u8>),
    /// The association is gone; no further payload will arrive.
    SessionEnded { reason: String },
}

/// Reliable, message-oriented endpoint.
pub trait Transport: Send {
    /// Readable handle registered with the multiplexer.
    fn source(&self) -> SourceHandle;

    /// Transmit one PDU.
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Take at most one received PDU.
    ///
    /// `None` when nothing complete is available yet. The reactor re-arms the
    /// source after each call, so remaining data is reported again.
    fn receive(&mut self) -> Option<TransportMessage>;
}
