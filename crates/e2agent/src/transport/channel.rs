// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process transport pair.
//!
//! The agent side ([`ChannelTransport`]) is pollable through an eventfd that
//! carries one token per PDU sent by the peer, plus one final token when the
//! peer goes away.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};

use super::{Transport, TransportMessage};
use crate::rt::{EventFd, SourceHandle};

/// Agent side of an in-process link.
pub struct ChannelTransport {
    from_peer: Receiver<Vec<u8>>,
    to_peer: Sender<Vec<u8>>,
    signal: Arc<EventFd>,
}

/// Controller side of an in-process link.
pub struct ChannelPeer {
    to_agent: Option<Sender<Vec<u8>>>,
    from_agent: Receiver<Vec<u8>>,
    signal: Arc<EventFd>,
}

impl ChannelTransport {
    /// Create a connected `(agent side, controller side)` pair.
    pub fn pair() -> io::Result<(ChannelTransport, ChannelPeer)> {
        let signal = Arc::new(EventFd::new()?);
        let (to_agent, from_peer) = channel::unbounded();
        let (to_peer, from_agent) = channel::unbounded();
        Ok((
            ChannelTransport {
                from_peer,
                to_peer,
                signal: Arc::clone(&signal),
            },
            ChannelPeer {
                to_agent: Some(to_agent),
                from_agent,
                signal,
            },
        ))
    }
}

impl Transport for ChannelTransport {
    fn source(&self) -> SourceHandle {
        self.signal.handle()
    }

    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.to_peer
            .send(bytes.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer dropped"))
    }

    fn receive(&mut self) -> Option<TransportMessage> {
        self.signal.consume();
        match self.from_peer.try_recv() {
            Ok(payload) => Some(TransportMessage::Payload(payload)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(TransportMessage::SessionEnded {
                reason: "peer closed".to_string(),
            }),
        }
    }
}

impl ChannelPeer {
    /// Deliver one PDU to the agent.
    pub fn send(&self, bytes: Vec<u8>) -> io::Result<()> {
        let Some(tx) = self.to_agent.as_ref() else {
            return Err(io::ErrorKind::NotConnected.into());
        };
        tx.send(bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "agent dropped"))?;
        self.signal.notify();
        Ok(())
    }

    /// Next PDU sent by the agent, waiting up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<u8>> {
        match self.from_agent.recv_timeout(timeout) {
            Ok(bytes) => Some(bytes),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Next PDU sent by the agent, if one is already queued.
    pub fn try_recv(&self) -> Option<Vec<u8>> {
        self.from_agent.try_recv().ok()
    }
}

impl Drop for ChannelPeer {
    fn drop(&mut self) {
        // Disconnect first so the woken agent observes the closed channel.
        drop(self.to_agent.take());
        self.signal.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_receive_per_peer_send() {
        let (mut agent, peer) = ChannelTransport::pair().expect("pair");
        peer.send(b"a".to_vec()).expect("send a");
        peer.send(b"b".to_vec()).expect("send b");

        assert_eq!(agent.receive(), Some(TransportMessage::Payload(b"a".to_vec())));
        assert_eq!(agent.receive(), Some(TransportMessage::Payload(b"b".to_vec())));
        assert_eq!(agent.receive(), None);
    }

    #[test]
    fn test_agent_send_reaches_peer() {
        let (mut agent, peer) = ChannelTransport::pair().expect("pair");
        agent.send(b"indication").expect("send");
        assert_eq!(
            peer.recv_timeout(Duration::from_millis(100)),
            Some(b"indication".to_vec())
        );
        assert!(peer.try_recv().is_none());
    }

    #[test]
    fn test_dropping_peer_ends_session_after_pending_payloads() {
        let (mut agent, peer) = ChannelTransport::pair().expect("pair");
        peer.send(b"last".to_vec()).expect("send");
        drop(peer);

        assert_eq!(agent.receive(), Some(TransportMessage::Payload(b"last".to_vec())));
        assert!(matches!(
            agent.receive(),
            Some(TransportMessage::SessionEnded { .. })
        ));
        let err = agent.send(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
