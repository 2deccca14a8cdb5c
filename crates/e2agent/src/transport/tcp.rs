// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TCP endpoint towards the RIC.

use std::io::{self, Write};
use std::net::{SocketAddr, ToSocketAddrs};
use std::os::fd::AsRawFd;
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use super::frame_codec::FrameCodec;
use super::{Transport, TransportMessage};
use crate::config::AgentConfig;
use crate::error::{Error, Result};
use crate::rt::SourceHandle;

/// Non-blocking TCP stream carrying length-prefixed PDUs.
pub struct TcpEndpoint {
    stream: mio::net::TcpStream,
    peer: SocketAddr,
    codec: FrameCodec,
    /// Upper bound for a single blocked write.
    write_timeout: Duration,
}

impl TcpEndpoint {
    /// Connect to `config.ric_address:config.ric_port`.
    ///
    /// Tries each resolved address in turn, honouring `connect_timeout`.
    pub fn connect(config: &AgentConfig) -> Result<Self> {
        let addrs: Vec<SocketAddr> = (config.ric_address.as_str(), config.ric_port)
            .to_socket_addrs()
            .map_err(|e| {
                Error::ConnectFailed(format!(
                    "resolve {}:{}: {}",
                    config.ric_address, config.ric_port, e
                ))
            })?
            .collect();

        let mut last_err = None;
        for addr in addrs {
            match Self::connect_addr(addr, config) {
                Ok(endpoint) => return Ok(endpoint),
                Err(e) => {
                    log::debug!("[transport] connect {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(Error::ConnectFailed(match last_err {
            Some(e) => format!("{}:{}: {}", config.ric_address, config.ric_port, e),
            None => format!("{}:{}: no address", config.ric_address, config.ric_port),
        }))
    }

    fn connect_addr(addr: SocketAddr, config: &AgentConfig) -> io::Result<Self> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.connect_timeout(&addr.into(), config.connect_timeout)?;
        if config.nodelay {
            socket.set_nodelay(true)?;
        }
        socket.set_nonblocking(true)?;

        let stream = mio::net::TcpStream::from_std(socket.into());
        log::info!("[transport] connected to RIC at {}", addr);
        Ok(Self {
            stream,
            peer: addr,
            codec: FrameCodec::new(config.max_message_size),
            write_timeout: config.connect_timeout,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Block until the socket is writable or `write_timeout` elapses.
    fn wait_writable(&self) -> io::Result<()> {
        let mut pfd = libc::pollfd {
            fd: self.stream.as_raw_fd(),
            events: libc::POLLOUT,
            revents: 0,
        };
        let timeout_ms = self.write_timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
        loop {
            // SAFETY: pfd is a single valid pollfd on the stack and nfds is 1.
            let ret = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
            if ret > 0 {
                return Ok(());
            }
            if ret == 0 {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "socket not writable"));
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

impl Transport for TcpEndpoint {
    fn source(&self) -> SourceHandle {
        SourceHandle::new(self.stream.as_raw_fd())
    }

    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        let frame = FrameCodec::encode(bytes);
        let mut written = 0;
        while written < frame.len() {
            match self.stream.write(&frame[written..]) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => self.wait_writable()?,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn receive(&mut self) -> Option<TransportMessage> {
        match self.codec.decode(&mut self.stream) {
            Ok(Some(payload)) => Some(TransportMessage::Payload(payload)),
            Ok(None) => None,
            Err(e) => {
                log::debug!("[transport] receive from {} failed: {}", self.peer, e);
                Some(TransportMessage::SessionEnded {
                    reason: e.to_string(),
                })
            }
        }
    }
}
