// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate error type.
//!
//! Only recoverable conditions are reported through [`Error`]. Broken
//! internal invariants (an unclassifiable readiness event, a pending registry
//! holding more than one entry, an agent without RAN functions) abort with a
//! panic instead.

use std::fmt;
use std::io;

/// Errors returned by the agent API.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// I/O error with underlying cause.
    Io(io::Error),
    /// Could not establish the connection to the controller.
    ConnectFailed(String),
    /// Send operation failed.
    SendFailed(String),
    /// Framing error (oversized or malformed length prefix).
    Frame(String),

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// PDU encoding or decoding failed.
    Codec(String),
    /// Two service models claim the same RAN function id.
    DuplicateRanFunction(u16),
    /// No active subscription carries this RIC request id.
    UnknownRicRequest(u32),

    // ========================================================================
    // Other Errors
    // ========================================================================
    /// Configuration value rejected.
    Config(String),
    /// Invalid state for the requested operation.
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::ConnectFailed(msg) => write!(f, "Connect failed: {}", msg),
            Error::SendFailed(msg) => write!(f, "Send failed: {}", msg),
            Error::Frame(msg) => write!(f, "Framing error: {}", msg),
            Error::Codec(msg) => write!(f, "E2AP codec error: {}", msg),
            Error::DuplicateRanFunction(id) => {
                write!(f, "RAN function {} registered twice", id)
            }
            Error::UnknownRicRequest(id) => write!(f, "Unknown RIC request id {}", id),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Convenient alias for API results using the crate `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
