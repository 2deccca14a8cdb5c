// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! PDU codec contract and the JSON implementation.

use super::E2apMessage;
use crate::error::{Error, Result};

/// Encoder/decoder for E2AP PDUs.
///
/// Buffers are owned `Vec<u8>` values: whatever a caller does with them, they
/// are released when they go out of scope.
pub trait E2apCodec: Send {
    /// Serialize a PDU.
    fn encode(&self, msg: &E2apMessage) -> Result<Vec<u8>>;

    /// Parse a PDU.
    fn decode(&self, bytes: &[u8]) -> Result<E2apMessage>;
}

/// JSON encoding (`serde_json`), used by simulated controllers and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl E2apCodec for JsonCodec {
    fn encode(&self, msg: &E2apMessage) -> Result<Vec<u8>> {
        serde_json::to_vec(msg).map_err(|e| Error::Codec(format!("encode {}: {}", msg.name(), e)))
    }

    fn decode(&self, bytes: &[u8]) -> Result<E2apMessage> {
        serde_json::from_slice(bytes).map_err(|e| Error::Codec(format!("decode: {}", e)))
    }
}
