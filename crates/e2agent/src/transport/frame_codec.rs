// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Length-prefix framing for E2AP PDUs carried over a TCP stream.
//!
//! ```text
//! +----------------+-------------------+
//! | Length (4B BE) | Encoded E2AP PDU  |
//! +----------------+-------------------+
//! ```
//!
//! The length covers the payload only, not the 4-byte header. The decoder
//! reads exactly the bytes of the current frame, so nothing belonging to the
//! next frame is ever held in user space: once a frame is returned, whatever
//! is left stays in the socket buffer.

use std::io::{self, Read};

/// Frame header size (4 bytes for length).
pub const FRAME_HEADER_SIZE: usize = 4;

/// Incremental decoder for length-prefixed frames.
#[derive(Debug)]
pub struct FrameCodec {
    state: ReadState,
    buffer: Vec<u8>,
    /// Frames above this size are rejected.
    max_size: usize,
    frames_decoded: u64,
}

#[derive(Debug, Clone, Copy)]
enum ReadState {
    ReadingLength { bytes_read: usize },
    ReadingBody { expected_len: usize, bytes_read: usize },
}

impl Default for ReadState {
    fn default() -> Self {
        ReadState::ReadingLength { bytes_read: 0 }
    }
}

impl FrameCodec {
    pub fn new(max_size: usize) -> Self {
        Self {
            state: ReadState::default(),
            buffer: vec![0u8; FRAME_HEADER_SIZE],
            max_size,
            frames_decoded: 0,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Build `[length: u32 BE][payload]`.
    pub fn encode(payload: &[u8]) -> Vec<u8> {
        let len = payload.len() as u32;
        let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(payload);
        frame
    }

    /// Try to decode one complete frame from `reader`.
    ///
    /// - `Ok(Some(data))`: a frame is complete
    /// - `Ok(None)`: the reader would block before the frame is complete
    /// - `Err(UnexpectedEof)`: the peer closed the stream
    /// - `Err(InvalidData)`: the announced length exceeds the maximum
    pub fn decode<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<Option<Vec<u8>>> {
        loop {
            match self.state {
                ReadState::ReadingLength { bytes_read } => {
                    match reader.read(&mut self.buffer[bytes_read..FRAME_HEADER_SIZE]) {
                        Ok(0) => {
                            let msg = if bytes_read == 0 {
                                "connection closed"
                            } else {
                                "incomplete frame header"
                            };
                            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, msg));
                        }
                        Ok(n) => {
                            let total = bytes_read + n;
                            if total < FRAME_HEADER_SIZE {
                                self.state = ReadState::ReadingLength { bytes_read: total };
                                continue;
                            }

                            let len = u32::from_be_bytes([
                                self.buffer[0],
                                self.buffer[1],
                                self.buffer[2],
                                self.buffer[3],
                            ]) as usize;

                            if len > self.max_size {
                                self.state = ReadState::default();
                                return Err(io::Error::new(
                                    io::ErrorKind::InvalidData,
                                    format!("frame too large: {} bytes (max {})", len, self.max_size),
                                ));
                            }

                            if len == 0 {
                                self.frames_decoded += 1;
                                self.state = ReadState::default();
                                return Ok(Some(Vec::new()));
                            }

                            self.buffer.resize(len, 0);
                            self.state = ReadState::ReadingBody {
                                expected_len: len,
                                bytes_read: 0,
                            };
                        }
                        Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => return Err(e),
                    }
                }

                ReadState::ReadingBody {
                    expected_len,
                    bytes_read,
                } => match reader.read(&mut self.buffer[bytes_read..expected_len]) {
                    Ok(0) => {
                        return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "incomplete frame body",
                        ));
                    }
                    Ok(n) => {
                        let total = bytes_read + n;
                        if total < expected_len {
                            self.state = ReadState::ReadingBody {
                                expected_len,
                                bytes_read: total,
                            };
                            continue;
                        }

                        let message = self.buffer[..expected_len].to_vec();
                        self.frames_decoded += 1;
                        self.buffer.resize(FRAME_HEADER_SIZE, 0);
                        self.state = ReadState::default();
                        return Ok(Some(message));
                    }
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                },
            }
        }
    }

    /// Whether a frame is partially read.
    pub fn is_partial(&self) -> bool {
        match self.state {
            ReadState::ReadingLength { bytes_read } => bytes_read > 0,
            ReadState::ReadingBody { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader yielding one chunk per call, then `WouldBlock`.
    struct Chunked {
        chunks: Vec<Vec<u8>>,
    }

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Err(io::ErrorKind::WouldBlock.into());
            }
            let chunk = &mut self.chunks[0];
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            chunk.drain(..n);
            if chunk.is_empty() {
                self.chunks.remove(0);
            }
            Ok(n)
        }
    }

    #[test]
    fn test_encode_prefixes_length() {
        let frame = FrameCodec::encode(b"e2ap");
        assert_eq!(&frame[..4], &[0, 0, 0, 4]);
        assert_eq!(&frame[4..], b"e2ap");
    }

    #[test]
    fn test_decode_back_to_back_frames() {
        let mut bytes = FrameCodec::encode(b"first");
        bytes.extend(FrameCodec::encode(b""));
        bytes.extend(FrameCodec::encode(b"third"));
        let mut cursor = Cursor::new(bytes);
        let mut codec = FrameCodec::new(1024);

        assert_eq!(codec.decode(&mut cursor).expect("1"), Some(b"first".to_vec()));
        assert_eq!(codec.decode(&mut cursor).expect("2"), Some(Vec::new()));
        assert_eq!(codec.decode(&mut cursor).expect("3"), Some(b"third".to_vec()));
        assert_eq!(codec.frames_decoded(), 3);

        let err = codec.decode(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_partial_reads_resume() {
        let frame = FrameCodec::encode(b"subscription");
        let mut reader = Chunked {
            chunks: vec![frame[..2].to_vec(), frame[2..7].to_vec()],
        };
        let mut codec = FrameCodec::new(1024);

        assert_eq!(codec.decode(&mut reader).expect("partial"), None);
        assert!(codec.is_partial());

        reader.chunks.push(frame[7..].to_vec());
        assert_eq!(
            codec.decode(&mut reader).expect("complete"),
            Some(b"subscription".to_vec())
        );
        assert!(!codec.is_partial());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let frame = FrameCodec::encode(&[0u8; 64]);
        let mut codec = FrameCodec::new(16);
        let err = codec.decode(&mut Cursor::new(frame)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_body_is_eof() {
        let frame = FrameCodec::encode(b"hello");
        let mut codec = FrameCodec::new(1024);
        let err = codec.decode(&mut Cursor::new(&frame[..6])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
