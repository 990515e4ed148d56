//! Byte-level input for the `trace_bytes` entry points.
//!
//! Network chunks rarely respect code point boundaries. [`Utf8Buffer`]
//! decodes each chunk and carries an incomplete trailing sequence over to the
//! next one, so splitting a byte stream anywhere yields the same characters
//! as decoding it whole. Bytes that can never form a valid sequence decode to
//! U+FFFD.
use alloc::{string::String, vec::Vec};

#[derive(Debug, Clone, Default)]
pub(crate) struct Utf8Buffer {
    carry: Vec<u8>,
}

/// Sequence length announced by a lead byte, 0 for bytes that cannot lead.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

impl Utf8Buffer {
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let joined;
        let mut rest: &[u8] = if self.carry.is_empty() {
            bytes
        } else {
            self.carry.extend_from_slice(bytes);
            joined = core::mem::take(&mut self.carry);
            &joined
        };

        let mut out = String::with_capacity(rest.len());
        while !rest.is_empty() {
            match bstr::decode_utf8(rest) {
                (Some(c), len) => {
                    out.push(c);
                    rest = &rest[len..];
                }
                (None, len) if len == rest.len() && len < sequence_len(rest[0]) => {
                    self.carry.extend_from_slice(rest);
                    break;
                }
                (None, len) => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    rest = &rest[len.max(1)..];
                }
            }
        }
        out
    }

    /// Bytes of an unfinished code point waiting for the next chunk.
    pub fn pending(&self) -> usize {
        self.carry.len()
    }
}
