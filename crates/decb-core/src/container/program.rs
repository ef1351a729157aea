//! Top-level container decoding.
//!
//! Produces a [`Program`] — the decode report: ordered section summaries
//! plus the footer's execution address. Section bytes themselves go to the
//! caller's [`SectionSink`] as each section seals.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::container::decoder::Decoder;
use crate::container::section::SectionInfo;
use crate::container::sink::SectionSink;
use crate::error::{ByteOffset, DecodeError, DecodeErrorKind, DecodeFailure, Warning};

/// A fully decoded container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Section summaries in discovery order.
    pub sections: Vec<SectionInfo>,
    /// Entry point the loaded program should jump to.
    pub exec_address: u16,
    /// Non-fatal anomalies recorded along the way.
    pub warnings: Vec<Warning>,
}

impl Program {
    /// Decode a container byte stream.
    ///
    /// The whole input must already be in memory; the decoder makes one
    /// linear pass over it. Each sealed section is delivered to `sink`
    /// before the next byte is consumed. On failure the sections sealed
    /// so far are returned alongside the error.
    pub fn decode<S: SectionSink>(bytes: &[u8], sink: &mut S) -> Result<Program, DecodeFailure> {
        let mut decoder = Decoder::new();

        for (offset, &byte) in bytes.iter().enumerate() {
            if let Err(error) = decoder.step(offset, byte, sink) {
                let (sections, warnings) = decoder.into_parts();
                return Err(DecodeFailure {
                    error,
                    sections,
                    warnings,
                });
            }
        }

        if !decoder.is_done() {
            let error = DecodeError {
                offset: ByteOffset(bytes.len()),
                context: decoder.pending_context(),
                kind: DecodeErrorKind::TruncatedStream,
            };
            let (sections, warnings) = decoder.into_parts();
            return Err(DecodeFailure {
                error,
                sections,
                warnings,
            });
        }

        let exec_address = decoder.exec_addr();
        let (sections, warnings) = decoder.into_parts();
        Ok(Program {
            sections,
            exec_address,
            warnings,
        })
    }
}
