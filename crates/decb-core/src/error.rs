//! Error and diagnostic types for container decoding.
//!
//! All errors carry byte offsets into the original stream and structured
//! context, enabling precise diagnostic messages. Warnings are the
//! non-fatal counterpart: they are recorded and decoding continues.

use core::fmt;

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::container::section::SectionInfo;

/// The byte offset into the container stream where a condition was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteOffset(pub usize);

/// Contextual information about what was being decoded when the error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeContext {
    /// The mandatory `0x00` opening the very first preamble.
    PreambleMagic,
    /// The 16-bit section length field of a preamble.
    SectionLength,
    /// The 16-bit load address field of a preamble.
    LoadAddress,
    /// The data bytes of the section with the given 1-based index.
    SectionData { index: u32 },
    /// The marker byte separating a section from what follows.
    Marker,
    /// One of the two expected-zero postamble filler bytes.
    PostambleFiller,
    /// The 16-bit execution address closing the postamble.
    ExecAddress,
}

impl fmt::Display for DecodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeContext::PreambleMagic => write!(f, "preamble magic"),
            DecodeContext::SectionLength => write!(f, "section length"),
            DecodeContext::LoadAddress => write!(f, "load address"),
            DecodeContext::SectionData { index } => write!(f, "section {index} data"),
            DecodeContext::Marker => write!(f, "preamble/postamble marker"),
            DecodeContext::PostambleFiller => write!(f, "postamble filler"),
            DecodeContext::ExecAddress => write!(f, "execution address"),
        }
    }
}

/// Errors that can occur during container decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Byte offset into the stream where the error was detected.
    pub offset: ByteOffset,
    /// What was being decoded.
    pub context: DecodeContext,
    /// The specific error kind.
    pub kind: DecodeErrorKind,
}

/// Specific categories of decode errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// First byte of the stream is not the `0x00` preamble marker.
    InvalidMagic { found: u8 },
    /// Marker after a section's data is neither `0x00` nor `0xFF`.
    MissingMagic { found: u8 },
    /// Input exhausted before the postamble completed.
    TruncatedStream,
    /// A byte was seen after the postamble; exactly one container per stream.
    TrailingByte { found: u8 },
    /// The section sink refused a sealed section.
    #[cfg(feature = "alloc")]
    Sink(SinkError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "decode error at byte {}: {}: {}",
            self.offset.0, self.context, self.kind
        )
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::InvalidMagic { found } => {
                write!(f, "invalid magic {found:#04x} (expected 0x00)")
            }
            DecodeErrorKind::MissingMagic { found } => {
                write!(
                    f,
                    "marker {found:#04x} is neither 0x00 (next section) nor 0xff (postamble)"
                )
            }
            DecodeErrorKind::TruncatedStream => {
                write!(f, "stream ended before the container completed")
            }
            DecodeErrorKind::TrailingByte { found } => {
                write!(f, "unexpected byte {found:#04x} after the postamble")
            }
            #[cfg(feature = "alloc")]
            DecodeErrorKind::Sink(e) => write!(f, "section sink failed: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

#[cfg(not(feature = "std"))]
impl core::error::Error for DecodeError {}

/// Failure reported by a [`SectionSink`](crate::container::sink::SectionSink).
///
/// The core never performs I/O itself, so a sink failure crosses back into
/// the decoder as an opaque message.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    pub message: String,
}

#[cfg(feature = "alloc")]
impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(feature = "alloc")]
impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SinkError {}

#[cfg(all(feature = "alloc", not(feature = "std")))]
impl core::error::Error for SinkError {}

/// A non-fatal anomaly recorded while decoding continued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Warning {
    /// Byte offset of the offending byte.
    pub offset: ByteOffset,
    pub kind: WarningKind,
}

/// Specific categories of warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A postamble filler byte (slot 1 or 2) was not `0x00`.
    NonZeroFiller { slot: u8, found: u8 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::NonZeroFiller { slot, found } => write!(
                f,
                "byte {}: postamble filler {slot} is {found:#04x} (expected 0x00)",
                self.offset.0
            ),
        }
    }
}

/// A failed decode: the error plus everything produced before it.
///
/// Sections fully sealed before the failure point still appear here, so a
/// caller can report how far the stream was intact.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    /// The fatal error that stopped the decode.
    pub error: DecodeError,
    /// Sections sealed (and delivered to the sink) before the error.
    pub sections: Vec<SectionInfo>,
    /// Warnings recorded before the error.
    pub warnings: Vec<Warning>,
}

#[cfg(feature = "alloc")]
impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeFailure {}

#[cfg(all(feature = "alloc", not(feature = "std")))]
impl core::error::Error for DecodeFailure {}
