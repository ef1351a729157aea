//! The output side of the decoder.
//!
//! The decoder does not know about storage. Each time a section seals it
//! hands the summary and the accumulated bytes to a [`SectionSink`], which
//! may write them to a file, keep them in memory, or drop them. Sinks are
//! invoked synchronously and in discovery order; a sink error aborts the
//! remaining decode.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::container::section::SectionInfo;
use crate::error::SinkError;

/// Receives each sealed section's bytes.
pub trait SectionSink {
    /// Called when a section's preamble completes — its load address and
    /// declared length are known but no data byte has been consumed yet.
    /// A truncated or aborted stream still announces its in-flight section.
    fn on_section_start(&mut self, section: &SectionInfo) {
        let _ = section;
    }

    /// Called once per sealed section, in discovery order, before the
    /// decoder consumes any further input.
    fn on_section(&mut self, section: &SectionInfo, bytes: &[u8]) -> Result<(), SinkError>;
}

/// A sink that keeps every section in memory.
#[cfg(feature = "alloc")]
#[derive(Debug, Default)]
pub struct VecSink {
    /// Sections whose preamble finished, in discovery order.
    pub started: Vec<SectionInfo>,
    /// Sealed sections in discovery order, with their raw bytes.
    pub sections: Vec<(SectionInfo, Vec<u8>)>,
}

#[cfg(feature = "alloc")]
impl SectionSink for VecSink {
    fn on_section_start(&mut self, section: &SectionInfo) {
        self.started.push(*section);
    }

    fn on_section(&mut self, section: &SectionInfo, bytes: &[u8]) -> Result<(), SinkError> {
        self.sections.push((*section, bytes.to_vec()));
        Ok(())
    }
}
