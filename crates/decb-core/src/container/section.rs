//! Section summaries.

/// Summary of one sealed section.
///
/// The section's raw bytes are handed to the registered
/// [`SectionSink`](crate::container::sink::SectionSink) when the section
/// seals; only this summary is retained in the decode report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionInfo {
    /// 1-based index, assigned in discovery order.
    pub index: u32,
    /// Address the section's bytes are meant to be loaded at.
    pub load_address: u16,
    /// Declared (and actual) number of data bytes.
    pub length: u16,
}
