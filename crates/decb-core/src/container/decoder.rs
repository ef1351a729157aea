//! The container state machine.
//!
//! One state per byte position in the format's grammar; one `step` call
//! per input byte. All accumulators live in the [`Decoder`] value, which
//! is owned by a single decode invocation and discarded afterwards.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::container::section::SectionInfo;
use crate::container::sink::SectionSink;
use crate::error::{ByteOffset, DecodeContext, DecodeError, DecodeErrorKind, Warning, WarningKind};

/// Decoder states, one per grammar position.
///
/// The `match` over this enum in [`Decoder::step`] is exhaustive, so an
/// out-of-range state is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Expect `0x00` opening the very first preamble. Stricter than
    /// `MagicAmbiguous`: any other byte is fatal.
    PreambleMagic,
    /// High byte of the section length.
    PreambleLenHi,
    /// Low byte of the section length.
    PreambleLenLo,
    /// High byte of the load address.
    PreambleAddrHi,
    /// Low byte of the load address.
    PreambleAddrLo,
    /// Consuming `section_len` data bytes.
    Data,
    /// Marker after a section: `0x00` starts another preamble, `0xFF`
    /// starts the postamble.
    MagicAmbiguous,
    /// First expected-zero filler byte.
    PostambleZero1,
    /// Second expected-zero filler byte.
    PostambleZero2,
    /// High byte of the execution address.
    PostambleExecHi,
    /// Low byte of the execution address.
    PostambleExecLo,
    /// Terminal; the stream must end exactly here.
    End,
}

/// The parse cursor: current state plus the accumulators shared across
/// transitions.
#[derive(Debug)]
pub(crate) struct Decoder {
    state: State,
    section_len: u16,
    load_addr: u16,
    exec_addr: u16,
    data_count: usize,
    buf: Vec<u8>,
    sections: Vec<SectionInfo>,
    warnings: Vec<Warning>,
    index: u32,
}

impl Decoder {
    pub(crate) fn new() -> Self {
        Self {
            state: State::PreambleMagic,
            section_len: 0,
            load_addr: 0,
            exec_addr: 0,
            data_count: 0,
            buf: Vec::new(),
            sections: Vec::new(),
            warnings: Vec::new(),
            index: 0,
        }
    }

    /// Consume one byte at `offset`.
    pub(crate) fn step<S: SectionSink>(
        &mut self,
        offset: usize,
        byte: u8,
        sink: &mut S,
    ) -> Result<(), DecodeError> {
        match self.state {
            State::PreambleMagic => {
                if byte != 0x00 {
                    return Err(DecodeError {
                        offset: ByteOffset(offset),
                        context: DecodeContext::PreambleMagic,
                        kind: DecodeErrorKind::InvalidMagic { found: byte },
                    });
                }
                self.state = State::PreambleLenHi;
            }
            State::PreambleLenHi => {
                self.section_len = u16::from(byte) << 8;
                self.state = State::PreambleLenLo;
            }
            State::PreambleLenLo => {
                self.section_len |= u16::from(byte);
                self.state = State::PreambleAddrHi;
            }
            State::PreambleAddrHi => {
                self.load_addr = u16::from(byte) << 8;
                self.state = State::PreambleAddrLo;
            }
            State::PreambleAddrLo => {
                self.load_addr |= u16::from(byte);
                self.data_count = 0;
                self.buf.clear();
                self.index += 1;
                sink.on_section_start(&SectionInfo {
                    index: self.index,
                    load_address: self.load_addr,
                    length: self.section_len,
                });
                self.state = State::Data;
            }
            State::Data => {
                // The satisfaction check runs once per byte, before any
                // consumption: a zero-length section seals here and the
                // current byte belongs to the next marker.
                if self.data_count == usize::from(self.section_len) {
                    self.seal(offset, sink)?;
                    self.state = State::MagicAmbiguous;
                    return self.step(offset, byte, sink);
                }
                self.buf.push(byte);
                self.data_count += 1;
                if self.data_count == usize::from(self.section_len) {
                    self.seal(offset, sink)?;
                    self.state = State::MagicAmbiguous;
                }
            }
            State::MagicAmbiguous => match byte {
                0x00 => self.state = State::PreambleLenHi,
                0xFF => self.state = State::PostambleZero1,
                found => {
                    return Err(DecodeError {
                        offset: ByteOffset(offset),
                        context: DecodeContext::Marker,
                        kind: DecodeErrorKind::MissingMagic { found },
                    });
                }
            },
            State::PostambleZero1 => {
                if byte != 0x00 {
                    self.warnings.push(Warning {
                        offset: ByteOffset(offset),
                        kind: WarningKind::NonZeroFiller {
                            slot: 1,
                            found: byte,
                        },
                    });
                }
                self.state = State::PostambleZero2;
            }
            State::PostambleZero2 => {
                if byte != 0x00 {
                    self.warnings.push(Warning {
                        offset: ByteOffset(offset),
                        kind: WarningKind::NonZeroFiller {
                            slot: 2,
                            found: byte,
                        },
                    });
                }
                self.state = State::PostambleExecHi;
            }
            State::PostambleExecHi => {
                self.exec_addr = u16::from(byte) << 8;
                self.state = State::PostambleExecLo;
            }
            State::PostambleExecLo => {
                self.exec_addr |= u16::from(byte);
                self.state = State::End;
            }
            State::End => {
                return Err(DecodeError {
                    offset: ByteOffset(offset),
                    context: DecodeContext::Marker,
                    kind: DecodeErrorKind::TrailingByte { found: byte },
                });
            }
        }
        Ok(())
    }

    /// Seal the in-flight section and deliver it to the sink.
    ///
    /// A sink refusal surfaces as a fatal decode error and the refused
    /// section is not counted as sealed.
    fn seal<S: SectionSink>(&mut self, offset: usize, sink: &mut S) -> Result<(), DecodeError> {
        let info = SectionInfo {
            index: self.index,
            load_address: self.load_addr,
            length: self.section_len,
        };
        sink.on_section(&info, &self.buf).map_err(|e| DecodeError {
            offset: ByteOffset(offset),
            context: DecodeContext::SectionData { index: info.index },
            kind: DecodeErrorKind::Sink(e),
        })?;
        self.sections.push(info);
        Ok(())
    }

    /// Whether the machine reached the terminal state.
    pub(crate) fn is_done(&self) -> bool {
        self.state == State::End
    }

    /// Context describing what the machine was waiting for, used to tag a
    /// truncation error.
    pub(crate) fn pending_context(&self) -> DecodeContext {
        match self.state {
            State::PreambleMagic => DecodeContext::PreambleMagic,
            State::PreambleLenHi | State::PreambleLenLo => DecodeContext::SectionLength,
            State::PreambleAddrHi | State::PreambleAddrLo => DecodeContext::LoadAddress,
            State::Data => DecodeContext::SectionData { index: self.index },
            State::MagicAmbiguous | State::End => DecodeContext::Marker,
            State::PostambleZero1 | State::PostambleZero2 => DecodeContext::PostambleFiller,
            State::PostambleExecHi | State::PostambleExecLo => DecodeContext::ExecAddress,
        }
    }

    pub(crate) fn exec_addr(&self) -> u16 {
        self.exec_addr
    }

    pub(crate) fn into_parts(self) -> (Vec<SectionInfo>, Vec<Warning>) {
        (self.sections, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::program::Program;
    use crate::container::sink::VecSink;
    use crate::error::SinkError;

    #[test]
    fn zero_length_section_seals_without_consuming_marker() {
        let bytes = [
            0x00, // preamble magic
            0x00, 0x00, // length 0
            0x3F, 0x00, // load address 0x3F00
            0xFF, // postamble marker, must not be eaten as data
            0x00, 0x00, // filler
            0x3F, 0x02, // exec address
        ];
        let mut sink = VecSink::default();
        let program = Program::decode(&bytes, &mut sink).unwrap();

        assert_eq!(program.sections.len(), 1);
        assert_eq!(program.sections[0].length, 0);
        assert_eq!(program.sections[0].load_address, 0x3F00);
        assert_eq!(program.exec_address, 0x3F02);
        assert!(sink.sections[0].1.is_empty());
    }

    #[test]
    fn zero_length_section_followed_by_another_section() {
        let bytes = [
            0x00, 0x00, 0x00, 0x10, 0x00, // empty section at 0x1000
            0x00, 0x00, 0x01, 0x20, 0x00, // 1-byte section at 0x2000
            0xAA, // its data
            0xFF, 0x00, 0x00, 0x20, 0x00, // postamble
        ];
        let mut sink = VecSink::default();
        let program = Program::decode(&bytes, &mut sink).unwrap();

        assert_eq!(program.sections.len(), 2);
        assert_eq!(program.sections[0].index, 1);
        assert_eq!(program.sections[0].length, 0);
        assert_eq!(program.sections[1].index, 2);
        assert_eq!(sink.sections[1].1, vec![0xAA]);
    }

    #[test]
    fn bad_marker_after_sealed_section() {
        let bytes = [
            0x00, 0x00, 0x01, 0x10, 0x00, // 1-byte section at 0x1000
            0xEE, // its data
            0x55, // neither 0x00 nor 0xFF
        ];
        let mut sink = VecSink::default();
        let failure = Program::decode(&bytes, &mut sink).unwrap_err();

        assert_eq!(
            failure.error.kind,
            DecodeErrorKind::MissingMagic { found: 0x55 }
        );
        assert_eq!(failure.error.offset, ByteOffset(6));
        // The preceding section was sealed and delivered before the error.
        assert_eq!(failure.sections.len(), 1);
        assert_eq!(sink.sections.len(), 1);
    }

    #[test]
    fn nonzero_fillers_warn_but_decode_succeeds() {
        let bytes = [
            0x00, 0x00, 0x01, 0x10, 0x00, 0xEE, // one section
            0xFF, 0x12, 0x34, // postamble with bogus fillers
            0x20, 0x00, // exec address
        ];
        let mut sink = VecSink::default();
        let program = Program::decode(&bytes, &mut sink).unwrap();

        assert_eq!(program.exec_address, 0x2000);
        assert_eq!(program.warnings.len(), 2);
        assert_eq!(
            program.warnings[0].kind,
            WarningKind::NonZeroFiller {
                slot: 1,
                found: 0x12
            }
        );
        assert_eq!(program.warnings[0].offset, ByteOffset(7));
        assert_eq!(
            program.warnings[1].kind,
            WarningKind::NonZeroFiller {
                slot: 2,
                found: 0x34
            }
        );
        assert_eq!(program.warnings[1].offset, ByteOffset(8));
    }

    #[test]
    fn every_strict_prefix_is_truncated() {
        let full = decb_testdata::container(&[(0x1000, &[0xDE, 0xAD]), (0x2000, &[])], 0x2000);
        for cut in 0..full.len() {
            let mut sink = VecSink::default();
            let failure = Program::decode(&full[..cut], &mut sink).unwrap_err();
            assert_eq!(
                failure.error.kind,
                DecodeErrorKind::TruncatedStream,
                "prefix of {cut} bytes"
            );
            assert_eq!(failure.error.offset, ByteOffset(cut));
        }
    }

    #[test]
    fn truncation_keeps_sections_sealed_so_far() {
        let full = decb_testdata::container(&[(0x1000, &[0xDE, 0xAD]), (0x2000, &[0x01])], 0x2000);
        // Cut inside the second section's preamble: first section is sealed.
        let mut sink = VecSink::default();
        let failure = Program::decode(&full[..9], &mut sink).unwrap_err();

        assert_eq!(failure.error.kind, DecodeErrorKind::TruncatedStream);
        assert_eq!(failure.sections.len(), 1);
        assert_eq!(failure.sections[0].load_address, 0x1000);
        assert_eq!(sink.sections.len(), 1);
    }

    #[test]
    fn section_start_is_announced_before_any_data_byte() {
        // Preamble complete, then the stream dies mid-data: the in-flight
        // section's address and length were still reported.
        let bytes = [0x00, 0x00, 0x02, 0x10, 0x00, 0xDE];
        let mut sink = VecSink::default();
        let failure = Program::decode(&bytes, &mut sink).unwrap_err();

        assert_eq!(failure.error.kind, DecodeErrorKind::TruncatedStream);
        assert!(failure.sections.is_empty());
        assert_eq!(
            sink.started,
            vec![SectionInfo {
                index: 1,
                load_address: 0x1000,
                length: 2,
            }]
        );
        assert!(sink.sections.is_empty());
    }

    #[test]
    fn every_section_is_started_then_sealed() {
        let bytes = decb_testdata::container(&[(0x1000, &[0xDE, 0xAD]), (0x2000, &[])], 0x2000);
        let mut sink = VecSink::default();
        let program = Program::decode(&bytes, &mut sink).unwrap();

        assert_eq!(program.sections.len(), 2);
        assert_eq!(sink.started, program.sections);
        assert_eq!(sink.started.len(), sink.sections.len());
    }

    #[test]
    fn empty_input_is_truncated_at_offset_zero() {
        let mut sink = VecSink::default();
        let failure = Program::decode(&[], &mut sink).unwrap_err();
        assert_eq!(failure.error.kind, DecodeErrorKind::TruncatedStream);
        assert_eq!(failure.error.offset, ByteOffset(0));
        assert_eq!(failure.error.context, DecodeContext::PreambleMagic);
    }

    #[test]
    fn trailing_byte_after_postamble_is_rejected() {
        let mut bytes = decb_testdata::container(&[(0x1000, &[0xDE])], 0x1000);
        bytes.push(0x00);
        let mut sink = VecSink::default();
        let failure = Program::decode(&bytes, &mut sink).unwrap_err();

        assert_eq!(
            failure.error.kind,
            DecodeErrorKind::TrailingByte { found: 0x00 }
        );
        assert_eq!(failure.error.offset, ByteOffset(bytes.len() - 1));
        // Everything before the trailing byte was still decoded.
        assert_eq!(failure.sections.len(), 1);
    }

    /// Sink that refuses every section after the first.
    struct FailSecond {
        delivered: usize,
    }

    impl SectionSink for FailSecond {
        fn on_section(&mut self, _: &SectionInfo, _: &[u8]) -> Result<(), SinkError> {
            self.delivered += 1;
            if self.delivered > 1 {
                return Err(SinkError::new("disk full"));
            }
            Ok(())
        }
    }

    #[test]
    fn sink_error_aborts_decode() {
        let bytes = decb_testdata::container(&[(0x1000, &[0x01]), (0x2000, &[0x02])], 0x1000);
        let mut sink = FailSecond { delivered: 0 };
        let failure = Program::decode(&bytes, &mut sink).unwrap_err();

        assert_eq!(
            failure.error.kind,
            DecodeErrorKind::Sink(SinkError::new("disk full"))
        );
        // Only the section the sink accepted counts as sealed.
        assert_eq!(failure.sections.len(), 1);
        assert_eq!(failure.sections[0].index, 1);
    }

    #[test]
    fn addresses_and_lengths_are_big_endian() {
        let bytes = [
            0x00, 0x01, 0x02, // length 0x0102
            0x0E, 0x00, // load address 0x0E00
        ];
        let mut decoder = Decoder::new();
        let mut sink = VecSink::default();
        for (offset, &b) in bytes.iter().enumerate() {
            decoder.step(offset, b, &mut sink).unwrap();
        }
        assert_eq!(decoder.section_len, 0x0102);
        assert_eq!(decoder.load_addr, 0x0E00);
        assert_eq!(decoder.state, State::Data);
    }
}
