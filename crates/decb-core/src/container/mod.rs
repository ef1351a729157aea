//! DECB container format decoding.
//!
//! A container interleaves one or more sections, each introduced by a
//! 5-byte preamble (`0x00`, big-endian length, big-endian load address)
//! and followed by exactly `length` data bytes, with a trailing postamble
//! (`0xFF`, two zero filler bytes, big-endian execution address).

pub mod decoder;
pub mod program;
pub mod section;
pub mod sink;
