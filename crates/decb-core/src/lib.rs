//! DECB binary container decoder core.
//!
//! A `no_std` decoder for the machine-language binary format produced by
//! Disk Extended Color BASIC's `SAVEM` on the TRS-80 Color Computer.
//! Splits a container into its load sections and reports the execution
//! address. Designed to embed cleanly into emulators, ROM tooling, or a
//! plain CLI.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod container;
pub mod error;
