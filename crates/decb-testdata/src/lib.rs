//! DECB container byte streams assembled in memory for tests.
//!
//! [`container`] builds a well-formed stream from (load address, payload)
//! pairs; [`fixture_bytes`] returns a handful of named streams shared
//! across the workspace tests. This is test tooling only — the decoder
//! itself has no encoding surface.

/// Assemble a container: one preamble + payload per section, then the
/// postamble with two zero fillers and the execution address.
///
/// Panics if a payload exceeds the format's 16-bit length field.
pub fn container(sections: &[(u16, &[u8])], exec_address: u16) -> Vec<u8> {
    let mut out = Vec::new();
    for (load_address, payload) in sections {
        let length = u16::try_from(payload.len())
            .unwrap_or_else(|_| panic!("payload of {} bytes exceeds u16", payload.len()));
        out.push(0x00);
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&load_address.to_be_bytes());
        out.extend_from_slice(payload);
    }
    out.push(0xFF);
    out.extend_from_slice(&[0x00, 0x00]);
    out.extend_from_slice(&exec_address.to_be_bytes());
    out
}

/// Get a named canonical stream.
pub fn fixture_bytes(name: &str) -> Vec<u8> {
    match name {
        // 2-byte section at 0x1000, exec 0x2000.
        "single" => container(&[(0x1000, &[0xDE, 0xAD])], 0x2000),
        // Loader stub at 0x0E00 plus data at 0x4000, exec at the stub.
        "two_sections" => container(&[(0x0E00, &[0x8E, 0x40, 0x00, 0x39]), (0x4000, &[0xFF])], 0x0E00),
        // Single empty section, exec right at its load address.
        "zero_length" => container(&[(0x3F00, &[])], 0x3F00),
        _ => panic!("unknown fixture '{name}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_fixture_matches_worked_example() {
        assert_eq!(
            fixture_bytes("single"),
            [0x00, 0x00, 0x02, 0x10, 0x00, 0xDE, 0xAD, 0xFF, 0x00, 0x00, 0x20, 0x00]
        );
    }

    #[test]
    fn empty_container_is_postamble_only() {
        assert_eq!(container(&[], 0x1234), [0xFF, 0x00, 0x00, 0x12, 0x34]);
    }

    #[test]
    fn zero_length_fixture_has_no_data_bytes() {
        let bytes = fixture_bytes("zero_length");
        // 5-byte preamble + 5-byte postamble, nothing in between.
        assert_eq!(bytes.len(), 10);
        assert_eq!(&bytes[1..3], &[0x00, 0x00]);
    }
}
