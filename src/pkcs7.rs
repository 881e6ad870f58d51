//! PKCS7 padding
//!
//! Pads a byte sequence up to a multiple of the block size by appending N
//! bytes of value N. Padding is always applied: an already-aligned input
//! gains a full extra block, so `unpad` is never ambiguous about whether a
//! trailer is padding or data. On unpad the trailer is validated in full and
//! a malformed trailer is an error, never silently tolerated.

use crate::error::{ByteviseError, Result};

/// Append PKCS7 padding so the result length is a multiple of `block_size`.
///
/// # Errors
///
/// Returns a `ContractViolation` error if `block_size` is 0 or exceeds 255,
/// the largest count a padding byte can encode.
pub fn pad(input: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_block_size(block_size)?;

    let n = block_size - (input.len() % block_size);
    let mut output = Vec::with_capacity(input.len() + n);
    output.extend_from_slice(input);
    output.resize(input.len() + n, n as u8);

    Ok(output)
}

/// Validate and remove PKCS7 padding.
///
/// # Errors
///
/// Returns a `ContractViolation` error on a bad `block_size`, and an
/// `InvalidPadding` error if the input is empty, the final byte N is 0 or
/// greater than `block_size`, the input holds fewer than N bytes, or the
/// last N bytes are not all equal to N.
pub fn unpad(input: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_block_size(block_size)?;

    let Some(&last) = input.last() else {
        return Err(ByteviseError::invalid_padding(
            "cannot unpad an empty input",
        ));
    };

    let n = usize::from(last);
    if n == 0 {
        return Err(ByteviseError::invalid_padding(
            "padding byte value must not be 0",
        ));
    }
    if n > block_size {
        return Err(ByteviseError::invalid_padding(format!(
            "padding byte value {} exceeds the block size {}",
            n, block_size
        )));
    }
    if n > input.len() {
        return Err(ByteviseError::invalid_padding(format!(
            "padding byte value {} exceeds the input length {}",
            n,
            input.len()
        )));
    }
    if input[input.len() - n..].iter().any(|&b| b != last) {
        return Err(ByteviseError::invalid_padding(
            "padding trailer bytes are not all equal to the padding count",
        ));
    }

    Ok(input[..input.len() - n].to_vec())
}

fn check_block_size(block_size: usize) -> Result<()> {
    if block_size == 0 || block_size > 255 {
        return Err(ByteviseError::contract_violation(format!(
            "block size must be between 1 and 255, got {}",
            block_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_pad_partial_block() {
        let padded = pad(b"YELLOW SUBMARINE", 20).unwrap();
        assert_eq!(padded, b"YELLOW SUBMARINE\x04\x04\x04\x04");
    }

    #[test]
    fn test_pad_aligned_input_gains_full_block() {
        let padded = pad(&[0xAA; 16], 16).unwrap();
        assert_eq!(padded.len(), 32);
        assert!(padded[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn test_pad_empty_input() {
        let padded = pad(b"", 16).unwrap();
        assert_eq!(padded, vec![16u8; 16]);
    }

    #[test]
    fn test_unpad_roundtrip() {
        for len in 0..64 {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let padded = pad(&data, 16).unwrap();
            assert_eq!(padded.len() % 16, 0);
            assert_eq!(unpad(&padded, 16).unwrap(), data, "len={}", len);
        }
    }

    #[test]
    fn test_unpad_rejects_zero_trailer() {
        let err = unpad(&[1, 2, 3, 0], 16).expect_err("zero trailer");
        assert_eq!(err.kind, ErrorKind::InvalidPadding);
    }

    #[test]
    fn test_unpad_rejects_oversized_trailer() {
        let err = unpad(&[0x11; 16], 16).expect_err("17 > block size");
        assert_eq!(err.kind, ErrorKind::InvalidPadding);
    }

    #[test]
    fn test_unpad_rejects_trailer_longer_than_input() {
        let err = unpad(&[5, 5, 5], 16).expect_err("5 > 3 bytes available");
        assert_eq!(err.kind, ErrorKind::InvalidPadding);
    }

    #[test]
    fn test_unpad_rejects_inconsistent_trailer() {
        let err = unpad(b"ICE ICE BABY\x01\x02\x03\x04", 16).expect_err("mixed trailer");
        assert_eq!(err.kind, ErrorKind::InvalidPadding);

        let err = unpad(b"ICE ICE BABY\x05\x05\x05\x05", 16).expect_err("short trailer");
        assert_eq!(err.kind, ErrorKind::InvalidPadding);
    }

    #[test]
    fn test_unpad_rejects_empty_input() {
        let err = unpad(&[], 16).expect_err("empty input");
        assert_eq!(err.kind, ErrorKind::InvalidPadding);
    }

    #[test]
    fn test_bad_block_size_is_contract_violation() {
        assert_eq!(
            pad(b"x", 0).expect_err("zero block size").kind,
            ErrorKind::ContractViolation
        );
        assert_eq!(
            pad(b"x", 256).expect_err("block size over 255").kind,
            ErrorKind::ContractViolation
        );
        assert_eq!(
            unpad(&[1], 0).expect_err("zero block size").kind,
            ErrorKind::ContractViolation
        );
    }

    #[test]
    fn test_full_block_of_padding_unpads_to_empty() {
        assert_eq!(unpad(&[16u8; 16], 16).unwrap(), Vec::<u8>::new());
    }
}
