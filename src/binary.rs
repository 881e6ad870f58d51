//! Binary-digit codec
//!
//! Renders byte sequences and fixed-width unsigned integers as '0'/'1'
//! strings, most significant bit first, with an optional single space
//! between consecutive bytes. Decoding strips spaces and rejects anything
//! that is not a whole number of well-formed bytes.

use crate::error::{ByteviseError, Result};
use crate::uint::Uint;

/// Encode a byte sequence as binary digits, MSB first.
///
/// With `delimited` set, consecutive bytes are separated by a single space.
pub fn encode(input: impl AsRef<[u8]>, delimited: bool) -> String {
    let data = input.as_ref();
    let mut output = String::with_capacity(data.len() * 9);

    for (i, &byte) in data.iter().enumerate() {
        if delimited && i != 0 {
            output.push(' ');
        }
        push_bits(&mut output, byte);
    }

    output
}

/// Encode a fixed-width unsigned integer as binary digits, most significant
/// byte first regardless of host byte order.
pub fn encode_uint<T: Uint>(value: T, delimited: bool) -> String {
    encode(value.to_be_byte_vec(), delimited)
}

/// Decode a binary-digit string back into bytes.
///
/// Spaces are stripped before validation.
///
/// # Errors
///
/// Returns an `InvalidInput` error if the stripped length is not divisible
/// by 8 or any character is not '0' or '1'.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let stripped: Vec<u8> = input.bytes().filter(|b| *b != b' ').collect();

    if stripped.len() % 8 != 0 {
        return Err(ByteviseError::invalid_input(
            "binary input length is not divisible by 8",
        ));
    }

    assemble_bytes(&stripped)
}

/// Decode a binary-digit string into a fixed-width unsigned integer.
///
/// # Errors
///
/// Returns an `InvalidInput` error if the stripped length is not divisible
/// by 8, the bit count does not match the target type's width, or any
/// character is not '0' or '1'.
pub fn decode_uint<T: Uint>(input: &str) -> Result<T> {
    let stripped: Vec<u8> = input.bytes().filter(|b| *b != b' ').collect();

    if stripped.len() % 8 != 0 {
        return Err(ByteviseError::invalid_input(
            "binary input length is not divisible by 8",
        ));
    }
    if stripped.len() / 8 != T::WIDTH {
        return Err(ByteviseError::invalid_input(format!(
            "binary input holds {} bits but the target type is {} bytes wide",
            stripped.len(),
            T::WIDTH
        )));
    }

    Ok(T::from_be_byte_slice(&assemble_bytes(&stripped)?))
}

fn assemble_bytes(stripped: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(stripped.len() / 8);

    for (i, bits) in stripped.chunks_exact(8).enumerate() {
        let mut byte = 0u8;
        for (j, &b) in bits.iter().enumerate() {
            let bit = match b {
                b'0' => 0,
                b'1' => 1,
                _ => {
                    return Err(ByteviseError::invalid_input(format!(
                        "invalid binary character '{}' at index {}",
                        b as char,
                        8 * i + j
                    )));
                }
            };
            byte = (byte << 1) | bit;
        }
        output.push(byte);
    }

    Ok(output)
}

fn push_bits(output: &mut String, byte: u8) {
    for i in (0..8).rev() {
        output.push(if (byte >> i) & 1 == 1 { '1' } else { '0' });
    }
}
