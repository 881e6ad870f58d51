//! Hexadecimal codec
//!
//! Two uppercase hex digits per byte, with an optional space after every
//! byte. Decoding is case-insensitive, strips spaces, and reassembles bytes
//! by looking each digit up in the alphabet constant; the digit's index in
//! the alphabet is its nibble value.

use crate::error::{ByteviseError, Result};
use crate::uint::Uint;

const HEX_ALPHABET: &[u8; 16] = b"0123456789ABCDEF";

/// Encode a byte sequence as hex digits.
///
/// With `delimited` set, a single space follows every byte except the last.
pub fn encode(input: impl AsRef<[u8]>, delimited: bool) -> String {
    let data = input.as_ref();
    let mut output = String::with_capacity(data.len() * 3);

    for (i, &byte) in data.iter().enumerate() {
        if delimited && i != 0 {
            output.push(' ');
        }
        output.push(HEX_ALPHABET[usize::from(byte >> 4)] as char);
        output.push(HEX_ALPHABET[usize::from(byte & 0x0F)] as char);
    }

    output
}

/// Encode a fixed-width unsigned integer as hex digits, most significant
/// byte first regardless of host byte order, delimited at byte boundaries.
pub fn encode_uint<T: Uint>(value: T, delimited: bool) -> String {
    encode(value.to_be_byte_vec(), delimited)
}

/// Decode a hex string back into bytes.
///
/// Lowercase digits are accepted; spaces are stripped before validation.
///
/// # Errors
///
/// Returns an `InvalidInput` error on odd length or non-hex characters.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let normalized = normalize(input);

    if normalized.len() % 2 != 0 {
        return Err(ByteviseError::invalid_input(
            "hex input must be even in length",
        ));
    }

    assemble_bytes(&normalized)
}

/// Decode a hex string into a fixed-width unsigned integer.
///
/// # Errors
///
/// Returns an `InvalidInput` error on odd length, a digit count that does
/// not match the target type's width, or non-hex characters.
pub fn decode_uint<T: Uint>(input: &str) -> Result<T> {
    let normalized = normalize(input);

    if normalized.len() % 2 != 0 {
        return Err(ByteviseError::invalid_input(
            "hex input must be even in length",
        ));
    }
    if normalized.len() / 2 != T::WIDTH {
        return Err(ByteviseError::invalid_input(format!(
            "hex input holds {} digits but the target type is {} bytes wide",
            normalized.len(),
            T::WIDTH
        )));
    }

    Ok(T::from_be_byte_slice(&assemble_bytes(&normalized)?))
}

/// Uppercase the input and strip spaces.
fn normalize(input: &str) -> Vec<u8> {
    input
        .bytes()
        .filter(|b| *b != b' ')
        .map(|b| b.to_ascii_uppercase())
        .collect()
}

fn assemble_bytes(normalized: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(normalized.len() / 2);

    for (i, pair) in normalized.chunks_exact(2).enumerate() {
        let hi = nibble_at(pair[0], 2 * i)?;
        let lo = nibble_at(pair[1], 2 * i + 1)?;
        output.push((hi << 4) | lo);
    }

    Ok(output)
}

fn nibble_at(ch: u8, index: usize) -> Result<u8> {
    nibble(ch).ok_or_else(|| {
        ByteviseError::invalid_input(format!(
            "invalid hex character '{}' at index {}",
            ch as char, index
        ))
    })
}

/// The digit's index in [`HEX_ALPHABET`], which is its nibble value.
fn nibble(ch: u8) -> Option<u8> {
    HEX_ALPHABET.iter().position(|&a| a == ch).map(|i| i as u8)
}
