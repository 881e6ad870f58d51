//! Bitwise combination of byte sequences.

use crate::error::{ByteviseError, Result};

/// XORs `input` against `key`, repeating the key cyclically when it is
/// shorter than the input. The output is a freshly allocated sequence of the
/// same length as `input`.
///
/// # Errors
///
/// Returns a `ContractViolation` error if `key` is empty.
pub fn xor_with_key(input: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(ByteviseError::contract_violation(
            "XOR key must not be empty",
        ));
    }

    Ok(input
        .iter()
        .enumerate()
        .map(|(i, &b)| b ^ key[i % key.len()])
        .collect())
}
