//! AES-128 block-cipher chaining modes (ECB and CBC)
//!
//! This module orchestrates the AES block primitive from the `aes` crate
//! across whole messages; the key schedule and round transform are opaque
//! here. Both encrypt paths apply PKCS7 padding unconditionally, so
//! ciphertext is always a non-empty multiple of 16 bytes and padding removal
//! on decrypt is unambiguous.
//!
//! CBC chains each plaintext block by XOR against the previous ciphertext
//! block, starting from a caller-supplied 16-byte IV. There is no default
//! IV. Key, IV, and ciphertext length preconditions are validated up front
//! and reported as contract violations.

use aes::Aes128;
use aes::Block;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use crate::bitwise;
use crate::error::{ByteviseError, Result};
use crate::pkcs7;

/// Length of an AES-128 key in bytes.
pub const KEY_LEN: usize = 16;

/// Length of an AES block in bytes.
pub const BLOCK_LEN: usize = 16;

/// Length of a CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// Encrypt a single 16-byte block with AES-128.
///
/// # Errors
///
/// Returns a `ContractViolation` error if `plaintext` or `key` is not
/// exactly 16 bytes.
pub fn encrypt_block(plaintext: &[u8], key: &[u8]) -> Result<[u8; BLOCK_LEN]> {
    let cipher = build_cipher(key)?;
    let mut block = Block::from(to_block(plaintext)?);
    cipher.encrypt_block(&mut block);
    Ok(block.into())
}

/// Decrypt a single 16-byte block with AES-128.
///
/// # Errors
///
/// Returns a `ContractViolation` error if `ciphertext` or `key` is not
/// exactly 16 bytes.
pub fn decrypt_block(ciphertext: &[u8], key: &[u8]) -> Result<[u8; BLOCK_LEN]> {
    let cipher = build_cipher(key)?;
    let mut block = Block::from(to_block(ciphertext)?);
    cipher.decrypt_block(&mut block);
    Ok(block.into())
}

/// Encrypt a message in ECB mode.
///
/// The plaintext is PKCS7-padded, then each block is encrypted
/// independently. Identical plaintext blocks produce identical ciphertext
/// blocks.
///
/// # Errors
///
/// Returns a `ContractViolation` error if `key` is not exactly 16 bytes.
pub fn ecb_encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let cipher = build_cipher(key)?;

    let mut output = pkcs7::pad(plaintext, BLOCK_LEN)?;
    for chunk in output.chunks_exact_mut(BLOCK_LEN) {
        cipher.encrypt_block(Block::from_mut_slice(chunk));
    }

    Ok(output)
}

/// Decrypt an ECB-mode message.
///
/// Each block is decrypted independently. With `remove_padding` set, the
/// PKCS7 trailer of the final block is validated and stripped; a malformed
/// trailer is an `InvalidPadding` error. A zero-length ciphertext decrypts
/// to zero-length plaintext without a padding check.
///
/// # Errors
///
/// Returns a `ContractViolation` error if `key` is not exactly 16 bytes or
/// the ciphertext length is not a multiple of 16.
pub fn ecb_decrypt(ciphertext: &[u8], key: &[u8], remove_padding: bool) -> Result<Vec<u8>> {
    let cipher = build_cipher(key)?;
    check_alignment(ciphertext)?;

    let mut output = ciphertext.to_vec();
    for chunk in output.chunks_exact_mut(BLOCK_LEN) {
        cipher.decrypt_block(Block::from_mut_slice(chunk));
    }

    if remove_padding && !output.is_empty() {
        return pkcs7::unpad(&output, BLOCK_LEN);
    }
    Ok(output)
}

/// Encrypt a message in CBC mode with an explicit IV.
///
/// The chain value starts at the IV. Each padded plaintext block is XORed
/// with the chain, encrypted, emitted, and the ciphertext block becomes the
/// new chain. Block i's input depends on block i-1's ciphertext, so CBC
/// encryption is strictly sequential.
///
/// # Errors
///
/// Returns a `ContractViolation` error if `key` or `iv` is not exactly
/// 16 bytes.
pub fn cbc_encrypt(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    let cipher = build_cipher(key)?;
    let mut chain = check_iv(iv)?.to_vec();

    let padded = pkcs7::pad(plaintext, BLOCK_LEN)?;
    let mut output = Vec::with_capacity(padded.len());

    for chunk in padded.chunks_exact(BLOCK_LEN) {
        let xored = bitwise::xor_with_key(chunk, &chain)?;
        let mut block = Block::clone_from_slice(&xored);
        cipher.encrypt_block(&mut block);
        chain.copy_from_slice(block.as_slice());
        output.extend_from_slice(block.as_slice());
    }

    Ok(output)
}

/// Decrypt a CBC-mode message with an explicit IV.
///
/// Each ciphertext block is decrypted and XORed with the chain, which holds
/// the previous ciphertext block (the IV for the first). The raw ciphertext
/// block, captured before decryption, becomes the new chain. With
/// `remove_padding` set, the PKCS7 trailer of the final plaintext block is
/// validated and stripped. A zero-length ciphertext decrypts to zero-length
/// plaintext without a padding check.
///
/// # Errors
///
/// Returns a `ContractViolation` error if `key` or `iv` is not exactly
/// 16 bytes or the ciphertext length is not a multiple of 16, and an
/// `InvalidPadding` error if padding removal was requested and the trailer
/// is malformed.
pub fn cbc_decrypt(
    ciphertext: &[u8],
    key: &[u8],
    iv: &[u8],
    remove_padding: bool,
) -> Result<Vec<u8>> {
    let cipher = build_cipher(key)?;
    let mut chain = check_iv(iv)?.to_vec();
    check_alignment(ciphertext)?;

    let mut output = Vec::with_capacity(ciphertext.len());

    for chunk in ciphertext.chunks_exact(BLOCK_LEN) {
        let mut block = Block::clone_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        let xored = bitwise::xor_with_key(block.as_slice(), &chain)?;
        chain.copy_from_slice(chunk);
        output.extend_from_slice(&xored);
    }

    if remove_padding && !output.is_empty() {
        return pkcs7::unpad(&output, BLOCK_LEN);
    }
    Ok(output)
}

fn build_cipher(key: &[u8]) -> Result<Aes128> {
    if key.len() != KEY_LEN {
        return Err(ByteviseError::contract_violation(format!(
            "key must be exactly {} bytes, got {}",
            KEY_LEN,
            key.len()
        )));
    }
    Aes128::new_from_slice(key).map_err(|_| {
        ByteviseError::contract_violation("failed to initialize AES-128 with the supplied key")
    })
}

fn check_iv(iv: &[u8]) -> Result<&[u8]> {
    if iv.len() != IV_LEN {
        return Err(ByteviseError::contract_violation(format!(
            "IV must be exactly {} bytes, got {}",
            IV_LEN,
            iv.len()
        )));
    }
    Ok(iv)
}

fn check_alignment(ciphertext: &[u8]) -> Result<()> {
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(ByteviseError::contract_violation(format!(
            "ciphertext length {} is not a multiple of the {}-byte block size",
            ciphertext.len(),
            BLOCK_LEN
        )));
    }
    Ok(())
}

fn to_block(data: &[u8]) -> Result<[u8; BLOCK_LEN]> {
    data.try_into().map_err(|_| {
        ByteviseError::contract_violation(format!(
            "block must be exactly {} bytes, got {}",
            BLOCK_LEN,
            data.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];
    const IV: [u8; IV_LEN] = [0x24; IV_LEN];

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_block_roundtrip() {
        let plaintext = sample(BLOCK_LEN);
        let encrypted = encrypt_block(&plaintext, &KEY).unwrap();
        assert_ne!(encrypted[..], plaintext[..]);
        let decrypted = decrypt_block(&encrypted, &KEY).unwrap();
        assert_eq!(decrypted[..], plaintext[..]);
    }

    #[test]
    fn test_block_length_contract() {
        let err = encrypt_block(&sample(15), &KEY).expect_err("15-byte block");
        assert_eq!(err.kind, ErrorKind::ContractViolation);

        let err = decrypt_block(&sample(17), &KEY).expect_err("17-byte block");
        assert_eq!(err.kind, ErrorKind::ContractViolation);
    }

    #[test]
    fn test_ecb_roundtrip_size_variety() {
        for len in [0, 15, 16, 17, 33] {
            let plaintext = sample(len);
            let ciphertext = ecb_encrypt(&plaintext, &KEY).unwrap();
            assert_eq!(ciphertext.len() % BLOCK_LEN, 0);
            assert!(!ciphertext.is_empty());
            let decrypted = ecb_decrypt(&ciphertext, &KEY, true).unwrap();
            assert_eq!(decrypted, plaintext, "len={}", len);
        }
    }

    #[test]
    fn test_cbc_roundtrip_size_variety() {
        for len in [0, 15, 16, 17, 33] {
            let plaintext = sample(len);
            let ciphertext = cbc_encrypt(&plaintext, &KEY, &IV).unwrap();
            assert_eq!(ciphertext.len() % BLOCK_LEN, 0);
            let decrypted = cbc_decrypt(&ciphertext, &KEY, &IV, true).unwrap();
            assert_eq!(decrypted, plaintext, "len={}", len);
        }
    }

    #[test]
    fn test_aligned_input_gains_padding_block() {
        let ciphertext = ecb_encrypt(&sample(32), &KEY).unwrap();
        assert_eq!(ciphertext.len(), 48);

        let ciphertext = cbc_encrypt(&sample(16), &KEY, &IV).unwrap();
        assert_eq!(ciphertext.len(), 32);
    }

    #[test]
    fn test_ecb_repeats_identical_blocks_cbc_does_not() {
        let plaintext = [0x5A; 32];

        let ecb = ecb_encrypt(&plaintext, &KEY).unwrap();
        assert_eq!(ecb[..16], ecb[16..32]);

        let cbc = cbc_encrypt(&plaintext, &KEY, &IV).unwrap();
        assert_ne!(cbc[..16], cbc[16..32]);
    }

    #[test]
    fn test_decrypt_keeps_padding_when_asked() {
        let ciphertext = ecb_encrypt(b"YELLOW SUBMARINE", &KEY).unwrap();
        let raw = ecb_decrypt(&ciphertext, &KEY, false).unwrap();
        assert_eq!(&raw[..16], b"YELLOW SUBMARINE");
        assert_eq!(raw[16..], [16u8; 16]);
    }

    #[test]
    fn test_cbc_iv_changes_ciphertext() {
        let plaintext = sample(20);
        let a = cbc_encrypt(&plaintext, &KEY, &IV).unwrap();
        let b = cbc_encrypt(&plaintext, &KEY, &[0x25; IV_LEN]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cbc_bit_flip_propagation() {
        // Three full plaintext blocks; canonical padding appends a fourth.
        let plaintext = sample(48);
        let ciphertext = cbc_encrypt(&plaintext, &KEY, &IV).unwrap();
        assert_eq!(ciphertext.len(), 64);

        let mut tampered = ciphertext.clone();
        tampered[16] ^= 0x20; // bit 5 of the first byte of ciphertext block 1

        let clean = cbc_decrypt(&ciphertext, &KEY, &IV, false).unwrap();
        let garbled = cbc_decrypt(&tampered, &KEY, &IV, false).unwrap();

        // Block 0 is untouched.
        assert_eq!(garbled[..16], clean[..16]);
        // Block 1 decrypts to garbage.
        assert_ne!(garbled[16..32], clean[16..32]);
        // Block 2 sees exactly the same bit flipped, nothing else.
        let diff: Vec<u8> = garbled[32..48]
            .iter()
            .zip(&clean[32..48])
            .map(|(a, b)| a ^ b)
            .collect();
        let mut expected = vec![0u8; 16];
        expected[0] = 0x20;
        assert_eq!(diff, expected);
        // Block 3 is untouched.
        assert_eq!(garbled[48..], clean[48..]);
    }

    #[test]
    fn test_tampered_final_block_fails_padding() {
        let mut ciphertext = cbc_encrypt(b"bitflip test data", &KEY, &IV).unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;
        let err = cbc_decrypt(&ciphertext, &KEY, &IV, true).expect_err("corrupt trailer");
        assert_eq!(err.kind, ErrorKind::InvalidPadding);
    }

    #[test]
    fn test_key_length_contract() {
        let short = [0u8; 15];
        assert_eq!(
            ecb_encrypt(b"x", &short).expect_err("short key").kind,
            ErrorKind::ContractViolation
        );
        assert_eq!(
            cbc_encrypt(b"x", &short, &IV).expect_err("short key").kind,
            ErrorKind::ContractViolation
        );
    }

    #[test]
    fn test_iv_length_contract() {
        assert_eq!(
            cbc_encrypt(b"x", &KEY, &[0u8; 15]).expect_err("short IV").kind,
            ErrorKind::ContractViolation
        );
        assert_eq!(
            cbc_decrypt(&[0u8; 16], &KEY, &[0u8; 17], false)
                .expect_err("long IV")
                .kind,
            ErrorKind::ContractViolation
        );
    }

    #[test]
    fn test_ciphertext_alignment_contract() {
        assert_eq!(
            ecb_decrypt(&[0u8; 15], &KEY, false)
                .expect_err("15 bytes")
                .kind,
            ErrorKind::ContractViolation
        );
        assert_eq!(
            cbc_decrypt(&[0u8; 33], &KEY, &IV, false)
                .expect_err("33 bytes")
                .kind,
            ErrorKind::ContractViolation
        );
    }

    #[test]
    fn test_empty_ciphertext_decrypts_empty() {
        assert_eq!(ecb_decrypt(&[], &KEY, true).unwrap(), Vec::<u8>::new());
        assert_eq!(
            cbc_decrypt(&[], &KEY, &IV, true).unwrap(),
            Vec::<u8>::new()
        );
    }
}
