//! File-level codec and cipher operations
//!
//! This module provides the high-level operations the CLI drives: encoding
//! or decoding a file through one of the radix codecs, and encrypting or
//! decrypting a file with AES-128 in ECB or CBC mode.
//!
//! Cipher outputs are written atomically (tempfile + flush + fsync + rename)
//! with mode 0o600 on Unix systems, so a crash mid-write never leaves a
//! partial ciphertext or plaintext file behind. Codec outputs use a plain
//! write.

use crate::base64;
use crate::binary;
use crate::cipher;
use crate::error::{ByteviseError, ErrorCategory, ErrorKind, Result};
use crate::hex;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Radix codec selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Binary,
    Hex,
    Base64,
}

/// Cipher mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ecb,
    Cbc,
}

/// Encode a file's bytes into radix text.
///
/// Reads raw bytes from `input_path`, encodes them with `codec`, and writes
/// the text to `output_path`. `delimited` requests per-byte space delimiting
/// and is ignored by base64, which has no delimited form.
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    codec: Codec,
    delimited: bool,
) -> Result<()> {
    let data = fs::read(input_path).map_err(|e| read_error(input_path, e))?;

    let text = match codec {
        Codec::Binary => binary::encode(&data, delimited),
        Codec::Hex => hex::encode(&data, delimited),
        Codec::Base64 => base64::encode(&data),
    };

    write_file(output_path, text.as_bytes())
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))
}

/// Decode a radix-text file back into raw bytes.
///
/// Reads UTF-8 text from `input_path`, decodes it with `codec`, and writes
/// the bytes to `output_path`.
pub fn decode_file(input_path: &Path, output_path: &Path, codec: Codec) -> Result<()> {
    let raw = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let text = String::from_utf8(raw).map_err(|e| {
        ByteviseError::with_source(
            ErrorCategory::User,
            ErrorKind::Io,
            "input file is not valid UTF-8",
            e,
        )
    })?;

    // Trailing newlines are an artifact of editors, not of the encoding.
    let text = text.trim_end_matches(['\n', '\r']);

    let data = match codec {
        Codec::Binary => binary::decode(text),
        Codec::Hex => hex::decode(text),
        Codec::Base64 => base64::decode(text),
    }
    .map_err(|e| e.with_context(format!("failed to decode {}", input_path.display())))?;

    write_file(output_path, &data)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))
}

/// Encrypt a file with AES-128.
///
/// CBC requires a 16-byte IV; ECB rejects one. The ciphertext is written
/// atomically with restrictive permissions.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    mode: Mode,
    key: &[u8],
    iv: Option<&[u8]>,
) -> Result<()> {
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;

    let ciphertext = match (mode, iv) {
        (Mode::Ecb, None) => cipher::ecb_encrypt(&plaintext, key),
        (Mode::Ecb, Some(_)) => Err(ByteviseError::contract_violation(
            "ECB mode does not use an IV",
        )),
        (Mode::Cbc, Some(iv)) => cipher::cbc_encrypt(&plaintext, key, iv),
        (Mode::Cbc, None) => Err(ByteviseError::contract_violation(
            "CBC mode requires an IV",
        )),
    }
    .map_err(|e| e.with_context("encryption failed"))?;

    write_file_atomic(output_path, &ciphertext)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))
}

/// Decrypt a file with AES-128.
///
/// CBC requires the same 16-byte IV used to encrypt; ECB rejects one. With
/// `remove_padding` set the PKCS7 trailer is validated and stripped. The
/// plaintext is written atomically with restrictive permissions.
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    mode: Mode,
    key: &[u8],
    iv: Option<&[u8]>,
    remove_padding: bool,
) -> Result<()> {
    let ciphertext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;

    let plaintext = match (mode, iv) {
        (Mode::Ecb, None) => cipher::ecb_decrypt(&ciphertext, key, remove_padding),
        (Mode::Ecb, Some(_)) => Err(ByteviseError::contract_violation(
            "ECB mode does not use an IV",
        )),
        (Mode::Cbc, Some(iv)) => cipher::cbc_decrypt(&ciphertext, key, iv, remove_padding),
        (Mode::Cbc, None) => Err(ByteviseError::contract_violation(
            "CBC mode requires an IV",
        )),
    }
    .map_err(|e| e.with_context("decryption failed"))?;

    write_file_atomic(output_path, &plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))
}

/// Write atomically: tempfile in the target directory, flush, fsync, then
/// rename over the target. Permissions are restricted to 0o600 on Unix.
fn write_file_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        ByteviseError::new(
            ErrorCategory::User,
            ErrorKind::Io,
            "output path has no parent directory",
        )
    })?;

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        ByteviseError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to create tempfile",
            e,
        )
    })?;

    temp_file.write_all(contents).map_err(|e| {
        ByteviseError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write to tempfile",
            e,
        )
    })?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file.flush().map_err(|e| {
        ByteviseError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to flush tempfile",
            e,
        )
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        ByteviseError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = temp_file
            .as_file()
            .metadata()
            .map_err(|e| {
                ByteviseError::with_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to get tempfile metadata",
                    e,
                )
            })?
            .permissions();
        perms.set_mode(0o600);
        temp_file.as_file().set_permissions(perms).map_err(|e| {
            ByteviseError::with_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to set tempfile permissions",
                e,
            )
        })?;
    }

    temp_file.persist(path).map_err(|e| {
        ByteviseError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", path.display()),
            e,
        )
    })?;
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| {
        ByteviseError::with_source(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("failed to write {}", path.display()),
            e,
        )
    })
}

fn read_error(path: &Path, err: io::Error) -> ByteviseError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    ByteviseError::with_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
