//! Bytevise - byte-wrangling toolkit
//!
//! Textual radix codecs (binary digits, hex, base64) and AES-128 block-cipher
//! chaining modes (ECB, CBC) with PKCS7 padding. Codec and padding failures
//! are reported as typed errors; malformed input is never silently mapped to
//! truncated or zero-filled output.
//!
//! # Examples
//!
//! ```
//! let encoded = bytevise::hex::encode(b"AB", false);
//! assert_eq!(encoded, "4142");
//!
//! let key = [0x42u8; 16];
//! let iv = [0x24u8; 16];
//! let ciphertext = bytevise::cipher::cbc_encrypt(b"attack at dawn", &key, &iv).unwrap();
//! let plaintext = bytevise::cipher::cbc_decrypt(&ciphertext, &key, &iv, true).unwrap();
//! assert_eq!(plaintext, b"attack at dawn");
//! ```

#![forbid(unsafe_code)]

pub mod base64;
pub mod binary;
pub mod bitwise;
pub mod cipher;
pub mod error;
pub mod file_ops;
pub mod hex;
pub mod pkcs7;
pub mod uint;
