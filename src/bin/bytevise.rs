//! Bytevise CLI - byte-wrangling workbench
//!
//! Command-line interface for encoding and decoding files through the
//! binary/hex/base64 codecs and for encrypting and decrypting files with
//! AES-128 in ECB or CBC mode. Keys and IVs are given as hex strings.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use zeroize::Zeroizing;

use bytevise::error::{ByteviseError, Result};
use bytevise::file_ops::{self, Codec, Mode};
use bytevise::hex;

#[derive(Parser)]
#[command(name = "bytevise")]
#[command(version)]
#[command(about = "Radix codecs and AES-128 block-cipher modes.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum CodecArg {
    Binary,
    Hex,
    Base64,
}

impl From<CodecArg> for Codec {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::Binary => Codec::Binary,
            CodecArg::Hex => Codec::Hex,
            CodecArg::Base64 => Codec::Base64,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Ecb,
    Cbc,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Ecb => Mode::Ecb,
            ModeArg::Cbc => Mode::Cbc,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file's bytes as radix text
    #[command(alias = "e")]
    Encode {
        /// Codec to encode with
        #[arg(short, long, value_enum)]
        codec: CodecArg,

        /// Separate bytes with spaces (binary and hex only)
        #[arg(long)]
        delimited: bool,

        /// Path to the file whose contents is to be encoded
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the encoded text to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Decode radix text back into bytes
    #[command(alias = "d")]
    Decode {
        /// Codec to decode with
        #[arg(short, long, value_enum)]
        codec: CodecArg,

        /// Path to the file whose contents is to be decoded
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the decoded bytes to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Encrypt a file with AES-128
    Encrypt {
        /// Cipher mode
        #[arg(short, long, value_enum)]
        mode: ModeArg,

        /// 16-byte key as 32 hex digits
        #[arg(short, long, value_name = "HEX")]
        key: String,

        /// 16-byte IV as 32 hex digits (CBC only)
        #[arg(long, value_name = "HEX")]
        iv: Option<String>,

        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the ciphertext to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Decrypt a file with AES-128
    Decrypt {
        /// Cipher mode
        #[arg(short, long, value_enum)]
        mode: ModeArg,

        /// 16-byte key as 32 hex digits
        #[arg(short, long, value_name = "HEX")]
        key: String,

        /// 16-byte IV as 32 hex digits (CBC only)
        #[arg(long, value_name = "HEX")]
        iv: Option<String>,

        /// Keep the PKCS7 padding instead of stripping it
        #[arg(long)]
        keep_padding: bool,

        /// Path to the file whose contents is to be decrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the plaintext to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", render(&e));
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Encode {
            codec,
            delimited,
            input,
            output,
        } => file_ops::encode_file(&input, &output, codec.into(), delimited),

        Commands::Decode {
            codec,
            input,
            output,
        } => file_ops::decode_file(&input, &output, codec.into()),

        Commands::Encrypt {
            mode,
            key,
            iv,
            input,
            output,
        } => {
            let key = decode_key_material(&key, "--key")?;
            let iv = iv
                .map(|s| decode_key_material(&s, "--iv"))
                .transpose()?;
            file_ops::encrypt_file(
                &input,
                &output,
                mode.into(),
                &key,
                iv.as_ref().map(|v| v.as_slice()),
            )
        }

        Commands::Decrypt {
            mode,
            key,
            iv,
            keep_padding,
            input,
            output,
        } => {
            let key = decode_key_material(&key, "--key")?;
            let iv = iv
                .map(|s| decode_key_material(&s, "--iv"))
                .transpose()?;
            file_ops::decrypt_file(
                &input,
                &output,
                mode.into(),
                &key,
                iv.as_ref().map(|v| v.as_slice()),
                !keep_padding,
            )
        }
    }
}

/// Decode a hex argument into key material that is wiped on drop.
fn decode_key_material(arg: &str, flag: &str) -> Result<Zeroizing<Vec<u8>>> {
    hex::decode(arg)
        .map(Zeroizing::new)
        .map_err(|e| e.with_context(format!("{} is not a valid hex string", flag)))
}

fn render(err: &ByteviseError) -> String {
    let mut msg = err.to_string();
    let mut source: Option<&dyn std::error::Error> = err.source_error().map(|s| s as _);
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}
