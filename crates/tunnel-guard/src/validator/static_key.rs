//! OpenVPN static key (`--genkey secret`) parsing.
//!
//! The file is a text envelope around 256 bytes of key material written as
//! hexadecimal, usually preceded by a short `#` comment banner:
//!
//! ```text
//! #
//! # 2048 bit OpenVPN static key
//! #
//! -----BEGIN OpenVPN Static key V1-----
//! <16 lines of 32 hex digits>
//! -----END OpenVPN Static key V1-----
//! ```

use crate::validator::pipeline::ConfigRule;
use crate::validator::types::*;
use std::fmt;

pub const STATIC_KEY_HEADER: &str = "-----BEGIN OpenVPN Static key V1-----";
pub const STATIC_KEY_FOOTER: &str = "-----END OpenVPN Static key V1-----";
/// Key size in bytes.
pub const STATIC_KEY_LEN: usize = 256;
/// Key size once hex-encoded.
pub const STATIC_KEY_HEX_LEN: usize = STATIC_KEY_LEN * 2;
/// Longest line the scanner accepts.
pub const MAX_KEY_LINE_LEN: usize = 64 * 1024;

/// Decoded static key material.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticKey([u8; STATIC_KEY_LEN]);

impl StaticKey {
    pub fn as_bytes(&self) -> &[u8; STATIC_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for StaticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticKey(<{} bytes>)", STATIC_KEY_LEN)
    }
}

fn scan_line(line: &str) -> Result<&str, ValidationError> {
    if line.len() > MAX_KEY_LINE_LEN {
        return Err(ValidationError::new(
            ValidationErrorKind::KeyScanFailed,
            format!("Key line too long ({} bytes, limit {})", line.len(), MAX_KEY_LINE_LEN),
        ));
    }
    Ok(line)
}

/// Parse and decode a static key file.
///
/// Blank lines and `#` comments are skipped until the first other line,
/// which must be the header. Everything up to the footer is joined verbatim
/// and must be exactly `STATIC_KEY_HEX_LEN` hex digits. Anything after the
/// footer is ignored.
pub fn parse_static_key(text: &str) -> Result<StaticKey, ValidationError> {
    let mut lines = text.lines();

    let mut header = "";
    for line in lines.by_ref() {
        let line = scan_line(line)?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        header = line;
        break;
    }
    if header != STATIC_KEY_HEADER {
        return Err(ValidationError::new(
            ValidationErrorKind::KeyHeaderInvalid,
            format!("Invalid key header: {:?}", header),
        ));
    }

    let mut payload = String::with_capacity(STATIC_KEY_HEX_LEN);
    let mut terminated = false;
    for line in lines {
        let line = scan_line(line)?;
        if line == STATIC_KEY_FOOTER {
            terminated = true;
            break;
        }
        payload.push_str(line);
    }
    if !terminated {
        return Err(ValidationError::new(
            ValidationErrorKind::KeyFooterMissing,
            format!("Key footer {:?} not found", STATIC_KEY_FOOTER),
        ));
    }

    if payload.len() != STATIC_KEY_HEX_LEN {
        return Err(ValidationError::new(
            ValidationErrorKind::KeyLengthInvalid,
            format!(
                "Invalid key length: {} hex characters, expected {}",
                payload.len(),
                STATIC_KEY_HEX_LEN
            ),
        ));
    }

    let mut key = [0u8; STATIC_KEY_LEN];
    hex::decode_to_slice(&payload, &mut key).map_err(|e| {
        ValidationError::new(
            ValidationErrorKind::KeyPayloadNotHex,
            "Key payload is not valid hexadecimal",
        )
        .with_detail(e.to_string())
    })?;

    Ok(StaticKey(key))
}

/// `preshared_key` must be a well-formed OpenVPN static key.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticKeyRule;

impl ConfigRule for StaticKeyRule {
    fn name(&self) -> &'static str {
        "static_key"
    }

    fn check(&self, cfg: &TunnelConfig) -> Result<(), ValidationError> {
        parse_static_key(&cfg.preshared_key).map(|_| ())
    }
}
