//! Shared types and the error type for tunnel descriptor validation.

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Protocol / transport
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Transport protocol accepted for the tunnel's remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TunnelProtocol {
    Udp,
    Tcp,
}

impl fmt::Display for TunnelProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Udp => write!(f, "udp"),
            Self::Tcp => write!(f, "tcp"),
        }
    }
}

impl TunnelProtocol {
    /// Exact, case-sensitive match against `udp` / `tcp`.
    pub fn parse_strict(s: &str) -> Option<Self> {
        match s {
            "udp" => Some(Self::Udp),
            "tcp" => Some(Self::Tcp),
            _ => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tunnel descriptor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Connection descriptor handed to the VPN client once it validates.
///
/// Every field is kept in its raw form so the rules can report exactly what
/// the caller supplied; `remote_port` is wider than `u16` so out-of-range
/// values reach the port rule instead of failing to decode.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    /// `udp` or `tcp`.
    pub remote_protocol: String,
    pub remote_port: i64,
    /// IPv4 literal of the remote server.
    pub remote_ip: String,
    /// OpenVPN static key (`openvpn --genkey secret`) file contents.
    pub preshared_key: String,
    /// PEM-encoded CA certificate.
    pub ca_certificate: String,
}

impl fmt::Debug for TunnelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TunnelConfig")
            .field("remote_protocol", &self.remote_protocol)
            .field("remote_port", &self.remote_port)
            .field("remote_ip", &self.remote_ip)
            .field("preshared_key", &format_args!("<{} bytes>", self.preshared_key.len()))
            .field("ca_certificate", &format_args!("<{} bytes>", self.ca_certificate.len()))
            .finish()
    }
}

impl TunnelConfig {
    pub fn new(
        remote_protocol: impl Into<String>,
        remote_port: i64,
        remote_ip: impl Into<String>,
    ) -> Self {
        Self {
            remote_protocol: remote_protocol.into(),
            remote_port,
            remote_ip: remote_ip.into(),
            ..Self::default()
        }
    }

    pub fn with_preshared_key(mut self, key: impl Into<String>) -> Self {
        self.preshared_key = key.into();
        self
    }

    pub fn with_ca_certificate(mut self, pem: impl Into<String>) -> Self {
        self.ca_certificate = pem.into();
        self
    }

    /// Decode a descriptor from JSON. Missing fields take their defaults and
    /// are left for the rules to reject.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            ValidationError::new(
                ValidationErrorKind::ConfigDecodeFailed,
                "Cannot decode tunnel config",
            )
            .with_detail(e.to_string())
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which check rejected the descriptor. The snake_case tag is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    UnsupportedProtocol,
    PortOutOfRange,
    InvalidAddress,
    AddressNotIpv4,
    KeyHeaderInvalid,
    KeyFooterMissing,
    KeyLengthInvalid,
    KeyPayloadNotHex,
    KeyScanFailed,
    PemBlockMissing,
    PemTypeMismatch,
    CertificateParseFailed,
    ConfigDecodeFailed,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedProtocol => "unsupported_protocol",
            Self::PortOutOfRange => "port_out_of_range",
            Self::InvalidAddress => "invalid_address",
            Self::AddressNotIpv4 => "address_not_ipv4",
            Self::KeyHeaderInvalid => "key_header_invalid",
            Self::KeyFooterMissing => "key_footer_missing",
            Self::KeyLengthInvalid => "key_length_invalid",
            Self::KeyPayloadNotHex => "key_payload_not_hex",
            Self::KeyScanFailed => "key_scan_failed",
            Self::PemBlockMissing => "pem_block_missing",
            Self::PemTypeMismatch => "pem_type_mismatch",
            Self::CertificateParseFailed => "certificate_parse_failed",
            Self::ConfigDecodeFailed => "config_decode_failed",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("[{kind}] {message}{}", detail_suffix(.detail))]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_ref().map(|d| format!(" ({})", d)).unwrap_or_default()
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<ValidationError> for String {
    fn from(e: ValidationError) -> String {
        e.to_string()
    }
}
