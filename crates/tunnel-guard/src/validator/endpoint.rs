//! Remote endpoint checks – transport protocol, port range, address family.

use crate::validator::pipeline::ConfigRule;
use crate::validator::types::*;
use std::net::IpAddr;

/// Lowest accepted remote port; privileged ports are refused.
pub const MIN_REMOTE_PORT: i64 = 1024;
/// Highest valid 16-bit port.
pub const MAX_REMOTE_PORT: i64 = 65535;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Protocol
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `remote_protocol` must be exactly `udp` or `tcp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolRule;

impl ConfigRule for ProtocolRule {
    fn name(&self) -> &'static str {
        "protocol"
    }

    fn check(&self, cfg: &TunnelConfig) -> Result<(), ValidationError> {
        match TunnelProtocol::parse_strict(&cfg.remote_protocol) {
            Some(_) => Ok(()),
            None => Err(ValidationError::new(
                ValidationErrorKind::UnsupportedProtocol,
                format!("Unsupported protocol: {:?}", cfg.remote_protocol),
            )),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Port
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `remote_port` must fall within `MIN_REMOTE_PORT..=MAX_REMOTE_PORT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortRule;

impl ConfigRule for PortRule {
    fn name(&self) -> &'static str {
        "port"
    }

    fn check(&self, cfg: &TunnelConfig) -> Result<(), ValidationError> {
        if (MIN_REMOTE_PORT..=MAX_REMOTE_PORT).contains(&cfg.remote_port) {
            return Ok(());
        }
        Err(ValidationError::new(
            ValidationErrorKind::PortOutOfRange,
            format!(
                "Port {} out of range, should fall within {} .. {}",
                cfg.remote_port, MIN_REMOTE_PORT, MAX_REMOTE_PORT
            ),
        ))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Address
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `remote_ip` must parse as an address usable over IPv4.
///
/// Dotted quads pass, and so do IPv4-mapped IPv6 literals (`::ffff:a.b.c.d`)
/// since they name the same host. Any other IPv6 literal is refused,
/// including the deprecated IPv4-compatible form `::a.b.c.d`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IpFormatRule;

impl ConfigRule for IpFormatRule {
    fn name(&self) -> &'static str {
        "ip_format"
    }

    fn check(&self, cfg: &TunnelConfig) -> Result<(), ValidationError> {
        let parsed: IpAddr = cfg.remote_ip.parse().map_err(|e: std::net::AddrParseError| {
            ValidationError::new(
                ValidationErrorKind::InvalidAddress,
                format!("Unable to parse IP address {:?}", cfg.remote_ip),
            )
            .with_detail(e.to_string())
        })?;

        let v4 = match parsed {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(v6) => v6.to_ipv4_mapped(),
        };
        match v4 {
            Some(_) => Ok(()),
            None => Err(ValidationError::new(
                ValidationErrorKind::AddressNotIpv4,
                format!("IPv4 address required, got {}", cfg.remote_ip),
            )),
        }
    }
}
