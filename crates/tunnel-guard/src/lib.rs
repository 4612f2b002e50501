//! # tunnel-guard
//!
//! Pre-flight validation of OpenVPN tunnel descriptors. A [`TunnelConfig`] is
//! run through an ordered list of rules before it reaches the VPN client; the
//! first rule that rejects it decides the error.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | **types** | `TunnelConfig`, protocol enum, error kind and error |
//! | **endpoint** | Protocol, port range and IPv4 address rules |
//! | **static_key** | OpenVPN static key V1 envelope parsing |
//! | **certificate** | PEM / X.509 CA certificate decoding |
//! | **pipeline** | `ConfigRule` trait and the fail-fast `ConfigValidator` |
//!
//! ```no_run
//! use tunnel_guard::{ConfigValidator, TunnelConfig};
//!
//! let cfg = TunnelConfig::new("udp", 1194, "203.0.113.7");
//! if let Err(e) = ConfigValidator::new_default().is_valid(&cfg) {
//!     eprintln!("refusing to connect: {}", e);
//! }
//! ```

pub mod validator;

pub use validator::*;
