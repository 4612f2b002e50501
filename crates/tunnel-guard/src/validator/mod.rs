//! Validator module root – re-exports public API surface.

pub mod types;
pub mod endpoint;
pub mod static_key;
pub mod certificate;
pub mod pipeline;

pub use types::*;
pub use endpoint::{IpFormatRule, PortRule, ProtocolRule, MAX_REMOTE_PORT, MIN_REMOTE_PORT};
pub use static_key::{parse_static_key, StaticKey, StaticKeyRule};
pub use certificate::{parse_ca_certificate, CaCertificateRule, CertificateSummary};
pub use pipeline::{ConfigRule, ConfigValidator, ValidatorBuilder};
