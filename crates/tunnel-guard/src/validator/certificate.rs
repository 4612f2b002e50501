//! CA certificate decoding – PEM envelope plus X.509 structure.
//!
//! Only the structure is checked. Trust chain, validity window and key usage
//! are the VPN client's business.

use crate::validator::pipeline::ConfigRule;
use crate::validator::types::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use x509_parser::parse_x509_certificate;
use x509_parser::time::ASN1Time;

/// PEM tag the CA block must carry.
pub const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Metadata read from a parsed CA certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    /// Serial number, hex.
    pub serial: String,
    /// SHA-256 over the DER bytes, hex.
    pub fingerprint_sha256: String,
    pub not_before: String,
    pub not_after: String,
    pub is_ca: bool,
}

fn format_cert_time(time: &ASN1Time) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(time.timestamp(), 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| time.to_string())
}

/// Decode the first PEM block of `pem_text` and parse it as a certificate.
///
/// Text before the first `-----BEGIN` line is skipped, as are blocks after
/// the first one.
pub fn parse_ca_certificate(pem_text: &str) -> Result<CertificateSummary, ValidationError> {
    let block = pem::parse(pem_text).map_err(|e| {
        ValidationError::new(
            ValidationErrorKind::PemBlockMissing,
            "No PEM block found in CA certificate",
        )
        .with_detail(e.to_string())
    })?;

    if block.tag() != CERTIFICATE_TAG {
        return Err(ValidationError::new(
            ValidationErrorKind::PemTypeMismatch,
            format!(
                "Invalid CA certificate: {} block expected, found {:?}",
                CERTIFICATE_TAG,
                block.tag()
            ),
        ));
    }

    let der = block.contents();
    let (rest, cert) = parse_x509_certificate(der).map_err(|e| {
        ValidationError::new(
            ValidationErrorKind::CertificateParseFailed,
            "Cannot parse CA certificate",
        )
        .with_detail(e.to_string())
    })?;
    if !rest.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::CertificateParseFailed,
            "Cannot parse CA certificate",
        )
        .with_detail(format!("{} trailing bytes after certificate", rest.len())));
    }

    let validity = cert.validity();
    Ok(CertificateSummary {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        serial: hex::encode(cert.raw_serial()),
        fingerprint_sha256: hex::encode(Sha256::digest(der)),
        not_before: format_cert_time(&validity.not_before),
        not_after: format_cert_time(&validity.not_after),
        is_ca: cert.is_ca(),
    })
}

/// `ca_certificate` must hold a PEM `CERTIFICATE` block with a parseable
/// X.509 body.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaCertificateRule;

impl ConfigRule for CaCertificateRule {
    fn name(&self) -> &'static str {
        "ca_certificate"
    }

    fn check(&self, cfg: &TunnelConfig) -> Result<(), ValidationError> {
        parse_ca_certificate(&cfg.ca_certificate).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType, IsCa};

    fn self_signed() -> Certificate {
        rcgen::generate_simple_self_signed(vec!["vpn.example.com".to_string()]).unwrap()
    }

    fn ca_cert() -> Certificate {
        let mut params = CertificateParams::new(Vec::<String>::new());
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, "Test Tunnel CA");
        params.distinguished_name = dn;
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        Certificate::from_params(params).unwrap()
    }

    fn kind_of(text: &str) -> ValidationErrorKind {
        parse_ca_certificate(text).unwrap_err().kind
    }

    // ── Accepted ─────────────────────────────────────────────────

    #[test]
    fn parses_self_signed() {
        let cert = self_signed();
        let summary = parse_ca_certificate(&cert.serialize_pem().unwrap()).unwrap();
        assert_eq!(summary.subject, summary.issuer);
        assert!(!summary.is_ca);
        assert_eq!(summary.fingerprint_sha256.len(), 64);
        assert!(!summary.serial.is_empty());
    }

    #[test]
    fn fingerprint_covers_der() {
        let cert = self_signed();
        let der = cert.serialize_der().unwrap();
        let pem_text = pem::encode(&pem::Pem::new(CERTIFICATE_TAG, der.clone()));
        let summary = parse_ca_certificate(&pem_text).unwrap();
        assert_eq!(summary.fingerprint_sha256, hex::encode(Sha256::digest(&der)));
    }

    #[test]
    fn reports_ca_flag_and_subject() {
        let summary = parse_ca_certificate(&ca_cert().serialize_pem().unwrap()).unwrap();
        assert!(summary.is_ca);
        assert!(summary.subject.contains("Test Tunnel CA"));
        assert!(summary.not_before < summary.not_after);
    }

    #[test]
    fn skips_text_before_block() {
        let text = format!("Bag Attributes\n  friendlyName: ca\n{}", self_signed().serialize_pem().unwrap());
        assert!(parse_ca_certificate(&text).is_ok());
    }

    #[test]
    fn only_first_block_is_inspected() {
        let text = format!(
            "{}{}",
            self_signed().serialize_pem().unwrap(),
            pem::encode(&pem::Pem::new("PRIVATE KEY", vec![1, 2, 3]))
        );
        assert!(parse_ca_certificate(&text).is_ok());
    }

    // ── PEM envelope ─────────────────────────────────────────────

    #[test]
    fn non_pem_text_is_missing_block() {
        assert_eq!(kind_of("just some text"), ValidationErrorKind::PemBlockMissing);
        assert_eq!(kind_of(""), ValidationErrorKind::PemBlockMissing);
    }

    #[test]
    fn unterminated_block_is_missing_block() {
        let pem_text = self_signed().serialize_pem().unwrap();
        let cut = pem_text.find("-----END").unwrap();
        assert_eq!(kind_of(&pem_text[..cut]), ValidationErrorKind::PemBlockMissing);
    }

    #[test]
    fn wrong_tag_is_type_mismatch() {
        let pem_text = self_signed().serialize_pem().unwrap().replace("CERTIFICATE", "PRIVATE KEY");
        let err = parse_ca_certificate(&pem_text).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PemTypeMismatch);
        assert!(err.message.contains("PRIVATE KEY"));
    }

    #[test]
    fn tag_match_is_exact() {
        let pem_text = self_signed().serialize_pem().unwrap().replace("CERTIFICATE", "X509 CERTIFICATE");
        assert_eq!(kind_of(&pem_text), ValidationErrorKind::PemTypeMismatch);
    }

    // ── DER body ─────────────────────────────────────────────────

    #[test]
    fn corrupt_der_is_parse_failure() {
        let pem_text = pem::encode(&pem::Pem::new(CERTIFICATE_TAG, vec![0x30, 0x03, 0x02, 0x01, 0x00]));
        let err = parse_ca_certificate(&pem_text).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::CertificateParseFailed);
        assert!(err.detail.is_some());
    }

    #[test]
    fn truncated_der_is_parse_failure() {
        let der = self_signed().serialize_der().unwrap();
        let pem_text = pem::encode(&pem::Pem::new(CERTIFICATE_TAG, der[..der.len() / 2].to_vec()));
        assert_eq!(kind_of(&pem_text), ValidationErrorKind::CertificateParseFailed);
    }

    #[test]
    fn trailing_bytes_are_parse_failure() {
        let mut der = self_signed().serialize_der().unwrap();
        der.extend_from_slice(&[0u8; 4]);
        let pem_text = pem::encode(&pem::Pem::new(CERTIFICATE_TAG, der));
        let err = parse_ca_certificate(&pem_text).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::CertificateParseFailed);
        assert!(err.detail.unwrap().contains("trailing"));
    }

    // ── Rule ─────────────────────────────────────────────────────

    #[test]
    fn rule_checks_ca_certificate_field() {
        let cfg = TunnelConfig::new("udp", 1194, "10.0.0.1")
            .with_ca_certificate(self_signed().serialize_pem().unwrap());
        assert!(CaCertificateRule.check(&cfg).is_ok());
        let cfg = cfg.with_ca_certificate("nope");
        assert_eq!(CaCertificateRule.check(&cfg).unwrap_err().kind, ValidationErrorKind::PemBlockMissing);
    }
}
