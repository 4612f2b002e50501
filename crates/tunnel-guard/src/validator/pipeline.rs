//! Ordered, fail-fast rule pipeline.

use crate::validator::certificate::CaCertificateRule;
use crate::validator::endpoint::{IpFormatRule, PortRule, ProtocolRule};
use crate::validator::static_key::StaticKeyRule;
use crate::validator::types::*;
use std::fmt;

/// One check over a [`TunnelConfig`].
pub trait ConfigRule: Send + Sync {
    /// Stable identifier used in logs and diagnostics.
    fn name(&self) -> &'static str {
        "custom"
    }

    fn check(&self, cfg: &TunnelConfig) -> Result<(), ValidationError>;
}

impl<F> ConfigRule for F
where
    F: Fn(&TunnelConfig) -> Result<(), ValidationError> + Send + Sync,
{
    fn check(&self, cfg: &TunnelConfig) -> Result<(), ValidationError> {
        self(cfg)
    }
}

/// Runs its rules in order and stops at the first rejection.
///
/// Holds no state besides the rule list, so a single instance can be shared
/// between threads.
pub struct ConfigValidator {
    rules: Vec<Box<dyn ConfigRule>>,
}

impl fmt::Debug for ConfigValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigValidator")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new_default()
    }
}

impl ConfigValidator {
    /// Canonical order: protocol, port, address, static key, CA certificate.
    /// The cheap syntactic checks run before any decoding.
    pub fn new_default() -> Self {
        Self::builder()
            .rule(ProtocolRule)
            .rule(PortRule)
            .rule(IpFormatRule)
            .rule(StaticKeyRule)
            .rule(CaCertificateRule)
            .build()
    }

    pub fn with_rules(rules: Vec<Box<dyn ConfigRule>>) -> Self {
        Self { rules }
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Names of the configured rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check `cfg` against every rule, returning the first rejection.
    pub fn is_valid(&self, cfg: &TunnelConfig) -> Result<(), ValidationError> {
        for rule in &self.rules {
            log::debug!("tunnel config: checking {}", rule.name());
            if let Err(e) = rule.check(cfg) {
                log::warn!("tunnel config rejected by {} rule: {}", rule.name(), e.kind);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Collects rules for a [`ConfigValidator`] in call order.
#[derive(Default)]
pub struct ValidatorBuilder {
    rules: Vec<Box<dyn ConfigRule>>,
}

impl fmt::Debug for ValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("ValidatorBuilder").field("rules", &names).finish()
    }
}

impl ValidatorBuilder {
    pub fn rule(mut self, rule: impl ConfigRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn build(self) -> ConfigValidator {
        ConfigValidator::with_rules(self.rules)
    }
}
