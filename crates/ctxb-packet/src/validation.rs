//! # Packet Validation Orchestrator
//!
//! Runs the schema checker and then the temporal checker, concatenating their
//! issues into a [`ValidationResult`].

use ctxb_core::{CtxbError, Packet, ValidationResult};
use ctxb_schema::SchemaSubset;
use serde_json::Value;

use crate::config::ValidationConfig;
use crate::temporal::check_temporal;

/// A compiled schema ready to validate any number of packets.
///
/// Immutable after construction; share it across threads by reference.
#[derive(Debug, Clone)]
pub struct PacketValidator {
    schema: SchemaSubset,
}

impl PacketValidator {
    /// Compile a parsed schema document.
    ///
    /// # Errors
    ///
    /// Returns [`CtxbError::InvalidPacketShape`] if `schema` is not an object.
    pub fn new(schema: &Value) -> Result<Self, CtxbError> {
        Ok(Self::from_subset(SchemaSubset::from_value(schema)?))
    }

    pub fn from_subset(schema: SchemaSubset) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &SchemaSubset {
        &self.schema
    }

    /// Validate a packet. Never fails: every defect is an issue in the result.
    pub fn validate(&self, packet: &Packet, config: &ValidationConfig) -> ValidationResult {
        let mut issues = self.schema.check(packet);
        let schema_issue_count = issues.len();

        issues.extend(check_temporal(packet, config));

        tracing::debug!(
            schema_issues = schema_issue_count,
            temporal_issues = issues.len() - schema_issue_count,
            now = %config.now_utc,
            "validated context packet"
        );

        ValidationResult::new(packet.schema_version().map(str::to_string), issues)
    }

    /// Validate a parsed JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CtxbError::InvalidPacketShape`] if `packet` is not an object.
    pub fn validate_value(
        &self,
        packet: &Value,
        config: &ValidationConfig,
    ) -> Result<ValidationResult, CtxbError> {
        let packet = Packet::from_value(packet.clone())?;
        Ok(self.validate(&packet, config))
    }
}

/// Validate `packet` against `schema` in one call.
///
/// # Errors
///
/// Returns [`CtxbError::InvalidPacketShape`] if either document is not a JSON
/// object. Packet defects are never errors.
pub fn validate_packet(
    packet: &Value,
    schema: &Value,
    config: &ValidationConfig,
) -> Result<ValidationResult, CtxbError> {
    let packet = Packet::from_value(packet.clone())?;
    let validator = PacketValidator::new(schema)?;
    Ok(validator.validate(&packet, config))
}
