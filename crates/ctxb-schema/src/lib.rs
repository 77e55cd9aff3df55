//! # ctxb-schema — Structural Packet Validation
//!
//! Checks a context packet against the small slice of JSON Schema that the
//! packet format relies on:
//!
//! - `required`: ordered list of top-level fields that must be present.
//! - `properties.<name>.type`: `string`, `object` or `array`; any other
//!   declared type is treated as unconstrained.
//! - `properties.<name>.items.type`: element kind for array fields.
//! - `additionalProperties: false`: reject undeclared top-level keys.
//!
//! This is deliberately not a general JSON Schema engine. `$ref`, `pattern`,
//! `enum`, `oneOf`, formats and nested object schemas are ignored.
//!
//! ## Crate Policy
//!
//! - Depends only on `ctxb-core` internally.
//! - Never fails on a malformed schema body: unknown or ill-typed keywords
//!   simply contribute no constraint. Only a non-object schema is rejected.
//! - Every defect becomes a `SCHEMA_VIOLATION` issue. Checking never stops
//!   at the first one.

pub mod validate;

pub use validate::{check_schema, PropertySpec, SchemaSubset, TypeConstraint};
