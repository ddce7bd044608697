//! Shared type definitions for the Big Brother admin client
//!
//! This crate contains the serde types exchanged with the backend and the
//! small pieces of pure logic that operate on them (claim parsing, form
//! validation, report sections, pagination). It performs no I/O.

pub mod auth;
pub mod de;
pub mod envelope;
pub mod pagination;
pub mod records;
pub mod report;
pub mod validation;
pub mod web;

pub use envelope::{ApiEnvelope, ErrorKind};
pub use records::Record;
pub use validation::{FieldErrors, Validate, ValidationError};
