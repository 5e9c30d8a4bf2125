//! Common types and utilities for the tsbind declaration toolchain.
//!
//! This crate provides foundational types used across all tsbind crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message table)
//! - Source spans (`Span`)
//! - Parser and graph limits

// Diagnostics produced by the scanner and parser
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;
