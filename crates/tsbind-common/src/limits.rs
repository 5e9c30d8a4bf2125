//! Centralized limits and thresholds for parsing and graph building.
//!
//! The declaration grammar is recursive (types nest inside type literals,
//! function types, unions, type arguments), so every recursive walk in the
//! toolchain is bounded by one of these constants.

/// Maximum nesting depth for type parsing.
///
/// Each nested type literal, parenthesized type, or type argument list adds a
/// frame to the parser's call stack. Beyond this depth the parser reports
/// TS90002 and skips the remainder structurally.
///
/// ```typescript
/// type Deep = { a: { b: { c: Array<Promise<Map<string, { d: number }>>> } } };
/// ```
pub const MAX_TYPE_NESTING_DEPTH: u32 = 256;

/// Maximum depth of the dependency graph built for one root type.
///
/// The per-build "seen" set already guarantees termination; this bound only
/// protects the call stack against pathological corpora with very long
/// reference chains.
pub const MAX_DEPENDENCY_DEPTH: u32 = 512;

/// Maximum number of tokens a balanced-delimiter skip will consume before
/// giving up on an unterminated construct.
pub const MAX_SKIP_TOKENS: u32 = 1_000_000;

/// Maximum number of child tags scanned for a single `@typedef`.
pub const MAX_JSDOC_CHILD_TAGS: u32 = 1_024;
