//! Declaration-file scanner/tokenizer for tsbind.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine
//! - `Tokens` - Lazy token iterator
//! - `char_codes` - Character classification utilities

pub mod char_codes;

pub mod syntax_kind;
pub use syntax_kind::{
    SyntaxKind, text_to_keyword, token_is_identifier, token_is_identifier_or_keyword,
    token_is_keyword, token_is_literal, token_is_punctuation, token_is_reserved_word,
    token_is_trivia, token_to_text,
};

mod scanner_impl;
pub use scanner_impl::{ScannerDiagnostic, ScannerSnapshot, ScannerState, token_flags};

mod tokens;
pub use tokens::{Token, Tokens, scan, scan_with_trivia};

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
