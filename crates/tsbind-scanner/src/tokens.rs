//! Lazy token stream over a source text.

use serde::Serialize;

use crate::scanner_impl::{ScannerDiagnostic, ScannerState};
use crate::syntax_kind::SyntaxKind;

/// A scanned token. `text` is the raw source slice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: SyntaxKind,
    pub text: String,
    pub start: u32,
    pub end: u32,
}

/// Iterator over the tokens of a text, ending with a single `EndOfFileToken`.
///
/// The stream is lazy: each call to `next` scans one token. `restart` rewinds
/// to the beginning of the scan window.
#[derive(Clone, Debug)]
pub struct Tokens {
    scanner: ScannerState,
    start: usize,
    finished: bool,
}

impl Tokens {
    pub fn new(scanner: ScannerState) -> Tokens {
        let start = scanner.get_token_end();
        Tokens {
            scanner,
            start,
            finished: false,
        }
    }

    pub fn restart(&mut self) {
        self.scanner.reset_token_state(self.start);
        self.finished = false;
    }

    /// Lexical errors found so far.
    pub fn diagnostics(&self) -> &[ScannerDiagnostic] {
        self.scanner.get_scanner_diagnostics()
    }

    pub fn scanner(&self) -> &ScannerState {
        &self.scanner
    }
}

impl Iterator for Tokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let kind = self.scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            self.finished = true;
        }
        Some(Token {
            kind,
            text: self.scanner.get_token_text().to_string(),
            start: u32::try_from(self.scanner.get_token_start()).unwrap_or(u32::MAX),
            end: u32::try_from(self.scanner.get_token_end()).unwrap_or(u32::MAX),
        })
    }
}

/// Tokenize `text`, skipping trivia.
pub fn scan(text: &str) -> Tokens {
    Tokens::new(ScannerState::new(text, true))
}

/// Tokenize `text`, returning whitespace, newline and comment trivia as tokens.
pub fn scan_with_trivia(text: &str) -> Tokens {
    Tokens::new(ScannerState::new(text, false))
}
