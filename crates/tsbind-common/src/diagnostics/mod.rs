//! Diagnostic types and message lookup for the scanner and parser.
//!
//! Message data lives in `data.rs`. Codes follow the TypeScript compiler's
//! numbering where a matching message exists; codes in the 90000 range are
//! specific to tsbind.

use serde::{Deserialize, Serialize};

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        }
    }
}

/// A positioned diagnostic produced while scanning or parsing declarations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// Create a diagnostic from a message definition, formatting `args` into it.
    #[must_use]
    pub fn from_message(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            message_text: format_message(message.message, args),
            category: message.category,
            code: message.code,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }

    /// End offset of the diagnostic span.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.start + self.length
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}): {} TS{}: {}",
            self.file,
            self.start,
            self.category.as_str(),
            self.code,
            self.message_text
        )
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
///
/// Returns the `DiagnosticMessage` with template string containing `{0}`, `{1}`, etc. placeholders.
/// Use `format_message()` to fill in the placeholders.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_message_replaces_positional_args() {
        let text = format_message("'{0}' expected.", &["}"]);
        assert_eq!(text, "'}' expected.");
    }

    #[test]
    fn message_table_codes_are_unique() {
        let mut codes: Vec<u32> = DIAGNOSTIC_MESSAGES.iter().map(|m| m.code).collect();
        codes.sort_unstable();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len());
    }

    #[test]
    fn unsupported_construct_is_a_suggestion() {
        assert_eq!(
            get_diagnostic_category(diagnostic_codes::UNSUPPORTED_CONSTRUCT_SKIPPED),
            Some(DiagnosticCategory::Suggestion)
        );
    }

    #[test]
    fn from_message_formats_and_serializes() {
        let diag = Diagnostic::from_message(
            "lib.d.ts",
            12,
            1,
            &diagnostic_messages::EXPECTED,
            &["{"],
        );
        assert_eq!(diag.message_text, "'{' expected.");
        assert!(diag.is_error());
        assert_eq!(diag.end(), 13);

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"code\":1005"));
    }
}
