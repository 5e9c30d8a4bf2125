//! Scanner state machine.
//!
//! Positions are byte offsets into the source text. The scanner never fails:
//! characters it cannot classify become `SyntaxKind::Unknown` tokens and
//! lexical problems are recorded as `ScannerDiagnostic`s for the parser to
//! report.

use std::sync::Arc;

use crate::char_codes::{
    CARRIAGE_RETURN, LINE_FEED, is_digit, is_hex_digit, is_identifier_part, is_identifier_start,
    is_line_break, is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use tsbind_common::diagnostics::{DiagnosticMessage, diagnostic_messages};

/// Flags describing the trivia and shape of the current token.
pub mod token_flags {
    pub const NONE: u32 = 0;
    pub const PRECEDING_LINE_BREAK: u32 = 1 << 0;
    pub const PRECEDING_JSDOC_COMMENT: u32 = 1 << 1;
    pub const UNTERMINATED: u32 = 1 << 2;
    pub const HEX_SPECIFIER: u32 = 1 << 3;
    pub const BINARY_OR_OCTAL_SPECIFIER: u32 = 1 << 4;
}

/// A lexical error found while scanning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub pos: usize,
    pub length: usize,
    pub message: &'static str,
    pub code: u32,
}

/// Snapshot of the scanner used for lookahead and speculative parsing.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    full_start_pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
    jsdoc_range: Option<(usize, usize)>,
    diagnostic_count: usize,
}

#[derive(Clone, Debug)]
pub struct ScannerState {
    source: Arc<str>,
    /// Current position (end of the current token).
    pos: usize,
    /// Exclusive end of the scan window.
    end: usize,
    /// Start of the current token including leading trivia.
    full_start_pos: usize,
    /// Start of the current token excluding trivia.
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
    skip_trivia: bool,
    /// Range of the last `/** */` comment in the current token's leading trivia.
    jsdoc_range: Option<(usize, usize)>,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl ScannerState {
    pub fn new(text: impl Into<Arc<str>>, skip_trivia: bool) -> ScannerState {
        let source: Arc<str> = text.into();
        let end = source.len();
        ScannerState {
            source,
            pos: 0,
            end,
            full_start_pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: token_flags::NONE,
            skip_trivia,
            jsdoc_range: None,
            diagnostics: Vec::new(),
        }
    }

    /// Replace the source text and restrict scanning to `[start, start + length)`.
    ///
    /// `length` of `None` scans to the end of the text.
    pub fn set_text(&mut self, text: impl Into<Arc<str>>, start: usize, length: Option<usize>) {
        self.source = text.into();
        let len = self.source.len();
        self.end = length.map_or(len, |l| start.saturating_add(l).min(len));
        self.diagnostics.clear();
        self.reset_token_state(start.min(self.end));
    }

    /// Move the scanner to `pos` and forget the current token.
    pub fn reset_token_state(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
        self.full_start_pos = self.pos;
        self.token_start = self.pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
        self.token_flags = token_flags::NONE;
        self.jsdoc_range = None;
    }

    pub fn set_skip_trivia(&mut self, skip_trivia: bool) {
        self.skip_trivia = skip_trivia;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn source_text(&self) -> &str {
        &self.source
    }

    pub fn source_text_arc(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    pub fn get_token_value(&self) -> String {
        self.token_value.clone()
    }

    pub fn get_token_value_ref(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn get_token_text(&self) -> &str {
        self.source.get(self.token_start..self.pos).unwrap_or("")
    }

    pub fn get_token_start(&self) -> usize {
        self.token_start
    }

    pub fn get_token_full_start(&self) -> usize {
        self.full_start_pos
    }

    pub fn get_token_end(&self) -> usize {
        self.pos
    }

    pub fn get_text_end(&self) -> usize {
        self.end
    }

    pub fn get_token_flags(&self) -> u32 {
        self.token_flags
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags & token_flags::PRECEDING_LINE_BREAK != 0
    }

    pub fn is_unterminated(&self) -> bool {
        self.token_flags & token_flags::UNTERMINATED != 0
    }

    /// Range of the last `/** */` comment directly preceding the current token.
    pub fn get_preceding_jsdoc_range(&self) -> Option<(usize, usize)> {
        self.jsdoc_range
    }

    pub fn get_scanner_diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    pub fn take_scanner_diagnostics(&mut self) -> Vec<ScannerDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            full_start_pos: self.full_start_pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            jsdoc_range: self.jsdoc_range,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.full_start_pos = snapshot.full_start_pos;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
        self.jsdoc_range = snapshot.jsdoc_range;
        self.diagnostics.truncate(snapshot.diagnostic_count);
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.end {
            return None;
        }
        self.source.get(pos..self.end)?.chars().next()
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        if pos >= self.end {
            return None;
        }
        self.source.as_bytes().get(pos).copied()
    }

    fn error(&mut self, pos: usize, length: usize, message: &DiagnosticMessage) {
        self.diagnostics.push(ScannerDiagnostic {
            pos,
            length,
            message: message.message,
            code: message.code,
        });
    }

    #[inline]
    fn finish(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.token = kind;
        kind
    }

    // =========================================================================
    // Main scan
    // =========================================================================

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start_pos = self.pos;
        self.token_flags = token_flags::NONE;
        self.jsdoc_range = None;

        loop {
            self.token_start = self.pos;
            self.token_value.clear();

            let Some(ch) = self.char_at(self.pos) else {
                return self.finish(SyntaxKind::EndOfFileToken);
            };

            if is_line_break(ch) {
                self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                if ch == '\r' && self.byte_at(self.pos + 1) == Some(LINE_FEED) {
                    self.pos += 2;
                } else {
                    self.pos += ch.len_utf8();
                }
                if self.skip_trivia {
                    continue;
                }
                return self.finish(SyntaxKind::NewLineTrivia);
            }

            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                while let Some(next) = self.char_at(self.pos) {
                    if !is_white_space_single_line(next) {
                        break;
                    }
                    self.pos += next.len_utf8();
                }
                if self.skip_trivia {
                    continue;
                }
                return self.finish(SyntaxKind::WhitespaceTrivia);
            }

            let next = self.byte_at(self.pos + 1);
            let kind = match ch {
                '/' if next == Some(b'/') => {
                    self.scan_single_line_comment();
                    if self.skip_trivia {
                        continue;
                    }
                    SyntaxKind::SingleLineCommentTrivia
                }
                '/' if next == Some(b'*') => {
                    self.scan_multi_line_comment();
                    if self.skip_trivia {
                        continue;
                    }
                    SyntaxKind::MultiLineCommentTrivia
                }
                '"' | '\'' => {
                    self.scan_string(ch);
                    SyntaxKind::StringLiteral
                }
                '`' => {
                    self.scan_template();
                    SyntaxKind::NoSubstitutionTemplateLiteral
                }
                '0'..='9' => self.scan_number(),
                '.' if next.is_some_and(|b| b.is_ascii_digit()) => self.scan_number(),
                '.' if next == Some(b'.') && self.byte_at(self.pos + 2) == Some(b'.') => {
                    self.pos += 3;
                    SyntaxKind::DotDotDotToken
                }
                '?' if next == Some(b'.')
                    && !self
                        .byte_at(self.pos + 2)
                        .is_some_and(|b| b.is_ascii_digit()) =>
                {
                    self.pos += 2;
                    SyntaxKind::QuestionDotToken
                }
                '=' if next == Some(b'>') => {
                    self.pos += 2;
                    SyntaxKind::EqualsGreaterThanToken
                }
                _ if is_identifier_start(ch) => self.scan_identifier(ch),
                _ => match single_char_token(ch) {
                    Some(kind) => {
                        self.pos += 1;
                        kind
                    }
                    None => {
                        let len = ch.len_utf8();
                        self.error(self.pos, len, &diagnostic_messages::INVALID_CHARACTER);
                        self.pos += len;
                        SyntaxKind::Unknown
                    }
                },
            };

            if self.token_value.is_empty()
                && !matches!(
                    kind,
                    SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral
                )
            {
                self.token_value = self.get_token_text().to_string();
            }
            return self.finish(kind);
        }
    }

    fn scan_single_line_comment(&mut self) {
        self.pos += 2;
        while let Some(ch) = self.char_at(self.pos) {
            if is_line_break(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn scan_multi_line_comment(&mut self) {
        let start = self.pos;
        let is_jsdoc =
            self.byte_at(start + 2) == Some(b'*') && self.byte_at(start + 3) != Some(b'/');
        let body_start = start + 2;
        let body = self.source.as_bytes().get(body_start..self.end).unwrap_or(&[]);

        match memchr::memmem::find(body, b"*/") {
            Some(offset) => {
                if memchr::memchr2(LINE_FEED, CARRIAGE_RETURN, &body[..offset]).is_some() {
                    self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                }
                self.pos = body_start + offset + 2;
            }
            None => {
                self.pos = self.end;
                self.token_flags |= token_flags::UNTERMINATED;
                self.error(self.end, 0, &diagnostic_messages::ASTERISK_SLASH_EXPECTED);
            }
        }

        if is_jsdoc {
            self.jsdoc_range = Some((start, self.pos));
            self.token_flags |= token_flags::PRECEDING_JSDOC_COMMENT;
        }
    }

    fn scan_identifier(&mut self, first: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += first.len_utf8();
        while let Some(ch) = self.char_at(self.pos) {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = self.source.get(start..self.pos).unwrap_or("");
        self.token_value = text.to_string();
        text_to_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_string(&mut self, quote: char) {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.char_at(self.pos) else {
                self.token_flags |= token_flags::UNTERMINATED;
                self.error(self.pos, 0, &diagnostic_messages::UNTERMINATED_STRING_LITERAL);
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape_sequence(&mut value);
                continue;
            }
            if is_line_break(ch) {
                self.token_flags |= token_flags::UNTERMINATED;
                self.error(self.pos, 0, &diagnostic_messages::UNTERMINATED_STRING_LITERAL);
                break;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }
        self.token_value = value;
    }

    fn scan_escape_sequence(&mut self, out: &mut String) {
        let Some(ch) = self.char_at(self.pos) else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            '0' => out.push('\0'),
            'b' => out.push('\u{08}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'v' => out.push('\u{0B}'),
            'f' => out.push('\u{0C}'),
            'r' => out.push('\r'),
            'x' => match self.scan_hex_digits(2, 2) {
                Some(c) => out.push(c),
                None => out.push('x'),
            },
            'u' => {
                if self.byte_at(self.pos) == Some(b'{') {
                    self.pos += 1;
                    let escaped = self.scan_hex_digits(1, 6);
                    if self.byte_at(self.pos) == Some(b'}') {
                        self.pos += 1;
                    }
                    if let Some(c) = escaped {
                        out.push(c);
                    }
                } else if let Some(c) = self.scan_hex_digits(4, 4) {
                    out.push(c);
                } else {
                    out.push('u');
                }
            }
            // Line continuation
            '\r' => {
                if self.byte_at(self.pos) == Some(LINE_FEED) {
                    self.pos += 1;
                }
            }
            c if is_line_break(c) => {}
            c => out.push(c),
        }
    }

    fn scan_hex_digits(&mut self, min: usize, max: usize) -> Option<char> {
        let start = self.pos;
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            let Some(ch) = self.char_at(self.pos) else {
                break;
            };
            let Some(digit) = ch.to_digit(16) else {
                break;
            };
            value = value.saturating_mul(16).saturating_add(digit);
            self.pos += 1;
            count += 1;
        }
        if count < min {
            self.pos = start;
            return None;
        }
        char::from_u32(value)
    }

    fn scan_template(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let value_start = self.pos;
        let mut depth = 0usize;
        loop {
            let Some(ch) = self.char_at(self.pos) else {
                self.token_flags |= token_flags::UNTERMINATED;
                self.error(start, self.pos - start, &diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL);
                self.token_value = self.source.get(value_start..self.pos).unwrap_or("").to_string();
                return;
            };
            match ch {
                '`' if depth == 0 => {
                    self.token_value =
                        self.source.get(value_start..self.pos).unwrap_or("").to_string();
                    self.pos += 1;
                    return;
                }
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.char_at(self.pos) {
                        self.pos += escaped.len_utf8();
                    }
                }
                '$' if self.byte_at(self.pos + 1) == Some(b'{') => {
                    depth += 1;
                    self.pos += 2;
                }
                '{' if depth > 0 => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' if depth > 0 => {
                    depth -= 1;
                    self.pos += 1;
                }
                _ => self.pos += ch.len_utf8(),
            }
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let prefix = self.byte_at(start + 1).map(|b| b.to_ascii_lowercase());
        if self.byte_at(start) == Some(b'0') && matches!(prefix, Some(b'x' | b'b' | b'o')) {
            self.token_flags |= if prefix == Some(b'x') {
                token_flags::HEX_SPECIFIER
            } else {
                token_flags::BINARY_OR_OCTAL_SPECIFIER
            };
            self.pos += 2;
            while let Some(ch) = self.char_at(self.pos) {
                if !(is_hex_digit(ch) || ch == '_') {
                    break;
                }
                self.pos += 1;
            }
            return self.finish_number(start, true);
        }

        self.skip_decimal_digits();
        let mut integral = true;
        if self.byte_at(self.pos) == Some(b'.') {
            integral = false;
            self.pos += 1;
            self.skip_decimal_digits();
        }
        if matches!(self.byte_at(self.pos), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.byte_at(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.char_at(self.pos).is_some_and(is_digit) {
                integral = false;
                self.skip_decimal_digits();
            } else {
                self.pos = mark;
            }
        }
        self.finish_number(start, integral)
    }

    fn skip_decimal_digits(&mut self) {
        while let Some(ch) = self.char_at(self.pos) {
            if !(is_digit(ch) || ch == '_') {
                break;
            }
            self.pos += 1;
        }
    }

    fn finish_number(&mut self, start: usize, integral: bool) -> SyntaxKind {
        let bigint = integral && self.byte_at(self.pos) == Some(b'n');
        let text = self.source.get(start..self.pos).unwrap_or("");
        self.token_value = text.replace('_', "");
        if bigint {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        }
    }

    // =========================================================================
    // JSDoc scanning
    // =========================================================================

    /// Scan the next token inside a JSDoc comment body.
    ///
    /// Whitespace and newlines are returned as tokens, identifiers may contain
    /// `-`, and every other character is a single-character token.
    pub fn scan_jsdoc_token(&mut self) -> SyntaxKind {
        self.full_start_pos = self.pos;
        self.token_start = self.pos;
        self.token_flags = token_flags::NONE;
        self.token_value.clear();

        let Some(ch) = self.char_at(self.pos) else {
            return self.finish(SyntaxKind::EndOfFileToken);
        };
        self.pos += ch.len_utf8();

        let kind = match ch {
            '\r' => {
                if self.byte_at(self.pos) == Some(LINE_FEED) {
                    self.pos += 1;
                }
                self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                SyntaxKind::NewLineTrivia
            }
            c if is_line_break(c) => {
                self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                SyntaxKind::NewLineTrivia
            }
            c if is_white_space_single_line(c) => {
                while let Some(next) = self.char_at(self.pos) {
                    if !is_white_space_single_line(next) {
                        break;
                    }
                    self.pos += next.len_utf8();
                }
                SyntaxKind::WhitespaceTrivia
            }
            c if is_identifier_start(c) => {
                while let Some(next) = self.char_at(self.pos) {
                    if !(is_identifier_part(next) || next == '-') {
                        break;
                    }
                    self.pos += next.len_utf8();
                }
                text_to_keyword(self.get_token_text()).unwrap_or(SyntaxKind::Identifier)
            }
            c => single_char_token(c).unwrap_or(SyntaxKind::Unknown),
        };

        self.token_value = self.get_token_text().to_string();
        self.finish(kind)
    }
}

fn single_char_token(ch: char) -> Option<SyntaxKind> {
    let kind = match ch {
        '{' => SyntaxKind::OpenBraceToken,
        '}' => SyntaxKind::CloseBraceToken,
        '(' => SyntaxKind::OpenParenToken,
        ')' => SyntaxKind::CloseParenToken,
        '[' => SyntaxKind::OpenBracketToken,
        ']' => SyntaxKind::CloseBracketToken,
        '.' => SyntaxKind::DotToken,
        ';' => SyntaxKind::SemicolonToken,
        ',' => SyntaxKind::CommaToken,
        '<' => SyntaxKind::LessThanToken,
        '>' => SyntaxKind::GreaterThanToken,
        '+' => SyntaxKind::PlusToken,
        '-' => SyntaxKind::MinusToken,
        '*' => SyntaxKind::AsteriskToken,
        '/' => SyntaxKind::SlashToken,
        '%' => SyntaxKind::PercentToken,
        '&' => SyntaxKind::AmpersandToken,
        '|' => SyntaxKind::BarToken,
        '^' => SyntaxKind::CaretToken,
        '!' => SyntaxKind::ExclamationToken,
        '~' => SyntaxKind::TildeToken,
        '?' => SyntaxKind::QuestionToken,
        ':' => SyntaxKind::ColonToken,
        '@' => SyntaxKind::AtToken,
        '#' => SyntaxKind::HashToken,
        '`' => SyntaxKind::BacktickToken,
        '=' => SyntaxKind::EqualsToken,
        _ => return None,
    };
    Some(kind)
}
