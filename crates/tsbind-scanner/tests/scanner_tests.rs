//! Tests for the declaration scanner.

use crate::{ScannerState, SyntaxKind, scan, scan_with_trivia};

fn kinds(source: &str) -> Vec<SyntaxKind> {
    scan(source).map(|t| t.kind).collect()
}

#[test]
fn test_interface_header_tokens() {
    assert_eq!(
        kinds("interface Foo<T> extends Bar {"),
        vec![
            SyntaxKind::InterfaceKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::ExtendsKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_multi_character_punctuation() {
    assert_eq!(
        kinds("(...args) => a?.b"),
        vec![
            SyntaxKind::OpenParenToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::Identifier,
            SyntaxKind::CloseParenToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_question_dot_before_digit_is_conditional() {
    assert_eq!(
        kinds("a?.5"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(
        kinds("Interface interface"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::InterfaceKeyword,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_string_literal_value_is_unescaped() {
    let mut scanner = ScannerState::new(r#""a\"bA\u{42}" 'c'"#, true);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value_ref(), "a\"bAB");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value_ref(), "c");
    assert_eq!(scanner.get_token_text(), "'c'");
}

#[test]
fn test_unterminated_string_records_error() {
    let mut scanner = ScannerState::new("'abc\nfoo", true);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert!(scanner.is_unterminated());
    assert_eq!(scanner.get_token_value_ref(), "abc");
    assert_eq!(scanner.get_scanner_diagnostics().len(), 1);
    assert_eq!(scanner.get_scanner_diagnostics()[0].code, 1002);

    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_numeric_literals() {
    let mut scanner = ScannerState::new("1_000 0xFF 1.5e3 10n .25", true);
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value_ref(), "1000");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value_ref(), "0xFF");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value_ref(), "1.5e3");
    assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
    assert_eq!(scanner.get_token_value_ref(), "10");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value_ref(), ".25");
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_template_literal_is_single_token() {
    let mut scanner = ScannerState::new("`on${Capitalize<K>}` x", true);
    assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
    assert_eq!(scanner.get_token_value_ref(), "on${Capitalize<K>}");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_invalid_character_becomes_unknown_token() {
    let mut tokens = scan("a \\ b");
    let collected: Vec<_> = tokens.by_ref().map(|t| t.kind).collect();
    assert_eq!(
        collected,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::Unknown,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken,
        ]
    );
    assert_eq!(tokens.diagnostics().len(), 1);
    assert_eq!(tokens.diagnostics()[0].code, 1127);
}

#[test]
fn test_trivia_preserved_when_not_skipping() {
    let kinds: Vec<_> = scan_with_trivia("a // c\n/* d */b").map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::WhitespaceTrivia,
            SyntaxKind::SingleLineCommentTrivia,
            SyntaxKind::NewLineTrivia,
            SyntaxKind::MultiLineCommentTrivia,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_unterminated_comment_records_error() {
    let mut scanner = ScannerState::new("a /* never closed", true);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.get_scanner_diagnostics()[0].code, 1010);
}

#[test]
fn test_preceding_jsdoc_range_is_tracked() {
    let source = "/** Docs */\n/* plain */ foo bar";
    let mut scanner = ScannerState::new(source, true);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_preceding_jsdoc_range(), Some((0, 11)));
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_preceding_jsdoc_range(), None);
}

#[test]
fn test_empty_block_comment_is_not_jsdoc() {
    let mut scanner = ScannerState::new("/**/ x", true);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_preceding_jsdoc_range(), None);
}

#[test]
fn test_save_and_restore_state() {
    let mut scanner = ScannerState::new("a b \\ c", true);
    scanner.scan();
    let snapshot = scanner.save_state();
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.get_scanner_diagnostics().len(), 1);

    scanner.restore_state(snapshot);
    assert_eq!(scanner.get_token_value_ref(), "a");
    assert!(scanner.get_scanner_diagnostics().is_empty());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value_ref(), "b");
}

#[test]
fn test_set_text_scans_sub_range() {
    let source = "type A = 1;\ninterface B {}\ntype C = 2;";
    let mut scanner = ScannerState::new("", true);
    let start = source.find("interface").unwrap();
    let end = source.find("}").unwrap() + 1;
    scanner.set_text(source, start, Some(end - start));

    let mut seen = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        seen.push(kind);
    }
    assert_eq!(
        seen,
        vec![
            SyntaxKind::InterfaceKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        ]
    );
    assert_eq!(scanner.get_token_start(), end);
}

#[test]
fn test_jsdoc_token_scanning() {
    let mut scanner = ScannerState::new("@param {string} my-name text\n", false);
    let mut seen = Vec::new();
    loop {
        let kind = scanner.scan_jsdoc_token();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        seen.push((kind, scanner.get_token_value()));
    }
    let kinds: Vec<_> = seen.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::AtToken,
            SyntaxKind::Identifier,
            SyntaxKind::WhitespaceTrivia,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::StringKeyword,
            SyntaxKind::CloseBraceToken,
            SyntaxKind::WhitespaceTrivia,
            SyntaxKind::Identifier,
            SyntaxKind::WhitespaceTrivia,
            SyntaxKind::Identifier,
            SyntaxKind::NewLineTrivia,
        ]
    );
    assert_eq!(seen[7].1, "my-name");
}

#[test]
fn test_token_stream_restart() {
    let mut tokens = scan("a b");
    let first: Vec<_> = tokens.by_ref().map(|t| t.text).collect();
    assert_eq!(first, vec!["a", "b", ""]);
    assert!(tokens.next().is_none());

    tokens.restart();
    let token = tokens.next().unwrap();
    assert_eq!((token.kind, token.start, token.end), (SyntaxKind::Identifier, 0, 1));
}
