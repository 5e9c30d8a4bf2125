//! Lookahead utilities.

use tsbind_scanner::{ScannerState, SyntaxKind, token_is_identifier_or_keyword};

/// Identifier or any keyword (keywords are valid property and type names).
#[inline]
pub fn is_identifier_or_keyword(token: SyntaxKind) -> bool {
    token_is_identifier_or_keyword(token)
}

/// Tokens that can name a property or method in a type member.
#[inline]
pub fn is_type_member_name_start(token: SyntaxKind) -> bool {
    is_identifier_or_keyword(token)
        || matches!(
            token,
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral
        )
}

/// Scan one token past the current one and test it, restoring the scanner afterwards.
pub fn look_ahead_is<F>(scanner: &mut ScannerState, check: F) -> bool
where
    F: FnOnce(SyntaxKind) -> bool,
{
    let snapshot = scanner.save_state();
    let next = scanner.scan();
    let result = check(next);
    scanner.restore_state(snapshot);
    result
}

/// `type Name` (the `type` keyword followed by an identifier on the same line).
pub fn look_ahead_is_type_alias_declaration(
    scanner: &mut ScannerState,
    current: SyntaxKind,
) -> bool {
    if current != SyntaxKind::TypeKeyword {
        return false;
    }
    let snapshot = scanner.save_state();
    let next = scanner.scan();
    let result = is_identifier_or_keyword(next) && !scanner.has_preceding_line_break();
    scanner.restore_state(snapshot);
    result
}

/// `interface Name`.
pub fn look_ahead_is_interface_declaration(
    scanner: &mut ScannerState,
    current: SyntaxKind,
) -> bool {
    if current != SyntaxKind::InterfaceKeyword {
        return false;
    }
    look_ahead_is(scanner, is_identifier_or_keyword)
}

/// Current token starts an interface or type alias, possibly after
/// `export`/`declare`/`default` modifiers.
pub fn look_ahead_is_declaration_start(scanner: &mut ScannerState, current: SyntaxKind) -> bool {
    let snapshot = scanner.save_state();
    let mut token = current;
    while matches!(
        token,
        SyntaxKind::ExportKeyword | SyntaxKind::DeclareKeyword | SyntaxKind::DefaultKeyword
    ) {
        token = scanner.scan();
    }
    let result = look_ahead_is_interface_declaration(scanner, token)
        || look_ahead_is_type_alias_declaration(scanner, token);
    scanner.restore_state(snapshot);
    result
}
