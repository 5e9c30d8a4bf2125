//! Character classification used by the scanner.

pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const SPACE: u8 = b' ';
pub const TAB: u8 = b'\t';
pub const VERTICAL_TAB: u8 = 0x0B;
pub const FORM_FEED: u8 = 0x0C;
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';
pub const NON_BREAKING_SPACE: char = '\u{00A0}';
pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';

#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR)
}

/// Whitespace that does not terminate a line.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    match ch {
        ' ' | '\t' | '\u{0B}' | '\u{0C}' | NON_BREAKING_SPACE | BYTE_ORDER_MARK => true,
        _ if ch.is_ascii() => false,
        _ => ch.is_whitespace() && !is_line_break(ch),
    }
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$' || (!ch.is_ascii() && ch.is_alphabetic())
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch)
        || ch.is_ascii_digit()
        || (!ch.is_ascii() && (ch.is_alphanumeric() || ch == '\u{200C}' || ch == '\u{200D}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_classification() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
    }

    #[test]
    fn whitespace_classification() {
        assert!(is_white_space_single_line('\u{00A0}'));
        assert!(!is_white_space_single_line('\n'));
        assert!(is_line_break('\u{2028}'));
    }
}
