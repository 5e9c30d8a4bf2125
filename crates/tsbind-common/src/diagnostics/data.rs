use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const EXPECTED: u32 = 1005;
    pub const TRAILING_COMMA_NOT_ALLOWED: u32 = 1009;
    pub const ASTERISK_SLASH_EXPECTED: u32 = 1010;
    pub const UNEXPECTED_TOKEN: u32 = 1012;
    pub const A_REST_PARAMETER_MUST_BE_LAST_IN_A_PARAMETER_LIST: u32 = 1014;
    pub const TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY: u32 = 1099;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const TYPE_EXPECTED: u32 = 1110;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const PROPERTY_OR_SIGNATURE_EXPECTED: u32 = 1131;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1160;
    pub const TAG_ALREADY_SPECIFIED: u32 = 1223;
    pub const UNSUPPORTED_CONSTRUCT_SKIPPED: u32 = 90001;
    pub const TYPE_NESTING_TOO_DEEP: u32 = 90002;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNTERMINATED_STRING_LITERAL,
        category: DiagnosticCategory::Error,
        message: "Unterminated string literal.",
    };
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::IDENTIFIER_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Identifier expected.",
    };
    pub const EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EXPECTED,
        category: DiagnosticCategory::Error,
        message: "'{0}' expected.",
    };
    pub const TRAILING_COMMA_NOT_ALLOWED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TRAILING_COMMA_NOT_ALLOWED,
        category: DiagnosticCategory::Error,
        message: "Trailing comma not allowed.",
    };
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::ASTERISK_SLASH_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "'*/' expected.",
    };
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNEXPECTED_TOKEN,
        category: DiagnosticCategory::Error,
        message: "Unexpected token.",
    };
    pub const A_REST_PARAMETER_MUST_BE_LAST_IN_A_PARAMETER_LIST: DiagnosticMessage =
        DiagnosticMessage {
            code: diagnostic_codes::A_REST_PARAMETER_MUST_BE_LAST_IN_A_PARAMETER_LIST,
            category: DiagnosticCategory::Error,
            message: "A rest parameter must be last in a parameter list.",
        };
    pub const TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY,
        category: DiagnosticCategory::Error,
        message: "Type argument list cannot be empty.",
    };
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EXPRESSION_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Expression expected.",
    };
    pub const TYPE_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TYPE_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Type expected.",
    };
    pub const INVALID_CHARACTER: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INVALID_CHARACTER,
        category: DiagnosticCategory::Error,
        message: "Invalid character.",
    };
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Declaration or statement expected.",
    };
    pub const PROPERTY_OR_SIGNATURE_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::PROPERTY_OR_SIGNATURE_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Property or signature expected.",
    };
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
        category: DiagnosticCategory::Error,
        message: "Unterminated template literal.",
    };
    pub const TAG_ALREADY_SPECIFIED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TAG_ALREADY_SPECIFIED,
        category: DiagnosticCategory::Error,
        message: "'{0}' tag already specified.",
    };
    pub const UNSUPPORTED_CONSTRUCT_SKIPPED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNSUPPORTED_CONSTRUCT_SKIPPED,
        category: DiagnosticCategory::Suggestion,
        message: "Unsupported construct '{0}' was skipped.",
    };
    pub const TYPE_NESTING_TOO_DEEP: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TYPE_NESTING_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: "Type nesting exceeds the maximum depth of {0}.",
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::UNTERMINATED_STRING_LITERAL,
    diagnostic_messages::IDENTIFIER_EXPECTED,
    diagnostic_messages::EXPECTED,
    diagnostic_messages::TRAILING_COMMA_NOT_ALLOWED,
    diagnostic_messages::ASTERISK_SLASH_EXPECTED,
    diagnostic_messages::UNEXPECTED_TOKEN,
    diagnostic_messages::A_REST_PARAMETER_MUST_BE_LAST_IN_A_PARAMETER_LIST,
    diagnostic_messages::TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY,
    diagnostic_messages::EXPRESSION_EXPECTED,
    diagnostic_messages::TYPE_EXPECTED,
    diagnostic_messages::INVALID_CHARACTER,
    diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
    diagnostic_messages::PROPERTY_OR_SIGNATURE_EXPECTED,
    diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
    diagnostic_messages::TAG_ALREADY_SPECIFIED,
    diagnostic_messages::UNSUPPORTED_CONSTRUCT_SKIPPED,
    diagnostic_messages::TYPE_NESTING_TOO_DEEP,
];
