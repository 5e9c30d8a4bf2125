//! Token kinds produced by the scanner.
//!
//! Node kinds that only exist in the syntax tree live in the parser's
//! `syntax_kind_ext` module and start after `SyntaxKind::LAST_TOKEN`.

use serde::{Deserialize, Serialize};

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SyntaxKind {
    Unknown = 0,
    EndOfFileToken,
    SingleLineCommentTrivia,
    MultiLineCommentTrivia,
    NewLineTrivia,
    WhitespaceTrivia,
    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    NoSubstitutionTemplateLiteral,
    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    LessThanToken,
    GreaterThanToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    QuestionToken,
    ColonToken,
    AtToken,
    HashToken,
    BacktickToken,
    EqualsToken,
    // Identifiers
    Identifier,
    // Reserved words
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,
    // Strict mode reserved words
    ImplementsKeyword,
    InterfaceKeyword,
    LetKeyword,
    PackageKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    StaticKeyword,
    YieldKeyword,
    // Contextual keywords
    AbstractKeyword,
    AsKeyword,
    AssertsKeyword,
    AnyKeyword,
    AsyncKeyword,
    AwaitKeyword,
    BigIntKeyword,
    BooleanKeyword,
    ConstructorKeyword,
    DeclareKeyword,
    FromKeyword,
    GetKeyword,
    GlobalKeyword,
    InferKeyword,
    IsKeyword,
    KeyOfKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    NeverKeyword,
    NumberKeyword,
    ObjectKeyword,
    ReadonlyKeyword,
    SetKeyword,
    StringKeyword,
    SymbolKeyword,
    TypeKeyword,
    UndefinedKeyword,
    UniqueKeyword,
    UnknownKeyword,
}

impl SyntaxKind {
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::UnknownKeyword;
    pub const FIRST_RESERVED_WORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_RESERVED_WORD: SyntaxKind = SyntaxKind::WithKeyword;
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::EqualsToken;
    pub const LAST_TOKEN: SyntaxKind = SyntaxKind::UnknownKeyword;

    /// Convert a raw `u16` back into a token kind.
    ///
    /// Returns `None` for values outside the token range (node kinds).
    pub fn try_from_u16(value: u16) -> Option<SyntaxKind> {
        KIND_TABLE.get(value as usize).copied()
    }
}

/// Every token kind, indexed by discriminant.
static KIND_TABLE: &[SyntaxKind] = &[
    SyntaxKind::Unknown,
    SyntaxKind::EndOfFileToken,
    SyntaxKind::SingleLineCommentTrivia,
    SyntaxKind::MultiLineCommentTrivia,
    SyntaxKind::NewLineTrivia,
    SyntaxKind::WhitespaceTrivia,
    SyntaxKind::NumericLiteral,
    SyntaxKind::BigIntLiteral,
    SyntaxKind::StringLiteral,
    SyntaxKind::NoSubstitutionTemplateLiteral,
    SyntaxKind::OpenBraceToken,
    SyntaxKind::CloseBraceToken,
    SyntaxKind::OpenParenToken,
    SyntaxKind::CloseParenToken,
    SyntaxKind::OpenBracketToken,
    SyntaxKind::CloseBracketToken,
    SyntaxKind::DotToken,
    SyntaxKind::DotDotDotToken,
    SyntaxKind::SemicolonToken,
    SyntaxKind::CommaToken,
    SyntaxKind::QuestionDotToken,
    SyntaxKind::LessThanToken,
    SyntaxKind::GreaterThanToken,
    SyntaxKind::EqualsGreaterThanToken,
    SyntaxKind::PlusToken,
    SyntaxKind::MinusToken,
    SyntaxKind::AsteriskToken,
    SyntaxKind::SlashToken,
    SyntaxKind::PercentToken,
    SyntaxKind::AmpersandToken,
    SyntaxKind::BarToken,
    SyntaxKind::CaretToken,
    SyntaxKind::ExclamationToken,
    SyntaxKind::TildeToken,
    SyntaxKind::QuestionToken,
    SyntaxKind::ColonToken,
    SyntaxKind::AtToken,
    SyntaxKind::HashToken,
    SyntaxKind::BacktickToken,
    SyntaxKind::EqualsToken,
    SyntaxKind::Identifier,
    SyntaxKind::BreakKeyword,
    SyntaxKind::CaseKeyword,
    SyntaxKind::CatchKeyword,
    SyntaxKind::ClassKeyword,
    SyntaxKind::ConstKeyword,
    SyntaxKind::ContinueKeyword,
    SyntaxKind::DebuggerKeyword,
    SyntaxKind::DefaultKeyword,
    SyntaxKind::DeleteKeyword,
    SyntaxKind::DoKeyword,
    SyntaxKind::ElseKeyword,
    SyntaxKind::EnumKeyword,
    SyntaxKind::ExportKeyword,
    SyntaxKind::ExtendsKeyword,
    SyntaxKind::FalseKeyword,
    SyntaxKind::FinallyKeyword,
    SyntaxKind::ForKeyword,
    SyntaxKind::FunctionKeyword,
    SyntaxKind::IfKeyword,
    SyntaxKind::ImportKeyword,
    SyntaxKind::InKeyword,
    SyntaxKind::InstanceOfKeyword,
    SyntaxKind::NewKeyword,
    SyntaxKind::NullKeyword,
    SyntaxKind::ReturnKeyword,
    SyntaxKind::SuperKeyword,
    SyntaxKind::SwitchKeyword,
    SyntaxKind::ThisKeyword,
    SyntaxKind::ThrowKeyword,
    SyntaxKind::TrueKeyword,
    SyntaxKind::TryKeyword,
    SyntaxKind::TypeOfKeyword,
    SyntaxKind::VarKeyword,
    SyntaxKind::VoidKeyword,
    SyntaxKind::WhileKeyword,
    SyntaxKind::WithKeyword,
    SyntaxKind::ImplementsKeyword,
    SyntaxKind::InterfaceKeyword,
    SyntaxKind::LetKeyword,
    SyntaxKind::PackageKeyword,
    SyntaxKind::PrivateKeyword,
    SyntaxKind::ProtectedKeyword,
    SyntaxKind::PublicKeyword,
    SyntaxKind::StaticKeyword,
    SyntaxKind::YieldKeyword,
    SyntaxKind::AbstractKeyword,
    SyntaxKind::AsKeyword,
    SyntaxKind::AssertsKeyword,
    SyntaxKind::AnyKeyword,
    SyntaxKind::AsyncKeyword,
    SyntaxKind::AwaitKeyword,
    SyntaxKind::BigIntKeyword,
    SyntaxKind::BooleanKeyword,
    SyntaxKind::ConstructorKeyword,
    SyntaxKind::DeclareKeyword,
    SyntaxKind::FromKeyword,
    SyntaxKind::GetKeyword,
    SyntaxKind::GlobalKeyword,
    SyntaxKind::InferKeyword,
    SyntaxKind::IsKeyword,
    SyntaxKind::KeyOfKeyword,
    SyntaxKind::ModuleKeyword,
    SyntaxKind::NamespaceKeyword,
    SyntaxKind::NeverKeyword,
    SyntaxKind::NumberKeyword,
    SyntaxKind::ObjectKeyword,
    SyntaxKind::ReadonlyKeyword,
    SyntaxKind::SetKeyword,
    SyntaxKind::StringKeyword,
    SyntaxKind::SymbolKeyword,
    SyntaxKind::TypeKeyword,
    SyntaxKind::UndefinedKeyword,
    SyntaxKind::UniqueKeyword,
    SyntaxKind::UnknownKeyword,
];

/// Map identifier text to its keyword kind. Keywords are case-sensitive.
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    let kind = match text {
        "abstract" => SyntaxKind::AbstractKeyword,
        "any" => SyntaxKind::AnyKeyword,
        "as" => SyntaxKind::AsKeyword,
        "asserts" => SyntaxKind::AssertsKeyword,
        "async" => SyntaxKind::AsyncKeyword,
        "await" => SyntaxKind::AwaitKeyword,
        "bigint" => SyntaxKind::BigIntKeyword,
        "boolean" => SyntaxKind::BooleanKeyword,
        "break" => SyntaxKind::BreakKeyword,
        "case" => SyntaxKind::CaseKeyword,
        "catch" => SyntaxKind::CatchKeyword,
        "class" => SyntaxKind::ClassKeyword,
        "const" => SyntaxKind::ConstKeyword,
        "constructor" => SyntaxKind::ConstructorKeyword,
        "continue" => SyntaxKind::ContinueKeyword,
        "debugger" => SyntaxKind::DebuggerKeyword,
        "declare" => SyntaxKind::DeclareKeyword,
        "default" => SyntaxKind::DefaultKeyword,
        "delete" => SyntaxKind::DeleteKeyword,
        "do" => SyntaxKind::DoKeyword,
        "else" => SyntaxKind::ElseKeyword,
        "enum" => SyntaxKind::EnumKeyword,
        "export" => SyntaxKind::ExportKeyword,
        "extends" => SyntaxKind::ExtendsKeyword,
        "false" => SyntaxKind::FalseKeyword,
        "finally" => SyntaxKind::FinallyKeyword,
        "for" => SyntaxKind::ForKeyword,
        "from" => SyntaxKind::FromKeyword,
        "function" => SyntaxKind::FunctionKeyword,
        "get" => SyntaxKind::GetKeyword,
        "global" => SyntaxKind::GlobalKeyword,
        "if" => SyntaxKind::IfKeyword,
        "implements" => SyntaxKind::ImplementsKeyword,
        "import" => SyntaxKind::ImportKeyword,
        "in" => SyntaxKind::InKeyword,
        "infer" => SyntaxKind::InferKeyword,
        "instanceof" => SyntaxKind::InstanceOfKeyword,
        "interface" => SyntaxKind::InterfaceKeyword,
        "is" => SyntaxKind::IsKeyword,
        "keyof" => SyntaxKind::KeyOfKeyword,
        "let" => SyntaxKind::LetKeyword,
        "module" => SyntaxKind::ModuleKeyword,
        "namespace" => SyntaxKind::NamespaceKeyword,
        "never" => SyntaxKind::NeverKeyword,
        "new" => SyntaxKind::NewKeyword,
        "null" => SyntaxKind::NullKeyword,
        "number" => SyntaxKind::NumberKeyword,
        "object" => SyntaxKind::ObjectKeyword,
        "package" => SyntaxKind::PackageKeyword,
        "private" => SyntaxKind::PrivateKeyword,
        "protected" => SyntaxKind::ProtectedKeyword,
        "public" => SyntaxKind::PublicKeyword,
        "readonly" => SyntaxKind::ReadonlyKeyword,
        "return" => SyntaxKind::ReturnKeyword,
        "set" => SyntaxKind::SetKeyword,
        "static" => SyntaxKind::StaticKeyword,
        "string" => SyntaxKind::StringKeyword,
        "super" => SyntaxKind::SuperKeyword,
        "switch" => SyntaxKind::SwitchKeyword,
        "symbol" => SyntaxKind::SymbolKeyword,
        "this" => SyntaxKind::ThisKeyword,
        "throw" => SyntaxKind::ThrowKeyword,
        "true" => SyntaxKind::TrueKeyword,
        "try" => SyntaxKind::TryKeyword,
        "type" => SyntaxKind::TypeKeyword,
        "typeof" => SyntaxKind::TypeOfKeyword,
        "undefined" => SyntaxKind::UndefinedKeyword,
        "unique" => SyntaxKind::UniqueKeyword,
        "unknown" => SyntaxKind::UnknownKeyword,
        "var" => SyntaxKind::VarKeyword,
        "void" => SyntaxKind::VoidKeyword,
        "while" => SyntaxKind::WhileKeyword,
        "with" => SyntaxKind::WithKeyword,
        "yield" => SyntaxKind::YieldKeyword,
        _ => return None,
    };
    Some(kind)
}

/// Fixed source text of punctuation tokens.
pub fn token_to_text(kind: SyntaxKind) -> Option<&'static str> {
    let text = match kind {
        SyntaxKind::OpenBraceToken => "{",
        SyntaxKind::CloseBraceToken => "}",
        SyntaxKind::OpenParenToken => "(",
        SyntaxKind::CloseParenToken => ")",
        SyntaxKind::OpenBracketToken => "[",
        SyntaxKind::CloseBracketToken => "]",
        SyntaxKind::DotToken => ".",
        SyntaxKind::DotDotDotToken => "...",
        SyntaxKind::SemicolonToken => ";",
        SyntaxKind::CommaToken => ",",
        SyntaxKind::QuestionDotToken => "?.",
        SyntaxKind::LessThanToken => "<",
        SyntaxKind::GreaterThanToken => ">",
        SyntaxKind::EqualsGreaterThanToken => "=>",
        SyntaxKind::PlusToken => "+",
        SyntaxKind::MinusToken => "-",
        SyntaxKind::AsteriskToken => "*",
        SyntaxKind::SlashToken => "/",
        SyntaxKind::PercentToken => "%",
        SyntaxKind::AmpersandToken => "&",
        SyntaxKind::BarToken => "|",
        SyntaxKind::CaretToken => "^",
        SyntaxKind::ExclamationToken => "!",
        SyntaxKind::TildeToken => "~",
        SyntaxKind::QuestionToken => "?",
        SyntaxKind::ColonToken => ":",
        SyntaxKind::AtToken => "@",
        SyntaxKind::HashToken => "#",
        SyntaxKind::BacktickToken => "`",
        SyntaxKind::EqualsToken => "=",
        _ => return None,
    };
    Some(text)
}

/// Any keyword, reserved or contextual.
pub fn token_is_keyword(kind: SyntaxKind) -> bool {
    kind >= SyntaxKind::FIRST_KEYWORD && kind <= SyntaxKind::LAST_KEYWORD
}

/// Keywords that can never be used as an identifier.
pub fn token_is_reserved_word(kind: SyntaxKind) -> bool {
    kind >= SyntaxKind::FIRST_RESERVED_WORD && kind <= SyntaxKind::LAST_RESERVED_WORD
}

/// Identifiers and non-reserved keywords (valid as a binding or type name).
pub fn token_is_identifier(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier || (token_is_keyword(kind) && !token_is_reserved_word(kind))
}

/// Identifiers and every keyword (valid as a property name).
pub fn token_is_identifier_or_keyword(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier || token_is_keyword(kind)
}

pub fn token_is_punctuation(kind: SyntaxKind) -> bool {
    kind >= SyntaxKind::FIRST_PUNCTUATION && kind <= SyntaxKind::LAST_PUNCTUATION
}

pub fn token_is_trivia(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::SingleLineCommentTrivia
            | SyntaxKind::MultiLineCommentTrivia
            | SyntaxKind::NewLineTrivia
            | SyntaxKind::WhitespaceTrivia
    )
}

pub fn token_is_literal(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
    )
}
