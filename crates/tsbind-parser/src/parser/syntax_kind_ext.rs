//! Node kinds that only exist in the syntax tree.
//!
//! Token kinds (including keyword type nodes such as `string`) use the
//! scanner's `SyntaxKind` value directly; the constants below continue the
//! numbering after `SyntaxKind::LAST_TOKEN`.

use tsbind_scanner::SyntaxKind;

const BASE: u16 = SyntaxKind::LAST_TOKEN as u16 + 1;

// Names
pub const QUALIFIED_NAME: u16 = BASE;

// Declarations
pub const SOURCE_FILE: u16 = BASE + 1;
pub const INTERFACE_DECLARATION: u16 = BASE + 2;
pub const TYPE_ALIAS_DECLARATION: u16 = BASE + 3;
pub const HERITAGE_CLAUSE: u16 = BASE + 4;
pub const EXPRESSION_WITH_TYPE_ARGUMENTS: u16 = BASE + 5;
pub const TYPE_PARAMETER: u16 = BASE + 6;
pub const PARAMETER: u16 = BASE + 7;

// Type members
pub const PROPERTY_SIGNATURE: u16 = BASE + 8;
pub const METHOD_SIGNATURE: u16 = BASE + 9;
pub const CALL_SIGNATURE: u16 = BASE + 10;
pub const CONSTRUCT_SIGNATURE: u16 = BASE + 11;
pub const INDEX_SIGNATURE: u16 = BASE + 12;

// Types
pub const TYPE_REFERENCE: u16 = BASE + 13;
pub const FUNCTION_TYPE: u16 = BASE + 14;
pub const CONSTRUCTOR_TYPE: u16 = BASE + 15;
pub const TYPE_QUERY: u16 = BASE + 16;
pub const TYPE_LITERAL: u16 = BASE + 17;
pub const ARRAY_TYPE: u16 = BASE + 18;
pub const TUPLE_TYPE: u16 = BASE + 19;
pub const NAMED_TUPLE_MEMBER: u16 = BASE + 20;
pub const OPTIONAL_TYPE: u16 = BASE + 21;
pub const REST_TYPE: u16 = BASE + 22;
pub const UNION_TYPE: u16 = BASE + 23;
pub const INTERSECTION_TYPE: u16 = BASE + 24;
pub const PARENTHESIZED_TYPE: u16 = BASE + 25;
pub const THIS_TYPE: u16 = BASE + 26;
pub const TYPE_OPERATOR: u16 = BASE + 27;
pub const INDEXED_ACCESS_TYPE: u16 = BASE + 28;
pub const LITERAL_TYPE: u16 = BASE + 29;
/// Placeholder for a skipped type construct (conditional, mapped, template literal, `infer`).
pub const UNSUPPORTED_TYPE: u16 = BASE + 30;

// JSDoc types
pub const JSDOC_TYPE_EXPRESSION: u16 = BASE + 31;
pub const JSDOC_ALL_TYPE: u16 = BASE + 32;
pub const JSDOC_UNKNOWN_TYPE: u16 = BASE + 33;
pub const JSDOC_ARRAY_TYPE: u16 = BASE + 34;
pub const JSDOC_UNION_TYPE: u16 = BASE + 35;
pub const JSDOC_TUPLE_TYPE: u16 = BASE + 36;
pub const JSDOC_NULLABLE_TYPE: u16 = BASE + 37;
pub const JSDOC_NON_NULLABLE_TYPE: u16 = BASE + 38;
pub const JSDOC_RECORD_TYPE: u16 = BASE + 39;
pub const JSDOC_FUNCTION_TYPE: u16 = BASE + 40;
pub const JSDOC_VARIADIC_TYPE: u16 = BASE + 41;
pub const JSDOC_CONSTRUCTOR_TYPE: u16 = BASE + 42;
pub const JSDOC_THIS_TYPE: u16 = BASE + 43;
pub const JSDOC_TYPE_REFERENCE: u16 = BASE + 44;
pub const JSDOC_LITERAL_TYPE: u16 = BASE + 45;
pub const JSDOC_OPTIONAL_TYPE: u16 = BASE + 46;
pub const JSDOC_TYPE_LITERAL: u16 = BASE + 47;

// JSDoc comment and tags
pub const JSDOC_COMMENT: u16 = BASE + 48;
pub const JSDOC_TAG: u16 = BASE + 49;
pub const JSDOC_AUGMENTS_TAG: u16 = BASE + 50;
pub const JSDOC_PARAMETER_TAG: u16 = BASE + 51;
pub const JSDOC_RETURN_TAG: u16 = BASE + 52;
pub const JSDOC_TYPE_TAG: u16 = BASE + 53;
pub const JSDOC_TEMPLATE_TAG: u16 = BASE + 54;
pub const JSDOC_TYPEDEF_TAG: u16 = BASE + 55;
pub const JSDOC_PROPERTY_TAG: u16 = BASE + 56;

/// Human-readable name of a node or token kind, for debugging output.
pub fn kind_name(kind: u16) -> String {
    if let Some(token) = SyntaxKind::try_from_u16(kind) {
        return format!("{token:?}");
    }
    let name = match kind {
        QUALIFIED_NAME => "QualifiedName",
        SOURCE_FILE => "SourceFile",
        INTERFACE_DECLARATION => "InterfaceDeclaration",
        TYPE_ALIAS_DECLARATION => "TypeAliasDeclaration",
        HERITAGE_CLAUSE => "HeritageClause",
        EXPRESSION_WITH_TYPE_ARGUMENTS => "ExpressionWithTypeArguments",
        TYPE_PARAMETER => "TypeParameter",
        PARAMETER => "Parameter",
        PROPERTY_SIGNATURE => "PropertySignature",
        METHOD_SIGNATURE => "MethodSignature",
        CALL_SIGNATURE => "CallSignature",
        CONSTRUCT_SIGNATURE => "ConstructSignature",
        INDEX_SIGNATURE => "IndexSignature",
        TYPE_REFERENCE => "TypeReference",
        FUNCTION_TYPE => "FunctionType",
        CONSTRUCTOR_TYPE => "ConstructorType",
        TYPE_QUERY => "TypeQuery",
        TYPE_LITERAL => "TypeLiteral",
        ARRAY_TYPE => "ArrayType",
        TUPLE_TYPE => "TupleType",
        NAMED_TUPLE_MEMBER => "NamedTupleMember",
        OPTIONAL_TYPE => "OptionalType",
        REST_TYPE => "RestType",
        UNION_TYPE => "UnionType",
        INTERSECTION_TYPE => "IntersectionType",
        PARENTHESIZED_TYPE => "ParenthesizedType",
        THIS_TYPE => "ThisType",
        TYPE_OPERATOR => "TypeOperator",
        INDEXED_ACCESS_TYPE => "IndexedAccessType",
        LITERAL_TYPE => "LiteralType",
        UNSUPPORTED_TYPE => "UnsupportedType",
        JSDOC_TYPE_EXPRESSION => "JSDocTypeExpression",
        JSDOC_ALL_TYPE => "JSDocAllType",
        JSDOC_UNKNOWN_TYPE => "JSDocUnknownType",
        JSDOC_ARRAY_TYPE => "JSDocArrayType",
        JSDOC_UNION_TYPE => "JSDocUnionType",
        JSDOC_TUPLE_TYPE => "JSDocTupleType",
        JSDOC_NULLABLE_TYPE => "JSDocNullableType",
        JSDOC_NON_NULLABLE_TYPE => "JSDocNonNullableType",
        JSDOC_RECORD_TYPE => "JSDocRecordType",
        JSDOC_FUNCTION_TYPE => "JSDocFunctionType",
        JSDOC_VARIADIC_TYPE => "JSDocVariadicType",
        JSDOC_CONSTRUCTOR_TYPE => "JSDocConstructorType",
        JSDOC_THIS_TYPE => "JSDocThisType",
        JSDOC_TYPE_REFERENCE => "JSDocTypeReference",
        JSDOC_LITERAL_TYPE => "JSDocLiteralType",
        JSDOC_OPTIONAL_TYPE => "JSDocOptionalType",
        JSDOC_TYPE_LITERAL => "JSDocTypeLiteral",
        JSDOC_COMMENT => "JSDocComment",
        JSDOC_TAG => "JSDocTag",
        JSDOC_AUGMENTS_TAG => "JSDocAugmentsTag",
        JSDOC_PARAMETER_TAG => "JSDocParameterTag",
        JSDOC_RETURN_TAG => "JSDocReturnTag",
        JSDOC_TYPE_TAG => "JSDocTypeTag",
        JSDOC_TEMPLATE_TAG => "JSDocTemplateTag",
        JSDOC_TYPEDEF_TAG => "JSDocTypedefTag",
        JSDOC_PROPERTY_TAG => "JSDocPropertyTag",
        _ => "Unknown",
    };
    name.to_string()
}

/// Kinds that denote a type node in a type position.
pub fn is_type_node_kind(kind: u16) -> bool {
    if let Some(token) = SyntaxKind::try_from_u16(kind) {
        return matches!(
            token,
            SyntaxKind::AnyKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::BigIntKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::VoidKeyword
        );
    }
    (TYPE_REFERENCE..=UNSUPPORTED_TYPE).contains(&kind)
        || (JSDOC_TYPE_EXPRESSION..=JSDOC_TYPE_LITERAL).contains(&kind)
}
