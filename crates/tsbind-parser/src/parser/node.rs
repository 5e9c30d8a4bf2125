//! Syntax tree nodes.
//!
//! Each `Node` is a small header (`kind`, `flags`, `pos`, `end`, `parent`)
//! plus a `NodeData` payload. `NodeData` is a closed sum type with one variant
//! per syntactic category; nodes that share a layout (union and intersection
//! types, method/call/construct signatures, the JSDoc wrapper types) share a
//! variant and are told apart by `kind`.
//!
//! Cross-cutting capabilities ("has a name", "has a type annotation", "has
//! parameters") are the small traits at the bottom of this file, implemented
//! by the per-variant data structs.

use super::base::{NodeIndex, NodeList};
use serde::{Deserialize, Serialize};

/// Node flags (stored in `Node::flags`).
pub mod node_flags {
    pub const NONE: u16 = 0;
    /// Union whose members are all string literal types.
    pub const STRING_LITERAL_UNION: u16 = 1 << 0;
    /// Declaration or member has an attached JSDoc comment.
    pub const HAS_JSDOC: u16 = 1 << 1;
    /// Node was synthesized during error recovery (missing identifier or type).
    pub const MISSING: u16 = 1 << 2;
    /// Declaration carries the `declare` modifier.
    pub const AMBIENT: u16 = 1 << 3;
    /// Declaration carries the `export` modifier.
    pub const EXPORTED: u16 = 1 << 4;
    /// JSDoc `?`/`!` written after the type rather than before it.
    pub const JSDOC_POSTFIX: u16 = 1 << 5;
    /// Parse errors were reported inside this node.
    pub const THIS_NODE_HAS_ERROR: u16 = 1 << 6;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    /// `SyntaxKind` value for tokens, `syntax_kind_ext` value for other nodes.
    pub kind: u16,
    pub flags: u16,
    pub pos: u32,
    pub end: u32,
    /// Set by `NodeArena::fixup_parent_references`.
    pub parent: NodeIndex,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }
}

// =============================================================================
// Node payloads
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeData {
    /// Tokens, keyword types, `this` types and JSDoc `*`/`?` types.
    None,
    SourceFile(SourceFileData),
    Identifier(IdentifierData),
    Literal(LiteralData),
    QualifiedName(QualifiedNameData),
    Interface(InterfaceData),
    TypeAlias(TypeAliasData),
    HeritageClause(HeritageData),
    ExprWithTypeArgs(ExprWithTypeArgsData),
    TypeParameter(TypeParameterData),
    /// Method, call and construct signatures.
    Signature(SignatureData),
    PropertySignature(PropertySignatureData),
    IndexSignature(IndexSignatureData),
    Parameter(ParameterData),
    TypeRef(TypeRefData),
    /// Union and intersection types.
    CompositeType(CompositeTypeData),
    ArrayType(ArrayTypeData),
    TupleType(TupleTypeData),
    NamedTupleMember(NamedTupleMemberData),
    /// Function and constructor types.
    FunctionType(FunctionTypeData),
    TypeLiteral(TypeLiteralData),
    LiteralType(LiteralTypeData),
    /// Parenthesized, rest and optional types, and JSDoc wrapper types.
    WrappedType(WrappedTypeData),
    TypeOperator(TypeOperatorData),
    IndexedAccessType(IndexedAccessTypeData),
    TypeQuery(TypeQueryData),
    Unsupported(UnsupportedTypeData),
    JsDoc(JsDocData),
    JsDocTag(JsDocTagData),
    JsDocParameterTag(JsDocParameterTagData),
    /// `@returns`, `@type` and `@augments`.
    JsDocTypedTag(JsDocTypedTagData),
    JsDocTemplateTag(JsDocTemplateTagData),
    JsDocTypedefTag(JsDocTypedefTagData),
    JsDocTypeLiteral(JsDocTypeLiteralData),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
    pub end_of_file_token: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// String, numeric, bigint and template literals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiteralData {
    pub text: String,
    /// For numeric literals only
    pub value: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InterfaceData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
    pub jsdoc: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeAliasData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub type_node: NodeIndex,
    pub jsdoc: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeritageData {
    /// `ExtendsKeyword` or `ImplementsKeyword`
    pub token: u16,
    pub types: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExprWithTypeArgsData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignatureData {
    pub modifiers: Option<NodeList>,
    /// `NodeIndex::NONE` for call and construct signatures.
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    pub jsdoc: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertySignatureData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    pub jsdoc: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexSignatureData {
    pub modifiers: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    pub jsdoc: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterData {
    pub modifiers: Option<NodeList>,
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    /// Initializers are skipped structurally; only their presence is kept.
    pub has_initializer: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompositeTypeData {
    pub types: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArrayTypeData {
    pub element_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TupleTypeData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedTupleMemberData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionTypeData {
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeLiteralData {
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiteralTypeData {
    pub literal: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WrappedTypeData {
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeOperatorData {
    /// `KeyOfKeyword`, `ReadonlyKeyword` or `UniqueKeyword`
    pub operator: u16,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexedAccessTypeData {
    pub object_type: NodeIndex,
    pub index_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeQueryData {
    pub expr_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnsupportedTypeData {
    /// Name of the skipped construct, e.g. "conditional type".
    pub construct: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsDocData {
    pub comment: Option<String>,
    pub tags: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsDocTagData {
    pub tag_name: NodeIndex,
    pub comment: String,
}

/// `@param` and `@property` tags.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsDocParameterTagData {
    pub tag_name: NodeIndex,
    pub name: NodeIndex,
    pub type_expression: NodeIndex,
    pub is_bracketed: bool,
    /// Name written before the `{Type}`.
    pub is_name_first: bool,
    pub comment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsDocTypedTagData {
    pub tag_name: NodeIndex,
    pub type_expression: NodeIndex,
    pub comment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsDocTemplateTagData {
    pub tag_name: NodeIndex,
    pub type_parameters: NodeList,
    pub comment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsDocTypedefTagData {
    pub tag_name: NodeIndex,
    /// Namespace-qualified name as written (identifier or qualified name).
    pub full_name: NodeIndex,
    /// Rightmost identifier of `full_name`.
    pub name: NodeIndex,
    pub type_expression: NodeIndex,
    /// `@property` children, when the typedef is `Object` or untyped.
    pub type_literal: NodeIndex,
    pub comment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsDocTypeLiteralData {
    pub property_tags: NodeList,
    pub type_tag: NodeIndex,
}

// =============================================================================
// Child enumeration
// =============================================================================

fn push_list(out: &mut Vec<NodeIndex>, list: &NodeList) {
    out.extend(list.nodes.iter().copied().filter(|n| n.is_some()));
}

fn push_opt_list(out: &mut Vec<NodeIndex>, list: &Option<NodeList>) {
    if let Some(list) = list {
        push_list(out, list);
    }
}

fn push(out: &mut Vec<NodeIndex>, node: NodeIndex) {
    if node.is_some() {
        out.push(node);
    }
}

impl NodeData {
    /// Direct children in source order. JSDoc comments come first because
    /// they precede the node they document.
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        match self {
            NodeData::None | NodeData::Identifier(_) | NodeData::Literal(_) => {}
            NodeData::Unsupported(_) => {}
            NodeData::SourceFile(d) => {
                push_list(&mut out, &d.statements);
                push(&mut out, d.end_of_file_token);
            }
            NodeData::QualifiedName(d) => {
                push(&mut out, d.left);
                push(&mut out, d.right);
            }
            NodeData::Interface(d) => {
                push(&mut out, d.jsdoc);
                push_opt_list(&mut out, &d.modifiers);
                push(&mut out, d.name);
                push_opt_list(&mut out, &d.type_parameters);
                push_opt_list(&mut out, &d.heritage_clauses);
                push_list(&mut out, &d.members);
            }
            NodeData::TypeAlias(d) => {
                push(&mut out, d.jsdoc);
                push_opt_list(&mut out, &d.modifiers);
                push(&mut out, d.name);
                push_opt_list(&mut out, &d.type_parameters);
                push(&mut out, d.type_node);
            }
            NodeData::HeritageClause(d) => push_list(&mut out, &d.types),
            NodeData::ExprWithTypeArgs(d) => {
                push(&mut out, d.expression);
                push_opt_list(&mut out, &d.type_arguments);
            }
            NodeData::TypeParameter(d) => {
                push(&mut out, d.name);
                push(&mut out, d.constraint);
                push(&mut out, d.default);
            }
            NodeData::Signature(d) => {
                push(&mut out, d.jsdoc);
                push_opt_list(&mut out, &d.modifiers);
                push(&mut out, d.name);
                push_opt_list(&mut out, &d.type_parameters);
                push_list(&mut out, &d.parameters);
                push(&mut out, d.type_annotation);
            }
            NodeData::PropertySignature(d) => {
                push(&mut out, d.jsdoc);
                push_opt_list(&mut out, &d.modifiers);
                push(&mut out, d.name);
                push(&mut out, d.type_annotation);
            }
            NodeData::IndexSignature(d) => {
                push(&mut out, d.jsdoc);
                push_opt_list(&mut out, &d.modifiers);
                push_list(&mut out, &d.parameters);
                push(&mut out, d.type_annotation);
            }
            NodeData::Parameter(d) => {
                push_opt_list(&mut out, &d.modifiers);
                push(&mut out, d.name);
                push(&mut out, d.type_annotation);
            }
            NodeData::TypeRef(d) => {
                push(&mut out, d.type_name);
                push_opt_list(&mut out, &d.type_arguments);
            }
            NodeData::CompositeType(d) => push_list(&mut out, &d.types),
            NodeData::ArrayType(d) => push(&mut out, d.element_type),
            NodeData::TupleType(d) => push_list(&mut out, &d.elements),
            NodeData::NamedTupleMember(d) => {
                push(&mut out, d.name);
                push(&mut out, d.type_node);
            }
            NodeData::FunctionType(d) => {
                push_opt_list(&mut out, &d.type_parameters);
                push_list(&mut out, &d.parameters);
                push(&mut out, d.type_annotation);
            }
            NodeData::TypeLiteral(d) => push_list(&mut out, &d.members),
            NodeData::LiteralType(d) => push(&mut out, d.literal),
            NodeData::WrappedType(d) => push(&mut out, d.type_node),
            NodeData::TypeOperator(d) => push(&mut out, d.type_node),
            NodeData::IndexedAccessType(d) => {
                push(&mut out, d.object_type);
                push(&mut out, d.index_type);
            }
            NodeData::TypeQuery(d) => {
                push(&mut out, d.expr_name);
                push_opt_list(&mut out, &d.type_arguments);
            }
            NodeData::JsDoc(d) => push_list(&mut out, &d.tags),
            NodeData::JsDocTag(d) => push(&mut out, d.tag_name),
            NodeData::JsDocParameterTag(d) => {
                push(&mut out, d.tag_name);
                if d.is_name_first {
                    push(&mut out, d.name);
                    push(&mut out, d.type_expression);
                } else {
                    push(&mut out, d.type_expression);
                    push(&mut out, d.name);
                }
            }
            NodeData::JsDocTypedTag(d) => {
                push(&mut out, d.tag_name);
                push(&mut out, d.type_expression);
            }
            NodeData::JsDocTemplateTag(d) => {
                push(&mut out, d.tag_name);
                push_list(&mut out, &d.type_parameters);
            }
            NodeData::JsDocTypedefTag(d) => {
                push(&mut out, d.tag_name);
                push(&mut out, d.type_expression);
                push(&mut out, d.full_name);
                push(&mut out, d.type_literal);
            }
            NodeData::JsDocTypeLiteral(d) => {
                push_list(&mut out, &d.property_tags);
                push(&mut out, d.type_tag);
            }
        }
        out
    }

    /// Comment text of a JSDoc tag, if this is one.
    pub fn tag_comment(&self) -> Option<&str> {
        match self {
            NodeData::JsDocTag(d) => Some(&d.comment),
            NodeData::JsDocParameterTag(d) => Some(&d.comment),
            NodeData::JsDocTypedTag(d) => Some(&d.comment),
            NodeData::JsDocTemplateTag(d) => Some(&d.comment),
            NodeData::JsDocTypedefTag(d) => Some(&d.comment),
            _ => None,
        }
    }

    pub(crate) fn set_tag_comment(&mut self, comment: String) {
        match self {
            NodeData::JsDocTag(d) => d.comment = comment,
            NodeData::JsDocParameterTag(d) => d.comment = comment,
            NodeData::JsDocTypedTag(d) => d.comment = comment,
            NodeData::JsDocTemplateTag(d) => d.comment = comment,
            NodeData::JsDocTypedefTag(d) => d.comment = comment,
            _ => {}
        }
    }

    pub fn as_named(&self) -> Option<&dyn HasName> {
        match self {
            NodeData::Interface(d) => Some(d),
            NodeData::TypeAlias(d) => Some(d),
            NodeData::Signature(d) => Some(d),
            NodeData::PropertySignature(d) => Some(d),
            NodeData::Parameter(d) => Some(d),
            NodeData::TypeParameter(d) => Some(d),
            NodeData::NamedTupleMember(d) => Some(d),
            NodeData::JsDocParameterTag(d) => Some(d),
            NodeData::JsDocTypedefTag(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_typed(&self) -> Option<&dyn HasTypeAnnotation> {
        match self {
            NodeData::Signature(d) => Some(d),
            NodeData::PropertySignature(d) => Some(d),
            NodeData::IndexSignature(d) => Some(d),
            NodeData::Parameter(d) => Some(d),
            NodeData::FunctionType(d) => Some(d),
            NodeData::TypeAlias(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_parameterized(&self) -> Option<&dyn HasParameters> {
        match self {
            NodeData::Signature(d) => Some(d),
            NodeData::IndexSignature(d) => Some(d),
            NodeData::FunctionType(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_documented(&self) -> Option<&dyn HasJsDoc> {
        match self {
            NodeData::Interface(d) => Some(d),
            NodeData::TypeAlias(d) => Some(d),
            NodeData::Signature(d) => Some(d),
            NodeData::PropertySignature(d) => Some(d),
            NodeData::IndexSignature(d) => Some(d),
            _ => None,
        }
    }
}

// =============================================================================
// Capability traits
// =============================================================================

/// Nodes that declare a name.
pub trait HasName {
    fn name(&self) -> NodeIndex;
}

/// Nodes with a type annotation (`: T`, or the aliased type of a type alias).
pub trait HasTypeAnnotation {
    fn type_annotation(&self) -> NodeIndex;
}

/// Nodes with a parameter list.
pub trait HasParameters {
    fn parameters(&self) -> &NodeList;
}

pub trait HasTypeParameters {
    fn type_parameters(&self) -> Option<&NodeList>;
}

/// Declarations and members that can carry a JSDoc comment.
pub trait HasJsDoc {
    fn jsdoc(&self) -> NodeIndex;
}

macro_rules! impl_has_name {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(impl HasName for $ty {
            fn name(&self) -> NodeIndex {
                self.$field
            }
        })*
    };
}

impl_has_name!(
    InterfaceData => name,
    TypeAliasData => name,
    SignatureData => name,
    PropertySignatureData => name,
    ParameterData => name,
    TypeParameterData => name,
    NamedTupleMemberData => name,
    JsDocParameterTagData => name,
    JsDocTypedefTagData => name,
);

macro_rules! impl_has_type_annotation {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(impl HasTypeAnnotation for $ty {
            fn type_annotation(&self) -> NodeIndex {
                self.$field
            }
        })*
    };
}

impl_has_type_annotation!(
    SignatureData => type_annotation,
    PropertySignatureData => type_annotation,
    IndexSignatureData => type_annotation,
    ParameterData => type_annotation,
    FunctionTypeData => type_annotation,
    TypeAliasData => type_node,
);

impl HasParameters for SignatureData {
    fn parameters(&self) -> &NodeList {
        &self.parameters
    }
}

impl HasParameters for IndexSignatureData {
    fn parameters(&self) -> &NodeList {
        &self.parameters
    }
}

impl HasParameters for FunctionTypeData {
    fn parameters(&self) -> &NodeList {
        &self.parameters
    }
}

impl HasTypeParameters for InterfaceData {
    fn type_parameters(&self) -> Option<&NodeList> {
        self.type_parameters.as_ref()
    }
}

impl HasTypeParameters for TypeAliasData {
    fn type_parameters(&self) -> Option<&NodeList> {
        self.type_parameters.as_ref()
    }
}

impl HasTypeParameters for SignatureData {
    fn type_parameters(&self) -> Option<&NodeList> {
        self.type_parameters.as_ref()
    }
}

impl HasTypeParameters for FunctionTypeData {
    fn type_parameters(&self) -> Option<&NodeList> {
        self.type_parameters.as_ref()
    }
}

macro_rules! impl_has_jsdoc {
    ($($ty:ty),* $(,)?) => {
        $(impl HasJsDoc for $ty {
            fn jsdoc(&self) -> NodeIndex {
                self.jsdoc
            }
        })*
    };
}

impl_has_jsdoc!(
    InterfaceData,
    TypeAliasData,
    SignatureData,
    PropertySignatureData,
    IndexSignatureData,
);
