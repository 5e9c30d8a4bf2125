//! Typed accessors and traversal helpers for `NodeArena`.

use super::base::NodeIndex;
use super::node::{
    ArrayTypeData, CompositeTypeData, ExprWithTypeArgsData, FunctionTypeData, HeritageData,
    IdentifierData, IndexSignatureData, InterfaceData, JsDocData, JsDocParameterTagData,
    JsDocTagData, JsDocTemplateTagData, JsDocTypeLiteralData, JsDocTypedTagData,
    JsDocTypedefTagData, LiteralData, LiteralTypeData, NamedTupleMemberData, NodeData,
    ParameterData, PropertySignatureData, QualifiedNameData, SignatureData, SourceFileData,
    TupleTypeData, TypeAliasData, TypeLiteralData, TypeOperatorData, TypeParameterData,
    TypeRefData, UnsupportedTypeData, WrappedTypeData,
};
use super::node_arena::NodeArena;
use super::syntax_kind_ext;
use tsbind_scanner::SyntaxKind;

macro_rules! data_accessor {
    ($($(#[$meta:meta])* $fn_name:ident => $variant:ident($ty:ty);)*) => {
        impl NodeArena {
            $(
                $(#[$meta])*
                #[inline]
                pub fn $fn_name(&self, index: NodeIndex) -> Option<&$ty> {
                    match &self.get(index)?.data {
                        NodeData::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            )*
        }
    };
}

data_accessor! {
    get_source_file => SourceFile(SourceFileData);
    get_identifier => Identifier(IdentifierData);
    get_literal => Literal(LiteralData);
    get_qualified_name => QualifiedName(QualifiedNameData);
    get_interface => Interface(InterfaceData);
    get_type_alias => TypeAlias(TypeAliasData);
    get_heritage_clause => HeritageClause(HeritageData);
    get_expr_with_type_args => ExprWithTypeArgs(ExprWithTypeArgsData);
    get_type_parameter => TypeParameter(TypeParameterData);
    /// Method, call or construct signature.
    get_signature => Signature(SignatureData);
    get_property_signature => PropertySignature(PropertySignatureData);
    get_index_signature => IndexSignature(IndexSignatureData);
    get_parameter => Parameter(ParameterData);
    get_type_ref => TypeRef(TypeRefData);
    /// Union or intersection type.
    get_composite_type => CompositeType(CompositeTypeData);
    get_array_type => ArrayType(ArrayTypeData);
    get_tuple_type => TupleType(TupleTypeData);
    get_named_tuple_member => NamedTupleMember(NamedTupleMemberData);
    /// Function or constructor type.
    get_function_type => FunctionType(FunctionTypeData);
    get_type_literal => TypeLiteral(TypeLiteralData);
    get_literal_type => LiteralType(LiteralTypeData);
    get_wrapped_type => WrappedType(WrappedTypeData);
    get_type_operator => TypeOperator(TypeOperatorData);
    get_unsupported_type => Unsupported(UnsupportedTypeData);
    get_jsdoc => JsDoc(JsDocData);
    get_jsdoc_tag => JsDocTag(JsDocTagData);
    /// `@param` or `@property` tag.
    get_jsdoc_parameter_tag => JsDocParameterTag(JsDocParameterTagData);
    /// `@returns`, `@type` or `@augments` tag.
    get_jsdoc_typed_tag => JsDocTypedTag(JsDocTypedTagData);
    get_jsdoc_template_tag => JsDocTemplateTag(JsDocTemplateTagData);
    get_jsdoc_typedef_tag => JsDocTypedefTag(JsDocTypedefTagData);
    get_jsdoc_type_literal => JsDocTypeLiteral(JsDocTypeLiteralData);
}

impl NodeArena {
    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<u16> {
        self.get(index).map(|n| n.kind)
    }

    #[inline]
    pub fn is_kind(&self, index: NodeIndex, kind: u16) -> bool {
        self.kind(index) == Some(kind)
    }

    pub fn get_parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |n| n.parent)
    }

    pub fn get_identifier_text(&self, index: NodeIndex) -> Option<&str> {
        self.get_identifier(index).map(|id| id.escaped_text.as_str())
    }

    /// Text of an identifier or dotted qualified name (`A.B.C`).
    pub fn entity_name_text(&self, index: NodeIndex) -> Option<String> {
        if let Some(text) = self.get_identifier_text(index) {
            return Some(text.to_string());
        }
        let qualified = self.get_qualified_name(index)?;
        let left = self.entity_name_text(qualified.left)?;
        let right = self.get_identifier_text(qualified.right)?;
        Some(format!("{left}.{right}"))
    }

    /// Text of a declaration or member name: identifier, string or numeric literal.
    pub fn property_name_text(&self, index: NodeIndex) -> Option<&str> {
        match &self.get(index)?.data {
            NodeData::Identifier(id) => Some(&id.escaped_text),
            NodeData::Literal(lit) => Some(&lit.text),
            _ => None,
        }
    }

    /// Name text of any named node (declaration, member, parameter).
    pub fn get_name_text(&self, index: NodeIndex) -> Option<&str> {
        let name = self.get(index)?.data.as_named()?.name();
        self.property_name_text(name)
    }

    /// Type annotation of a member, parameter or function type.
    pub fn get_type_annotation(&self, index: NodeIndex) -> NodeIndex {
        self.get(index)
            .and_then(|n| n.data.as_typed())
            .map_or(NodeIndex::NONE, |t| t.type_annotation())
    }

    /// JSDoc comment attached to a declaration or member.
    pub fn get_attached_jsdoc(&self, index: NodeIndex) -> NodeIndex {
        self.get(index)
            .and_then(|n| n.data.as_documented())
            .map_or(NodeIndex::NONE, |d| d.jsdoc())
    }

    /// Name text of a type reference (`Foo`, `A.B`).
    pub fn type_reference_name(&self, index: NodeIndex) -> Option<String> {
        let type_ref = self.get_type_ref(index)?;
        self.entity_name_text(type_ref.type_name)
    }

    /// Source slice covered by `index`.
    pub fn node_text<'a>(&self, index: NodeIndex, source: &'a str) -> &'a str {
        match self.get(index) {
            Some(node) => source
                .get(node.pos as usize..node.end as usize)
                .unwrap_or(""),
            None => "",
        }
    }

    pub fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.get(index).map(|n| n.data.children()).unwrap_or_default()
    }

    /// Every descendant of `root` (excluding `root`) in source order.
    pub fn descendants(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIndex> = self.get_children(root).into_iter().rev().collect();
        while let Some(index) = stack.pop() {
            out.push(index);
            stack.extend(self.get_children(index).into_iter().rev());
        }
        out
    }

    /// Descendants of `root` with the given kind, in source order.
    pub fn descendants_of_kind(&self, root: NodeIndex, kind: u16) -> Vec<NodeIndex> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.is_kind(n, kind))
            .collect()
    }

    /// Walk up from `index` to the nearest ancestor of `kind`.
    pub fn find_ancestor_of_kind(&self, index: NodeIndex, kind: u16) -> Option<NodeIndex> {
        let mut current = self.get_parent(index);
        while current.is_some() {
            if self.is_kind(current, kind) {
                return Some(current);
            }
            current = self.get_parent(current);
        }
        None
    }

    /// Strip parentheses: `((T))` -> `T`.
    pub fn skip_parentheses(&self, mut index: NodeIndex) -> NodeIndex {
        while self.is_kind(index, syntax_kind_ext::PARENTHESIZED_TYPE) {
            match self.get_wrapped_type(index) {
                Some(wrapped) => index = wrapped.type_node,
                None => break,
            }
        }
        index
    }

    /// String literal type (`"foo"`), returning the unquoted value.
    pub fn string_literal_type_value(&self, index: NodeIndex) -> Option<&str> {
        let literal_type = self.get_literal_type(index)?;
        let literal = self.get(literal_type.literal)?;
        if literal.kind != SyntaxKind::StringLiteral as u16 {
            return None;
        }
        self.get_literal(literal_type.literal).map(|l| l.text.as_str())
    }

    /// `null` literal type or `undefined` keyword type.
    pub fn is_nullish_type(&self, index: NodeIndex) -> bool {
        let index = self.skip_parentheses(index);
        let Some(node) = self.get(index) else {
            return false;
        };
        if node.kind == SyntaxKind::UndefinedKeyword as u16 {
            return true;
        }
        self.get_literal_type(index)
            .and_then(|lt| self.get(lt.literal))
            .is_some_and(|lit| lit.kind == SyntaxKind::NullKeyword as u16)
    }

    /// True when `kind` is a token kind (keyword type, punctuation) rather than a node kind.
    pub fn is_token_kind(kind: u16) -> bool {
        SyntaxKind::try_from_u16(kind).is_some()
    }

    /// Tag name of any JSDoc tag (`param`, `returns`, ...).
    pub fn jsdoc_tag_name(&self, index: NodeIndex) -> Option<&str> {
        let tag_name = match &self.get(index)?.data {
            NodeData::JsDocTag(d) => d.tag_name,
            NodeData::JsDocParameterTag(d) => d.tag_name,
            NodeData::JsDocTypedTag(d) => d.tag_name,
            NodeData::JsDocTemplateTag(d) => d.tag_name,
            NodeData::JsDocTypedefTag(d) => d.tag_name,
            _ => return None,
        };
        self.get_identifier_text(tag_name)
    }

    /// Comment text following a JSDoc tag.
    pub fn jsdoc_tag_comment(&self, index: NodeIndex) -> Option<&str> {
        self.get(index)?.data.tag_comment()
    }

    /// Debug rendering of a subtree: one line per node, indented by depth.
    pub fn dump(&self, root: NodeIndex, source: &str) -> String {
        let mut out = String::new();
        self.dump_into(root, source, 0, &mut out);
        out
    }

    fn dump_into(&self, index: NodeIndex, source: &str, depth: usize, out: &mut String) {
        let Some(node) = self.get(index) else {
            return;
        };
        let text = self.node_text(index, source);
        let shown: String = text.chars().take(40).collect();
        out.push_str(&"  ".repeat(depth));
        out.push_str(&syntax_kind_ext::kind_name(node.kind));
        out.push_str(&format!(" [{}..{}] {:?}\n", node.pos, node.end, shown));
        for child in node.data.children() {
            self.dump_into(child, source, depth + 1, out);
        }
    }
}
