//! Node arena: contiguous storage for syntax tree nodes, referenced by `NodeIndex`.

use super::base::{NodeIndex, NodeList};
use super::node::{
    ArrayTypeData, CompositeTypeData, ExprWithTypeArgsData, FunctionTypeData, HeritageData,
    IdentifierData, IndexSignatureData, IndexedAccessTypeData, InterfaceData, JsDocData,
    JsDocParameterTagData, JsDocTagData, JsDocTemplateTagData, JsDocTypeLiteralData,
    JsDocTypedTagData, JsDocTypedefTagData, LiteralData, LiteralTypeData, NamedTupleMemberData,
    Node, NodeData, ParameterData, PropertySignatureData, QualifiedNameData, SignatureData,
    SourceFileData, TupleTypeData, TypeAliasData, TypeLiteralData, TypeOperatorData,
    TypeParameterData, TypeQueryData, TypeRefData, UnsupportedTypeData, WrappedTypeData,
};
use super::syntax_kind_ext;
use serde::Serialize;
use tsbind_scanner::SyntaxKind;

/// Arena-based storage for syntax tree nodes.
/// Nodes are stored contiguously and referenced by index.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, kind: u16, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(Node {
            kind,
            flags: 0,
            pos,
            end,
            parent: NodeIndex::NONE,
            data,
        });
        NodeIndex(index)
    }

    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node added after the arena had `len` nodes.
    /// Used to discard nodes created during a rolled-back speculative parse.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn set_flags(&mut self, index: NodeIndex, flags: u16) {
        if let Some(node) = self.get_mut(index) {
            node.flags |= flags;
        }
    }

    pub fn set_end(&mut self, index: NodeIndex, end: u32) {
        if let Some(node) = self.get_mut(index) {
            node.end = end;
        }
    }

    /// Set `parent` on every node reachable from `root`.
    pub fn fixup_parent_references(&mut self, root: NodeIndex) {
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            let children = match self.get(parent) {
                Some(node) => node.data.children(),
                None => continue,
            };
            for child in children {
                if let Some(node) = self.get_mut(child) {
                    node.parent = parent;
                    stack.push(child);
                }
            }
        }
    }

    // =========================================================================
    // Typed constructors
    // =========================================================================

    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        self.add(kind, pos, end, NodeData::None)
    }

    pub fn add_identifier(&mut self, pos: u32, end: u32, escaped_text: String) -> NodeIndex {
        self.add(
            SyntaxKind::Identifier as u16,
            pos,
            end,
            NodeData::Identifier(IdentifierData { escaped_text }),
        )
    }

    pub fn add_literal(&mut self, kind: u16, pos: u32, end: u32, data: LiteralData) -> NodeIndex {
        self.add(kind, pos, end, NodeData::Literal(data))
    }

    pub fn add_qualified_name(
        &mut self,
        pos: u32,
        end: u32,
        data: QualifiedNameData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::QUALIFIED_NAME,
            pos,
            end,
            NodeData::QualifiedName(data),
        )
    }

    pub fn add_source_file(&mut self, pos: u32, end: u32, data: SourceFileData) -> NodeIndex {
        self.add(
            syntax_kind_ext::SOURCE_FILE,
            pos,
            end,
            NodeData::SourceFile(data),
        )
    }

    pub fn add_interface(&mut self, pos: u32, end: u32, data: InterfaceData) -> NodeIndex {
        self.add(
            syntax_kind_ext::INTERFACE_DECLARATION,
            pos,
            end,
            NodeData::Interface(data),
        )
    }

    pub fn add_type_alias(&mut self, pos: u32, end: u32, data: TypeAliasData) -> NodeIndex {
        self.add(
            syntax_kind_ext::TYPE_ALIAS_DECLARATION,
            pos,
            end,
            NodeData::TypeAlias(data),
        )
    }

    pub fn add_heritage_clause(&mut self, pos: u32, end: u32, data: HeritageData) -> NodeIndex {
        self.add(
            syntax_kind_ext::HERITAGE_CLAUSE,
            pos,
            end,
            NodeData::HeritageClause(data),
        )
    }

    pub fn add_expr_with_type_args(
        &mut self,
        pos: u32,
        end: u32,
        data: ExprWithTypeArgsData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::EXPRESSION_WITH_TYPE_ARGUMENTS,
            pos,
            end,
            NodeData::ExprWithTypeArgs(data),
        )
    }

    pub fn add_type_parameter(
        &mut self,
        pos: u32,
        end: u32,
        data: TypeParameterData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::TYPE_PARAMETER,
            pos,
            end,
            NodeData::TypeParameter(data),
        )
    }

    /// Method, call or construct signature, selected by `kind`.
    pub fn add_signature(&mut self, kind: u16, pos: u32, end: u32, data: SignatureData) -> NodeIndex {
        self.add(kind, pos, end, NodeData::Signature(data))
    }

    pub fn add_property_signature(
        &mut self,
        pos: u32,
        end: u32,
        data: PropertySignatureData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::PROPERTY_SIGNATURE,
            pos,
            end,
            NodeData::PropertySignature(data),
        )
    }

    pub fn add_index_signature(
        &mut self,
        pos: u32,
        end: u32,
        data: IndexSignatureData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::INDEX_SIGNATURE,
            pos,
            end,
            NodeData::IndexSignature(data),
        )
    }

    pub fn add_parameter(&mut self, pos: u32, end: u32, data: ParameterData) -> NodeIndex {
        self.add(
            syntax_kind_ext::PARAMETER,
            pos,
            end,
            NodeData::Parameter(data),
        )
    }

    pub fn add_type_ref(&mut self, kind: u16, pos: u32, end: u32, data: TypeRefData) -> NodeIndex {
        self.add(kind, pos, end, NodeData::TypeRef(data))
    }

    /// Union or intersection type, selected by `kind`.
    pub fn add_composite_type(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: CompositeTypeData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::CompositeType(data))
    }

    pub fn add_array_type(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ArrayTypeData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::ArrayType(data))
    }

    pub fn add_tuple_type(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: TupleTypeData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::TupleType(data))
    }

    pub fn add_named_tuple_member(
        &mut self,
        pos: u32,
        end: u32,
        data: NamedTupleMemberData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::NAMED_TUPLE_MEMBER,
            pos,
            end,
            NodeData::NamedTupleMember(data),
        )
    }

    /// Function or constructor type, selected by `kind`.
    pub fn add_function_type(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: FunctionTypeData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::FunctionType(data))
    }

    pub fn add_type_literal(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: TypeLiteralData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::TypeLiteral(data))
    }

    pub fn add_literal_type(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: LiteralTypeData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::LiteralType(data))
    }

    /// Parenthesized/rest/optional types and the JSDoc wrapper types.
    pub fn add_wrapped_type(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: WrappedTypeData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::WrappedType(data))
    }

    pub fn add_type_operator(&mut self, pos: u32, end: u32, data: TypeOperatorData) -> NodeIndex {
        self.add(
            syntax_kind_ext::TYPE_OPERATOR,
            pos,
            end,
            NodeData::TypeOperator(data),
        )
    }

    pub fn add_indexed_access_type(
        &mut self,
        pos: u32,
        end: u32,
        data: IndexedAccessTypeData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::INDEXED_ACCESS_TYPE,
            pos,
            end,
            NodeData::IndexedAccessType(data),
        )
    }

    pub fn add_type_query(&mut self, pos: u32, end: u32, data: TypeQueryData) -> NodeIndex {
        self.add(
            syntax_kind_ext::TYPE_QUERY,
            pos,
            end,
            NodeData::TypeQuery(data),
        )
    }

    pub fn add_unsupported_type(
        &mut self,
        pos: u32,
        end: u32,
        data: UnsupportedTypeData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::UNSUPPORTED_TYPE,
            pos,
            end,
            NodeData::Unsupported(data),
        )
    }

    pub fn add_jsdoc(&mut self, pos: u32, end: u32, data: JsDocData) -> NodeIndex {
        self.add(
            syntax_kind_ext::JSDOC_COMMENT,
            pos,
            end,
            NodeData::JsDoc(data),
        )
    }

    pub fn add_jsdoc_tag(&mut self, pos: u32, end: u32, data: JsDocTagData) -> NodeIndex {
        self.add(syntax_kind_ext::JSDOC_TAG, pos, end, NodeData::JsDocTag(data))
    }

    /// `@param` or `@property` tag, selected by `kind`.
    pub fn add_jsdoc_parameter_tag(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: JsDocParameterTagData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::JsDocParameterTag(data))
    }

    /// `@returns`, `@type` or `@augments` tag, selected by `kind`.
    pub fn add_jsdoc_typed_tag(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: JsDocTypedTagData,
    ) -> NodeIndex {
        self.add(kind, pos, end, NodeData::JsDocTypedTag(data))
    }

    pub fn add_jsdoc_template_tag(
        &mut self,
        pos: u32,
        end: u32,
        data: JsDocTemplateTagData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::JSDOC_TEMPLATE_TAG,
            pos,
            end,
            NodeData::JsDocTemplateTag(data),
        )
    }

    pub fn add_jsdoc_typedef_tag(
        &mut self,
        pos: u32,
        end: u32,
        data: JsDocTypedefTagData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::JSDOC_TYPEDEF_TAG,
            pos,
            end,
            NodeData::JsDocTypedefTag(data),
        )
    }

    pub fn add_jsdoc_type_literal(
        &mut self,
        pos: u32,
        end: u32,
        data: JsDocTypeLiteralData,
    ) -> NodeIndex {
        self.add(
            syntax_kind_ext::JSDOC_TYPE_LITERAL,
            pos,
            end,
            NodeData::JsDocTypeLiteral(data),
        )
    }

    /// Build a `NodeList` spanning its first and last node.
    pub fn make_node_list(&self, nodes: Vec<NodeIndex>) -> NodeList {
        let pos = nodes
            .first()
            .and_then(|&n| self.get(n))
            .map_or(0, |n| n.pos);
        let end = nodes.last().and_then(|&n| self.get(n)).map_or(pos, |n| n.end);
        NodeList {
            nodes,
            pos,
            end,
            has_trailing_comma: false,
        }
    }
}
