//! Structural classification of type annotations.

use crate::model::MappedType;
use tsbind_graph::{DeclarationPart, Primitives, ScalarKind};
use tsbind_parser::{NodeArena, NodeIndex, syntax_kind_ext};
use tsbind_scanner::SyntaxKind;

/// What the reducer needs to know about one type annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TypeShape {
    /// Source text with `null` / `undefined` union members removed.
    pub raw: String,
    pub mapped: MappedType,
    pub is_nullable: bool,
    pub is_array: bool,
    pub is_async: bool,
    pub is_void: bool,
}

impl TypeShape {
    fn unannotated() -> TypeShape {
        TypeShape {
            raw: "any".to_string(),
            mapped: MappedType::Scalar(ScalarKind::Any),
            is_nullable: false,
            is_array: false,
            is_async: false,
            is_void: false,
        }
    }

    pub(crate) fn of(part: &DeclarationPart, node: NodeIndex) -> TypeShape {
        let arena = part.arena();
        if arena.get(node).is_none() {
            return TypeShape::unannotated();
        }

        let (members, is_nullable) = non_nullish_members(arena, node);
        let raw = if is_nullable && !members.is_empty() {
            members
                .iter()
                .map(|&member| part.text(member))
                .collect::<Vec<_>>()
                .join(" | ")
        } else {
            part.text(node).to_string()
        };

        let [single] = members.as_slice() else {
            return TypeShape {
                raw,
                mapped: map_union(part, &members),
                is_nullable,
                is_array: false,
                is_async: false,
                is_void: false,
            };
        };

        let element = array_element(arena, *single);
        let promised = promise_argument(arena, *single);
        let returned = arena.skip_parentheses(promised.unwrap_or(*single));
        TypeShape {
            raw,
            mapped: map_type(part, element.unwrap_or(*single)),
            is_nullable,
            is_array: element.is_some(),
            is_async: promised.is_some(),
            is_void: arena.is_kind(returned, SyntaxKind::VoidKeyword as u16),
        }
    }
}

/// Members of a union that are not `null` / `undefined`, and whether any were
/// dropped. Non-union types are their own single member.
pub(crate) fn non_nullish_members(arena: &NodeArena, node: NodeIndex) -> (Vec<NodeIndex>, bool) {
    let inner = arena.skip_parentheses(node);
    match arena.get_composite_type(inner) {
        Some(union) if arena.is_kind(inner, syntax_kind_ext::UNION_TYPE) => {
            let members: Vec<NodeIndex> = union
                .types
                .iter()
                .filter(|&member| !arena.is_nullish_type(member))
                .collect();
            let dropped = members.len() < union.types.len();
            (members, dropped)
        }
        _ => (vec![node], arena.is_nullish_type(node)),
    }
}

/// Element type of `T[]`, `readonly T[]`, `Array<T>` or `ReadonlyArray<T>`.
pub(crate) fn array_element(arena: &NodeArena, node: NodeIndex) -> Option<NodeIndex> {
    let node = arena.skip_parentheses(node);
    if let Some(array) = arena.get_array_type(node) {
        return Some(array.element_type);
    }
    if let Some(operator) = arena.get_type_operator(node) {
        if operator.operator != SyntaxKind::ReadonlyKeyword as u16 {
            return None;
        }
        let operand = arena.skip_parentheses(operator.type_node);
        return arena.get_array_type(operand).map(|array| array.element_type);
    }
    single_type_argument(arena, node, &["Array", "ReadonlyArray"])
}

/// Argument of `Promise<T>` / `PromiseLike<T>`.
pub(crate) fn promise_argument(arena: &NodeArena, node: NodeIndex) -> Option<NodeIndex> {
    single_type_argument(arena, arena.skip_parentheses(node), &["Promise", "PromiseLike"])
}

fn single_type_argument(arena: &NodeArena, node: NodeIndex, names: &[&str]) -> Option<NodeIndex> {
    let type_ref = arena.get_type_ref(node)?;
    let name = arena.entity_name_text(type_ref.type_name)?;
    if !names.contains(&name.as_str()) {
        return None;
    }
    let arguments = type_ref.type_arguments.as_ref()?;
    match arguments.nodes.as_slice() {
        [argument] => Some(*argument),
        _ => None,
    }
}

pub(crate) fn map_type(part: &DeclarationPart, node: NodeIndex) -> MappedType {
    let arena = part.arena();
    let node = arena.skip_parentheses(node);
    let Some(kind) = arena.kind(node) else {
        return MappedType::Scalar(ScalarKind::Any);
    };
    if NodeArena::is_token_kind(kind) {
        let scalar = Primitives::map_primitive_type(part.text(node)).unwrap_or(ScalarKind::Unknown);
        return MappedType::Scalar(scalar);
    }
    if let Some(element) = array_element(arena, node) {
        return map_type(part, element);
    }
    if let Some(promised) = promise_argument(arena, node) {
        return map_type(part, promised);
    }

    match kind {
        syntax_kind_ext::TYPE_REFERENCE => match arena.type_reference_name(node) {
            Some(name) => match Primitives::map_primitive_type(&name) {
                Some(scalar) => MappedType::Scalar(scalar),
                None => MappedType::Named(name),
            },
            None => MappedType::Scalar(ScalarKind::Unknown),
        },
        syntax_kind_ext::LITERAL_TYPE => MappedType::Scalar(map_literal(arena, node)),
        syntax_kind_ext::UNION_TYPE => {
            let (members, _) = non_nullish_members(arena, node);
            map_union(part, &members)
        }
        syntax_kind_ext::TYPE_OPERATOR => match arena.get_type_operator(node) {
            Some(op) if op.operator == SyntaxKind::KeyOfKeyword as u16 => {
                MappedType::Scalar(ScalarKind::String)
            }
            Some(op) => map_type(part, op.type_node),
            None => MappedType::Scalar(ScalarKind::Unknown),
        },
        syntax_kind_ext::TYPE_LITERAL | syntax_kind_ext::INTERSECTION_TYPE => {
            MappedType::Scalar(ScalarKind::Object)
        }
        syntax_kind_ext::FUNCTION_TYPE
        | syntax_kind_ext::CONSTRUCTOR_TYPE
        | syntax_kind_ext::TUPLE_TYPE => MappedType::Scalar(ScalarKind::Any),
        _ => MappedType::Scalar(ScalarKind::Unknown),
    }
}

fn map_literal(arena: &NodeArena, node: NodeIndex) -> ScalarKind {
    let literal_kind = arena
        .get_literal_type(node)
        .and_then(|literal_type| arena.kind(literal_type.literal));
    match literal_kind.and_then(SyntaxKind::try_from_u16) {
        Some(SyntaxKind::StringLiteral) => ScalarKind::String,
        Some(SyntaxKind::NumericLiteral) => ScalarKind::Number,
        Some(SyntaxKind::BigIntLiteral) => ScalarKind::BigInt,
        Some(SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword) => ScalarKind::Boolean,
        Some(SyntaxKind::NullKeyword) => ScalarKind::Void,
        _ => ScalarKind::Unknown,
    }
}

/// A union maps to its members' common mapping, or `Any` when they differ.
fn map_union(part: &DeclarationPart, members: &[NodeIndex]) -> MappedType {
    let mut mapped = members.iter().map(|&member| map_type(part, member));
    let Some(first) = mapped.next() else {
        return MappedType::Scalar(ScalarKind::Void);
    };
    if mapped.all(|other| other == first) {
        first
    } else {
        MappedType::Scalar(ScalarKind::Any)
    }
}
