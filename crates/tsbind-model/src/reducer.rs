//! Reduction of a dependency graph into the object model.
//!
//! The reducer walks each `Dependency` once, reading the parsed declaration
//! parts it carries and producing owned model values. Interfaces contribute
//! heritage, properties, methods and call signatures; type aliases contribute
//! enum values (string-literal unions), composition links (unions and
//! intersections of named types), an array element type, members (type
//! literals) or a call signature (function types).

use crate::model::{
    ActionDescriptor, CallSignatureModel, EnumValue, MappedType, MethodModel, ObjectModel,
    ParameterModel, PropertyModel, TopLevelObject, enum_values,
};
use crate::shape::{TypeShape, array_element, non_nullish_members};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};
use tsbind_graph::{Declaration, DeclarationKind, DeclarationPart, Dependency};
use tsbind_parser::{NodeArena, NodeIndex, NodeList, syntax_kind_ext};
use tsbind_scanner::SyntaxKind;

#[derive(Debug, Error)]
pub enum ReduceError {
    #[error("declaration '{0}' has no parsed blocks")]
    EmptyDeclaration(String),
    #[error("expected {expected} for '{name}' in {file}, found {found}")]
    UnexpectedNode {
        name: String,
        file: String,
        expected: &'static str,
        found: String,
    },
    #[error("type alias '{0}' has no aliased type")]
    MissingAliasedType(String),
}

#[derive(Clone, Debug)]
pub struct ReducerOptions {
    /// Heritage names dropped from `extends` (marker bases such as `EventTarget`).
    pub marker_bases: Vec<String>,
    /// Skip `on*` properties and `*EventListener` methods.
    pub skip_event_handlers: bool,
    /// Parameters whose name ends with this suffix may become actions.
    pub callback_suffix: String,
}

impl Default for ReducerOptions {
    fn default() -> Self {
        ReducerOptions {
            marker_bases: vec!["EventTarget".to_string()],
            skip_event_handlers: true,
            callback_suffix: "Callback".to_string(),
        }
    }
}

/// Members gathered from every part of one declaration.
#[derive(Default)]
struct ReducedBody {
    documentation: Option<String>,
    extends: Vec<String>,
    properties: Vec<PropertyModel>,
    methods: Vec<MethodModel>,
    call_signatures: Vec<CallSignatureModel>,
    enum_values: IndexMap<String, EnumValue>,
    composed_of: Vec<String>,
    element_type: Option<String>,
}

impl ReducedBody {
    fn single_call_signature(&mut self) -> Option<CallSignatureModel> {
        if self.call_signatures.len() == 1 {
            self.call_signatures.pop()
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Reducer {
    options: ReducerOptions,
}

/// Reduce with the default options.
pub fn reduce(dependency: &Dependency) -> Result<ObjectModel, ReduceError> {
    Reducer::default().reduce(dependency)
}

/// Reduce a root with the default options.
pub fn reduce_top_level(dependency: &Dependency) -> Result<TopLevelObject, ReduceError> {
    Reducer::default().reduce_top_level(dependency)
}

impl Reducer {
    pub fn new(options: ReducerOptions) -> Reducer {
        Reducer { options }
    }

    pub fn options(&self) -> &ReducerOptions {
        &self.options
    }

    #[tracing::instrument(level = "debug", skip_all, fields(type_name = %dependency.identifier))]
    pub fn reduce(&self, dependency: &Dependency) -> Result<ObjectModel, ReduceError> {
        let mut body = self.reduce_body(dependency)?;
        let mut model = ObjectModel::new(&dependency.identifier, dependency.declaration.kind());
        model.call_signature = body.single_call_signature();
        model.extends = body.extends;
        model.documentation = body.documentation;
        model.properties = body.properties.into_iter().collect();
        model.methods = body.methods.into_iter().collect();
        model.enum_values = body.enum_values;
        model.composed_of = body.composed_of;
        model.element_type = body.element_type;
        model.dependent_types = self.reduce_dependents(dependency)?;
        debug!(
            properties = model.properties.len(),
            methods = model.methods.len(),
            enum_values = model.enum_values.len(),
            dependents = model.dependent_types.len(),
            "reduced declaration"
        );
        Ok(model)
    }

    /// Like [`Reducer::reduce`], but members stay in declaration order and
    /// same-named members are all kept.
    #[tracing::instrument(level = "debug", skip_all, fields(type_name = %dependency.identifier))]
    pub fn reduce_top_level(&self, dependency: &Dependency) -> Result<TopLevelObject, ReduceError> {
        let body = self.reduce_body(dependency)?;
        let mut top_level = TopLevelObject::new(&dependency.identifier);
        top_level.documentation = body.documentation;
        top_level.methods = body.methods;
        top_level.properties = body.properties;
        top_level.dependent_types = self.reduce_dependents(dependency)?;
        Ok(top_level)
    }

    fn reduce_dependents(
        &self,
        dependency: &Dependency,
    ) -> Result<IndexMap<String, ObjectModel>, ReduceError> {
        dependency
            .dependencies
            .iter()
            .map(|child| Ok((child.identifier.clone(), self.reduce(child)?)))
            .collect()
    }

    fn is_marker_base(&self, name: &str) -> bool {
        self.options.marker_bases.iter().any(|base| base == name)
    }

    fn reduce_body(&self, dependency: &Dependency) -> Result<ReducedBody, ReduceError> {
        let declaration = &dependency.declaration;
        if declaration.parts().is_empty() {
            return Err(ReduceError::EmptyDeclaration(declaration.name().to_string()));
        }

        let mut body = ReducedBody::default();
        for part in declaration.parts() {
            let arena = part.arena();
            match declaration.kind() {
                DeclarationKind::Interface => {
                    let data = arena
                        .get_interface(part.node())
                        .ok_or_else(|| unexpected_node(declaration, part, "an interface"))?;
                    if body.documentation.is_none() {
                        body.documentation = jsdoc_comment(arena, data.jsdoc);
                    }
                    for base in heritage_names(arena, data.heritage_clauses.as_ref()) {
                        if !self.is_marker_base(&base) && !body.extends.contains(&base) {
                            body.extends.push(base);
                        }
                    }
                    self.reduce_members(dependency, part, &data.members, &mut body)?;
                }
                DeclarationKind::TypeAlias => {
                    let data = arena
                        .get_type_alias(part.node())
                        .ok_or_else(|| unexpected_node(declaration, part, "a type alias"))?;
                    if data.type_node.is_none() {
                        return Err(ReduceError::MissingAliasedType(
                            declaration.name().to_string(),
                        ));
                    }
                    if body.documentation.is_none() {
                        body.documentation = jsdoc_comment(arena, data.jsdoc);
                    }
                    self.reduce_aliased_type(dependency, part, data.type_node, &mut body)?;
                }
            }
        }
        Ok(body)
    }

    fn reduce_aliased_type(
        &self,
        dependency: &Dependency,
        part: &DeclarationPart,
        type_node: NodeIndex,
        body: &mut ReducedBody,
    ) -> Result<(), ReduceError> {
        let arena = part.arena();
        let aliased = arena.skip_parentheses(type_node);
        if let Some(element) = array_element(arena, aliased) {
            let element = arena.skip_parentheses(element);
            body.element_type = Some(
                arena
                    .type_reference_name(element)
                    .unwrap_or_else(|| part.text(element).to_string()),
            );
            return Ok(());
        }

        match arena.kind(aliased) {
            Some(syntax_kind_ext::UNION_TYPE) => {
                let (members, _) = non_nullish_members(arena, aliased);
                let literals: Vec<&str> = members
                    .iter()
                    .filter_map(|&member| {
                        arena.string_literal_type_value(arena.skip_parentheses(member))
                    })
                    .collect();
                if !members.is_empty() && literals.len() == members.len() {
                    body.enum_values = enum_values(literals);
                } else {
                    push_named_members(arena, &members, &mut body.composed_of);
                }
            }
            Some(syntax_kind_ext::INTERSECTION_TYPE) => {
                if let Some(intersection) = arena.get_composite_type(aliased) {
                    let members: Vec<NodeIndex> = intersection.types.iter().collect();
                    push_named_members(arena, &members, &mut body.composed_of);
                }
            }
            Some(syntax_kind_ext::TYPE_REFERENCE) => {
                push_named_members(arena, &[aliased], &mut body.composed_of);
            }
            Some(syntax_kind_ext::TYPE_LITERAL) => {
                if let Some(literal) = arena.get_type_literal(aliased) {
                    self.reduce_members(dependency, part, &literal.members, body)?;
                }
            }
            Some(syntax_kind_ext::FUNCTION_TYPE) => {
                if let Some(function) = arena.get_function_type(aliased) {
                    let signature = self.reduce_call_signature(
                        dependency,
                        part,
                        &function.parameters,
                        function.type_annotation,
                        NodeIndex::NONE,
                    )?;
                    body.call_signatures.push(signature);
                }
            }
            _ => trace!(alias = %dependency.identifier, "aliased type has no model shape"),
        }
        Ok(())
    }

    fn reduce_members(
        &self,
        dependency: &Dependency,
        part: &DeclarationPart,
        members: &NodeList,
        body: &mut ReducedBody,
    ) -> Result<(), ReduceError> {
        let arena = part.arena();
        for member in members.iter() {
            match arena.kind(member) {
                Some(syntax_kind_ext::PROPERTY_SIGNATURE) => {
                    if let Some(property) = self.reduce_property(part, member) {
                        body.properties.push(property);
                    }
                }
                Some(syntax_kind_ext::METHOD_SIGNATURE) => {
                    if let Some(method) = self.reduce_method(dependency, part, member)? {
                        body.methods.push(method);
                    }
                }
                Some(syntax_kind_ext::CALL_SIGNATURE) => {
                    if let Some(signature) = arena.get_signature(member) {
                        let call = self.reduce_call_signature(
                            dependency,
                            part,
                            &signature.parameters,
                            signature.type_annotation,
                            signature.jsdoc,
                        )?;
                        body.call_signatures.push(call);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn reduce_property(&self, part: &DeclarationPart, node: NodeIndex) -> Option<PropertyModel> {
        let arena = part.arena();
        let data = arena.get_property_signature(node)?;
        let name = arena.property_name_text(data.name)?;
        if self.options.skip_event_handlers && name.starts_with("on") {
            trace!(property = name, "skipping event handler property");
            return None;
        }
        if data.type_annotation.is_none() {
            return None;
        }

        let shape = TypeShape::of(part, data.type_annotation);
        Some(PropertyModel {
            name: name.to_string(),
            raw_type: shape.raw,
            mapped_type: shape.mapped,
            is_nullable: data.question_token || shape.is_nullable,
            is_array: shape.is_array,
            is_readonly: has_modifier(arena, data.modifiers.as_ref(), SyntaxKind::ReadonlyKeyword),
            documentation: jsdoc_comment(arena, data.jsdoc),
        })
    }

    fn reduce_method(
        &self,
        dependency: &Dependency,
        part: &DeclarationPart,
        node: NodeIndex,
    ) -> Result<Option<MethodModel>, ReduceError> {
        let arena = part.arena();
        let Some(data) = arena.get_signature(node) else {
            return Ok(None);
        };
        let Some(name) = arena.property_name_text(data.name) else {
            return Ok(None);
        };
        if self.options.skip_event_handlers && name.ends_with("EventListener") {
            trace!(method = name, "skipping event listener method");
            return Ok(None);
        }
        if data.type_annotation.is_none() {
            trace!(method = name, "skipping method without a return type");
            return Ok(None);
        }

        let returns = TypeShape::of(part, data.type_annotation);
        let parameters = self.reduce_parameters(dependency, part, &data.parameters, data.jsdoc)?;
        Ok(Some(MethodModel {
            name: name.to_string(),
            raw_return_type: returns.raw,
            mapped_return_type: returns.mapped,
            is_async: returns.is_async,
            is_void: returns.is_void,
            is_return_nullable: returns.is_nullable,
            is_bidirectional: parameters.iter().any(|p| p.action.is_some()),
            parameters,
            documentation: jsdoc_comment(arena, data.jsdoc),
        }))
    }

    fn reduce_call_signature(
        &self,
        dependency: &Dependency,
        part: &DeclarationPart,
        parameters: &NodeList,
        return_type: NodeIndex,
        jsdoc: NodeIndex,
    ) -> Result<CallSignatureModel, ReduceError> {
        let returns = TypeShape::of(part, return_type);
        Ok(CallSignatureModel {
            parameters: self.reduce_parameters(dependency, part, parameters, jsdoc)?,
            raw_return_type: returns.raw,
            mapped_return_type: returns.mapped,
            is_async: returns.is_async,
            is_void: returns.is_void,
            is_return_nullable: returns.is_nullable,
        })
    }

    fn reduce_parameters(
        &self,
        dependency: &Dependency,
        part: &DeclarationPart,
        parameters: &NodeList,
        jsdoc: NodeIndex,
    ) -> Result<Vec<ParameterModel>, ReduceError> {
        let arena = part.arena();
        let mut out = Vec::with_capacity(parameters.len());
        for parameter in parameters.iter() {
            let Some(data) = arena.get_parameter(parameter) else {
                continue;
            };
            let Some(name) = arena.get_identifier_text(data.name) else {
                continue;
            };

            let shape = TypeShape::of(part, data.type_annotation);
            let action = match &shape.mapped {
                MappedType::Named(type_name)
                    if !shape.is_array && name.ends_with(self.options.callback_suffix.as_str()) =>
                {
                    self.reduce_action(dependency, type_name)?
                }
                _ => None,
            };

            out.push(ParameterModel {
                name: name.to_string(),
                raw_type: shape.raw,
                mapped_type: shape.mapped,
                is_nullable: data.question_token || shape.is_nullable,
                is_array: shape.is_array,
                is_rest: data.dot_dot_dot_token,
                action,
                documentation: parameter_documentation(arena, jsdoc, name),
            });
        }
        Ok(out)
    }

    /// Reduce the callback type `type_name` to an action when its declaration
    /// has exactly one call signature.
    fn reduce_action(
        &self,
        root: &Dependency,
        type_name: &str,
    ) -> Result<Option<ActionDescriptor>, ReduceError> {
        let Some(dependency) = find_dependency(root, type_name) else {
            trace!(type_name, "callback type is not part of the graph");
            return Ok(None);
        };

        let mut body = ReducedBody::default();
        for part in dependency.declaration.parts() {
            let arena = part.arena();
            match arena.get_interface(part.node()) {
                Some(data) => {
                    for member in data.members.iter() {
                        if !arena.is_kind(member, syntax_kind_ext::CALL_SIGNATURE) {
                            continue;
                        }
                        if let Some(signature) = arena.get_signature(member) {
                            let call = self.reduce_call_signature(
                                &dependency,
                                part,
                                &signature.parameters,
                                signature.type_annotation,
                                signature.jsdoc,
                            )?;
                            body.call_signatures.push(call);
                        }
                    }
                }
                None => {
                    let aliased = arena
                        .get_type_alias(part.node())
                        .map_or(NodeIndex::NONE, |alias| alias.type_node);
                    if let Some(function) = arena.get_function_type(arena.skip_parentheses(aliased)) {
                        let call = self.reduce_call_signature(
                            &dependency,
                            part,
                            &function.parameters,
                            function.type_annotation,
                            NodeIndex::NONE,
                        )?;
                        body.call_signatures.push(call);
                    }
                }
            }
        }

        let Some(signature) = body.single_call_signature() else {
            return Ok(None);
        };
        debug!(action = %dependency.identifier, "reduced callback action");
        Ok(Some(ActionDescriptor {
            identifier: dependency.identifier.clone(),
            parameters: signature.parameters,
            return_type: signature.raw_return_type,
            dependent_types: self.reduce_dependents(&dependency)?,
        }))
    }
}

/// A dependency of `root` named `name`: a direct child first, then anywhere
/// below it.
fn find_dependency(root: &Dependency, name: &str) -> Option<Arc<Dependency>> {
    if let Some(direct) = root.find(name) {
        return Some(Arc::clone(direct));
    }
    let mut visited = IndexSet::new();
    let mut stack: Vec<&Arc<Dependency>> = root.dependencies.iter().rev().collect();
    while let Some(dependency) = stack.pop() {
        if !visited.insert(dependency.identifier.as_str()) {
            continue;
        }
        if let Some(found) = dependency.find(name) {
            return Some(Arc::clone(found));
        }
        stack.extend(dependency.dependencies.iter().rev());
    }
    None
}

fn unexpected_node(
    declaration: &Declaration,
    part: &DeclarationPart,
    expected: &'static str,
) -> ReduceError {
    ReduceError::UnexpectedNode {
        name: declaration.name().to_string(),
        file: part.file_name().to_string(),
        expected,
        found: part
            .arena()
            .kind(part.node())
            .map_or_else(|| "nothing".to_string(), syntax_kind_ext::kind_name),
    }
}

fn push_named_members(arena: &NodeArena, members: &[NodeIndex], out: &mut Vec<String>) {
    for &member in members {
        if let Some(name) = arena.type_reference_name(arena.skip_parentheses(member))
            && !out.contains(&name)
        {
            out.push(name);
        }
    }
}

fn heritage_names(arena: &NodeArena, clauses: Option<&NodeList>) -> Vec<String> {
    let Some(clauses) = clauses else {
        return Vec::new();
    };
    clauses
        .iter()
        .filter_map(|clause| arena.get_heritage_clause(clause))
        .flat_map(|clause| clause.types.iter())
        .filter_map(|ty| arena.get_expr_with_type_args(ty))
        .filter_map(|expr| arena.entity_name_text(expr.expression))
        .collect()
}

fn has_modifier(arena: &NodeArena, modifiers: Option<&NodeList>, kind: SyntaxKind) -> bool {
    modifiers.is_some_and(|list| list.iter().any(|m| arena.is_kind(m, kind as u16)))
}

fn jsdoc_comment(arena: &NodeArena, jsdoc: NodeIndex) -> Option<String> {
    arena
        .get_jsdoc(jsdoc)?
        .comment
        .as_ref()
        .filter(|comment| !comment.trim().is_empty())
        .cloned()
}

/// Comment of the `@param` tag naming `name`.
fn parameter_documentation(arena: &NodeArena, jsdoc: NodeIndex, name: &str) -> Option<String> {
    let doc = arena.get_jsdoc(jsdoc)?;
    doc.tags
        .iter()
        .filter(|&tag| arena.is_kind(tag, syntax_kind_ext::JSDOC_PARAMETER_TAG))
        .filter_map(|tag| arena.get_jsdoc_parameter_tag(tag))
        .find(|tag| arena.entity_name_text(tag.name).as_deref() == Some(name))
        .map(|tag| tag.comment.trim().to_string())
        .filter(|comment| !comment.is_empty())
}
