//! Dependency graph builder.
//!
//! `DependencyMapBuilder::build` resolves a root type name to its declaration
//! and walks it breadth-first: every type reference in a method, call or
//! construct signature (parameters and return type), property, index
//! signature, union / intersection member or array element is resolved in
//! turn. Nested type literals are queued and walked the same way.
//!
//! Within one build a name is resolved at most once. A reference to a name
//! that is already being built (a cycle) or was built earlier in the same run
//! is recorded in `references` without a second subtree, so recursion always
//! terminates.

use crate::cache::DependencyCache;
use crate::primitives::Primitives;
use crate::source::{Declaration, DeclarationSource};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};
use tsbind_common::limits::MAX_DEPENDENCY_DEPTH;
use tsbind_parser::{NodeArena, NodeData, NodeIndex, NodeList, syntax_kind_ext};

/// A resolved declaration and the declarations it transitively depends on.
#[derive(Debug)]
pub struct Dependency {
    pub identifier: String,
    pub declaration: Declaration,
    /// Subtrees resolved while building this node, in first-discovery order.
    pub dependencies: Vec<Arc<Dependency>>,
    /// Every resolved name this declaration references, in first-discovery
    /// order, including names whose subtree lives elsewhere in the graph.
    pub references: Vec<String>,
}

impl Dependency {
    pub fn new(identifier: impl Into<String>, declaration: Declaration) -> Dependency {
        Dependency {
            identifier: identifier.into(),
            declaration,
            dependencies: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Direct child dependency with the given identifier.
    pub fn find(&self, identifier: &str) -> Option<&Arc<Dependency>> {
        self.dependencies
            .iter()
            .find(|dep| dep.identifier == identifier)
    }

    /// Every declaration in the graph keyed by identifier, in depth-first
    /// discovery order starting with this one.
    pub fn flatten(&self) -> IndexMap<String, Declaration> {
        let mut out = IndexMap::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut IndexMap<String, Declaration>) {
        if out.contains_key(&self.identifier) {
            return;
        }
        out.insert(self.identifier.clone(), self.declaration.clone());
        for dependency in &self.dependencies {
            dependency.flatten_into(out);
        }
    }
}

/// Strip one level of generic wrapping and any trailing `[]`:
/// `Promise<Foo>`, `Foo[]` and `Foo` all normalize to `Foo`.
pub fn normalize_type_name(type_name: &str) -> String {
    let mut name = type_name.trim();
    if name.ends_with('>')
        && let Some(open) = name.find('<')
        && let Some(inner) = name.get(open + 1..name.len() - 1)
    {
        name = inner.trim();
    }
    while let Some(stripped) = name.strip_suffix("[]") {
        name = stripped.trim_end();
    }
    name.to_string()
}

#[derive(Clone, Debug)]
pub struct BuilderOptions {
    /// Names ending in one of these suffixes are never resolved.
    pub excluded_suffixes: Vec<String>,
    pub max_depth: u32,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        BuilderOptions {
            excluded_suffixes: vec!["EventMap".to_string()],
            max_depth: MAX_DEPENDENCY_DEPTH,
        }
    }
}

pub struct DependencyMapBuilder<'a, S: DeclarationSource + ?Sized> {
    source: &'a S,
    cache: &'a DependencyCache,
    options: BuilderOptions,
}

impl<'a, S: DeclarationSource + ?Sized> DependencyMapBuilder<'a, S> {
    pub fn new(source: &'a S, cache: &'a DependencyCache) -> Self {
        DependencyMapBuilder {
            source,
            cache,
            options: BuilderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Build the dependency graph of `type_name`, or `None` when the name is
    /// primitive, excluded or not declared in the corpus.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn build(&self, type_name: &str) -> Option<Arc<Dependency>> {
        let name = normalize_type_name(type_name);
        if let Some(cached) = self.cache.get(&name) {
            debug!(name = %name, "dependency cache hit");
            return Some(cached);
        }

        let mut seen = FxHashSet::default();
        let dependency = self.build_internal(&name, &mut seen, 0)?;
        debug!(
            name = %name,
            dependencies = dependency.dependencies.len(),
            resolved = seen.len(),
            "built dependency map"
        );
        Some(self.cache.insert(&name, Arc::new(dependency)))
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.options
            .excluded_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str()))
    }

    fn try_get_declaration(&self, name: &str) -> Option<Declaration> {
        if Primitives::is_primitive_type(name) || self.is_excluded(name) {
            return None;
        }
        self.source
            .try_get_interface(name)
            .or_else(|| self.source.try_get_type_alias(name))
    }

    /// `name` is already normalized.
    fn build_internal(
        &self,
        name: &str,
        seen: &mut FxHashSet<String>,
        depth: u32,
    ) -> Option<Dependency> {
        if seen.contains(name) {
            return None;
        }
        let declaration = self.try_get_declaration(name)?;
        seen.insert(name.to_string());

        let mut dependency = Dependency::new(name, declaration.clone());
        for part in declaration.parts() {
            let mut queue = VecDeque::from([part.node()]);
            while let Some(node) = queue.pop_front() {
                for reference in collect_references(part.arena(), node, &mut queue) {
                    self.resolve(&mut dependency, &reference, seen, depth);
                }
            }
        }
        Some(dependency)
    }

    fn resolve(
        &self,
        parent: &mut Dependency,
        type_name: &str,
        seen: &mut FxHashSet<String>,
        depth: u32,
    ) {
        let name = normalize_type_name(type_name);
        if name.is_empty() || parent.references.contains(&name) {
            return;
        }
        if seen.contains(&name) {
            trace!(parent = %parent.identifier, name = %name, "already resolved in this build");
            parent.references.push(name);
            return;
        }
        if let Some(cached) = self.cache.get(&name) {
            let subtree = cached.flatten();
            // A cached subtree that reaches back into this build would
            // duplicate an ancestor; only attach it when disjoint.
            if !subtree.keys().any(|key| seen.contains(key)) {
                seen.extend(subtree.into_keys());
                parent.references.push(name);
                parent.dependencies.push(cached);
                return;
            }
            trace!(name = %name, "cached subtree overlaps current build");
        }
        if depth >= self.options.max_depth {
            debug!(name = %name, depth, "dependency depth limit reached");
            return;
        }
        if let Some(child) = self.build_internal(&name, seen, depth + 1) {
            parent.references.push(name);
            parent.dependencies.push(Arc::new(child));
        }
    }
}

// =============================================================================
// Reference collection
// =============================================================================

/// Names of the type references reachable from one queued node. Type
/// literals found along the way are queued instead of descended into.
fn collect_references(
    arena: &NodeArena,
    node: NodeIndex,
    queue: &mut VecDeque<NodeIndex>,
) -> Vec<String> {
    let mut roots = Vec::new();
    match arena.get(node).map(|n| &n.data) {
        Some(NodeData::Interface(data)) => push_member_types(arena, &data.members, &mut roots),
        Some(NodeData::TypeLiteral(data)) => push_member_types(arena, &data.members, &mut roots),
        Some(NodeData::TypeAlias(data)) => roots.push(data.type_node),
        _ => {}
    }

    let mut names = Vec::new();
    for root in roots {
        collect_type_references(arena, root, queue, &mut names);
    }
    names
}

fn push_member_types(arena: &NodeArena, members: &NodeList, out: &mut Vec<NodeIndex>) {
    for member in members.iter() {
        let Some(node) = arena.get(member) else {
            continue;
        };
        match &node.data {
            NodeData::Signature(signature) => {
                out.extend(
                    signature
                        .parameters
                        .iter()
                        .map(|param| arena.get_type_annotation(param)),
                );
                out.push(signature.type_annotation);
            }
            NodeData::PropertySignature(property) => out.push(property.type_annotation),
            NodeData::IndexSignature(index) => out.push(index.type_annotation),
            _ => {}
        }
    }
}

fn collect_type_references(
    arena: &NodeArena,
    root: NodeIndex,
    queue: &mut VecDeque<NodeIndex>,
    names: &mut Vec<String>,
) {
    let mut stack = vec![root];
    while let Some(index) = stack.pop() {
        let Some(node) = arena.get(index) else {
            continue;
        };
        match node.kind {
            syntax_kind_ext::TYPE_LITERAL => {
                queue.push_back(index);
                continue;
            }
            syntax_kind_ext::TYPE_REFERENCE => {
                if let Some(name) = arena.type_reference_name(index) {
                    names.push(name);
                }
            }
            _ => {}
        }
        stack.extend(node.data.children().into_iter().rev());
    }
}
