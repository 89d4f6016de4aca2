//! Reconstruction of the output tree from flat, slash-delimited target paths.
//!
//! [`complete`] fills gaps in the target paths with placeholder containers and
//! [`Hierarchy::build`] folds the resulting list into a tree. Children keep the
//! order in which their path segment first appeared; fields attached to the
//! same node keep their input order.

use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use xslmap_types::{FieldType, Mapping, ValueType};
use xslmap_xpath::{SourcePath, parse_source_path};

/// Splits a mapping's target path into trimmed, non-empty segments.
pub fn target_segments(mapping: &Mapping) -> Vec<&str> {
    mapping
        .effective_target_path()
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Returns `mappings` followed by a placeholder for every target path prefix
/// that no mapping declares itself.
pub fn complete(mappings: &[Mapping]) -> Vec<Mapping> {
    let explicit: HashSet<String> = mappings
        .iter()
        .map(|m| target_segments(m).join("/"))
        .collect();

    let mut missing: IndexSet<String> = IndexSet::new();
    for mapping in mappings {
        let segments = target_segments(mapping);
        for end in 1..segments.len() {
            let prefix = segments[..end].join("/");
            if !explicit.contains(&prefix) {
                missing.insert(prefix);
            }
        }
    }

    if !missing.is_empty() {
        log::debug!("Synthesized {} placeholder container(s)", missing.len());
    }

    mappings
        .iter()
        .cloned()
        .chain(missing.iter().map(|prefix| Mapping::placeholder(prefix)))
        .collect()
}

/// A mapping attached to a node of the hierarchy.
#[derive(Debug, Clone)]
pub struct FieldRef<'a> {
    pub mapping: &'a Mapping,
    pub source: SourcePath,
    /// The terminal segment of the target path.
    pub leaf_name: &'a str,
}

impl<'a> FieldRef<'a> {
    fn new(mapping: &'a Mapping, leaf_name: &'a str) -> Self {
        Self {
            mapping,
            source: parse_source_path(&mapping.source_path),
            leaf_name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.mapping.is_placeholder
    }
}

#[derive(Debug, Clone)]
pub struct ComponentNode<'a> {
    pub name: String,
    pub level: usize,
    /// The mapping declared for this container's own path, if any.
    pub definition: Option<FieldRef<'a>>,
    pub children: Vec<HierarchyNode<'a>>,
}

impl ComponentNode<'_> {
    pub fn is_placeholder(&self) -> bool {
        self.definition.as_ref().is_some_and(FieldRef::is_placeholder)
    }
}

#[derive(Debug, Clone)]
pub struct LeafNode<'a> {
    pub name: String,
    pub level: usize,
    pub fields: Vec<FieldRef<'a>>,
}

#[derive(Debug, Clone)]
pub enum HierarchyNode<'a> {
    Component(ComponentNode<'a>),
    Leaf(LeafNode<'a>),
}

impl<'a> HierarchyNode<'a> {
    pub fn name(&self) -> &str {
        match self {
            HierarchyNode::Component(c) => &c.name,
            HierarchyNode::Leaf(l) => &l.name,
        }
    }

    pub fn level(&self) -> usize {
        match self {
            HierarchyNode::Component(c) => c.level,
            HierarchyNode::Leaf(l) => l.level,
        }
    }

    pub fn children(&self) -> &[HierarchyNode<'a>] {
        match self {
            HierarchyNode::Component(c) => &c.children,
            HierarchyNode::Leaf(_) => &[],
        }
    }
}

#[derive(Default)]
struct Draft<'a> {
    children: IndexMap<&'a str, Draft<'a>>,
    fields: Vec<FieldRef<'a>>,
}

impl<'a> Draft<'a> {
    fn finish(
        self,
        name: &str,
        level: usize,
        shadowed: &mut Vec<&'a Mapping>,
    ) -> HierarchyNode<'a> {
        let Draft { children, mut fields } = self;
        let is_container =
            !children.is_empty() || (!fields.is_empty() && fields.iter().all(is_component));

        if !is_container {
            return HierarchyNode::Leaf(LeafNode {
                name: name.to_string(),
                level,
                fields,
            });
        }

        let pick = fields
            .iter()
            .position(|f| !f.is_placeholder())
            .or(if fields.is_empty() { None } else { Some(0) });
        let definition = pick.map(|idx| fields.remove(idx));
        if let Some(def) = &definition {
            if has_own_value(def) {
                shadowed.push(def.mapping);
            }
        }
        shadowed.extend(
            fields
                .iter()
                .filter(|f| !f.is_placeholder())
                .map(|f| f.mapping),
        );

        let children = children
            .into_iter()
            .map(|(segment, child)| child.finish(segment, level + 1, shadowed))
            .collect();
        HierarchyNode::Component(ComponentNode {
            name: name.to_string(),
            level,
            definition,
            children,
        })
    }
}

/// Whether a container's defining mapping carries a value that a container cannot hold.
fn has_own_value(field: &FieldRef<'_>) -> bool {
    !field.is_placeholder() && !is_component(field) && field.mapping.value_type != ValueType::Empty
}

fn is_component(field: &FieldRef<'_>) -> bool {
    field.mapping.field_type == FieldType::Component
}

/// The output tree of one generation run.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy<'a> {
    pub roots: Vec<HierarchyNode<'a>>,
    /// Mappings on container paths whose own value or definition is not rendered.
    pub shadowed: Vec<&'a Mapping>,
}

impl<'a> Hierarchy<'a> {
    /// Builds the tree. Mappings sharing a path prefix share its node.
    pub fn build(mappings: &'a [Mapping]) -> Self {
        let mut top: IndexMap<&'a str, Draft<'a>> = IndexMap::new();

        for mapping in mappings {
            let segments = target_segments(mapping);
            let Some((&leaf, parents)) = segments.split_last() else {
                continue;
            };

            let mut level = &mut top;
            for &segment in parents {
                level = &mut level.entry(segment).or_default().children;
            }
            level
                .entry(leaf)
                .or_default()
                .fields
                .push(FieldRef::new(mapping, leaf));
        }

        let mut shadowed = Vec::new();
        let roots = top
            .into_iter()
            .map(|(segment, draft)| draft.finish(segment, 1, &mut shadowed))
            .collect();
        if !shadowed.is_empty() {
            log::debug!("{} mapping(s) shadowed by container paths", shadowed.len());
        }
        Hierarchy { roots, shadowed }
    }

    /// Every node path in depth-first order.
    pub fn paths(&self) -> Vec<String> {
        fn walk(node: &HierarchyNode<'_>, prefix: &str, out: &mut Vec<String>) {
            let path = if prefix.is_empty() {
                node.name().to_string()
            } else {
                format!("{}/{}", prefix, node.name())
            };
            out.push(path.clone());
            for child in node.children() {
                walk(child, &path, out);
            }
        }

        let mut out = Vec::new();
        for root in &self.roots {
            walk(root, "", &mut out);
        }
        out
    }

    pub fn contains_path(&self, path: &str) -> bool {
        let mut nodes = self.roots.as_slice();
        let mut found = false;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match nodes.iter().find(|n| n.name() == segment) {
                Some(node) => {
                    nodes = node.children();
                    found = true;
                }
                None => return false,
            }
        }
        found
    }
}
