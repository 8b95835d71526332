//! Category menu tree and path resolution.
//!
//! The menu is a static taxonomy loaded once from configuration. Exactly one
//! node carries no id: the "All" root, which contributes no path segment.
//! Every other node's path is the slash-joined chain of ids from just below
//! the root down to the node itself (e.g. `TOOLS/DOCKER`).
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

/// Literal id accepted at string boundaries (config, history) for the root.
pub const ROOT_ID: &str = "All";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("Menu has no root node (a node without an id)")]
    MissingRoot,

    #[error("Menu has more than one root node")]
    MultipleRoots,

    #[error("Duplicate category id in menu: {0}")]
    DuplicateId(String),

    #[error("Category id must not be empty or contain '/': {0:?}")]
    InvalidId(String),
}

// ============================================================================
// Data Structures
// ============================================================================

/// A node in the category menu.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuNode {
    /// Category id, or `None` for the "All" root.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn root(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }
}

/// Outcome of matching an address path against the menu.
///
/// `resolve_id_for_path` collapses `Root` and `Unknown` into the same answer;
/// the router needs them apart to decide between "All" and not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLookup<'a> {
    Root,
    Category(&'a str),
    Unknown,
}

/// A single row of the flattened menu, for rendering and keyboard navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Category id, or `None` for "All".
    pub id: Option<String>,
    pub name: String,
    /// Nesting depth (0 = top-level).
    pub depth: usize,
    pub has_children: bool,
}

/// Validated, immutable category tree.
#[derive(Debug, Clone)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    /// Build a tree from top-level nodes, checking the root/uniqueness invariants.
    pub fn new(nodes: Vec<MenuNode>) -> Result<Self, MenuError> {
        let mut roots = 0usize;
        let mut seen = HashSet::new();
        let mut stack: Vec<&MenuNode> = nodes.iter().collect();

        while let Some(node) = stack.pop() {
            match &node.id {
                None => roots += 1,
                Some(id) => {
                    if id.is_empty() || id.contains('/') || id == ROOT_ID {
                        return Err(MenuError::InvalidId(id.clone()));
                    }
                    if !seen.insert(id.as_str()) {
                        return Err(MenuError::DuplicateId(id.clone()));
                    }
                }
            }
            stack.extend(node.children.iter());
        }

        match roots {
            0 => Err(MenuError::MissingRoot),
            1 => Ok(Self { nodes }),
            _ => Err(MenuError::MultipleRoots),
        }
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    // ========================================================================
    // Path Resolution
    // ========================================================================

    /// Slash-joined ancestor chain for `id`, down to and including `id`.
    ///
    /// The root (`None`) yields `Some("")`. Unknown ids yield `None`.
    pub fn resolve_path_for_id(&self, id: Option<&str>) -> Option<String> {
        let Some(id) = id.filter(|id| *id != ROOT_ID) else {
            return Some(String::new());
        };
        let mut chain = Vec::new();
        if find_chain(&self.nodes, id, &mut chain) {
            Some(chain.join("/"))
        } else {
            None
        }
    }

    /// Inverse of [`resolve_path_for_id`](Self::resolve_path_for_id).
    ///
    /// Returns `None` (the root) for an empty path, for `"All"`, and for any
    /// path that matches nothing.
    pub fn resolve_id_for_path(&self, path: &str) -> Option<&str> {
        match self.lookup_path(path) {
            PathLookup::Category(id) => Some(id),
            PathLookup::Root | PathLookup::Unknown => None,
        }
    }

    /// Classify a path as the root, a known category, or unknown.
    pub fn lookup_path(&self, path: &str) -> PathLookup<'_> {
        let path = normalize_path(path);
        if path.is_empty() || path == ROOT_ID {
            return PathLookup::Root;
        }
        let mut prefix = Vec::new();
        match find_by_path(&self.nodes, path, &mut prefix) {
            Some(id) => PathLookup::Category(id),
            None => PathLookup::Unknown,
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Whether `id` names a node in the tree (the root always exists).
    pub fn contains(&self, id: Option<&str>) -> bool {
        self.resolve_path_for_id(id).is_some()
    }

    /// Display name for a category id. Root is "All"; unknown ids fall back to themselves.
    pub fn name_for_id<'a>(&'a self, id: Option<&'a str>) -> &'a str {
        let Some(id) = id.filter(|id| *id != ROOT_ID) else {
            return ROOT_ID;
        };
        find_node(&self.nodes, id)
            .map(|node| node.name.as_str())
            .unwrap_or(id)
    }

    /// Ids along the path to `id`, outermost first. Used for menu highlighting.
    pub fn active_chain(&self, id: Option<&str>) -> Vec<String> {
        match self.resolve_path_for_id(id) {
            Some(path) if !path.is_empty() => path.split('/').map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Depth-first flattening, parents before children.
    pub fn flatten(&self) -> Vec<MenuItem> {
        let mut items = Vec::new();
        for node in &self.nodes {
            push_items(&mut items, node, 0);
        }
        items
    }
}

/// Strip the leading and trailing slashes an address path may carry.
pub fn normalize_path(path: &str) -> &str {
    path.trim().trim_matches('/')
}

fn push_items(items: &mut Vec<MenuItem>, node: &MenuNode, depth: usize) {
    items.push(MenuItem {
        id: node.id.clone(),
        name: node.name.clone(),
        depth,
        has_children: !node.children.is_empty(),
    });
    for child in &node.children {
        push_items(items, child, depth + 1);
    }
}

fn find_chain<'a>(nodes: &'a [MenuNode], id: &str, chain: &mut Vec<&'a str>) -> bool {
    for node in nodes {
        let pushed = match &node.id {
            Some(node_id) => {
                chain.push(node_id);
                if node_id == id {
                    return true;
                }
                true
            }
            None => false,
        };
        if find_chain(&node.children, id, chain) {
            return true;
        }
        if pushed {
            chain.pop();
        }
    }
    false
}

fn find_by_path<'a>(nodes: &'a [MenuNode], path: &str, prefix: &mut Vec<&'a str>) -> Option<&'a str> {
    for node in nodes {
        let Some(node_id) = node.id.as_deref() else {
            // The root contributes no segment; its children keep the current prefix.
            if let Some(found) = find_by_path(&node.children, path, prefix) {
                return Some(found);
            }
            continue;
        };
        prefix.push(node_id);
        if prefix.join("/") == path {
            return Some(node_id);
        }
        if let Some(found) = find_by_path(&node.children, path, prefix) {
            return Some(found);
        }
        prefix.pop();
    }
    None
}

fn find_node<'a>(nodes: &'a [MenuNode], id: &str) -> Option<&'a MenuNode> {
    for node in nodes {
        if node.id.as_deref() == Some(id) {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> MenuTree {
        MenuTree::new(vec![
            MenuNode::root("All"),
            MenuNode::new("JAVA", "Java").with_children(vec![
                MenuNode::new("CORE_JAVA", "Core Java"),
                MenuNode::new("SPRING", "Spring")
                    .with_children(vec![MenuNode::new("SPRING_BOOT", "Spring Boot")]),
            ]),
            MenuNode::new("TOOLS", "Tools").with_children(vec![MenuNode::new("DOCKER", "Docker")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_path_for_nested_id() {
        let tree = sample_tree();
        assert_eq!(
            tree.resolve_path_for_id(Some("SPRING_BOOT")).as_deref(),
            Some("JAVA/SPRING/SPRING_BOOT")
        );
        assert_eq!(tree.resolve_path_for_id(Some("TOOLS")).as_deref(), Some("TOOLS"));
    }

    #[test]
    fn test_path_for_root_is_empty() {
        let tree = sample_tree();
        assert_eq!(tree.resolve_path_for_id(None).as_deref(), Some(""));
        assert_eq!(tree.resolve_path_for_id(Some("All")).as_deref(), Some(""));
    }

    #[test]
    fn test_path_for_unknown_id() {
        let tree = sample_tree();
        assert_eq!(tree.resolve_path_for_id(Some("PYTHON")), None);
    }

    #[test]
    fn test_id_for_path() {
        let tree = sample_tree();
        assert_eq!(tree.resolve_id_for_path("JAVA/SPRING"), Some("SPRING"));
        assert_eq!(tree.resolve_id_for_path("/TOOLS/DOCKER/"), Some("DOCKER"));
        assert_eq!(tree.resolve_id_for_path(""), None);
        assert_eq!(tree.resolve_id_for_path("All"), None);
    }

    #[test]
    fn test_id_for_partial_or_unknown_path_is_root() {
        let tree = sample_tree();
        // A leaf id on its own is not its full path
        assert_eq!(tree.resolve_id_for_path("DOCKER"), None);
        assert_eq!(tree.resolve_id_for_path("JAVA/DOCKER"), None);
        assert_eq!(tree.lookup_path("DOCKER"), PathLookup::Unknown);
    }

    #[test]
    fn test_lookup_distinguishes_root_from_unknown() {
        let tree = sample_tree();
        assert_eq!(tree.lookup_path(""), PathLookup::Root);
        assert_eq!(tree.lookup_path("/"), PathLookup::Root);
        assert_eq!(tree.lookup_path("nope"), PathLookup::Unknown);
        assert_eq!(tree.lookup_path("JAVA"), PathLookup::Category("JAVA"));
    }

    #[test]
    fn test_round_trip_every_id() {
        let tree = sample_tree();
        for item in tree.flatten() {
            let path = tree.resolve_path_for_id(item.id.as_deref()).unwrap();
            assert_eq!(tree.resolve_id_for_path(&path), item.id.as_deref());
        }
    }

    #[test]
    fn test_first_match_wins_depth_first() {
        // Duplicate ids are rejected by MenuTree::new, so build the nodes directly
        let tree = MenuTree {
            nodes: vec![
                MenuNode::root("All"),
                MenuNode::new("A", "A").with_children(vec![MenuNode::new("X", "first")]),
                MenuNode::new("X", "second"),
            ],
        };
        assert_eq!(tree.resolve_path_for_id(Some("X")).as_deref(), Some("A/X"));
        assert_eq!(tree.name_for_id(Some("X")), "first");
    }

    #[test]
    fn test_name_for_id() {
        let tree = sample_tree();
        assert_eq!(tree.name_for_id(Some("SPRING_BOOT")), "Spring Boot");
        assert_eq!(tree.name_for_id(None), "All");
        assert_eq!(tree.name_for_id(Some("SPLUNK")), "SPLUNK");
    }

    #[test]
    fn test_active_chain() {
        let tree = sample_tree();
        assert_eq!(
            tree.active_chain(Some("SPRING_BOOT")),
            vec!["JAVA", "SPRING", "SPRING_BOOT"]
        );
        assert!(tree.active_chain(None).is_empty());
        assert!(tree.active_chain(Some("missing")).is_empty());
    }

    #[test]
    fn test_flatten_order_and_depth() {
        let tree = sample_tree();
        let items = tree.flatten();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_deref()).collect();
        assert_eq!(
            ids,
            vec![
                None,
                Some("JAVA"),
                Some("CORE_JAVA"),
                Some("SPRING"),
                Some("SPRING_BOOT"),
                Some("TOOLS"),
                Some("DOCKER"),
            ]
        );
        assert_eq!(items[4].depth, 2);
        assert!(items[1].has_children);
        assert!(!items[2].has_children);
    }

    #[test]
    fn test_rejects_missing_root() {
        let err = MenuTree::new(vec![MenuNode::new("A", "A")]).unwrap_err();
        assert_eq!(err, MenuError::MissingRoot);
    }

    #[test]
    fn test_rejects_two_roots() {
        let err = MenuTree::new(vec![MenuNode::root("All"), MenuNode::root("Also all")]).unwrap_err();
        assert_eq!(err, MenuError::MultipleRoots);
    }

    #[test]
    fn test_rejects_duplicate_ids_across_levels() {
        let err = MenuTree::new(vec![
            MenuNode::root("All"),
            MenuNode::new("A", "A").with_children(vec![MenuNode::new("B", "B")]),
            MenuNode::new("B", "B again"),
        ])
        .unwrap_err();
        assert_eq!(err, MenuError::DuplicateId("B".to_string()));
    }

    #[test]
    fn test_rejects_slash_in_id() {
        let err = MenuTree::new(vec![MenuNode::root("All"), MenuNode::new("A/B", "AB")]).unwrap_err();
        assert!(matches!(err, MenuError::InvalidId(_)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Trees of unique ids: generate a shape, then number the nodes.
        fn arb_tree() -> impl Strategy<Value = MenuTree> {
            let shape = Just(MenuNode::new("x", "x")).prop_recursive(3, 24, 4, |inner| {
                prop::collection::vec(inner, 0..4)
                    .prop_map(|children| MenuNode::new("x", "x").with_children(children))
            });
            prop::collection::vec(shape, 0..5).prop_map(|mut top| {
                let mut counter = 0;
                for node in top.iter_mut() {
                    renumber(node, &mut counter);
                }
                let mut nodes = vec![MenuNode::root("All")];
                nodes.extend(top);
                MenuTree::new(nodes).unwrap()
            })
        }

        fn renumber(node: &mut MenuNode, counter: &mut usize) {
            *counter += 1;
            node.id = Some(format!("C{}", counter));
            for child in node.children.iter_mut() {
                renumber(child, counter);
            }
        }

        proptest! {
            #[test]
            fn path_round_trips_for_every_id(tree in arb_tree()) {
                for item in tree.flatten() {
                    let path = tree.resolve_path_for_id(item.id.as_deref()).unwrap();
                    prop_assert_eq!(tree.resolve_id_for_path(&path), item.id.as_deref());
                }
            }

            #[test]
            fn chain_ends_with_id(tree in arb_tree()) {
                for item in tree.flatten().into_iter().filter(|i| i.id.is_some()) {
                    let chain = tree.active_chain(item.id.as_deref());
                    prop_assert_eq!(chain.len(), item.depth + 1);
                    prop_assert_eq!(chain.last().map(String::as_str), item.id.as_deref());
                }
            }
        }
    }
}
