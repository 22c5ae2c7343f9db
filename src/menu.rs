//! Static menu graph
//!
//! The graph is built once at start-up, validated exhaustively, and then
//! shared read-only across every request.

mod action;
pub mod airline;
mod definition;
mod node;
mod symbol;

pub use action::{Action, ActionKind};
#[allow(unused_imports)] // Public API re-exports
pub use definition::{ActionDefinition, CaptureDefinition, MenuDefinition, NodeDefinition};
pub use node::{DigitCapture, MenuNode, DEFAULT_CAPTURE_LENGTH};
pub use symbol::DtmfSymbol;

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Id of the node every call starts at in the built-in menus
pub const ROOT_NODE: &str = "main";

/// Graph construction defects. None of these can occur at request time.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Unknown menu node: {0}")]
    UnknownNode(String),
    #[error("Duplicate menu node: {0}")]
    DuplicateNode(String),
    #[error("Node {node}: lookup on key {key} needs digit capture terminated by that key")]
    LookupWithoutCapture { node: String, key: DtmfSymbol },
    #[error("Node {0}: digit capture has no option for its terminator")]
    MissingTerminator(String),
    #[error("Node {node}: option {key} can never fire while digits are captured")]
    UnreachableOption { node: String, key: DtmfSymbol },
    #[error("Node {0}: digit capture length must be positive")]
    InvalidCapture(String),
    #[error("Node {node}: invalid keypad symbol {symbol:?}")]
    InvalidSymbol { node: String, symbol: String },
    #[error("Failed to read menu definition: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid menu definition: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The validated menu topology
#[derive(Debug, Clone)]
pub struct MenuGraph {
    root: String,
    nodes: HashMap<String, MenuNode>,
}

impl MenuGraph {
    /// Build and validate a graph. Every navigation target and the root
    /// must name a node in `nodes`.
    pub fn new(
        root: impl Into<String>,
        nodes: impl IntoIterator<Item = MenuNode>,
    ) -> Result<Self, GraphError> {
        let root = root.into();
        let mut by_id = HashMap::new();
        for node in nodes {
            if by_id.contains_key(&node.id) {
                return Err(GraphError::DuplicateNode(node.id));
            }
            by_id.insert(node.id.clone(), node);
        }

        if !by_id.contains_key(&root) {
            return Err(GraphError::UnknownNode(root));
        }

        for node in by_id.values() {
            validate_node(node, &by_id)?;
        }

        Ok(Self { root, nodes: by_id })
    }

    pub fn root_id(&self) -> &str {
        &self.root
    }

    /// The node calls start at
    pub fn root(&self) -> &MenuNode {
        // presence checked in new()
        &self.nodes[&self.root]
    }

    pub fn node_by_id(&self, id: &str) -> Result<&MenuNode, GraphError> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Option table of node `id`
    #[allow(dead_code)] // API completeness
    pub fn options(&self, id: &str) -> Result<&BTreeMap<DtmfSymbol, Action>, GraphError> {
        self.node_by_id(id).map(|node| &node.options)
    }
}

#[cfg(test)]
impl MenuGraph {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// True when some option on `from` navigates to `to`
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.nodes.get(from).is_some_and(|node| {
            node.options.values().any(|action| {
                matches!(&action.kind, ActionKind::Navigate { target } if target == to)
            })
        })
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

fn validate_node(node: &MenuNode, nodes: &HashMap<String, MenuNode>) -> Result<(), GraphError> {
    if let Some(capture) = node.capture {
        if capture.length == 0 {
            return Err(GraphError::InvalidCapture(node.id.clone()));
        }
        if !node.options.contains_key(&capture.terminator) {
            return Err(GraphError::MissingTerminator(node.id.clone()));
        }
    }

    for (key, action) in &node.options {
        match (&action.kind, node.capture) {
            (ActionKind::Navigate { target }, _) if !nodes.contains_key(target) => {
                return Err(GraphError::UnknownNode(target.clone()));
            }
            (ActionKind::Lookup, None) => {
                return Err(GraphError::LookupWithoutCapture {
                    node: node.id.clone(),
                    key: *key,
                });
            }
            (ActionKind::Lookup, Some(capture)) if capture.terminator != *key => {
                return Err(GraphError::LookupWithoutCapture {
                    node: node.id.clone(),
                    key: *key,
                });
            }
            _ => {}
        }

        if let Some(capture) = node.capture {
            if *key != capture.terminator && key.is_digit() {
                return Err(GraphError::UnreachableOption {
                    node: node.id.clone(),
                    key: *key,
                });
            }
        }
    }

    Ok(())
}
