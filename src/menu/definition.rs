//! JSON menu definitions
//!
//! Lets an operator replace the built-in menus without rebuilding:
//!
//! ```json
//! { "root": "main",
//!   "nodes": [{ "id": "main", "prompt": "Press 1 to leave",
//!               "options": { "1": { "action": "end", "msg": "Bye" } } }] }
//! ```

use super::{Action, DigitCapture, DtmfSymbol, GraphError, MenuGraph, MenuNode};
use super::{DEFAULT_CAPTURE_LENGTH, ROOT_NODE};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct MenuDefinition {
    #[serde(default = "default_root")]
    pub root: String,
    pub nodes: Vec<NodeDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub capture: Option<CaptureDefinition>,
    #[serde(default)]
    pub options: BTreeMap<String, ActionDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureDefinition {
    #[serde(default = "default_capture_length")]
    pub length: usize,
    #[serde(default = "default_terminator")]
    pub terminator: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionDefinition {
    Goto {
        target: String,
        #[serde(default)]
        msg: String,
    },
    Transfer {
        #[serde(default)]
        msg: String,
    },
    End {
        #[serde(default)]
        msg: String,
    },
    LookupPnr {
        #[serde(default)]
        msg: String,
    },
}

fn default_root() -> String {
    ROOT_NODE.to_string()
}

fn default_capture_length() -> usize {
    DEFAULT_CAPTURE_LENGTH
}

fn default_terminator() -> String {
    DtmfSymbol::HASH.to_string()
}

impl MenuDefinition {
    /// Read a definition file and build the graph it describes
    pub fn load<P: AsRef<Path>>(path: P) -> Result<MenuGraph, GraphError> {
        let raw = std::fs::read_to_string(path)?;
        let definition: MenuDefinition = serde_json::from_str(&raw)?;
        definition.into_graph()
    }

    pub fn into_graph(self) -> Result<MenuGraph, GraphError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(NodeDefinition::into_node)
            .collect::<Result<Vec<_>, _>>()?;
        MenuGraph::new(self.root, nodes)
    }
}

impl NodeDefinition {
    fn into_node(self) -> Result<MenuNode, GraphError> {
        let mut node = MenuNode::new(&self.id, self.prompt);

        if let Some(capture) = self.capture {
            let terminator = parse_symbol(&self.id, &capture.terminator)?;
            node = node.with_capture(DigitCapture {
                length: capture.length,
                terminator,
            });
        }

        for (key, action) in self.options {
            let key = parse_symbol(&self.id, &key)?;
            node = node.with_option(key, action.into());
        }

        Ok(node)
    }
}

impl From<ActionDefinition> for Action {
    fn from(definition: ActionDefinition) -> Self {
        match definition {
            ActionDefinition::Goto { target, msg } => Action::navigate(target, msg),
            ActionDefinition::Transfer { msg } => Action::transfer(msg),
            ActionDefinition::End { msg } => Action::end_call(msg),
            ActionDefinition::LookupPnr { msg } => Action::lookup(msg),
        }
    }
}

fn parse_symbol(node: &str, raw: &str) -> Result<DtmfSymbol, GraphError> {
    DtmfSymbol::parse(raw).ok_or_else(|| GraphError::InvalidSymbol {
        node: node.to_string(),
        symbol: raw.to_string(),
    })
}
