pub mod edges;
pub mod layout;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Id of the designated root agent.
pub const MANAGER_ID: &str = "Manager";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Inactive,
}

/// A single agent as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_thought: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
}

impl AgentNode {
    pub fn is_manager(&self) -> bool {
        self.id == MANAGER_ID
    }

    /// Display name with underscores turned into spaces.
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }

    /// The last thought, unless the agent is idle.
    pub fn visible_thought(&self) -> Option<&str> {
        self.last_thought
            .as_deref()
            .filter(|t| !t.is_empty() && *t != "Idle")
    }
}

/// A transient interaction between two agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// The whole visualization state, replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentGraphData {
    #[serde(default)]
    pub nodes: Vec<AgentNode>,
    #[serde(default)]
    pub edges: Vec<AgentEdge>,
}

impl AgentGraphData {
    /// Build a graph from the legacy flat list of agent names.
    /// When a Manager is present every other agent hangs off it.
    pub fn from_legacy_names(names: &[String]) -> Self {
        let has_manager = names.iter().any(|n| n == MANAGER_ID);
        let nodes = names
            .iter()
            .map(|name| AgentNode {
                id: name.clone(),
                name: name.clone(),
                parent: if has_manager && name != MANAGER_ID {
                    Some(MANAGER_ID.to_string())
                } else {
                    None
                },
                last_thought: None,
                status: None,
            })
            .collect();
        Self {
            nodes,
            edges: Vec::new(),
        }
    }

    /// Pull graph data out of a backend response body. Accepts the
    /// `graph` object or the legacy `agents` name list; `graph` wins.
    /// Returns `None` when the body carries neither.
    pub fn from_response(body: &Value) -> Option<Self> {
        if let Some(graph) = body.get("graph").filter(|g| g.is_object()) {
            match serde_json::from_value::<AgentGraphData>(graph.clone()) {
                Ok(data) => return Some(data),
                Err(e) => tracing::warn!("ignoring malformed graph payload: {e}"),
            }
        }
        let names = body.get("agents")?.as_array()?;
        let names: Vec<String> = names
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        Some(Self::from_legacy_names(&names))
    }

    pub fn node(&self, id: &str) -> Option<&AgentNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.status == Some(AgentStatus::Active))
            .count()
    }
}
