use serde_json::{json, Value};

use crate::graph::{AgentEdge, AgentGraphData, AgentNode};

/// Create a bare AgentNode whose name equals its id.
pub fn agent(id: &str, parent: Option<&str>) -> AgentNode {
    AgentNode {
        id: id.to_string(),
        name: id.to_string(),
        parent: parent.map(str::to_string),
        last_thought: None,
        status: None,
    }
}

/// Create an AgentNode carrying a last thought.
pub fn thinking_agent(id: &str, parent: Option<&str>, thought: &str) -> AgentNode {
    let mut a = agent(id, parent);
    a.last_thought = Some(thought.to_string());
    a
}

/// Create an interaction edge with an explicit timestamp string.
pub fn edge(source: &str, target: &str, timestamp: Option<&str>) -> AgentEdge {
    AgentEdge {
        source: source.to_string(),
        target: target.to_string(),
        label: format!("{source}->{target}"),
        timestamp: timestamp.map(str::to_string),
    }
}

/// A Manager with two team leads and one worker under the first lead.
pub fn small_swarm() -> AgentGraphData {
    AgentGraphData {
        nodes: vec![
            agent("Manager", None),
            agent("lead_research", Some("Manager")),
            agent("lead_build", Some("Manager")),
            agent("coder", Some("lead_build")),
        ],
        edges: Vec::new(),
    }
}

/// Build a `/chat` response body carrying a graph.
pub fn chat_response(reply: &str, graph: &AgentGraphData) -> Value {
    json!({
        "response": reply,
        "graph": graph,
    })
}
