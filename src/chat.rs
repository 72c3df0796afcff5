use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::attachments::Attachment;
use crate::graph::AgentGraphData;

pub const WELCOME_MESSAGE: &str =
    "System Online. Neural interface active. How can I assist you today?";
pub const CHAT_ERROR_MESSAGE: &str =
    "System Error: Unable to reach neural core. Check connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub attachments: Vec<Attachment>,
}

/// Decoded body of a `POST /chat` reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub graph: Option<AgentGraphData>,
    pub activity_log: Vec<String>,
}

impl ChatReply {
    pub fn from_value(body: &Value) -> Self {
        let response = match body.get("response") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let activity_log = body
            .get("activity_log")
            .and_then(|v| v.as_array())
            .map(|entries| entries.iter().map(activity_entry).collect())
            .unwrap_or_default();
        Self {
            response,
            graph: AgentGraphData::from_response(body),
            activity_log,
        }
    }
}

fn activity_entry(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A chat input line starting with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Attach(PathBuf),
    Detach,
    Voice(PathBuf),
    Theme(Option<String>),
    Settings,
    Login(String),
    Refresh,
    Heartbeat,
    ClearInput,
    Quit,
}

impl SlashCommand {
    /// Parse an input line. `None` when the line is not a known command
    /// and should go to the backend as chat; `Some(Err)` when it names a
    /// command but is malformed.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (rest, ""),
        };
        let needs_arg = |what: &str| Err(format!("/{name} needs {what}"));
        let cmd = match name {
            "attach" if arg.is_empty() => needs_arg("a file path"),
            "attach" => Ok(Self::Attach(PathBuf::from(arg))),
            "detach" => Ok(Self::Detach),
            "voice" if arg.is_empty() => needs_arg("an audio file path"),
            "voice" => Ok(Self::Voice(PathBuf::from(arg))),
            "theme" => Ok(Self::Theme((!arg.is_empty()).then(|| arg.to_string()))),
            "settings" => Ok(Self::Settings),
            "login" if arg.is_empty() => needs_arg("a provider (google or qwen)"),
            "login" => Ok(Self::Login(arg.to_lowercase())),
            "refresh" => Ok(Self::Refresh),
            "heartbeat" => Ok(Self::Heartbeat),
            "clear-input" => Ok(Self::ClearInput),
            "quit" | "exit" => Ok(Self::Quit),
            _ => return None,
        };
        Some(cmd)
    }
}

/// Transcript plus input state for one console session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub messages: Vec<Message>,
    pub input: String,
    pub attachments: Vec<Attachment>,
    pub loading: bool,
    next_id: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let mut session = Self {
            messages: Vec::new(),
            input: String::new(),
            attachments: Vec::new(),
            loading: false,
            next_id: 0,
        };
        session.push(Role::Assistant, WELCOME_MESSAGE.to_string());
        session
    }

    fn push(&mut self, role: Role, content: String) {
        self.messages.push(Message {
            id: self.next_id,
            role,
            content,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }

    /// Whether submitting now would do anything.
    pub fn can_submit(&self) -> bool {
        !self.loading && (!self.input.trim().is_empty() || !self.attachments.is_empty())
    }

    /// Optimistically append the user message and build the request.
    /// Blank input with no attachments, or a request already in flight,
    /// is a no-op.
    pub fn submit(&mut self) -> Option<ChatRequest> {
        if !self.can_submit() {
            return None;
        }
        let mut message = std::mem::take(&mut self.input);
        if message.trim().is_empty() {
            message.clear();
        }
        let attachments = std::mem::take(&mut self.attachments);

        let mut shown = message.clone();
        for attachment in &attachments {
            if !shown.is_empty() {
                shown.push('\n');
            }
            shown.push_str(&attachment.transcript_line());
        }
        self.push(Role::User, shown);
        self.loading = true;

        Some(ChatRequest { message, attachments })
    }

    /// Record the outcome of the in-flight request. Returns the reply on
    /// success so the caller can apply its graph and activity.
    pub fn complete<E>(&mut self, outcome: Result<ChatReply, E>) -> Option<ChatReply> {
        self.loading = false;
        match outcome {
            Ok(reply) => {
                self.push(Role::Assistant, reply.response.clone());
                Some(reply)
            }
            Err(_) => {
                self.push(Role::Assistant, CHAT_ERROR_MESSAGE.to_string());
                None
            }
        }
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn detach_all(&mut self) -> usize {
        let n = self.attachments.len();
        self.attachments.clear();
        n
    }
}

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;

#[cfg(test)]
mod tests {
    use super::*;
    use super::helpers::*;
    use serde_json::json;

    #[test]
    fn starts_with_welcome() {
        let s = ChatSession::new();
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].role, Role::Assistant);
        assert_eq!(s.messages[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn blank_submit_is_noop() {
        let mut s = ChatSession::new();
        s.input = "   \n".into();
        assert!(s.submit().is_none());
        assert_eq!(s.messages.len(), 1);
        assert!(!s.loading);
    }

    #[test]
    fn submit_while_loading_is_noop() {
        let mut s = ChatSession::new();
        s.input = "first".into();
        assert!(s.submit().is_some());
        s.input = "second".into();
        assert!(s.submit().is_none());
        assert_eq!(s.messages.len(), 2);
        assert_eq!(s.input, "second");
    }

    #[test]
    fn submit_appends_user_message_and_clears_input() {
        let mut s = ChatSession::new();
        s.input = "spin up a researcher".into();
        let req = s.submit().unwrap();
        assert_eq!(req.message, "spin up a researcher");
        assert!(req.attachments.is_empty());
        assert!(s.input.is_empty());
        assert!(s.loading);
        let last = s.messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "spin up a researcher");
    }

    #[test]
    fn attachments_alone_can_be_submitted() {
        let mut s = ChatSession::new();
        s.attach(Attachment::from_bytes("plan.txt".into(), b"step one".to_vec()));
        let req = s.submit().unwrap();
        assert_eq!(req.message, "");
        assert_eq!(req.attachments.len(), 1);
        assert!(s.attachments.is_empty());
        assert!(s.messages.last().unwrap().content.contains("step one"));
    }

    #[test]
    fn blank_text_with_attachment_sends_empty_message() {
        let mut s = ChatSession::new();
        s.input = "   ".into();
        s.attach(Attachment::from_bytes("plan.txt".into(), b"step one".to_vec()));
        let req = s.submit().unwrap();
        assert_eq!(req.message, "");
        let shown = &s.messages.last().unwrap().content;
        assert!(shown.starts_with("[Attached file: plan.txt]"));
    }

    #[test]
    fn success_appends_reply() {
        let mut s = ChatSession::new();
        s.input = "hi".into();
        s.submit();
        let body = chat_response("hello there", &small_swarm());
        let reply = s.complete::<()>(Ok(ChatReply::from_value(&body))).unwrap();
        assert!(!s.loading);
        assert_eq!(s.messages.last().unwrap().content, "hello there");
        assert_eq!(reply.graph.unwrap().nodes.len(), 4);
    }

    #[test]
    fn failure_appends_error_message() {
        let mut s = ChatSession::new();
        s.input = "hi".into();
        s.submit();
        assert!(s.complete(Err("connection refused")).is_none());
        assert!(!s.loading);
        assert_eq!(s.messages.len(), 3);
        assert_eq!(s.messages.last().unwrap().content, CHAT_ERROR_MESSAGE);
    }

    #[test]
    fn message_ids_are_unique() {
        let mut s = ChatSession::new();
        for text in ["a", "b"] {
            s.input = text.into();
            s.submit();
            s.complete(Err(()));
        }
        let mut ids: Vec<u64> = s.messages.iter().map(|m| m.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), s.messages.len());
    }

    #[test]
    fn reply_decodes_legacy_agents_and_activity() {
        let body = json!({
            "response": "done",
            "agents": ["Manager", "Coder"],
            "activity_log": ["Manager -> Coder: write tests", {"tool": "shell"}]
        });
        let reply = ChatReply::from_value(&body);
        assert_eq!(reply.response, "done");
        assert_eq!(reply.graph.unwrap().nodes.len(), 2);
        assert_eq!(reply.activity_log[0], "Manager -> Coder: write tests");
        assert_eq!(reply.activity_log[1], r#"{"tool":"shell"}"#);
    }

    #[test]
    fn reply_without_graph_leaves_graph_none() {
        let reply = ChatReply::from_value(&json!({"response": "ok"}));
        assert!(reply.graph.is_none());
        assert!(reply.activity_log.is_empty());
    }

    #[test]
    fn slash_commands_parse() {
        assert_eq!(SlashCommand::parse("hello"), None);
        assert_eq!(
            SlashCommand::parse("/attach ./notes.md"),
            Some(Ok(SlashCommand::Attach(PathBuf::from("./notes.md"))))
        );
        assert_eq!(SlashCommand::parse("/theme"), Some(Ok(SlashCommand::Theme(None))));
        assert_eq!(
            SlashCommand::parse("/theme forest"),
            Some(Ok(SlashCommand::Theme(Some("forest".into()))))
        );
        assert_eq!(SlashCommand::parse("/login Qwen"), Some(Ok(SlashCommand::Login("qwen".into()))));
        assert!(matches!(SlashCommand::parse("/attach"), Some(Err(_))));
        assert!(matches!(SlashCommand::parse("/voice"), Some(Err(_))));
        assert_eq!(SlashCommand::parse("/bogus"), None);
        assert_eq!(SlashCommand::parse("/etc/hosts is read-only?"), None);
        assert_eq!(SlashCommand::parse("/quit"), Some(Ok(SlashCommand::Quit)));
    }
}
