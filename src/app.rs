use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use serde_json::Value;

use crate::attachments::Attachment;
use crate::chat::{ChatReply, ChatRequest, ChatSession, SlashCommand};
use crate::config::Preferences;
use crate::error::ClientError;
use crate::graph::edges::visible_edges;
use crate::graph::layout::{layout_tree, PositionedNode};
use crate::graph::{AgentEdge, AgentGraphData};
use crate::heartbeat::HeartbeatStatus;
use crate::settings::{SaveOutcome, SettingsForm};
use crate::theme::Theme;
use crate::toast::Toasts;

/// Entries kept in the activity feed before the oldest half is dropped.
const ACTIVITY_CAP: usize = 200;

/// Which panel is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Chat,
    Graph,
    Activity,
}

/// Work the event loop must carry out against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchAgents,
    FetchHeartbeat,
    TriggerHeartbeat,
    Chat(ChatRequest),
    FetchConfig,
    SaveConfig(Value),
    FetchAuthStatus,
    Transcribe(PathBuf),
    Login(String),
}

/// A finished backend call.
#[derive(Debug)]
pub enum ApiEvent {
    Agents(Result<AgentGraphData, ClientError>),
    Heartbeat(Result<HeartbeatStatus, ClientError>),
    HeartbeatTriggered(Result<Value, ClientError>),
    Chat(Result<ChatReply, ClientError>),
    Config(Result<Value, ClientError>),
    ConfigSaved(Result<SaveOutcome, ClientError>),
    AuthStatus(Result<Value, ClientError>),
    Transcript(Result<String, ClientError>),
}

pub struct App {
    pub should_quit: bool,

    // Agent graph, replaced wholesale per response.
    pub graph: AgentGraphData,
    pub layout: Vec<PositionedNode>,
    pub live_edges: Vec<AgentEdge>,
    pub selected_node: usize,

    pub chat: ChatSession,
    /// Lines scrolled up from the bottom of the transcript.
    pub chat_scroll: u16,

    pub activity: Vec<String>,
    pub settings: SettingsForm,
    pub toasts: Toasts,
    pub heartbeat: Option<HeartbeatStatus>,

    pub theme: Theme,
    pub prefs: Preferences,
    pub prefs_path: Option<PathBuf>,

    pub focus: FocusPanel,
    pub started: Instant,
    pub now: DateTime<Utc>,
}

impl App {
    pub fn new(prefs: Preferences, prefs_path: Option<PathBuf>) -> Self {
        let theme = prefs.theme();
        Self {
            should_quit: false,
            graph: AgentGraphData::default(),
            layout: Vec::new(),
            live_edges: Vec::new(),
            selected_node: 0,
            chat: ChatSession::new(),
            chat_scroll: 0,
            activity: Vec::new(),
            settings: SettingsForm::new(),
            toasts: Toasts::new(),
            heartbeat: None,
            theme,
            prefs,
            prefs_path,
            focus: FocusPanel::Chat,
            started: Instant::now(),
            now: Utc::now(),
        }
    }

    /// Requests issued once at launch.
    pub fn startup_commands(&self) -> Vec<Command> {
        vec![Command::FetchAgents, Command::FetchHeartbeat, Command::FetchAuthStatus]
    }

    /// Swap in a new graph and recompute everything derived from it.
    pub fn replace_graph(&mut self, graph: AgentGraphData) {
        tracing::debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), "graph replaced");
        self.layout = layout_tree(&graph.nodes);
        self.graph = graph;
        if self.selected_node >= self.layout.len() {
            self.selected_node = self.layout.len().saturating_sub(1);
        }
        self.refresh_edges();
    }

    /// Recompute which interaction edges are still inside the window and
    /// connect known agents.
    pub fn refresh_edges(&mut self) {
        self.live_edges = visible_edges(&self.graph, self.now)
            .into_iter()
            .cloned()
            .collect();
    }

    /// One-second tick: advance the clock, prune edges, expire toasts.
    pub fn tick(&mut self, now: DateTime<Utc>, instant: Instant) {
        self.now = now;
        self.refresh_edges();
        self.toasts.expire(instant);
    }

    pub fn selected(&self) -> Option<&PositionedNode> {
        self.layout.get(self.selected_node)
    }

    pub fn push_activity(&mut self, entry: String) {
        self.activity.push(entry);
        if self.activity.len() > ACTIVITY_CAP {
            self.activity.drain(0..ACTIVITY_CAP / 2);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }
        if self.settings.open {
            return self.handle_settings_key(key);
        }

        match key.code {
            KeyCode::F(2) => return self.open_settings(),
            KeyCode::F(3) => {
                self.set_theme(self.theme.next());
                return Vec::new();
            }
            KeyCode::F(5) => return vec![Command::FetchAgents],
            KeyCode::Tab => {
                self.cycle_focus();
                return Vec::new();
            }
            _ => {}
        }

        match self.focus {
            FocusPanel::Chat => self.handle_chat_key(key),
            FocusPanel::Graph => {
                match key.code {
                    KeyCode::Char('q') => self.should_quit = true,
                    KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => self.move_selection(1),
                    KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => self.move_selection(-1),
                    KeyCode::Char('g') => self.selected_node = 0,
                    KeyCode::Char('G') => self.selected_node = self.layout.len().saturating_sub(1),
                    _ => {}
                }
                Vec::new()
            }
            FocusPanel::Activity => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
                Vec::new()
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_chat(3),
            MouseEventKind::ScrollDown => self.scroll_chat(-3),
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Enter => return self.submit_input(),
            KeyCode::Backspace => {
                self.chat.input.pop();
            }
            KeyCode::Esc => self.chat.input.clear(),
            KeyCode::PageUp => self.scroll_chat(10),
            KeyCode::PageDown => self.scroll_chat(-10),
            KeyCode::Char(c) => self.chat.input.push(c),
            _ => {}
        }
        Vec::new()
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => self.settings.close(),
            KeyCode::Tab | KeyCode::Down => self.settings.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.settings.focus_prev(),
            KeyCode::Left if self.settings.focus == 0 => self.settings.cycle_model(false),
            KeyCode::Right if self.settings.focus == 0 => self.settings.cycle_model(true),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.save_settings();
            }
            KeyCode::Enter => return self.save_settings(),
            KeyCode::Backspace => self.settings.backspace(),
            KeyCode::Char(c) => self.settings.type_char(c),
            _ => {}
        }
        Vec::new()
    }

    fn save_settings(&mut self) -> Vec<Command> {
        if self.settings.loading {
            return Vec::new();
        }
        vec![Command::SaveConfig(self.settings.payload())]
    }

    pub fn open_settings(&mut self) -> Vec<Command> {
        self.settings.open();
        vec![Command::FetchConfig, Command::FetchAuthStatus]
    }

    /// Enter in the chat box: run a slash command or send a message.
    pub fn submit_input(&mut self) -> Vec<Command> {
        match SlashCommand::parse(&self.chat.input) {
            Some(Ok(cmd)) => {
                self.chat.input.clear();
                return self.run_slash(cmd);
            }
            // Keep what was typed so it can be fixed.
            Some(Err(msg)) => {
                self.toasts.error(msg);
                return Vec::new();
            }
            None => {}
        }
        match self.chat.submit() {
            Some(request) => {
                self.chat_scroll = 0;
                vec![Command::Chat(request)]
            }
            None => Vec::new(),
        }
    }

    fn run_slash(&mut self, cmd: SlashCommand) -> Vec<Command> {
        match cmd {
            SlashCommand::Attach(path) => {
                match Attachment::load(&path) {
                    Ok(attachment) => {
                        self.toasts.success(format!("Attached {}", attachment.name));
                        self.chat.attach(attachment);
                    }
                    Err(e) => self.toasts.error(format!("Could not attach {}: {e}", path.display())),
                }
                Vec::new()
            }
            SlashCommand::Detach => {
                let n = self.chat.detach_all();
                self.toasts.info(format!("Removed {n} attachment(s)"));
                Vec::new()
            }
            SlashCommand::Voice(path) => {
                self.toasts.info(format!("Transcribing {}", path.display()));
                vec![Command::Transcribe(path)]
            }
            SlashCommand::Theme(None) => {
                self.set_theme(self.theme.next());
                Vec::new()
            }
            SlashCommand::Theme(Some(id)) => {
                match Theme::from_id(&id) {
                    Some(theme) => self.set_theme(theme),
                    None => self.toasts.error(format!("Unknown theme {id}")),
                }
                Vec::new()
            }
            SlashCommand::Settings => self.open_settings(),
            SlashCommand::Login(provider) => vec![Command::Login(provider)],
            SlashCommand::Refresh => vec![Command::FetchAgents],
            SlashCommand::Heartbeat => vec![Command::TriggerHeartbeat],
            SlashCommand::ClearInput => Vec::new(),
            SlashCommand::Quit => {
                self.should_quit = true;
                Vec::new()
            }
        }
    }

    /// Show where to log in for `provider`; `None` means it is unknown.
    pub fn login_started(&mut self, provider: &str, url: Option<String>) {
        match url {
            Some(url) => {
                tracing::info!(provider, %url, "login requested");
                self.toasts.info(format!("Open {url} to sign in with {provider}"));
            }
            None => self.toasts.error(format!("Unknown login provider {provider}")),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.prefs.set_theme(theme);
        if let Some(path) = &self.prefs_path {
            if let Err(e) = self.prefs.save(path) {
                tracing::warn!("failed to persist theme: {e:#}");
                self.toasts.error("Could not save theme preference");
                return;
            }
        }
        self.toasts.info(format!("Theme: {}", theme.name()));
    }

    /// Fold a finished backend call into state. May ask for follow-up work.
    pub fn apply(&mut self, event: ApiEvent) -> Vec<Command> {
        match event {
            ApiEvent::Agents(Ok(graph)) => self.replace_graph(graph),
            ApiEvent::Agents(Err(e)) => {
                tracing::error!("failed to fetch agents: {e}");
                self.toasts.error("Failed to fetch agents");
            }
            ApiEvent::Heartbeat(Ok(status)) => self.heartbeat = Some(status),
            ApiEvent::Heartbeat(Err(e)) => tracing::warn!("failed to fetch heartbeat: {e}"),
            ApiEvent::HeartbeatTriggered(Ok(_)) => {
                self.toasts.success("Heartbeat triggered");
                return vec![Command::FetchHeartbeat];
            }
            ApiEvent::HeartbeatTriggered(Err(e)) => {
                tracing::error!("failed to trigger heartbeat: {e}");
                self.toasts.error("Failed to trigger heartbeat");
            }
            ApiEvent::Chat(outcome) => {
                if let Err(e) = &outcome {
                    tracing::error!("chat request failed: {e}");
                    self.toasts.error("Failed to communicate with backend");
                }
                if let Some(reply) = self.chat.complete(outcome) {
                    if let Some(graph) = reply.graph {
                        self.replace_graph(graph);
                    }
                    for entry in reply.activity_log {
                        self.push_activity(entry);
                    }
                }
                self.chat_scroll = 0;
            }
            ApiEvent::Config(Ok(config)) => self.settings.load(&config),
            ApiEvent::Config(Err(e)) => {
                tracing::error!("failed to load config: {e}");
                self.settings.load_failed();
                self.toasts.error("Failed to load configuration");
            }
            ApiEvent::ConfigSaved(Ok(SaveOutcome::Saved)) => {
                self.toasts.success("Configuration saved");
                self.settings.close();
            }
            ApiEvent::ConfigSaved(Ok(SaveOutcome::Rejected(message))) => {
                self.toasts.error(format!("Error saving config: {message}"));
            }
            ApiEvent::ConfigSaved(Err(e)) => {
                tracing::error!("failed to save config: {e}");
                self.toasts.error("Failed to save configuration");
            }
            ApiEvent::AuthStatus(Ok(status)) => self.settings.load_auth(&status),
            ApiEvent::AuthStatus(Err(e)) => tracing::warn!("failed to fetch auth status: {e}"),
            ApiEvent::Transcript(Ok(text)) => {
                if text.trim().is_empty() {
                    self.toasts.info("No speech detected");
                } else {
                    self.chat.input = text;
                }
            }
            ApiEvent::Transcript(Err(e)) => {
                tracing::error!("transcription failed: {e}");
                self.toasts.error("Transcription failed");
            }
        }
        Vec::new()
    }

    fn move_selection(&mut self, delta: i32) {
        if self.layout.is_empty() {
            return;
        }
        let new_idx = self.selected_node as i32 + delta;
        self.selected_node = new_idx.clamp(0, self.layout.len() as i32 - 1) as usize;
    }

    fn scroll_chat(&mut self, delta: i32) {
        let next = self.chat_scroll as i32 + delta;
        self.chat_scroll = next.clamp(0, u16::MAX as i32) as u16;
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPanel::Chat => FocusPanel::Graph,
            FocusPanel::Graph => FocusPanel::Activity,
            FocusPanel::Activity => FocusPanel::Chat,
        };
    }
}

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;
