pub mod app;
pub mod attachments;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod heartbeat;
pub mod settings;
pub mod theme;
pub mod toast;
