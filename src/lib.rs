//! CodeMaster AI: a terminal companion for coding courses.
//!
//! Course code lives in an editor that can be explained or refactored, and a side panel
//! hosts four assistant tools (chat, image analysis, web-grounded research, deep dive),
//! all backed by the Gemini API through [`gateway::Gateway`].

pub mod ai;
pub mod app;
pub mod config;
pub mod courses;
pub mod error;
pub mod format;
pub mod gateway;
pub mod handler;
pub mod image;
pub mod input;
pub mod logging;
pub mod panel;
pub mod panels;
pub mod state;
pub mod tool;
pub mod tui;
pub mod ui;

pub use app::App;
pub use config::{Config, GatewaySettings};
pub use error::{ConfigError, GatewayError, ValidationError};
pub use gateway::{Gateway, Tier};
pub use image::ImageUpload;
pub use panel::{Panel, PanelStatus};
pub use state::{ChatMessage, ChatRole, Citation, GroundingChunk, SearchResult, WebSource};
pub use tool::Tool;
