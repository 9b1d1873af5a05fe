//! Per-tool request state
//!
//! Each panel owns its inputs and a `Panel` state machine, and calls exactly one gateway
//! operation per user action. Panels never share state with each other.

pub mod chat;
pub mod editor;
pub mod image;
pub mod search;
pub mod thinking;

pub use chat::ChatPanel;
pub use editor::{EditorAction, EditorPanel};
pub use image::ImagePanel;
pub use search::SearchPanel;
pub use thinking::ThinkingPanel;
