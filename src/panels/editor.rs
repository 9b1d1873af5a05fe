use tracing::info;

use crate::courses::{self, DEFAULT_COURSE};
use crate::gateway::Gateway;
use crate::input::TextInput;
use crate::panel::Panel;

pub const EXPLAIN_FALLBACK: &str = "Sorry, an error occurred while trying to explain the code.";
pub const REFACTOR_FALLBACK: &str = "Sorry, an error occurred while trying to refactor the code.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Explain,
    Refactor,
}

impl EditorAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorAction::Explain => "explain",
            EditorAction::Refactor => "refactor",
        }
    }

    fn fallback(&self) -> &'static str {
        match self {
            EditorAction::Explain => EXPLAIN_FALLBACK,
            EditorAction::Refactor => REFACTOR_FALLBACK,
        }
    }
}

/// The course's code buffer and the AI response about it
pub struct EditorPanel {
    course: String,
    pub code: TextInput,
    pub request: Panel<String>,
    pub scroll: u16,
}

impl EditorPanel {
    pub fn new(course: &str) -> Self {
        let mut editor = Self {
            course: String::new(),
            code: TextInput::new(),
            request: Panel::new("editor", EXPLAIN_FALLBACK),
            scroll: 0,
        };
        editor.select_course(course);
        editor
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    /// Load the course's starter sample. Any in-flight request is aborted and the previous
    /// response is cleared, since it described different code.
    pub fn select_course(&mut self, course: &str) {
        let name = courses::find(course).map(|c| c.name).unwrap_or(course);
        info!(course = name, "course selected");
        self.course = name.to_string();
        self.code.set(courses::sample_for(name));
        self.code.home();
        self.request.reset();
        self.scroll = 0;
    }

    pub fn run(&mut self, action: EditorAction, gateway: &Gateway) -> bool {
        if self.code.is_blank() || self.request.is_awaiting() {
            return false;
        }

        let code = self.code.value().to_string();
        let gateway = gateway.clone();
        self.scroll = 0;
        self.request.submit_with_fallback(action.fallback(), async move {
            match action {
                EditorAction::Explain => gateway.explain_code(&code).await,
                EditorAction::Refactor => gateway.refactor_code(&code).await,
            }
        })
    }
}

impl Default for EditorPanel {
    fn default() -> Self {
        Self::new(DEFAULT_COURSE)
    }
}
