use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tracing::{info, warn};

use crate::config::Config;
use crate::courses::{self, DEFAULT_COURSE};
use crate::gateway::Gateway;
use crate::input::TextInput;
use crate::panels::{ChatPanel, EditorAction, EditorPanel, ImagePanel, SearchPanel, ThinkingPanel};
use crate::tool::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Courses,
    Editor,
    Tools,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Which buffer receives keystrokes while editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Code,
    ToolPrompt,
    ImagePath,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub edit_target: EditTarget,

    // Course sidebar
    pub course_state: ListState,
    pub editor: EditorPanel,

    // Tool panels
    pub active_tool: Tool,
    pub chat: ChatPanel,
    pub image: ImagePanel,
    pub search: SearchPanel,
    pub thinking: ThinkingPanel,
    pub tool_scroll: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub courses_area: Option<Rect>,
    pub code_area: Option<Rect>,
    pub response_area: Option<Rect>,
    pub tool_area: Option<Rect>,

    // Data
    pub gateway: Gateway,
    persist_course: bool,
}

impl App {
    pub fn new(gateway: Gateway, course: &str) -> Self {
        let course = courses::find(course).map(|c| c.name).unwrap_or(DEFAULT_COURSE);

        let mut course_state = ListState::default();
        course_state.select(courses::position(course));

        Self {
            should_quit: false,
            focus: Focus::Courses,
            input_mode: InputMode::Normal,
            edit_target: EditTarget::ToolPrompt,

            course_state,
            editor: EditorPanel::new(course),

            active_tool: Tool::default(),
            chat: ChatPanel::new(),
            image: ImagePanel::new(),
            search: SearchPanel::new(),
            thinking: ThinkingPanel::new(),
            tool_scroll: 0,

            animation_frame: 0,

            courses_area: None,
            code_area: None,
            response_area: None,
            tool_area: None,

            gateway,
            persist_course: false,
        }
    }

    /// Remember the selected course in the config file across runs
    pub fn with_course_persistence(mut self) -> Self {
        self.persist_course = true;
        self
    }

    // Course navigation
    pub fn courses_nav_down(&mut self) {
        let len = courses::all().len();
        if len > 0 {
            let i = self.course_state.selected().unwrap_or(0);
            self.course_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn courses_nav_up(&mut self) {
        let i = self.course_state.selected().unwrap_or(0);
        self.course_state.select(Some(i.saturating_sub(1)));
    }

    pub fn highlighted_course(&self) -> Option<&'static str> {
        self.course_state
            .selected()
            .and_then(|i| courses::all().get(i))
            .map(|c| c.name)
    }

    pub fn open_highlighted_course(&mut self) {
        if let Some(course) = self.highlighted_course() {
            self.select_course(course);
            self.focus = Focus::Editor;
        }
    }

    pub fn select_course(&mut self, course: &str) {
        self.course_state.select(courses::position(course));

        // Re-opening the current course keeps edits and any running request
        if courses::find(course).map(|c| c.name) == Some(self.editor.course()) {
            return;
        }
        self.editor.select_course(course);

        if self.persist_course {
            if let Err(err) = Config::save_last_course(self.editor.course()) {
                warn!(error = %err, "could not remember last course");
            }
        }
    }

    // Tool navigation (panels stay alive, so in-flight requests keep running)
    pub fn select_tool(&mut self, tool: Tool) {
        if self.active_tool != tool {
            info!(tool = tool.display_name(), "tool selected");
            self.active_tool = tool;
            self.tool_scroll = 0;
        }
    }

    pub fn next_tool(&mut self) {
        self.select_tool(self.active_tool.next());
    }

    pub fn prev_tool(&mut self) {
        self.select_tool(self.active_tool.prev());
    }

    pub fn tool_input(&self) -> &TextInput {
        match self.active_tool {
            Tool::Chat => &self.chat.input,
            Tool::Image => &self.image.input,
            Tool::Search => &self.search.input,
            Tool::Thinking => &self.thinking.input,
        }
    }

    /// The buffer currently receiving keystrokes
    pub fn active_input_mut(&mut self) -> &mut TextInput {
        match self.edit_target {
            EditTarget::Code => &mut self.editor.code,
            EditTarget::ImagePath => &mut self.image.path_input,
            EditTarget::ToolPrompt => match self.active_tool {
                Tool::Chat => &mut self.chat.input,
                Tool::Image => &mut self.image.input,
                Tool::Search => &mut self.search.input,
                Tool::Thinking => &mut self.thinking.input,
            },
        }
    }

    pub fn start_editing(&mut self, target: EditTarget) {
        self.edit_target = target;
        self.input_mode = InputMode::Editing;
        self.focus = match target {
            EditTarget::Code => Focus::Editor,
            EditTarget::ToolPrompt | EditTarget::ImagePath => Focus::Tools,
        };
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn is_tool_loading(&self, tool: Tool) -> bool {
        match tool {
            Tool::Chat => self.chat.is_loading(),
            Tool::Image => self.image.request.is_awaiting(),
            Tool::Search => self.search.request.is_awaiting(),
            Tool::Thinking => self.thinking.request.is_awaiting(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.editor.request.is_awaiting() || Tool::all().into_iter().any(|t| self.is_tool_loading(t))
    }

    /// Submit the active tool's prompt. Returns true if a request was started.
    pub fn submit_active_tool(&mut self) -> bool {
        let started = match self.active_tool {
            Tool::Chat => self.chat.submit(&self.gateway),
            Tool::Image => self.image.submit(&self.gateway),
            Tool::Search => self.search.submit(&self.gateway),
            Tool::Thinking => self.thinking.submit(&self.gateway),
        };
        if started {
            self.tool_scroll = 0;
        }
        started
    }

    pub fn run_editor(&mut self, action: EditorAction) -> bool {
        info!(action = action.as_str(), course = self.editor.course(), "editor action");
        self.editor.run(action, &self.gateway)
    }

    /// Move finished background requests into their panels
    pub async fn poll_tasks(&mut self) {
        self.editor.request.poll().await;
        self.chat.poll().await;
        self.image.request.poll().await;
        self.search.request.poll().await;
        self.thinking.request.poll().await;
    }

    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_tool_down(&mut self, lines: u16) {
        self.tool_scroll = self.tool_scroll.saturating_add(lines);
    }

    pub fn scroll_tool_up(&mut self, lines: u16) {
        self.tool_scroll = self.tool_scroll.saturating_sub(lines);
    }

    pub fn scroll_response_down(&mut self, lines: u16) {
        self.editor.scroll = self.editor.scroll.saturating_add(lines);
    }

    pub fn scroll_response_up(&mut self, lines: u16) {
        self.editor.scroll = self.editor.scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewaySettings;

    fn app() -> App {
        let gateway =
            Gateway::new(&GatewaySettings::new("k").with_base_url("http://127.0.0.1:9")).unwrap();
        App::new(gateway, "React Hooks")
    }

    #[test]
    fn test_unknown_start_course_falls_back_to_default() {
        let gateway =
            Gateway::new(&GatewaySettings::new("k").with_base_url("http://127.0.0.1:9")).unwrap();
        let app = App::new(gateway, "Haskell Monads");
        assert_eq!(app.editor.course(), DEFAULT_COURSE);
        assert_eq!(app.course_state.selected(), Some(0));
    }

    #[test]
    fn test_course_navigation_clamps() {
        let mut app = app();
        app.courses_nav_up();
        assert_eq!(app.highlighted_course(), Some("React Hooks"));
        for _ in 0..10 {
            app.courses_nav_down();
        }
        assert_eq!(app.highlighted_course(), Some("Node.js Performance"));
    }

    #[test]
    fn test_open_highlighted_course() {
        let mut app = app();
        app.courses_nav_down();
        app.courses_nav_down();
        app.open_highlighted_course();

        assert_eq!(app.editor.course(), "CSS Grid Mastery");
        assert_eq!(app.editor.code.value(), courses::sample_for("CSS Grid Mastery"));
        assert_eq!(app.focus, Focus::Editor);
    }

    #[tokio::test]
    async fn test_reopening_current_course_keeps_work() {
        let mut app = app();
        app.editor.code.set("my edited code");
        assert!(app.run_editor(EditorAction::Explain));

        app.open_highlighted_course();
        assert_eq!(app.editor.course(), "React Hooks");
        assert_eq!(app.editor.code.value(), "my edited code");
        assert!(app.editor.request.is_awaiting());

        app.select_course("react hooks");
        assert_eq!(app.editor.code.value(), "my edited code");
        assert!(app.editor.request.is_awaiting());

        app.select_course("Advanced TypeScript");
        assert_eq!(app.editor.code.value(), courses::sample_for("Advanced TypeScript"));
        assert!(!app.editor.request.is_awaiting());
    }

    #[test]
    fn test_active_input_follows_tool() {
        let mut app = app();
        app.select_tool(Tool::Search);
        app.start_editing(EditTarget::ToolPrompt);
        app.active_input_mut().insert('q');

        assert_eq!(app.search.input.value(), "q");
        assert!(app.chat.input.is_blank());
        assert_eq!(app.focus, Focus::Tools);
    }

    #[test]
    fn test_blank_prompt_is_not_submitted() {
        let mut app = app();
        app.select_tool(Tool::Thinking);
        app.thinking.input.set("   ");
        assert!(!app.submit_active_tool());
        assert!(!app.is_loading());
    }
}
