use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, EditTarget, Focus, InputMode};
use crate::panels::EditorAction;
use crate::tool::Tool;
use crate::tui::AppEvent;

const MOUSE_SCROLL_LINES: u16 = 3;
const HALF_PAGE_LINES: u16 = 10;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
    app.poll_tasks().await;
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Focus cycles: Courses -> Editor -> Tools
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Courses => Focus::Editor,
                Focus::Editor => Focus::Tools,
                Focus::Tools => Focus::Courses,
            };
        }
        KeyCode::BackTab => {
            app.focus = match app.focus {
                Focus::Courses => Focus::Tools,
                Focus::Editor => Focus::Courses,
                Focus::Tools => Focus::Editor,
            };
        }

        // Tool tabs
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            if let Some(&tool) = Tool::all().get(idx) {
                app.select_tool(tool);
                app.focus = Focus::Tools;
            }
        }
        KeyCode::Char(']') => app.next_tool(),
        KeyCode::Char('[') => app.prev_tool(),

        // Jump straight to the tool prompt
        KeyCode::Char('/') => app.start_editing(EditTarget::ToolPrompt),

        _ => match app.focus {
            Focus::Courses => handle_courses_normal(app, key),
            Focus::Editor => handle_editor_normal(app, key),
            Focus::Tools => handle_tools_normal(app, key),
        },
    }
}

fn handle_courses_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.courses_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.courses_nav_up(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_highlighted_course(),
        _ => {}
    }
}

fn handle_editor_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') => {
            app.run_editor(EditorAction::Explain);
        }
        KeyCode::Char('r') => {
            app.run_editor(EditorAction::Refactor);
        }
        KeyCode::Char('i') | KeyCode::Enter => app.start_editing(EditTarget::Code),

        // Half-page scroll (must be before plain 'd'/'u' to match first)
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_response_down(HALF_PAGE_LINES);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_response_up(HALF_PAGE_LINES);
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_response_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_response_up(1),
        KeyCode::Char('g') => app.editor.scroll = 0,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => app.focus = Focus::Courses,
        _ => {}
    }
}

fn handle_tools_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') => app.start_editing(EditTarget::ToolPrompt),
        KeyCode::Char('o') if app.active_tool == Tool::Image => {
            app.start_editing(EditTarget::ImagePath);
        }
        KeyCode::Enter => {
            if app.tool_input().is_blank() {
                app.start_editing(EditTarget::ToolPrompt);
            } else {
                app.submit_active_tool();
            }
        }

        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_tool_down(HALF_PAGE_LINES);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_tool_up(HALF_PAGE_LINES);
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_tool_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_tool_up(1),
        KeyCode::Char('g') => app.tool_scroll = 0,
        KeyCode::Esc => app.focus = Focus::Editor,
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.stop_editing(),
        KeyCode::Enter => match app.edit_target {
            EditTarget::Code => app.active_input_mut().insert('\n'),
            EditTarget::ImagePath => {
                app.image.load_from_path_input();
                app.stop_editing();
            }
            EditTarget::ToolPrompt => {
                app.submit_active_tool();
                // Chat keeps the cursor in the box for the next turn
                if app.active_tool != Tool::Chat {
                    app.stop_editing();
                }
            }
        },
        KeyCode::Tab if app.edit_target == EditTarget::Code => {
            let input = app.active_input_mut();
            input.insert(' ');
            input.insert(' ');
        }
        KeyCode::Backspace => app.active_input_mut().backspace(),
        KeyCode::Delete => app.active_input_mut().delete(),
        KeyCode::Left => app.active_input_mut().left(),
        KeyCode::Right => app.active_input_mut().right(),
        KeyCode::Home => app.active_input_mut().home(),
        KeyCode::End => app.active_input_mut().end(),
        KeyCode::Char(c) => app.active_input_mut().insert(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let hit = |area: Option<Rect>| area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_courses = hit(app.courses_area);
    let in_response = hit(app.response_area);
    let in_tool = hit(app.tool_area);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_tool {
                app.scroll_tool_down(MOUSE_SCROLL_LINES);
            } else if in_response {
                app.scroll_response_down(MOUSE_SCROLL_LINES);
            } else if in_courses {
                app.courses_nav_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_tool {
                app.scroll_tool_up(MOUSE_SCROLL_LINES);
            } else if in_response {
                app.scroll_response_up(MOUSE_SCROLL_LINES);
            } else if in_courses {
                app.courses_nav_up();
            }
        }
        _ => {}
    }
}
