use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, EditTarget, Focus, InputMode};
use crate::courses;
use crate::input::TextInput;
use crate::panel::PanelStatus;
use crate::state::ChatRole;
use crate::tool::Tool;

/// Parse a line of text and convert **bold** and *italic* markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c != '*' {
            current_text.push(c);
            continue;
        }

        let bold = chars.peek() == Some(&'*');
        if bold {
            chars.next();
        }

        // Find the matching closing marker
        let mut inner = String::new();
        let mut found_close = false;
        while let Some(c) = chars.next() {
            if c == '*' {
                if !bold {
                    found_close = true;
                    break;
                }
                if chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
            }
            inner.push(c);
        }

        if found_close && !inner.is_empty() {
            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }
            let modifier = if bold { Modifier::BOLD } else { Modifier::ITALIC };
            spans.push(Span::styled(inner, Style::default().add_modifier(modifier)));
        } else {
            // No closing marker, treat as literal
            current_text.push_str(if bold { "**" } else { "*" });
            current_text.push_str(&inner);
            if found_close {
                current_text.push_str(if bold { "**" } else { "*" });
            }
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Render a model response: fenced blocks as code, everything else through the emphasis parser
fn markdown_lines(text: &str) -> Vec<Line<'static>> {
    let code_style = Style::default().fg(Color::LightGreen);
    let fence_style = Style::default().fg(Color::DarkGray);

    let mut lines = Vec::new();
    let mut in_code = false;

    for line in text.lines() {
        if let Some(lang) = line.trim_start().strip_prefix("```") {
            in_code = !in_code;
            let label = if in_code && !lang.is_empty() {
                format!("─── {} ───", lang.trim())
            } else {
                "───".to_string()
            };
            lines.push(Line::from(Span::styled(label, fence_style)));
        } else if in_code {
            lines.push(Line::from(Span::styled(line.to_string(), code_style)));
        } else {
            lines.push(parse_markdown_line(line));
        }
    }

    lines
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Terminal position of a cursor inside a bordered block, clamped to the block's inner area
fn cursor_in(area: Rect, gutter: u16, col: usize, row: usize) -> (u16, u16) {
    let inner_right = area.right().saturating_sub(2).max(area.x);
    let inner_bottom = area.bottom().saturating_sub(2).max(area.y);

    let x = area
        .x
        .saturating_add(1)
        .saturating_add(gutter)
        .saturating_add(to_u16(col))
        .min(inner_right);
    let y = area.y.saturating_add(1).saturating_add(to_u16(row)).min(inner_bottom);
    (x, y)
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn thinking_line(app: &App, label: &str) -> Line<'static> {
    // Animated ellipsis: cycles through ".", "..", "..."
    let dots = ".".repeat((app.animation_frame as usize) + 1);
    Line::from(Span::styled(
        format!("{}{}", label, dots),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [courses_area, editor_area, tool_area] = Layout::horizontal([
        Constraint::Length(26),
        Constraint::Min(30),
        Constraint::Percentage(40),
    ])
    .areas(body_area);

    render_header(app, frame, header_area);
    render_courses(app, frame, courses_area);
    render_editor(app, frame, editor_area);
    render_tool_panel(app, frame, tool_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let loading = if app.is_loading() { " [working]" } else { "" };

    let title = Line::from(vec![
        Span::styled(" CodeMaster AI ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("· {}", app.editor.course()), Style::default().fg(Color::White)),
        Span::styled(loading, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: Vec<(&str, &str)> = match (app.input_mode, app.focus) {
        (InputMode::Editing, _) if app.edit_target == EditTarget::Code => {
            vec![("Enter", "newline"), ("Esc", "done")]
        }
        (InputMode::Editing, _) => vec![("Enter", "submit"), ("Esc", "cancel")],
        (InputMode::Normal, Focus::Courses) => {
            vec![("j/k", "nav"), ("Enter", "open"), ("Tab", "focus"), ("1-4", "tool"), ("q", "quit")]
        }
        (InputMode::Normal, Focus::Editor) => vec![
            ("e", "explain"),
            ("r", "refactor"),
            ("i", "edit"),
            ("j/k", "scroll"),
            ("Tab", "focus"),
            ("q", "quit"),
        ],
        (InputMode::Normal, Focus::Tools) => {
            let mut pairs = vec![("i", "prompt"), ("Enter", "submit")];
            if app.active_tool == Tool::Image {
                pairs.push(("o", "open image"));
            }
            pairs.extend([("[ ]", "tool"), ("j/k", "scroll"), ("Tab", "focus"), ("q", "quit")]);
            pairs
        }
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_courses(app: &mut App, frame: &mut Frame, area: Rect) {
    app.courses_area = Some(area);

    let current = app.editor.course().to_string();
    let items: Vec<ListItem> = courses::all()
        .iter()
        .map(|course| {
            let style = if course.name == current {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Span::styled(course.name, style))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::Courses))
                .title(" Courses "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.course_state);
}

fn render_editor(app: &mut App, frame: &mut Frame, area: Rect) {
    let [code_area, response_area] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    app.code_area = Some(code_area);
    app.response_area = Some(response_area);

    let focused = app.focus == Focus::Editor;
    let editing_code = app.input_mode == InputMode::Editing && app.edit_target == EditTarget::Code;

    // Keep the cursor line visible while editing
    let (cursor_line, cursor_col) = app.editor.code.line_col();
    let inner_height = code_area.height.saturating_sub(2) as usize;
    let code_scroll = to_u16(cursor_line.saturating_sub(inner_height.saturating_sub(1)));

    let code_lines: Vec<Line> = app
        .editor
        .code
        .value()
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            Line::from(vec![
                Span::styled(format!("{:>3} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(line.to_string()),
            ])
        })
        .collect();

    let code_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing_code {
            Style::default().fg(Color::Yellow)
        } else {
            border_style(focused)
        })
        .title(" Your Code ");
    let code = Paragraph::new(Text::from(code_lines))
        .block(code_block)
        .scroll((code_scroll, 0));
    frame.render_widget(code, code_area);

    if editing_code {
        let row = cursor_line.saturating_sub(code_scroll as usize);
        // 4 columns of line-number gutter
        frame.set_cursor_position(cursor_in(code_area, 4, cursor_col, row));
    }

    let response_text = match app.editor.request.status() {
        PanelStatus::Idle => Text::from(Span::styled(
            "Use \"Explain\" (e) or \"Refactor\" (r) to get AI feedback on your code.",
            Style::default().fg(Color::DarkGray),
        )),
        PanelStatus::Awaiting => Text::from(thinking_line(app, "Thinking")),
        PanelStatus::Ready(text) => Text::from(markdown_lines(text)),
        PanelStatus::Failed(message) => {
            Text::from(Span::styled(*message, Style::default().fg(Color::Red)))
        }
    };

    let response = Paragraph::new(response_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(" AI Response "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.editor.scroll, 0));
    frame.render_widget(response, response_area);
}

fn render_tool_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let [tabs_area, content_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let titles: Vec<Line> = Tool::all()
        .iter()
        .enumerate()
        .map(|(i, tool)| {
            let marker = if app.is_tool_loading(*tool) { "*" } else { "" };
            Line::from(format!("{} {}{}", i + 1, tool.display_name(), marker))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::Tools))
                .title(" AI Assistant "),
        )
        .select(app.active_tool.index())
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, tabs_area);

    match app.active_tool {
        Tool::Chat => render_chat(app, frame, content_area),
        Tool::Image => render_image(app, frame, content_area),
        Tool::Search => render_search(app, frame, content_area),
        Tool::Thinking => render_thinking(app, frame, content_area),
    }
}

/// Split a tool area into a scrollable output pane and a prompt box at the bottom
fn output_and_input(area: Rect, input_height: u16) -> (Rect, Rect) {
    let [output, input] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(input_height)]).areas(area);
    (output, input)
}

fn render_output(app: &mut App, frame: &mut Frame, area: Rect, title: &str, text: Text<'static>) {
    app.tool_area = Some(area);
    let output = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::Tools))
                .title(format!(" {} ", title)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.tool_scroll, 0));
    frame.render_widget(output, area);
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    input: &TextInput,
    title: &str,
    placeholder: &str,
    editing: bool,
) {
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title));

    // Calculate visible portion of input with horizontal scrolling
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = input.cursor();
    let scroll_offset = if inner_width == 0 || cursor_pos < inner_width {
        0
    } else {
        cursor_pos - inner_width + 1
    };

    let paragraph = if input.value().is_empty() && !editing {
        Paragraph::new(Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)))
    } else {
        let visible_text: String = input
            .value()
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(paragraph.block(block), area);

    if editing {
        frame.set_cursor_position(cursor_in(area, 0, cursor_pos - scroll_offset, 0));
    }
}

fn is_editing(app: &App, target: EditTarget) -> bool {
    app.input_mode == InputMode::Editing && app.edit_target == target
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let (output_area, input_area) = output_and_input(area, 3);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for msg in app.chat.messages() {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.extend(msg.text.lines().map(|l| Line::from(l.to_string())));
            }
            ChatRole::Model => {
                lines.push(Line::from(Span::styled(
                    "AI:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                lines.extend(msg.text.lines().map(parse_markdown_line));
            }
        }
        lines.push(Line::default());
    }
    if app.chat.is_loading() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(thinking_line(app, "Thinking"));
    }

    render_output(app, frame, output_area, "Chat", Text::from(lines));
    render_input(
        frame,
        input_area,
        &app.chat.input,
        "Ask (i to type)",
        "Ask a question...",
        is_editing(app, EditTarget::ToolPrompt),
    );
}

fn render_image(app: &mut App, frame: &mut Frame, area: Rect) {
    let [path_area, output_area, input_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    render_input(
        frame,
        path_area,
        &app.image.path_input,
        "Image file (o to open)",
        "PNG, JPG, WEBP, max 4MB",
        is_editing(app, EditTarget::ImagePath),
    );

    let mut lines: Vec<Line<'static>> = Vec::new();
    match app.image.upload() {
        Some(upload) => lines.push(Line::from(vec![
            Span::styled("Image: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!(
                "{} ({}, {} KB)",
                upload.file_name,
                upload.mime_type,
                upload.size.div_ceil(1024)
            )),
        ])),
        None => lines.push(Line::from(Span::styled(
            "No image selected. Press o and enter a file path.",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    if let Some(err) = app.image.validation() {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::default());

    match app.image.request.status() {
        PanelStatus::Idle => {}
        PanelStatus::Awaiting => lines.push(thinking_line(app, "Analyzing")),
        PanelStatus::Ready(text) => {
            lines.push(Line::from(Span::styled(
                "Analysis Result:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            lines.extend(text.lines().map(|l| Line::from(l.to_string())));
        }
        PanelStatus::Failed(message) => {
            lines.push(Line::from(Span::styled(*message, Style::default().fg(Color::Red))));
        }
    }

    render_output(app, frame, output_area, "Image Analysis", Text::from(lines));
    render_input(
        frame,
        input_area,
        &app.image.input,
        "Prompt (i to type)",
        "e.g., Explain this architecture diagram...",
        is_editing(app, EditTarget::ToolPrompt),
    );
}

fn render_search(app: &mut App, frame: &mut Frame, area: Rect) {
    let (output_area, input_area) = output_and_input(area, 3);

    let lines: Vec<Line<'static>> = match app.search.request.status() {
        PanelStatus::Idle => vec![Line::from(Span::styled(
            "Ask anything; answers are grounded in live web search.",
            Style::default().fg(Color::DarkGray),
        ))],
        PanelStatus::Awaiting => vec![thinking_line(app, "Researching")],
        PanelStatus::Ready(result) => {
            let mut lines = vec![Line::from(Span::styled(
                "Research Result:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))];
            lines.extend(result.text.lines().map(|l| Line::from(l.to_string())));

            let citations = result.citations();
            if !citations.is_empty() {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "SOURCES:",
                    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                )));
                for citation in citations {
                    lines.push(Line::from(vec![
                        Span::raw("• "),
                        Span::styled(
                            citation.label,
                            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                        ),
                        Span::styled(format!(" <{}>", citation.uri), Style::default().fg(Color::DarkGray)),
                    ]));
                }
            }
            lines
        }
        PanelStatus::Failed(message) => {
            vec![Line::from(Span::styled(*message, Style::default().fg(Color::Red)))]
        }
    };

    render_output(app, frame, output_area, "Research Assistant", Text::from(lines));
    render_input(
        frame,
        input_area,
        &app.search.input,
        "Research (i to type)",
        "e.g., What are the latest features in ECMAScript?",
        is_editing(app, EditTarget::ToolPrompt),
    );
}

fn render_thinking(app: &mut App, frame: &mut Frame, area: Rect) {
    let (output_area, input_area) = output_and_input(area, 3);

    let pro_model = app.gateway.model(crate::gateway::Tier::Pro).to_string();
    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            format!("Deep Dive Mode ({})", pro_model),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Ideal for complex architecture, system design, or in-depth problem-solving. Responses may take longer.",
            Style::default().fg(Color::Yellow),
        )),
        Line::default(),
    ];

    match app.thinking.request.status() {
        PanelStatus::Idle => {}
        PanelStatus::Awaiting => lines.push(thinking_line(app, "AI is thinking deeply")),
        PanelStatus::Ready(text) => {
            lines.push(Line::from(Span::styled(
                "Deep Dive Result:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            lines.extend(markdown_lines(text));
        }
        PanelStatus::Failed(message) => {
            lines.push(Line::from(Span::styled(*message, Style::default().fg(Color::Red))));
        }
    }

    render_output(app, frame, output_area, "Deep Dive", Text::from(lines));
    render_input(
        frame,
        input_area,
        &app.thinking.input,
        "Question (i to type)",
        "e.g., Design a scalable microservices architecture...",
        is_editing(app, EditTarget::ToolPrompt),
    );
}
