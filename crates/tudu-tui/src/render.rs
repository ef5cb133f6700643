//! Pure view/render functions for the TUI.
//!
//! This module contains all rendering logic. Functions here:
//! - Take state by immutable reference
//! - Draw to a ratatui Frame
//! - Never mutate state or return effects

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::state::{
    AppState, ListPhase, LoginField, LoginForm, RegisterField, RegisterForm, TodoListState, View,
};
use crate::text::{truncate_start_with_ellipsis, truncate_with_ellipsis};

/// Width of the auth form cards.
const AUTH_CARD_WIDTH: u16 = 60;

/// Width of the todo list card.
const TODOS_CARD_WIDTH: u16 = 64;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    match &app.view {
        View::Login(form) => render_login(frame, area, form),
        View::Register(form) => render_register(frame, area, form),
        View::Todos(list) => render_todos(frame, area, list),
    }
}

// ============================================================================
// Views
// ============================================================================

fn render_login(frame: &mut Frame, area: Rect, form: &LoginForm) {
    let card = card_area(area, AUTH_CARD_WIDTH, 10);
    let body = render_card(frame, card, "Login", Color::Cyan);

    render_field(
        frame,
        body,
        0,
        "Username",
        &form.username,
        form.focus == LoginField::Username,
        false,
    );
    render_field(
        frame,
        body,
        2,
        "Password",
        &form.password,
        form.focus == LoginField::Password,
        true,
    );
    render_form_status(frame, body, 5, form.submitting, "Signing in...", &form.error);
    render_hints(
        frame,
        body,
        &[
            ("Enter", "sign in"),
            ("Tab", "next"),
            ("Ctrl+R", "register"),
            ("Ctrl+C", "quit"),
        ],
    );
}

fn render_register(frame: &mut Frame, area: Rect, form: &RegisterForm) {
    let card = card_area(area, AUTH_CARD_WIDTH, 12);
    let body = render_card(frame, card, "Register", Color::Cyan);

    render_field(
        frame,
        body,
        0,
        "Username",
        &form.username,
        form.focus == RegisterField::Username,
        false,
    );
    render_field(
        frame,
        body,
        2,
        "Email",
        &form.email,
        form.focus == RegisterField::Email,
        false,
    );
    render_field(
        frame,
        body,
        4,
        "Password",
        &form.password,
        form.focus == RegisterField::Password,
        true,
    );
    render_form_status(
        frame,
        body,
        7,
        form.submitting,
        "Creating account...",
        &form.error,
    );
    render_hints(
        frame,
        body,
        &[
            ("Enter", "sign up"),
            ("Tab", "next"),
            ("Esc", "back to login"),
            ("Ctrl+C", "quit"),
        ],
    );
}

fn render_todos(frame: &mut Frame, area: Rect, list: &TodoListState) {
    let card = card_area(area, TODOS_CARD_WIDTH, area.height.saturating_sub(2));
    let body = render_card(frame, card, "My Todos", Color::Cyan);

    if list.phase == ListPhase::Loading {
        let line = Line::from(Span::styled(
            "Loading todos...",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(line), line_rect(body, 0));
        render_todos_hints(frame, body);
        return;
    }

    render_input_line(frame, line_rect(body, 0), &list.input, "Add a new todo...");
    render_separator(frame, line_rect(body, 1));

    if let Some(error) = &list.error {
        let line = Line::from(Span::styled(
            truncate_with_ellipsis(error, body.width as usize),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(line), line_rect(body, 2));
    }

    let list_top: u16 = 3;
    let list_height = body.height.saturating_sub(list_top + 2) as usize;
    if list.todos.is_empty() {
        let line = Line::from(Span::styled(
            "No todos yet. Add one above!",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(line), line_rect(body, list_top));
    } else {
        // Keep the selected entry inside the visible window
        let start = (list.selected + 1).saturating_sub(list_height);
        let max_title_width = body.width.saturating_sub(2) as usize;
        for (row, (index, todo)) in list
            .todos
            .iter()
            .enumerate()
            .skip(start)
            .take(list_height)
            .enumerate()
        {
            let selected = index == list.selected;
            let title = truncate_with_ellipsis(&todo.title, max_title_width);
            let line = if selected {
                Line::from(vec![
                    Span::styled("> ", Style::default().fg(Color::Cyan)),
                    Span::styled(title, Style::default().fg(Color::Cyan)),
                ])
            } else {
                Line::from(vec![Span::raw("  "), Span::raw(title)])
            };
            frame.render_widget(Paragraph::new(line), line_rect(body, list_top + row as u16));
        }
    }

    render_todos_hints(frame, body);
}

fn render_todos_hints(frame: &mut Frame, body: Rect) {
    render_hints(
        frame,
        body,
        &[
            ("Enter", "add"),
            ("↑/↓", "select"),
            ("Ctrl+D", "delete"),
            ("Ctrl+L", "logout"),
            ("Ctrl+C", "quit"),
        ],
    );
}

// ============================================================================
// Building Blocks
// ============================================================================

/// Calculates a centered card area clamped to the available space.
fn card_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Renders the card container (clears background, draws border and title)
/// and returns the inner body area.
fn render_card(frame: &mut Frame, area: Rect, title: &str, border_color: Color) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);

    Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    )
}

/// Returns the rect for a single body line, empty when out of bounds.
fn line_rect(body: Rect, y: u16) -> Rect {
    if y >= body.height {
        return Rect::new(body.x, body.y, body.width, 0);
    }
    Rect::new(body.x, body.y + y, body.width, 1)
}

/// Renders a labeled form field across two lines: label, then value.
///
/// The focused field gets a `> ` prompt and a block cursor; masked fields
/// show one bullet per character.
fn render_field(
    frame: &mut Frame,
    body: Rect,
    y: u16,
    label: &str,
    value: &str,
    focused: bool,
    masked: bool,
) {
    let label_color = if focused { Color::Cyan } else { Color::DarkGray };
    let label_line = Line::from(Span::styled(label, Style::default().fg(label_color)));
    frame.render_widget(Paragraph::new(label_line), line_rect(body, y));

    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let max_width = body.width.saturating_sub(3) as usize;
    let shown = truncate_start_with_ellipsis(&shown, max_width);

    let mut spans = Vec::new();
    if focused {
        spans.push(Span::styled("> ", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(shown));
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    } else {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(shown, Style::default().fg(Color::Gray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), line_rect(body, y + 1));
}

/// Renders the submit-progress or error line of an auth form.
fn render_form_status(
    frame: &mut Frame,
    body: Rect,
    y: u16,
    submitting: bool,
    progress_text: &str,
    error: &Option<String>,
) {
    let line = if submitting {
        Line::from(Span::styled(
            progress_text.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else if let Some(error) = error {
        Line::from(Span::styled(
            truncate_with_ellipsis(error, body.width as usize),
            Style::default().fg(Color::Red),
        ))
    } else {
        return;
    };
    frame.render_widget(Paragraph::new(line), line_rect(body, y));
}

/// Renders a prompt-style input line: "> <text>█".
fn render_input_line(frame: &mut Frame, area: Rect, value: &str, placeholder: &str) {
    let max_width = area.width.saturating_sub(3) as usize;

    let mut spans = Vec::new();
    spans.push(Span::styled("> ", Style::default().fg(Color::DarkGray)));
    if value.is_empty() {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            truncate_with_ellipsis(placeholder, max_width),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(truncate_start_with_ellipsis(value, max_width)));
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders a separator line.
fn render_separator(frame: &mut Frame, area: Rect) {
    let separator = "─".repeat(area.width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}

/// Renders a line of keyboard hints at the bottom of the card body.
fn render_hints(frame: &mut Frame, body: Rect, hints: &[(&str, &str)]) {
    let hints_area = line_rect(body, body.height.saturating_sub(1));

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(para, hints_area);
}
