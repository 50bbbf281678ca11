//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use notekeep_core::{Note, MAX_PRIORITY, MIN_PRIORITY};

use super::app::{App, FormField, FormState, Screen};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    match &app.screen {
        Screen::List => draw_list(frame, app, chunks[0]),
        Screen::Form(state) => draw_form(frame, state, chunks[0]),
    }

    draw_status_bar(frame, app, chunks[1]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the note list
fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let max_len = area.width.saturating_sub(10) as usize;

    let items: Vec<ListItem> = app
        .adapter
        .rows()
        .iter()
        .map(|note| note_item(note, max_len, app.adapter.is_highlighted(note)))
        .collect();

    let block = Block::default()
        .title(format!(" Notes ({}) ", app.adapter.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    if items.is_empty() {
        let empty = Paragraph::new("No notes. Press 'a' to add one.")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = ListState::default();
    state.select(app.adapter.selected());

    frame.render_stateful_widget(list, area, &mut state);
}

/// Two-line row: priority and title, then the first line of the description
fn note_item(note: &Note, max_len: usize, highlighted: bool) -> ListItem<'static> {
    let title_style = if highlighted {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let title = Line::from(vec![
        Span::styled(
            format!("{:>2} ", note.priority),
            Style::default().fg(priority_color(note.priority)),
        ),
        Span::styled(truncate(&note.title, max_len), title_style),
    ]);

    let description = Line::from(vec![
        Span::raw("   "),
        Span::styled(
            truncate(note.description.lines().next().unwrap_or(""), max_len),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    ListItem::new(vec![title, description])
}

fn priority_color(priority: i32) -> Color {
    match priority {
        p if p >= 8 => Color::Red,
        p if p >= 4 => Color::Yellow,
        _ => Color::Green,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Draw the add/edit form
fn draw_form(frame: &mut Frame, state: &FormState, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", state.form.title_label()))
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(inner);

    let title = Paragraph::new(state.form.title.as_str())
        .block(field_block("Title", state.field == FormField::Title));
    frame.render_widget(title, chunks[0]);

    let description = Paragraph::new(state.form.description.as_str())
        .wrap(Wrap { trim: false })
        .block(field_block(
            "Description",
            state.field == FormField::Description,
        ));
    frame.render_widget(description, chunks[1]);

    let priority = state.form.priority();
    let picker = Line::from(vec![
        Span::styled(
            "◀ ",
            dim_unless(priority > MIN_PRIORITY),
        ),
        Span::styled(
            priority.to_string(),
            Style::default()
                .fg(priority_color(priority))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", dim_unless(priority < MAX_PRIORITY)),
    ]);
    let picker = Paragraph::new(picker).block(field_block(
        "Priority",
        state.field == FormField::Priority,
    ));
    frame.render_widget(picker, chunks[2]);

    // Single-line cursor for the title field
    if state.field == FormField::Title {
        let x = chunks[0].x + 1 + state.cursor as u16;
        if x < chunks[0].right().saturating_sub(1) {
            frame.set_cursor_position((x, chunks[0].y + 1));
        }
    }
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(style)
}

fn dim_unless(active: bool) -> Style {
    if active {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    }
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else if app.in_flight > 0 {
        "Saving...".to_string()
    } else if app.is_list_screen() {
        "a:add  enter:edit  d:delete  D:delete all  ?:help  q:quit".to_string()
    } else {
        "tab:next field  ←/→:priority  enter:save  esc:cancel".to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 20.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("List:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  gg          Jump to first note"),
        Line::from("  G           Jump to last note"),
        Line::from("  Enter       Edit note"),
        Line::from("  a           Add note"),
        Line::from("  d           Delete note"),
        Line::from("  D           Delete all notes"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from("Form:"),
        Line::from("  Tab         Next field"),
        Line::from("  ←/→, -/+    Change priority"),
        Line::from("  Enter       Save"),
        Line::from("  Esc         Cancel"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}
