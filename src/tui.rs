// src/tui.rs

use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use textwrap::wrap;
use tokio::sync::Mutex;
use unicode_width::UnicodeWidthStr;

use crate::api::HttpChatApi;
use crate::dom::{Dom, PageDom};
use crate::message::{Message, Sender};
use crate::widget::{submit_message, ChatWidget, Visibility};

type HostWidget = ChatWidget<PageDom, HttpChatApi>;

/// Runs the terminal host embedding the widget.
pub async fn run_ui(widget: Arc<Mutex<HostWidget>>) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, widget).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    widget: Arc<Mutex<HostWidget>>,
) -> Result<(), Box<dyn Error>> {
    loop {
        {
            let guard = widget.lock().await;
            terminal.draw(|f| draw(f, &guard))?;
        }

        // Redraw on a timeout so replies arriving from spawned submits show
        // up without a keypress.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(key, &widget).await {
                    return Ok(());
                }
            }
        }
    }
}

/// Handles one key event. Returns true when the host should quit.
async fn handle_key(key: KeyEvent, widget: &Arc<Mutex<HostWidget>>) -> bool {
    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut guard = widget.lock().await;
            let toggle = guard.toggle_node();
            guard.on_click(toggle);
        }
        KeyCode::Enter => {
            let guard = widget.lock().await;
            if guard.visibility() == Visibility::Expanded {
                drop(guard);
                // The form's submit handler; detached so a slow reply never
                // blocks the event loop.
                tokio::spawn(submit_message(widget.clone()));
            }
        }
        KeyCode::Backspace => {
            let mut guard = widget.lock().await;
            if guard.visibility() == Visibility::Expanded {
                let input = guard.input_node();
                let mut value = guard.input_value();
                value.pop();
                guard.dom_mut().set_value(input, &value);
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut guard = widget.lock().await;
            if guard.visibility() == Visibility::Expanded {
                let input = guard.input_node();
                let mut value = guard.input_value();
                value.push(c);
                guard.dom_mut().set_value(input, &value);
            }
        }
        _ => {}
    }
    false
}

fn draw(f: &mut Frame, widget: &HostWidget) {
    let area = f.area();
    match widget.visibility() {
        Visibility::Minimized => draw_minimized(f, area, widget),
        Visibility::Expanded => draw_expanded(f, area, widget),
    }
}

fn draw_minimized(f: &mut Frame, area: Rect, widget: &HostWidget) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(area);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            " Chat ",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("[{}] Ctrl+T to expand", widget.toggle_glyph()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(bar, chunks[1]);
}

fn draw_expanded(f: &mut Frame, area: Rect, widget: &HostWidget) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Chat {} ", widget.toggle_glyph()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)].as_ref())
        .split(inner);

    draw_messages(f, widget, chunks[0]);
    draw_input(f, widget, chunks[1]);
}

fn draw_messages(f: &mut Frame, widget: &HostWidget, area: Rect) {
    let dom = widget.dom();
    let mut lines: Vec<Line<'static>> = Vec::new();

    for (node, message) in widget.transcript_nodes() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(message_lines(&message, dom.created_at(node), area.width));
    }

    // Pinned to the newest message, like the scrollable list it models
    let total_lines = lines.len() as u16;
    let scroll = total_lines.saturating_sub(area.height);

    let msgs_para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(msgs_para.scroll((scroll, 0)), area);
}

fn message_lines(message: &Message, stamp: DateTime<Local>, width: u16) -> Vec<Line<'static>> {
    let style = match message.sender {
        Sender::User => Style::default().fg(Color::Rgb(255, 223, 128)),
        Sender::Bot => Style::default().fg(Color::Rgb(144, 238, 144)),
    };
    let indent = if message.sender == Sender::User { "  " } else { "" };

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("┌─".to_string(), style),
        Span::styled(
            stamp.format("%H:%M").to_string(),
            style.add_modifier(Modifier::DIM),
        ),
        Span::styled(" ".to_string(), style),
        Span::styled(
            message.sender.label().to_string(),
            style.add_modifier(Modifier::BOLD),
        ),
    ]));

    let wrap_width = (width as usize).saturating_sub(4).max(1);
    for wrapped_line in wrap(&message.text, wrap_width) {
        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled("│ ".to_string(), style),
            Span::styled(wrapped_line.to_string(), style),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("╰─".to_string(), style),
    ]));

    lines
}

fn draw_input(f: &mut Frame, widget: &HostWidget, area: Rect) {
    let separator = "─".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );

    let value = widget.input_value();
    let input = Line::from(vec![
        Span::styled("→ ", Style::default().fg(Color::DarkGray)),
        Span::styled(value.clone(), Style::default().fg(Color::White)),
    ]);

    let visible_width = area.width.saturating_sub(2);
    let text_width = value.width() as u16;
    let scroll_offset = text_width.saturating_sub(visible_width);

    f.render_widget(
        Paragraph::new(input).scroll((0, scroll_offset)),
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(1),
        },
    );

    let cursor_x = (area.x + 2 + text_width.saturating_sub(scroll_offset))
        .min(area.right().saturating_sub(1));
    f.set_cursor_position((cursor_x, area.y + 1));
}
