// Copyright 2026 PosPrint Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frame rendering.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use super::tui::ViewState;
use crate::state::{AppState, Notice, NoticeKind};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(f: &mut Frame, state: &AppState, view: &mut ViewState) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(f.area());

    draw_header(f, chunks[0], state);
    draw_actions(f, chunks[1], state);
    draw_body(f, chunks[2], state, view);
    draw_footer(f, chunks[3]);

    if let Some(notice) = state.notice() {
        draw_notice(f, &notice);
    }
}

fn status_text(state: &AppState) -> String {
    if let Some(address) = state.connected() {
        format!("Connected to {address}")
    } else if state.is_searching() {
        "Searching...".to_string()
    } else if state.is_initialized() {
        "Bluetooth ready".to_string()
    } else {
        "Bluetooth not initialized".to_string()
    }
}

fn draw_header(f: &mut Frame, area: Rect, state: &AppState) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "PosPrint",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  —  "),
        Span::raw(status_text(state)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn action_span(label: &str, enabled: bool, busy: bool) -> Span<'_> {
    let style = if enabled && !busy {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(label, style)
}

fn draw_actions(f: &mut Frame, area: Rect, state: &AppState) {
    let busy = state.is_busy();
    let actions = Paragraph::new(Line::from(vec![
        action_span("[i] Initialize Bluetooth", true, busy),
        Span::raw("   "),
        action_span("[s] Search for Devices", state.is_initialized(), busy),
        Span::raw("   "),
        action_span("[p] Print", state.connected().is_some(), busy),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Actions"));
    f.render_widget(actions, area);
}

fn draw_body(f: &mut Frame, area: Rect, state: &AppState, view: &mut ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Devices");

    if state.is_searching() {
        let spinner = SPINNER_FRAMES[view.tick % SPINNER_FRAMES.len()];
        let progress = Paragraph::new(format!("{spinner} Searching for devices..."))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(progress, area);
        return;
    }

    let named = state.named_devices();
    if named.is_empty() {
        view.list_state.select(None);
        let empty = Paragraph::new("No devices. Press [s] to search.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    // Keep the cursor inside the list as results change.
    let selected = view.list_state.selected().unwrap_or(0).min(named.len() - 1);
    view.list_state.select(Some(selected));

    let connected = state.connected();
    let items: Vec<ListItem> = named
        .iter()
        .map(|device| {
            let marker = if connected.as_deref() == Some(device.address.as_str()) {
                "● "
            } else {
                "  "
            };
            let name = device.name.clone().unwrap_or_default();
            ListItem::new(format!("{marker}Connect to {name}  ({})", device.address))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut view.list_state);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new("↑/↓ select · Enter connect · q quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn draw_notice(f: &mut Frame, notice: &Notice) {
    let area = centered_rect(50, 30, f.area());
    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };

    let text = Text::from(vec![
        Line::raw(notice.body.clone()),
        Line::raw(""),
        Line::styled(
            "press any key to dismiss",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(notice.title.clone())
                .border_style(Style::default().fg(color)),
        );

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1]);
    horizontal[1]
}
