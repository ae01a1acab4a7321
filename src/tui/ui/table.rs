use crate::cards::{Card, Rank};
use crate::game::Phase;
use crate::seat::SeatStatus;
use crate::tui::app::AppState;
use crate::view::{CardView, PublicState, SeatView};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, columns, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState, view: &PublicState) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(5), // board
            Constraint::Min(8),    // seats
            Constraint::Length(5), // status bar
        ])
        .split(size);

    let header_lines = vec![
        Line::from(format!(
            "Hand #{}   {}   Pot: ${}",
            view.hand_id,
            view.phase.label(),
            view.pot_total
        )),
        Line::from(format!("Bet: {}   MinRaise: {}", view.highest_bet, view.min_raise_to)),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("holdem-trio").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let board_block =
        Block::default().title(format!("Board: {}", view.phase)).borders(Borders::ALL);
    f.render_widget(board_block, chunks[1]);
    let new_from = match view.phase {
        Phase::PostflopBetting => 0,
        Phase::PostturnBetting => 3,
        Phase::PostriverBetting => 4,
        _ => 5,
    };
    for (i, area) in columns(inner(chunks[1]), 5).into_iter().enumerate() {
        let border = (i >= new_from && i < view.community.len()).then_some(Color::Yellow);
        render_card_widget(f, area, view.community.get(i).copied().map(CardView::FaceUp), border);
    }

    let seat_areas = columns(inner(chunks[2]), view.seats.len() as u16);
    f.render_widget(Block::default().borders(Borders::ALL).title("Seats"), chunks[2]);
    for (seat, area) in view.seats.iter().zip(seat_areas) {
        render_seat(f, area, app, view, seat);
    }

    draw_status(f, chunks[3], app, view);

    if app.help_open() {
        draw_help(f);
    } else if app.history_open() {
        draw_history(f, app, view);
    } else if app.amount_entry_active() {
        draw_amount_entry(f, app, view);
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState, view: &PublicState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner(area));

    let mut left = vec![Line::from(view.message)];
    if let Some(winner) = &view.winner {
        let names: Vec<&str> = winner.seats().iter().map(|s| s.name()).collect();
        let won: u64 = view.payouts.iter().map(|(_, n)| n).sum();
        left.push(Line::from(Span::styled(
            format!("{} won ${won}. Press Space for a new hand.", names.join(" & ")),
            Style::default().fg(Color::Green),
        )));
    } else if let Some(seat) = view.to_act {
        let provider = app.session.provider_name(seat).filter(|_| !seat.is_human());
        let waiting = match provider {
            Some(name) => format!("Waiting for {seat} ({name})..."),
            None => format!("{seat} to act"),
        };
        left.push(Line::from(waiting));
    }
    if let Some(err) = app.halted() {
        left.push(Line::from(Span::styled(
            format!("Engine halted: {err}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    } else if let Some(notice) = app.notice() {
        left.push(Line::from(Span::styled(notice.to_string(), Style::default().fg(Color::Red))));
    }

    let user_turn = view.to_act.is_some_and(|s| s.is_human());
    let action_style = |enabled: bool| {
        if enabled {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };
    let to_call = view.seats.iter().find(|s| s.is_human).map(|s| s.to_call).unwrap_or(0);
    let call_label = if to_call == 0 { "C check".to_string() } else { format!("C call {to_call}") };
    let right = vec![
        Line::from(vec![
            Span::styled("F fold", action_style(user_turn)),
            Span::raw(" • "),
            Span::styled(call_label, action_style(user_turn)),
            Span::raw(" • "),
            Span::styled("R raise", action_style(user_turn)),
        ]),
        Line::from("Space deal • H history • ? help • Q quit"),
    ];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}

fn render_seat(f: &mut Frame, area: Rect, app: &AppState, view: &PublicState, seat: &SeatView) {
    let mut title = seat.name.to_string();
    if let Some(name) = app.session.provider_name(seat.id).filter(|_| !seat.is_human) {
        if name != seat.name {
            title.push_str(&format!(" [{name}]"));
        }
    }
    if seat.status == SeatStatus::AllIn {
        title.push_str(" [ALL-IN]");
    }
    if view.to_act == Some(seat.id) {
        title.push_str(" [Act]");
    }

    let winner = view.winner.as_ref().is_some_and(|w| w.seats().contains(&seat.id));
    let border = if winner {
        Color::Green
    } else if seat.status == SeatStatus::Folded {
        Color::DarkGray
    } else if seat.status == SeatStatus::AllIn {
        Color::LightRed
    } else if view.to_act == Some(seat.id) {
        Color::Yellow
    } else if seat.is_human {
        Color::Cyan
    } else {
        Color::Reset
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(block, area);

    let status = match seat.status {
        SeatStatus::Active => "Active",
        SeatStatus::Folded => "Folded",
        SeatStatus::AllIn => "All-in",
    };
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut lines = vec![
        Line::from(format!("Chips: ${}", seat.chips)),
        Line::from(format!("Bet: {}", seat.current_bet)),
        Line::from(format!("Status: {status}")),
    ];
    match view.shown.iter().find(|s| s.seat == seat.id) {
        Some(shown) => lines.push(Line::from(shown.category.name())),
        None => lines.push(Line::from(Span::styled("--", dim))),
    }
    if let Some(paid) = view.payouts.iter().find(|(s, _)| *s == seat.id).map(|(_, n)| n) {
        lines.push(Line::from(Span::styled(
            format!("Won ${paid}"),
            Style::default().fg(Color::Green),
        )));
    }

    let seat_inner = inner(area);
    let mut text_area = seat_inner;
    if let Some(hole) = seat.hole {
        if seat_inner.height > 3 {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(3)])
                .split(seat_inner);
            text_area = split[0];
            let color = if seat.is_human { Color::Cyan } else { Color::Gray };
            for (card, slot) in hole.into_iter().zip(columns(split[1], 2)) {
                render_card_widget(f, slot, Some(card), Some(color));
            }
        }
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text_area);
}

fn draw_history(f: &mut Frame, app: &AppState, view: &PublicState) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("History").borders(Borders::ALL);
    let end = view.history.len().saturating_sub(app.history_offset());
    let start = end.saturating_sub(AppState::HISTORY_PAGE_SIZE);
    let entries = &view.history[start..end];
    let mut lines: Vec<Line> = Vec::new();
    if entries.is_empty() {
        lines.push(Line::from("No history yet."));
    } else {
        for entry in entries {
            let amount = entry.amount.map(|v| format!(" {v}")).unwrap_or_default();
            lines.push(Line::from(format!(
                "{} {}{} [{}]",
                entry.seat,
                entry.verb.label(),
                amount,
                entry.phase
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll • Close: H or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- Space: deal a new hand"),
        Line::from("- F: fold"),
        Line::from("- C: check / call"),
        Line::from("- R: raise (opens amount entry)"),
        Line::from("- H: history"),
        Line::from("- Q / Esc: quit"),
        Line::from(""),
        Line::from(Span::styled("Amount Entry:", bold)),
        Line::from("- 0-9: edit the raise-to total"),
        Line::from("- Backspace: delete digit"),
        Line::from("- + / -: adjust by one big blind"),
        Line::from("- Enter: submit"),
        Line::from("- Esc: cancel"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_amount_entry(f: &mut Frame, app: &AppState, view: &PublicState) {
    let area = centered_rect(50, 30, f.area());
    let current = app.amount_entry_text().unwrap_or("");
    let lines = vec![
        Line::from(format!("Raise to: {current}")),
        Line::from(format!("Min: {}", view.min_raise_to)),
        Line::from("Digits to edit, Backspace to delete"),
        Line::from("+/- in BB steps, Enter submit, Esc cancel"),
    ];
    let block = Block::default().title("Raise Amount").borders(Borders::ALL);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner(area));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[0]);
    let error = app.amount_entry_error().unwrap_or("");
    let error_line = Line::from(Span::styled(error, Style::default().fg(Color::Red)));
    f.render_widget(Paragraph::new(error_line).alignment(Alignment::Center), chunks[1]);
}

fn card_span(c: Card) -> Span<'static> {
    let color = if c.suit().is_red() { Color::Red } else { Color::White };
    let rank = match c.rank() {
        Rank::Ten => "10".to_string(),
        r => r.to_string(),
    };
    Span::styled(format!("{rank}{}", c.suit().glyph()), Style::default().fg(color))
}

fn render_card_widget(f: &mut Frame, area: Rect, card: Option<CardView>, border: Option<Color>) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    f.render_widget(block, area);
    let content = match card {
        Some(CardView::FaceUp(c)) => Line::from(card_span(c)),
        Some(CardView::FaceDown) => {
            Line::from(Span::styled("▒▒", Style::default().fg(Color::Blue)))
        }
        None => Line::from("[  ]"),
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner(area));
}
