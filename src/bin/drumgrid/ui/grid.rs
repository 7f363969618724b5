//! Grid widget - one row per track, one cell per step, with playhead

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use drumgrid::STEPS;

use super::super::app::App;

const LABEL_WIDTH: usize = 9;
const VOLUME_WIDTH: usize = 6;

pub fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    if area.height < 2 || area.width < 20 {
        return;
    }

    let playhead = app.machine.observer().current_step;
    let pattern = app.machine.pattern();
    let mut lines = Vec::new();

    // Step numbers, grouped by beat
    let mut header = " ".repeat(LABEL_WIDTH + VOLUME_WIDTH);
    for step in 0..STEPS {
        if step > 0 && step % 4 == 0 {
            header.push(' ');
        }
        header.push_str(&format!("{:<3}", step + 1));
    }
    lines.push(Line::from(Span::styled(
        header,
        Style::default().fg(Color::DarkGray),
    )));

    for (row, track) in app.machine.tracks().iter().enumerate() {
        let mut spans = Vec::new();

        let label_style = if row == app.cursor_track {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(
            format!("{:<width$.width$}", track.name(), width = LABEL_WIDTH),
            label_style,
        ));
        spans.push(Span::styled(
            format!("{:>3}%  ", track.volume_percent()),
            Style::default().fg(Color::DarkGray),
        ));

        let steps = pattern.steps(track.name()).copied().unwrap_or([false; STEPS]);
        for (step, &active) in steps.iter().enumerate() {
            if step > 0 && step % 4 == 0 {
                spans.push(Span::raw(" "));
            }

            let symbol = if active { "■  " } else { "·  " };
            let mut style = match (active, playhead == Some(step)) {
                (true, true) => Style::default().fg(Color::LightYellow),
                (true, false) => Style::default().fg(Color::Cyan),
                (false, true) => Style::default().fg(Color::Yellow),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            if row == app.cursor_track && step == app.cursor_step {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(symbol, style));
        }

        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
