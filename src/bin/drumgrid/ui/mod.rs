//! TUI module for drumgrid
//!
//! Draws the step grid, transport bar and prompts from the app state.

mod grid;
mod prompt;
mod transport;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};

use super::app::{App, Mode};

use grid::render_grid;
use prompt::{render_load_list, render_name_prompt};
use transport::{render_transport, AudioStats};

const HELP: &str = " [P] Play/Stop  [Space] Toggle  [+/-] Tempo  [[/]] Master  [,/.] Track vol  \
[T] Preview  [K] Kit  [C] Clear  [R] Random  [S] Save  [L] Load  [Q] Quit";

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Transport bar
            Constraint::Min(11),    // Grid
            Constraint::Length(5),  // Level history
            Constraint::Length(1),  // Status line
            Constraint::Length(1),  // Help bar
        ])
        .split(area);

    let stats = AudioStats::from_buffer(&app.audio_buffer);
    render_transport(frame, chunks[0], &app.machine, &stats);

    let grid_block = Block::default()
        .title(" Pattern ")
        .borders(Borders::ALL);
    let grid_inner = grid_block.inner(chunks[1]);
    frame.render_widget(grid_block, chunks[1]);
    render_grid(frame, grid_inner, app);

    let history_width = chunks[2].width.saturating_sub(2) as usize;
    let start = app.level_history.len().saturating_sub(history_width);
    let sparkline = Sparkline::default()
        .block(Block::default().title(" Output ").borders(Borders::ALL))
        .data(&app.level_history[start..])
        .max(100)
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(sparkline, chunks[2]);

    let status = Paragraph::new(format!(" {}", app.machine.observer().status))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(status, chunks[3]);

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);

    match &app.mode {
        Mode::Grid => {}
        Mode::Naming(name) => render_name_prompt(frame, area, name),
        Mode::Loading { entries, selected } => render_load_list(frame, area, entries, *selected),
    }
}
