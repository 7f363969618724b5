//! Transport bar widget - shows play state, step, BPM, kit and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use drumgrid::output::AudioSink;

use super::super::app::Machine;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_transport(frame: &mut Frame, area: Rect, machine: &Machine, audio_stats: &AudioStats) {
    let block = Block::default()
        .title(" drumgrid ")
        .borders(Borders::ALL);

    let playing = machine.is_running();
    let play_symbol = if playing { "▶" } else { "■" };
    let play_state_str = if playing { "Playing" } else { "Stopped" };

    // 1-based, blank while stopped
    let step = match machine.observer().current_step {
        Some(step) => format!("Step: {:>2}", step + 1),
        None => "Step:  -".to_string(),
    };

    let output = match machine.sink().sample_rate() {
        Some(rate) if machine.is_audio_available() => format!("{:.1}kHz  ", rate / 1000.0),
        _ => "no audio  ".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", play_symbol, play_state_str),
            Style::default().fg(if playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(format!("{}  ", step), Style::default().fg(Color::White)),
        Span::styled(
            format!("BPM: {}  ", machine.tempo()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Kit: {}  ", machine.kit()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Vol: {:.0}%  ", machine.master_gain() * 100.0),
            Style::default().fg(Color::White),
        ),
        Span::styled(output, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
