//! Screen layout.

mod grid;
mod params;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::app::App;
use super::keys::HELP;

use grid::{render_drum_grid, render_step_grid};
use params::render_params;
use waveform::render_waveform;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status line
            Constraint::Length(5), // Step sequencer
            Constraint::Length(6), // Drum grid
            Constraint::Min(8),    // Params + waveform
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    render_status(frame, rows[0], app);
    render_step_grid(frame, rows[1], app.engine());
    render_drum_grid(frame, rows[2], app.engine(), app.drum_cursor());

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(20)])
        .split(rows[3]);
    render_params(frame, lower[0], app.engine().params(), app.param_cursor());
    render_waveform(frame, lower[1], app.scope());

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[4]);
}

fn render_status(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let engine = app.engine();
    let held: Vec<String> = engine
        .held_voices()
        .iter()
        .map(|voice| format!("{}{}", voice.note, voice.octave))
        .collect();

    let mut spans = vec![
        Span::styled(" stepsynth ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" oct {} ", app.octave())),
        Span::raw(format!(" held [{}] ", held.join(" "))),
    ];
    if engine.is_capturing() {
        spans.push(Span::styled(
            " \u{25cf} REC ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        format!(" {}", app.status()),
        Style::default().fg(Color::Yellow),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
