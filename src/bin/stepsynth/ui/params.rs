//! Parameter list.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use stepsynth::{ParamId, SignalGraphParams};

/// Fill of a parameter's range as a 10-cell bar.
fn bar(id: ParamId, value: f32) -> String {
    let (min, max) = id.range();
    let filled = (((value - min) / (max - min)) * 10.0).round().clamp(0.0, 10.0) as usize;
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(10 - filled))
}

pub fn render_params(frame: &mut Frame, area: Rect, params: &SignalGraphParams, cursor: usize) {
    let mut lines = vec![
        Line::from(format!(
            " osc1 {:<8} osc2 {:<8} {}",
            params.waveform1.name(),
            params.waveform2.name(),
            if params.second_oscillator { "on" } else { "off" },
        )),
        Line::from(""),
    ];

    lines.extend(ParamId::ALL.iter().enumerate().map(|(index, &id)| {
        let value = params.get(id);
        let text = format!(" {:<13} {:>7.2} {}", id.name(), value, bar(id, value));
        if index == cursor {
            Line::styled(text, Style::default().fg(Color::Black).bg(Color::Yellow))
        } else {
            Line::from(text)
        }
    }));

    let widget =
        Paragraph::new(lines).block(Block::default().title(" Patch ").borders(Borders::ALL));
    frame.render_widget(widget, area);
}
