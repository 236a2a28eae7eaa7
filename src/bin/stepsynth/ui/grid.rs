//! Step and drum grids.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use stepsynth::sequencing::StepSlot;
use stepsynth::AudioEngine;

const CELL_WIDTH: usize = 6;

fn cell_style(is_current: bool, is_marked: bool) -> Style {
    let mut style = Style::default();
    if is_current {
        style = style.bg(Color::Cyan).fg(Color::Black);
    }
    if is_marked {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

pub fn render_step_grid(frame: &mut Frame, area: Rect, engine: &AudioEngine) {
    let seq = engine.step_sequencer();
    let title = format!(
        " Sequencer {} {:.0} BPM {}",
        if seq.is_running() { "\u{25b6}" } else { "\u{25a0}" },
        seq.tempo(),
        if seq.write_enabled() { "[WRITE] " } else { "" },
    );

    let cells: Vec<Span> = seq
        .slots()
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let label = match slot {
                StepSlot::Rest => String::from("  -  "),
                StepSlot::Note(step) => format!("{:>3}{:<2}", step.note.to_string(), step.octave),
            };
            let style = cell_style(
                seq.is_running() && index == seq.current_step(),
                seq.selected() == Some(index),
            );
            Span::styled(format!("{label:^width$}", width = CELL_WIDTH), style)
        })
        .collect();

    let numbers: String = (1..=cells.len())
        .map(|n| format!("{n:^width$}", width = CELL_WIDTH))
        .collect();

    let text = vec![
        Line::from(Span::styled(numbers, Style::default().fg(Color::DarkGray))),
        Line::from(cells),
    ];
    let widget = Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

pub fn render_drum_grid(
    frame: &mut Frame,
    area: Rect,
    engine: &AudioEngine,
    cursor: (usize, usize),
) {
    let drums = engine.drum_sequencer();
    let title = format!(
        " Drums {} {:.0} BPM ",
        if drums.is_running() { "\u{25b6}" } else { "\u{25a0}" },
        drums.tempo(),
    );

    let lines: Vec<Line> = drums
        .pattern()
        .rows()
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let mut spans = vec![Span::raw(format!("{:<7}", row.name))];
            spans.extend(row.cells.iter().enumerate().map(|(step, &on)| {
                let glyph = if on { "\u{25a0}" } else { "\u{00b7}" };
                let style = cell_style(
                    drums.is_running() && step == drums.current_step(),
                    cursor == (row_index, step),
                );
                Span::styled(format!("{glyph:^width$}", width = CELL_WIDTH - 2), style)
            }));
            Line::from(spans)
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}
