//! Parameter panel - one gauge row per control

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_mono::{ControlSurface, ParamId};

/// Width of the bar drawn after each value
const BAR_WIDTH: usize = 10;

/// Render every parameter with its value and a bar showing where it sits
/// in its range
pub fn render_params<C: ControlSurface + ?Sized>(
    frame: &mut Frame,
    area: Rect,
    surface: &C,
    selected: usize,
) {
    let block = Block::default().title(" Parameters ").borders(Borders::ALL);

    let lines: Vec<Line> = ParamId::ALL
        .iter()
        .enumerate()
        .map(|(row, &id)| param_line(id, surface.value(id), row == selected))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn param_line(id: ParamId, value: f32, selected: bool) -> Line<'static> {
    let filled = (id.range().normalize(value) * BAR_WIDTH as f32).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)));

    let name_style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(format!("{:<23}", id.name()), name_style),
        Span::styled(
            format!(" {:>8} {:<3} ", format_value(value), id.unit()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(bar, Style::default().fg(Color::DarkGray)),
    ])
}

fn format_value(value: f32) -> String {
    if value >= 100.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.3}")
    }
}
