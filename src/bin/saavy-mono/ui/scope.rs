//! Three-trace oscilloscope: output, amplitude envelope, filter envelope

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use saavy_mono::ScopeFrame;

/// Rolling window of the most recent telemetry frames, one trace per field
pub struct ScopeHistory {
    len: usize,
    out: Vec<f32>,
    amplitude: Vec<f32>,
    filter_control: Vec<f32>,
}

impl ScopeHistory {
    /// Start with `len` samples of silence so every view is always full
    pub fn new(len: usize) -> Self {
        Self {
            len,
            out: vec![0.0; len],
            amplitude: vec![0.0; len],
            filter_control: vec![0.0; len],
        }
    }

    pub fn push(&mut self, frame: ScopeFrame) {
        self.out.push(frame.out);
        self.amplitude.push(frame.amplitude);
        self.filter_control.push(frame.filter_control);

        // Trim in bulk once the backlog doubles the window
        if self.out.len() >= 2 * self.len {
            let excess = self.out.len() - self.len;
            self.out.drain(..excess);
            self.amplitude.drain(..excess);
            self.filter_control.drain(..excess);
        }
    }

    pub fn out(&self) -> &[f32] {
        Self::window(&self.out, self.len)
    }

    pub fn amplitude(&self) -> &[f32] {
        Self::window(&self.amplitude, self.len)
    }

    pub fn filter_control(&self) -> &[f32] {
        Self::window(&self.filter_control, self.len)
    }

    fn window(trace: &[f32], len: usize) -> &[f32] {
        &trace[trace.len() - len..]
    }
}

fn trace_points(trace: &[f32]) -> Vec<(f64, f64)> {
    trace
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / trace.len() as f64, sample as f64))
        .collect()
}

/// Render the oscilloscope
pub fn render_scope(frame: &mut Frame, area: Rect, history: &ScopeHistory) {
    let block = Block::default()
        .title(" Scope: output / amp env / filter env ")
        .borders(Borders::ALL);

    let out = trace_points(history.out());
    let amplitude = trace_points(history.amplitude());
    let filter_control = trace_points(history.filter_control());

    let datasets = vec![
        Dataset::default()
            .name("out")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&out),
        Dataset::default()
            .name("amp")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightGreen))
            .data(&amplitude),
        Dataset::default()
            .name("filter")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightMagenta))
            .data(&filter_control),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
