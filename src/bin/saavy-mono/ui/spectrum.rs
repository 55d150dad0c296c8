//! Spectrum of the synth output
//!
//! Hann-windowed FFT read out at log-spaced frequencies, so the low end
//! where the fundamentals live gets as much room as the top octaves.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Points drawn across the spectrum
const SPECTRUM_BINS: usize = 48;
const LOWEST_HZ: f32 = 20.0;
const HIGHEST_HZ: f32 = 20_000.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin read for each display point
    bin_indices: Vec<usize>,
    /// (log10 frequency, magnitude dB) per display point
    points: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `len` is the FFT size and must match the buffers passed to `update`
    pub fn new(len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(len);

        let denom = len.saturating_sub(1).max(1) as f32;
        let window = (0..len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let highest = (sample_rate / 2.0).min(HIGHEST_HZ).max(LOWEST_HZ);
        let last_bin = (len / 2).saturating_sub(1);
        let (bin_indices, points): (Vec<usize>, Vec<(f64, f64)>) = (0..SPECTRUM_BINS)
            .map(|i| {
                let t = i as f32 / (SPECTRUM_BINS - 1) as f32;
                let freq = LOWEST_HZ * (highest / LOWEST_HZ).powf(t);
                let index = ((freq * len as f32 / sample_rate).round() as usize).min(last_bin);
                (index, ((freq as f64).log10(), FLOOR_DB))
            })
            .unzip();

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); len],
            bin_indices,
            points,
        }
    }

    /// Recompute from the newest window of output samples
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for ((_, db), &index) in self.points.iter_mut().zip(&self.bin_indices) {
            let power = self.scratch[index].norm_sqr().max(1e-12);
            *db = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }
}

/// Render the spectrum; the x axis is log10(Hz)
pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let min_x = points.first().map_or(1.0, |p| p.0);
    let max_x = points.last().map_or(4.0, |p| p.0).max(min_x + 0.1);
    let max_db = points.iter().map(|p| p.1).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
