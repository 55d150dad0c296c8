//! Status bar - held note, its pitch and gain, device facts, output levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_mono::synth::voice::VoiceState;

use super::SessionInfo;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Output level statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Scientific pitch name, e.g. 69 -> "A4"
fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

/// Render the status bar
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    session: &SessionInfo,
    voice: &VoiceState,
    stats: &AudioStats,
) {
    let block = Block::default().title(" saavy-mono ").borders(Borders::ALL);

    let note_span = match voice.note() {
        Some(note) => Span::styled(
            format!(
                " ● {:<4} {:>7.1} Hz  gain {:.2}  ",
                note_name(note),
                voice.centre_frequency(),
                voice.amplitude()
            ),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled(
            " ○ no note held                    ",
            Style::default().fg(Color::Yellow),
        ),
    };

    let line = Line::from(vec![
        note_span,
        Span::styled(
            format!("{}  ", session.port_name),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", session.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
