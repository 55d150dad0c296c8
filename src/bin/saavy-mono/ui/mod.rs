//! TUI module for saavy-mono
//!
//! Parameter editing plus real-time views of the output, the amplitude
//! envelope and the filter envelope.

mod params;
mod scope;
mod spectrum;
mod status;

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use saavy_mono::{synth::voice::VoiceState, ParamId, ScopeFrame, SharedParams};

use params::render_params;
use scope::{render_scope, ScopeHistory};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats};

/// Samples kept for the scope and the FFT window
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Steps taken by PageUp/PageDown
const COARSE_STEPS: i32 = 10;

/// Facts about the session that never change while the UI runs
pub struct SessionInfo {
    pub sample_rate: f32,
    pub port_name: String,
}

/// UI application state
pub struct UiApp {
    scope_rx: Consumer<ScopeFrame>,
    params: Arc<SharedParams>,
    voice: Arc<VoiceState>,
    session: SessionInfo,
    history: ScopeHistory,
    spectrum: SpectrumAnalyzer,
    /// Row of the parameter panel being edited
    selected: usize,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        scope_rx: Consumer<ScopeFrame>,
        params: Arc<SharedParams>,
        voice: Arc<VoiceState>,
        session: SessionInfo,
    ) -> Self {
        Self {
            scope_rx,
            params,
            voice,
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, session.sample_rate),
            session,
            history: ScopeHistory::new(VIS_BUFFER_SIZE),
            selected: 0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_scope(&mut self) {
        let mut received = false;
        while let Ok(frame) = self.scope_rx.pop() {
            self.history.push(frame);
            received = true;
        }
        if received {
            self.spectrum.update(self.history.out());
        }
    }

    fn selected_param(&self) -> ParamId {
        ParamId::ALL[self.selected]
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.selected = (self.selected + ParamId::COUNT - 1) % ParamId::COUNT;
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % ParamId::COUNT;
            }
            KeyCode::Left => {
                self.params.nudge(self.selected_param(), -1);
            }
            KeyCode::Right => {
                self.params.nudge(self.selected_param(), 1);
            }
            KeyCode::PageDown => {
                self.params.nudge(self.selected_param(), -COARSE_STEPS);
            }
            KeyCode::PageUp => {
                self.params.nudge(self.selected_param(), COARSE_STEPS);
            }
            KeyCode::Char('r') => {
                let id = self.selected_param();
                self.params.set(id, id.range().default);
            }
            KeyCode::Char('R') => {
                self.params.reset();
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Status, params | scope, spectrum, help
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(13),
                Constraint::Length(10),
                Constraint::Length(1),
            ])
            .split(area);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(52), Constraint::Min(20)])
            .split(rows[1]);

        let stats = AudioStats::from_buffer(self.history.out());
        render_status(frame, rows[0], &self.session, &self.voice, &stats);
        render_params(frame, middle[0], self.params.as_ref(), self.selected);
        render_scope(frame, middle[1], &self.history);
        render_spectrum(frame, rows[2], self.spectrum.data());

        let help = Paragraph::new(
            " [↑↓] Select  [←→] Adjust  [PgUp/PgDn] Coarse  [r] Reset param  [R] Reset all  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}
