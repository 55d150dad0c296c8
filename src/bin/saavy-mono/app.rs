//! saavy-mono - audio/MIDI wiring and the UI session

use std::sync::Arc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info};

use saavy_mono::{
    io::input::MidiConnection, EngineConfig, MonoSynth, ScopeFrame, SharedParams, MAX_BLOCK_SIZE,
};

use super::ui::{SessionInfo, UiApp, VIS_BUFFER_SIZE};

/// Capacity in visualisation windows for the audio → UI scope ring
const SCOPE_RING_WINDOWS: usize = 16;

/// Application builder
pub struct MonoApp {
    port: Option<String>,
    midi_channel: Option<u8>,
}

impl MonoApp {
    pub fn new() -> Self {
        Self {
            port: None,
            midi_channel: None,
        }
    }

    /// Substring of the MIDI input port to connect (first port when unset)
    pub fn port(mut self, port: Option<String>) -> Self {
        self.port = port;
        self
    }

    /// Zero-based MIDI channel filter
    pub fn midi_channel(mut self, channel: Option<u8>) -> Self {
        self.midi_channel = channel;
        self
    }

    /// Open audio and MIDI, then hand the terminal to the UI until it quits
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let synth = MonoSynth::new(EngineConfig {
            sample_rate,
            channels,
            midi_channel: self.midi_channel,
            ..EngineConfig::default()
        })
        .wrap_err("failed to build voice engine")?;
        let (mut processor, input) = synth.split();
        let voice = Arc::clone(processor.voice_state());

        // A missing MIDI device ends the session before any audio starts
        let midi = MidiConnection::open(self.port.as_deref(), input)
            .wrap_err("failed to open MIDI input")?;

        let params = Arc::new(SharedParams::default());
        let (mut scope_tx, scope_rx) =
            RingBuffer::<ScopeFrame>::new(VIS_BUFFER_SIZE * SCOPE_RING_WINDOWS);

        let audio_params = Arc::clone(&params);
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                for block in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    processor.process_block(audio_params.as_ref(), block, &mut scope_tx);
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;
        stream.play()?;

        info!(sample_rate, channels, port = midi.port_name(), "session started");

        let session = SessionInfo {
            sample_rate,
            port_name: midi.port_name().to_string(),
        };

        let mut terminal = ratatui::init();
        let result = UiApp::new(scope_rx, params, voice, session).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        midi.close();
        info!("session closed");

        result
    }
}

impl Default for MonoApp {
    fn default() -> Self {
        Self::new()
    }
}
