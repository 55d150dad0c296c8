//! saavy-mono - monophonic MIDI synth in the terminal
//!
//! Run with: cargo run -- --port <name>

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::MonoApp;
use saavy_mono::io::input::MidiConnection;

#[derive(Parser, Debug)]
#[command(name = "saavy-mono", about = "Monophonic MIDI synth with a terminal control surface")]
struct Args {
    /// Connect to the first MIDI input whose name contains this text
    #[arg(short, long)]
    port: Option<String>,

    /// Only respond to this MIDI channel (1-16)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=16))]
    channel: Option<u8>,

    /// List MIDI input ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Where to write logs (the terminal belongs to the UI)
    #[arg(long, default_value = "saavy-mono.log")]
    log_file: PathBuf,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if args.list_ports {
        for name in MidiConnection::port_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    let log_file = File::create(&args.log_file)
        .wrap_err_with(|| format!("failed to create log file {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    MonoApp::new()
        .port(args.port)
        .midi_channel(args.channel.map(|c| c - 1))
        .run()
}
