//! Terminal metronome
//!
//! Runs the beat clock without the GUI, e.g. to check the click output:
//!
//! `metronome_cli [bpm] [quarter|eighth|sixteenth] [seconds] [--config PATH] [--require-audio]`
//!
//! Without `--config` the usual settings file is used when present. With
//! `--require-audio` a missing output device is an error instead of a silent
//! run.

use log::warn;
use practice_metronome::audio::{ClickOutput, ClickSink, SilentOutput};
use practice_metronome::clock::SystemClock;
use practice_metronome::config::MetronomeSettings;
use practice_metronome::controller::MetronomeController;
use practice_metronome::error::MetronomeError;
use practice_metronome::input::parse_tempo;
use practice_metronome::sequencer::NoteSubdivision;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

const DEFAULT_RUN_SECONDS: u64 = 10;
const MAX_SLEEP: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    config: Option<PathBuf>,
    require_audio: bool,
}

fn parse_options() -> Options {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => options.config = args.next().map(PathBuf::from),
            "--require-audio" => options.require_audio = true,
            _ => options.positional.push(arg),
        }
    }

    options
}

fn parse_subdivision(arg: &str, fallback: NoteSubdivision) -> NoteSubdivision {
    match arg {
        "quarter" | "4" => NoteSubdivision::Quarter,
        "eighth" | "8" => NoteSubdivision::Eighth,
        "sixteenth" | "16" => NoteSubdivision::Sixteenth,
        _ => fallback,
    }
}

fn open_output(require_audio: bool) -> Result<Box<dyn ClickSink>, MetronomeError> {
    match ClickOutput::open() {
        Ok(output) => Ok(Box::new(output)),
        Err(e) if require_audio => Err(e.into()),
        Err(e) => {
            warn!("audio output unavailable, running silently: {e}");
            Ok(Box::new(SilentOutput::new()))
        }
    }
}

fn main() -> Result<(), MetronomeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_options();
    let settings = match &options.config {
        Some(path) => MetronomeSettings::load_from(path)?,
        None => MetronomeSettings::load_or_default(),
    };

    let bpm = options
        .positional
        .first()
        .map_or(settings.tempo, |arg| parse_tempo(arg, Some(settings.tempo)));
    let subdivision = options
        .positional
        .get(1)
        .map_or(settings.subdivision, |arg| {
            parse_subdivision(arg, settings.subdivision)
        });
    let run_for = Duration::from_secs(
        options
            .positional
            .get(2)
            .and_then(|arg| arg.parse().ok())
            .unwrap_or(DEFAULT_RUN_SECONDS),
    );

    let output = open_output(options.require_audio)?;
    let mut controller = MetronomeController::new(&settings, Box::new(SystemClock::new()), output);
    controller.set_tempo(bpm);
    controller.set_subdivision(subdivision);

    println!(
        "{}, {} for {}s (numbers {})",
        controller.view().tempo,
        subdivision,
        run_for.as_secs(),
        controller.numbers().label(" \u{2194} ")
    );

    let mut ticks = usize::from(controller.start());
    let started = Instant::now();
    let mut shown = controller.view().displayed_number;

    while started.elapsed() < run_for {
        ticks += controller.advance();

        let displayed = controller.view().displayed_number;
        if displayed != shown {
            shown = displayed;
            if let Some(number) = displayed {
                println!("-> {number}");
            }
        }

        let wait = controller
            .time_until_next_tick()
            .map_or(MAX_SLEEP, |wait| wait.min(MAX_SLEEP));
        thread::sleep(wait);
    }

    controller.shutdown();
    println!("{ticks} ticks");

    Ok(())
}
