use log::{info, warn};
use practice_metronome::audio::{ClickOutput, ClickSink, SilentOutput};
use practice_metronome::clock::SystemClock;
use practice_metronome::config::MetronomeSettings;
use practice_metronome::controller::MetronomeController;
use practice_metronome::ui::MetronomeApp;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Practice Metronome {}", env!("CARGO_PKG_VERSION"));

    let settings = MetronomeSettings::load_or_default();

    // The metronome keeps working without sound when no device can be opened
    let output: Box<dyn ClickSink> = match ClickOutput::open() {
        Ok(output) => Box::new(output),
        Err(e) => {
            warn!("audio output unavailable: {e}");
            Box::new(SilentOutput::new())
        }
    };

    let controller = MetronomeController::new(&settings, Box::new(SystemClock::new()), output);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 620.0])
            .with_title("Practice Metronome"),
        ..Default::default()
    };

    eframe::run_native(
        "Practice Metronome",
        native_options,
        Box::new(|_cc| Ok(Box::new(MetronomeApp::new(controller)))),
    )
}
