// UI module - egui shell around the metronome controller

pub mod app;

pub use app::MetronomeApp;
