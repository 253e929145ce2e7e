// Main UI - egui front-end for the practice metronome
//
// The app is the host loop: every frame runs the due ticks, then asks egui
// for a repaint at the next tick deadline.

use crate::audio::status::DeviceStatus;
use crate::controller::{MetronomeController, MetronomeView};
use crate::input;
use crate::practice::history::PracticeRecord;
use crate::sequencer::rotator::{MAX_NUMBER, MIN_NUMBER};
use crate::sequencer::tempo::{MAX_BPM, MIN_BPM, NoteSubdivision};
use eframe::egui;
use std::time::Duration;

const NUMBER_GRID_COLUMNS: u8 = 5;
/// Longest wait between two frames, also used when no timer is armed
const MAX_REPAINT_DELAY: Duration = Duration::from_millis(250);

const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(139, 92, 246);
const BEAT_COLOR: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

pub struct MetronomeApp {
    controller: MetronomeController,
    // Text fields keep what the user typed until it is applied
    tempo_text: String,
    minutes_text: String,
    seconds_text: String,
}

impl MetronomeApp {
    pub fn new(controller: MetronomeController) -> Self {
        let view = controller.view();

        Self {
            tempo_text: view.tempo.bpm().to_string(),
            minutes_text: view.timer_duration.minutes().to_string(),
            seconds_text: view.timer_duration.seconds().to_string(),
            controller,
        }
    }

    fn draw_number_grid(&mut self, ui: &mut egui::Ui, view: &MetronomeView) {
        ui.heading("Select Numbers");
        ui.add_space(8.0);

        egui::Grid::new("number_grid")
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for number in MIN_NUMBER..=MAX_NUMBER {
                    let selected = view.numbers.contains(&Some(number));
                    let label = egui::SelectableLabel::new(selected, number.to_string());

                    if ui.add_sized([40.0, 40.0], label).clicked() {
                        self.controller.select_number(number);
                    }
                    if number % NUMBER_GRID_COLUMNS == 0 {
                        ui.end_row();
                    }
                }
            });

        ui.add_space(8.0);
        ui.label(format!("Selected: {}", self.controller.numbers().label(", ")));
        ui.small("Click a beat dot to set the change position");
    }

    fn draw_beat_dots(&mut self, ui: &mut egui::Ui, view: &MetronomeView) {
        ui.horizontal(|ui| {
            for beat in 0..view.ticks_per_cycle {
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(22.0, 22.0), egui::Sense::click());

                let main = view.subdivision.is_main_beat(beat);
                let accent = view.subdivision.is_accent(u64::from(beat));
                let active = beat == view.current_beat;

                let mut radius = if main { 8.0 } else { 4.0 };
                let fill = if active {
                    radius *= 1.25;
                    if accent { ACCENT_COLOR } else { BEAT_COLOR }
                } else if main {
                    egui::Color32::from_gray(170)
                } else {
                    egui::Color32::from_gray(110)
                };

                let stroke = if beat == view.change_beat {
                    egui::Stroke::new(2.0, egui::Color32::YELLOW)
                } else {
                    egui::Stroke::NONE
                };

                ui.painter().circle(rect.center(), radius, fill, stroke);

                if response.clicked() {
                    self.controller.set_change_beat(beat);
                }
            }
        });
    }

    fn draw_metronome(&mut self, ui: &mut egui::Ui, view: &MetronomeView) {
        ui.vertical_centered(|ui| {
            ui.heading("Music Metronome");
            ui.label("Keep perfect time");
            ui.add_space(16.0);

            let number = view
                .displayed_number
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            ui.label(
                egui::RichText::new(number)
                    .monospace()
                    .size(28.0)
                    .strong()
                    .color(BEAT_COLOR),
            );

            ui.label(
                egui::RichText::new(view.tempo.bpm().to_string())
                    .monospace()
                    .size(40.0)
                    .strong(),
            );
            ui.label("BPM");
            ui.add_space(12.0);
        });

        self.draw_beat_dots(ui, view);
        ui.add_space(16.0);

        ui.vertical_centered(|ui| {
            let label = if view.playing { "Stop" } else { "Play" };
            if ui.add_sized([72.0, 48.0], egui::Button::new(label)).clicked() {
                self.controller.toggle_play();
            }
        });
        ui.add_space(16.0);

        self.draw_controls(ui, view);
        ui.add_space(16.0);

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(format!("Current: {}", view.subdivision.label()));
            ui.label(if view.playing { "Playing" } else { "Stopped" });
            ui.label(format!(
                "Numbers: {}",
                self.controller.numbers().label(" \u{2194} ")
            ));
            ui.label(format!("Change on beat: {}", view.change_beat + 1));
            draw_audio_status(ui, view.audio_status);
        });
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui, view: &MetronomeView) {
        ui.horizontal(|ui| {
            ui.label("Tempo (BPM)");

            let response = ui.add(egui::TextEdit::singleline(&mut self.tempo_text).desired_width(48.0));
            if response.lost_focus() {
                self.controller.set_tempo_text(&self.tempo_text);
                self.tempo_text = self.controller.view().tempo.bpm().to_string();
            }

            let mut bpm = view.tempo.bpm();
            if ui.add(egui::Slider::new(&mut bpm, MIN_BPM..=MAX_BPM)).changed() {
                self.controller.set_tempo(bpm);
                self.tempo_text = bpm.to_string();
            }
        });

        ui.horizontal(|ui| {
            ui.label("Note Value");

            let mut subdivision = view.subdivision;
            egui::ComboBox::from_id_salt("subdivision_selector")
                .selected_text(subdivision.label())
                .show_ui(ui, |ui| {
                    for option in NoteSubdivision::ALL {
                        ui.selectable_value(&mut subdivision, option, option.label());
                    }
                });

            if subdivision != view.subdivision {
                self.controller.set_subdivision(subdivision);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Volume");

            let mut volume = view.volume;
            if ui
                .add(egui::Slider::new(&mut volume, 0.0..=1.0).step_by(f64::from(input::VOLUME_STEP)))
                .changed()
            {
                self.controller.set_volume(volume);
            }
        });
    }

    fn draw_timer_panel(&mut self, ui: &mut egui::Ui, view: &MetronomeView) {
        ui.vertical_centered(|ui| {
            ui.heading("Practice Timer");
            ui.label(
                egui::RichText::new(&view.timer_display)
                    .monospace()
                    .size(32.0)
                    .strong(),
            );
            ui.label(if view.timer_running {
                "Time Remaining"
            } else {
                "Set Duration"
            });
        });
        ui.add_space(8.0);

        if view.timer_running {
            ui.horizontal(|ui| {
                if ui.button("Stop").clicked() {
                    self.controller.stop_timer();
                }
                if ui.button("Reset").clicked() {
                    self.controller.reset_timer();
                }
            });
        } else {
            ui.horizontal(|ui| {
                ui.label("Minutes");
                let minutes =
                    ui.add(egui::TextEdit::singleline(&mut self.minutes_text).desired_width(36.0));
                ui.label("Seconds");
                let seconds =
                    ui.add(egui::TextEdit::singleline(&mut self.seconds_text).desired_width(36.0));

                if minutes.changed() || seconds.changed() {
                    self.apply_timer_fields();
                }
                if minutes.lost_focus() || seconds.lost_focus() {
                    let duration = self.controller.view().timer_duration;
                    self.minutes_text = duration.minutes().to_string();
                    self.seconds_text = duration.seconds().to_string();
                }
            });

            if ui
                .add_enabled(view.can_start_timer, egui::Button::new("Start Timer"))
                .clicked()
            {
                self.controller.start_timer();
            }
        }

        ui.add_space(12.0);
        ui.separator();
        ui.strong("Practice Records");

        egui::ScrollArea::vertical()
            .max_height(384.0)
            .show(ui, |ui| {
                if self.controller.history().is_empty() {
                    ui.weak("No practice sessions yet");
                }
                for record in self.controller.history().iter() {
                    draw_record(ui, record);
                }
            });
    }

    fn apply_timer_fields(&mut self) {
        let minutes = input::parse_timer_minutes(&self.minutes_text);
        let seconds = input::parse_timer_seconds(&self.seconds_text);
        self.controller.set_timer_duration(minutes, seconds);
    }
}

fn draw_record(ui: &mut egui::Ui, record: &PracticeRecord) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.strong(record.formatted_duration());
            ui.weak(record.time_of_day());
        });
        ui.label(format!("BPM: {}", record.tempo().bpm()));
        ui.label(format!("Numbers: {}", record.numbers_label()));
    });
}

fn draw_audio_status(ui: &mut egui::Ui, status: DeviceStatus) {
    let color = match status {
        DeviceStatus::Connected => egui::Color32::GREEN,
        DeviceStatus::Unavailable | DeviceStatus::Closed => egui::Color32::GRAY,
        DeviceStatus::Error => egui::Color32::RED,
    };
    ui.colored_label(color, format!("Audio: {status}"));
}

impl eframe::App for MetronomeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.advance();
        let view = self.controller.view();

        egui::SidePanel::left("numbers_panel")
            .resizable(false)
            .show(ctx, |ui| self.draw_number_grid(ui, &view));

        egui::SidePanel::right("timer_panel")
            .resizable(false)
            .min_width(260.0)
            .show(ctx, |ui| self.draw_timer_panel(ui, &view));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_metronome(ui, &view));

        let delay = self
            .controller
            .time_until_next_tick()
            .map_or(MAX_REPAINT_DELAY, |delay| delay.min(MAX_REPAINT_DELAY));
        ctx.request_repaint_after(delay);
    }
}
