//! Pronunciation Coach window — egui/eframe application.
//!
//! # Architecture
//!
//! [`CoachApp`] is the top-level [`eframe::App`].  It owns the target
//! sentence being typed, a sender for [`SessionCommand`]s, and a
//! [`SharedState`] handle that the session orchestrator mutates; the UI
//! reads a snapshot of that state every frame and renders:
//!
//! * the target-sentence text field,
//! * the "Start Speaking" / "Try Again" buttons,
//! * a status banner (info / warning / error), and
//! * the feedback text returned by the assessment service.

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::session::{
    Notice, NoticeLevel, SessionCommand, SessionPhase, SharedState,
};

// ---------------------------------------------------------------------------
// CoachApp
// ---------------------------------------------------------------------------

/// eframe application — the single-page pronunciation assessment form.
pub struct CoachApp {
    /// The sentence the user wants to practice (bound to the text field).
    target_sentence: String,

    /// Send commands to the background session orchestrator.
    command_tx: mpsc::Sender<SessionCommand>,

    /// Session state mutated by the orchestrator, read here each frame.
    state: SharedState,

    /// Spinner animation phase (increases each frame while busy).
    spinner_phase: f32,
}

/// Per-frame snapshot of the shared session state, so the mutex is held
/// only briefly and never across rendering.
struct Snapshot {
    phase: SessionPhase,
    notice: Option<Notice>,
    has_transcript: bool,
    feedback: Option<String>,
}

impl CoachApp {
    /// Create a new [`CoachApp`].
    ///
    /// * `command_tx` — sender end of the session command channel.
    /// * `state`      — shared session state owned by the orchestrator.
    pub fn new(command_tx: mpsc::Sender<SessionCommand>, state: SharedState) -> Self {
        Self {
            target_sentence: String::new(),
            command_tx,
            state,
            spinner_phase: 0.0,
        }
    }

    fn snapshot(&self) -> Snapshot {
        let st = self.state.lock().unwrap();
        Snapshot {
            phase: st.phase,
            notice: st.notice.clone(),
            has_transcript: st.last_transcript.is_some(),
            feedback: st.feedback.clone(),
        }
    }

    // ── Panel sections ───────────────────────────────────────────────────

    fn draw_header(&self, ui: &mut egui::Ui) {
        ui.heading(
            egui::RichText::new("Pronunciation Coach")
                .color(egui::Color32::from_rgb(0, 255, 255)),
        );
        ui.label(
            egui::RichText::new(
                "Enter a sentence and speak it aloud for pronunciation assessment.",
            )
            .color(egui::Color32::from_rgb(79, 139, 249))
            .size(14.0),
        );
    }

    fn draw_form(&mut self, ui: &mut egui::Ui, snapshot: &Snapshot) {
        ui.add_space(8.0);
        ui.label("Enter the correct sentence for pronunciation:");
        ui.add(
            egui::TextEdit::singleline(&mut self.target_sentence)
                .hint_text("e.g. the quick brown fox")
                .desired_width(f32::INFINITY),
        );

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let busy = snapshot.phase.is_busy();

            if ui
                .add_enabled(!busy, egui::Button::new("Start Speaking"))
                .clicked()
            {
                let _ = self.command_tx.try_send(SessionCommand::Submit {
                    target: self.target_sentence.clone(),
                });
            }

            // The retry control appears only once a transcript exists.
            if snapshot.has_transcript
                && ui
                    .add_enabled(!busy, egui::Button::new("Try Again"))
                    .clicked()
            {
                let _ = self.command_tx.try_send(SessionCommand::Retry);
            }

            if busy {
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        self.spinner_char(),
                        snapshot.phase.label()
                    ))
                    .color(egui::Color32::from_rgb(140, 140, 140)),
                );
            }
        });
    }

    fn draw_notice(&self, ui: &mut egui::Ui, snapshot: &Snapshot) {
        if let Some(notice) = &snapshot.notice {
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(notice.text.as_str())
                    .color(notice_color(notice.level))
                    .size(13.0),
            );
        }

        if snapshot.phase == SessionPhase::CaptureFailed {
            ui.label(
                egui::RichText::new(
                    "There was an error in recognizing your speech. Please try again.",
                )
                .color(egui::Color32::from_rgb(255, 136, 68))
                .size(13.0),
            );
        }
    }

    fn draw_feedback(&self, ui: &mut egui::Ui, snapshot: &Snapshot) {
        if let Some(feedback) = &snapshot.feedback {
            ui.add_space(8.0);
            ui.separator();
            ui.label(
                egui::RichText::new("Pronunciation Feedback")
                    .color(egui::Color32::from_rgb(80, 200, 120))
                    .size(16.0)
                    .strong(),
            );
            ui.add_space(4.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    // Opaque display content — rendered exactly as returned.
                    ui.label(feedback.as_str());
                });
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// A simple rotating ASCII spinner character driven by `spinner_phase`.
    fn spinner_char(&self) -> char {
        let chars = ['|', '/', '-', '\\'];
        let idx = (self.spinner_phase as usize) % chars.len();
        chars[idx]
    }
}

fn notice_color(level: NoticeLevel) -> egui::Color32 {
    match level {
        NoticeLevel::Info => egui::Color32::from_rgb(68, 136, 255),
        NoticeLevel::Warning => egui::Color32::from_rgb(255, 136, 68),
        NoticeLevel::Error => egui::Color32::from_rgb(255, 80, 80),
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for CoachApp {
    /// Called every frame by eframe.  Reads a state snapshot, advances the
    /// spinner, then renders the page.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snapshot = self.snapshot();

        if snapshot.phase.is_busy() {
            self.spinner_phase += 0.08;
            if self.spinner_phase >= 4.0 {
                self.spinner_phase = 0.0;
            }
            // Repaint at ~15 fps so the spinner and incoming state changes
            // are visible without user input.
            ctx.request_repaint_after(Duration::from_millis(66));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_header(ui);
            ui.separator();
            self.draw_form(ui, &snapshot);
            self.draw_notice(ui, &snapshot);
            self.draw_feedback(ui, &snapshot);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Pronunciation Coach closing");
    }
}
