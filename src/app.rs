//! Warehouse voice lookup window: egui/eframe application.
//!
//! # Architecture
//!
//! [`WarehouseApp`] is the top-level [`eframe::App`].  It owns the [`Desk`]
//! (all user-action handlers) and two channel endpoints to the speech
//! worker:
//!
//! * `request_tx` sends a [`SpeechRequest`] when a panel's "Speak" button is
//!   pressed.
//! * `reply_rx` receives the [`SpeechReply`]; it is polled every frame.
//!
//! # Views
//!
//! | Session | Visual |
//! |---------|--------|
//! | `LoggedOut` | Title, username, masked password, Login button |
//! | `LoggedIn`  | Role badge, Logout, inventory grid, three lookup panels |
//!
//! While a capture is in flight every action button is disabled and the
//! requesting panel shows "Listening... Speak now".

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::desk::{Desk, Notice, NoticeLevel};
use crate::query::{QueryTarget, StockField};
use crate::speech::{RecognitionFailure, SpeechReply, SpeechRequest};
use crate::store::InventoryTable;

const TITLE: &str = "Warehouse Inventory Management";
const LISTENING: &str = "Listening... Speak now";

// ---------------------------------------------------------------------------
// WarehouseApp
// ---------------------------------------------------------------------------

pub struct WarehouseApp {
    desk: Desk,

    // ── Login form ───────────────────────────────────────────────────────
    username: String,
    password: String,
    login_notices: Vec<Notice>,

    // ── Logged-in view ───────────────────────────────────────────────────
    /// Loaded at login and retried on each lookup until it succeeds; `Err`
    /// holds the notice shown instead of the grid.
    inventory: Option<Result<Arc<InventoryTable>, Notice>>,
    panel_notices: [Vec<Notice>; 3],
    /// Panel whose capture is in flight.
    listening: Option<QueryTarget>,

    // ── Channels ─────────────────────────────────────────────────────────
    request_tx: mpsc::Sender<SpeechRequest>,
    reply_rx: mpsc::Receiver<SpeechReply>,

    config: AppConfig,
}

impl WarehouseApp {
    pub fn new(
        desk: Desk,
        request_tx: mpsc::Sender<SpeechRequest>,
        reply_rx: mpsc::Receiver<SpeechReply>,
        config: AppConfig,
    ) -> Self {
        Self {
            desk,
            username: String::new(),
            password: String::new(),
            login_notices: Vec::new(),
            inventory: None,
            panel_notices: Default::default(),
            listening: None,
            request_tx,
            reply_rx,
            config,
        }
    }

    fn is_busy(&self) -> bool {
        self.listening.is_some()
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn submit_login(&mut self) {
        self.login_notices = self.desk.login(&self.username, &self.password);
        self.password.clear();
        if self.desk.session().is_logged_in() {
            self.inventory = Some(self.desk.inventory());
        }
    }

    fn submit_logout(&mut self) {
        self.login_notices = self.desk.logout();
        self.inventory = None;
        self.panel_notices = Default::default();
        self.username.clear();
    }

    fn start_listening(&mut self, target: QueryTarget) {
        if self.is_busy() {
            return;
        }
        let request = SpeechRequest {
            target,
            timeout: Duration::from_secs(self.config.speech.listen_timeout_secs),
        };
        match self.request_tx.try_send(request) {
            Ok(()) => {
                self.listening = Some(target);
                self.panel_notices[target.index()] = vec![Notice::info(LISTENING)];
            }
            Err(e) => {
                log::error!("speech worker unavailable: {e}");
                self.panel_notices[target.index()] =
                    vec![Notice::error(RecognitionFailure::ServiceUnavailable.message())];
            }
        }
    }

    fn run_query(&mut self, target: QueryTarget) {
        self.panel_notices[target.index()] = self.desk.run_query(target);
        if !matches!(self.inventory, Some(Ok(_))) {
            self.inventory = Some(self.desk.inventory());
        }
    }

    /// Track the outer window position so it can be restored next launch.
    fn remember_window_position(&mut self, position: Option<egui::Pos2>) {
        if let Some(pos) = position {
            self.config.ui.window_position = Some((pos.x, pos.y));
        }
    }

    /// Drain finished captures (non-blocking).
    fn poll_replies(&mut self) {
        while let Ok(SpeechReply { target, outcome }) = self.reply_rx.try_recv() {
            if self.listening == Some(target) {
                self.listening = None;
            }
            if !self.desk.session().is_logged_in() {
                continue;
            }
            let notice = self.desk.apply_speech(target, outcome);
            self.panel_notices[target.index()] = vec![notice];
        }
    }

    // ── Views ────────────────────────────────────────────────────────────

    fn draw_login(&mut self, ui: &mut egui::Ui) {
        ui.heading("Login");
        ui.add_space(6.0);

        egui::Grid::new("login_form")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Username");
                ui.text_edit_singleline(&mut self.username);
                ui.end_row();

                ui.label("Password");
                let response = ui.add(egui::TextEdit::singleline(&mut self.password).password(true));
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.submit_login();
                }
                ui.end_row();
            });

        ui.add_space(6.0);
        if ui.button("Login").clicked() {
            self.submit_login();
        }
        draw_notices(ui, &self.login_notices);
    }

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(role) = self.desk.session().role() {
                ui.label(
                    egui::RichText::new(format!("Logged in as {role}"))
                        .color(egui::Color32::from_rgb(80, 200, 120)),
                );
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add_enabled(!self.is_busy(), egui::Button::new("Logout")).clicked() {
                    self.submit_logout();
                }
            });
        });
    }

    fn draw_inventory(&self, ui: &mut egui::Ui) {
        ui.heading("Inventory Data");
        match &self.inventory {
            Some(Ok(table)) => {
                egui::ScrollArea::vertical()
                    .id_salt("inventory_grid")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        egui::Grid::new("inventory")
                            .striped(true)
                            .num_columns(StockField::ALL.len())
                            .show(ui, |ui| {
                                for field in StockField::ALL {
                                    ui.strong(field.header());
                                }
                                ui.end_row();
                                for record in table.records() {
                                    for field in StockField::ALL {
                                        ui.label(
                                            field
                                                .value(record)
                                                .map(|v| v.into_owned())
                                                .unwrap_or_default(),
                                        );
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            }
            Some(Err(notice)) => draw_notices(ui, std::slice::from_ref(notice)),
            None => {}
        }
    }

    fn draw_panel(&mut self, ui: &mut egui::Ui, target: QueryTarget) {
        let busy = self.is_busy();
        ui.heading(target.heading());

        let mut text = self.desk.query_text(target).to_string();
        let edit = egui::TextEdit::singleline(&mut text)
            .hint_text(target.hint())
            .id_salt(target.heading());
        if ui.add_enabled(!busy, edit).changed() {
            self.desk.set_query_text(target, text);
        }

        ui.horizontal(|ui| {
            if ui.add_enabled(!busy, egui::Button::new("Speak")).clicked() {
                self.start_listening(target);
            }
            if ui.add_enabled(!busy, egui::Button::new(target.action())).clicked() {
                self.run_query(target);
            }
            if self.listening == Some(target) {
                ui.spinner();
            }
        });

        draw_notices(ui, &self.panel_notices[target.index()]);
    }
}

fn notice_color(level: NoticeLevel) -> egui::Color32 {
    match level {
        NoticeLevel::Success => egui::Color32::from_rgb(80, 200, 120),
        NoticeLevel::Info => egui::Color32::from_rgb(68, 136, 255),
        NoticeLevel::Warning => egui::Color32::from_rgb(255, 180, 68),
        NoticeLevel::Error => egui::Color32::from_rgb(255, 96, 96),
    }
}

fn draw_notices(ui: &mut egui::Ui, notices: &[Notice]) {
    for notice in notices {
        ui.colored_label(notice_color(notice.level), notice.text.as_str());
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for WarehouseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_replies();
        self.remember_window_position(ctx.input(|i| i.viewport().outer_rect).map(|r| r.min));
        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(TITLE);
            ui.separator();

            if !self.desk.session().is_logged_in() {
                self.draw_login(ui);
                return;
            }

            self.draw_header(ui);
            draw_notices(ui, &self.login_notices);
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.config.ui.show_inventory_table {
                    self.draw_inventory(ui);
                    ui.separator();
                }
                for target in QueryTarget::ALL {
                    self.draw_panel(ui, target);
                    ui.separator();
                }
            });
        });
    }

    /// Persist the window position in the config on exit (best-effort).
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("warehouse voice window closing");
        if let Err(e) = self.config.save() {
            log::warn!("Failed to save config: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{RecognitionError, SpeechOutcome};
    use crate::store::{CredentialStore, InventoryAccessor};
    use tempfile::TempDir;

    struct Harness {
        dir: TempDir,
        app: WarehouseApp,
        requests: mpsc::Receiver<SpeechRequest>,
        replies: mpsc::Sender<SpeechReply>,
    }

    fn harness() -> Harness {
        let dir = TempDir::new().unwrap();
        let users = dir.path().join("users.csv");
        let stock = dir.path().join("inventory.csv");
        std::fs::write(&users, "username,password,role\nalice,pw123,manager\n").unwrap();
        std::fs::write(
            &stock,
            "Stock Name,Location,Quantity,Replenishment Date\nSalmon,A1,10,2024-05-01\n",
        )
        .unwrap();

        let desk = Desk::new(CredentialStore::new(users), InventoryAccessor::new(stock));
        let (request_tx, requests) = mpsc::channel(4);
        let (replies, reply_rx) = mpsc::channel(4);
        Harness {
            dir,
            app: WarehouseApp::new(desk, request_tx, reply_rx, AppConfig::default()),
            requests,
            replies,
        }
    }

    fn log_in(app: &mut WarehouseApp) {
        app.username = "alice".into();
        app.password = "pw123".into();
        app.submit_login();
    }

    #[test]
    fn login_loads_inventory_and_clears_password() {
        let mut h = harness();
        log_in(&mut h.app);
        assert!(h.app.password.is_empty());
        assert!(matches!(&h.app.inventory, Some(Ok(t)) if t.len() == 1));
        assert_eq!(h.app.login_notices, [Notice::success("Logged in as manager")]);
    }

    #[test]
    fn speak_sends_request_and_blocks_further_actions() {
        let mut h = harness();
        log_in(&mut h.app);
        h.app.start_listening(QueryTarget::Quantity);
        assert_eq!(h.app.listening, Some(QueryTarget::Quantity));
        assert_eq!(h.app.panel_notices[1], [Notice::info(LISTENING)]);

        h.app.start_listening(QueryTarget::Location);
        let request = h.requests.try_recv().unwrap();
        assert_eq!(request.target, QueryTarget::Quantity);
        assert_eq!(request.timeout, Duration::from_secs(5));
        assert!(h.requests.try_recv().is_err());
    }

    #[test]
    fn reply_fills_the_panel_and_unblocks() {
        let mut h = harness();
        log_in(&mut h.app);
        h.app.start_listening(QueryTarget::Location);
        h.replies
            .try_send(SpeechReply {
                target: QueryTarget::Location,
                outcome: SpeechOutcome::Recognized("salmon".into()),
            })
            .unwrap();

        h.app.poll_replies();
        assert!(!h.app.is_busy());
        assert_eq!(h.app.desk.query_text(QueryTarget::Location), "salmon");
        assert_eq!(h.app.panel_notices[0], [Notice::success("Recognized: salmon")]);

        h.app.run_query(QueryTarget::Location);
        assert_eq!(
            h.app.panel_notices[0],
            [Notice::success("Salmon is located at A1")]
        );
    }

    #[test]
    fn failed_reply_leaves_empty_query() {
        let mut h = harness();
        log_in(&mut h.app);
        h.app.start_listening(QueryTarget::Replenishment);
        h.replies
            .try_send(SpeechReply {
                target: QueryTarget::Replenishment,
                outcome: SpeechOutcome::Failed(RecognitionError::NoSpeech { waited_secs: 5 }),
            })
            .unwrap();
        h.app.poll_replies();
        assert_eq!(h.app.desk.query_text(QueryTarget::Replenishment), "");
        assert_eq!(h.app.panel_notices[2][0].level, NoticeLevel::Warning);
    }

    #[test]
    fn closed_worker_reports_service_unavailable() {
        let mut h = harness();
        log_in(&mut h.app);
        drop(h.requests);
        h.app.start_listening(QueryTarget::Location);
        assert!(!h.app.is_busy());
        assert_eq!(h.app.panel_notices[0][0].level, NoticeLevel::Error);
    }

    #[test]
    fn grid_recovers_once_the_inventory_file_appears() {
        let mut h = harness();
        let stock = h.dir.path().join("inventory.csv");
        let contents = std::fs::read_to_string(&stock).unwrap();
        std::fs::remove_file(&stock).unwrap();

        log_in(&mut h.app);
        assert!(matches!(
            &h.app.inventory,
            Some(Err(n)) if n.text == crate::desk::INVENTORY_NOT_FOUND
        ));

        std::fs::write(&stock, contents).unwrap();
        h.app.desk.set_query_text(QueryTarget::Location, "salmon");
        h.app.run_query(QueryTarget::Location);
        assert!(matches!(&h.app.inventory, Some(Ok(t)) if t.len() == 1));
        assert_eq!(
            h.app.panel_notices[0],
            [Notice::success("Salmon is located at A1")]
        );
    }

    #[test]
    fn window_position_is_tracked_for_saving() {
        let mut h = harness();
        assert_eq!(h.app.config.ui.window_position, None);
        h.app.remember_window_position(None);
        assert_eq!(h.app.config.ui.window_position, None);
        h.app.remember_window_position(Some(egui::pos2(40.0, 60.0)));
        assert_eq!(h.app.config.ui.window_position, Some((40.0, 60.0)));
    }

    #[test]
    fn logout_resets_the_view() {
        let mut h = harness();
        log_in(&mut h.app);
        h.app.run_query(QueryTarget::Location);
        h.app.submit_logout();
        assert!(h.app.inventory.is_none());
        assert!(h.app.panel_notices.iter().all(Vec::is_empty));
        assert_eq!(h.app.login_notices, [Notice::info("Logged out")]);
    }
}
