use std::{path::PathBuf, time::Instant};

use client_core::NotificationKind;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::form::{FormField, CARDS_MAX_COUNT, CARDS_MIN_COUNT};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::FormViewState;

const FORM_MAX_WIDTH: f32 = 440.0;
const SUBMIT_LABEL: &str = "Получить документ";

pub struct InvoiceFormApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view: FormViewState,
    download_dir: PathBuf,
}

impl InvoiceFormApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view: FormViewState::default(),
            download_dir,
        }
    }

    fn process_ui_events(&mut self, now: Instant) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.view.apply(event, now);
        }
        self.view.expire_toasts(now);
    }

    fn try_submit(&mut self) {
        let Some(cmd) = self.view.begin_submit() else {
            tracing::debug!("submit ignored while a request is in flight");
            return;
        };
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.view, Instant::now());
    }

    fn field_label(ui: &mut egui::Ui, field: FormField) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(field.label()).strong());
            ui.colored_label(ui.visuals().error_fg_color, "*");
        });
    }

    fn field_error(ui: &mut egui::Ui, message: Option<&str>) {
        if let Some(message) = message {
            ui.colored_label(ui.visuals().error_fg_color, message);
        }
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let top_space = (ui.available_height() * 0.08).clamp(12.0, 60.0);
            ui.add_space(top_space);

            ui.vertical_centered(|ui| {
                ui.set_max_width(FORM_MAX_WIDTH);

                egui::Frame::new()
                    .fill(ui.visuals().extreme_bg_color)
                    .corner_radius(egui::CornerRadius::same(8))
                    .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
                    .inner_margin(egui::Margin::same(20))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 8.0);
                        let busy = self.view.is_busy();

                        Self::field_label(ui, FormField::Requisites);
                        ui.add_enabled(
                            !busy,
                            egui::TextEdit::multiline(&mut self.view.form.requisites)
                                .id_salt("requisites")
                                .desired_rows(4)
                                .desired_width(f32::INFINITY),
                        );
                        Self::field_error(ui, self.view.errors.get(FormField::Requisites));

                        Self::field_label(ui, FormField::CardsCount);
                        ui.add_enabled(
                            !busy,
                            egui::DragValue::new(&mut self.view.form.cards_count)
                                .range(CARDS_MIN_COUNT..=CARDS_MAX_COUNT)
                                .speed(1.0),
                        );
                        Self::field_error(ui, self.view.errors.get(FormField::CardsCount));

                        Self::field_label(ui, FormField::Email);
                        let email = ui.horizontal(|ui| {
                            ui.label("@");
                            ui.add_enabled(
                                !busy,
                                egui::TextEdit::singleline(&mut self.view.form.email)
                                    .id_salt("email")
                                    .hint_text("name@example.com")
                                    .desired_width(f32::INFINITY),
                            )
                        });
                        Self::field_error(ui, self.view.errors.get(FormField::Email));

                        let enter_pressed = ctx.input(|i| i.key_pressed(egui::Key::Enter));
                        if email.inner.lost_focus() && enter_pressed {
                            self.try_submit();
                        }

                        ui.add_space(6.0);
                        ui.horizontal(|ui| {
                            let button = egui::Button::new(
                                egui::RichText::new(SUBMIT_LABEL).strong().size(15.0),
                            )
                            .min_size(egui::vec2(200.0, 34.0));
                            if ui.add_enabled(!busy, button).clicked() {
                                self.try_submit();
                            }
                            if busy {
                                ui.add(egui::Spinner::new());
                            }
                        });

                        ui.add_space(4.0);
                        ui.small(
                            egui::RichText::new(format!(
                                "Папка загрузки: {}",
                                self.download_dir.display()
                            ))
                            .weak(),
                        );
                    });
            });
        });
    }

    fn show_notifications(&mut self, ctx: &egui::Context) {
        if self.view.toasts.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::TopBottomPanel::bottom("notifications")
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                for (index, toast) in self.view.toasts.iter().enumerate() {
                    let (fill, stroke) = match toast.notification.kind {
                        NotificationKind::Success => (
                            egui::Color32::from_rgb(46, 94, 62),
                            egui::Color32::from_rgb(88, 150, 108),
                        ),
                        NotificationKind::Error => (
                            egui::Color32::from_rgb(111, 53, 53),
                            egui::Color32::from_rgb(175, 96, 96),
                        ),
                    };

                    egui::Frame::new()
                        .fill(fill)
                        .stroke(egui::Stroke::new(1.0, stroke))
                        .corner_radius(egui::CornerRadius::same(8))
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(ui, |ui| {
                            ui.horizontal_wrapped(|ui| {
                                ui.label(
                                    egui::RichText::new(&toast.notification.message)
                                        .color(egui::Color32::WHITE),
                                );
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui.small_button("✕").clicked() {
                                            dismissed = Some(index);
                                        }
                                    },
                                );
                            });
                        });
                    ui.add_space(4.0);
                }
            });

        if let Some(index) = dismissed {
            self.view.dismiss_toast(index);
        }
    }
}

impl eframe::App for InvoiceFormApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(Instant::now());

        self.show_notifications(ctx);
        self.show_form(ctx);

        if self.view.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
