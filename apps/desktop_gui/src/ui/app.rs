use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{TodoId, EMPTY_STATE_MESSAGE, INPUT_PLACEHOLDER};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::TodoViewState;

const MAX_EVENTS_PER_FRAME: usize = 256;

enum RowAction {
    Toggle(TodoId),
    Delete(TodoId),
}

pub struct TodoGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view: TodoViewState,
}

impl TodoGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            view: TodoViewState::default(),
        };
        app.dispatch(BackendCommand::LoadAll);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.view.status) {
            self.view.mark_dispatched();
        }
    }

    fn process_ui_events(&mut self) {
        for event in self.ui_rx.try_iter().take(MAX_EVENTS_PER_FRAME) {
            self.view.apply(event);
        }
    }

    fn show_input_row(&mut self, ui: &mut egui::Ui) -> bool {
        let mut submit = false;
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.view.draft)
                    .hint_text(INPUT_PLACEHOLDER)
                    .desired_width(ui.available_width() - 64.0),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
                response.request_focus();
            }
            if ui.button("Add").clicked() {
                submit = true;
            }
        });
        submit
    }

    fn show_todo_rows(&self, ui: &mut egui::Ui) -> Vec<RowAction> {
        let mut actions = Vec::new();
        if self.view.is_empty() {
            ui.add_space(12.0);
            ui.vertical_centered(|ui| ui.weak(EMPTY_STATE_MESSAGE));
            return actions;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for todo in &self.view.todos {
                ui.horizontal(|ui| {
                    // Local copy: the row only changes when the backend
                    // publishes a new snapshot.
                    let mut checked = todo.completed;
                    if ui.checkbox(&mut checked, "").changed() {
                        actions.push(RowAction::Toggle(todo.id));
                    }

                    let text = egui::RichText::new(&todo.text);
                    ui.label(if todo.completed {
                        text.strikethrough().weak()
                    } else {
                        text
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Delete").clicked() {
                            actions.push(RowAction::Delete(todo.id));
                        }
                    });
                });
            }
        });
        actions
    }
}

impl eframe::App for TodoGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.view.is_busy() {
                    ui.spinner();
                }
                if let Some(startup_error) = &self.view.startup_error {
                    ui.colored_label(ui.visuals().error_fg_color, startup_error);
                }
                if !self.view.status.is_empty() {
                    ui.label(&self.view.status);
                }
            });
        });

        let mut submit = false;
        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("ToDo List");
            ui.add_space(8.0);
            submit = self.show_input_row(ui);
            ui.separator();
            actions = self.show_todo_rows(ui);
        });

        if submit {
            let cmd = self.view.submit();
            self.dispatch(cmd);
        }
        for action in actions {
            let cmd = match action {
                RowAction::Toggle(id) => self.view.toggle(id),
                RowAction::Delete(id) => self.view.delete(id),
            };
            self.dispatch(cmd);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
