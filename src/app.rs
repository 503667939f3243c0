//! Main application UI.
//! Renders the form, turns user input into form actions and shows validation errors inline.

use crate::error::FormError;
use crate::export::json::export_submission_to_path;
use crate::models::{Entry, EntryId, EntryPatch, FormAction, FormState, Percentages, TrackableField};
use eframe::egui;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 60, 60);

/// Main application state
#[derive(Default)]
pub struct FormEditorApp {
    state: FormState,
    /// Shared input for the type name of a new custom field.
    new_custom_field_type: String,
    custom_field_error: Option<(EntryId, FormError)>,
    submit_error: Option<FormError>,
    status_message: Option<String>,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,
}

impl eframe::App for FormEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_form(ctx);

        // Nothing is saved, so confirm before dropping a non-empty form
        if ctx.input(|i| i.viewport().close_requested())
            && !self.allowed_to_close
            && !self.state.entries().is_empty()
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Discard the form and quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }
    }
}

impl FormEditorApp {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_form(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            // Actions are applied after rendering to avoid borrowing conflicts
            let mut actions: Vec<FormAction> = Vec::new();
            let mut action_submit = false;
            let mut action_export = false;

            ui.horizontal(|ui| {
                if ui.button("Add Field").clicked() {
                    actions.push(FormAction::AddEntry);
                }
                if ui
                    .add_enabled(self.state.last_submission().is_some(), egui::Button::new("Export Submission"))
                    .clicked()
                {
                    action_export = true;
                }
            });

            if let Some(message) = &self.status_message {
                ui.label(message);
            }

            ui.separator();

            ui.heading(format!("Fields ({})", self.state.entries().len()));

            egui::ScrollArea::vertical()
                .id_source("entries_list")
                .max_height(480.0)
                .show(ui, |ui| {
                    for (i, entry) in self.state.entries().iter().enumerate() {
                        ui.push_id(entry.id, |ui| {
                            ui.group(|ui| {
                                ui.label(format!("Field {}", i + 1));
                                render_standard_fields(ui, entry, &mut actions);
                                render_field_errors(ui, entry.id, self.submit_error.as_ref());

                                ui.add_space(6.0);
                                render_custom_fields(ui, entry, &mut actions);

                                ui.horizontal(|ui| {
                                    ui.add(
                                        egui::TextEdit::singleline(&mut self.new_custom_field_type)
                                            .hint_text("Type of Custom Field"),
                                    );
                                    if ui.button("Add Custom Field").clicked() {
                                        actions.push(FormAction::AddCustomField {
                                            entry_id: entry.id,
                                            type_name: self.new_custom_field_type.clone(),
                                        });
                                    }
                                });
                                if let Some((error_id, error)) = &self.custom_field_error {
                                    if *error_id == entry.id {
                                        ui.colored_label(ERROR_COLOR, error.to_string());
                                    }
                                }

                                ui.add_space(6.0);
                                if ui.button("Delete Field").clicked() {
                                    actions.push(FormAction::DeleteEntry(entry.id));
                                }

                                render_remember_checkboxes(ui, entry, &mut actions);
                            });
                        });
                        ui.add_space(8.0);
                    }
                });

            ui.separator();

            if ui.button("Submit Fields").clicked() {
                action_submit = true;
            }
            if let Some(error) = &self.submit_error {
                ui.colored_label(ERROR_COLOR, error.to_string());
            }

            ui.separator();

            ui.heading("Percentages");
            if let Some(percentages) = self.state.percentages() {
                for (name, value) in percentages.lines() {
                    ui.label(Percentages::format_line(&name, value));
                }
            }

            // Execute deferred actions
            for action in actions {
                self.apply(action);
            }
            if action_submit {
                self.apply(FormAction::Submit);
            }
            if action_export {
                self.handle_export();
            }
        });
    }

    fn apply(&mut self, action: FormAction) {
        let custom_target = match &action {
            FormAction::AddCustomField { entry_id, .. } => Some(*entry_id),
            _ => None,
        };
        let is_submit = action == FormAction::Submit;
        let edits_required_fields =
            matches!(action, FormAction::UpdateEntry(..) | FormAction::DeleteEntry(_));

        match self.state.reduce(action) {
            Ok(next) => {
                self.state = next;
                if custom_target.is_some() {
                    self.custom_field_error = None;
                    self.new_custom_field_type.clear();
                }
                if is_submit {
                    self.submit_error = None;
                } else if edits_required_fields {
                    // Only keep errors for fields that are still blank
                    self.submit_error = self
                        .submit_error
                        .take()
                        .and_then(|error| self.state.recheck(error));
                }
            }
            Err(e) => match custom_target {
                Some(entry_id) => self.custom_field_error = Some((entry_id, e)),
                None => self.submit_error = Some(e),
            },
        }
    }

    /// Handles export of the last submission to a JSON file
    fn handle_export(&mut self) {
        let Some(record) = self.state.last_submission() else {
            return;
        };

        // Open file save dialog
        let file_name = format!("submission-{}.json", record.submitted_at.format("%Y%m%d-%H%M%S"));
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(file_name)
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            self.status_message = Some(match export_submission_to_path(record, &path) {
                Ok(()) => format!("Submission exported to {}", path.display()),
                Err(e) => {
                    tracing::error!("export failed: {e}");
                    format!("Export failed: {}", e)
                }
            });
        }
    }
}

fn render_standard_fields(ui: &mut egui::Ui, entry: &Entry, actions: &mut Vec<FormAction>) {
    let fields: [(&str, &String, fn(String) -> EntryPatch); 4] = [
        ("Question *", &entry.question, EntryPatch::question),
        ("Answer *", &entry.answer, EntryPatch::answer),
        ("Reading", &entry.reading, EntryPatch::reading),
        ("Comprehension", &entry.comprehension, EntryPatch::comprehension),
    ];

    egui::Grid::new("standard_fields").num_columns(2).show(ui, |ui| {
        for (label, current, patch) in fields {
            ui.label(label);
            let mut text = current.clone();
            if ui.text_edit_singleline(&mut text).changed() {
                actions.push(FormAction::UpdateEntry(entry.id, patch(text)));
            }
            ui.end_row();
        }
    });
}

fn render_field_errors(ui: &mut egui::Ui, entry_id: EntryId, submit_error: Option<&FormError>) {
    let Some(error) = submit_error else {
        return;
    };
    for field_error in error.field_errors().iter().filter(|e| e.entry_id == entry_id) {
        ui.colored_label(ERROR_COLOR, format!("{} is required", field_error.field.label()));
    }
}

fn render_custom_fields(ui: &mut egui::Ui, entry: &Entry, actions: &mut Vec<FormAction>) {
    for (index, custom_field) in entry.custom_fields.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(&custom_field.field_type);

            let mut value = custom_field.value.clone();
            if ui.text_edit_singleline(&mut value).changed() {
                actions.push(FormAction::UpdateCustomFieldValue {
                    entry_id: entry.id,
                    index,
                    value,
                });
            }

            let mut remembered = custom_field.remembered;
            if ui.checkbox(&mut remembered, "Remember").changed() {
                actions.push(FormAction::ToggleCustomRemembered {
                    entry_id: entry.id,
                    index,
                });
            }

            if ui.button("Remove").clicked() {
                actions.push(FormAction::RemoveCustomField {
                    entry_id: entry.id,
                    index,
                });
            }
        });
    }
}

fn render_remember_checkboxes(ui: &mut egui::Ui, entry: &Entry, actions: &mut Vec<FormAction>) {
    ui.horizontal_wrapped(|ui| {
        for field in TrackableField::ALL {
            let mut checked = entry.remembered.get(field);
            if ui
                .checkbox(&mut checked, format!("Remember {}:", field.label()))
                .changed()
            {
                actions.push(FormAction::ToggleRemembered {
                    entry_id: entry.id,
                    field,
                });
            }
        }
    });
}
