use crate::config::FONT_SIZE_RANGE;
use crate::data::cleaner::RowPolicy;
use crate::processing::pipeline::LoadOutcome;
use crate::processing::statistics::CombineRule;
use crate::state::display::{DisplayController, EntryKey};
use crate::state::palette::{self, COLOR_PALETTE};
use crate::state::session::Session;
use crate::state::upload_set::UploadSet;

/// Requests from the side panel that need the app (dialogs, screenshots).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    AddFiles,
    ExportImageSave,
    ExportImageClipboard,
    ExportTable,
    CopyTable,
}

fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.label(egui::RichText::new(text).strong().size(15.0));
    ui.add_space(4.0);
}

/// Draw the side panel. Edits are applied in place; anything that needs a
/// native dialog or the clipboard is returned as an action.
pub fn show_controls(
    ui: &mut egui::Ui,
    uploads: &mut UploadSet,
    outcome: &LoadOutcome,
    session: &mut Session,
    display: &mut DisplayController,
    has_rows: bool,
) -> Vec<ControlAction> {
    let mut actions = Vec::new();

    egui::ScrollArea::vertical().show(ui, |ui| {
        // ============================================================
        // Files
        // ============================================================
        section_heading(ui, "Files");
        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new(egui::RichText::new("+ Add Files").strong()).min_size(egui::vec2(110.0, 26.0)))
                .clicked()
            {
                actions.push(ControlAction::AddFiles);
            }
            if ui
                .add_enabled(!uploads.is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                uploads.clear();
            }
        });

        if uploads.is_empty() {
            ui.label(egui::RichText::new("Drop Excel or CSV files onto the window.").weak());
        } else {
            let mut remove: Option<u64> = None;
            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(6))
                .show(ui, |ui| {
                    for file in uploads.files() {
                        ui.horizontal(|ui| {
                            if ui.small_button("x").on_hover_text("Remove file").clicked() {
                                remove = Some(file.id);
                            }
                            let parsed = outcome.by_upload_id(file.id);
                            let text = match parsed {
                                Some(p) => egui::RichText::new(format!("{} (n={})", file.name, p.series.len())),
                                None => egui::RichText::new(&file.name).strikethrough().weak(),
                            };
                            ui.label(text).on_hover_text(file.path.display().to_string());
                        });
                    }
                });
            if let Some(id) = remove {
                uploads.remove(id);
            }
        }

        ui.add_space(4.0);
        egui::ComboBox::from_label("Row filter")
            .selected_text(session.row_policy.label())
            .show_ui(ui, |ui| {
                for policy in RowPolicy::ALL {
                    ui.selectable_value(&mut session.row_policy, policy, policy.label());
                }
            });

        // ============================================================
        // Combination
        // ============================================================
        section_heading(ui, "Combine");
        let combo = &mut session.combination;
        ui.checkbox(&mut combo.enabled, "Combine data from multiple files");
        if combo.enabled {
            egui::ComboBox::from_label("Rule")
                .selected_text(combo.rule.label())
                .show_ui(ui, |ui| {
                    for rule in CombineRule::ALL {
                        ui.selectable_value(&mut combo.rule, rule, rule.label());
                    }
                });
            ui.label("Files to combine:");
            for parsed in &outcome.parsed {
                let mut selected = combo.is_selected(parsed.upload_id);
                if ui
                    .checkbox(&mut selected, parsed.series.source_name.as_str())
                    .changed()
                {
                    combo.set_selected(parsed.upload_id, selected);
                }
            }
            if !combo.has_parsed_selection(outcome) {
                ui.label(egui::RichText::new("Select at least one file to combine.").weak());
            }
        }

        // ============================================================
        // Appearance
        // ============================================================
        section_heading(ui, "Bars");
        if display.entries().is_empty() {
            ui.label(egui::RichText::new("No data loaded.").weak());
        } else {
            show_entry_list(ui, outcome, display);
        }

        ui.add_space(6.0);
        ui.add(egui::Slider::new(&mut session.font_size, FONT_SIZE_RANGE).step_by(1.0).text("Font size"));
        ui.horizontal(|ui| {
            ui.label("Y axis");
            ui.text_edit_singleline(&mut session.y_axis_label);
        });

        // ============================================================
        // Export
        // ============================================================
        section_heading(ui, "Export");
        ui.horizontal(|ui| {
            ui.label("File name");
            ui.add(egui::TextEdit::singleline(&mut session.output_name).desired_width(140.0));
        });
        ui.checkbox(&mut session.round_export, "Round to 2 decimals");

        ui.horizontal_wrapped(|ui| {
            if ui.add_enabled(has_rows, egui::Button::new("Save PNG")).clicked() {
                actions.push(ControlAction::ExportImageSave);
            }
            if ui.add_enabled(has_rows, egui::Button::new("Copy Image")).clicked() {
                actions.push(ControlAction::ExportImageClipboard);
            }
            if ui.add_enabled(has_rows, egui::Button::new("Save Excel")).clicked() {
                actions.push(ControlAction::ExportTable);
            }
            if ui.add_enabled(has_rows, egui::Button::new("Copy Table")).clicked() {
                actions.push(ControlAction::CopyTable);
            }
        });
    });

    actions
}

/// One row per entry: reorder buttons, visibility, color and label.
fn show_entry_list(ui: &mut egui::Ui, outcome: &LoadOutcome, display: &mut DisplayController) {
    let mut move_up: Option<EntryKey> = None;
    let mut move_down: Option<EntryKey> = None;
    let count = display.entries().len();

    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(6))
        .show(ui, |ui| {
            for (i, entry) in display.entries_mut().iter_mut().enumerate() {
                let loaded = match entry.key {
                    EntryKey::File(id) => outcome.by_upload_id(id).is_some(),
                    EntryKey::Combined => true,
                };
                ui.push_id(entry.key, |ui| {
                    ui.add_enabled_ui(loaded, |ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.spacing_mut().item_spacing.y = 0.0;
                                let up_btn = ui
                                    .add_enabled(
                                        i > 0,
                                        egui::Button::new(egui::RichText::new("^").size(9.0))
                                            .frame(false)
                                            .min_size(egui::vec2(16.0, 12.0)),
                                    )
                                    .on_hover_text("Move left");
                                if up_btn.clicked() {
                                    move_up = Some(entry.key);
                                }
                                let down_btn = ui
                                    .add_enabled(
                                        i + 1 < count,
                                        egui::Button::new(egui::RichText::new("v").size(9.0))
                                            .frame(false)
                                            .min_size(egui::vec2(16.0, 12.0)),
                                    )
                                    .on_hover_text("Move right");
                                if down_btn.clicked() {
                                    move_down = Some(entry.key);
                                }
                            });

                            ui.checkbox(&mut entry.visible, "")
                                .on_hover_text("Show/hide bar");

                            ui.color_edit_button_srgba_unmultiplied(&mut entry.color);

                            egui::ComboBox::from_id_salt("palette")
                                .selected_text(palette::name_of(entry.color).unwrap_or("Custom"))
                                .width(90.0)
                                .show_ui(ui, |ui| {
                                    for (name, color) in COLOR_PALETTE {
                                        ui.selectable_value(&mut entry.color, color, name);
                                    }
                                });

                            ui.add(egui::TextEdit::singleline(&mut entry.label).desired_width(140.0))
                                .on_hover_text(format!("Source: {}", entry.source_name));
                        });
                    });
                });
            }
        });

    if let Some(key) = move_up {
        display.move_up(key);
    }
    if let Some(key) = move_down {
        display.move_down(key);
    }
}
