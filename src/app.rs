use std::sync::Arc;

use eframe::egui;

use crate::config::AppConfig;
use crate::data::cleaner::RowPolicy;
use crate::data::export::{self, ExportError};
use crate::data::loader;
use crate::processing::pipeline::{self, LoadOutcome};
use crate::processing::statistics::Summary;
use crate::state::display::{DisplayController, SummaryRow};
use crate::state::session::Session;
use crate::state::upload_set::UploadSet;
use crate::ui::chart_panel;
use crate::ui::controls_panel::{self, ControlAction};
use crate::ui::table_panel;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What to do when a screenshot arrives.
enum PendingScreenshot {
    SaveFile,
    Clipboard,
}

/// Last export outcome, shown in the footer until dismissed.
enum Status {
    Info(String),
    Error(String),
}

/// The main AnglePlot application.
pub struct AnglePlotApp {
    session: Session,
    uploads: UploadSet,
    outcome: LoadOutcome,
    display: DisplayController,
    /// Upload revision and row policy the current `outcome` was built from.
    loaded_key: Option<(u64, RowPolicy)>,
    status: Option<Status>,
    pending_screenshot: Option<PendingScreenshot>,
    /// Screen rect of the chart (set each frame for screenshot cropping).
    chart_rect: Option<egui::Rect>,
}

impl AnglePlotApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(14.5),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(22.0),
        );
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);
        ctx.set_visuals(config.theme.visuals());

        Self {
            session: Session::from_config(&config),
            uploads: UploadSet::new(),
            outcome: LoadOutcome::default(),
            display: DisplayController::new(),
            loaded_key: None,
            status: None,
            pending_screenshot: None,
            chart_rect: None,
        }
    }

    /// Rerun the pipeline from the current inputs. Files are only re-read
    /// when the upload set or the row policy changed.
    fn refresh(&mut self) -> Option<Summary> {
        let key = (self.uploads.revision(), self.session.row_policy);
        if self.loaded_key != Some(key) {
            tracing::debug!(
                "Reloading {} file(s) with {:?}",
                self.uploads.files().len(),
                self.session.row_policy
            );
            self.outcome = pipeline::load_all(&self.uploads, self.session.row_policy);
            self.loaded_key = Some(key);
        }

        self.session.combination.sync(&self.uploads, &self.outcome);
        let combined = self.session.combination.combine(&self.outcome);
        self.display.sync(&self.uploads, &self.outcome, combined.as_ref());
        combined
    }

    fn add_paths(&mut self, paths: impl IntoIterator<Item = std::path::PathBuf>) {
        for path in paths {
            if !loader::is_supported(&path) {
                tracing::warn!("Ignoring unsupported file {:?}", path);
                continue;
            }
            if self.uploads.add(&path) {
                tracing::info!("Added {:?}", path);
            }
        }
    }

    fn open_file_dialog(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Data Files", &loader::SUPPORTED_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_files()
        {
            self.add_paths(paths);
        }
    }

    fn report(&mut self, result: Result<String, ExportError>) {
        match result {
            Ok(msg) => self.status = Some(Status::Info(msg)),
            Err(e) => {
                tracing::error!("{e}");
                self.status = Some(Status::Error(e.to_string()));
            }
        }
    }

    fn export_table(&mut self, rows: &[SummaryRow]) {
        let file_name = export::output_file_name(&self.session.output_name, "xlsx");
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&file_name)
            .add_filter("Excel Workbook", &["xlsx"])
            .save_file()
        {
            let result = export::write_xlsx(rows, &path, self.session.round_export)
                .map(|()| format!("Saved {}", path.display()));
            self.report(result);
        }
    }

    fn copy_table(&mut self, rows: &[SummaryRow]) {
        let result = export::ensure_rows(rows)
            .and_then(|()| export::copy_text(export::table_tsv(rows, self.session.round_export)))
            .map(|()| "Copied table to clipboard".to_string());
        self.report(result);
    }

    /// Crop the full-window screenshot to the chart and save or copy it.
    fn handle_screenshot(&mut self, ctx: &egui::Context, color_image: Arc<egui::ColorImage>) {
        let Some(action) = self.pending_screenshot.take() else {
            return;
        };

        let (rgba, width, height) =
            export::crop_rgba(&color_image, self.chart_rect, ctx.pixels_per_point());

        let result = match action {
            PendingScreenshot::SaveFile => {
                let file_name = export::output_file_name(&self.session.output_name, "png");
                match rfd::FileDialog::new()
                    .set_file_name(&file_name)
                    .add_filter("PNG Image", &["png"])
                    .save_file()
                {
                    Some(path) => export::save_png(rgba, width, height, &path)
                        .map(|()| format!("Saved {}", path.display())),
                    None => return,
                }
            }
            PendingScreenshot::Clipboard => export::copy_image(rgba, width, height)
                .map(|()| "Copied chart to clipboard".to_string()),
        };
        self.report(result);
    }
}

impl eframe::App for AnglePlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.session.theme.visuals());

        // ------------------------------------------------------------------
        // 0. Handle screenshot events from previous frame
        // ------------------------------------------------------------------
        if self.pending_screenshot.is_some() {
            let screenshot = ctx.input(|i| {
                i.raw.events.iter().find_map(|event| match event {
                    egui::Event::Screenshot { image, .. } => Some(image.clone()),
                    _ => None,
                })
            });
            if let Some(image) = screenshot {
                self.handle_screenshot(ctx, image);
            }
        }

        // ------------------------------------------------------------------
        // 1. Handle dropped files
        // ------------------------------------------------------------------
        let dropped: Vec<std::path::PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.add_paths(dropped);
        }

        let combined = self.refresh();
        let has_rows = !self.display.rows(&self.outcome, combined.as_ref()).is_empty();

        // --- Header panel ---
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("AnglePlot");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(self.session.theme.toggle_label()).clicked() {
                            self.session.theme = self.session.theme.toggle();
                        }
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        // --- Footer panel: per-file warnings and export status ---
        let warning_color = self.session.theme.warning_color();
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                for warning in &self.outcome.warnings {
                    ui.colored_label(warning_color, warning.to_string());
                }
                let mut dismiss = false;
                match &self.status {
                    Some(Status::Info(msg)) => {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(msg).weak());
                            dismiss = ui.small_button("dismiss").clicked();
                        });
                    }
                    Some(Status::Error(msg)) => {
                        ui.horizontal(|ui| {
                            ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                            dismiss = ui.small_button("dismiss").clicked();
                        });
                    }
                    None => {
                        let count = self.outcome.parsed.len();
                        let label = if count == 1 { "1 file loaded".to_string() } else { format!("{count} files loaded") };
                        ui.label(egui::RichText::new(label).weak());
                    }
                }
                if dismiss {
                    self.status = None;
                }
            });

        // --- Side panel with all controls ---
        let actions = egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| {
                controls_panel::show_controls(
                    ui,
                    &mut self.uploads,
                    &self.outcome,
                    &mut self.session,
                    &mut self.display,
                    has_rows,
                )
            })
            .inner;

        // Controls may have changed any input, so rebuild before drawing.
        let combined = self.refresh();
        let rows = self.display.rows(&self.outcome, combined.as_ref());

        // --- Central panel: chart above table ---
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.outcome.parsed.is_empty() {
                self.chart_rect = None;
                ui.add_space(80.0);
                ui.vertical_centered(|ui| {
                    if self.uploads.is_empty() {
                        ui.heading("Welcome to AnglePlot");
                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new(
                                "Click \"+ Add Files\" or drag-and-drop Excel / CSV measurement files to get started.",
                            )
                            .weak(),
                        );
                    } else {
                        ui.heading("No file could be read");
                        ui.add_space(12.0);
                        ui.label(egui::RichText::new("See the warnings below for details.").weak());
                    }
                });
                return;
            }

            let chart_height = (ui.available_height() * 0.6).max(260.0);
            self.chart_rect = Some(chart_panel::show_chart(
                ui,
                &rows,
                self.session.font_size,
                &self.session.y_axis_label,
                &self.session.theme,
                chart_height,
            ));
            ui.add_space(10.0);
            table_panel::show_table(ui, &rows);
        });

        // ------------------------------------------------------------------
        // 2. Process side panel actions
        // ------------------------------------------------------------------
        for action in actions {
            let exports_rows = !matches!(action, ControlAction::AddFiles);
            if exports_rows && rows.is_empty() {
                self.report(Err(ExportError::NothingToExport));
                continue;
            }
            match action {
                ControlAction::AddFiles => self.open_file_dialog(),
                ControlAction::ExportImageSave => {
                    self.pending_screenshot = Some(PendingScreenshot::SaveFile);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
                }
                ControlAction::ExportImageClipboard => {
                    self.pending_screenshot = Some(PendingScreenshot::Clipboard);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
                }
                ControlAction::ExportTable => self.export_table(&rows),
                ControlAction::CopyTable => self.copy_table(&rows),
            }
        }
    }
}
