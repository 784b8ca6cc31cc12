use egui_extras::{Column, TableBuilder};

use crate::state::display::SummaryRow;
use crate::state::palette::color32;

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "n/a".to_string(),
    }
}

/// Summary table in the same order as the chart bars.
pub fn show_table(ui: &mut egui::Ui, rows: &[SummaryRow]) {
    if rows.is_empty() {
        return;
    }

    let table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(18.0))
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(80.0), 3)
        .column(Column::remainder().at_least(120.0))
        .min_scrolled_height(120.0);

    table
        .header(20.0, |mut header| {
            for title in ["", "Label", "Mean", "Std Dev", "N", "Source File"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, color32(row.color));
                    });
                    table_row.col(|ui| {
                        ui.label(&row.label);
                    });
                    table_row.col(|ui| {
                        ui.label(format_value(Some(row.mean)));
                    });
                    table_row.col(|ui| {
                        ui.label(format_value(row.std_dev));
                    });
                    table_row.col(|ui| {
                        ui.label(row.count.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(egui::RichText::new(&row.source_name).weak());
                    });
                });
            }
        });
}
