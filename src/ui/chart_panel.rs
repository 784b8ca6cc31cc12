use std::ops::RangeInclusive;

use egui_plot::{uniform_grid_spacer, Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::state::display::SummaryRow;
use crate::state::palette::color32;
use crate::state::theme::Theme;

const BAR_WIDTH: f64 = 0.6;
/// Half-width of the error bar caps, in bar-index units.
const CAP_HALF_WIDTH: f64 = 0.08;

/// Vertical whisker plus top and bottom caps for one bar.
fn error_bar_segments(x: f64, mean: f64, std_dev: f64) -> [[[f64; 2]; 2]; 3] {
    let lo = mean - std_dev;
    let hi = mean + std_dev;
    [
        [[x, lo], [x, hi]],
        [[x - CAP_HALF_WIDTH, hi], [x + CAP_HALF_WIDTH, hi]],
        [[x - CAP_HALF_WIDTH, lo], [x + CAP_HALF_WIDTH, lo]],
    ]
}

/// Tick label for a grid mark: the row label at integer positions only.
fn tick_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Draw the bar chart with error bars. Returns the screen rect of the chart
/// frame so a screenshot can be cropped to it.
pub fn show_chart(
    ui: &mut egui::Ui,
    rows: &[SummaryRow],
    font_size: f32,
    y_axis_label: &str,
    theme: &Theme,
    height: f32,
) -> egui::Rect {
    let frame_resp = egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(10))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            if rows.is_empty() {
                ui.set_min_height(height);
                ui.vertical_centered(|ui| {
                    ui.add_space(height / 3.0);
                    ui.label(egui::RichText::new("No bars to show.").weak());
                });
                return;
            }

            // Axis ticks and labels are drawn with the body style.
            let style = ui.style_mut();
            for text_style in [egui::TextStyle::Body, egui::TextStyle::Small] {
                style
                    .text_styles
                    .insert(text_style, egui::FontId::proportional(font_size));
            }

            let bars: Vec<Bar> = rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    Bar::new(i as f64, row.mean)
                        .width(BAR_WIDTH)
                        .fill(color32(row.color))
                        .name(&row.label)
                })
                .collect();

            let whisker_color = theme.error_bar_color();
            let whiskers: Vec<Line> = rows
                .iter()
                .enumerate()
                .filter_map(|(i, row)| row.std_dev.map(|sd| error_bar_segments(i as f64, row.mean, sd)))
                .flatten()
                .map(|segment| {
                    Line::new(PlotPoints::new(segment.to_vec()))
                        .color(whisker_color)
                        .width(1.5)
                })
                .collect();

            let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
            let last = rows.len() as f64 - 1.0;

            Plot::new("summary_chart")
                .height(height)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .allow_double_click_reset(false)
                .show_x(false)
                .include_y(0.0)
                .include_x(-0.5)
                .include_x(last + 0.5)
                .y_axis_label(y_axis_label.to_string())
                .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
                .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                    tick_label(&labels, mark.value)
                })
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars));
                    for line in whiskers {
                        plot_ui.line(line);
                    }
                });
        });

    frame_resp.response.rect
}
