use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use thiserror::Error;

use crate::state::display::SummaryRow;

pub const TABLE_HEADERS: [&str; 4] = ["Label", "Mean", "Std Dev", "Source File"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: no rows are displayed")]
    NothingToExport,

    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to save image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Screenshot has unexpected size {width}x{height}")]
    ImageSize { width: usize, height: usize },

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// `<base>.<extension>`, with a fallback when the base name is blank.
pub fn output_file_name(base: &str, extension: &str) -> String {
    let base = base.trim();
    let base = if base.is_empty() { "results" } else { base };
    format!("{base}.{extension}")
}

fn rounded(value: f64, round: bool) -> f64 {
    if round {
        (value * 100.0).round() / 100.0
    } else {
        value
    }
}

/// Every export refuses an empty table.
pub fn ensure_rows(rows: &[SummaryRow]) -> Result<(), ExportError> {
    if rows.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    Ok(())
}

/// Write the displayed table as a single-sheet workbook.
///
/// An unavailable std dev is left as an empty cell.
pub fn write_xlsx(rows: &[SummaryRow], path: &Path, round: bool) -> Result<(), ExportError> {
    ensure_rows(rows)?;

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, header) in TABLE_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    sheet.set_column_width(0, 28)?;
    sheet.set_column_width(3, 28)?;

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &row.label)?;
        sheet.write_number(r, 1, rounded(row.mean, round))?;
        if let Some(sd) = row.std_dev {
            sheet.write_number(r, 2, rounded(sd, round))?;
        }
        sheet.write_string(r, 3, &row.source_name)?;
    }

    workbook.save(path)?;
    tracing::info!("Exported table to {:?}", path);
    Ok(())
}

/// Tab-separated rendering of the displayed table, for the clipboard.
pub fn table_tsv(rows: &[SummaryRow], round: bool) -> String {
    let mut out = TABLE_HEADERS.join("\t");
    out.push('\n');
    for row in rows {
        let mean = rounded(row.mean, round);
        let std_dev = row
            .std_dev
            .map(|sd| rounded(sd, round).to_string())
            .unwrap_or_default();
        out.push_str(&format!("{}\t{mean}\t{std_dev}\t{}\n", row.label, row.source_name));
    }
    out
}

/// RGBA bytes of `image`, cropped to `rect` (in points) when given.
///
/// The rect is clamped to the image, so a chart partly off screen yields a
/// smaller image rather than a panic.
pub fn crop_rgba(image: &egui::ColorImage, rect: Option<egui::Rect>, ppp: f32) -> (Vec<u8>, usize, usize) {
    let full_w = image.width();
    let full_h = image.height();
    let Some(rect) = rect else {
        let rgba = image
            .pixels
            .iter()
            .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
            .collect();
        return (rgba, full_w, full_h);
    };

    let x0 = ((rect.left() * ppp).max(0.0) as usize).min(full_w);
    let y0 = ((rect.top() * ppp).max(0.0) as usize).min(full_h);
    let x1 = ((rect.right() * ppp).ceil().max(0.0) as usize).min(full_w);
    let y1 = ((rect.bottom() * ppp).ceil().max(0.0) as usize).min(full_h);
    let (cw, ch) = (x1.saturating_sub(x0), y1.saturating_sub(y0));

    let mut cropped = Vec::with_capacity(cw * ch * 4);
    for row in y0..y0 + ch {
        for c in &image.pixels[row * full_w + x0..row * full_w + x0 + cw] {
            cropped.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
        }
    }
    (cropped, cw, ch)
}

pub fn save_png(rgba: Vec<u8>, width: usize, height: usize, path: &Path) -> Result<(), ExportError> {
    let img = image::RgbaImage::from_raw(width as u32, height as u32, rgba)
        .ok_or(ExportError::ImageSize { width, height })?;
    img.save(path)?;
    tracing::info!("Saved chart image to {:?}", path);
    Ok(())
}

pub fn copy_text(text: String) -> Result<(), ExportError> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

pub fn copy_image(rgba: Vec<u8>, width: usize, height: usize) -> Result<(), ExportError> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_image(arboard::ImageData {
        width,
        height,
        bytes: std::borrow::Cow::Owned(rgba),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::display::EntryKey;
    use calamine::{open_workbook_auto, Data, Reader};

    fn rows() -> Vec<SummaryRow> {
        vec![
            SummaryRow {
                key: EntryKey::File(2),
                label: "Treated".to_string(),
                source_name: "b.xlsx".to_string(),
                mean: 101.23456,
                std_dev: Some(1.98765),
                count: 5,
                color: [0, 0, 0, 255],
            },
            SummaryRow {
                key: EntryKey::File(1),
                label: "Single".to_string(),
                source_name: "a.xlsx".to_string(),
                mean: 88.0,
                std_dev: None,
                count: 1,
                color: [0, 0, 0, 255],
            },
        ]
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("run_3", "png"), "run_3.png");
        assert_eq!(output_file_name("  ", "xlsx"), "results.xlsx");
    }

    #[test]
    fn test_tsv_follows_row_order() {
        let text = table_tsv(&rows(), true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Label\tMean\tStd Dev\tSource File");
        assert_eq!(lines[1], "Treated\t101.23\t1.99\tb.xlsx");
        assert_eq!(lines[2], "Single\t88\t\ta.xlsx");
    }

    #[test]
    fn test_xlsx_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(output_file_name("summary", "xlsx"));
        write_xlsx(&rows(), &path, true).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let name = workbook.sheet_names()[0].clone();
        let range = workbook.worksheet_range(&name).unwrap();
        let cells: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

        assert_eq!(cells[0][0], Data::String("Label".to_string()));
        assert_eq!(cells[1][0], Data::String("Treated".to_string()));
        assert_eq!(cells[1][1], Data::Float(101.23));
        assert_eq!(cells[1][2], Data::Float(1.99));
        assert_eq!(cells[2][2], Data::Empty);
        assert_eq!(cells[2][3], Data::String("a.xlsx".to_string()));
    }

    #[test]
    fn test_empty_table_is_not_exported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        assert!(matches!(
            write_xlsx(&[], &path, false),
            Err(ExportError::NothingToExport)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_every_export_refuses_an_empty_table() {
        assert!(matches!(ensure_rows(&[]), Err(ExportError::NothingToExport)));
        assert!(ensure_rows(&rows()).is_ok());
    }

    /// 4x3 image whose red channel is the column and green is the row.
    fn gradient() -> egui::ColorImage {
        let mut bytes = Vec::new();
        for y in 0..3u8 {
            for x in 0..4u8 {
                bytes.extend_from_slice(&[x, y, 0, 255]);
            }
        }
        egui::ColorImage::from_rgba_unmultiplied([4, 3], &bytes)
    }

    #[test]
    fn test_crop_to_chart_rect() {
        let image = gradient();
        let rect = egui::Rect::from_min_max(egui::pos2(1.0, 1.0), egui::pos2(3.0, 2.0));
        let (rgba, w, h) = crop_rgba(&image, Some(rect), 1.0);
        assert_eq!((w, h), (2, 1));
        assert_eq!(rgba, vec![1, 1, 0, 255, 2, 1, 0, 255]);

        let scaled = egui::Rect::from_min_max(egui::pos2(0.5, 0.5), egui::pos2(1.5, 1.0));
        assert_eq!(crop_rgba(&image, Some(scaled), 2.0), (rgba, 2, 1));
    }

    #[test]
    fn test_crop_clamps_to_image() {
        let image = gradient();
        let rect = egui::Rect::from_min_max(egui::pos2(3.0, 2.0), egui::pos2(50.0, 50.0));
        let (rgba, w, h) = crop_rgba(&image, Some(rect), 1.0);
        assert_eq!((w, h), (1, 1));
        assert_eq!(rgba, vec![3, 2, 0, 255]);

        let (full, w, h) = crop_rgba(&image, None, 1.0);
        assert_eq!((w, h), (4, 3));
        assert_eq!(full.len(), 4 * 3 * 4);
    }

    #[test]
    fn test_png_size_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let err = save_png(vec![0; 7], 2, 2, &path).unwrap_err();
        assert!(matches!(err, ExportError::ImageSize { width: 2, height: 2 }));

        save_png(vec![255; 16], 2, 2, &path).unwrap();
        assert!(path.exists());
    }
}
