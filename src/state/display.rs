use crate::processing::pipeline::LoadOutcome;
use crate::processing::statistics::Summary;
use crate::state::palette::{color_for_index, COMBINED_COLOR};
use crate::state::upload_set::UploadSet;

pub const COMBINED_LABEL: &str = "Combined";

/// Identity of a displayed entry, stable across recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKey {
    File(u64),
    Combined,
}

/// User-controlled appearance of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySettings {
    pub key: EntryKey,
    pub source_name: String,
    pub label: String,
    pub color: [u8; 4],
    pub visible: bool,
}

/// One bar of the chart and one line of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub key: EntryKey,
    pub label: String,
    pub source_name: String,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub count: usize,
    pub color: [u8; 4],
}

/// Keeps labels, colors, visibility and display order of the active entries.
///
/// The position of an entry in `entries` is its order rank. New entries are
/// appended, so display order only changes when the user moves an entry.
#[derive(Debug, Default)]
pub struct DisplayController {
    entries: Vec<EntrySettings>,
}

impl DisplayController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the entry list with the current pipeline output.
    ///
    /// Entries for files removed from the upload set are forgotten, as is the
    /// combined entry when there is no combination. A file that currently
    /// fails to parse keeps its entry and simply produces no row.
    pub fn sync(&mut self, uploads: &UploadSet, outcome: &LoadOutcome, combined: Option<&Summary>) {
        self.entries.retain(|e| match e.key {
            EntryKey::File(id) => uploads.upload_index(id).is_some(),
            EntryKey::Combined => combined.is_some(),
        });

        for parsed in &outcome.parsed {
            let key = EntryKey::File(parsed.upload_id);
            if self.position(key).is_none() {
                let index = uploads.upload_index(parsed.upload_id).unwrap_or(self.entries.len());
                self.entries.push(EntrySettings {
                    key,
                    source_name: parsed.series.source_name.clone(),
                    label: parsed.series.source_name.clone(),
                    color: color_for_index(index),
                    visible: true,
                });
            }
        }

        if combined.is_some() && self.position(EntryKey::Combined).is_none() {
            self.entries.push(EntrySettings {
                key: EntryKey::Combined,
                source_name: COMBINED_LABEL.to_string(),
                label: COMBINED_LABEL.to_string(),
                color: COMBINED_COLOR,
                visible: true,
            });
        }
    }

    pub fn entries(&self) -> &[EntrySettings] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [EntrySettings] {
        &mut self.entries
    }

    pub fn position(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    pub fn move_up(&mut self, key: EntryKey) {
        if let Some(pos) = self.position(key) {
            if pos > 0 {
                self.entries.swap(pos, pos - 1);
            }
        }
    }

    pub fn move_down(&mut self, key: EntryKey) {
        if let Some(pos) = self.position(key) {
            if pos + 1 < self.entries.len() {
                self.entries.swap(pos, pos + 1);
            }
        }
    }

    /// The ordered, visible rows shared by the chart and the table.
    ///
    /// An entry without a mean is never emitted.
    pub fn rows(&self, outcome: &LoadOutcome, combined: Option<&Summary>) -> Vec<SummaryRow> {
        self.entries
            .iter()
            .filter(|e| e.visible)
            .filter_map(|e| {
                let summary = match e.key {
                    EntryKey::File(id) => outcome.by_upload_id(id).map(|p| &p.summary),
                    EntryKey::Combined => combined,
                }?;
                Some(SummaryRow {
                    key: e.key,
                    label: e.label.clone(),
                    source_name: e.source_name.clone(),
                    mean: summary.mean?,
                    std_dev: summary.std_dev,
                    count: summary.count,
                    color: e.color,
                })
            })
            .collect()
    }
}
