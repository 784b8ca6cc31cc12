use crate::data::cleaner::{self, RowPolicy};
use crate::data::error::LoadError;
use crate::data::loader;
use crate::processing::statistics::{self, CombineRule, Summary};
use crate::state::measurement::MeasurementSeries;
use crate::state::upload_set::UploadSet;

/// A file that loaded and cleaned successfully.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub upload_id: u64,
    pub series: MeasurementSeries,
    pub summary: Summary,
}

/// Output of the load and clean stage for the whole upload set.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub parsed: Vec<ParsedFile>,
    /// One entry per file that produced no series.
    pub warnings: Vec<LoadError>,
}

impl LoadOutcome {
    pub fn by_upload_id(&self, upload_id: u64) -> Option<&ParsedFile> {
        self.parsed.iter().find(|p| p.upload_id == upload_id)
    }

    /// Combine the parsed files whose ids are in `selection`.
    ///
    /// Ids of files that failed to parse are ignored, so a selection made up
    /// only of failed files is empty and yields no combination.
    pub fn combine(&self, selection: &[u64], rule: CombineRule) -> Option<Summary> {
        let chosen: Vec<&MeasurementSeries> = self
            .parsed
            .iter()
            .filter(|p| selection.contains(&p.upload_id))
            .map(|p| &p.series)
            .collect();
        statistics::combine(&chosen, rule)
    }
}

/// Load, clean and summarize every uploaded file.
///
/// A failing file is logged and recorded as a warning; the rest of the batch
/// carries on.
pub fn load_all(uploads: &UploadSet, policy: RowPolicy) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for file in uploads.files() {
        let result = loader::load_file(&file.path).and_then(|sheet| cleaner::clean(sheet, policy));
        match result {
            Ok(series) => {
                let summary = statistics::summarize(&series);
                tracing::info!(
                    "Loaded {} ({} readings, mean {:?})",
                    series.source_name,
                    series.len(),
                    summary.mean
                );
                outcome.parsed.push(ParsedFile {
                    upload_id: file.id,
                    series,
                    summary,
                });
            }
            Err(e) => {
                tracing::warn!("{e}");
                outcome.warnings.push(e);
            }
        }
    }

    outcome
}
