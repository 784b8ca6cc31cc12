use crate::config::AppConfig;
use crate::data::cleaner::RowPolicy;
use crate::processing::pipeline::LoadOutcome;
use crate::processing::statistics::{CombineRule, Summary};
use crate::state::theme::Theme;
use crate::state::upload_set::UploadSet;

/// Which files feed the "Combined" entry and how.
#[derive(Debug, Clone, Default)]
pub struct CombinationSettings {
    pub enabled: bool,
    pub rule: CombineRule,
    selected: Vec<u64>,
    /// Files already offered for selection, so a deselected file stays
    /// deselected across recomputation.
    seen: Vec<u64>,
}

impl CombinationSettings {
    pub fn new(rule: CombineRule) -> Self {
        Self {
            rule,
            ..Self::default()
        }
    }

    /// Newly parsed files start out selected; files removed from the upload
    /// set are dropped from the selection. A file that fails to parse keeps
    /// its choice and is skipped by `combine`.
    pub fn sync(&mut self, uploads: &UploadSet, outcome: &LoadOutcome) {
        self.selected.retain(|id| uploads.upload_index(*id).is_some());
        self.seen.retain(|id| uploads.upload_index(*id).is_some());
        for parsed in &outcome.parsed {
            if !self.seen.contains(&parsed.upload_id) {
                self.seen.push(parsed.upload_id);
                self.selected.push(parsed.upload_id);
            }
        }
    }

    pub fn is_selected(&self, upload_id: u64) -> bool {
        self.selected.contains(&upload_id)
    }

    pub fn set_selected(&mut self, upload_id: u64, selected: bool) {
        let present = self.is_selected(upload_id);
        if selected && !present {
            self.selected.push(upload_id);
        } else if !selected && present {
            self.selected.retain(|id| *id != upload_id);
        }
    }

    pub fn selection(&self) -> &[u64] {
        &self.selected
    }

    /// Whether any selected file currently has parsed data.
    pub fn has_parsed_selection(&self, outcome: &LoadOutcome) -> bool {
        self.selected.iter().any(|id| outcome.by_upload_id(*id).is_some())
    }

    /// The combined statistic, or `None` when disabled or nothing is selected.
    pub fn combine(&self, outcome: &LoadOutcome) -> Option<Summary> {
        if !self.enabled {
            return None;
        }
        outcome.combine(&self.selected, self.rule)
    }
}

/// Everything the user can adjust while the window is open.
#[derive(Debug, Clone)]
pub struct Session {
    pub row_policy: RowPolicy,
    pub combination: CombinationSettings,
    pub font_size: f32,
    pub y_axis_label: String,
    pub output_name: String,
    pub round_export: bool,
    pub theme: Theme,
}

impl Session {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            row_policy: config.row_policy,
            combination: CombinationSettings::new(config.combine_rule),
            font_size: config.font_size,
            y_axis_label: config.y_axis_label.clone(),
            output_name: config.output_name.clone(),
            round_export: config.round_export,
            theme: config.theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::pipeline::ParsedFile;
    use crate::processing::statistics;
    use crate::state::measurement::MeasurementSeries;
    use std::path::Path;

    fn uploads(count: u64) -> UploadSet {
        let mut set = UploadSet::new();
        for i in 1..=count {
            set.add(Path::new(&format!("f{i}.xlsx")));
        }
        set
    }

    fn outcome(files: &[(u64, Vec<f64>)]) -> LoadOutcome {
        let mut outcome = LoadOutcome::default();
        for (id, values) in files {
            let series = MeasurementSeries::new(format!("f{id}.xlsx"), values.clone());
            let summary = statistics::summarize(&series);
            outcome.parsed.push(ParsedFile {
                upload_id: *id,
                series,
                summary,
            });
        }
        outcome
    }

    #[test]
    fn test_new_files_start_selected() {
        let out = outcome(&[(1, vec![1.0, 2.0, 3.0]), (2, vec![4.0, 5.0])]);
        let mut combo = CombinationSettings::new(CombineRule::RowPool);
        combo.sync(&uploads(2), &out);
        assert_eq!(combo.selection(), &[1, 2]);
    }

    #[test]
    fn test_disabled_means_no_combination() {
        let out = outcome(&[(1, vec![1.0, 2.0, 3.0])]);
        let mut combo = CombinationSettings::new(CombineRule::RowPool);
        combo.sync(&uploads(1), &out);
        assert_eq!(combo.combine(&out), None);
        combo.enabled = true;
        assert_eq!(combo.combine(&out).unwrap().mean, Some(2.0));
    }

    #[test]
    fn test_empty_selection_means_no_combination() {
        let out = outcome(&[(1, vec![1.0, 2.0, 3.0]), (2, vec![4.0, 5.0])]);
        let mut combo = CombinationSettings::new(CombineRule::MomentCombination);
        combo.enabled = true;
        combo.sync(&uploads(2), &out);
        combo.set_selected(1, false);
        combo.set_selected(2, false);
        assert_eq!(combo.combine(&out), None);
        assert!(!combo.has_parsed_selection(&out));
    }

    #[test]
    fn test_deselection_survives_resync() {
        let out = outcome(&[(1, vec![1.0]), (2, vec![2.0])]);
        let mut set = uploads(2);
        let mut combo = CombinationSettings::new(CombineRule::MomentCombination);
        combo.sync(&set, &out);
        combo.set_selected(1, false);
        combo.sync(&set, &out);
        assert!(!combo.is_selected(1));
        assert!(combo.is_selected(2));

        set.remove(2);
        let fewer = outcome(&[(1, vec![1.0])]);
        combo.sync(&set, &fewer);
        assert!(combo.selection().is_empty());
    }

    #[test]
    fn test_choice_survives_a_file_failing_to_parse() {
        let set = uploads(2);
        let out = outcome(&[(1, vec![1.0, 2.0, 3.0]), (2, vec![4.0, 5.0])]);
        let mut combo = CombinationSettings::new(CombineRule::RowPool);
        combo.enabled = true;
        combo.sync(&set, &out);
        combo.set_selected(1, false);

        // File 2 stops parsing under a stricter row filter.
        let strict = outcome(&[(1, vec![1.0, 2.0, 3.0])]);
        combo.sync(&set, &strict);
        assert!(combo.is_selected(2));
        assert!(!combo.has_parsed_selection(&strict));
        assert_eq!(combo.combine(&strict), None);

        combo.sync(&set, &out);
        assert!(!combo.is_selected(1));
        assert_eq!(combo.combine(&out).unwrap().mean, Some(4.5));
    }

    #[test]
    fn test_session_takes_config_defaults() {
        let config = AppConfig {
            combine_rule: CombineRule::RowPool,
            output_name: "batch7".to_string(),
            ..AppConfig::default()
        };
        let session = Session::from_config(&config);
        assert_eq!(session.combination.rule, CombineRule::RowPool);
        assert!(!session.combination.enabled);
        assert_eq!(session.output_name, "batch7");
        assert_eq!(session.row_policy, RowPolicy::DropIncomplete);
    }
}
