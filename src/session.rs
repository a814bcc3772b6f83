//! Per-file state for a single user session
//!
//! Each uploaded file gets a `FileState` keyed by a `FileId` that is never
//! reused, so removing or reordering files never shifts another file's
//! choices. Every view is recomputed from the cached parse.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::chart::BarChart;
use crate::clean::{apply_steps, CleanReport, CleaningStep};
use crate::config::{ExportFormat, FileOptions};
use crate::error::SessionError;
use crate::export::{export, ExportArtifact};
use crate::model::Table;
use crate::parser::{ParserFactory, UploadedFile};
use crate::select::apply_selection;

/// Stable identifier of an uploaded file within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(u64);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the session remembers about one file
#[derive(Debug, Clone)]
pub struct FileState {
    upload: UploadedFile,
    source: Table,
    warning: Option<String>,
    /// Enabled cleaning steps in activation order
    steps: Vec<CleaningStep>,
    selection: Option<Vec<String>>,
    show_chart: bool,
    format: ExportFormat,
}

impl FileState {
    pub fn name(&self) -> &str {
        &self.upload.name
    }

    /// Table as parsed, before any cleaning
    pub fn source(&self) -> &Table {
        &self.source
    }

    /// Warning raised while parsing, if the header had to be dropped
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn steps(&self) -> &[CleaningStep] {
        &self.steps
    }

    pub fn selection(&self) -> Option<&[String]> {
        self.selection.as_deref()
    }

    pub fn show_chart(&self) -> bool {
        self.show_chart
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    fn set_step(&mut self, step: CleaningStep, enabled: bool) {
        let active = self.steps.contains(&step);
        if enabled && !active {
            self.steps.push(step);
        } else if !enabled && active {
            self.steps.retain(|s| *s != step);
        }
    }
}

/// Recomputed result for one file
#[derive(Debug, Clone)]
pub struct FileView {
    /// After cleaning, before column selection
    pub cleaned: Table,
    pub report: CleanReport,
    /// After column selection; this is what gets exported
    pub table: Table,
    /// Present when the chart toggle is on and a numeric column exists
    pub chart: Option<BarChart>,
}

/// Session-scoped store of uploaded files
#[derive(Debug, Default)]
pub struct Session {
    files: IndexMap<FileId, FileState>,
    next_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a file. A failed parse registers nothing.
    pub fn upload(&mut self, upload: UploadedFile) -> Result<FileId, SessionError> {
        let (source, warning) = ParserFactory::new()
            .ingest(&upload)
            .into_result()
            .map_err(|source| SessionError::Ingest {
                file: upload.name.clone(),
                source,
            })?;

        if let Some(ref message) = warning {
            warn!(file = %upload.name, "{}", message);
        }

        let id = FileId(self.next_id);
        self.next_id += 1;

        info!(
            file = %upload.name,
            id = %id,
            rows = source.row_count(),
            columns = source.column_count(),
            "file loaded"
        );

        self.files.insert(
            id,
            FileState {
                upload,
                source,
                warning,
                steps: Vec::new(),
                selection: None,
                show_chart: false,
                format: ExportFormat::default(),
            },
        );

        Ok(id)
    }

    /// Upload a file and apply a full set of options at once
    pub fn upload_with_options(
        &mut self,
        upload: UploadedFile,
        options: &FileOptions,
    ) -> Result<FileId, SessionError> {
        let id = self.upload(upload)?;
        let state = self.state_mut(id)?;
        state.steps = CleaningStep::from_options(options);
        state.selection = options.columns.clone();
        state.show_chart = options.show_chart;
        state.format = options.format;
        Ok(id)
    }

    pub fn remove(&mut self, id: FileId) -> Option<FileState> {
        self.files.shift_remove(&id)
    }

    pub fn get(&self, id: FileId) -> Option<&FileState> {
        self.files.get(&id)
    }

    /// Ids in upload order
    pub fn file_ids(&self) -> Vec<FileId> {
        self.files.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn set_remove_duplicates(&mut self, id: FileId, enabled: bool) -> Result<(), SessionError> {
        self.state_mut(id)?
            .set_step(CleaningStep::RemoveDuplicates, enabled);
        Ok(())
    }

    pub fn set_fill_missing(&mut self, id: FileId, enabled: bool) -> Result<(), SessionError> {
        self.state_mut(id)?.set_step(CleaningStep::FillMissing, enabled);
        Ok(())
    }

    /// Choose the columns to keep; `None` goes back to all columns
    pub fn select_columns(
        &mut self,
        id: FileId,
        columns: Option<Vec<String>>,
    ) -> Result<(), SessionError> {
        self.state_mut(id)?.selection = columns;
        Ok(())
    }

    pub fn set_show_chart(&mut self, id: FileId, enabled: bool) -> Result<(), SessionError> {
        self.state_mut(id)?.show_chart = enabled;
        Ok(())
    }

    pub fn set_export_format(
        &mut self,
        id: FileId,
        format: ExportFormat,
    ) -> Result<(), SessionError> {
        self.state_mut(id)?.format = format;
        Ok(())
    }

    /// Rerun cleaning, selection and charting from the cached parse
    pub fn view(&self, id: FileId) -> Result<FileView, SessionError> {
        let state = self.state(id)?;

        let mut cleaned = state.source.clone();
        let report = apply_steps(&mut cleaned, &state.steps);
        let table = apply_selection(cleaned.clone(), state.selection())?;
        let chart = if state.show_chart {
            BarChart::from_table(&table)
        } else {
            None
        };

        Ok(FileView {
            cleaned,
            report,
            table,
            chart,
        })
    }

    /// Serialize the current view in the file's chosen format
    pub fn export(&self, id: FileId) -> Result<ExportArtifact, SessionError> {
        let state = self.state(id)?;
        let view = self.view(id)?;
        let artifact = export(&view.table, state.format, state.name())?;
        info!(file = %state.name(), output = %artifact.file_name(), "processing complete");
        Ok(artifact)
    }

    fn state(&self, id: FileId) -> Result<&FileState, SessionError> {
        self.files.get(&id).ok_or(SessionError::UnknownFile(id))
    }

    fn state_mut(&mut self, id: FileId) -> Result<&mut FileState, SessionError> {
        self.files.get_mut(&id).ok_or(SessionError::UnknownFile(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn scenario_file() -> UploadedFile {
        UploadedFile::new("scores.csv", b"a,b\n1,\n1,4\n".to_vec())
    }

    #[test]
    fn test_ids_are_stable_after_removal() {
        let mut session = Session::new();
        let first = session.upload(scenario_file()).unwrap();
        let second = session.upload(scenario_file()).unwrap();
        session.set_fill_missing(second, true).unwrap();

        session.remove(first);

        assert_eq!(session.file_ids(), vec![second]);
        assert_eq!(session.get(second).unwrap().steps(), &[CleaningStep::FillMissing]);
        let third = session.upload(scenario_file()).unwrap();
        assert_ne!(third, first);
    }

    #[test]
    fn test_failed_upload_registers_nothing() {
        let mut session = Session::new();
        let err = session
            .upload(UploadedFile::new("broken.csv", Vec::new()))
            .unwrap_err();
        assert!(matches!(err, SessionError::Ingest { .. }));
        assert!(session.is_empty());
    }

    #[test]
    fn test_activation_order_drives_cleaning() {
        let mut session = Session::new();
        let id = session.upload(scenario_file()).unwrap();

        session.set_fill_missing(id, true).unwrap();
        let view = session.view(id).unwrap();
        assert_eq!(view.table.row_count(), 2);

        session.set_remove_duplicates(id, true).unwrap();
        let view = session.view(id).unwrap();
        assert_eq!(view.table.row_count(), 1);
        assert_eq!(view.table.rows[0].cells, vec![CellValue::Int(1), CellValue::Int(4)]);

        // Toggling fill off and back on moves it after dedupe
        session.set_fill_missing(id, false).unwrap();
        session.set_fill_missing(id, true).unwrap();
        let view = session.view(id).unwrap();
        assert_eq!(view.table.row_count(), 2);
    }

    #[test]
    fn test_toggle_is_applied_once() {
        let mut session = Session::new();
        let id = session.upload(scenario_file()).unwrap();
        session.set_fill_missing(id, true).unwrap();
        session.set_fill_missing(id, true).unwrap();
        assert_eq!(session.get(id).unwrap().steps().len(), 1);
    }

    #[test]
    fn test_selection_chart_and_export() {
        let mut session = Session::new();
        let id = session.upload(scenario_file()).unwrap();
        session
            .select_columns(id, Some(vec!["b".into(), "b".into()]))
            .unwrap();
        session.set_show_chart(id, true).unwrap();

        let view = session.view(id).unwrap();
        assert_eq!(view.table.column_names(), vec!["b", "b"]);
        assert_eq!(view.chart.as_ref().map(|c| c.series.len()), Some(2));

        let artifact = session.export(id).unwrap();
        assert_eq!(artifact.file_name(), "scores.csv");
        assert_eq!(artifact.bytes(), b"b,b\n,\n4,4\n");

        session.set_export_format(id, ExportFormat::Excel).unwrap();
        assert_eq!(session.export(id).unwrap().file_name(), "scores.xlsx");
    }

    #[test]
    fn test_unknown_selection_surfaces_error() {
        let mut session = Session::new();
        let id = session.upload(scenario_file()).unwrap();
        session.select_columns(id, Some(vec!["zzz".into()])).unwrap();
        assert!(matches!(session.view(id), Err(SessionError::Select(_))));
    }

    #[test]
    fn test_unknown_id() {
        let mut session = Session::new();
        let id = session.upload(scenario_file()).unwrap();
        session.remove(id);
        assert!(matches!(
            session.set_show_chart(id, true),
            Err(SessionError::UnknownFile(_))
        ));
    }
}
