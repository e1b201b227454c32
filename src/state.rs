use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::EXPORT_MIME;
use crate::data::loader::load_file;
use crate::data::model::ColumnId;
use crate::session::{Role, Session};

// ---------------------------------------------------------------------------
// User actions
// ---------------------------------------------------------------------------

/// Something the user asked for during a frame. Panels collect these and the
/// state applies them once rendering is done.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    OpenFile(PathBuf),
    SetHeaderIndex(i64),
    SetRoleColumn(Role, ColumnId),
    SetRoleValue(Role, String),
    SetExportColumns(Vec<ColumnId>),
    ToggleExportColumn(ColumnId, bool),
    SaveExport(PathBuf),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Current upload (None until user loads a file).
    pub session: Option<Session>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Where the last export was written.
    pub last_export: Option<PathBuf>,
}

impl AppState {
    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::OpenFile(path) => self.load_path(&path),
            UiAction::SaveExport(path) => match self.save_export(&path) {
                Ok(()) => {
                    self.status_message = None;
                    self.last_export = Some(path);
                }
                Err(e) => {
                    log::error!("Failed to save export: {e:#}");
                    self.status_message = Some(format!("Error: {e:#}"));
                }
            },
            other => self.update_session(other),
        }
    }

    /// Decode a file and start a new session on it. The previous session is
    /// discarded whether or not decoding succeeds.
    pub fn load_path(&mut self, path: &Path) {
        self.session = None;
        self.last_export = None;
        match load_file(path) {
            Ok(raw) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                log::info!(
                    "Loaded {name}: {} rows, {} columns",
                    raw.row_count(),
                    raw.width()
                );
                let session = Session::new(name, raw);
                self.status_message = session.view().err().map(|e| format!("Error: {e}"));
                self.session = Some(session);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn update_session(&mut self, action: UiAction) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let result = match action {
            UiAction::SetHeaderIndex(index) => session.set_header_index(index),
            UiAction::SetRoleColumn(role, column) => session.set_role_column(role, column),
            UiAction::SetRoleValue(role, value) => session.set_role_value(role, value),
            UiAction::SetExportColumns(columns) => session.set_export_columns(columns),
            UiAction::ToggleExportColumn(column, include) => {
                session.toggle_export_column(column, include)
            }
            UiAction::OpenFile(_) | UiAction::SaveExport(_) => Ok(()),
        };
        self.status_message = result.err().map(|e| format!("Error: {e}"));
    }

    /// Write the current export to `path`.
    pub fn save_export(&self, path: &Path) -> Result<()> {
        let session = self.session.as_ref().context("no file loaded")?;
        let bytes = session.export()?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Saved {} bytes of {EXPORT_MIME} to {}",
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap_or_else(|e| panic!("write {name}: {e}"));
        path
    }

    const TIMETABLE: &str = "Timetable,,\nSem,Sec,Sch\n1,A,SCSE\n1,B,SBAS\n2,A,SCSE\n";

    #[test]
    fn load_then_filter_then_save() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
        let source = write_file(dir.path(), "timetable.csv", TIMETABLE);

        let mut state = AppState::default();
        state.apply(UiAction::OpenFile(source));
        assert!(state.status_message.is_none());

        state.apply(UiAction::SetHeaderIndex(1));
        state.apply(UiAction::SetRoleColumn(Role::Semester, ColumnId(0)));
        state.apply(UiAction::SetRoleColumn(Role::Section, ColumnId(1)));
        state.apply(UiAction::SetRoleColumn(Role::School, ColumnId(2)));
        state.apply(UiAction::SetRoleValue(Role::Semester, "1".into()));
        state.apply(UiAction::SetRoleValue(Role::Section, "B".into()));
        state.apply(UiAction::ToggleExportColumn(ColumnId(1), false));
        assert!(state.status_message.is_none());

        let target = dir.path().join("filtered_results.csv");
        state.apply(UiAction::SaveExport(target.clone()));
        assert_eq!(state.last_export.as_deref(), Some(target.as_path()));

        let written = std::fs::read_to_string(&target).unwrap_or_default();
        assert_eq!(written, "Sem,Sch\n1,SBAS\n");
    }

    #[test]
    fn decode_failure_discards_previous_session() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
        let good = write_file(dir.path(), "good.csv", TIMETABLE);
        let bad = write_file(dir.path(), "bad.xlsx", "not a workbook");

        let mut state = AppState::default();
        state.apply(UiAction::OpenFile(good));
        assert!(state.session.is_some());

        state.apply(UiAction::OpenFile(bad));
        assert!(state.session.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn invalid_header_is_reported_and_recoverable() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
        let source = write_file(dir.path(), "timetable.csv", TIMETABLE);

        let mut state = AppState::default();
        state.apply(UiAction::OpenFile(source));
        state.apply(UiAction::SetHeaderIndex(9));
        assert!(state.status_message.is_some());
        assert!(state
            .session
            .as_ref()
            .is_some_and(|s| s.view().is_err()));

        state.apply(UiAction::SetHeaderIndex(1));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn saving_an_empty_selection_fails() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
        let source = write_file(dir.path(), "timetable.csv", TIMETABLE);

        let mut state = AppState::default();
        state.apply(UiAction::OpenFile(source));
        state.apply(UiAction::SetExportColumns(Vec::new()));

        let target = dir.path().join("out.csv");
        state.apply(UiAction::SaveExport(target.clone()));
        assert!(state.status_message.is_some());
        assert!(state.last_export.is_none());
        assert!(!target.exists());
    }
}
