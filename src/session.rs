use crate::data::error::PipelineError;
use crate::data::export::export;
use crate::data::filter::{apply_filters, candidate_options, FilteredTable, Predicate};
use crate::data::header::promote_header;
use crate::data::model::{Column, ColumnId, HeaderIndex, RawTable, Table};
use crate::data::options::{sort_columns, OptionEntry};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The three selections, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Semester,
    Section,
    School,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Semester, Role::Section, Role::School];

    fn index(self) -> usize {
        self as usize
    }
}

/// Column and value chosen for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSelection {
    pub column: Option<ColumnId>,
    /// Cell value (not the displayed label) the role filters on.
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// Everything computed from a [`Session`]'s inputs. Rebuilt whole on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionView {
    pub table: Table,
    /// Column picker entries, sorted.
    pub column_choices: Vec<Column>,
    /// Value picker entries per role, each restricted by the roles before it.
    pub candidates: [Vec<OptionEntry>; 3],
    pub filtered: FilteredTable,
    /// Columns to export, in output order.
    pub export_columns: Vec<ColumnId>,
}

impl SessionView {
    pub fn candidates(&self, role: Role) -> &[OptionEntry] {
        &self.candidates[role.index()]
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's inputs: the decoded file, the header row, the three role
/// selections and the export columns.
#[derive(Debug, Clone)]
pub struct Session {
    source_name: String,
    raw: RawTable,
    header_index: HeaderIndex,
    roles: [RoleSelection; 3],
    /// `None` means every column in table order.
    export_columns: Option<Vec<ColumnId>>,
    view: Result<SessionView, PipelineError>,
}

impl Session {
    /// Start a session on a freshly decoded file with row 0 as the header.
    pub fn new(source_name: impl Into<String>, raw: RawTable) -> Self {
        let mut session = Session {
            source_name: source_name.into(),
            raw,
            header_index: HeaderIndex::default(),
            roles: Default::default(),
            export_columns: None,
            view: Ok(SessionView::default()),
        };
        session.recompute();
        session
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn raw(&self) -> &RawTable {
        &self.raw
    }

    pub fn header_index(&self) -> HeaderIndex {
        self.header_index
    }

    pub fn selection(&self, role: Role) -> &RoleSelection {
        &self.roles[role.index()]
    }

    /// The current derived state, or the error that prevents building it.
    pub fn view(&self) -> Result<&SessionView, &PipelineError> {
        self.view.as_ref()
    }

    /// Pick another header row. Role and export choices start over.
    pub fn set_header_index(&mut self, index: i64) -> Result<(), PipelineError> {
        match HeaderIndex::new(index) {
            Ok(header_index) => {
                self.header_index = header_index;
                self.roles = Default::default();
                self.export_columns = None;
                self.recompute();
                self.status()
            }
            Err(e) => {
                self.view = Err(e.clone());
                Err(e)
            }
        }
    }

    /// Point a role at another column; its value falls back to the first candidate.
    pub fn set_role_column(&mut self, role: Role, column: ColumnId) -> Result<(), PipelineError> {
        self.current_table()?.column(column)?;
        let selection = &mut self.roles[role.index()];
        if selection.column != Some(column) {
            selection.column = Some(column);
            selection.value = None;
        }
        self.recompute();
        self.status()
    }

    /// Choose a value for a role. A value that is not among the role's
    /// current candidates is replaced by the first candidate.
    pub fn set_role_value(&mut self, role: Role, value: impl Into<String>) -> Result<(), PipelineError> {
        self.roles[role.index()].value = Some(value.into());
        self.recompute();
        self.status()
    }

    /// Replace the export column list (order is kept).
    pub fn set_export_columns(&mut self, columns: Vec<ColumnId>) -> Result<(), PipelineError> {
        let table = self.current_table()?;
        for &id in &columns {
            table.column(id)?;
        }
        self.export_columns = Some(columns);
        self.recompute();
        self.status()
    }

    /// Add a column to the end of the export list, or remove it.
    pub fn toggle_export_column(&mut self, column: ColumnId, include: bool) -> Result<(), PipelineError> {
        let mut columns = match &self.view {
            Ok(view) => view.export_columns.clone(),
            Err(e) => return Err(e.clone()),
        };
        columns.retain(|&c| c != column);
        if include {
            columns.push(column);
        }
        self.set_export_columns(columns)
    }

    /// Serialise the filtered rows over the chosen export columns.
    pub fn export(&self) -> Result<Vec<u8>, PipelineError> {
        let view = self.view.as_ref().map_err(Clone::clone)?;
        export(&view.filtered, &view.export_columns)
    }

    fn current_table(&self) -> Result<&Table, PipelineError> {
        self.view
            .as_ref()
            .map(|v| &v.table)
            .map_err(Clone::clone)
    }

    fn status(&self) -> Result<(), PipelineError> {
        self.view.as_ref().map(|_| ()).map_err(Clone::clone)
    }

    /// Rebuild the view from the inputs and commit the reconciled
    /// selections. On failure the view becomes the error and the inputs
    /// are left as they were.
    fn recompute(&mut self) {
        self.view = match derive(
            &self.raw,
            self.header_index,
            &self.roles,
            self.export_columns.as_deref(),
        ) {
            Ok((view, roles)) => {
                log::debug!(
                    "Recomputed view: {} rows, {} matching, roles {:?}",
                    view.table.row_count(),
                    view.filtered.row_count(),
                    roles
                );
                self.roles = roles;
                Ok(view)
            }
            Err(e) => {
                log::warn!("Cannot build view for {}: {e}", self.source_name);
                Err(e)
            }
        };
    }
}

/// Compute the view for the given inputs.
///
/// Each role keeps its column and value while they remain valid; otherwise
/// the column falls back to the first column choice and the value to the
/// first candidate. Once a role has no value, every later role has no
/// candidates and the filtered table is empty.
fn derive(
    raw: &RawTable,
    header_index: HeaderIndex,
    roles: &[RoleSelection; 3],
    export_columns: Option<&[ColumnId]>,
) -> Result<(SessionView, [RoleSelection; 3]), PipelineError> {
    let table = promote_header(raw, header_index)?;
    let column_choices = sort_columns(table.columns());

    let mut resolved: [RoleSelection; 3] = roles.clone();
    let mut candidates: [Vec<OptionEntry>; 3] = Default::default();
    let mut predicates: Vec<Predicate> = Vec::with_capacity(3);
    let mut blocked = false;

    for role in Role::ALL {
        let selection = &mut resolved[role.index()];
        if selection.column.map_or(true, |c| table.column(c).is_err()) {
            selection.column = column_choices.first().map(|c| c.id);
            selection.value = None;
        }

        let Some(column) = selection.column.filter(|_| !blocked) else {
            selection.value = None;
            blocked = true;
            continue;
        };

        let options = candidate_options(&table, column, &predicates)?;
        let still_offered = selection
            .value
            .as_ref()
            .is_some_and(|v| options.iter().any(|o| &o.value == v));
        if !still_offered {
            selection.value = options.first().map(|o| o.value.clone());
        }

        match &selection.value {
            Some(value) => predicates.push(Predicate::new(column, value.clone())),
            None => blocked = true,
        }
        candidates[role.index()] = options;
    }

    let filtered = if blocked {
        table.with_rows(Vec::new())
    } else {
        apply_filters(&table, &predicates)?
    };

    let export_columns = match export_columns {
        Some(columns) => columns
            .iter()
            .copied()
            .filter(|&c| table.column(c).is_ok())
            .collect(),
        None => table.column_ids(),
    };

    let view = SessionView {
        table,
        column_choices,
        candidates,
        filtered,
        export_columns,
    };
    Ok((view, resolved))
}
