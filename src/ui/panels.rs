use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::{EXPORT_FILE_NAME, MAX_HEADER_INDEX, PREVIEW_ROWS, SUPPORTED_EXTENSIONS};
use crate::session::{Role, Session, SessionView};
use crate::state::{AppState, UiAction};
use crate::ui::table::cell_grid;

fn column_prompt(role: Role) -> &'static str {
    match role {
        Role::Semester => "1. Column that contains the semester number",
        Role::Section => "2. Column that contains your section number [Core/Elective]",
        Role::School => "3. Column that contains your school name (e.g. SCSE, SBAS)",
    }
}

fn value_prompt(role: Role) -> &'static str {
    match role {
        Role::Semester => "Select your semester",
        Role::Section => "Select your required [Core/Elective] section",
        Role::School => "Select your school",
    }
}

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the selection panel: header row, the three role pickers, export
/// columns and the download button.
pub fn side_panel(ui: &mut Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    ui.heading("Selections");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No file loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Header row ----
            ui.strong("Row that contains the column names");
            let mut header_index = session.header_index().get() as i64;
            let response = ui.add(
                egui::DragValue::new(&mut header_index).range(0..=MAX_HEADER_INDEX as i64),
            );
            if response.changed() {
                actions.push(UiAction::SetHeaderIndex(header_index));
            }
            ui.separator();

            let view = match session.view() {
                Ok(view) => view,
                Err(e) => {
                    ui.label(RichText::new(e.to_string()).color(Color32::RED));
                    return;
                }
            };

            for role in Role::ALL {
                role_pickers(ui, session, view, role, actions);
                ui.separator();
            }

            export_columns(ui, view, actions);
        });
}

fn role_pickers(
    ui: &mut Ui,
    session: &Session,
    view: &SessionView,
    role: Role,
    actions: &mut Vec<UiAction>,
) {
    let selection = session.selection(role);

    ui.strong(column_prompt(role));
    let column_text = selection
        .column
        .and_then(|id| view.table.column(id).ok())
        .map(|c| c.label.clone())
        .unwrap_or_default();
    egui::ComboBox::from_id_salt(("role_column", role))
        .selected_text(column_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for col in &view.column_choices {
                if ui
                    .selectable_label(selection.column == Some(col.id), &col.label)
                    .clicked()
                {
                    actions.push(UiAction::SetRoleColumn(role, col.id));
                }
            }
        });

    ui.label(value_prompt(role));
    let options = view.candidates(role);
    let value_text = options
        .iter()
        .find(|o| selection.value.as_ref() == Some(&o.value))
        .map(|o| o.label.clone())
        .unwrap_or_default();
    egui::ComboBox::from_id_salt(("role_value", role))
        .selected_text(value_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                let is_selected = selection.value.as_ref() == Some(&option.value);
                if ui.selectable_label(is_selected, &option.label).clicked() {
                    actions.push(UiAction::SetRoleValue(role, option.value.clone()));
                }
            }
        });
}

fn export_columns(ui: &mut Ui, view: &SessionView, actions: &mut Vec<UiAction>) {
    let n_selected = view.export_columns.len();
    let n_total = view.table.width();
    egui::CollapsingHeader::new(
        RichText::new(format!("Columns in the CSV  ({n_selected}/{n_total})")).strong(),
    )
    .id_salt("export_columns")
    .default_open(true)
    .show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("All").clicked() {
                actions.push(UiAction::SetExportColumns(view.table.column_ids()));
            }
            if ui.small_button("None").clicked() {
                actions.push(UiAction::SetExportColumns(Vec::new()));
            }
        });

        for col in view.table.columns() {
            let mut checked = view.export_columns.contains(&col.id);
            if ui.checkbox(&mut checked, &col.label).changed() {
                actions.push(UiAction::ToggleExportColumn(col.id, checked));
            }
        }
    });

    ui.add_space(8.0);
    let download = ui.add_enabled(
        !view.export_columns.is_empty(),
        egui::Button::new(format!("Download {EXPORT_FILE_NAME}")),
    );
    if download.clicked() {
        if let Some(path) = save_file_dialog() {
            actions.push(UiAction::SaveExport(path));
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel – previews and result
// ---------------------------------------------------------------------------

/// Render the previews and the filtered rows.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a timetable to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let raw = session.raw();
            ui.heading(format!("Raw data preview (first {PREVIEW_ROWS} rows)"));
            let numbers: Vec<String> = (0..raw.width()).map(|i| i.to_string()).collect();
            cell_grid(ui, "raw_preview", &numbers, raw.preview(PREVIEW_ROWS));
            ui.add_space(12.0);

            let view = match session.view() {
                Ok(view) => view,
                Err(e) => {
                    ui.label(RichText::new(e.to_string()).color(Color32::RED));
                    return;
                }
            };

            let labels: Vec<String> = view.table.labels().into_iter().map(String::from).collect();
            let head = &view.table.rows()[..PREVIEW_ROWS.min(view.table.row_count())];
            ui.heading("Data preview after setting headers");
            cell_grid(ui, "table_preview", &labels, head);
            ui.add_space(12.0);

            ui.heading("Schedules matching your selections");
            let matching = view.filtered.row_count();
            let total = view.table.row_count();
            ui.label(format!("Total rows matching your criteria: {matching}"));
            cell_grid(ui, "filtered", &labels, view.filtered.rows());
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!(
                    "Rows in the output may include other classes with the same section, \
                     but {matching} rows are easier to read than {total}."
                ))
                .weak(),
            );
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = open_file_dialog() {
                    actions.push(UiAction::OpenFile(path));
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            match session.view() {
                Ok(view) => ui.label(format!(
                    "{}: {} rows loaded, {} matching",
                    session.source_name(),
                    view.table.row_count(),
                    view.filtered.row_count()
                )),
                Err(_) => ui.label(session.source_name()),
            };
        }

        if let Some(path) = &state.last_export {
            ui.separator();
            ui.label(format!("Saved {}", path.display()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open timetable")
        .add_filter("Supported files", &SUPPORTED_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xls", "xlsx"])
        .pick_file()
}

pub fn save_file_dialog() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save filtered schedule")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()
}
