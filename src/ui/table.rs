use eframe::egui::{Ui, RichText};
use egui_extras::{Column as GridColumn, TableBuilder};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Read-only cell grid
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 20.0;

/// Render `rows` under `labels`, with a leading row-number column.
///
/// `id_salt` must be unique among grids shown in the same panel.
pub fn cell_grid(ui: &mut Ui, id_salt: &str, labels: &[String], rows: &[Vec<CellValue>]) {
    ui.push_id(id_salt, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(GridColumn::auto())
            .columns(GridColumn::auto().at_least(48.0), labels.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for label in labels {
                    header.col(|ui: &mut Ui| {
                        ui.strong(label);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let index = row.index();
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new(index.to_string()).weak());
                    });
                    for cell in &rows[index] {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
    });
}
