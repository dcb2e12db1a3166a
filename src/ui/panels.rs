use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::{AppState, LoadStatus};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone the Arc so we can mutate state while iterating the table indices.
    let Some(table) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Seasons ----
            let header = format!(
                "Season(s)  ({}/{})",
                state.filters.seasons.len(),
                table.seasons.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("season_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_seasons();
                        }
                        if ui.small_button("None").clicked() {
                            state.clear_seasons();
                        }
                    });
                    if state.filters.seasons.is_empty() {
                        ui.weak("No season selected: showing all.");
                    }
                    for season in &table.seasons {
                        let mut checked = state.filters.seasons.contains(season);
                        if ui.checkbox(&mut checked, season.to_string()).changed() {
                            state.toggle_season(season);
                        }
                    }
                });

            // ---- Teams ----
            let header = format!(
                "Team(s)  ({}/{})",
                state.filters.teams.len(),
                table.teams.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("team_filter")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_teams();
                    }
                    for team in &table.teams {
                        let mut checked = state.filters.teams.contains(team);
                        let mut text = RichText::new(team);
                        if let Some(colors) = &state.team_colors {
                            text = text.color(colors.color_for(team));
                        }
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_team(team);
                        }
                    }
                });

            ui.separator();

            // ---- Date range ----
            ui.strong("Date Range");
            match (state.filters.date_range, table.date_bounds) {
                (Some(range), _) => {
                    let mut start = range.start;
                    let mut end = range.end;
                    let start_changed = ui
                        .horizontal(|ui: &mut Ui| {
                            ui.label("From");
                            ui.add(DatePickerButton::new(&mut start).id_salt("date_from"))
                                .changed()
                        })
                        .inner;
                    let end_changed = ui
                        .horizontal(|ui: &mut Ui| {
                            ui.label("To");
                            ui.add(DatePickerButton::new(&mut end).id_salt("date_to"))
                                .changed()
                        })
                        .inner;
                    if start_changed || end_changed {
                        state.set_date_range(start, end);
                    }
                }
                (None, Some((lo, hi))) => {
                    if ui.button("Limit by date").clicked() {
                        state.set_date_range(lo, hi);
                    }
                }
                (None, None) => {
                    ui.weak("No dated matches in this file.");
                }
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.view.aggregates().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} matches loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let LoadStatus::Failed(msg) = &state.load_status {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open match data")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name("ipl_summary.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.status_message = Some(match state.export_summary(&path) {
            Ok(()) => format!("Summary written to {}", path.display()),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                format!("Export failed: {e:#}")
            }
        });
    }
}
