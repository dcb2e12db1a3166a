use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::data::aggregate::{Aggregates, SummaryMetrics};
use crate::state::{AppState, LoadStatus, Tab};
use crate::ui::plot;

const SEASON_OVERVIEW_NOTES: &str = "\
Interpretation (Season Overview):
• The matches-per-season line shows how schedule volume changes across seasons \
(expansions, format shifts, or disruptions).
• The top-winners bar chart shows which teams most consistently convert matches \
into wins under the selected filters.
• If one team dominates wins while match volume is stable, that points to sustained \
competitive advantage rather than simply more matches played.";

const TEAM_ANALYSIS_NOTES: &str = "\
Interpretation (Team & Result Analysis):
• The wins heatmap makes dominant seasons (strong blocks of high wins) and down years \
(sharp drop-offs) easy to spot.
• The runs-vs-wickets scatter shows how matches are won: large run margins indicate \
batting dominance, wicket margins reflect successful chases.
• More wicket-based wins in the selected seasons suggests a chasing advantage or \
stronger second-innings execution in those years.";

const DATA_CAPTION: &str = "Data source: public IPL match dataset. \
The dashboard re-reads the file when it changes, so it can be refreshed as new seasons complete.";

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the central dashboard: metric cards, tabs and charts.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🏏 IPL Performance Dashboard");
    ui.label(
        "Analytical objective: understand how team performance changes across seasons \
         and which patterns relate most strongly to winning.",
    );
    ui.separator();

    match &state.load_status {
        LoadStatus::Failed(msg) => {
            ui.label(RichText::new(msg).color(Color32::RED).strong());
            ui.label("Make sure the file exists, or open another one via File → Open…");
            return;
        }
        LoadStatus::NotLoaded => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a match file to begin  (File → Open…)");
            });
            return;
        }
        LoadStatus::Loaded(_) => {}
    }

    let Some(agg) = state.view.aggregates() else {
        ui.label(
            RichText::new(
                "⚠ No matches found for the selected filters. \
                 Try changing seasons/teams/date range.",
            )
            .color(Color32::from_rgb(230, 160, 30)),
        );
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            metric_cards(ui, &agg.summary);
            ui.add_space(8.0);

            ui.horizontal(|ui: &mut Ui| {
                ui.selectable_value(
                    &mut state.active_tab,
                    Tab::SeasonOverview,
                    "📈 Season Overview",
                );
                ui.selectable_value(
                    &mut state.active_tab,
                    Tab::TeamAnalysis,
                    "🔎 Team & Result Analysis",
                );
            });
            ui.separator();

            match state.active_tab {
                Tab::SeasonOverview => season_overview(ui, agg, state.team_colors.as_ref()),
                Tab::TeamAnalysis => team_analysis(ui, agg),
            }

            ui.add_space(12.0);
            ui.weak(DATA_CAPTION);
        });
}

fn metric_cards(ui: &mut Ui, summary: &SummaryMetrics) {
    let cards = [
        ("Matches", summary.total_matches.to_string(), None),
        ("No Result", summary.no_result.to_string(), None),
        ("Venues", summary.unique_venues.to_string(), None),
        (
            "Top Winner",
            summary.top_team_label().to_string(),
            Some(format!("{} wins", summary.top_team_wins)),
        ),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (title, value, delta)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.weak(title);
                ui.label(RichText::new(value).size(24.0).strong());
                if let Some(delta) = delta {
                    ui.label(RichText::new(delta).color(Color32::from_rgb(90, 180, 90)));
                }
            });
        }
    });
}

fn season_overview(ui: &mut Ui, agg: &Aggregates, team_colors: Option<&ColorMap>) {
    ui.heading("Season-level trends");
    plot::season_line_chart(ui, &agg.season_trend);
    ui.add_space(8.0);
    plot::top_winners_bar_chart(ui, &agg.top_winners, team_colors);
    ui.add_space(8.0);
    ui.label(SEASON_OVERVIEW_NOTES);
}

fn team_analysis(ui: &mut Ui, agg: &Aggregates) {
    ui.heading("Result patterns and team comparison");
    plot::win_heatmap(ui, &agg.win_matrix);
    ui.add_space(8.0);
    plot::margin_scatter(ui, &agg.margins);
    ui.add_space(8.0);
    plot::result_pie_chart(ui, &agg.result_distribution);
    ui.add_space(8.0);
    ui.label(TEAM_ANALYSIS_NOTES);
}
