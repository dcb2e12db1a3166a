use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points,
};

use crate::color::{heat_color, result_type_color, ColorMap};
use crate::data::aggregate::{MarginPoint, ResultTypeCount, SeasonCount, TeamWins, WinMatrix};
use crate::data::model::{season_label, ResultType};

const CHART_HEIGHT: f32 = 300.0;

/// Axis formatter that labels integer grid marks with category names.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Line chart: matches per season
// ---------------------------------------------------------------------------

pub fn season_line_chart(ui: &mut Ui, trend: &[SeasonCount]) {
    ui.strong("Matches per Season");

    let labels: Vec<String> = trend.iter().map(|s| season_label(s.season.as_ref())).collect();
    let coords: Vec<[f64; 2]> = trend
        .iter()
        .enumerate()
        .map(|(i, s)| [i as f64, s.matches as f64])
        .collect();

    Plot::new("season_trend")
        .height(CHART_HEIGHT)
        .x_axis_label("Season")
        .y_axis_label("Matches")
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name("Matches")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .name("Matches")
                    .shape(MarkerShape::Circle)
                    .radius(4.0)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

// ---------------------------------------------------------------------------
// Bar chart: top teams by wins
// ---------------------------------------------------------------------------

pub fn top_winners_bar_chart(ui: &mut Ui, winners: &[TeamWins], colors: Option<&ColorMap>) {
    ui.strong(format!("Top {} Teams by Wins (Filtered Data)", winners.len()));

    let labels: Vec<String> = winners.iter().map(|w| w.team.clone()).collect();
    let bars: Vec<Bar> = winners
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let fill = colors.map_or(Color32::LIGHT_BLUE, |c| c.color_for(&w.team));
            Bar::new(i as f64, w.wins as f64)
                .name(&w.team)
                .fill(fill)
                .width(0.7)
        })
        .collect();

    Plot::new("top_winners")
        .height(CHART_HEIGHT)
        .x_axis_label("Team")
        .y_axis_label("Wins")
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Wins"));
        });
}

// ---------------------------------------------------------------------------
// Heatmap: wins by team (rows) vs season (columns)
// ---------------------------------------------------------------------------

pub fn win_heatmap(ui: &mut Ui, matrix: &WinMatrix) {
    ui.strong("Heatmap: Wins by Team (rows) vs Season (columns)");
    if matrix.is_empty() {
        ui.weak("No wins recorded for the current selection.");
        return;
    }

    let label_width = 170.0;
    let header_height = 22.0;
    let row_height = 22.0;
    let cols = matrix.seasons.len();
    let rows = matrix.teams.len();
    let width = ui.available_width().max(label_width + cols as f32 * 24.0);
    let cell_width = (width - label_width) / cols as f32;
    let height = header_height + rows as f32 * row_height;

    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(11.0);
    let max = matrix.max();

    for (c, season) in matrix.seasons.iter().enumerate() {
        let x = rect.left() + label_width + (c as f32 + 0.5) * cell_width;
        painter.text(
            Pos2::new(x, rect.top() + header_height / 2.0),
            Align2::CENTER_CENTER,
            season_label(season.as_ref()),
            font.clone(),
            text_color,
        );
    }

    for (r, team) in matrix.teams.iter().enumerate() {
        let y = rect.top() + header_height + r as f32 * row_height;
        painter.text(
            Pos2::new(rect.left() + label_width - 6.0, y + row_height / 2.0),
            Align2::RIGHT_CENTER,
            team,
            font.clone(),
            text_color,
        );
        for (c, &wins) in matrix.counts[r].iter().enumerate() {
            let cell = egui::Rect::from_min_size(
                Pos2::new(rect.left() + label_width + c as f32 * cell_width, y),
                egui::vec2(cell_width, row_height),
            )
            .shrink(1.0);
            painter.rect_filled(cell, 0.0, heat_color(wins, max));
            if cell_width >= 18.0 {
                painter.text(
                    cell.center(),
                    Align2::CENTER_CENTER,
                    wins.to_string(),
                    font.clone(),
                    Color32::BLACK,
                );
            }
        }
    }

    if let Some(pos) = response.hover_pos() {
        let col = ((pos.x - rect.left() - label_width) / cell_width).floor();
        let row = ((pos.y - rect.top() - header_height) / row_height).floor();
        if col >= 0.0 && row >= 0.0 && (col as usize) < cols && (row as usize) < rows {
            let (r, c) = (row as usize, col as usize);
            response.on_hover_text(format!(
                "Team: {}\nSeason: {}\nWins: {}",
                matrix.teams[r],
                season_label(matrix.seasons[c].as_ref()),
                matrix.counts[r][c]
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter: win by runs vs win by wickets
// ---------------------------------------------------------------------------

pub fn margin_scatter(ui: &mut Ui, points: &[MarginPoint]) {
    ui.strong("Scatter: Win by Runs vs Win by Wickets (How Teams Win)");

    let hover_points = points.to_vec();

    Plot::new("margin_scatter")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Win by runs")
        .y_axis_label("Win by wickets")
        .include_x(0.0)
        .include_y(0.0)
        .allow_scroll(false)
        .label_formatter(move |_name: &str, value: &PlotPoint| {
            nearest_margin_label(&hover_points, value)
        })
        .show(ui, |plot_ui| {
            for result_type in ResultType::ALL {
                let series: Vec<[f64; 2]> = points
                    .iter()
                    .filter(|p| p.result_type == result_type)
                    .map(|p| [p.win_by_runs as f64, p.win_by_wickets as f64])
                    .collect();
                if series.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(series))
                        .name(result_type.label())
                        .shape(MarkerShape::Circle)
                        .radius(3.5)
                        .color(result_type_color(result_type)),
                );
            }
        });
}

/// Hover text for the match closest to the cursor.
fn nearest_margin_label(points: &[MarginPoint], value: &PlotPoint) -> String {
    let distance = |p: &MarginPoint| {
        (p.win_by_runs as f64 - value.x).powi(2) + (p.win_by_wickets as f64 - value.y).powi(2)
    };
    let nearest = points
        .iter()
        .min_by(|a, b| distance(a).total_cmp(&distance(b)));
    match nearest {
        Some(p) => format!(
            "{} vs {}\nWinner: {} ({})\nSeason: {}\nRuns: {}  Wickets: {}",
            p.team1,
            p.team2,
            p.winner,
            p.result_type,
            season_label(p.season.as_ref()),
            p.win_by_runs,
            p.win_by_wickets
        ),
        None => format!("runs {:.0}, wickets {:.0}", value.x, value.y),
    }
}

// ---------------------------------------------------------------------------
// Pie chart: result type distribution
// ---------------------------------------------------------------------------

pub fn result_pie_chart(ui: &mut Ui, distribution: &[ResultTypeCount]) {
    ui.strong("Distribution of Result Types");

    let total: usize = distribution.iter().map(|d| d.count).sum();
    if total == 0 {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let size = CHART_HEIGHT * 0.8;
        let (rect, _response) = ui.allocate_exact_size(egui::vec2(size, size), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = size / 2.0 - 4.0;

        let mut start = -TAU / 4.0;
        for slice in distribution {
            let sweep = TAU * slice.count as f32 / total as f32;
            let color = result_type_color(slice.result_type);
            // Fan out in sub-arcs of at most a quarter turn so every polygon stays convex.
            let steps = ((sweep / (TAU / 4.0)).ceil() as usize).max(1);
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                let segments = 16;
                let mut poly = vec![center];
                for k in 0..=segments {
                    let a = a0 + (a1 - a0) * k as f32 / segments as f32;
                    poly.push(center + radius * egui::vec2(a.cos(), a.sin()));
                }
                painter.add(Shape::convex_polygon(poly, color, Stroke::NONE));
            }
            start += sweep;
        }
        painter.circle_stroke(center, radius, Stroke::new(1.0, ui.visuals().window_fill()));

        ui.vertical(|ui: &mut Ui| {
            for slice in distribution {
                let pct = 100.0 * slice.count as f64 / total as f64;
                ui.colored_label(
                    result_type_color(slice.result_type),
                    format!("■ {}: {} ({pct:.1}%)", slice.result_type, slice.count),
                );
            }
        });
    });
}
