//! Per-axis bar chart of a single score vector, drawn on the same SVG surface
//! as the radar and exported through the same rasterizer.

use serde::Serialize;

use crate::radar::geometry::Point;
use crate::radar::snapshot::{Rasterizer, RenderError, Snapshot};
use crate::radar::svg::{SvgDocument, MUTED_TEXT, NEUTRAL_TEXT};
use crate::scoring::reconciler::{Axis, ScoreVector};

const WIDTH: u32 = 360;
const ROW_HEIGHT: f64 = 36.0;
const PADDING: f64 = 16.0;
const LABEL_WIDTH: f64 = 110.0;
const VALUE_WIDTH: f64 = 48.0;
const BAR_HEIGHT: f64 = 14.0;
const TRACK_COLOR: &str = "#f3f4f6";

/// Axes shown when only the CV-derived scores are wanted.
const CORE_AXES: [Axis; 3] = [Axis::Skills, Axis::Experience, Axis::Education];

fn bar_color(axis: Axis) -> &'static str {
    match axis {
        Axis::Skills => "#3b82f6",
        Axis::Experience => "#10b981",
        Axis::Education => "#f59e0b",
        Axis::Culture => "#ef4444",
        Axis::Interview => "#8b5cf6",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub axis: Axis,
    pub label: String,
    /// Whole percent.
    pub value: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSurface {
    pub width: u32,
    pub height: u32,
    pub bars: Vec<Bar>,
    pub svg: String,
}

impl BarChartSurface {
    pub fn snapshot(&self, rasterizer: &Rasterizer) -> Result<Snapshot, RenderError> {
        rasterizer.rasterize(&self.svg, self.width, self.height)
    }
}

/// Draws one horizontal bar per axis. Culture and interview are only
/// included when `include_all` is set.
pub fn render_score_bars(scores: &ScoreVector, include_all: bool) -> BarChartSurface {
    let axes: &[Axis] = if include_all { &Axis::ALL } else { &CORE_AXES };

    let bars: Vec<Bar> = axes
        .iter()
        .map(|&axis| Bar {
            axis,
            label: axis.label().to_string(),
            value: scores.get(axis).clamp(0.0, 100.0).round() as u32,
            color: bar_color(axis).to_string(),
        })
        .collect();

    let height = (PADDING * 2.0 + bars.len() as f64 * ROW_HEIGHT).ceil() as u32;
    let track_width = WIDTH as f64 - PADDING * 2.0 - LABEL_WIDTH - VALUE_WIDTH;
    let mut doc = SvgDocument::new(WIDTH, height);

    for (row, bar) in bars.iter().enumerate() {
        let mid = PADDING + row as f64 * ROW_HEIGHT + ROW_HEIGHT / 2.0;
        let track_x = PADDING + LABEL_WIDTH;
        let bar_y = mid - BAR_HEIGHT / 2.0;

        doc.text(
            Point {
                x: PADDING,
                y: mid + 4.0,
            },
            &bar.label,
            12,
            NEUTRAL_TEXT,
            "start",
        );
        doc.rect(track_x, bar_y, track_width, BAR_HEIGHT, TRACK_COLOR);
        if bar.value > 0 {
            let filled = track_width * bar.value as f64 / 100.0;
            doc.rect(track_x, bar_y, filled, BAR_HEIGHT, &bar.color);
        }
        doc.text(
            Point {
                x: WIDTH as f64 - PADDING,
                y: mid + 4.0,
            },
            &format!("{}%", bar.value),
            12,
            MUTED_TEXT,
            "end",
        );
    }

    BarChartSurface {
        width: WIDTH,
        height,
        bars,
        svg: doc.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> ScoreVector {
        ScoreVector {
            skills: 82.4,
            experience: 60.5,
            education: 0.0,
            culture: 71.0,
            interview: 45.0,
        }
    }

    #[test]
    fn test_core_axes_only_by_default() {
        let chart = render_score_bars(&scores(), false);
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Compétences", "Expérience", "Formation"]);
        assert_eq!(chart.height, 32 + 3 * 36);
    }

    #[test]
    fn test_include_all_adds_culture_and_interview() {
        let chart = render_score_bars(&scores(), true);
        assert_eq!(chart.bars.len(), 5);
        assert_eq!(chart.bars[4].axis, Axis::Interview);
        assert_eq!(chart.bars[4].color, "#8b5cf6");
    }

    #[test]
    fn test_values_rounded_to_whole_percent() {
        let chart = render_score_bars(&scores(), false);
        let values: Vec<u32> = chart.bars.iter().map(|b| b.value).collect();
        assert_eq!(values, vec![82, 61, 0]);
        assert!(chart.svg.contains(">82%</text>"));
        // empty bar: track only
        assert_eq!(chart.svg.matches(r##"fill="#f59e0b""##).count(), 0);
    }

    #[test]
    fn test_snapshot_has_surface_size() {
        let chart = render_score_bars(&scores(), true);
        let snapshot = chart.snapshot(&Rasterizer::without_fonts()).unwrap();
        assert_eq!((snapshot.width, snapshot.height), (chart.width, chart.height));
    }
}
