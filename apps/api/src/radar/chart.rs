//! Radar renderer: overlays one or more score profiles on a shared circular grid.
//!
//! Layers, bottom to top: background, grid rings, spokes, one polygon per
//! dataset (in input order), axis labels, legend. Every `render` is a full
//! redraw of the owned surface; `snapshot` rasterizes whatever is currently
//! drawn, so exported images always match the visible chart.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::radar::geometry::{sanitize_value, Point, RadarGeometry};
use crate::radar::snapshot::{Rasterizer, RenderError, Snapshot};
use crate::radar::svg::{sanitize_color, SvgDocument, MUTED_TEXT, NEUTRAL_TEXT};

const GRID_STROKE: &str = "#e5e7eb";
const SPOKE_STROKE: &str = "#d1d5db";
const FILL_OPACITY: f64 = 0.2;
const POLYGON_STROKE_WIDTH: f64 = 2.0;
const VERTEX_RADIUS: f64 = 4.0;
const LABEL_FONT_SIZE: u32 = 12;
const VALUE_FONT_SIZE: u32 = 10;
const LEGEND_PADDING: f64 = 12.0;
const LEGEND_ROW_HEIGHT: f64 = 20.0;
const LEGEND_SWATCH: f64 = 12.0;

/// One named, colored overlay. `values` maps axis label → score (0–100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarDataset {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub values: HashMap<String, f64>,
}

impl RadarDataset {
    /// Values in `axes` order; axes missing from this dataset read as 0.
    pub fn values_for(&self, axes: &[String]) -> Vec<f64> {
        axes.iter()
            .map(|axis| self.values.get(axis).copied().unwrap_or(0.0))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarOptions {
    /// Side of the radar square in pixels; the legend extends below it.
    pub size: u32,
    /// Print each value under its axis label. Only applies to single-dataset charts.
    pub show_values: bool,
}

impl Default for RadarOptions {
    fn default() -> Self {
        Self {
            size: 300,
            show_values: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: String,
}

/// Computed polygon of one dataset, exposed for comparisons and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPolygon {
    pub name: String,
    pub color: String,
    pub points: Vec<Point>,
}

/// The drawn chart: SVG markup plus the geometry that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarSurface {
    pub width: u32,
    pub height: u32,
    pub axes: Vec<String>,
    pub spokes: Vec<Point>,
    pub polygons: Vec<DatasetPolygon>,
    pub legend: Vec<LegendEntry>,
    pub svg: String,
}

impl RadarSurface {
    pub fn snapshot(&self, rasterizer: &Rasterizer) -> Result<Snapshot, RenderError> {
        rasterizer.rasterize(&self.svg, self.width, self.height)
    }
}

/// Owns one drawing surface and redraws it on every `render` call.
#[derive(Debug, Clone)]
pub struct RadarRenderer {
    options: RadarOptions,
    surface: RadarSurface,
}

impl RadarRenderer {
    /// Starts with an empty chart on the given axes.
    pub fn new(options: RadarOptions, axes: &[String]) -> Self {
        Self::with_datasets(options, &[], axes)
    }

    /// Starts with `datasets` already drawn, in a single pass.
    pub fn with_datasets(options: RadarOptions, datasets: &[RadarDataset], axes: &[String]) -> Self {
        Self {
            options,
            surface: draw(datasets, axes, &options),
        }
    }

    pub fn render(&mut self, datasets: &[RadarDataset], axes: &[String]) -> &RadarSurface {
        self.surface = draw(datasets, axes, &self.options);
        &self.surface
    }

    pub fn surface(&self) -> &RadarSurface {
        &self.surface
    }

    pub fn into_surface(self) -> RadarSurface {
        self.surface
    }

    /// Rasterizes the chart as currently drawn.
    pub fn snapshot(&self, rasterizer: &Rasterizer) -> Result<Snapshot, RenderError> {
        self.surface.snapshot(rasterizer)
    }
}

/// Draws `datasets` on a `size`×`size` radar with default styling.
pub fn render(datasets: &[RadarDataset], axes: &[String], size: u32) -> RadarSurface {
    draw(
        datasets,
        axes,
        &RadarOptions {
            size,
            ..RadarOptions::default()
        },
    )
}

pub fn draw(datasets: &[RadarDataset], axes: &[String], options: &RadarOptions) -> RadarSurface {
    let geometry = RadarGeometry::new(options.size);
    let count = axes.len();

    let legend_height = if datasets.is_empty() {
        0.0
    } else {
        LEGEND_PADDING * 2.0 + datasets.len() as f64 * LEGEND_ROW_HEIGHT
    };
    let width = options.size;
    let height = options.size + legend_height.ceil() as u32;
    let mut doc = SvgDocument::new(width, height);

    for radius in geometry.ring_radii() {
        doc.circle(geometry.center, radius, "none", Some((GRID_STROKE, 1.0)));
    }

    let spokes: Vec<Point> = (0..count).map(|i| geometry.spoke_end(i, count)).collect();
    for end in &spokes {
        doc.line(geometry.center, *end, SPOKE_STROKE, 1.0);
    }

    let mut polygons = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let color = sanitize_color(&dataset.color, NEUTRAL_TEXT);
        let points = geometry.polygon(&dataset.values_for(axes));
        if !points.is_empty() {
            doc.polygon(&points, color, FILL_OPACITY, POLYGON_STROKE_WIDTH);
            for p in &points {
                doc.circle(*p, VERTEX_RADIUS, color, None);
            }
        }
        polygons.push(DatasetPolygon {
            name: dataset.name.clone(),
            color: color.to_string(),
            points,
        });
    }

    let single = match datasets {
        [only] if options.show_values => Some(only.values_for(axes)),
        _ => None,
    };
    for (i, axis) in axes.iter().enumerate() {
        let anchor = geometry.label_anchor(i, count);
        doc.text(
            Point {
                x: anchor.x,
                y: anchor.y + 4.0,
            },
            axis,
            LABEL_FONT_SIZE,
            NEUTRAL_TEXT,
            "middle",
        );
        if let Some(values) = &single {
            doc.text(
                Point {
                    x: anchor.x,
                    y: anchor.y + 18.0,
                },
                &format!("{:.1}", sanitize_value(values[i])),
                VALUE_FONT_SIZE,
                MUTED_TEXT,
                "middle",
            );
        }
    }

    let mut legend = Vec::with_capacity(datasets.len());
    for (row, polygon) in polygons.iter().enumerate() {
        let top = options.size as f64 + LEGEND_PADDING + row as f64 * LEGEND_ROW_HEIGHT;
        doc.rect(16.0, top + 2.0, LEGEND_SWATCH, LEGEND_SWATCH, &polygon.color);
        doc.text(
            Point {
                x: 16.0 + LEGEND_SWATCH + 8.0,
                y: top + 12.0,
            },
            &polygon.name,
            LABEL_FONT_SIZE,
            NEUTRAL_TEXT,
            "start",
        );
        legend.push(LegendEntry {
            name: polygon.name.clone(),
            color: polygon.color.clone(),
        });
    }

    RadarSurface {
        width,
        height,
        axes: axes.to_vec(),
        spokes,
        polygons,
        legend,
        svg: doc.finish(),
    }
}
