//! Time series charts of stats records.
//!
//! Records are reshaped into one series per statistic (x = step index) and
//! drawn as lines with markers. `.svg` paths use the SVG backend, any other
//! extension the bitmap backend.

use crate::config::PlotConfig;
use crate::stats::{StatValue, StatsRecord};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Errors building or drawing a chart
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("no records to plot")]
    NoRecords,
    #[error("record {step} does not match the keys of record 0 at '{key}'")]
    KeyMismatch { step: usize, key: String },
    #[error("render error: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// Values of one statistic over time
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    /// `(step, value)`; null values mark gaps
    pub points: Vec<(usize, StatValue)>,
}

impl Series {
    /// Runs of consecutive non-null points, as chart coordinates
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for &(step, value) in &self.points {
            match value.as_f64() {
                Some(y) => current.push((step as f64, y)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Reshape records into one series per key, in sorted key order.
///
/// Every record must carry exactly the keys of `records[0]`.
pub fn build_series(records: &[StatsRecord]) -> Result<Vec<Series>, PlotError> {
    let first = records.first().ok_or(PlotError::NoRecords)?;

    for (step, record) in records.iter().enumerate().skip(1) {
        if let Some(key) = record.keys().find(|k| !first.contains_key(k)) {
            return Err(PlotError::KeyMismatch {
                step,
                key: key.to_string(),
            });
        }
        if let Some(key) = first.keys().find(|k| !record.contains_key(k)) {
            return Err(PlotError::KeyMismatch {
                step,
                key: key.to_string(),
            });
        }
    }

    let series = first
        .keys()
        .map(|key| Series {
            name: key.to_string(),
            points: records
                .iter()
                .enumerate()
                .filter_map(|(step, r)| r.get(key).map(|v| (step, v)))
                .collect(),
        })
        .collect();
    Ok(series)
}

/// Renders record sequences to chart files
#[derive(Clone, Debug, Default)]
pub struct SeriesPlotter {
    pub config: PlotConfig,
}

impl SeriesPlotter {
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    /// Write a chart of `records` to `path`.
    ///
    /// Nothing is written when the records are inconsistent.
    pub fn render<P: AsRef<Path>>(
        &self,
        path: P,
        records: &[StatsRecord],
    ) -> Result<(), PlotError> {
        let series = build_series(records)?;
        let path = path.as_ref();
        let size = (self.config.width, self.config.height);

        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

        if is_svg {
            let root = SVGBackend::new(path, size).into_drawing_area();
            self.draw(&root, records.len(), &series)?;
        } else {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            self.draw(&root, records.len(), &series)?;
        }

        log::info!(
            "Chart written: {} ({} series, {} steps)",
            path.display(),
            series.len(),
            records.len()
        );
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        steps: usize,
        series: &[Series],
    ) -> Result<(), PlotError> {
        root.fill(&WHITE).map_err(render_err)?;

        let x_max = (steps.saturating_sub(1) as f64).max(1.0);
        let (y_min, y_max) = y_range(series);

        let mut chart = ChartBuilder::on(root)
            .caption(&self.config.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0f64..x_max, y_min..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("step")
            .y_desc("value")
            .draw()
            .map_err(render_err)?;

        for (idx, s) in series.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            let segments = s.segments();

            for segment in &segments {
                chart
                    .draw_series(LineSeries::new(segment.iter().copied(), color.stroke_width(2)))
                    .map_err(render_err)?;
            }

            chart
                .draw_series(
                    segments
                        .iter()
                        .flatten()
                        .map(|&p| Circle::new(p, 3, color.filled())),
                )
                .map_err(render_err)?
                .label(s.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}

/// Padded value range over every non-null point
fn y_range(series: &[Series]) -> (f64, f64) {
    let values = series
        .iter()
        .flat_map(|s| s.points.iter())
        .filter_map(|(_, v)| v.as_f64())
        .filter(|v| v.is_finite());

    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, f64)]) -> StatsRecord {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    /// Three steps; every value of the middle one is null
    fn records_with_gap() -> Vec<StatsRecord> {
        let steps = [Some(1.0), None, Some(4.0)];
        steps
            .iter()
            .map(|&v| -> StatsRecord {
                [("alpha_mean", v), ("beta_stddev", v.map(|x| x * 2.0))]
                    .into_iter()
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_build_series_reshapes_by_key() {
        let records = vec![
            record(&[("b", 2.0), ("a", 1.0)]),
            record(&[("a", 3.0), ("b", 4.0)]),
        ];
        let series = build_series(&records).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "a");
        assert_eq!(
            series[0].points,
            vec![(0, StatValue::Float(1.0)), (1, StatValue::Float(3.0))]
        );
        assert_eq!(series[1].name, "b");
        assert_eq!(
            series[1].points,
            vec![(0, StatValue::Float(2.0)), (1, StatValue::Float(4.0))]
        );
    }

    #[test]
    fn test_build_series_rejects_extra_key() {
        let records = vec![record(&[("a", 1.0)]), record(&[("a", 3.0), ("c", 4.0)])];
        assert!(matches!(
            build_series(&records),
            Err(PlotError::KeyMismatch { step: 1, key }) if key == "c"
        ));
    }

    #[test]
    fn test_build_series_rejects_missing_key() {
        let records = vec![
            record(&[("a", 1.0), ("b", 2.0)]),
            record(&[("a", 1.0), ("b", 2.0)]),
            record(&[("a", 3.0)]),
        ];
        assert!(matches!(
            build_series(&records),
            Err(PlotError::KeyMismatch { step: 2, key }) if key == "b"
        ));
    }

    #[test]
    fn test_build_series_empty() {
        assert!(matches!(build_series(&[]), Err(PlotError::NoRecords)));
    }

    #[test]
    fn test_segments_break_at_nulls() {
        let series = Series {
            name: "x".to_string(),
            points: vec![
                (0, StatValue::Null),
                (1, StatValue::Float(1.0)),
                (2, StatValue::Int(2)),
                (3, StatValue::Null),
                (4, StatValue::Float(5.0)),
            ],
        };
        assert_eq!(
            series.segments(),
            vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(4.0, 5.0)]]
        );
    }

    #[test]
    fn test_y_range() {
        assert_eq!(y_range(&[]), (0.0, 1.0));
        let series = vec![Series {
            name: "x".to_string(),
            points: vec![(0, StatValue::Float(0.0)), (1, StatValue::Float(100.0))],
        }];
        assert_eq!(y_range(&series), (-5.0, 105.0));
    }

    #[test]
    fn test_render_mismatch_writes_nothing() {
        let path = std::env::temp_dir().join("surface_stats_mismatch_chart.svg");
        std::fs::remove_file(&path).ok();

        let records = vec![record(&[("a", 1.0)]), record(&[("b", 2.0)])];
        let plotter = SeriesPlotter::default();
        assert!(matches!(
            plotter.render(&path, &records),
            Err(PlotError::KeyMismatch { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_render_svg_with_null_step() {
        let path = std::env::temp_dir().join("surface_stats_render_chart.svg");
        std::fs::remove_file(&path).ok();

        let result = SeriesPlotter::default().render(&path, &records_with_gap());
        assert!(result.is_ok(), "{:?}", result);
        assert!(path.exists());

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("alpha_mean"));
        assert!(svg.contains("beta_stddev"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_render_png_with_null_step() {
        let path = std::env::temp_dir().join("surface_stats_render_chart.png");
        std::fs::remove_file(&path).ok();

        let result = SeriesPlotter::default().render(&path, &records_with_gap());
        assert!(result.is_ok(), "{:?}", result);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));

        std::fs::remove_file(&path).ok();
    }
}
