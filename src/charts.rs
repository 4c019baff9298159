use crate::models::{Dataset, NUMERIC_COLUMNS};
use crate::stats::{self, HistogramBin};

/// An RGB color picked from a deterministic palette.
pub type Rgb = (u8, u8, u8);

/// One bar of a category count chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub label: String,
    pub count: usize,
    pub color: Rgb,
}

/// A renderable chart handed to the display layer. Renderers build these;
/// they never draw anything themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram {
        title: String,
        x_label: String,
        bins: Vec<HistogramBin>,
        /// Smoothed density overlay; empty when the chart is plain.
        density: Vec<(f64, f64)>,
    },
    CategoryCounts {
        title: String,
        x_label: String,
        y_label: String,
        bars: Vec<CategoryBar>,
    },
    Heatmap {
        title: String,
        labels: Vec<String>,
        matrix: Vec<Vec<f64>>,
    },
}

const DENSITY_GRID: usize = 80;

/// Histogram of a numeric series, with a Gaussian-smoothed density overlay
/// when `smoothed` is set. Empty series render as an empty chart.
pub fn render_distribution(series: &[f64], title: &str, x_label: &str, smoothed: bool) -> Chart {
    let bins = stats::histogram(series);
    let density = if smoothed {
        stats::gaussian_kde(series, DENSITY_GRID)
    } else {
        Vec::new()
    };
    Chart::Histogram {
        title: title.to_string(),
        x_label: x_label.to_string(),
        bins,
        density,
    }
}

/// Count bar chart over discrete categories. Bars arrive already ordered by
/// category value; colors depend only on how many distinct categories there
/// are, so the same category count always yields the same palette.
pub fn render_category_counts(
    counts: &[(String, usize)],
    title: &str,
    x_label: &str,
    palette: Palette,
) -> Chart {
    let colors = palette.colors(counts.len());
    let bars = counts
        .iter()
        .zip(colors)
        .map(|((label, count), color)| CategoryBar {
            label: label.clone(),
            count: *count,
            color,
        })
        .collect();
    Chart::CategoryCounts {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: "Count".to_string(),
        bars,
    }
}

/// Annotated Pearson correlation heatmap over every numeric column.
/// Zero-variance columns come through as NaN cells.
pub fn render_correlation_heatmap(data: &Dataset, title: &str) -> Chart {
    let columns: Vec<Vec<f64>> = NUMERIC_COLUMNS
        .iter()
        .map(|(_, accessor)| data.records().iter().map(accessor).collect())
        .collect();
    Chart::Heatmap {
        title: title.to_string(),
        labels: NUMERIC_COLUMNS.iter().map(|(name, _)| name.to_string()).collect(),
        matrix: stats::correlation_matrix(&columns),
    }
}

/// The two color ramps used across the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Subtle cubehelix ramp, light to dark (skill rating bars).
    Cubehelix,
    /// Viridis ramp (approval bars, heatmap cells).
    Viridis,
}

impl Palette {
    pub fn colors(self, n: usize) -> Vec<Rgb> {
        match self {
            Palette::Cubehelix => cubehelix(n),
            Palette::Viridis => (0..n)
                .map(|i| {
                    let t = if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
                    viridis(t)
                })
                .collect(),
        }
    }
}

// Dave Green's cubehelix scheme with start 0.5, rotation -0.75, lightness
// running dark 0.3 to light 0.8, reversed so low ratings read lighter.
fn cubehelix(n: usize) -> Vec<Rgb> {
    const START: f64 = 0.5;
    const ROTATION: f64 = -0.75;
    const DARK: f64 = 0.3;
    const LIGHT: f64 = 0.8;

    (0..n)
        .map(|i| {
            let fraction = if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
            let fraction = 1.0 - fraction;
            let lightness = DARK + fraction * (LIGHT - DARK);
            let angle = 2.0 * std::f64::consts::PI * (START / 3.0 + ROTATION * fraction);
            let amplitude = lightness * (1.0 - lightness) / 2.0;
            let (sin, cos) = angle.sin_cos();
            let r = lightness + amplitude * (-0.14861 * cos + 1.78277 * sin);
            let g = lightness + amplitude * (-0.29227 * cos - 0.90649 * sin);
            let b = lightness + amplitude * (1.97294 * cos);
            (to_channel(r), to_channel(g), to_channel(b))
        })
        .collect()
}

// Viridis approximated by linear interpolation between anchor stops.
pub fn viridis(t: f64) -> Rgb {
    const STOPS: [(f64, f64, f64); 9] = [
        (0.267, 0.005, 0.329),
        (0.281, 0.155, 0.469),
        (0.244, 0.290, 0.537),
        (0.191, 0.407, 0.556),
        (0.147, 0.511, 0.557),
        (0.128, 0.615, 0.536),
        (0.208, 0.719, 0.473),
        (0.431, 0.809, 0.346),
        (0.993, 0.906, 0.144),
    ];

    let t = t.clamp(0.0, 1.0);
    let scaled = t * (STOPS.len() - 1) as f64;
    let low = scaled.floor() as usize;
    let high = (low + 1).min(STOPS.len() - 1);
    let frac = scaled - low as f64;

    let lerp = |a: f64, b: f64| a + (b - a) * frac;
    (
        to_channel(lerp(STOPS[low].0, STOPS[high].0)),
        to_channel(lerp(STOPS[low].1, STOPS[high].1)),
        to_channel(lerp(STOPS[low].2, STOPS[high].2)),
    )
}

fn to_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_record, Dataset};

    #[test]
    fn distribution_of_empty_series_is_an_empty_chart() {
        let chart = render_distribution(&[], "Empty", "x", true);
        match chart {
            Chart::Histogram { bins, density, .. } => {
                assert!(bins.is_empty());
                assert!(density.is_empty());
            }
            _ => panic!("expected a histogram"),
        }
    }

    #[test]
    fn plain_distribution_has_no_density_overlay() {
        let chart = render_distribution(&[1.0, 2.0, 3.0, 4.0], "Times", "timeonline", false);
        match chart {
            Chart::Histogram { bins, density, .. } => {
                assert!(!bins.is_empty());
                assert!(density.is_empty());
            }
            _ => panic!("expected a histogram"),
        }
    }

    #[test]
    fn category_colors_depend_only_on_category_count() {
        let three_a = vec![
            ("1".to_string(), 5),
            ("2".to_string(), 1),
            ("3".to_string(), 9),
        ];
        let three_b = vec![
            ("7".to_string(), 2),
            ("8".to_string(), 2),
            ("9".to_string(), 2),
        ];
        let chart_a = render_category_counts(&three_a, "A", "Ratings", Palette::Cubehelix);
        let chart_b = render_category_counts(&three_b, "B", "Ratings", Palette::Cubehelix);
        let colors = |chart: &Chart| match chart {
            Chart::CategoryCounts { bars, .. } => {
                bars.iter().map(|b| b.color).collect::<Vec<_>>()
            }
            _ => panic!("expected category counts"),
        };
        assert_eq!(colors(&chart_a), colors(&chart_b));
    }

    #[test]
    fn palettes_yield_one_color_per_category() {
        for n in [1usize, 2, 5, 9] {
            assert_eq!(Palette::Cubehelix.colors(n).len(), n);
            assert_eq!(Palette::Viridis.colors(n).len(), n);
        }
    }

    #[test]
    fn heatmap_covers_all_numeric_columns() {
        let data = Dataset::new(vec![
            sample_record(10.0, "yes", "1"),
            sample_record(20.0, "no", "2"),
            sample_record(30.0, "yes", "3"),
        ]);
        let chart = render_correlation_heatmap(&data, "Correlation");
        match chart {
            Chart::Heatmap { labels, matrix, .. } => {
                assert_eq!(labels.len(), 8);
                assert_eq!(matrix.len(), 8);
                // Post columns in the fixture are constant, so their cells are NaN.
                assert!(matrix[0][7].is_nan());
                // timeonline varies, so its diagonal is 1.
                assert!((matrix[7][7] - 1.0).abs() < 1e-12);
            }
            _ => panic!("expected a heatmap"),
        }
    }
}
