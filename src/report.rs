use std::fmt::Write;

use crate::charts::Chart;
use crate::pages::PageView;

const BAR_WIDTH: usize = 40;

/// Render one page as plain text for headless runs.
pub fn render_page(view: &PageView) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", view.title);
    if !view.intro.is_empty() {
        let _ = writeln!(output, "{}", view.intro);
    }

    if let Some(error) = &view.error {
        let _ = writeln!(output);
        let _ = writeln!(output, "Error: {error}");
        return output;
    }

    for chart in &view.charts {
        let _ = writeln!(output);
        render_chart(&mut output, chart);
    }

    output
}

fn render_chart(output: &mut String, chart: &Chart) {
    match chart {
        Chart::Histogram { title, x_label, bins, .. } => {
            let _ = writeln!(output, "## {title}");
            if bins.is_empty() {
                let _ = writeln!(output, "(no data in range)");
                return;
            }
            let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
            for bin in bins {
                let _ = writeln!(
                    output,
                    "{:>10.1} .. {:<10.1} {} {}",
                    bin.start,
                    bin.end,
                    scaled_bar(bin.count, max),
                    bin.count
                );
            }
            let _ = writeln!(output, "({x_label})");
        }
        Chart::CategoryCounts { title, x_label, bars, .. } => {
            let _ = writeln!(output, "## {title}");
            if bars.is_empty() {
                let _ = writeln!(output, "(no data in range)");
                return;
            }
            let max = bars.iter().map(|b| b.count).max().unwrap_or(0);
            for bar in bars {
                let _ = writeln!(
                    output,
                    "{:>10} {} {}",
                    bar.label,
                    scaled_bar(bar.count, max),
                    bar.count
                );
            }
            let _ = writeln!(output, "({x_label})");
        }
        Chart::Heatmap { title, labels, matrix } => {
            let _ = writeln!(output, "## {title}");
            let _ = write!(output, "{:>18}", "");
            for label in labels {
                let _ = write!(output, " {:>7}", truncate(label, 7));
            }
            let _ = writeln!(output);
            for (label, row) in labels.iter().zip(matrix) {
                let _ = write!(output, "{:>18}", truncate(label, 18));
                for value in row {
                    if value.is_nan() {
                        let _ = write!(output, " {:>7}", "nan");
                    } else {
                        let _ = write!(output, " {value:>7.2}");
                    }
                }
                let _ = writeln!(output);
            }
        }
    }
}

fn scaled_bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH).div_ceil(max);
    "#".repeat(len)
}

fn truncate(label: &str, width: usize) -> &str {
    &label[..label.len().min(width)]
}
