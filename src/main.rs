use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod charts;
mod data;
mod models;
mod normalize;
mod pages;
mod report;
mod stats;
mod tui;

#[derive(Parser)]
#[command(name = "classroom-activity-explorer")]
#[command(about = "Interactive explorer for classroom activity data", long_about = None)]
struct Cli {
    /// Path to the classroom activity CSV
    #[arg(long, default_value = "online_classroom_data.csv")]
    csv: PathBuf,
    /// Render one page as plain text and exit instead of opening the dashboard
    #[arg(long)]
    page: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dataset = data::load(&cli.csv)
        .with_context(|| format!("could not load dataset from {}", cli.csv.display()))?;

    match cli.page {
        Some(name) => {
            let params = pages::ViewParams::initial(&dataset);
            // Unknown page names render nothing, matching the dashboard's
            // silent no-op on an unrecognized navigation target.
            if let Some(view) = pages::dispatch(&dataset, &name, &params) {
                print!("{}", report::render_page(&view));
            }
        }
        None => tui::run(&dataset)?,
    }

    Ok(())
}
