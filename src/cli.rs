//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::payload::FilterParams;
use crate::series::ViewName;

#[derive(Debug, Parser)]
#[command(name = "powerplan-dash")]
#[command(about = "Energy optimization dashboard: status cards, chart series and exports", long_about = None)]
pub struct Cli {
    /// Load configuration from a TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the upstream API root (e.g. http://host:26781/api)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Day of a stored run (YYYYMMDD)
    #[arg(long)]
    pub day: Option<String>,

    /// Time of a stored run (HHMMSS)
    #[arg(long)]
    pub time: Option<String>,

    /// Presentation mode passed to the upstream
    #[arg(long)]
    pub view_type: Option<String>,

    /// Chart view to print (overview, states, power, prices, heating)
    #[arg(long, default_value = "overview")]
    pub view: ViewName,

    /// Trigger a recompute before loading the latest run
    #[arg(long)]
    pub regenerate: bool,

    /// Download the upstream CSV export into the export directory
    #[arg(long)]
    pub export: bool,

    /// Write the loaded plan as CSV to this path
    #[arg(long)]
    pub plan_csv: Option<PathBuf>,

    /// Keep running and refresh on the configured period
    #[arg(long)]
    pub watch: bool,

    /// Serve the JSON API
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port (overrides `[server] port`)
    #[cfg(feature = "api")]
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Run selection from `--day`, `--time` and `--view-type`.
    pub fn filters(&self) -> FilterParams {
        FilterParams {
            day: self.day.clone(),
            time: self.time.clone(),
            view_type: self.view_type.clone(),
        }
    }
}
