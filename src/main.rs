//! Dashboard entry point: CLI wiring, one load cycle, optional watch or API.

use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use powerplan_dash::cli::Cli;
use powerplan_dash::config::DashboardConfig;
use powerplan_dash::controller::DashboardController;
use powerplan_dash::gateway::HttpGateway;
use powerplan_dash::io::export::export_plan_csv;
use powerplan_dash::series::ChartView;
use powerplan_dash::telemetry::{init_tracing, shutdown_signal};

fn load_config(cli: &Cli) -> DashboardConfig {
    let mut config = match cli.config.as_deref() {
        Some(path) => match DashboardConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => DashboardConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.gateway.base_url.clone_from(base_url);
    }
    #[cfg(feature = "api")]
    {
        if let Some(port) = cli.port {
            config.server.port = port;
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

fn print_chart(chart: &ChartView) {
    println!("\n--- {} ({}) ---", chart.layout.title.text, chart.view);
    if chart.series.is_empty() {
        println!("(no data)");
    }
    for s in &chart.series {
        let axis = if s.secondary_axis { "y2" } else { "y" };
        println!(
            "{:<24}{:>4} pts  {:?}  {}  {}",
            s.name,
            s.y.len(),
            s.render,
            s.style.color,
            axis
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli);

    let gateway = HttpGateway::new(&config.gateway.base_url, config.gateway_timeout())
        .context("failed to build HTTP client")?;
    let controller = Arc::new(DashboardController::new(
        gateway,
        config.controller_settings(),
    ));

    // Failures are recorded on the controller and the fallback payload is
    // shown, so the cycle continues either way.
    let loaded = if cli.regenerate {
        controller.regenerate().await
    } else {
        controller.refresh(&cli.filters()).await
    };
    if let Err(e) = loaded {
        eprintln!("warning: {e}");
    }

    println!("--- Status ---");
    for card in controller.status_cards() {
        println!("{card}");
    }
    if let Some(metrics) = controller.key_metrics() {
        println!("\n{metrics}");
    }
    print_chart(&controller.chart(cli.view));

    if let Some(path) = &cli.plan_csv {
        let payload = controller.payload().unwrap_or_default();
        export_plan_csv(&payload, path)
            .with_context(|| format!("failed to write plan CSV to {}", path.display()))?;
        eprintln!("Plan written to {}", path.display());
    }

    if cli.export {
        let path = controller.request_export(&cli.filters()).await?;
        eprintln!("Export saved to {}", path.display());
    }

    let watch = cli.watch || config.refresh.auto_start;

    #[cfg(feature = "api")]
    {
        if cli.serve {
            if watch {
                controller.start_auto_refresh();
            }
            let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.server.port));
            powerplan_dash::api::serve(Arc::clone(&controller), addr).await?;
            return Ok(());
        }
    }

    if watch {
        controller.start_auto_refresh();
        info!("watching; press Ctrl+C to stop");
        shutdown_signal().await;
        controller.stop_auto_refresh();
    }

    Ok(())
}
