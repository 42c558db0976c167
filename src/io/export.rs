//! CSV export of the optimization plan held in a payload.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::payload::Payload;

/// Column header of the plan CSV.
const HEADER: &str = "time,fve_pred,load_pred,buy_price,sell_price,\
                      g_buy,g_sell,h_in_lower,h_in_upper,\
                      battery_target_soc,temp_lower,temp_upper,fve_surplus,charger_mode";

/// Exports the plan of `payload` to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_plan_csv(payload: &Payload, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_plan_csv(payload, buf)
}

fn cell(series: Option<&Vec<f64>>, i: usize) -> String {
    series
        .and_then(|s| s.get(i))
        .map(|v| format!("{v:.4}"))
        .unwrap_or_default()
}

/// Writes one row per timestamp with forecast, decision and timeline columns.
///
/// Cells of series that are absent or shorter than the time axis are left
/// empty. A payload without chart data produces only the header.
///
/// # Arguments
///
/// * `payload` - Payload whose plan is written
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_plan_csv(payload: &Payload, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let Some(chart) = payload.chart_data.as_ref() else {
        wtr.flush()?;
        return Ok(());
    };
    let inputs = chart.inputs.as_ref();
    let outputs = chart.outputs.as_ref();
    let timeline = payload
        .solution
        .as_ref()
        .and_then(|s| s.actions_timeline.as_ref());

    for (i, time) in chart.timestamps.iter().enumerate() {
        wtr.write_record(&[
            time.clone(),
            cell(inputs.and_then(|x| x.fve_pred.as_ref()), i),
            cell(inputs.and_then(|x| x.load_pred.as_ref()), i),
            cell(inputs.and_then(|x| x.buy_price.as_ref()), i),
            cell(inputs.and_then(|x| x.sell_price.as_ref()), i),
            cell(outputs.and_then(|o| o.g_buy.as_ref()), i),
            cell(outputs.and_then(|o| o.g_sell.as_ref()), i),
            cell(outputs.and_then(|o| o.h_in_lower.as_ref()), i),
            cell(outputs.and_then(|o| o.h_in_upper.as_ref()), i),
            cell(timeline.and_then(|t| t.battery_target_soc.as_ref()), i),
            cell(timeline.and_then(|t| t.temp_lower.as_ref()), i),
            cell(timeline.and_then(|t| t.temp_upper.as_ref()), i),
            cell(timeline.and_then(|t| t.fve_surplus.as_ref()), i),
            timeline
                .and_then(|t| t.charger_mode.as_ref())
                .and_then(|m| m.get(i))
                .cloned()
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
