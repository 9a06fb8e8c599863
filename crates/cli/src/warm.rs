use std::path::Path;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::info;
use trellis_core::RecordingHost;
use trellis_plugin::Container;

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Findings")]
    findings: usize,
}

pub fn run(project: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Warming discovery cache for {}", project.display());
    let mut runner = trellis_runtime::load_runner(project, Arc::new(Container::new()))?;

    // Registrations have no live host outside a request.
    let mut host = RecordingHost::new();
    let report = runner.warm(&mut host)?;

    let rows: Vec<UnitRow> = report
        .units
        .iter()
        .map(|summary| UnitRow {
            unit: summary.unit.clone(),
            phase: summary.phase.to_string(),
            findings: summary.findings,
        })
        .collect();
    println!("{}", Table::new(rows));
    println!(
        "Total: {} findings, {} host registrations",
        report.total_findings(),
        host.len()
    );

    match report.stored_units {
        Some(units) => println!(
            "Cached {} units under strategy {} in {}",
            units,
            report.strategy,
            runner.cache().cache_dir().display()
        ),
        None => println!("Cache strategy is none; nothing was stored."),
    }
    Ok(())
}
