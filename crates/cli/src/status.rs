use std::path::Path;
use tabled::{Table, Tabled};
use trellis_api::CacheStatus;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Property")]
    property: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

fn rows(status: &CacheStatus) -> Vec<StatusRow> {
    vec![
        StatusRow {
            property: "Strategy",
            value: status.strategy.to_string(),
        },
        StatusRow {
            property: "Stored strategy",
            value: status
                .stored_strategy
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        },
        StatusRow {
            property: "Enabled",
            value: yes_no(status.enabled),
        },
        StatusRow {
            property: "Exists",
            value: yes_no(status.exists),
        },
        StatusRow {
            property: "Valid",
            value: yes_no(status.valid),
        },
        StatusRow {
            property: "Directory",
            value: status.cache_dir.display().to_string(),
        },
    ]
}

pub fn run(project: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let status = trellis_runtime::open_cache(project)?.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", Table::new(rows(&status)));
    if status.strategy.is_none() {
        println!("Caching is off; set cache_strategy in trellis.json or TRELLIS_CACHE_STRATEGY.");
    } else if status.exists && !status.enabled {
        println!("Warning: cache was stored under a different strategy; run discovery:warm.");
    }
    Ok(())
}
