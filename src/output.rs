//! JSON report writing shared by the subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// Serializes `report` as pretty JSON to `path`, or to stdout when `None`.
pub fn write_json<T: Serialize>(report: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    match path {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Report {
        lag: f64,
        labels: Vec<&'static str>,
    }

    #[test]
    fn writes_pretty_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = Report {
            lag: 1.0,
            labels: vec!["C1", "O"],
        };
        write_json(&report, Some(&path)).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["lag"], 1.0);
        assert_eq!(value["labels"][1], "O");
    }

    #[test]
    fn unwritable_path_has_context() {
        let report = Report {
            lag: 1.0,
            labels: vec![],
        };
        let err = write_json(&report, Some(Path::new("/nonexistent/dir/report.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to write report"));
    }
}
