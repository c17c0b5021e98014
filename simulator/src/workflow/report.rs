use crate::workflow::runner::RunSummary;
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends a run to `path` as JSON lines: one summary line, then one line
/// per captured frame.
pub fn append_report(path: &Path, summary: &RunSummary) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let header = serde_json::to_string(summary).context("serializing run summary")?;
    writeln!(writer, "{header}")?;
    for frame in &summary.frames {
        let line = frame.to_json_line().context("serializing frame")?;
        writeln!(writer, "{line}")?;
    }
    writer.flush().context("flushing report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;

    #[test]
    fn report_appends_summary_and_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs/sonar.jsonl");
        let cfg = WorkflowConfig::from_args(4, 3_000, vec![0], 1_000).unwrap();
        let summary = Runner::new(cfg).execute().unwrap();

        append_report(&path, &summary).unwrap();
        append_report(&path, &summary).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2 * (1 + summary.frames.len()));
        assert!(lines[0].contains("\"seed\":4"));
        assert!(lines[1].contains("\"sweep_angle\""));
    }
}
