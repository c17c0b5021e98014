use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use sonarcore::Millis;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SAMPLE_RATE: u32 = 22_050;

/// Parameters of one headless sonar run.
///
/// `toggles_ms` lists the virtual times at which the start/stop control is
/// pressed; every run starts in standby.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkflowConfig {
    pub seed: u64,
    pub duration_ms: Millis,
    pub toggles_ms: Vec<Millis>,
    pub frame_interval_ms: Millis,
    pub sample_rate: u32,
    pub report: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            duration_ms: 20_000,
            toggles_ms: vec![0],
            frame_interval_ms: 500,
            sample_rate: DEFAULT_SAMPLE_RATE,
            report: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        seed: u64,
        duration_ms: Millis,
        toggles_ms: Vec<Millis>,
        frame_interval_ms: Millis,
    ) -> anyhow::Result<Self> {
        let config = Self {
            seed,
            duration_ms,
            toggles_ms: if toggles_ms.is_empty() {
                vec![0]
            } else {
                toggles_ms
            },
            frame_interval_ms,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.frame_interval_ms > 0, "frame_interval_ms must be positive");
        ensure!(self.duration_ms > 0, "duration_ms must be positive");
        Ok(())
    }

    /// Toggle times in press order, ignoring presses after the run ends.
    pub fn toggle_schedule(&self) -> Vec<Millis> {
        let mut toggles: Vec<Millis> = self
            .toggles_ms
            .iter()
            .copied()
            .filter(|at| *at <= self.duration_ms)
            .collect();
        toggles.sort_unstable();
        toggles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_defaults_to_single_start() {
        let cfg = WorkflowConfig::from_args(7, 10_000, Vec::new(), 250).unwrap();
        assert_eq!(cfg.toggles_ms, vec![0]);
        assert_eq!(cfg.sample_rate, DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn config_rejects_zero_frame_interval() {
        assert!(WorkflowConfig::from_args(1, 1_000, vec![0], 0).is_err());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"seed: 3\nduration_ms: 12000\ntoggles_ms: [0, 6000]\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.seed, 3);
        assert_eq!(cfg.toggles_ms, vec![0, 6_000]);
        assert_eq!(cfg.frame_interval_ms, 500);
    }

    #[test]
    fn toggle_schedule_is_sorted_and_bounded() {
        let cfg = WorkflowConfig {
            duration_ms: 5_000,
            toggles_ms: vec![4_000, 0, 9_000],
            ..Default::default()
        };
        assert_eq!(cfg.toggle_schedule(), vec![0, 4_000]);
    }
}
