use crate::generator::scene::{default_scene, SceneObject};
use anyhow::Context;
use objectifycore::StabilityConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub stability: StabilityConfig,
    /// Stop after this many detection cycles; run until Ctrl+C when absent.
    pub cycles: Option<usize>,
    pub seed: u64,
    pub bind: SocketAddr,
    pub scene: Vec<SceneObject>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            stability: StabilityConfig::default(),
            cycles: None,
            seed: 0,
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            scene: default_scene(),
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
        Ok(config)
    }

    pub fn with_overrides(
        mut self,
        cadence_ms: Option<u64>,
        cycles: Option<usize>,
        bind: Option<SocketAddr>,
    ) -> Self {
        if let Some(cadence_ms) = cadence_ms {
            self.stability.batch_cadence_ms = cadence_ms;
        }
        if cycles.is_some() {
            self.cycles = cycles;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.stability
            .validate()
            .context("validating stability thresholds")?;
        Ok(())
    }
}
