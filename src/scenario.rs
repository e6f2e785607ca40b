use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::{
    command::Command,
    components::{FacilityCategory, FacilityTemplate, Scores, Settlement, SettlementSize},
    error::SimResult,
    policy::{PolicyKind, SelectionPolicy},
    world::World,
};

fn default_name() -> String {
    "unnamed".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub settlements: Vec<ScenarioSettlement>,
    #[serde(default)]
    pub facilities: Vec<ScenarioFacility>,
    #[serde(default)]
    pub plans: Vec<ScenarioPlan>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSettlement {
    pub name: String,
    pub size: SettlementSize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFacility {
    pub name: String,
    pub category: FacilityCategory,
    pub cost: u32,
    #[serde(default)]
    pub life_quality: u64,
    #[serde(default)]
    pub economy: u64,
    #[serde(default)]
    pub environment: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioPlan {
    pub settlement: String,
    pub policy: String,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Loads a YAML scenario (`.yaml`/`.yml`) or a line-oriented config file
    /// (anything else).
    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let scenario: Scenario = if is_yaml {
            serde_yaml::from_str(&data)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
                .unwrap_or_else(default_name);
            Scenario::from_config_lines(name, &data)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        };
        info!(
            path = %path.display(),
            settlements = scenario.settlements.len(),
            facilities = scenario.facilities.len(),
            plans = scenario.plans.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }
}

impl Scenario {
    /// Parses the `settlement` / `facility` / `plan` line format. Blank
    /// lines and lines starting with `#` are skipped.
    pub fn from_config_lines(name: impl Into<String>, text: &str) -> Result<Self> {
        let mut scenario = Scenario {
            name: name.into(),
            description: None,
            ticks: None,
            settlements: Vec::new(),
            facilities: Vec::new(),
            plans: Vec::new(),
        };
        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let command: Command = trimmed
                .parse()
                .with_context(|| format!("line {}: '{trimmed}'", index + 1))?;
            match command {
                Command::AddSettlement { name, size } => {
                    scenario.settlements.push(ScenarioSettlement { name, size });
                }
                Command::AddFacility {
                    name,
                    category,
                    cost,
                    scores,
                } => scenario.facilities.push(ScenarioFacility {
                    name,
                    category,
                    cost,
                    life_quality: scores.life_quality,
                    economy: scores.economy,
                    environment: scores.environment,
                }),
                Command::AddPlan { settlement, policy } => {
                    scenario.plans.push(ScenarioPlan { settlement, policy });
                }
                other => bail!("line {}: '{other}' is not allowed in a config file", index + 1),
            }
        }
        Ok(scenario)
    }

    /// Builds the initial world. Fails on the first duplicate or unknown
    /// name without returning a partial world.
    pub fn build_world(&self) -> SimResult<World> {
        let mut world = World::new();
        for settlement in &self.settlements {
            world.add_settlement(Settlement::new(settlement.name.as_str(), settlement.size))?;
        }
        for facility in &self.facilities {
            let scores = Scores::new(facility.life_quality, facility.economy, facility.environment);
            let template =
                FacilityTemplate::new(facility.name.as_str(), facility.category, facility.cost, scores)?;
            world.add_facility_template(template)?;
        }
        for plan in &self.plans {
            let kind: PolicyKind = plan.policy.parse()?;
            world.add_plan(&plan.settlement, SelectionPolicy::new(kind))?;
        }
        Ok(world)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> Option<u64> {
        override_ticks.or(self.ticks)
    }
}
