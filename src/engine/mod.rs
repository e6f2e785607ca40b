use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    components::{FacilityTemplate, Settlement},
    error::{SimError, SimResult},
    plan::{Plan, PlanId},
    policy::{PolicyKind, SelectionPolicy},
    world::{TickSummary, World},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupInfo {
    pub tick: u64,
    pub taken_at: DateTime<Utc>,
}

struct Backup {
    info: BackupInfo,
    world: World,
}

/// Drives a `World` tick by tick and keeps the single rollback point.
#[derive(Default)]
pub struct Engine {
    world: World,
    backup: Option<Backup>,
}

impl Engine {
    pub fn new(world: World) -> Self {
        Self {
            world,
            backup: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn add_settlement(&mut self, settlement: Settlement) -> SimResult<()> {
        self.world.add_settlement(settlement)
    }

    pub fn add_facility_template(&mut self, template: FacilityTemplate) -> SimResult<()> {
        self.world.add_facility_template(template)
    }

    pub fn add_plan(&mut self, settlement: &str, policy_code: &str) -> SimResult<PlanId> {
        let kind: PolicyKind = policy_code.parse()?;
        self.world.add_plan(settlement, SelectionPolicy::new(kind))
    }

    pub fn change_policy(&mut self, plan: PlanId, policy_code: &str) -> SimResult<()> {
        let kind: PolicyKind = policy_code.parse()?;
        self.world.change_policy(plan, kind)
    }

    pub fn plan(&self, id: PlanId) -> SimResult<&Plan> {
        self.world.plan(id)
    }

    pub fn settlement(&self, name: &str) -> SimResult<&Settlement> {
        self.world.settlement(name)
    }

    /// Advances every plan `ticks` times.
    pub fn step(&mut self, ticks: u64) -> SimResult<()> {
        self.run_with_hook(ticks, |_| {})
    }

    /// Runs `ticks` ticks as one unit. If any tick fails the world is left
    /// as it was before the call and `hook` is never invoked; otherwise each
    /// tick's summary is handed to `hook` after the ticks are committed.
    pub fn run_with_hook<F>(&mut self, ticks: u64, mut hook: F) -> SimResult<()>
    where
        F: FnMut(&TickSummary),
    {
        let mut world = self.world.clone();
        let mut summaries = Vec::new();
        for _ in 0..ticks {
            summaries.push(world.step()?);
        }
        self.world = world;
        for summary in &summaries {
            hook(summary);
        }
        Ok(())
    }

    /// Stores a deep copy of the current world, replacing any earlier backup.
    pub fn backup(&mut self) -> BackupInfo {
        let info = BackupInfo {
            tick: self.world.tick(),
            taken_at: Utc::now(),
        };
        info!(tick = info.tick, "backup taken");
        self.backup = Some(Backup {
            info,
            world: self.world.clone(),
        });
        info
    }

    /// Replaces the live world with a fresh copy of the backup. The backup
    /// itself stays in place, so restoring twice yields the same state.
    pub fn restore(&mut self) -> SimResult<BackupInfo> {
        let backup = self.backup.as_ref().ok_or(SimError::NoBackupAvailable)?;
        self.world = backup.world.clone();
        info!(tick = backup.info.tick, "world restored from backup");
        Ok(backup.info)
    }

    pub fn backup_info(&self) -> Option<BackupInfo> {
        self.backup.as_ref().map(|backup| backup.info)
    }
}
