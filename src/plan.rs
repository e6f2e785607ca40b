use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{Facility, FacilityTemplate, Scores, Settlement};
use crate::error::SimResult;
use crate::policy::SelectionPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanId(u64);

impl PlanId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanStatus {
    Available,
    Busy,
}

impl PlanStatus {
    pub fn label(self) -> &'static str {
        match self {
            PlanStatus::Available => "AVAILABLE",
            PlanStatus::Busy => "BUSY",
        }
    }
}

/// What happened to one plan during a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanTick {
    pub queued: Vec<String>,
    pub completed: Vec<String>,
}

/// Construction schedule for one settlement.
///
/// The settlement is held by name and resolved by the owning world on every
/// tick, so cloning a plan never ties it to another world's settlements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    id: PlanId,
    settlement: String,
    policy: SelectionPolicy,
    status: PlanStatus,
    building: Vec<Facility>,
    completed: Vec<Facility>,
    scores: Scores,
}

impl Plan {
    pub fn new(id: PlanId, settlement: &Settlement, policy: SelectionPolicy) -> Self {
        Self {
            id,
            settlement: settlement.name().to_string(),
            policy,
            status: PlanStatus::Available,
            building: Vec::new(),
            completed: Vec::new(),
            scores: Scores::default(),
        }
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn settlement_name(&self) -> &str {
        &self.settlement
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn status(&self) -> PlanStatus {
        self.status
    }

    pub fn building(&self) -> &[Facility] {
        &self.building
    }

    pub fn completed(&self) -> &[Facility] {
        &self.completed
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn life_quality_score(&self) -> u64 {
        self.scores.life_quality
    }

    pub fn economy_score(&self) -> u64 {
        self.scores.economy
    }

    pub fn environment_score(&self) -> u64 {
        self.scores.environment
    }

    /// Replaces the selection policy; the previous one and its state are
    /// dropped.
    pub fn set_selection_policy(&mut self, policy: SelectionPolicy) {
        self.policy = policy;
    }

    /// Appends an already built facility without touching the scores.
    pub fn add_facility(&mut self, facility: Facility) {
        self.completed.push(facility);
    }

    /// Runs one tick against `settlement`, which must be the settlement this
    /// plan was created for.
    ///
    /// Free slots are filled first, then every facility under construction
    /// (including the ones just queued) advances by one. On error the plan is
    /// left untouched.
    pub fn step(
        &mut self,
        settlement: &Settlement,
        catalog: &[FacilityTemplate],
    ) -> SimResult<PlanTick> {
        debug_assert_eq!(settlement.name(), self.settlement);
        let capacity = settlement.capacity();
        let mut report = PlanTick::default();

        if self.status == PlanStatus::Available {
            let free_slots = capacity.saturating_sub(self.building.len());
            let mut policy = self.policy.clone();
            let picks = (0..free_slots)
                .map(|_| {
                    policy
                        .select(catalog)
                        .map(|template| Facility::new(template, self.settlement.as_str()))
                })
                .collect::<SimResult<Vec<_>>>()?;
            self.policy = policy;
            for facility in picks {
                debug!(plan = %self.id, facility = facility.name(), "queued facility");
                report.queued.push(facility.name().to_string());
                self.building.push(facility);
            }
        }

        let (finished, still_building): (Vec<_>, Vec<_>) = std::mem::take(&mut self.building)
            .into_iter()
            .map(|mut facility| {
                facility.advance();
                facility
            })
            .partition(Facility::is_operational);
        self.building = still_building;

        for facility in finished {
            debug!(plan = %self.id, facility = facility.name(), "facility operational");
            self.scores += facility.scores();
            report.completed.push(facility.name().to_string());
            self.completed.push(facility);
        }

        self.status = if self.building.len() == capacity {
            PlanStatus::Busy
        } else {
            PlanStatus::Available
        };
        Ok(report)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plan ID: {}, Status: {}", self.id, self.status.label())
    }
}
