use serde::Serialize;
use tracing::debug;

use crate::components::{Facility, FacilityTemplate, Scores, Settlement};
use crate::error::{SimError, SimResult};
use crate::plan::{Plan, PlanId, PlanTick};
use crate::policy::{PolicyKind, SelectionPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSnapshot {
    pub id: u64,
    pub settlement: String,
    pub status: &'static str,
    pub policy: SelectionPolicy,
    pub scores: Scores,
    pub building: Vec<Facility>,
    pub completed: Vec<Facility>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub settlements: Vec<Settlement>,
    pub catalog: Vec<FacilityTemplate>,
    pub plans: Vec<PlanSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    pub plans: Vec<(PlanId, PlanTick)>,
}

/// Settlements, the facility catalog and every plan, in insertion order.
///
/// Nothing inside is shared by reference, so `clone()` is a fully
/// independent copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct World {
    next_plan: u64,
    tick: u64,
    settlements: Vec<Settlement>,
    catalog: Vec<FacilityTemplate>,
    plans: Vec<Plan>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_settlement(&mut self, settlement: Settlement) -> SimResult<()> {
        if self.has_settlement(settlement.name()) {
            return Err(SimError::DuplicateSettlement(settlement.name().to_string()));
        }
        self.settlements.push(settlement);
        Ok(())
    }

    pub fn add_facility_template(&mut self, template: FacilityTemplate) -> SimResult<()> {
        if self.catalog.iter().any(|known| known.name() == template.name()) {
            return Err(SimError::DuplicateTemplate(template.name().to_string()));
        }
        self.catalog.push(template);
        Ok(())
    }

    pub fn add_plan(&mut self, settlement: &str, policy: SelectionPolicy) -> SimResult<PlanId> {
        let settlement = self.settlement(settlement)?;
        let id = PlanId::new(self.next_plan);
        let plan = Plan::new(id, settlement, policy);
        self.next_plan += 1;
        self.plans.push(plan);
        Ok(id)
    }

    /// Swaps in a fresh policy of `kind`. Asking for the kind the plan
    /// already uses is rejected so its selection state survives.
    pub fn change_policy(&mut self, id: PlanId, kind: PolicyKind) -> SimResult<()> {
        let plan = self.plan_mut(id)?;
        if plan.policy().kind() == kind {
            return Err(SimError::PolicyUnchanged {
                plan: id,
                policy: kind,
            });
        }
        plan.set_selection_policy(SelectionPolicy::new(kind));
        Ok(())
    }

    /// Advances every plan once, in creation order. The tick is applied
    /// only if every plan succeeds.
    pub fn step(&mut self) -> SimResult<TickSummary> {
        let mut plans = self.plans.clone();
        let mut summary = TickSummary {
            tick: self.tick + 1,
            plans: Vec::with_capacity(plans.len()),
        };
        for plan in &mut plans {
            let settlement = self
                .settlements
                .iter()
                .find(|s| s.name() == plan.settlement_name())
                .ok_or_else(|| SimError::UnknownSettlement(plan.settlement_name().to_string()))?;
            let report = plan.step(settlement, &self.catalog)?;
            summary.plans.push((plan.id(), report));
        }
        self.plans = plans;
        self.tick = summary.tick;
        debug!(tick = self.tick, plans = self.plans.len(), "tick applied");
        Ok(summary)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn has_settlement(&self, name: &str) -> bool {
        self.settlements.iter().any(|s| s.name() == name)
    }

    pub fn settlement(&self, name: &str) -> SimResult<&Settlement> {
        self.settlements
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| SimError::UnknownSettlement(name.to_string()))
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn catalog(&self) -> &[FacilityTemplate] {
        &self.catalog
    }

    pub fn plan(&self, id: PlanId) -> SimResult<&Plan> {
        self.plans
            .iter()
            .find(|plan| plan.id() == id)
            .ok_or(SimError::UnknownPlan(id))
    }

    pub fn plan_mut(&mut self, id: PlanId) -> SimResult<&mut Plan> {
        self.plans
            .iter_mut()
            .find(|plan| plan.id() == id)
            .ok_or(SimError::UnknownPlan(id))
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let plans = self
            .plans
            .iter()
            .map(|plan| PlanSnapshot {
                id: plan.id().raw(),
                settlement: plan.settlement_name().to_string(),
                status: plan.status().label(),
                policy: plan.policy().clone(),
                scores: plan.scores(),
                building: plan.building().to_vec(),
                completed: plan.completed().to_vec(),
            })
            .collect();
        WorldSnapshot {
            tick: self.tick,
            settlements: self.settlements.clone(),
            catalog: self.catalog.clone(),
            plans,
        }
    }
}
