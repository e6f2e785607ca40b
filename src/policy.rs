//! Facility selection policies.
//!
//! Every variant carries its own cursor or running totals, so the same
//! catalog can yield a different template on every call.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::components::{FacilityCategory, FacilityTemplate, Scores};
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PolicyKind {
    Naive,
    Balanced,
    Economy,
    Sustainability,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Naive,
        PolicyKind::Balanced,
        PolicyKind::Economy,
        PolicyKind::Sustainability,
    ];

    /// Short code used on the command line and in scenario files.
    pub fn code(self) -> &'static str {
        match self {
            PolicyKind::Naive => "nve",
            PolicyKind::Balanced => "bal",
            PolicyKind::Economy => "eco",
            PolicyKind::Sustainability => "env",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(code: &str) -> SimResult<Self> {
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| SimError::UnknownPolicy(code.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Round-robin over the whole catalog.
    Naive { cursor: usize },
    /// Picks the template that keeps the running totals closest together.
    Balanced { totals: Scores },
    /// Round-robin over economy templates only.
    Economy { cursor: usize },
    /// Round-robin over environment templates only.
    Sustainability { cursor: usize },
}

impl SelectionPolicy {
    pub fn new(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Naive => SelectionPolicy::Naive { cursor: 0 },
            PolicyKind::Balanced => SelectionPolicy::balanced(Scores::default()),
            PolicyKind::Economy => SelectionPolicy::Economy { cursor: 0 },
            PolicyKind::Sustainability => SelectionPolicy::Sustainability { cursor: 0 },
        }
    }

    pub fn balanced(seed: Scores) -> Self {
        SelectionPolicy::Balanced { totals: seed }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            SelectionPolicy::Naive { .. } => PolicyKind::Naive,
            SelectionPolicy::Balanced { .. } => PolicyKind::Balanced,
            SelectionPolicy::Economy { .. } => PolicyKind::Economy,
            SelectionPolicy::Sustainability { .. } => PolicyKind::Sustainability,
        }
    }

    pub fn select<'a>(
        &mut self,
        catalog: &'a [FacilityTemplate],
    ) -> SimResult<&'a FacilityTemplate> {
        let kind = self.kind();
        let picked = match self {
            SelectionPolicy::Naive { cursor } => select_naive(cursor, catalog),
            SelectionPolicy::Balanced { totals } => select_balanced(totals, catalog),
            SelectionPolicy::Economy { cursor } => {
                select_category(cursor, catalog, FacilityCategory::Economy)
            }
            SelectionPolicy::Sustainability { cursor } => {
                select_category(cursor, catalog, FacilityCategory::Environment)
            }
        };
        picked.ok_or(SimError::NoEligibleTemplate { policy: kind })
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::new(PolicyKind::Naive)
    }
}

fn select_naive<'a>(
    cursor: &mut usize,
    catalog: &'a [FacilityTemplate],
) -> Option<&'a FacilityTemplate> {
    if catalog.is_empty() {
        return None;
    }
    if *cursor >= catalog.len() {
        *cursor = 0;
    }
    let picked = &catalog[*cursor];
    *cursor = (*cursor + 1) % catalog.len();
    Some(picked)
}

fn select_balanced<'a>(
    totals: &mut Scores,
    catalog: &'a [FacilityTemplate],
) -> Option<&'a FacilityTemplate> {
    // Ties go to the earliest template; min_by_key keeps the first minimum.
    let picked = catalog
        .iter()
        .min_by_key(|candidate| (*totals + candidate.scores()).spread())?;
    *totals += picked.scores();
    Some(picked)
}

fn select_category<'a>(
    cursor: &mut usize,
    catalog: &'a [FacilityTemplate],
    category: FacilityCategory,
) -> Option<&'a FacilityTemplate> {
    if *cursor >= catalog.len() {
        *cursor = 0;
    }
    let start = *cursor;
    let index = (start..catalog.len())
        .chain(0..start)
        .find(|&index| catalog[index].category() == category)?;
    *cursor = index + 1;
    Some(&catalog[index])
}
