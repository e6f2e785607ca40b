use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Size class of a settlement, serialized as its integer code (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SettlementSize {
    Village,
    City,
    Metropolis,
}

impl SettlementSize {
    /// Maximum number of facilities under construction at the same time.
    pub fn capacity(self) -> usize {
        match self {
            SettlementSize::Village => 1,
            SettlementSize::City => 2,
            SettlementSize::Metropolis => 3,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SettlementSize::Village => 0,
            SettlementSize::City => 1,
            SettlementSize::Metropolis => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettlementSize::Village => "Village",
            SettlementSize::City => "City",
            SettlementSize::Metropolis => "Metropolis",
        }
    }
}

impl TryFrom<u8> for SettlementSize {
    type Error = SimError;

    fn try_from(code: u8) -> SimResult<Self> {
        match code {
            0 => Ok(SettlementSize::Village),
            1 => Ok(SettlementSize::City),
            2 => Ok(SettlementSize::Metropolis),
            other => Err(SimError::UnknownSizeClass(other)),
        }
    }
}

impl From<SettlementSize> for u8 {
    fn from(size: SettlementSize) -> Self {
        size.code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    name: String,
    size: SettlementSize,
}

impl Settlement {
    pub fn new(name: impl Into<String>, size: SettlementSize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> SettlementSize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.size.capacity()
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.size.label())
    }
}

/// Facility category, serialized as its integer code (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FacilityCategory {
    LifeQuality,
    Economy,
    Environment,
}

impl FacilityCategory {
    pub fn code(self) -> u8 {
        match self {
            FacilityCategory::LifeQuality => 0,
            FacilityCategory::Economy => 1,
            FacilityCategory::Environment => 2,
        }
    }
}

impl TryFrom<u8> for FacilityCategory {
    type Error = SimError;

    fn try_from(code: u8) -> SimResult<Self> {
        match code {
            0 => Ok(FacilityCategory::LifeQuality),
            1 => Ok(FacilityCategory::Economy),
            2 => Ok(FacilityCategory::Environment),
            other => Err(SimError::UnknownCategory(other)),
        }
    }
}

impl From<FacilityCategory> for u8 {
    fn from(category: FacilityCategory) -> Self {
        category.code()
    }
}

/// Life quality / economy / environment triple, used both for a template's
/// contribution and for running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub life_quality: u64,
    pub economy: u64,
    pub environment: u64,
}

impl Scores {
    pub fn new(life_quality: u64, economy: u64, environment: u64) -> Self {
        Self {
            life_quality,
            economy,
            environment,
        }
    }

    /// Distance between the largest and the smallest component.
    pub fn spread(&self) -> u64 {
        let max = self.life_quality.max(self.economy).max(self.environment);
        let min = self.life_quality.min(self.economy).min(self.environment);
        max - min
    }
}

/// Component-wise sum, saturating at `u64::MAX`.
impl Add for Scores {
    type Output = Scores;

    fn add(self, rhs: Scores) -> Scores {
        Scores {
            life_quality: self.life_quality.saturating_add(rhs.life_quality),
            economy: self.economy.saturating_add(rhs.economy),
            environment: self.environment.saturating_add(rhs.environment),
        }
    }
}

impl AddAssign for Scores {
    fn add_assign(&mut self, rhs: Scores) {
        *self = *self + rhs;
    }
}

/// Immutable blueprint for a buildable facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilityTemplate {
    name: String,
    category: FacilityCategory,
    cost: u32,
    scores: Scores,
}

impl FacilityTemplate {
    pub fn new(
        name: impl Into<String>,
        category: FacilityCategory,
        cost: u32,
        scores: Scores,
    ) -> SimResult<Self> {
        let name = name.into();
        if cost == 0 {
            return Err(SimError::InvalidTemplate {
                name,
                reason: "build cost must be at least one tick".into(),
            });
        }
        Ok(Self {
            name,
            category,
            cost,
            scores,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> FacilityCategory {
        self.category
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FacilityStatus {
    UnderConstruction,
    Operational,
}

impl FacilityStatus {
    pub fn label(self) -> &'static str {
        match self {
            FacilityStatus::UnderConstruction => "UNDER_CONSTRUCTION",
            FacilityStatus::Operational => "OPERATIONAL",
        }
    }
}

/// A template instance being built (or already built) in one settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facility {
    template: FacilityTemplate,
    settlement: String,
    status: FacilityStatus,
    remaining: u32,
}

impl Facility {
    pub fn new(template: &FacilityTemplate, settlement: impl Into<String>) -> Self {
        Self {
            template: template.clone(),
            settlement: settlement.into(),
            status: FacilityStatus::UnderConstruction,
            remaining: template.cost(),
        }
    }

    /// Advances construction by one tick. Operational facilities are left
    /// untouched.
    pub fn advance(&mut self) -> FacilityStatus {
        if self.status == FacilityStatus::UnderConstruction {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.status = FacilityStatus::Operational;
            }
        }
        self.status
    }

    pub fn name(&self) -> &str {
        self.template.name()
    }

    pub fn template(&self) -> &FacilityTemplate {
        &self.template
    }

    pub fn settlement(&self) -> &str {
        &self.settlement
    }

    pub fn status(&self) -> FacilityStatus {
        self.status
    }

    pub fn is_operational(&self) -> bool {
        self.status == FacilityStatus::Operational
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn scores(&self) -> Scores {
        self.template.scores()
    }
}
