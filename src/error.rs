use thiserror::Error;

use crate::plan::PlanId;
use crate::policy::PolicyKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("settlement '{0}' already exists")]
    DuplicateSettlement(String),

    #[error("facility '{0}' already exists")]
    DuplicateTemplate(String),

    #[error("settlement '{0}' doesn't exist")]
    UnknownSettlement(String),

    #[error("plan {0} doesn't exist")]
    UnknownPlan(PlanId),

    #[error("unknown selection policy '{0}'")]
    UnknownPolicy(String),

    #[error("unknown settlement size class {0}")]
    UnknownSizeClass(u8),

    #[error("unknown facility category {0}")]
    UnknownCategory(u8),

    #[error("no facility eligible for {policy} selection")]
    NoEligibleTemplate { policy: PolicyKind },

    #[error("no backup available")]
    NoBackupAvailable,

    #[error("plan {plan} already uses {policy} selection")]
    PolicyUnchanged { plan: PlanId, policy: PolicyKind },

    #[error("invalid facility '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },
}

pub type SimResult<T> = Result<T, SimError>;
