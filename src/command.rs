//! Text commands accepted by the console and by line-oriented config files.

use std::fmt;
use std::str::{FromStr, SplitWhitespace};

use thiserror::Error;

use crate::components::{FacilityCategory, Scores, SettlementSize};
use crate::plan::PlanId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Step(u64),
    AddPlan {
        settlement: String,
        policy: String,
    },
    AddSettlement {
        name: String,
        size: SettlementSize,
    },
    AddFacility {
        name: String,
        category: FacilityCategory,
        cost: u32,
        scores: Scores,
    },
    PlanStatus(PlanId),
    ChangePolicy {
        plan: PlanId,
        policy: String,
    },
    Log,
    Close,
    Backup,
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },

    #[error("{command}: invalid {argument} '{value}'")]
    InvalidArgument {
        command: String,
        argument: &'static str,
        value: String,
    },

    #[error("{command}: unexpected argument '{value}'")]
    UnexpectedArgument { command: String, value: String },
}

struct Args<'a> {
    command: &'a str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn text(&mut self, argument: &'static str) -> Result<String, CommandError> {
        self.tokens
            .next()
            .map(str::to_string)
            .ok_or(CommandError::MissingArgument {
                command: self.command.to_string(),
                argument,
            })
    }

    fn number<T: FromStr>(&mut self, argument: &'static str) -> Result<T, CommandError> {
        let value = self.text(argument)?;
        value.parse().map_err(|_| CommandError::InvalidArgument {
            command: self.command.to_string(),
            argument,
            value,
        })
    }

    fn code<T: TryFrom<u8>>(&mut self, argument: &'static str) -> Result<T, CommandError> {
        let raw: u8 = self.number(argument)?;
        T::try_from(raw).map_err(|_| CommandError::InvalidArgument {
            command: self.command.to_string(),
            argument,
            value: raw.to_string(),
        })
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.tokens.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument {
                command: self.command.to_string(),
                value: extra.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let command = tokens.next().ok_or(CommandError::Empty)?;
        let mut args = Args { command, tokens };
        let parsed = match command {
            "step" => Command::Step(args.number("step count")?),
            "plan" => Command::AddPlan {
                settlement: args.text("settlement name")?,
                policy: args.text("selection policy")?,
            },
            "settlement" => Command::AddSettlement {
                name: args.text("settlement name")?,
                size: args.code("settlement size")?,
            },
            "facility" => Command::AddFacility {
                name: args.text("facility name")?,
                category: args.code("facility category")?,
                cost: args.number("cost")?,
                scores: Scores::new(
                    args.number("life quality score")?,
                    args.number("economy score")?,
                    args.number("environment score")?,
                ),
            },
            "planStatus" => Command::PlanStatus(PlanId::new(args.number("plan id")?)),
            "changePolicy" => Command::ChangePolicy {
                plan: PlanId::new(args.number("plan id")?),
                policy: args.text("selection policy")?,
            },
            "log" => Command::Log,
            "close" => Command::Close,
            "backup" => Command::Backup,
            "restore" => Command::Restore,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        args.finish()?;
        Ok(parsed)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Step(ticks) => write!(f, "step {ticks}"),
            Command::AddPlan { settlement, policy } => write!(f, "plan {settlement} {policy}"),
            Command::AddSettlement { name, size } => {
                write!(f, "settlement {name} {}", size.code())
            }
            Command::AddFacility {
                name,
                category,
                cost,
                scores,
            } => write!(
                f,
                "facility {name} {} {cost} {} {} {}",
                category.code(),
                scores.life_quality,
                scores.economy,
                scores.environment
            ),
            Command::PlanStatus(plan) => write!(f, "planStatus {plan}"),
            Command::ChangePolicy { plan, policy } => write!(f, "changePolicy {plan} {policy}"),
            Command::Log => f.write_str("log"),
            Command::Close => f.write_str("close"),
            Command::Backup => f.write_str("backup"),
            Command::Restore => f.write_str("restore"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Completed,
    Error(String),
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Completed => f.write_str("COMPLETED"),
            ActionStatus::Error(message) => write!(f, "ERROR: {message}"),
        }
    }
}

/// One executed command and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub command: Command,
    pub status: ActionStatus,
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.command, self.status)
    }
}
