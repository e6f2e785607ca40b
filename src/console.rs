use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::warn;

use crate::{
    command::{ActionRecord, ActionStatus, Command},
    components::{FacilityTemplate, Settlement},
    engine::Engine,
    error::SimResult,
    plan::Plan,
};

/// Interactive session over an engine: parses lines, executes them and keeps
/// the action log. Command output goes to `out`, `Error: ...` lines to `err`.
pub struct Console<W: Write, E: Write> {
    engine: Engine,
    out: W,
    err: E,
    log: Vec<ActionRecord>,
    running: bool,
}

impl<W: Write, E: Write> Console<W, E> {
    pub fn new(engine: Engine, out: W, err: E) -> Self {
        Self {
            engine,
            out,
            err,
            log: Vec::new(),
            running: true,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn log(&self) -> &[ActionRecord] {
        &self.log
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn errors(&self) -> &E {
        &self.err
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn into_parts(self) -> (Engine, W, E) {
        (self.engine, self.out, self.err)
    }

    /// Reads commands until `close` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        writeln!(self.out, "The simulation has started")?;
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            self.handle_line(&line)?;
            if !self.running {
                break;
            }
        }
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }
        match line.parse::<Command>() {
            Ok(command) => {
                self.execute(command)?;
            }
            Err(err) => {
                warn!(line, %err, "rejected command");
                writeln!(self.err, "Error: {err}")?;
            }
        }
        Ok(())
    }

    /// Executes one command and appends it to the action log. Simulation
    /// errors end up in the returned status; only output failures are `Err`.
    pub fn execute(&mut self, command: Command) -> Result<ActionStatus> {
        let status = match self.apply(&command)? {
            Ok(()) => ActionStatus::Completed,
            Err(err) => {
                warn!(%command, %err, "command failed");
                writeln!(self.err, "Error: {err}")?;
                ActionStatus::Error(err.to_string())
            }
        };
        self.log.push(ActionRecord {
            command,
            status: status.clone(),
        });
        Ok(status)
    }

    fn apply(&mut self, command: &Command) -> Result<SimResult<()>> {
        let outcome = match command {
            Command::Step(ticks) => self.engine.step(*ticks),
            Command::AddPlan { settlement, policy } => {
                self.engine.add_plan(settlement, policy).map(|_| ())
            }
            Command::AddSettlement { name, size } => {
                self.engine.add_settlement(Settlement::new(name.as_str(), *size))
            }
            Command::AddFacility {
                name,
                category,
                cost,
                scores,
            } => FacilityTemplate::new(name.as_str(), *category, *cost, *scores)
                .and_then(|template| self.engine.add_facility_template(template)),
            Command::PlanStatus(id) => match self.engine.plan(*id) {
                Ok(plan) => {
                    write_plan_status(&mut self.out, plan)?;
                    Ok(())
                }
                Err(err) => Err(err),
            },
            Command::ChangePolicy { plan, policy } => self.engine.change_policy(*plan, policy),
            Command::Log => {
                for record in &self.log {
                    writeln!(self.out, "{record}")?;
                }
                Ok(())
            }
            Command::Close => {
                for plan in self.engine.world().plans() {
                    write_plan_summary(&mut self.out, plan)?;
                }
                self.running = false;
                Ok(())
            }
            Command::Backup => {
                self.engine.backup();
                Ok(())
            }
            Command::Restore => self.engine.restore().map(|_| ()),
        };
        Ok(outcome)
    }
}

fn write_plan_summary<W: Write>(out: &mut W, plan: &Plan) -> Result<()> {
    writeln!(out, "PlanID: {}", plan.id())?;
    writeln!(out, "SettlementName: {}", plan.settlement_name())?;
    writeln!(out, "LifeQualityScore: {}", plan.life_quality_score())?;
    writeln!(out, "EconomyScore: {}", plan.economy_score())?;
    writeln!(out, "EnvironmentScore: {}", plan.environment_score())?;
    Ok(())
}

pub fn write_plan_status<W: Write>(out: &mut W, plan: &Plan) -> Result<()> {
    writeln!(out, "PlanID: {}", plan.id())?;
    writeln!(out, "SettlementName: {}", plan.settlement_name())?;
    writeln!(out, "PlanStatus: {}", plan.status().label())?;
    writeln!(out, "SelectionPolicy: {}", plan.policy().kind())?;
    writeln!(out, "LifeQualityScore: {}", plan.life_quality_score())?;
    writeln!(out, "EconomyScore: {}", plan.economy_score())?;
    writeln!(out, "EnvironmentScore: {}", plan.environment_score())?;
    for facility in plan.completed().iter().chain(plan.building()) {
        writeln!(out, "FacilityName: {}", facility.name())?;
        writeln!(out, "FacilityStatus: {}", facility.status().label())?;
    }
    Ok(())
}
