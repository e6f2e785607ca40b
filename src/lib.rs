pub mod command;
pub mod components;
pub mod console;
pub mod engine;
pub mod error;
pub mod plan;
pub mod policy;
pub mod scenario;
pub mod world;

pub use engine::{BackupInfo, Engine};
pub use error::{SimError, SimResult};
pub use scenario::{Scenario, ScenarioLoader};
pub use world::{TickSummary, World, WorldSnapshot};
