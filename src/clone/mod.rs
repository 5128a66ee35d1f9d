//! Destination resolution and the initial clone

pub mod destination;
pub mod git;
pub mod orchestrator;

pub use destination::resolve;
pub use git::{GitCli, GitRunner};
pub use orchestrator::CloneOrchestrator;
