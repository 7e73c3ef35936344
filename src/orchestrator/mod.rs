//! Orchestrator module for the daily overlay pipeline
//! Wires headline, factor and sentiment collaborators into the overlay builder

pub mod daily;

pub use daily::{DailyOrchestrator, DailyRun};
