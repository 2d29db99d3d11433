#![forbid(unsafe_code)]

//! Core codec and pipeline for the wkplan workout planner.
//!
//! This crate provides:
//! - Wire model of the backend's nested workout step trees
//! - Flat, hand-editable plan model
//! - Bidirectional step codec (flatten/merge, rebuild)
//! - Strict plan validator
//! - Plan file I/O, remote client capability, export/upload pipelines

pub mod error;
pub mod codes;
pub mod units;
pub mod wire;
pub mod plan;
pub mod flatten;
pub mod validate;
pub mod rebuild;
pub mod codec;
pub mod plan_file;
pub mod client;
pub mod sync;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result, SchemaError};
pub use plan::{PlanStep, PlanWorkout};
pub use wire::{WireStep, WireWorkout};
pub use flatten::flatten_and_merge;
pub use validate::{validate_all, validate_or_throw, validate_workout};
pub use rebuild::rebuild;
pub use codec::{build_workout, export_workout};
pub use plan_file::{load_plan_file, parse_workouts, save_plan_file};
pub use client::{FixtureClient, HttpClient, WorkoutClient};
pub use sync::{export_plans, upload_plans, UploadOptions, UploadReport};
pub use config::Config;
