//! Flat, human-editable planning representation of a workout.
//!
//! Enumerated fields are kept as plain string keys: plan files are edited by
//! hand, and an unknown key must survive long enough for the validator to
//! report it (or for the lenient rebuilder to substitute a default).

use crate::codes;
use crate::{Result, SchemaError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One flat planning step
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_order: Option<u32>,

    #[serde(default = "default_step_type")]
    pub step_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value_one: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value_two: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_condition_value: Option<f64>,

    // Parallel fields; at most one is set, mirroring end_condition_value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,

    /// Load in whole pounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_time_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_repeats: Option<u32>,
}

fn default_step_type() -> String {
    codes::STEP_EXERCISE.to_string()
}

impl PlanStep {
    pub fn is_rest(&self) -> bool {
        self.step_type == codes::STEP_REST
    }

    /// Set `end_condition_value` together with its parallel field.
    ///
    /// Conditions without a parallel field leave all three unset.
    pub fn set_end_condition_value(&mut self, value: Option<f64>) {
        self.end_condition_value = value;
        self.reps = None;
        self.duration_seconds = None;
        self.distance_meters = None;

        match self.end_condition.as_deref() {
            Some(codes::END_REPS) => self.reps = value,
            Some(codes::END_TIME) => self.duration_seconds = value,
            Some(codes::END_DISTANCE) => self.distance_meters = value,
            _ => {}
        }
    }

    /// The end-condition value, falling back to whichever parallel field
    /// matches the condition when the generic value was left out.
    pub fn effective_end_condition_value(&self) -> Option<f64> {
        self.end_condition_value.or(match self.end_condition.as_deref() {
            Some(codes::END_REPS) => self.reps,
            Some(codes::END_TIME) => self.duration_seconds,
            Some(codes::END_DISTANCE) => self.distance_meters,
            _ => None,
        })
    }
}

/// A named workout in a plan file
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanWorkout {
    #[serde(alias = "name")]
    pub workout_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<String>,

    /// Calendar day to schedule the workout on after upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,

    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

impl PlanWorkout {
    pub fn new(workout_name: impl Into<String>, steps: Vec<PlanStep>) -> Self {
        Self {
            workout_name: workout_name.into(),
            description: None,
            sport_type: None,
            scheduled_date: None,
            steps,
        }
    }

    /// Run the batch validator over this workout
    pub fn validate(&self) -> Result<Vec<SchemaError>> {
        let value = serde_json::to_value(self)?;
        Ok(crate::validate::validate_workout(&value))
    }
}
