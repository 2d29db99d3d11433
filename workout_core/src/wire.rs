//! Backend wire format for workouts and their step trees.
//!
//! The backend tags every step node with a `"type"` discriminator; it is
//! modelled here as a closed enum so a leaf can never be mistaken for a
//! repeat group.

use serde::{Deserialize, Serialize};

// ============================================================================
// Coded descriptors
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepTypeCode {
    pub step_type_id: u32,
    #[serde(default)]
    pub step_type_key: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndConditionCode {
    pub condition_type_id: u32,
    #[serde(default)]
    pub condition_type_key: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetTypeCode {
    pub workout_target_type_id: u32,
    #[serde(default)]
    pub workout_target_type_key: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SportTypeCode {
    pub sport_type_id: u32,
    #[serde(default)]
    pub sport_type_key: Option<String>,
}

/// Unit tag attached to a weight value
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeightUnit {
    #[serde(default)]
    pub unit_id: Option<u32>,
    #[serde(default)]
    pub unit_key: Option<String>,
    #[serde(default)]
    pub factor: Option<f64>,
}

impl WeightUnit {
    /// The unit every rebuilt step is tagged with.
    pub fn native() -> Self {
        Self {
            unit_id: Some(2),
            unit_key: Some("gram".into()),
            factor: Some(1.0),
        }
    }

    pub fn pound() -> Self {
        Self {
            unit_id: Some(9),
            unit_key: Some("pound".into()),
            factor: Some(crate::units::GRAMS_PER_POUND),
        }
    }

    pub fn percent() -> Self {
        Self {
            unit_id: Some(20),
            unit_key: Some("percent".into()),
            factor: None,
        }
    }

    fn key_is(&self, candidates: &[&str]) -> bool {
        self.unit_key
            .as_deref()
            .is_some_and(|k| candidates.iter().any(|c| k.eq_ignore_ascii_case(c)))
    }

    /// Whether values in this unit are already whole pounds
    pub fn is_display_unit(&self) -> bool {
        self.key_is(&["pound", "lb", "lbs"])
    }

    pub fn is_percent(&self) -> bool {
        self.key_is(&["percent"])
    }
}

// ============================================================================
// Step tree
// ============================================================================

/// One node of a wire step tree
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum WireStep {
    #[serde(rename = "ExecutableStepDTO")]
    Executable(WireLeaf),
    #[serde(rename = "RepeatGroupDTO")]
    RepeatGroup(WireRepeatGroup),
}

/// A single executable step
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireLeaf {
    #[serde(default)]
    pub step_order: Option<u32>,
    #[serde(default)]
    pub step_type: Option<StepTypeCode>,
    #[serde(default)]
    pub exercise_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub end_condition: Option<EndConditionCode>,
    #[serde(default)]
    pub end_condition_value: Option<f64>,
    #[serde(default)]
    pub target_type: Option<TargetTypeCode>,
    #[serde(default)]
    pub target_value_one: Option<f64>,
    #[serde(default)]
    pub target_value_two: Option<f64>,
    #[serde(default)]
    pub weight_value: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<WeightUnit>,
    #[serde(default)]
    pub weight_display_unit: Option<WeightUnit>,
    #[serde(default)]
    pub benchmark_percentage: Option<f64>,
    #[serde(default)]
    pub benchmark_key: Option<String>,
}

/// "Repeat these steps N times"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireRepeatGroup {
    #[serde(default)]
    pub step_order: Option<u32>,
    #[serde(default)]
    pub step_type: Option<StepTypeCode>,
    pub number_of_iterations: u32,
    #[serde(default)]
    pub end_condition: Option<EndConditionCode>,
    #[serde(default)]
    pub end_condition_value: Option<f64>,
    #[serde(default)]
    pub workout_steps: Vec<WireStep>,
}

impl WireStep {
    pub fn step_order(&self) -> Option<u32> {
        match self {
            WireStep::Executable(leaf) => leaf.step_order,
            WireStep::RepeatGroup(group) => group.step_order,
        }
    }

    /// Clear every wire-assigned `stepOrder` in this subtree.
    ///
    /// Rebuilt trees never carry one, so fetched trees are compared after
    /// this.
    pub fn clear_step_orders(&mut self) {
        match self {
            WireStep::Executable(leaf) => leaf.step_order = None,
            WireStep::RepeatGroup(group) => {
                group.step_order = None;
                for step in &mut group.workout_steps {
                    step.clear_step_orders();
                }
            }
        }
    }
}

// ============================================================================
// Workout envelope
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSegment {
    pub segment_order: u32,
    #[serde(default)]
    pub sport_type: Option<SportTypeCode>,
    #[serde(default)]
    pub workout_steps: Vec<WireStep>,
}

/// Full workout as returned by "fetch" and sent by "create"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireWorkout {
    #[serde(default)]
    pub workout_id: Option<i64>,
    pub workout_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sport_type: Option<SportTypeCode>,
    #[serde(default)]
    pub workout_segments: Vec<WorkoutSegment>,
}

/// Element of the "list workouts" response
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub workout_id: i64,
    pub workout_name: String,
}

impl WireWorkout {
    /// Listing entry for a workout the backend has assigned an id to
    pub fn summary(&self) -> Option<WorkoutSummary> {
        self.workout_id.map(|workout_id| WorkoutSummary {
            workout_id,
            workout_name: self.workout_name.clone(),
        })
    }

    /// Every step of every segment, in segment order
    pub fn all_steps(&self) -> impl Iterator<Item = &WireStep> {
        self.workout_segments
            .iter()
            .flat_map(|segment| segment.workout_steps.iter())
    }
}
