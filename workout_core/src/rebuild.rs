//! Flat plan steps → wire step tree.
//!
//! The inverse of [`crate::flatten::flatten_and_merge`]: contiguous runs of
//! steps sharing a repeat count are regrouped, merged rest is re-expanded
//! into explicit rest leaves, and keys are re-encoded to backend codes.
//!
//! Rebuilding never fails. Keys outside the lookup tables are replaced by
//! the table's fallback so a hand-edited file can still be exported.

use crate::codes::{self, END_CONDITIONS, STEP_TYPES, TARGET_TYPES};
use crate::units::to_native_weight;
use crate::wire::{
    EndConditionCode, StepTypeCode, TargetTypeCode, WeightUnit, WireLeaf, WireRepeatGroup,
    WireStep,
};
use crate::PlanStep;

/// Rebuild a wire step tree from flat plan steps.
pub fn rebuild(steps: &[PlanStep]) -> Vec<WireStep> {
    let mut wire = Vec::new();

    for run in steps.chunk_by(|a, b| a.number_of_repeats == b.number_of_repeats) {
        let mut leaves = Vec::with_capacity(run.len());
        for step in run {
            leaves.push(WireStep::Executable(build_leaf(step)));
            if let Some(rest) = step.rest_time_seconds.filter(|r| *r > 0.0) {
                leaves.push(WireStep::Executable(rest_leaf(rest)));
            }
        }

        match run[0].number_of_repeats {
            Some(iterations) if iterations > 1 => {
                tracing::debug!(
                    "Grouping {} leaves into repeat group x{}",
                    leaves.len(),
                    iterations
                );
                wire.push(WireStep::RepeatGroup(repeat_group(iterations, leaves)));
            }
            _ => wire.extend(leaves),
        }
    }

    wire
}

fn step_type_code(key: &str) -> StepTypeCode {
    let (key, id) = STEP_TYPES.encode(key);
    StepTypeCode {
        step_type_id: id,
        step_type_key: Some(key),
    }
}

fn end_condition_code(key: &str) -> EndConditionCode {
    let (key, id) = END_CONDITIONS.encode(key);
    EndConditionCode {
        condition_type_id: id,
        condition_type_key: Some(key),
    }
}

fn target_type_code(key: &str) -> TargetTypeCode {
    let (key, id) = TARGET_TYPES.encode(key);
    TargetTypeCode {
        workout_target_type_id: id,
        workout_target_type_key: Some(key),
    }
}

fn build_leaf(step: &PlanStep) -> WireLeaf {
    WireLeaf {
        step_order: None,
        step_type: Some(step_type_code(&step.step_type)),
        exercise_name: step.exercise_name.clone(),
        category: step.exercise_category.clone(),
        description: step.description.clone(),
        end_condition: step.end_condition.as_deref().map(end_condition_code),
        end_condition_value: step.effective_end_condition_value(),
        target_type: step.target_type.as_deref().map(target_type_code),
        target_value_one: step.target_value_one,
        target_value_two: step.target_value_two,
        weight_value: step.weight.map(to_native_weight),
        weight_unit: step.weight.map(|_| WeightUnit::native()),
        weight_display_unit: None,
        benchmark_percentage: step.weight_percentage,
        benchmark_key: step.benchmark_key.clone(),
    }
}

/// Explicit rest leaf re-expanded from a merged `rest_time_seconds`
fn rest_leaf(seconds: f64) -> WireLeaf {
    WireLeaf {
        step_type: Some(step_type_code(codes::STEP_REST)),
        end_condition: Some(end_condition_code(codes::END_TIME)),
        end_condition_value: Some(seconds),
        target_type: Some(target_type_code(codes::TARGET_NONE)),
        ..Default::default()
    }
}

fn repeat_group(iterations: u32, steps: Vec<WireStep>) -> WireRepeatGroup {
    WireRepeatGroup {
        step_order: None,
        step_type: Some(step_type_code(codes::STEP_REPEAT)),
        number_of_iterations: iterations,
        end_condition: Some(end_condition_code(codes::END_ITERATIONS)),
        end_condition_value: Some(f64::from(iterations)),
        workout_steps: steps,
    }
}
