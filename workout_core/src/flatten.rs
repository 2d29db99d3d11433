//! Wire step tree → flat plan steps.
//!
//! Export runs three passes: every leaf is normalized into a [`PlanStep`],
//! repeat groups are expanded in place with their iteration count stamped on
//! each expanded step, and a rest that directly follows a step is folded into
//! that step's `rest_time_seconds`. Surviving steps are then numbered from 1.

use crate::codes::{self, END_CONDITIONS, STEP_TYPES, TARGET_TYPES};
use crate::units::to_display_weight;
use crate::wire::{WireLeaf, WireStep};
use crate::PlanStep;

/// Convert one wire leaf into a plan step.
///
/// `step_order` is carried through unchanged; it is overwritten once the
/// whole sequence has been flattened and merged.
pub fn normalize_step(leaf: &WireLeaf) -> PlanStep {
    let step_type = leaf
        .step_type
        .as_ref()
        .and_then(|code| {
            code.step_type_key
                .clone()
                .or_else(|| STEP_TYPES.key(code.step_type_id).map(str::to_string))
        })
        .unwrap_or_else(|| codes::STEP_EXERCISE.to_string());

    let target_type = leaf.target_type.as_ref().and_then(|code| {
        code.workout_target_type_key
            .clone()
            .or_else(|| TARGET_TYPES.key(code.workout_target_type_id).map(str::to_string))
    });

    // A zero target is meaningful only under a real target type
    let has_real_target = target_type
        .as_deref()
        .is_some_and(|key| key != codes::TARGET_NONE);
    let keep_target = |value: Option<f64>| value.filter(|v| *v != 0.0 || has_real_target);

    let end_condition = leaf.end_condition.as_ref().and_then(|code| {
        code.condition_type_key
            .clone()
            .or_else(|| END_CONDITIONS.key(code.condition_type_id).map(str::to_string))
    });

    let percent_display = leaf
        .weight_display_unit
        .as_ref()
        .is_some_and(|unit| unit.is_percent());

    let (weight, weight_percentage) = if percent_display {
        (None, leaf.weight_value.or(leaf.benchmark_percentage))
    } else {
        (
            leaf.weight_value
                .map(|value| to_display_weight(value, leaf.weight_unit.as_ref())),
            leaf.benchmark_percentage,
        )
    };

    let mut step = PlanStep {
        step_order: leaf.step_order,
        step_type,
        exercise_name: leaf.exercise_name.clone(),
        exercise_category: leaf.category.clone(),
        description: leaf.description.clone(),
        target_value_one: keep_target(leaf.target_value_one),
        target_value_two: keep_target(leaf.target_value_two),
        target_type,
        end_condition,
        weight,
        benchmark_key: leaf.benchmark_key.clone(),
        weight_percentage,
        ..Default::default()
    };
    step.set_end_condition_value(leaf.end_condition_value);
    step
}

/// Expand a wire step tree into a flat sequence.
///
/// Steps expanded from a repeat group all carry the group's iteration count.
/// Groups nest to any depth; the outermost group's count wins.
pub fn flatten(steps: &[WireStep]) -> Vec<PlanStep> {
    let mut flat = Vec::with_capacity(steps.len());

    for step in steps {
        match step {
            WireStep::Executable(leaf) => flat.push(normalize_step(leaf)),
            WireStep::RepeatGroup(group) => {
                let mut expanded = flatten(&group.workout_steps);
                for inner in &mut expanded {
                    inner.number_of_repeats = Some(group.number_of_iterations);
                }
                tracing::debug!(
                    "Expanded repeat group x{} into {} steps",
                    group.number_of_iterations,
                    expanded.len()
                );
                flat.extend(expanded);
            }
        }
    }

    flat
}

/// Fold each rest that directly follows a non-rest step into that step.
///
/// Each step is visited once, left to right, so of two consecutive rests
/// only the first is merged. A rest is never folded across a change in
/// repeat count, and a rest with no duration is left in place.
pub fn merge_rests(steps: Vec<PlanStep>) -> Vec<PlanStep> {
    let mut merged = Vec::with_capacity(steps.len());
    let mut iter = steps.into_iter().peekable();

    while let Some(mut step) = iter.next() {
        if !step.is_rest() {
            let rest_time = iter
                .peek()
                .filter(|next| next.is_rest() && next.number_of_repeats == step.number_of_repeats)
                .and_then(|next| next.duration_seconds.or(next.end_condition_value));

            if let Some(rest_time) = rest_time {
                step.rest_time_seconds = Some(rest_time);
                iter.next();
            }
        }
        merged.push(step);
    }

    renumber(&mut merged);
    merged
}

/// Assign contiguous 1-based step orders in sequence order
pub fn renumber(steps: &mut [PlanStep]) {
    for (position, step) in steps.iter_mut().enumerate() {
        step.step_order = Some(position as u32 + 1);
    }
}

/// Full export path: flatten, merge rests, renumber.
pub fn flatten_and_merge(steps: &[WireStep]) -> Vec<PlanStep> {
    let flat = flatten(steps);
    let before = flat.len();
    let merged = merge_rests(flat);
    tracing::debug!(
        "Flattened {} wire nodes into {} plan steps ({} rests merged)",
        steps.len(),
        merged.len(),
        before - merged.len()
    );
    merged
}
