//! Whole-workout conversion between the wire and plan representations.

use crate::codes::{self, SPORT_TYPES};
use crate::flatten::flatten_and_merge;
use crate::rebuild::rebuild;
use crate::wire::{SportTypeCode, WireStep, WireWorkout, WorkoutSegment};
use crate::PlanWorkout;

/// Convert a fetched workout into its plan form.
///
/// Steps of all segments are flattened as one sequence.
pub fn export_workout(workout: &WireWorkout) -> PlanWorkout {
    let steps: Vec<WireStep> = workout.all_steps().cloned().collect();

    let sport_type = workout.sport_type.as_ref().and_then(|code| {
        code.sport_type_key
            .clone()
            .or_else(|| SPORT_TYPES.key(code.sport_type_id).map(str::to_string))
    });

    tracing::debug!(
        "Exporting workout '{}' ({} segments)",
        workout.workout_name,
        workout.workout_segments.len()
    );

    PlanWorkout {
        workout_name: workout.workout_name.clone(),
        description: workout.description.clone(),
        sport_type,
        scheduled_date: None,
        steps: flatten_and_merge(&steps),
    }
}

/// Build the create-workout payload for a plan workout.
///
/// The result has no `workoutId` and a single segment.
pub fn build_workout(plan: &PlanWorkout) -> WireWorkout {
    let (key, id) = SPORT_TYPES.encode(plan.sport_type.as_deref().unwrap_or(codes::SPORT_STRENGTH));
    let sport_type = SportTypeCode {
        sport_type_id: id,
        sport_type_key: Some(key),
    };

    WireWorkout {
        workout_id: None,
        workout_name: plan.workout_name.clone(),
        description: plan.description.clone(),
        sport_type: Some(sport_type.clone()),
        workout_segments: vec![WorkoutSegment {
            segment_order: 1,
            sport_type: Some(sport_type),
            workout_steps: rebuild(&plan.steps),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fetched_workout() -> WireWorkout {
        serde_json::from_value(json!({
            "workoutId": 9001,
            "workoutName": "Lower A",
            "description": "Squat focus",
            "sportType": {"sportTypeId": 5, "sportTypeKey": "strength_training"},
            "workoutSegments": [{
                "segmentOrder": 1,
                "sportType": {"sportTypeId": 5, "sportTypeKey": "strength_training"},
                "workoutSteps": [
                    {
                        "type": "ExecutableStepDTO",
                        "stepOrder": 1,
                        "stepType": {"stepTypeId": 1, "stepTypeKey": "warmup"},
                        "endCondition": {"conditionTypeId": 2, "conditionTypeKey": "time"},
                        "endConditionValue": 300.0,
                        "targetType": {"workoutTargetTypeId": 1, "workoutTargetTypeKey": "no-target"}
                    },
                    {
                        "type": "RepeatGroupDTO",
                        "stepOrder": 2,
                        "stepType": {"stepTypeId": 7, "stepTypeKey": "repeat"},
                        "numberOfIterations": 5,
                        "endCondition": {"conditionTypeId": 7, "conditionTypeKey": "iterations"},
                        "endConditionValue": 5.0,
                        "workoutSteps": [
                            {
                                "type": "ExecutableStepDTO",
                                "stepOrder": 3,
                                "stepType": {"stepTypeId": 6, "stepTypeKey": "exercise"},
                                "exerciseName": "BARBELL_BACK_SQUAT",
                                "category": "SQUAT",
                                "endCondition": {"conditionTypeId": 6, "conditionTypeKey": "reps"},
                                "endConditionValue": 5.0,
                                "targetType": {"workoutTargetTypeId": 1, "workoutTargetTypeKey": "no-target"},
                                "weightValue": 102058.0,
                                "weightUnit": {"unitId": 2, "unitKey": "gram", "factor": 1.0}
                            },
                            {
                                "type": "ExecutableStepDTO",
                                "stepOrder": 4,
                                "stepType": {"stepTypeId": 3, "stepTypeKey": "rest"},
                                "endCondition": {"conditionTypeId": 2, "conditionTypeKey": "time"},
                                "endConditionValue": 180.0,
                                "targetType": {"workoutTargetTypeId": 1, "workoutTargetTypeKey": "no-target"}
                            }
                        ]
                    }
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_export_flattens_and_merges() {
        let plan = export_workout(&fetched_workout());

        assert_eq!(plan.workout_name, "Lower A");
        assert_eq!(plan.sport_type.as_deref(), Some("strength_training"));
        assert_eq!(plan.steps.len(), 2);

        let squat = &plan.steps[1];
        assert_eq!(squat.exercise_name.as_deref(), Some("BARBELL_BACK_SQUAT"));
        assert_eq!(squat.exercise_category.as_deref(), Some("SQUAT"));
        assert_eq!(squat.weight, Some(225.0));
        assert_eq!(squat.rest_time_seconds, Some(180.0));
        assert_eq!(squat.number_of_repeats, Some(5));
        assert_eq!(squat.step_order, Some(2));
    }

    #[test]
    fn test_fetched_workout_roundtrips() {
        let mut fetched = fetched_workout();
        let mut rebuilt = build_workout(&export_workout(&fetched));

        fetched.workout_id = None;
        for segment in fetched
            .workout_segments
            .iter_mut()
            .chain(rebuilt.workout_segments.iter_mut())
        {
            for step in &mut segment.workout_steps {
                step.clear_step_orders();
            }
        }

        assert_eq!(rebuilt, fetched);
    }

    #[test]
    fn test_build_defaults_to_strength() {
        let wire = build_workout(&PlanWorkout::new("Empty", vec![]));
        let sport = wire.sport_type.unwrap();
        assert_eq!(sport.sport_type_id, 5);
        assert_eq!(wire.workout_segments.len(), 1);
        assert!(wire.workout_segments[0].workout_steps.is_empty());
    }
}
