//! Strict schema validation for plan workouts.
//!
//! Runs over raw JSON rather than typed [`crate::PlanWorkout`] values so a
//! hand-edited file with a missing or non-numeric field is reported with
//! its workout and step instead of failing deserialization on the first
//! problem.
//!
//! Each step stops at its first violation. The batch entry points keep going
//! with the remaining steps and workouts so every problem can be fixed in one
//! pass.

use crate::codes::{self, CodeTable, END_CONDITIONS, STEP_TYPES, TARGET_TYPES};
use crate::{Result, SchemaError};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Upper bound on display weight; anything larger is most likely a value
/// still in the native unit.
pub const MAX_DISPLAY_WEIGHT: f64 = 1000.0;

/// Upper bound on a percentage-of-benchmark load
pub const MAX_WEIGHT_PERCENTAGE: f64 = 200.0;

const UNNAMED: &str = "<unnamed>";

/// Validate one workout, collecting every violation.
pub fn validate_workout(workout: &Value) -> Vec<SchemaError> {
    let name = workout_name(workout);
    let label = name.unwrap_or(UNNAMED);
    let mut errors = Vec::new();

    let Some(object) = workout.as_object() else {
        errors.push(SchemaError::workout(label, "workout must be a JSON object"));
        return errors;
    };

    if name.map_or(true, |n| n.trim().is_empty()) {
        errors.push(SchemaError::workout(
            label,
            "workoutName is required and must be a non-empty string",
        ));
    }
    if object.contains_key("workoutName") && object.contains_key("name") {
        errors.push(SchemaError::workout(
            label,
            "workoutName and name are both set; keep one",
        ));
    }
    for field in ["description", "sportType"] {
        if let Err(message) = string_field(object, field) {
            errors.push(SchemaError::workout(label, message));
        }
    }
    if let Err(message) = date_field(object, "scheduledDate") {
        errors.push(SchemaError::workout(label, message));
    }

    match object.get("steps") {
        Some(Value::Array(steps)) => {
            for (index, step) in steps.iter().enumerate() {
                if let Err(message) = validate_step(step) {
                    errors.push(SchemaError::step(label, index + 1, message));
                }
            }
        }
        Some(_) => errors.push(SchemaError::workout(label, "steps must be an array")),
        None => errors.push(SchemaError::workout(label, "steps is required")),
    }

    errors
}

/// Validate every workout of a plan file, collecting every violation.
pub fn validate_all(workouts: &[Value]) -> Vec<SchemaError> {
    let errors: Vec<_> = workouts.iter().flat_map(validate_workout).collect();
    tracing::debug!(
        "Validated {} workouts, {} error(s)",
        workouts.len(),
        errors.len()
    );
    errors
}

/// Validate one workout, failing on the first violation.
pub fn validate_or_throw(workout: &Value) -> Result<()> {
    match validate_workout(workout).into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Name used to label a workout's errors
pub(crate) fn workout_label(workout: &Value) -> &str {
    workout_name(workout).unwrap_or(UNNAMED)
}

fn workout_name(workout: &Value) -> Option<&str> {
    workout
        .get("workoutName")
        .or_else(|| workout.get("name"))
        .and_then(Value::as_str)
}

/// Check one step, returning the first violated rule's message.
pub fn validate_step(step: &Value) -> std::result::Result<(), String> {
    let step = step
        .as_object()
        .ok_or_else(|| "step must be a JSON object".to_string())?;

    // Free-text fields and the step's own position
    for field in ["exerciseName", "exerciseCategory", "description", "benchmarkKey"] {
        string_field(step, field)?;
    }
    whole_number(step, "stepOrder")?;

    // 1. Step type
    let step_type = enum_field(step, "stepType", &STEP_TYPES)?
        .ok_or_else(|| "stepType is required".to_string())?;

    // 2. End condition
    let end_condition = enum_field(step, "endCondition", &END_CONDITIONS)?;
    if end_condition.is_none() && step_type != codes::STEP_REST {
        return Err("endCondition is required".to_string());
    }
    if end_condition.is_some() {
        let value = number(step, "endConditionValue")?
            .ok_or_else(|| "endConditionValue is required with endCondition".to_string())?;
        positive("endConditionValue", value)?;
    }

    // 3. Target
    enum_field(step, "targetType", &TARGET_TYPES)?
        .ok_or_else(|| "targetType is required".to_string())?;
    number(step, "targetValueOne")?;
    number(step, "targetValueTwo")?;

    // 4. Absolute weight
    if let Some(weight) = number(step, "weight")? {
        if weight < 0.0 {
            return Err(format!("weight must be >= 0, got {}", weight));
        }
        if weight > MAX_DISPLAY_WEIGHT {
            return Err(format!(
                "weight {} exceeds {} lb; is it still in grams?",
                weight, MAX_DISPLAY_WEIGHT
            ));
        }
    }

    // 5. Relative weight
    if let Some(percentage) = number(step, "weightPercentage")? {
        if percentage <= 0.0 || percentage > MAX_WEIGHT_PERCENTAGE {
            return Err(format!(
                "weightPercentage must be in (0, {}], got {}",
                MAX_WEIGHT_PERCENTAGE, percentage
            ));
        }
        let has_key = step
            .get("benchmarkKey")
            .and_then(Value::as_str)
            .is_some_and(|key| !key.is_empty());
        if !has_key {
            return Err("benchmarkKey is required with weightPercentage".to_string());
        }
    }

    // 6-8. Parallel fields
    let reps = optional_positive(step, "reps")?;
    let duration = optional_positive(step, "durationSeconds")?;
    let distance = optional_positive(step, "distanceMeters")?;

    // 9. Merged rest
    if let Some(rest) = number(step, "restTimeSeconds")? {
        if rest < 0.0 {
            return Err(format!("restTimeSeconds must be >= 0, got {}", rest));
        }
    }

    // 10. Repeat count
    optional_positive(step, "numberOfRepeats")?;
    whole_number(step, "numberOfRepeats")?;

    // 11. Parallel field must agree with the end condition value
    if let Some(condition) = end_condition {
        let parallel = match condition {
            codes::END_REPS => Some(("reps", reps)),
            codes::END_TIME => Some(("durationSeconds", duration)),
            codes::END_DISTANCE => Some(("distanceMeters", distance)),
            _ => None,
        };
        if let Some((field, Some(parallel_value))) = parallel {
            let value = number(step, "endConditionValue")?.unwrap_or_default();
            if (value - parallel_value).abs() > f64::EPSILON {
                return Err(format!(
                    "{} ({}) does not match endConditionValue ({}) for endCondition '{}'",
                    field, parallel_value, value, condition
                ));
            }
        }
    }

    Ok(())
}

/// A string field whose value must belong to `table`.
fn enum_field<'a>(
    step: &'a Map<String, Value>,
    field: &str,
    table: &CodeTable,
) -> std::result::Result<Option<&'a str>, String> {
    match step.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(key)) if table.contains(key) => Ok(Some(key.as_str())),
        Some(other) => Err(format!(
            "{} {} is not one of: {}",
            field,
            other,
            table.keys().join(", ")
        )),
    }
}

/// A field that must be a number when present. `null` counts as absent.
fn number(step: &Map<String, Value>, field: &str) -> std::result::Result<Option<f64>, String> {
    match step.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{} must be numeric, got {}", field, value)),
    }
}

/// A field that must be a string when present. `null` counts as absent.
fn string_field(object: &Map<String, Value>, field: &str) -> std::result::Result<(), String> {
    match object.get(field) {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(other) => Err(format!("{} must be a string, got {}", field, other)),
    }
}

/// A count that must be a non-negative integer small enough for a `u32`.
fn whole_number(step: &Map<String, Value>, field: &str) -> std::result::Result<(), String> {
    match step.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(value) => match value.as_u64() {
            Some(n) if n <= u64::from(u32::MAX) => Ok(()),
            _ => Err(format!("{} must be a whole number, got {}", field, value)),
        },
    }
}

/// A calendar date in `YYYY-MM-DD` form
fn date_field(object: &Map<String, Value>, field: &str) -> std::result::Result<(), String> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(date)) if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() => Ok(()),
        Some(other) => Err(format!("{} must be a YYYY-MM-DD date, got {}", field, other)),
    }
}

fn positive(field: &str, value: f64) -> std::result::Result<(), String> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be > 0, got {}", field, value))
    }
}

fn optional_positive(
    step: &Map<String, Value>,
    field: &str,
) -> std::result::Result<Option<f64>, String> {
    let value = number(step, field)?;
    if let Some(v) = value {
        positive(field, v)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn chest_day() -> Value {
        json!({
            "name": "Chest Day",
            "steps": [{
                "stepType": "interval",
                "exerciseName": "BARBELL_BENCH_PRESS",
                "endCondition": "reps",
                "endConditionValue": 8,
                "targetType": "no-target"
            }]
        })
    }

    fn single_step(step: Value) -> Vec<SchemaError> {
        validate_workout(&json!({"workoutName": "Test", "steps": [step]}))
    }

    fn base_step() -> Value {
        json!({
            "stepType": "exercise",
            "endCondition": "reps",
            "endConditionValue": 10,
            "targetType": "no-target"
        })
    }

    fn with(mut step: Value, field: &str, value: Value) -> Value {
        step[field] = value;
        step
    }

    fn without(mut step: Value, field: &str) -> Value {
        step.as_object_mut().unwrap().remove(field);
        step
    }

    #[test]
    fn test_chest_day_is_valid() {
        assert!(validate_workout(&chest_day()).is_empty());
        assert!(validate_or_throw(&chest_day()).is_ok());
    }

    #[test]
    fn test_reps_mismatch_is_rejected() {
        let errors = single_step(with(base_step(), "reps", json!(8)));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("does not match"), "{}", errors[0]);
        assert_eq!(errors[0].step, Some(1));
    }

    #[test]
    fn test_matching_parallel_field_is_accepted() {
        let step = json!({
            "stepType": "interval",
            "endCondition": "time",
            "endConditionValue": 45.0,
            "durationSeconds": 45,
            "targetType": "no-target"
        });
        assert!(single_step(step).is_empty());
    }

    #[test]
    fn test_distance_mismatch_is_rejected() {
        let step = json!({
            "stepType": "interval",
            "endCondition": "distance",
            "endConditionValue": 400,
            "distanceMeters": 800,
            "targetType": "no-target"
        });
        let errors = single_step(step);
        assert!(errors[0].message.contains("distanceMeters"));
    }

    #[test]
    fn test_missing_target_type_is_rejected() {
        let errors = single_step(without(base_step(), "targetType"));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("targetType is required"));
    }

    #[test]
    fn test_weight_percentage_out_of_range() {
        let step = with(base_step(), "weightPercentage", json!(250));
        let step = with(step, "benchmarkKey", json!("BARBELL_BENCH_PRESS"));
        let errors = single_step(step);
        assert!(errors[0].message.contains("weightPercentage"));

        let zero = with(base_step(), "weightPercentage", json!(0));
        assert!(!single_step(zero).is_empty());
    }

    #[test]
    fn test_weight_percentage_requires_benchmark_key() {
        let errors = single_step(with(base_step(), "weightPercentage", json!(75)));
        assert!(errors[0].message.contains("benchmarkKey"));

        let step = with(base_step(), "weightPercentage", json!(75));
        let step = with(step, "benchmarkKey", json!("BARBELL_BACK_SQUAT"));
        assert!(single_step(step).is_empty());
    }

    #[test]
    fn test_weight_bounds() {
        assert!(single_step(with(base_step(), "weight", json!(0))).is_empty());
        assert!(single_step(with(base_step(), "weight", json!(1000))).is_empty());
        assert!(!single_step(with(base_step(), "weight", json!(-5))).is_empty());

        let errors = single_step(with(base_step(), "weight", json!(102058)));
        assert!(errors[0].message.contains("exceeds"));
    }

    #[test]
    fn test_non_numeric_values_are_rejected() {
        let errors = single_step(with(base_step(), "weight", json!("heavy")));
        assert!(errors[0].message.contains("weight must be numeric"));

        let errors = single_step(with(base_step(), "targetValueOne", json!("zone 2")));
        assert!(errors[0].message.contains("targetValueOne must be numeric"));
    }

    #[test]
    fn test_unknown_enum_values_are_rejected() {
        let errors = single_step(with(base_step(), "stepType", json!("superset")));
        assert!(errors[0].message.contains("stepType"));

        let errors = single_step(with(base_step(), "endCondition", json!("fatigue")));
        assert!(errors[0].message.contains("endCondition"));

        let errors = single_step(with(base_step(), "targetType", json!(3)));
        assert!(errors[0].message.contains("targetType"));
    }

    #[test]
    fn test_rest_needs_no_end_condition() {
        let rest = json!({"stepType": "rest", "targetType": "no-target"});
        assert!(single_step(rest).is_empty());

        let exercise = without(base_step(), "endCondition");
        let errors = single_step(exercise);
        assert!(errors[0].message.contains("endCondition is required"));
    }

    #[test]
    fn test_end_condition_value_rules() {
        let errors = single_step(without(base_step(), "endConditionValue"));
        assert!(errors[0].message.contains("endConditionValue is required"));

        let errors = single_step(with(base_step(), "endConditionValue", json!(0)));
        assert!(errors[0].message.contains("> 0"));
    }

    #[test]
    fn test_positive_and_non_negative_fields() {
        for field in ["reps", "durationSeconds", "distanceMeters", "numberOfRepeats"] {
            let errors = single_step(with(base_step(), field, json!(0)));
            assert!(
                errors.iter().any(|e| e.message.contains(field)),
                "{} should be rejected at 0",
                field
            );
        }

        assert!(single_step(with(base_step(), "restTimeSeconds", json!(0))).is_empty());
        assert!(!single_step(with(base_step(), "restTimeSeconds", json!(-1))).is_empty());
    }

    #[test]
    fn test_counts_must_be_whole_numbers() {
        let errors = single_step(with(base_step(), "numberOfRepeats", json!(2.5)));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("numberOfRepeats must be a whole number"));

        let errors = single_step(with(base_step(), "stepOrder", json!(-1)));
        assert!(errors[0].message.contains("stepOrder must be a whole number"));

        assert!(single_step(with(base_step(), "numberOfRepeats", json!(3))).is_empty());
        assert!(single_step(with(base_step(), "stepOrder", json!(1))).is_empty());
    }

    #[test]
    fn test_text_fields_must_be_strings() {
        for field in ["exerciseName", "exerciseCategory", "description", "benchmarkKey"] {
            let errors = single_step(with(base_step(), field, json!(42)));
            assert_eq!(errors.len(), 1, "{} should be rejected", field);
            assert!(errors[0].message.contains(field));
        }
        assert!(single_step(with(base_step(), "exerciseName", json!(null))).is_empty());
    }

    #[test]
    fn test_workout_level_field_types() {
        let bad_date = json!({"workoutName": "Legs", "scheduledDate": "next tuesday", "steps": []});
        let errors = validate_workout(&bad_date);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("scheduledDate"));

        let good_date = json!({"workoutName": "Legs", "scheduledDate": "2026-10-21", "steps": []});
        assert!(validate_workout(&good_date).is_empty());

        let numeric = json!({"workoutName": "Legs", "description": 7, "sportType": [], "steps": []});
        assert_eq!(validate_workout(&numeric).len(), 2);

        let both_names = json!({"workoutName": "Legs", "name": "Legs", "steps": []});
        assert!(validate_workout(&both_names)[0].message.contains("both set"));
    }

    #[test]
    fn test_valid_workouts_deserialize() {
        let workout = json!({
            "workoutName": "Legs",
            "description": "Heavy day",
            "scheduledDate": "2026-10-21",
            "steps": [with(with(base_step(), "numberOfRepeats", json!(3)), "stepOrder", json!(1))]
        });
        assert!(validate_workout(&workout).is_empty());
        assert!(serde_json::from_value::<crate::PlanWorkout>(workout).is_ok());
    }

    #[test]
    fn test_first_violation_stops_the_step() {
        let step = json!({"stepType": "bogus", "targetType": "bogus", "weight": -1});
        let errors = single_step(step);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("stepType"));
    }

    #[test]
    fn test_batch_reports_every_step_of_every_workout() {
        let workouts = vec![
            json!({
                "workoutName": "Push",
                "steps": [base_step(), without(base_step(), "targetType"), base_step()]
            }),
            json!({
                "workoutName": "Pull",
                "steps": [without(base_step(), "stepType"), with(base_step(), "reps", json!(3))]
            }),
        ];

        let errors = validate_all(&workouts);
        assert_eq!(errors.len(), 3);
        assert_eq!((errors[0].workout.as_str(), errors[0].step), ("Push", Some(2)));
        assert_eq!((errors[1].workout.as_str(), errors[1].step), ("Pull", Some(1)));
        assert_eq!((errors[2].workout.as_str(), errors[2].step), ("Pull", Some(2)));
    }

    #[test]
    fn test_workout_level_rules() {
        let errors = validate_workout(&json!({"workoutName": "", "steps": []}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("workoutName"));

        let errors = validate_workout(&json!({"workoutName": "Legs"}));
        assert!(errors[0].message.contains("steps is required"));

        let errors = validate_workout(&json!({"workoutName": "Legs", "steps": {}}));
        assert!(errors[0].message.contains("steps must be an array"));

        assert!(validate_workout(&json!({"workoutName": "Legs", "steps": []})).is_empty());
    }

    #[test]
    fn test_validate_or_throw_raises_first_error() {
        let workout = json!({
            "workoutName": "Legs",
            "steps": [without(base_step(), "targetType"), without(base_step(), "stepType")]
        });

        match validate_or_throw(&workout) {
            Err(Error::Schema(error)) => {
                assert_eq!(error.step, Some(1));
                assert!(error.to_string().contains("Legs"));
            }
            other => panic!("Expected schema error, got {:?}", other),
        }
    }
}
