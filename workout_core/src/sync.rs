//! Export and upload pipelines over a [`WorkoutClient`].
//!
//! Requests are issued one at a time. Nothing is written remotely until the
//! whole plan has been validated.

use crate::client::WorkoutClient;
use crate::codec::{build_workout, export_workout};
use crate::plan_file::parse_workouts;
use crate::validate::{validate_all, validate_workout, workout_label};
use crate::wire::WireWorkout;
use crate::{Error, PlanWorkout, Result, SchemaError};
use serde_json::Value;
use std::collections::HashSet;

/// Fetch every workout from the service and convert it to plan form.
///
/// With `validate_on_read`, exported workouts that would not pass the
/// validator are reported at `warn` but still returned.
pub fn export_plans<C: WorkoutClient + ?Sized>(
    client: &C,
    validate_on_read: bool,
) -> Result<Vec<PlanWorkout>> {
    let summaries = client.list_workouts()?;
    tracing::info!("Exporting {} workouts", summaries.len());

    let mut plans = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let workout = client.fetch_workout(summary.workout_id)?;
        let plan = export_workout(&workout);

        if validate_on_read {
            for error in plan.validate()? {
                tracing::warn!("Exported plan does not validate: {}", error);
            }
        }
        plans.push(plan);
    }

    Ok(plans)
}

/// Upload behaviour switches
#[derive(Clone, Copy, Debug, Default)]
pub struct UploadOptions {
    /// Validate and rebuild only; never write to the service
    pub dry_run: bool,
    /// Delete existing workouts with the same name before creating
    pub replace_existing: bool,
}

/// A workout that was (or in a dry run would be) created
#[derive(Clone, Debug)]
pub struct UploadedWorkout {
    pub workout_id: Option<i64>,
    pub payload: WireWorkout,
    pub scheduled: bool,
}

/// Outcome of an upload
#[derive(Clone, Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<UploadedWorkout>,
    pub replaced: Vec<i64>,
    /// Violations found in a dry run; a live run fails instead
    pub errors: Vec<SchemaError>,
}

/// Validate, rebuild and create every workout of a plan file.
///
/// A live run fails with [`Error::InvalidPlan`] before any remote call if any
/// workout is invalid. A dry run reports the violations, skips the invalid
/// workouts and returns the payloads it would have sent for the rest.
pub fn upload_plans<C: WorkoutClient + ?Sized>(
    client: &mut C,
    workouts: &[Value],
    options: UploadOptions,
) -> Result<UploadReport> {
    let mut report = UploadReport::default();

    if options.dry_run {
        for workout in workouts {
            let errors = validate_workout(workout);
            if !errors.is_empty() {
                report.errors.extend(errors);
                continue;
            }
            match serde_json::from_value::<PlanWorkout>(workout.clone()) {
                Ok(plan) => report.uploaded.push(UploadedWorkout {
                    workout_id: None,
                    payload: build_workout(&plan),
                    scheduled: plan.scheduled_date.is_some(),
                }),
                Err(e) => report
                    .errors
                    .push(SchemaError::workout(workout_label(workout), e.to_string())),
            }
        }
        tracing::info!(
            "Dry run: {} workouts ready, {} error(s)",
            report.uploaded.len(),
            report.errors.len()
        );
        return Ok(report);
    }

    let errors = validate_all(workouts);
    if !errors.is_empty() {
        return Err(Error::InvalidPlan(errors));
    }
    let plans = parse_workouts(workouts.to_vec())?;

    if options.replace_existing {
        let names: HashSet<&str> = plans.iter().map(|p| p.workout_name.as_str()).collect();
        for summary in client.list_workouts()? {
            if names.contains(summary.workout_name.as_str()) {
                client.delete_workout(summary.workout_id)?;
                report.replaced.push(summary.workout_id);
            }
        }
    }

    for plan in &plans {
        let payload = build_workout(plan);
        let id = client.create_workout(&payload)?;
        if let Some(date) = plan.scheduled_date {
            client.schedule_workout(id, date)?;
        }
        report.uploaded.push(UploadedWorkout {
            workout_id: Some(id),
            payload,
            scheduled: plan.scheduled_date.is_some(),
        });
    }

    tracing::info!(
        "Uploaded {} workouts ({} replaced)",
        report.uploaded.len(),
        report.replaced.len()
    );
    Ok(report)
}
