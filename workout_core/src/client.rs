//! Remote workout service capability.
//!
//! The codec never talks to the backend itself; callers drive a
//! [`WorkoutClient`]. [`FixtureClient`] keeps workouts in memory (optionally
//! backed by a JSON fixture file) and [`HttpClient`] talks to the service.

use crate::plan_file::write_json_atomic;
use crate::wire::{WireWorkout, WorkoutSummary};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Operations the pipeline needs from the workout service
pub trait WorkoutClient {
    fn list_workouts(&self) -> Result<Vec<WorkoutSummary>>;
    fn fetch_workout(&self, id: i64) -> Result<WireWorkout>;
    /// Create a workout, returning the id the service assigned
    fn create_workout(&mut self, workout: &WireWorkout) -> Result<i64>;
    fn delete_workout(&mut self, id: i64) -> Result<()>;
    fn schedule_workout(&mut self, id: i64, date: NaiveDate) -> Result<()>;
}

// ============================================================================
// In-memory fixture
// ============================================================================

/// A scheduled calendar entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub workout_id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    workouts: Vec<WireWorkout>,
    #[serde(default)]
    schedule: Vec<ScheduleEntry>,
}

/// In-memory workout service
#[derive(Debug, Default)]
pub struct FixtureClient {
    workouts: BTreeMap<i64, WireWorkout>,
    schedule: Vec<ScheduleEntry>,
    next_id: i64,
}

impl FixtureClient {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Seed the fixture with workouts. Workouts without an id get one.
    pub fn with_workouts(workouts: impl IntoIterator<Item = WireWorkout>) -> Self {
        let mut client = Self::new();
        for workout in workouts {
            client.insert(workout);
        }
        client
    }

    fn insert(&mut self, mut workout: WireWorkout) -> i64 {
        let id = match workout.workout_id {
            Some(id) => id,
            None => self.next_id,
        };
        self.next_id = self.next_id.max(id.saturating_add(1));
        workout.workout_id = Some(id);
        self.workouts.insert(id, workout);
        id
    }

    /// Load a fixture file; a missing file yields an empty fixture.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No fixture file at {:?}, starting empty", path);
            return Ok(Self::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let file: FixtureFile = serde_json::from_str(&contents)
            .map_err(|e| Error::Format(format!("{}: {}", path.display(), e)))?;

        let mut client = Self::with_workouts(file.workouts);
        client.schedule = file.schedule;
        tracing::debug!(
            "Loaded fixture {:?} with {} workouts",
            path,
            client.workouts.len()
        );
        Ok(client)
    }

    /// Write the fixture back atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = FixtureFile {
            workouts: self.workouts.values().cloned().collect(),
            schedule: self.schedule.clone(),
        };
        write_json_atomic(path, &file)?;

        tracing::debug!("Saved fixture to {:?}", path);
        Ok(())
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    fn unknown(id: i64) -> Error {
        Error::Client(format!("workout {} not found", id))
    }
}

impl WorkoutClient for FixtureClient {
    fn list_workouts(&self) -> Result<Vec<WorkoutSummary>> {
        Ok(self.workouts.values().filter_map(WireWorkout::summary).collect())
    }

    fn fetch_workout(&self, id: i64) -> Result<WireWorkout> {
        self.workouts.get(&id).cloned().ok_or_else(|| Self::unknown(id))
    }

    fn create_workout(&mut self, workout: &WireWorkout) -> Result<i64> {
        let mut workout = workout.clone();
        workout.workout_id = None;
        Ok(self.insert(workout))
    }

    fn delete_workout(&mut self, id: i64) -> Result<()> {
        self.workouts.remove(&id).ok_or_else(|| Self::unknown(id))?;
        self.schedule.retain(|entry| entry.workout_id != id);
        Ok(())
    }

    fn schedule_workout(&mut self, id: i64, date: NaiveDate) -> Result<()> {
        if !self.workouts.contains_key(&id) {
            return Err(Self::unknown(id));
        }
        self.schedule.push(ScheduleEntry {
            workout_id: id,
            date,
        });
        Ok(())
    }
}

// ============================================================================
// HTTP adapter
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedWorkout {
    workout_id: i64,
}

#[derive(Serialize)]
struct ScheduleRequest {
    date: NaiveDate,
}

/// Blocking HTTP adapter for the workout service.
///
/// Expects an already-issued bearer token.
pub struct HttpClient {
    base_url: String,
    token: String,
    http: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/workout-service/{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.http.get(self.url(path)).bearer_auth(&self.token)
    }

    fn post(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.http.post(self.url(path)).bearer_auth(&self.token)
    }
}

impl WorkoutClient for HttpClient {
    fn list_workouts(&self) -> Result<Vec<WorkoutSummary>> {
        let workouts = self.get("workouts").send()?.error_for_status()?.json()?;
        Ok(workouts)
    }

    fn fetch_workout(&self, id: i64) -> Result<WireWorkout> {
        let workout = self
            .get(&format!("workout/{}", id))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(workout)
    }

    fn create_workout(&mut self, workout: &WireWorkout) -> Result<i64> {
        let created: CreatedWorkout = self
            .post("workout")
            .json(workout)
            .send()?
            .error_for_status()?
            .json()?;
        tracing::info!(
            "Created workout '{}' as {}",
            workout.workout_name,
            created.workout_id
        );
        Ok(created.workout_id)
    }

    fn delete_workout(&mut self, id: i64) -> Result<()> {
        self.http
            .delete(self.url(&format!("workout/{}", id)))
            .bearer_auth(&self.token)
            .send()?
            .error_for_status()?;
        tracing::info!("Deleted workout {}", id);
        Ok(())
    }

    fn schedule_workout(&mut self, id: i64, date: NaiveDate) -> Result<()> {
        self.post(&format!("schedule/{}", id))
            .json(&ScheduleRequest { date })
            .send()?
            .error_for_status()?;
        tracing::info!("Scheduled workout {} on {}", id, date);
        Ok(())
    }
}
