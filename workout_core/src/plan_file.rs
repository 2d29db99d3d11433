//! Plan file loading and saving.
//!
//! A plan file is either a bare JSON array of workouts or an object with a
//! `workouts` array. Files are written in the object form.

use crate::{Error, PlanWorkout, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Serialize)]
struct PlanFile<'a> {
    workouts: &'a [PlanWorkout],
}

/// Read the raw workout objects of a plan file.
///
/// Workouts are returned untyped so they can be validated before
/// deserialization.
pub fn load_plan_file(path: &Path) -> Result<Vec<Value>> {
    let contents = std::fs::read_to_string(path)?;
    let workouts = parse_plan(&contents)
        .map_err(|e| Error::Format(format!("{}: {}", path.display(), e)))?;
    tracing::info!("Loaded {} workouts from {:?}", workouts.len(), path);
    Ok(workouts)
}

/// Parse plan file contents into raw workout objects
pub fn parse_plan(contents: &str) -> std::result::Result<Vec<Value>, String> {
    let value: Value =
        serde_json::from_str(contents).map_err(|e| format!("not valid JSON ({})", e))?;

    match value {
        Value::Array(workouts) => Ok(workouts),
        Value::Object(mut object) => match object.remove("workouts") {
            Some(Value::Array(workouts)) => Ok(workouts),
            Some(_) => Err("\"workouts\" must be an array".to_string()),
            None => Err("expected an array of workouts or an object with \"workouts\"".to_string()),
        },
        _ => Err("expected an array of workouts or an object with \"workouts\"".to_string()),
    }
}

/// Deserialize raw workouts into typed plan workouts.
pub fn parse_workouts(workouts: Vec<Value>) -> Result<Vec<PlanWorkout>> {
    workouts
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|e| Error::Format(format!("workout {}: {}", index + 1, e)))
        })
        .collect()
}

/// Write workouts to a plan file atomically.
pub fn save_plan_file(path: &Path, workouts: &[PlanWorkout]) -> Result<()> {
    write_json_atomic(path, &PlanFile { workouts })?;
    tracing::info!("Saved {} workouts to {:?}", workouts.len(), path);
    Ok(())
}

/// Pretty-print `value` to a temp file beside `path`, then rename it over
/// `path`. Readers never see a half-written file.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
