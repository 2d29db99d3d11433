//! Fixed lookup tables between plan-file keys and the backend's numeric codes.
//!
//! Tables are built once and shared for the life of the process.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A bidirectional key/code table with a fallback for unknown keys.
#[derive(Debug)]
pub struct CodeTable {
    name: &'static str,
    by_key: HashMap<&'static str, u32>,
    by_code: HashMap<u32, &'static str>,
    fallback: &'static str,
}

impl CodeTable {
    fn new(name: &'static str, entries: &[(&'static str, u32)], fallback: &'static str) -> Self {
        let mut by_key = HashMap::new();
        let mut by_code = HashMap::new();
        for &(key, code) in entries {
            by_key.insert(key, code);
            // First key listed for a code is the one it decodes to
            by_code.entry(code).or_insert(key);
        }
        Self {
            name,
            by_key,
            by_code,
            fallback,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn code(&self, key: &str) -> Option<u32> {
        self.by_key.get(key).copied()
    }

    pub fn key(&self, code: u32) -> Option<&'static str> {
        self.by_code.get(&code).copied()
    }

    pub fn fallback_key(&self) -> &'static str {
        self.fallback
    }

    pub fn fallback_code(&self) -> u32 {
        self.by_key[self.fallback]
    }

    /// Encode `key`, substituting the fallback when it is not in the table.
    ///
    /// Returns the key actually encoded alongside its code.
    pub fn encode(&self, key: &str) -> (String, u32) {
        match self.code(key) {
            Some(code) => (key.to_string(), code),
            None => {
                tracing::warn!(
                    "Unknown {} '{}', falling back to '{}'",
                    self.name,
                    key,
                    self.fallback
                );
                (self.fallback.to_string(), self.fallback_code())
            }
        }
    }

    /// Sorted list of accepted keys, for error messages.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.by_key.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

pub const STEP_REST: &str = "rest";
pub const STEP_REPEAT: &str = "repeat";
pub const STEP_EXERCISE: &str = "exercise";

pub const END_REPS: &str = "reps";
pub const END_TIME: &str = "time";
pub const END_DISTANCE: &str = "distance";
pub const END_ITERATIONS: &str = "iterations";

pub const TARGET_NONE: &str = "no-target";

pub const SPORT_STRENGTH: &str = "strength_training";

pub static STEP_TYPES: Lazy<CodeTable> = Lazy::new(|| {
    CodeTable::new(
        "step type",
        &[
            ("warmup", 1),
            ("cooldown", 2),
            ("interval", 3),
            (STEP_REST, 3),
            ("recovery", 4),
            (STEP_EXERCISE, 6),
            (STEP_REPEAT, 7),
            ("other", 8),
        ],
        STEP_EXERCISE,
    )
});

pub static END_CONDITIONS: Lazy<CodeTable> = Lazy::new(|| {
    CodeTable::new(
        "end condition",
        &[
            ("lap-button", 1),
            (END_TIME, 2),
            (END_DISTANCE, 3),
            ("calories", 4),
            ("heart-rate", 5),
            (END_REPS, 6),
            (END_ITERATIONS, 7),
        ],
        "lap-button",
    )
});

pub static TARGET_TYPES: Lazy<CodeTable> = Lazy::new(|| {
    CodeTable::new(
        "target type",
        &[
            (TARGET_NONE, 1),
            ("heart-rate-zone", 2),
            ("pace-zone", 3),
            ("speed-zone", 4),
            ("power-zone", 6),
            ("cadence-zone", 7),
            ("open", 8),
        ],
        TARGET_NONE,
    )
});

pub static SPORT_TYPES: Lazy<CodeTable> = Lazy::new(|| {
    CodeTable::new(
        "sport type",
        &[
            ("running", 1),
            ("cycling", 2),
            ("other", 3),
            ("swimming", 4),
            (SPORT_STRENGTH, 5),
            ("cardio_training", 6),
            ("yoga", 7),
            ("pilates", 8),
            ("hiit", 9),
        ],
        SPORT_STRENGTH,
    )
});
