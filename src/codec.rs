use crate::types::{Activity, Coordinates, Workout, WorkoutId, WorkoutKind};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Bumped whenever the stored entry layout changes.
pub const SCHEMA_VERSION: u64 = 1;

#[derive(Serialize)]
struct Envelope {
    version: u64,
    workouts: Vec<StoredWorkout>,
}

/// Flat, behaviour-free form of a workout.
///
/// Aliases accept the field names of the un-versioned array written by the
/// browser app (`date`, `distance`, `duration`, `cadence`, `elevGain`).
/// Its cached `pace` / `speed` fields are ignored.
#[derive(Debug, Serialize, Deserialize)]
struct StoredWorkout {
    #[serde(rename = "type")]
    kind: String,
    id: WorkoutId,
    #[serde(alias = "date")]
    created_at: DateTime<Utc>,
    coords: (f64, f64),
    #[serde(alias = "distance")]
    distance_km: f64,
    #[serde(alias = "duration")]
    duration_min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, alias = "cadence", skip_serializing_if = "Option::is_none")]
    cadence_spm: Option<f64>,
    #[serde(default, alias = "elevGain", skip_serializing_if = "Option::is_none")]
    elevation_gain_m: Option<f64>,
}

impl From<&Workout> for StoredWorkout {
    fn from(w: &Workout) -> Self {
        let coords = w.coords();
        Self {
            kind: w.kind().as_str().to_string(),
            id: w.id().clone(),
            created_at: w.created_at(),
            coords: (coords.lat, coords.lng),
            distance_km: w.distance_km(),
            duration_min: w.duration_min(),
            description: Some(w.description().to_string()),
            cadence_spm: w.cadence_spm(),
            elevation_gain_m: w.elevation_gain_m(),
        }
    }
}

impl StoredWorkout {
    /// Dispatch on the stored tag and rebuild through the variant's checks.
    fn into_workout(self) -> Result<Workout> {
        let kind: WorkoutKind = self.kind.parse()?;
        let activity = match kind {
            WorkoutKind::Running => Activity::Running {
                cadence_spm: self
                    .cadence_spm
                    .context("running workout without cadence")?,
            },
            WorkoutKind::Cycling => Activity::Cycling {
                elevation_gain_m: self
                    .elevation_gain_m
                    .context("cycling workout without elevation gain")?,
            },
        };

        let workout = Workout::restore(
            self.id,
            self.created_at,
            Coordinates::new(self.coords.0, self.coords.1),
            self.distance_km,
            self.duration_min,
            activity,
            self.description,
        )?;
        Ok(workout)
    }
}

pub fn encode(workouts: &[Workout]) -> Result<String> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        workouts: workouts.iter().map(StoredWorkout::from).collect(),
    };
    serde_json::to_string(&envelope).context("Serializing workouts")
}

/// Parse stored text back into workouts.
///
/// Never fails: absent or unreadable text means no history, and entries
/// that cannot be rebuilt are skipped.
pub fn decode(text: &str) -> Vec<Workout> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let root: JsonValue = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(err = %e, "stored workouts are not valid JSON; starting empty");
            return Vec::new();
        }
    };

    let Some(entries) = entries_of(root) else {
        return Vec::new();
    };

    let total = entries.len();
    let out: Vec<Workout> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match decode_entry(entry) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!(idx, err = %format!("{e:#}"), "skipping stored workout");
                None
            }
        })
        .collect();

    tracing::debug!(total, decoded = out.len(), "decoded stored workouts");
    out
}

fn entries_of(root: JsonValue) -> Option<Vec<JsonValue>> {
    match root {
        JsonValue::Null => None,
        JsonValue::Array(items) => {
            tracing::debug!("reading un-versioned workout array");
            Some(items)
        }
        JsonValue::Object(mut map) => {
            match map.get("version").and_then(JsonValue::as_u64) {
                Some(v) if v > SCHEMA_VERSION => {
                    tracing::warn!(
                        version = v,
                        supported = SCHEMA_VERSION,
                        "stored workouts use a newer format; decoding best-effort"
                    );
                }
                Some(_) => {}
                None => tracing::warn!("stored workouts carry no version"),
            }

            match map.remove("workouts") {
                Some(JsonValue::Array(items)) => Some(items),
                _ => {
                    tracing::warn!("stored workouts envelope has no workout list; starting empty");
                    None
                }
            }
        }
        _ => {
            tracing::warn!("stored workouts have an unexpected shape; starting empty");
            None
        }
    }
}

fn decode_entry(entry: JsonValue) -> Result<Workout> {
    let stored: StoredWorkout =
        serde_json::from_value(entry).context("malformed workout entry")?;
    stored.into_workout()
}
