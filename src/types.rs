use crate::error::InputError;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Map position as clicked. Longitude is not wrapped into [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn check(self) -> Result<Self, InputError> {
        check_finite("latitude", self.lat)?;
        check_finite("longitude", self.lng)?;
        Ok(self)
    }
}

/// Opaque workout identity, unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WorkoutId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("running") {
            Ok(Self::Running)
        } else if t.eq_ignore_ascii_case("cycling") {
            Ok(Self::Cycling)
        } else {
            Err(InputError::UnknownKind(s.to_string()))
        }
    }
}

/// Variant-specific fields of a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Running { cadence_spm: f64 },
    Cycling { elevation_gain_m: f64 },
}

impl Activity {
    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    fn check(self) -> Result<Self, InputError> {
        match self {
            Self::Running { cadence_spm } => {
                check_positive("cadence", cadence_spm)?;
            }
            Self::Cycling { elevation_gain_m } => {
                check_non_negative("elevation", elevation_gain_m)?;
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedMetric {
    /// Minutes per kilometre.
    Pace(f64),
    /// Kilometres per hour.
    Speed(f64),
}

impl DerivedMetric {
    pub const fn value(self) -> f64 {
        match self {
            Self::Pace(v) | Self::Speed(v) => v,
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Pace(_) => "min/km",
            Self::Speed(_) => "km/h",
        }
    }
}

pub fn pace_min_per_km(duration_min: f64, distance_km: f64) -> f64 {
    duration_min / distance_km
}

pub fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// "Running on April 14", in the local time zone of `created_at`.
pub fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    let local = created_at.with_timezone(&Local);
    format!("{} on {}", kind.label(), local.format("%B %-d"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    activity: Activity,
}

impl Workout {
    pub fn running(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Self {
        Self::running_at(Utc::now(), coords, distance_km, duration_min, cadence_spm)
    }

    pub fn running_at(
        created_at: DateTime<Utc>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Self {
        Self::build(
            WorkoutId::generate(),
            created_at,
            coords,
            distance_km,
            duration_min,
            Activity::Running { cadence_spm },
            None,
        )
    }

    pub fn cycling(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::cycling_at(Utc::now(), coords, distance_km, duration_min, elevation_gain_m)
    }

    pub fn cycling_at(
        created_at: DateTime<Utc>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::build(
            WorkoutId::generate(),
            created_at,
            coords,
            distance_km,
            duration_min,
            Activity::Cycling { elevation_gain_m },
            None,
        )
    }

    /// Build a fresh workout of the validated variant, stamped now.
    pub fn from_input(input: &ValidInput) -> Self {
        Self::build(
            WorkoutId::generate(),
            Utc::now(),
            input.coords,
            input.distance_km,
            input.duration_min,
            input.activity,
            None,
        )
    }

    /// Rebuild a workout from persisted parts, re-checking every invariant.
    ///
    /// A missing description is recomputed from `created_at`.
    pub fn restore(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        activity: Activity,
        description: Option<String>,
    ) -> Result<Self, InputError> {
        let coords = coords.check()?;
        let distance_km = check_positive("distance", distance_km)?;
        let duration_min = check_positive("duration", duration_min)?;
        let activity = activity.check()?;
        Ok(Self::build(
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            activity,
            description,
        ))
    }

    fn build(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        activity: Activity,
        description: Option<String>,
    ) -> Self {
        debug_assert!(distance_km > 0.0 && duration_min > 0.0);
        let description = description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| describe(activity.kind(), created_at));
        Self {
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            description,
            activity,
        }
    }

    pub const fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn coords(&self) -> Coordinates {
        self.coords
    }

    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub const fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn activity(&self) -> Activity {
        self.activity
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }

    pub fn metric(&self) -> DerivedMetric {
        match self.activity {
            Activity::Running { .. } => {
                DerivedMetric::Pace(pace_min_per_km(self.duration_min, self.distance_km))
            }
            Activity::Cycling { .. } => {
                DerivedMetric::Speed(speed_km_per_h(self.distance_km, self.duration_min))
            }
        }
    }

    pub const fn cadence_spm(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { cadence_spm } => Some(cadence_spm),
            Activity::Cycling { .. } => None,
        }
    }

    pub const fn elevation_gain_m(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { elevation_gain_m } => Some(elevation_gain_m),
            Activity::Running { .. } => None,
        }
    }
}

/// Raw values handed over by the form collaborator.
///
/// `extra` is cadence for running and elevation gain for cycling.
#[derive(Debug, Clone)]
pub struct WorkoutInput {
    pub kind: WorkoutKind,
    pub coords: Coordinates,
    pub distance: String,
    pub duration: String,
    pub extra: String,
}

/// Input that passed every check; the only way to reach `Workout::from_input`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidInput {
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
    activity: Activity,
}

impl ValidInput {
    pub const fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }
}

impl WorkoutInput {
    pub fn validate(&self) -> Result<ValidInput, InputError> {
        let coords = self.coords.check()?;
        let distance_km = check_positive("distance", parse_number("distance", &self.distance)?)?;
        let duration_min = check_positive("duration", parse_number("duration", &self.duration)?)?;
        let activity = match self.kind {
            WorkoutKind::Running => Activity::Running {
                cadence_spm: parse_number("cadence", &self.extra)?,
            },
            WorkoutKind::Cycling => Activity::Cycling {
                elevation_gain_m: parse_number("elevation", &self.extra)?,
            },
        }
        .check()?;

        Ok(ValidInput {
            coords,
            distance_km,
            duration_min,
            activity,
        })
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| InputError::NotANumber {
            field,
            raw: raw.to_string(),
        })
}

fn check_positive(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(InputError::NotPositive { field, value });
    }
    Ok(value)
}

fn check_non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::Negative { field, value });
    }
    Ok(value)
}

fn check_finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NotFinite { field })
    }
}
