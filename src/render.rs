use crate::types::{Activity, DerivedMetric, Workout, WorkoutId, WorkoutKind};

/// Zoom used when centring the map on a workout.
pub const MAP_ZOOM_LEVEL: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtraField {
    pub icon: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

/// Everything a renderer needs for one workout, unformatted.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutView<'a> {
    pub id: &'a WorkoutId,
    pub kind: WorkoutKind,
    pub description: &'a str,
    pub distance_km: f64,
    pub duration_min: f64,
    pub metric: DerivedMetric,
    pub extra: ExtraField,
}

impl<'a> WorkoutView<'a> {
    pub fn of(w: &'a Workout) -> Self {
        let extra = match w.activity() {
            Activity::Running { cadence_spm } => ExtraField {
                icon: "🦶🏼",
                value: cadence_spm,
                unit: "spm",
            },
            Activity::Cycling { elevation_gain_m } => ExtraField {
                icon: "⛰",
                value: elevation_gain_m,
                unit: "m",
            },
        };

        Self {
            id: w.id(),
            kind: w.kind(),
            description: w.description(),
            distance_km: w.distance_km(),
            duration_min: w.duration_min(),
            metric: w.metric(),
            extra,
        }
    }
}

pub const fn icon(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴‍♀️",
    }
}

/// Marker popup text, e.g. "🏃‍♂️ Running on April 14".
pub fn popup_text(w: &Workout) -> String {
    format!("{} {}", icon(w.kind()), w.description())
}

/// One line per workout; derived metric shown with one decimal.
pub fn list_line(w: &Workout) -> String {
    let v = WorkoutView::of(w);
    format!(
        "{} {}  {} km  ⏱ {} min  ⚡️ {:.1} {}  {} {} {}",
        icon(v.kind),
        v.description,
        v.distance_km,
        v.duration_min,
        v.metric.value(),
        v.metric.unit(),
        v.extra.icon,
        v.extra.value,
        v.extra.unit,
    )
}

/// Multi-line detail block shown for a selected workout.
pub fn details(w: &Workout) -> String {
    let v = WorkoutView::of(w);
    let coords = w.coords();
    format!(
        "{}\nid: {}\ntype: {}\nlogged: {}\nat: {}, {}\ndistance: {} km\nduration: {} min\n{}: {:.1} {}\n{}: {} {}\nmap: {}",
        popup_text(w),
        v.id,
        v.kind,
        w.created_at().to_rfc3339(),
        coords.lat,
        coords.lng,
        v.distance_km,
        v.duration_min,
        metric_label(v.metric),
        v.metric.value(),
        v.metric.unit(),
        extra_label(v.kind),
        v.extra.value,
        v.extra.unit,
        map_view_url(w),
    )
}

/// OpenStreetMap link centred on the workout.
pub fn map_view_url(w: &Workout) -> String {
    let c = w.coords();
    format!(
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={MAP_ZOOM_LEVEL}/{lat}/{lng}",
        lat = c.lat,
        lng = c.lng
    )
}

const fn metric_label(m: DerivedMetric) -> &'static str {
    match m {
        DerivedMetric::Pace(_) => "pace",
        DerivedMetric::Speed(_) => "speed",
    }
}

const fn extra_label(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "cadence",
        WorkoutKind::Cycling => "elevation gain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;
    use chrono::{DateTime, Local, TimeZone, Utc};

    fn april_14() -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2024, 4, 14, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_view_of_running() {
        let w = Workout::running_at(april_14(), Coordinates::new(10.0, 20.0), 5.0, 25.0, 150.0);
        let v = WorkoutView::of(&w);
        assert_eq!(v.kind, WorkoutKind::Running);
        assert_eq!(v.metric, DerivedMetric::Pace(5.0));
        assert_eq!(v.extra.value, 150.0);
        assert_eq!(v.extra.unit, "spm");
    }

    #[test]
    fn test_list_line() {
        let w = Workout::running_at(april_14(), Coordinates::new(10.0, 20.0), 4.0, 22.0, 150.0);
        assert_eq!(
            list_line(&w),
            "🏃‍♂️ Running on April 14  4 km  ⏱ 22 min  ⚡️ 5.5 min/km  🦶🏼 150 spm"
        );

        let w = Workout::cycling_at(april_14(), Coordinates::new(10.0, 20.0), 20.0, 60.0, 200.0);
        assert_eq!(
            list_line(&w),
            "🚴‍♀️ Cycling on April 14  20 km  ⏱ 60 min  ⚡️ 20.0 km/h  ⛰ 200 m"
        );
    }

    #[test]
    fn test_popup_and_map_url() {
        let w = Workout::cycling_at(april_14(), Coordinates::new(39.9, 32.8), 20.0, 60.0, 0.0);
        assert_eq!(popup_text(&w), "🚴‍♀️ Cycling on April 14");
        assert_eq!(
            map_view_url(&w),
            "https://www.openstreetmap.org/?mlat=39.9&mlon=32.8#map=16/39.9/32.8"
        );
    }

    #[test]
    fn test_details_mentions_everything() {
        let w = Workout::running_at(april_14(), Coordinates::new(10.0, 20.0), 5.0, 25.0, 150.0);
        let text = details(&w);
        assert!(text.starts_with("🏃‍♂️ Running on April 14\n"));
        assert!(text.contains(&format!("id: {}", w.id())));
        assert!(text.contains("pace: 5.0 min/km"));
        assert!(text.contains("cadence: 150 spm"));
        assert!(text.contains("map: https://www.openstreetmap.org/"));
    }
}
