pub mod app;
pub mod cli;
pub mod codec;
pub mod collection;
pub mod error;
pub mod render;
pub mod store;
pub mod types;
pub mod utils;

pub use app::AppContext;
pub use collection::WorkoutCollection;
pub use error::{AppError, InputError};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, WORKOUTS_SLOT};
pub use types::{
    Activity, Coordinates, DerivedMetric, Workout, WorkoutId, WorkoutInput, WorkoutKind,
};
