use thiserror::Error;

/// Why a workout could not be built from user input or stored data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("unknown workout type: {0:?}")]
    UnknownKind(String),

    #[error("{field} is not a number: {raw:?}")]
    NotANumber { field: &'static str, raw: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Failure of an application-level operation.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid workout: {0}")]
    Invalid(#[from] InputError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl InputError {
    /// Name of the offending input field, if the error is about one.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::UnknownKind(_) => None,
            Self::NotANumber { field, .. }
            | Self::NotFinite { field }
            | Self::NotPositive { field, .. }
            | Self::Negative { field, .. } => Some(*field),
        }
    }
}
