use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar has no months")]
    NoMonths,

    #[error("Calendar has no weekdays")]
    NoWeekdays,

    #[error("Leap day '{name}' is attached to month {timespan}, but only {months} months exist")]
    LeapDayOutOfRange {
        name: String,
        timespan: usize,
        months: usize,
    },

    #[error("Dated season '{name}' refers to month {month}, but only {months} months exist")]
    SeasonOutOfRange {
        name: String,
        month: usize,
        months: usize,
    },

    #[error("Moon '{0}' has a non-positive cycle")]
    InvalidMoonCycle(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
