use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Invalid value: {value} (must be between {min} and {max})")]
    InvalidValue { value: i64, min: i64, max: i64 },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid slot label: {0}")]
    InvalidSlotLabel(String),

    #[error("Slot {label} is already occupied by {occupant}")]
    SlotOccupied { label: String, occupant: String },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RankError>;
