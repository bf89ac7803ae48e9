use thiserror::Error;

/// Application-wide result type
pub type Result<T> = anyhow::Result<T>;

/// Metadata provider errors with typed variants for matching
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("TMDB API error: {0}")]
    Tmdb(String),

    #[error("TMDB rejected the API key. Run 'sinema init' to configure a valid key.")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found. Run 'sinema init' to set up.")]
    NotFound,

    #[error("Invalid config file: {0}")]
    Invalid(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence backend errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to open state database: {0}")]
    Open(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Programming errors: shared state read outside of the scope that provides it
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("{0} must be used within a provided AppContext")]
    NotProvided(&'static str),
}

/// Rejected transitions of the media details view
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DetailsError {
    #[error("Details are not loaded yet")]
    NotReady,

    #[error("Batch {index} is out of range (0..{count})")]
    BatchOutOfRange { index: usize, count: usize },

    #[error("Unknown embed provider: {0}")]
    UnknownProvider(String),

    #[error("Season {0} is not part of this series")]
    UnknownSeason(u32),

    #[error("Episode {0} is not in the loaded episode list")]
    UnknownEpisode(u32),

    #[error("This action is only available for {0}")]
    WrongMediaType(&'static str),

    #[error("No trailer available")]
    NoTrailer,
}

/// Player launcher errors
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Opener '{0}' not found. Please install it or configure a different player command.")]
    NotFound(String),

    #[error("Opener exited with error: {0}")]
    ExitError(String),

    #[error("Failed to launch opener: {0}")]
    LaunchFailed(String),
}
