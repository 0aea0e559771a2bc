//! Site error types

use std::path::PathBuf;

use folio_controllers::CarouselError;
use thiserror::Error;

/// Page composition and configuration errors
#[derive(Error, Debug)]
pub enum SiteError {
    /// A navigation entry targets an anchor no section uses
    #[error("navigation entry {label:?} points at unknown section #{anchor}")]
    UnknownAnchor { label: String, anchor: String },

    /// More than one mounted section uses the same anchor
    #[error("section #{0} is mounted more than once")]
    DuplicateSection(String),

    /// A section's nodes could not be inserted into the stage
    #[error("failed to mount section #{0}")]
    Mount(String),

    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`SiteConfig`](crate::SiteConfig)
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A config value is outside its usable range
    #[error("invalid config value for {key}: {reason}")]
    ConfigValue { key: &'static str, reason: String },

    #[error(transparent)]
    Carousel(#[from] CarouselError),
}

/// Result type for site operations
pub type Result<T> = std::result::Result<T, SiteError>;
