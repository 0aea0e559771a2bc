//! Site configuration
//!
//! Loaded from a `folio.toml`. Every table and key is optional:
//!
//! ```toml
//! [carousel]
//! interval_ms = 5000
//!
//! [contact]
//! status_reset_ms = 5000
//! subject_placeholder = "Contact Form Message"
//!
//! [reveal]
//! threshold = 0.1
//! root_margin = 0.0
//!
//! [mail]
//! service_id = "service_xxx"
//! template_id = "template_xxx"
//! public_key = "..."
//! ```

use std::fs;
use std::path::Path;

use folio_controllers::{CarouselOptions, ContactOptions, RevealOptions, DEFAULT_SUBJECT};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Root of `folio.toml`
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

// =============================================================================
// Sections
// =============================================================================

/// Testimonial carousel
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CarouselConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> f32 {
    5000.0
}

/// Contact form behaviour
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ContactConfig {
    /// How long the success/error banner stays up
    #[serde(default = "default_status_reset_ms")]
    pub status_reset_ms: f32,
    #[serde(default = "default_subject_placeholder")]
    pub subject_placeholder: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            status_reset_ms: default_status_reset_ms(),
            subject_placeholder: default_subject_placeholder(),
        }
    }
}

fn default_status_reset_ms() -> f32 {
    5000.0
}

fn default_subject_placeholder() -> String {
    DEFAULT_SUBJECT.to_string()
}

/// Scroll reveal triggers for section content
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RevealConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub root_margin: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            root_margin: 0.0,
        }
    }
}

fn default_threshold() -> f32 {
    0.1
}

/// Mail relay credentials
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct MailConfig {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub public_key: String,
}

impl MailConfig {
    /// Whether enough is set to reach a real relay
    pub fn is_configured(&self) -> bool {
        !self.service_id.is_empty() && !self.template_id.is_empty()
    }
}

// =============================================================================
// Loading
// =============================================================================

impl SiteConfig {
    /// Read and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SiteError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let interval = self.carousel.interval_ms;
        if interval.is_nan() || interval <= 0.0 {
            return Err(SiteError::ConfigValue {
                key: "carousel.interval_ms",
                reason: format!("must be positive, got {}", self.carousel.interval_ms),
            });
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(SiteError::ConfigValue {
                key: "reveal.threshold",
                reason: format!("must be within 0..=1, got {}", self.reveal.threshold),
            });
        }
        if self.contact.status_reset_ms < 0.0 {
            return Err(SiteError::ConfigValue {
                key: "contact.status_reset_ms",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }

    pub fn carousel_options(&self) -> CarouselOptions {
        CarouselOptions {
            interval_ms: self.carousel.interval_ms,
        }
    }

    pub fn contact_options(&self) -> ContactOptions {
        ContactOptions {
            service_id: self.mail.service_id.clone(),
            template_id: self.mail.template_id.clone(),
            subject_placeholder: self.contact.subject_placeholder.clone(),
            status_reset_ms: self.contact.status_reset_ms,
        }
    }

    /// Options for one-shot content reveals
    pub fn reveal_options(&self) -> RevealOptions {
        RevealOptions {
            threshold: self.reveal.threshold,
            root_margin: self.reveal.root_margin,
            ..RevealOptions::default()
        }
    }
}
