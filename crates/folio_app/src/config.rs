//! Site configuration
//!
//! Everything the page shows that is not animation state lives in one TOML
//! file, `folio.toml`. Every section is optional; a missing section or field
//! falls back to its default.
//!
//! ```toml
//! [site]
//! title = "Michal Czaplinski"
//!
//! [email]
//! user = "mmczaplinski"
//! domain = "gmail.com"
//! position = 3
//!
//! [[links]]
//! label = "BLOG"
//! href = "/blog"
//!
//! [animation]
//! merge_delay_ms = 1500
//! ```

use std::fs;
use std::path::Path;

use folio_animation::OffsetRange;
use folio_theme::Theme;
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// Complete site configuration stored in folio.toml
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteMetadata,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default = "default_links")]
    pub links: Vec<LinkConfig>,
    #[serde(default)]
    pub posts: Vec<PostConfig>,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMetadata::default(),
            email: EmailConfig::default(),
            links: default_links(),
            posts: Vec::new(),
            animation: AnimationConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl SiteConfig {
    /// Load and validate a config file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| FolioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig =
            toml::from_str(&content).map_err(|source| FolioError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        tracing::debug!(
            "loaded site config from {} ({} links, {} posts)",
            path.display(),
            config.links.len(),
            config.posts.len()
        );
        Ok(config)
    }

    /// Load `folio.toml` from a directory, falling back to defaults if absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            Ok(Self::default())
        }
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|source| FolioError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configs that parse but cannot be shown
    pub fn validate(&self) -> Result<()> {
        if self.email.user.trim().is_empty() || self.email.domain.trim().is_empty() {
            return Err(FolioError::InvalidConfig(
                "email.user and email.domain must not be empty".to_string(),
            ));
        }
        if self.email.position > self.links.len() {
            return Err(FolioError::InvalidConfig(format!(
                "email.position {} is past the end of {} links",
                self.email.position,
                self.links.len()
            )));
        }
        self.animation.validate()?;

        let typography = &self.theme.typography;
        if typography.base_font_size <= 0.0 || typography.base_line_height <= 0.0 {
            return Err(FolioError::InvalidConfig(
                "theme.typography base values must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of entries in the link trail, email included
    pub fn trail_len(&self) -> usize {
        self.links.len() + 1
    }
}

/// Site metadata
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SiteMetadata {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_url")]
    pub url: String,
    /// Twitter handle without the `@`
    #[serde(default = "default_twitter")]
    pub twitter: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: default_author(),
            url: default_url(),
            twitter: default_twitter(),
            description: None,
        }
    }
}

fn default_title() -> String {
    "Michal Czaplinski".to_string()
}

fn default_author() -> String {
    "Michal Czaplinski".to_string()
}

fn default_url() -> String {
    "https://czaplinski.io".to_string()
}

fn default_twitter() -> String {
    "C_Z_A_P_L_A".to_string()
}

/// The address revealed by the email link
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EmailConfig {
    #[serde(default = "default_email_user")]
    pub user: String,
    #[serde(default = "default_email_domain")]
    pub domain: String,
    /// Label shown before the reveal
    #[serde(default = "default_email_label")]
    pub label: String,
    /// Index of the email entry among the links
    #[serde(default = "default_email_position")]
    pub position: usize,
}

impl EmailConfig {
    /// Left half of the split address
    pub fn local_part(&self) -> &str {
        &self.user
    }

    /// Right half of the split address, `@` included
    pub fn domain_part(&self) -> String {
        format!("@{}", self.domain)
    }

    pub fn address(&self) -> String {
        format!("{}@{}", self.user, self.domain)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            user: default_email_user(),
            domain: default_email_domain(),
            label: default_email_label(),
            position: default_email_position(),
        }
    }
}

fn default_email_user() -> String {
    "mmczaplinski".to_string()
}

fn default_email_domain() -> String {
    "gmail.com".to_string()
}

fn default_email_label() -> String {
    "EMAIL".to_string()
}

fn default_email_position() -> usize {
    3
}

/// A plain navigation link
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LinkConfig {
    pub label: String,
    pub href: String,
}

impl LinkConfig {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

fn default_links() -> Vec<LinkConfig> {
    vec![
        LinkConfig::new("BLOG", "/blog"),
        LinkConfig::new("GITHUB", "https://github.com/michalczaplinski"),
        LinkConfig::new("TWITTER", "https://twitter.com/C_Z_A_P_L_A"),
        LinkConfig::new("RESUME", "/michal_czaplinski_cv_2019.pdf"),
    ]
}

/// A blog post listed on the blog index
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PostConfig {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Timing and range constants of the page animations
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnimationConfig {
    #[serde(default = "default_split_delay_ms")]
    pub split_delay_ms: u64,
    #[serde(default = "default_merge_delay_ms")]
    pub merge_delay_ms: u64,
    #[serde(default = "default_trail_offset_min")]
    pub trail_offset_min: f32,
    #[serde(default = "default_trail_offset_max")]
    pub trail_offset_max: f32,
    #[serde(default = "default_rotate_once_ms")]
    pub rotate_once_ms: u64,
    #[serde(default = "default_gradient_min_deg")]
    pub gradient_min_deg: f32,
    #[serde(default = "default_gradient_max_deg")]
    pub gradient_max_deg: f32,
}

impl AnimationConfig {
    pub fn trail_offsets(&self) -> OffsetRange {
        OffsetRange::new(self.trail_offset_min, self.trail_offset_max)
    }

    fn validate(&self) -> Result<()> {
        if self.merge_delay_ms < self.split_delay_ms {
            return Err(FolioError::InvalidConfig(format!(
                "animation.merge_delay_ms ({}) must not be earlier than split_delay_ms ({})",
                self.merge_delay_ms, self.split_delay_ms
            )));
        }
        if self.trail_offset_min < 0.0 || self.trail_offset_min > self.trail_offset_max {
            return Err(FolioError::InvalidConfig(format!(
                "animation trail offsets must satisfy 0 <= min <= max, got {}..{}",
                self.trail_offset_min, self.trail_offset_max
            )));
        }
        let angles = [self.gradient_min_deg, self.gradient_max_deg];
        if angles.iter().any(|deg| !deg.is_finite()) {
            return Err(FolioError::InvalidConfig(
                "animation gradient angles must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            split_delay_ms: default_split_delay_ms(),
            merge_delay_ms: default_merge_delay_ms(),
            trail_offset_min: default_trail_offset_min(),
            trail_offset_max: default_trail_offset_max(),
            rotate_once_ms: default_rotate_once_ms(),
            gradient_min_deg: default_gradient_min_deg(),
            gradient_max_deg: default_gradient_max_deg(),
        }
    }
}

fn default_split_delay_ms() -> u64 {
    100
}

fn default_merge_delay_ms() -> u64 {
    1500
}

fn default_trail_offset_min() -> f32 {
    100.0
}

fn default_trail_offset_max() -> f32 {
    250.0
}

fn default_rotate_once_ms() -> u64 {
    2100
}

fn default_gradient_min_deg() -> f32 {
    20.0
}

fn default_gradient_max_deg() -> f32 {
    165.0
}
