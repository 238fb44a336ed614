//! Application configuration.
//!
//! Loaded from a single `postline.toml`. All options have defaults — a config
//! file only needs the values it overrides — and unknown keys are rejected to
//! catch typos early.
//!
//! ```toml
//! [storage]
//! schedule_file = "schedule.toml"   # Local schedule (or use schedule_wiki_url)
//! # schedule_wiki_url = "/r/anime/wiki/rewatch/schedule"
//! refresh_token_file = ".postline/refresh_token"
//!
//! [navigation]
//! placeholder = "navigation_links"  # Body placeholder bound to the link snippet
//! template_empty = ""
//! template_previous = "[← Previous]($previous_link)"
//! template_next = "[Next →]($next_link)"
//! template_both = "[← Previous]($previous_link) | [Next →]($next_link)"
//!
//! [timer]
//! refresh_interval_ms = 500         # Countdown tick length
//!
//! [client]
//! post_update_delay_ms = 2000      # Delay before editing a just-submitted post
//! sibling_update_delay_ms = 2000   # Delay between sibling cross-link updates
//!
//! [scheduler]
//! submit_past_due = false          # Submit overdue posts immediately instead
//!                                  # of skipping them
//! ```
//!
//! Exactly one of `storage.schedule_file` and `storage.schedule_wiki_url`
//! should be set; the wiki URL wins when both are present.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration loaded from `postline.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub navigation: NavigationConfig,
    pub timer: TimerConfig,
    pub client: ClientConfig,
    pub scheduler: SchedulerConfig,
}

/// Schedule storage selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to a local schedule file.
    pub schedule_file: Option<String>,
    /// Wiki page holding the schedule, as `/r/<subreddit>/wiki/<path>`.
    pub schedule_wiki_url: Option<String>,
    /// File holding the authorization refresh token.
    pub refresh_token_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            schedule_file: None,
            schedule_wiki_url: None,
            refresh_token_file: ".postline/refresh_token".into(),
        }
    }
}

/// Templates for the cross-post navigation snippet.
///
/// The snippet replaces `$<placeholder>` in post bodies. Which template is
/// used depends on which neighbors have been submitted; the templates may
/// reference `$previous_link` and `$next_link`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Placeholder name bound to the rendered snippet.
    pub placeholder: String,
    /// Used when neither neighbor is submitted (returned verbatim).
    pub template_empty: String,
    /// Used when only the previous neighbor is submitted.
    pub template_previous: String,
    /// Used when only the next neighbor is submitted.
    pub template_next: String,
    /// Used when both neighbors are submitted.
    pub template_both: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            placeholder: "navigation_links".into(),
            template_empty: String::new(),
            template_previous: "[← Previous]($previous_link)".into(),
            template_next: "[Next →]($next_link)".into(),
            template_both: "[← Previous]($previous_link) | [Next →]($next_link)".into(),
        }
    }
}

/// Countdown timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimerConfig {
    /// Countdown tick length in milliseconds.
    pub refresh_interval_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 500,
        }
    }
}

/// Platform client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Delay before editing a freshly submitted post, in milliseconds.
    pub post_update_delay_ms: u64,
    /// Delay between cross-link updates of sibling posts, in milliseconds.
    pub sibling_update_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            post_update_delay_ms: 2000,
            sibling_update_delay_ms: 2000,
        }
    }
}

/// Scheduling policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Submit overdue unsubmitted posts immediately instead of skipping them.
    pub submit_past_due: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            submit_past_due: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|error| Error::InvalidConfig {
            message: format!("Cannot read the config file {}: {error}", path.display()),
            hint: Some("Run 'postline gen-config' to create a documented config file.".into()),
        })?;
        let config: AppConfig = toml::from_str(&text).map_err(|error| Error::InvalidConfig {
            message: format!("Cannot parse the config file {}: {error}", path.display()),
            hint: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate values that serde cannot check structurally.
    pub fn validate(&self) -> Result<()> {
        if self.navigation.placeholder.is_empty() {
            return Err(Error::InvalidConfig {
                message: "navigation.placeholder must not be empty".into(),
                hint: None,
            });
        }
        let mut chars = self.navigation.placeholder.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::InvalidConfig {
                message: format!(
                    "navigation.placeholder '{}' is not a valid placeholder name",
                    self.navigation.placeholder
                ),
                hint: Some("Use letters, digits, and underscores only.".into()),
            });
        }
        if self.timer.refresh_interval_ms == 0 {
            return Err(Error::InvalidConfig {
                message: "timer.refresh_interval_ms must be greater than zero".into(),
                hint: None,
            });
        }
        Ok(())
    }
}

/// A stock `postline.toml` with every option documented, for `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# postline configuration. All options are optional - defaults shown below.

[storage]
# Local schedule file. Exactly one storage option should be set; the wiki
# URL takes precedence when both are present.
schedule_file = "schedule.toml"
# schedule_wiki_url = "/r/anime/wiki/rewatch/schedule"
refresh_token_file = ".postline/refresh_token"

[navigation]
# Placeholder in post bodies bound to the rendered link snippet.
placeholder = "navigation_links"
# Snippet templates, chosen by which neighbors are already submitted.
# $previous_link and $next_link expand to the neighbors' remote paths.
template_empty = ""
template_previous = "[← Previous]($previous_link)"
template_next = "[Next →]($next_link)"
template_both = "[← Previous]($previous_link) | [Next →]($next_link)"

[timer]
# Countdown tick length in milliseconds.
refresh_interval_ms = 500

[client]
# Delay before editing a just-submitted post (milliseconds).
post_update_delay_ms = 2000
# Delay between cross-link updates of sibling posts (milliseconds).
sibling_update_delay_ms = 2000

[scheduler]
# Submit overdue unsubmitted posts immediately instead of skipping them.
submit_past_due = false
"#
}
