//! Schedule storage.
//!
//! The schedule lives outside the process — a local TOML file or a community
//! wiki page — and both backends share one parse/serialize/merge
//! implementation. [`ScheduleStorage`] requires only three primitive
//! operations (read the schedule document, read a post body, write the
//! schedule document); `load()` and `save()` are provided on top of them.
//!
//! ## Schedule document
//!
//! ```toml
//! subreddit = "anime"
//!
//! [[posts]]
//! name = "episode_01"
//! submit_at = "2018-01-06 17:00:00"        # UTC; RFC 3339 also accepted
//! title = "Slow Start - Episode 1 Discussion"
//! body_template = "episode_01.md"          # Resolved via load_post_body
//! submit_with_thumbnail = true             # Optional, default true
//! flair_id = "0446bc04-91c0-11e8-8869"     # Optional
//! navigation_submitted = "[Episode 1]($link)"  # Optional, default "$link"
//! navigation_current = "**Episode 1**"     # Optional, default ""
//! navigation_scheduled = "Episode 1"       # Optional, default ""
//! # submission_id is written back after submission
//! ```
//!
//! ## Saving
//!
//! `save()` is a targeted field merge, not a struct round-trip: the stored
//! document is re-read, `submission_id` is set on records whose posts have
//! been submitted, and the document is written back. Keys this crate does not
//! model survive the update; comments do not, since the document is
//! re-serialized.

use crate::client::PlatformClient;
use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::post::Post;
use crate::schedule::Schedule;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const STRUCTURE_HINT: &str = "Repair the structure of the schedule file.";
const FIELDS_HINT: &str = "Make sure all the fields are filled in.";
const DATE_HINT: &str = "All dates must be in 'YYYY-MM-DD hh:mm:ss' format (UTC).";

/// Backing store for the schedule document and post bodies.
pub trait ScheduleStorage {
    /// Read the raw schedule document.
    fn load_schedule_data(&self) -> Result<String>;

    /// Read a post body referenced by a `body_template` field.
    fn load_post_body(&self, source: &str) -> Result<String>;

    /// Write the raw schedule document back.
    fn save_schedule_data(&self, data: &str) -> Result<()>;

    /// Parse and load the schedule.
    fn load(&self) -> Result<Schedule> {
        let data = self.load_schedule_data()?;
        let document: toml::Value = toml::from_str(&data).map_err(|error| {
            tracing::error!(%error, "schedule_invalid");
            Error::InvalidSchedule {
                message: "Failed to parse the data about the schedule.".into(),
                hint: Some(STRUCTURE_HINT.into()),
            }
        })?;

        let subreddit = document
            .get("subreddit")
            .and_then(toml::Value::as_str)
            .ok_or_else(incomplete)?
            .to_string();

        let records = document
            .get("posts")
            .and_then(toml::Value::as_array)
            .ok_or_else(incomplete)?;

        let mut posts = Vec::with_capacity(records.len());
        for record in records {
            posts.push(self.load_post(record, &subreddit)?);
        }

        Schedule::new(subreddit, posts)
    }

    /// Parse one post record, loading its body through the backend.
    fn load_post(&self, record: &toml::Value, subreddit: &str) -> Result<Post> {
        let field = |name: &str| record.get(name).and_then(toml::Value::as_str);

        let name = field("name").ok_or_else(incomplete)?;
        let submit_at = parse_submit_at(record.get("submit_at"), name)?;
        let title = field("title").ok_or_else(incomplete)?;
        let body_source = field("body_template").ok_or_else(incomplete)?;
        let body = self.load_post_body(body_source)?;

        let mut post = Post::new(name, submit_at, subreddit, title, body)?;

        if let Some(with_thumbnail) = record.get("submit_with_thumbnail") {
            post.submit_with_thumbnail = with_thumbnail.as_bool().ok_or_else(incomplete)?;
        }
        post.flair_id = field("flair_id").map(String::from);
        if let Some(template) = field("navigation_submitted") {
            post.navigation_submitted = template.into();
        }
        if let Some(text) = field("navigation_current") {
            post.navigation_current = text.into();
        }
        if let Some(text) = field("navigation_scheduled") {
            post.navigation_scheduled = text.into();
        }
        post.submission_id = field("submission_id").map(String::from);

        Ok(post)
    }

    /// Merge the submission ids of `schedule` into the stored document.
    fn save(&self, schedule: &Schedule) -> Result<()> {
        let data = self.load_schedule_data()?;
        let mut document: toml::Value =
            toml::from_str(&data).map_err(|error| Error::InvalidSchedule {
                message: format!("Failed to re-read the schedule for saving: {error}"),
                hint: Some(STRUCTURE_HINT.into()),
            })?;

        let submission_ids: HashMap<&str, &str> = schedule
            .posts
            .iter()
            .filter_map(|post| {
                post.submission_id
                    .as_deref()
                    .map(|id| (post.name.as_str(), id))
            })
            .collect();

        if let Some(records) = document
            .get_mut("posts")
            .and_then(toml::Value::as_array_mut)
        {
            for record in records {
                let Some(name) = record.get("name").and_then(toml::Value::as_str) else {
                    continue;
                };
                if let Some(id) = submission_ids.get(name) {
                    let id = toml::Value::String((*id).into());
                    if let Some(table) = record.as_table_mut() {
                        table.insert("submission_id".into(), id);
                    }
                }
            }
        }

        let data = toml::to_string(&document).map_err(|error| Error::InvalidSchedule {
            message: format!("Failed to serialize the schedule: {error}"),
            hint: None,
        })?;

        self.save_schedule_data(&data)
    }
}

fn incomplete() -> Error {
    Error::InvalidSchedule {
        message: "Incomplete schedule data.".into(),
        hint: Some(FIELDS_HINT.into()),
    }
}

/// Parse a `submit_at` value, accepting the naive `YYYY-MM-DD hh:mm:ss`
/// contract (read as UTC), RFC 3339, and bare TOML datetimes.
fn parse_submit_at(raw: Option<&toml::Value>, post_name: &str) -> Result<DateTime<Utc>> {
    let invalid = || Error::InvalidSchedule {
        message: format!(
            "The 'submit_at' field of the scheduled post '{post_name}' contains an invalid value."
        ),
        hint: Some(DATE_HINT.into()),
    };

    let text = match raw {
        Some(toml::Value::String(text)) => text.clone(),
        Some(toml::Value::Datetime(datetime)) => datetime.to_string(),
        Some(_) => return Err(invalid()),
        None => return Err(incomplete()),
    };

    if let Ok(datetime) = DateTime::parse_from_rfc3339(&text) {
        return Ok(datetime.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(invalid())
}

impl<S: ScheduleStorage + ?Sized> ScheduleStorage for Box<S> {
    fn load_schedule_data(&self) -> Result<String> {
        (**self).load_schedule_data()
    }

    fn load_post_body(&self, source: &str) -> Result<String> {
        (**self).load_post_body(source)
    }

    fn save_schedule_data(&self, data: &str) -> Result<()> {
        (**self).save_schedule_data(data)
    }
}

/// Local file backend: a schedule file plus post body files resolved
/// relative to its directory.
pub struct FileStorage {
    schedule_file: PathBuf,
    schedule_directory: PathBuf,
}

impl FileStorage {
    pub fn new(schedule_file: impl Into<PathBuf>) -> Self {
        let schedule_file = schedule_file.into();
        let schedule_directory = schedule_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            schedule_file,
            schedule_directory,
        }
    }
}

impl ScheduleStorage for FileStorage {
    fn load_schedule_data(&self) -> Result<String> {
        tracing::info!(path = %self.schedule_file.display(), "schedule_file_read");
        fs::read_to_string(&self.schedule_file).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                Error::MissingSchedule {
                    message: format!(
                        "The schedule file not found: {}",
                        self.schedule_file.display()
                    ),
                    hint: None,
                }
            } else {
                error.into()
            }
        })
    }

    fn load_post_body(&self, source: &str) -> Result<String> {
        let path = self.schedule_directory.join(source);
        tracing::info!(path = %path.display(), "post_file_read");
        fs::read_to_string(&path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                Error::MissingPost(format!("The post file not found: {}", path.display()))
            } else {
                error.into()
            }
        })
    }

    /// Write through a temp file and rename, so a crash mid-write cannot
    /// corrupt the previously good schedule.
    fn save_schedule_data(&self, data: &str) -> Result<()> {
        tracing::info!(path = %self.schedule_file.display(), "schedule_file_update");
        let temp = self.schedule_file.with_extension("toml.tmp");
        fs::write(&temp, data)?;
        fs::rename(&temp, &self.schedule_file)?;
        Ok(())
    }
}

/// Wiki backend: the schedule lives on a community wiki page, with post
/// bodies on sub-pages, all accessed through the platform client.
pub struct WikiStorage<'a, C: PlatformClient + ?Sized> {
    client: &'a C,
    subreddit: String,
    wiki_path: String,
}

impl<'a, C: PlatformClient + ?Sized> WikiStorage<'a, C> {
    /// Build from a wiki URL of the form `/r/<subreddit>/wiki/<path>`
    /// (a full `https://…` prefix is tolerated).
    pub fn from_url(client: &'a C, url: &str) -> Result<Self> {
        let invalid = || Error::InvalidWikiLink(url.into());

        let after_r = url.split_once("/r/").ok_or_else(invalid)?.1;
        let (subreddit, wiki_path) = after_r.split_once("/wiki/").ok_or_else(invalid)?;
        if subreddit.is_empty() || subreddit.contains('/') || wiki_path.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            client,
            subreddit: subreddit.to_string(),
            wiki_path: wiki_path.trim_end_matches('/').to_string(),
        })
    }
}

impl<C: PlatformClient + ?Sized> ScheduleStorage for WikiStorage<'_, C> {
    fn load_schedule_data(&self) -> Result<String> {
        tracing::info!(
            subreddit = %self.subreddit,
            wiki_path = %self.wiki_path,
            "schedule_wiki_read"
        );
        self.client.read_wiki_page(&self.subreddit, &self.wiki_path)
    }

    fn load_post_body(&self, source: &str) -> Result<String> {
        let wiki_path = format!("{}/{}", self.wiki_path, source);
        tracing::info!(subreddit = %self.subreddit, wiki_path, "post_wiki_read");
        self.client.read_wiki_page(&self.subreddit, &wiki_path)
    }

    /// The content is indented by four spaces so the wiki renders it as a
    /// code block.
    fn save_schedule_data(&self, data: &str) -> Result<()> {
        tracing::info!(
            subreddit = %self.subreddit,
            wiki_path = %self.wiki_path,
            "schedule_wiki_update"
        );
        let indented: String = data
            .lines()
            .map(|line| format!("    {line}\n"))
            .collect();
        self.client
            .write_wiki_page(&self.subreddit, &self.wiki_path, &indented, "Schedule update")
    }
}

/// Select a storage backend from the configuration.
///
/// The wiki URL takes precedence; with neither option set there is nowhere
/// to load a schedule from.
pub fn from_config<'a, C: PlatformClient>(
    config: &StorageConfig,
    client: &'a C,
) -> Result<Box<dyn ScheduleStorage + 'a>> {
    if let Some(url) = &config.schedule_wiki_url {
        return Ok(Box::new(WikiStorage::from_url(client, url)?));
    }
    if let Some(path) = &config.schedule_file {
        return Ok(Box::new(FileStorage::new(path)));
    }
    Err(Error::MissingSchedule {
        message: "Schedule storage not defined.".into(),
        hint: Some("The schedule must be stored in a file or the community wiki.".into()),
    })
}

/// A documented sample schedule for `gen-schedule`.
pub fn sample_schedule_toml() -> &'static str {
    r#"# postline schedule. Posts are submitted in order; the order also defines
# "previous" and "next" for the navigation links.
subreddit = "anime"

[[posts]]
name = "episode_01"
# Submission time, UTC.
submit_at = "2026-01-03 17:00:00"
title = "Slow Start - Episode 1 Discussion"
# Body file, relative to this schedule file. The body may reference sibling
# posts as $episode_02 etc., and $navigation_links for the prev/next snippet.
body_template = "episode_01.md"
# How siblings refer to this post once it is submitted ($link = /<id>),
# while it is the post being rendered, and while it is still scheduled.
navigation_submitted = "[Episode 1]($link)"
navigation_current = "**Episode 1**"
navigation_scheduled = "Episode 1"

[[posts]]
name = "episode_02"
submit_at = "2026-01-10 17:00:00"
title = "Slow Start - Episode 2 Discussion"
body_template = "episode_02.md"
# Submit as plain markdown (no thumbnail conversion).
submit_with_thumbnail = false
navigation_submitted = "[Episode 2]($link)"
navigation_current = "**Episode 2**"
navigation_scheduled = "Episode 2"
"#
}
