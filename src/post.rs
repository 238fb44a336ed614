//! The `Post` entity — one schedulable unit of the series.
//!
//! A post is created by schedule storage when parsing persisted records and
//! lives for the duration of a run. Two classes of fields never take part in
//! equality:
//!
//! - **Derived**: `body_rendered` (markdown produced by the renderer) and
//!   `body_richtext` (the rich-text JSON document used for thumbnail
//!   submission). Computed per run, never persisted.
//! - **Mutable outcome**: `submission_id`, set once when the post is
//!   submitted. The `None → Some` transition is one-way.
//!
//! The navigation override fields control how *other* posts refer to this one:
//! `navigation_submitted` is a template with a `$link` placeholder (default
//! `"$link"`, which renders as the bare `/{submission_id}` path),
//! `navigation_current` is the text shown while this post itself is being
//! rendered, and `navigation_scheduled` is used while the post has no
//! submission id yet. An empty `navigation_current` additionally opts the post
//! out of claiming the previous-link slot in the navigation snippet.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::fmt;

/// One scheduled post.
#[derive(Debug, Clone)]
pub struct Post {
    /// Unique key within a schedule, stable across runs.
    pub name: String,
    /// Scheduled submission time (UTC).
    pub submit_at: DateTime<Utc>,
    /// Destination community.
    pub subreddit: String,
    pub title: String,
    /// Raw body with `$name` placeholders for sibling posts.
    pub body_template: String,
    /// Submit as a rich-text document so the platform renders a thumbnail.
    pub submit_with_thumbnail: bool,
    pub flair_id: Option<String>,
    /// Template for links to this post once submitted (`$link` placeholder).
    pub navigation_submitted: String,
    /// Text replacing this post's placeholder in its own body.
    pub navigation_current: String,
    /// Text replacing this post's placeholder before submission.
    pub navigation_scheduled: String,
    /// Remote identifier, set once on submission.
    pub submission_id: Option<String>,
    /// Rendered markdown body (derived, not persisted).
    pub body_rendered: Option<String>,
    /// Rich-text JSON document (derived, not persisted).
    pub body_richtext: Option<serde_json::Value>,
}

impl Post {
    /// Create a post with the required fields; optional fields start at their
    /// defaults and are filled in by storage.
    ///
    /// Fails if any required field is empty.
    pub fn new(
        name: impl Into<String>,
        submit_at: DateTime<Utc>,
        subreddit: impl Into<String>,
        title: impl Into<String>,
        body_template: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let subreddit = subreddit.into();
        let title = title.into();
        let body_template = body_template.into();

        tracing::debug!(name, %submit_at, subreddit, title, "post_create");

        for (field, text) in [
            ("name", &name),
            ("subreddit", &subreddit),
            ("title", &title),
            ("body_template", &body_template),
        ] {
            if text.is_empty() {
                return Err(Error::InvalidSchedule {
                    message: format!("The '{field}' field of a post must be set."),
                    hint: Some("Make sure all the fields are filled in.".into()),
                });
            }
        }

        Ok(Post {
            name,
            submit_at,
            subreddit,
            title,
            body_template,
            submit_with_thumbnail: true,
            flair_id: None,
            navigation_submitted: "$link".into(),
            navigation_current: String::new(),
            navigation_scheduled: String::new(),
            submission_id: None,
            body_rendered: None,
            body_richtext: None,
        })
    }

    /// Whether the post has already been submitted.
    pub fn is_submitted(&self) -> bool {
        self.submission_id.is_some()
    }
}

/// Equality covers identity fields only — derived and mutable-outcome fields
/// are excluded so a freshly loaded schedule compares equal to one that has
/// been rendered or submitted.
impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        (
            &self.name,
            &self.submit_at,
            &self.subreddit,
            &self.title,
            &self.body_template,
        ) == (
            &other.name,
            &other.submit_at,
            &other.subreddit,
            &other.title,
            &other.body_template,
        )
    }
}

impl Eq for Post {}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/r/{} post at {}: {}",
            self.subreddit,
            self.submit_at.format("%Y-%m-%d %H:%M:%S"),
            self.title
        )
    }
}
