//! Shared test utilities for the postline test suite.
//!
//! Provides canned schedules with predictable cross-reference templates and
//! the three test doubles the core needs to run without a platform: an
//! in-memory storage backend, a scripted rich-text converter, and a mock
//! client that records submissions, edits, and wiki writes.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::client::{PlatformClient, RichTextConverter};
use crate::config::NavigationConfig;
use crate::error::{Error, Result};
use crate::post::Post;
use crate::schedule::Schedule;
use crate::storage::ScheduleStorage;
use crate::timer::WaitUntil;

// =========================================================================
// Canned schedules
// =========================================================================

/// A single valid post, Saturday 17:00 UTC.
pub fn sample_post(name: &str) -> Post {
    Post::new(
        name,
        Utc.with_ymd_and_hms(2018, 1, 6, 17, 0, 0).unwrap(),
        "anime",
        format!("Slow Start - {name}"),
        format!("*Slow Start*, {name}"),
    )
    .unwrap()
}

/// A weekly series `e01..e0n` (n < 10) where every body references the
/// navigation snippet and every sibling by name:
///
/// ```text
/// $navigation_links|1:$e01|2:$e02|3:$e03
/// ```
///
/// Sibling markers are `-` (scheduled), `*` (current), and the submission
/// link (submitted), so a rendered body spells out the whole series state.
pub fn sample_series(n: usize) -> Vec<Post> {
    let body_template = (1..=n).fold("$navigation_links".to_string(), |body, i| {
        format!("{body}|{i}:$e{i:02}")
    });

    (1..=n)
        .map(|i| {
            let submit_at = Utc.with_ymd_and_hms(2018, 1, 6, 17, 0, 0).unwrap()
                + Duration::days(7 * (i as i64 - 1));
            let mut post = Post::new(
                format!("e{i:02}"),
                submit_at,
                "anime",
                format!("Episode {i}"),
                body_template.clone(),
            )
            .unwrap();
            post.navigation_scheduled = "-".into();
            post.navigation_current = "*".into();
            post
        })
        .collect()
}

pub fn sample_schedule(n: usize) -> Schedule {
    Schedule::new("anime", sample_series(n)).unwrap()
}

/// Navigation templates that render to the bare link values, keeping
/// expected bodies short.
pub fn navigation_config() -> NavigationConfig {
    NavigationConfig {
        placeholder: "navigation_links".into(),
        template_empty: String::new(),
        template_previous: "$previous_link".into(),
        template_next: "$next_link".into(),
        template_both: "$previous_link$next_link".into(),
    }
}

// =========================================================================
// Test doubles
// =========================================================================

/// In-memory [`ScheduleStorage`]: the schedule document is held as a string
/// and post bodies resolve to `body of <source>`.
pub struct MemoryStorage {
    data: RefCell<String>,
    saved: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new(data: &str) -> Self {
        Self {
            data: RefCell::new(data.to_string()),
            saved: RefCell::new(None),
        }
    }

    /// The last document written back, if any.
    pub fn saved(&self) -> Option<String> {
        self.saved.borrow().clone()
    }
}

impl ScheduleStorage for MemoryStorage {
    fn load_schedule_data(&self) -> Result<String> {
        Ok(self.data.borrow().clone())
    }

    fn load_post_body(&self, source: &str) -> Result<String> {
        Ok(format!("body of {source}"))
    }

    fn save_schedule_data(&self, data: &str) -> Result<()> {
        *self.saved.borrow_mut() = Some(data.to_string());
        *self.data.borrow_mut() = data.to_string();
        Ok(())
    }
}

/// A converter that replays scripted responses and counts its calls.
///
/// Panics when called more times than it has responses — an unexpected
/// conversion is a test failure in itself.
pub struct MockConverter {
    responses: RefCell<VecDeque<Result<serde_json::Value>>>,
    calls: Cell<usize>,
}

impl MockConverter {
    pub fn with_responses(responses: Vec<Result<serde_json::Value>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RichTextConverter for MockConverter {
    fn convert_to_richtext(&self, _markdown: &str) -> Result<serde_json::Value> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop_front()
            .expect("unexpected rich-text conversion")
    }
}

/// Recording [`PlatformClient`]: wiki pages live in a map, submissions get
/// sequential ids (`id_1`, `id_2`, ...), and every edit is captured.
pub struct MockClient {
    wiki: RefCell<HashMap<(String, String), String>>,
    submitted: RefCell<Vec<Post>>,
    updates: RefCell<Vec<(String, String)>>,
    update_calls: Cell<usize>,
    fail_update_at: Cell<Option<usize>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            wiki: RefCell::new(HashMap::new()),
            submitted: RefCell::new(Vec::new()),
            updates: RefCell::new(Vec::new()),
            update_calls: Cell::new(0),
            fail_update_at: Cell::new(None),
        }
    }

    pub fn set_wiki_page(&self, subreddit: &str, path: &str, content: &str) {
        self.wiki
            .borrow_mut()
            .insert((subreddit.to_string(), path.to_string()), content.to_string());
    }

    pub fn wiki_page(&self, subreddit: &str, path: &str) -> Option<String> {
        self.wiki
            .borrow()
            .get(&(subreddit.to_string(), path.to_string()))
            .cloned()
    }

    pub fn submitted_titles(&self) -> Vec<String> {
        self.submitted
            .borrow()
            .iter()
            .map(|post| post.title.clone())
            .collect()
    }

    /// Successful `(submission_id, body)` edits, in call order.
    pub fn updates(&self) -> Vec<(String, String)> {
        self.updates.borrow().clone()
    }

    /// Make the nth (1-based) call to `update_post` fail.
    pub fn fail_nth_update(&self, n: usize) {
        self.fail_update_at.set(Some(n));
    }
}

impl RichTextConverter for MockClient {
    fn convert_to_richtext(&self, markdown: &str) -> Result<serde_json::Value> {
        Ok(serde_json::json!({ "document": [{ "c": markdown }] }))
    }
}

impl PlatformClient for MockClient {
    fn authorize(&mut self) -> Result<String> {
        Ok("cute-tester".into())
    }

    fn submit_post(&self, post: &Post) -> Result<String> {
        let mut submitted = self.submitted.borrow_mut();
        submitted.push(post.clone());
        Ok(format!("id_{}", submitted.len()))
    }

    fn update_post(&self, submission_id: &str, body: &str) -> Result<()> {
        let call = self.update_calls.get() + 1;
        self.update_calls.set(call);
        if self.fail_update_at.get() == Some(call) {
            return Err(Error::Remote("update rejected".into()));
        }
        self.updates
            .borrow_mut()
            .push((submission_id.to_string(), body.to_string()));
        Ok(())
    }

    fn read_wiki_page(&self, subreddit: &str, path: &str) -> Result<String> {
        self.wiki_page(subreddit, path)
            .ok_or_else(|| Error::MissingSchedule {
                message: format!("The wiki page not found: /r/{subreddit}/wiki/{path}"),
                hint: None,
            })
    }

    fn write_wiki_page(
        &self,
        subreddit: &str,
        path: &str,
        content: &str,
        _reason: &str,
    ) -> Result<()> {
        self.set_wiki_page(subreddit, path, content);
        Ok(())
    }
}

/// A [`WaitUntil`] that returns at once, recording every target it was asked
/// to wait for. The aborting variant simulates Ctrl+C during the countdown.
#[derive(Default)]
pub struct InstantTimer {
    waits: RefCell<Vec<DateTime<Utc>>>,
    abort: bool,
}

impl InstantTimer {
    pub fn aborting() -> Self {
        Self {
            abort: true,
            ..Self::default()
        }
    }

    pub fn waits(&self) -> Vec<DateTime<Utc>> {
        self.waits.borrow().clone()
    }
}

impl WaitUntil for InstantTimer {
    fn wait_until(&self, target: DateTime<Utc>) -> Result<()> {
        self.waits.borrow_mut().push(target);
        if self.abort {
            return Err(Error::Aborted);
        }
        Ok(())
    }
}
