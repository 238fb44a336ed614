//! Schedule progression.
//!
//! [`Scheduler`] owns the loaded [`Schedule`] and answers the two questions
//! the run loop keeps asking: which post is due next, and which posts are
//! already up (and therefore need their navigation links refreshed). Posts
//! it hands out are always rendered first.
//!
//! A post whose scheduled time has already passed is skipped rather than
//! submitted late; `submit_past_due` in the configuration restores catch-up
//! submission for operators who want it.

use crate::error::Result;
use crate::post::Post;
use crate::renderer::PostRenderer;
use crate::schedule::Schedule;
use crate::storage::ScheduleStorage;
use chrono::{DateTime, Utc};

const NOT_LOADED: &str = "the schedule must be loaded before calling this method";

pub struct Scheduler<S: ScheduleStorage> {
    storage: S,
    submit_past_due: bool,
    schedule: Option<Schedule>,
}

impl<S: ScheduleStorage> Scheduler<S> {
    pub fn new(storage: S, submit_past_due: bool) -> Self {
        Self {
            storage,
            submit_past_due,
            schedule: None,
        }
    }

    /// Load the schedule from storage. Must be called before anything else.
    pub fn load(&mut self) -> Result<()> {
        let schedule = self.storage.load()?;
        tracing::info!(
            subreddit = %schedule.subreddit,
            posts = schedule.posts.len(),
            "schedule_loaded"
        );
        self.schedule = Some(schedule);
        Ok(())
    }

    /// The loaded schedule.
    ///
    /// # Panics
    ///
    /// Panics if [`load`](Self::load) has not been called.
    pub fn schedule(&self) -> &Schedule {
        self.schedule.as_ref().expect(NOT_LOADED)
    }

    /// Find the next post to submit and render it (thumbnail included).
    ///
    /// Returns `None` when every remaining post is either submitted or past
    /// due — the series is finished as far as this run is concerned.
    pub fn next_due_post(&mut self, renderer: &PostRenderer<'_>) -> Result<Option<&mut Post>> {
        self.next_due_post_at(renderer, Utc::now())
    }

    /// [`next_due_post`](Self::next_due_post) against an explicit clock.
    pub fn next_due_post_at(
        &mut self,
        renderer: &PostRenderer<'_>,
        now: DateTime<Utc>,
    ) -> Result<Option<&mut Post>> {
        let submit_past_due = self.submit_past_due;
        let schedule = self.schedule.as_mut().expect(NOT_LOADED);

        let index = schedule.posts.iter().position(|post| {
            if post.is_submitted() {
                return false;
            }
            if post.submit_at <= now && !submit_past_due {
                tracing::warn!(post = %post.name, submit_at = %post.submit_at, "post_past_due");
                return false;
            }
            true
        });

        let Some(index) = index else {
            tracing::info!("schedule_exhausted");
            return Ok(None);
        };

        renderer.prepare_post(schedule, index, true)?;
        Ok(Some(&mut schedule.posts[index]))
    }

    /// All submitted posts, re-rendered so their navigation links reflect the
    /// current submission state. `exclude` names a post to leave out —
    /// typically the one that was just submitted and is already up to date.
    pub fn submitted_posts(
        &mut self,
        renderer: &PostRenderer<'_>,
        exclude: Option<&str>,
    ) -> Result<Vec<&Post>> {
        let schedule = self.schedule.as_mut().expect(NOT_LOADED);

        let indices: Vec<usize> = schedule
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| post.is_submitted() && Some(post.name.as_str()) != exclude)
            .map(|(index, _)| index)
            .collect();

        for &index in &indices {
            // Sibling updates replace the markdown body only, so no thumbnail.
            renderer.prepare_post(schedule, index, false)?;
        }

        let schedule = self.schedule.as_ref().expect(NOT_LOADED);
        Ok(indices.iter().map(|&index| &schedule.posts[index]).collect())
    }

    /// Write the submission state back to storage.
    pub fn persist(&self) -> Result<()> {
        self.storage.save(self.schedule.as_ref().expect(NOT_LOADED))
    }
}
