//! The `Schedule` entity — an ordered series of posts sharing a destination.
//!
//! Order is semantically meaningful: it defines "previous" and "next" for the
//! navigation resolver. Post names must be unique within a schedule; the
//! resolver assumes at most one post can claim the "current" slot per render,
//! so duplicates are rejected here rather than silently mis-resolving links.

use crate::error::{Error, Result};
use crate::post::Post;
use std::collections::HashSet;

/// An ordered collection of posts for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub subreddit: String,
    pub posts: Vec<Post>,
}

impl Schedule {
    /// Build a schedule, validating the destination and post-name uniqueness.
    pub fn new(subreddit: impl Into<String>, posts: Vec<Post>) -> Result<Self> {
        let subreddit = subreddit.into();

        tracing::debug!(subreddit, posts = posts.len(), "schedule_create");

        if subreddit.is_empty() {
            return Err(Error::InvalidSchedule {
                message: "The 'subreddit' field must be set.".into(),
                hint: Some("Make sure all the fields are filled in.".into()),
            });
        }

        let mut seen = HashSet::new();
        for post in &posts {
            if !seen.insert(post.name.as_str()) {
                return Err(Error::InvalidSchedule {
                    message: format!("Duplicate post name in the schedule: '{}'.", post.name),
                    hint: Some("Every post must have a unique name.".into()),
                });
            }
        }

        Ok(Schedule { subreddit, posts })
    }

    /// Index of the post with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.posts.iter().position(|post| post.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_post;

    #[test]
    fn create_and_compare() {
        let schedule = Schedule::new(
            "anime",
            vec![sample_post("episode_01"), sample_post("episode_02")],
        )
        .unwrap();
        let identical = Schedule::new(
            "anime",
            vec![sample_post("episode_01"), sample_post("episode_02")],
        )
        .unwrap();
        let shorter = Schedule::new("anime", vec![sample_post("episode_01")]).unwrap();
        let elsewhere = Schedule::new(
            "manga",
            vec![sample_post("episode_01"), sample_post("episode_02")],
        )
        .unwrap();

        assert_eq!(schedule, identical);
        assert_ne!(schedule, shorter);
        assert_ne!(schedule, elsewhere);
    }

    #[test]
    fn empty_subreddit_rejected() {
        let result = Schedule::new("", vec![sample_post("episode_01")]);
        assert!(matches!(result, Err(Error::InvalidSchedule { .. })));
    }

    #[test]
    fn duplicate_names_rejected() {
        let result = Schedule::new(
            "anime",
            vec![sample_post("episode_01"), sample_post("episode_01")],
        );
        assert!(matches!(result, Err(Error::InvalidSchedule { .. })));
    }

    #[test]
    fn position_finds_posts_by_name() {
        let schedule = Schedule::new(
            "anime",
            vec![sample_post("episode_01"), sample_post("episode_02")],
        )
        .unwrap();
        assert_eq!(schedule.position("episode_02"), Some(1));
        assert_eq!(schedule.position("episode_99"), None);
    }
}
