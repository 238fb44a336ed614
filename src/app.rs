//! The submission run loop.
//!
//! [`run`] drives a whole session: authorize, load the schedule, then for
//! every due post wait out the countdown, submit, record the submission id,
//! and refresh the navigation links of the posts that are already up. The
//! loop is generic over the platform client and the timer so it can be
//! exercised end to end with test doubles.
//!
//! Failure policy: anything up to and including the submission itself is
//! fatal for the run, but the schedule is persisted right after every
//! submission, so a crash never loses a submission id. Every edit after that
//! point — the markdown restore and the sibling link updates — is best
//! effort: a failed edit is reported and the run continues.

use crate::client::PlatformClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output;
use crate::renderer::PostRenderer;
use crate::scheduler::Scheduler;
use crate::storage;
use crate::timer::WaitUntil;
use std::time::Duration;

pub fn run<C: PlatformClient>(
    config: &AppConfig,
    client: &mut C,
    timer: &dyn WaitUntil,
) -> Result<()> {
    let username = client.authorize()?;
    tracing::info!(username, "authorized");
    output::print_logged_in(&username);

    let client = &*client;
    let storage = storage::from_config(&config.storage, client)?;
    let renderer = PostRenderer::new(&config.navigation, Some(client));
    let mut scheduler = Scheduler::new(storage, config.scheduler.submit_past_due);

    scheduler.load()?;
    output::print_schedule(scheduler.schedule());

    loop {
        let Some(post) = scheduler.next_due_post(&renderer)? else {
            output::print_all_done();
            return Ok(());
        };

        output::print_next_post(post);
        timer.wait_until(post.submit_at)?;

        output::print_submitting(post);
        let submission_id = client.submit_post(post)?;
        tracing::info!(post = %post.name, submission_id, "post_submitted");

        post.submission_id = Some(submission_id.clone());
        let name = post.name.clone();
        let body = post.body_rendered.clone();
        let submitted_richtext = post.submit_with_thumbnail && post.body_richtext.is_some();
        output::print_submitted(&name, &submission_id);

        // The post is live; record that before anything else can fail, or a
        // rerun would submit it a second time.
        scheduler.persist()?;

        // A rich-text submission loses the markdown formatting, so the post
        // is re-edited with the rendered markdown once the platform has
        // picked up the thumbnail.
        if submitted_richtext {
            if let Some(body) = &body {
                pause(config.client.post_update_delay_ms);
                tracing::info!(post = %name, "post_body_restore");
                if let Err(error) = client.update_post(&submission_id, body) {
                    tracing::warn!(post = %name, %error, "post_body_restore_failed");
                    output::print_update_failed(&name, &error);
                }
            }
        }

        for sibling in scheduler.submitted_posts(&renderer, Some(&name))? {
            let (Some(id), Some(body)) = (&sibling.submission_id, &sibling.body_rendered) else {
                continue;
            };
            pause(config.client.sibling_update_delay_ms);
            tracing::info!(post = %sibling.name, "sibling_update");
            output::print_sibling_update(&sibling.name);
            if let Err(error) = client.update_post(id, body) {
                tracing::warn!(post = %sibling.name, %error, "sibling_update_failed");
                output::print_update_failed(&sibling.name, &error);
            }
        }
    }
}

fn pause(milliseconds: u64) {
    if milliseconds > 0 {
        std::thread::sleep(Duration::from_millis(milliseconds));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_helpers::{InstantTimer, MockClient};
    use chrono::{DateTime, Utc};

    const SCHEDULE_DATA: &str = r#"subreddit = "anime"

[[posts]]
name = "episode_01"
submit_at = "2100-01-06 17:00:00"
title = "Episode 1"
body_template = "episode_01.md"
navigation_scheduled = "-"
navigation_submitted = "[previous]($link)"
navigation_current = "*"

[[posts]]
name = "episode_02"
submit_at = "2100-01-13 17:00:00"
title = "Episode 2"
body_template = "episode_02.md"
navigation_scheduled = "-"
navigation_submitted = "[previous]($link)"
navigation_current = "*"
"#;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.schedule_wiki_url = Some("/r/anime/wiki/schedule".into());
        config.client.post_update_delay_ms = 0;
        config.client.sibling_update_delay_ms = 0;
        config
    }

    fn client() -> MockClient {
        let client = MockClient::new();
        client.set_wiki_page("anime", "schedule", SCHEDULE_DATA);
        client.set_wiki_page("anime", "schedule/episode_01.md", "$navigation_links ep 1");
        client.set_wiki_page("anime", "schedule/episode_02.md", "$navigation_links ep 2");
        client
    }

    #[test]
    fn run_submits_every_due_post_in_order() {
        let mut client = client();
        run(&config(), &mut client, &InstantTimer::default()).unwrap();

        assert_eq!(client.submitted_titles(), vec!["Episode 1", "Episode 2"]);

        // The schedule on the wiki now carries both submission ids.
        let saved = client.wiki_page("anime", "schedule").unwrap();
        let saved: String = saved
            .lines()
            .map(|line| format!("{}\n", line.strip_prefix("    ").unwrap_or(line)))
            .collect();
        let saved: toml::Value = toml::from_str(&saved).unwrap();
        assert_eq!(saved["posts"][0]["submission_id"].as_str(), Some("id_1"));
        assert_eq!(saved["posts"][1]["submission_id"].as_str(), Some("id_2"));
    }

    #[test]
    fn run_waits_for_each_submission_time() {
        let mut client = client();
        let timer = InstantTimer::default();
        run(&config(), &mut client, &timer).unwrap();

        let waits = timer.waits();
        let expected: Vec<DateTime<Utc>> = ["2100-01-06T17:00:00Z", "2100-01-13T17:00:00Z"]
            .iter()
            .map(|text| text.parse().unwrap())
            .collect();
        assert_eq!(waits, expected);
    }

    #[test]
    fn run_restores_markdown_and_updates_siblings() {
        let mut client = client();
        run(&config(), &mut client, &InstantTimer::default()).unwrap();

        let updates = client.updates();
        // Self-update of each rich-text submission, then the first post's
        // navigation refresh after the second submission.
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].0, "id_1");
        assert_eq!(updates[1].0, "id_2");
        assert_eq!(updates[2].0, "id_1");
        // The refreshed first post now links to the second one.
        assert!(updates[2].1.contains("(/id_2)"));
    }

    #[test]
    fn abort_during_countdown_stops_before_submitting() {
        let mut client = client();
        let timer = InstantTimer::aborting();

        let error = run(&config(), &mut client, &timer).unwrap_err();
        assert!(matches!(error, Error::Aborted));
        assert!(client.submitted_titles().is_empty());
    }

    #[test]
    fn failed_restore_edit_still_records_the_submission() {
        let mut client = client();
        // The first update call is the markdown restore of the first post.
        client.fail_nth_update(1);

        run(&config(), &mut client, &InstantTimer::default()).unwrap();
        assert_eq!(client.submitted_titles(), vec!["Episode 1", "Episode 2"]);

        let saved = client.wiki_page("anime", "schedule").unwrap();
        assert!(saved.contains("id_1"));
        assert!(saved.contains("id_2"));
    }

    #[test]
    fn failed_sibling_update_does_not_stop_the_run() {
        let mut client = client();
        // The third update call is the navigation refresh of the first post.
        client.fail_nth_update(3);

        run(&config(), &mut client, &InstantTimer::default()).unwrap();
        assert_eq!(client.submitted_titles(), vec!["Episode 1", "Episode 2"]);
        assert_eq!(client.updates().len(), 2);
    }

    #[test]
    fn missing_storage_configuration_is_fatal() {
        let mut config = config();
        config.storage.schedule_wiki_url = None;

        let error = run(&config, &mut client(), &InstantTimer::default()).unwrap_err();
        assert!(matches!(error, Error::MissingSchedule { .. }));
        assert_eq!(
            error.hint(),
            Some("The schedule must be stored in a file or the community wiki.")
        );
    }
}
