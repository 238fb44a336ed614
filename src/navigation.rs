//! The navigation resolver.
//!
//! Given a post and its position in the ordered series, this module computes
//! everything the body renderer needs to cross-link the series:
//!
//! - [`neighbor_ids`] — the submission ids of the nearest submitted neighbors
//!   (previous and next) of the post being rendered.
//! - [`render_links`] — the navigation snippet built from those ids, using the
//!   configured templates.
//! - [`sibling_mapping`] — for every sibling, the text that replaces the
//!   placeholder carrying that sibling's name in any post body.
//!
//! All three are pure functions over the in-memory schedule; resolving twice
//! with no state change yields identical output.

use crate::config::NavigationConfig;
use crate::post::Post;
use crate::template;
use std::collections::HashMap;

/// Submission ids of the target's submitted neighbors, in schedule order.
///
/// One ordered scan tracking the preceding post: when the target is reached,
/// the preceding post supplies the previous id — but only if that post has a
/// non-empty `navigation_current`, which is how a post opts out of acting as
/// a navigation anchor. When the preceding post *is* the target, the current
/// post supplies the next id. Either side is `None` when the neighbor is
/// unsubmitted or the target sits at the corresponding end of the series.
pub fn neighbor_ids<'a>(
    target: &Post,
    posts: &'a [Post],
) -> (Option<&'a str>, Option<&'a str>) {
    let mut previous_id = None;
    let mut next_id = None;

    for pair in posts.windows(2) {
        let (last_post, post) = (&pair[0], &pair[1]);

        if post.name == target.name && !last_post.navigation_current.is_empty() {
            previous_id = last_post.submission_id.as_deref();
        } else if last_post.name == target.name {
            next_id = post.submission_id.as_deref();
        }
    }

    (previous_id, next_id)
}

/// Render the navigation snippet for a pair of neighbor ids.
///
/// The template is chosen by the presence matrix of the two ids; with neither
/// present the empty template is returned verbatim. `$previous_link` and
/// `$next_link` expand to `/{id}`; substitution is safe, so a template using
/// an unknown placeholder keeps it as literal text.
pub fn render_links(
    config: &NavigationConfig,
    previous_id: Option<&str>,
    next_id: Option<&str>,
) -> String {
    let template = match (previous_id, next_id) {
        (Some(_), Some(_)) => &config.template_both,
        (Some(_), None) => &config.template_previous,
        (None, Some(_)) => &config.template_next,
        (None, None) => return config.template_empty.clone(),
    };

    let mut mapping = HashMap::new();
    if let Some(id) = previous_id {
        mapping.insert("previous_link".to_string(), format!("/{id}"));
    }
    if let Some(id) = next_id {
        mapping.insert("next_link".to_string(), format!("/{id}"));
    }

    template::substitute(template, &mapping)
}

/// Per-sibling placeholder texts for rendering `target`'s body.
///
/// For each sibling: its own `navigation_current` when the sibling is the
/// target itself, its `navigation_submitted` with `$link` expanded to
/// `/{submission_id}` when submitted, and its `navigation_scheduled`
/// otherwise.
pub fn sibling_mapping(target: &Post, posts: &[Post]) -> HashMap<String, String> {
    let mut mapping = HashMap::new();

    for post in posts {
        let text = if post.name == target.name {
            post.navigation_current.clone()
        } else if let Some(id) = &post.submission_id {
            let link = HashMap::from([("link".to_string(), format!("/{id}"))]);
            template::substitute(&post.navigation_submitted, &link)
        } else {
            post.navigation_scheduled.clone()
        };

        mapping.insert(post.name.clone(), text);
    }

    mapping
}
