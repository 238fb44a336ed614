//! The post body renderer.
//!
//! Produces `body_rendered` from a post's raw template: every sibling post
//! gets a placeholder named after it (resolved through the navigation
//! module), plus one configured placeholder bound to the previous/next link
//! snippet. Substitution is safe — placeholders without a mapping stay in
//! the output as literal text, which keeps partial templates diagnosable.
//!
//! When thumbnail preparation is requested and the post asks for it, the
//! rendered markdown is additionally converted to the platform's rich-text
//! document. "No image found" is recoverable: the post is downgraded to a
//! plain markdown submission with a visible warning. Any other conversion
//! failure is fatal for the post and propagates with a remediation hint.

use crate::client::RichTextConverter;
use crate::config::NavigationConfig;
use crate::error::{Error, Result};
use crate::navigation;
use crate::output;
use crate::post::Post;
use crate::schedule::Schedule;
use crate::template;

const THUMBNAIL_HINT: &str =
    "To avoid further issues you can submit the post without an image by \
     setting the 'submit_with_thumbnail' option to false.";

/// Renders post bodies against the schedule they belong to.
pub struct PostRenderer<'a> {
    navigation: &'a NavigationConfig,
    converter: Option<&'a dyn RichTextConverter>,
}

impl<'a> PostRenderer<'a> {
    /// A renderer without a converter skips thumbnail preparation entirely
    /// (local preview has nothing to convert with).
    pub fn new(
        navigation: &'a NavigationConfig,
        converter: Option<&'a dyn RichTextConverter>,
    ) -> Self {
        Self {
            navigation,
            converter,
        }
    }

    /// Render the body of `schedule.posts[index]` in place.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds — the scheduler only hands out
    /// indices it found itself.
    pub fn prepare_post(
        &self,
        schedule: &mut Schedule,
        index: usize,
        prepare_thumbnail: bool,
    ) -> Result<()> {
        let target = &schedule.posts[index];
        tracing::debug!(post = %target.name, prepare_thumbnail, "post_prepare");

        let mut mapping = navigation::sibling_mapping(target, &schedule.posts);
        let (previous_id, next_id) = navigation::neighbor_ids(target, &schedule.posts);
        let snippet = navigation::render_links(self.navigation, previous_id, next_id);
        mapping.insert(self.navigation.placeholder.clone(), snippet);

        let body = template::substitute(&target.body_template, &mapping);

        let post = &mut schedule.posts[index];
        post.body_rendered = Some(body);

        if prepare_thumbnail && post.submit_with_thumbnail {
            self.prepare_thumbnail(post)?;
        }

        Ok(())
    }

    /// Convert the rendered markdown to a rich-text document so the platform
    /// generates a thumbnail.
    ///
    /// On "no image found" the post falls back to a plain submission
    /// (`submit_with_thumbnail` is cleared) and rendering continues. Other
    /// conversion failures propagate with a hint attached.
    pub fn prepare_thumbnail(&self, post: &mut Post) -> Result<()> {
        let Some(converter) = self.converter else {
            tracing::debug!(post = %post.name, "thumbnail_skip_no_converter");
            return Ok(());
        };

        let markdown = post.body_rendered.as_deref().unwrap_or(&post.body_template);
        tracing::debug!(post = %post.name, "post_convert");

        match converter.convert_to_richtext(markdown) {
            Ok(document) => {
                post.body_richtext = Some(document);
                Ok(())
            }
            Err(Error::ImageNotFound(message)) => {
                tracing::warn!(post = %post.name, message, "post_missing_image");
                post.submit_with_thumbnail = false;
                output::print_no_image_warning();
                Ok(())
            }
            Err(Error::Conversion { message, .. }) | Err(Error::Remote(message)) => {
                tracing::error!(post = %post.name, message, "post_convert_error");
                Err(Error::Conversion {
                    message,
                    hint: Some(THUMBNAIL_HINT.into()),
                })
            }
            Err(other) => Err(other),
        }
    }
}
