//! Platform collaborator traits.
//!
//! The scheduling core never talks to the network itself: submission,
//! editing, wiki access, and markdown→rich-text conversion are consumed
//! through these traits, and a concrete client (HTTP, test double, dry run)
//! is supplied by the embedder. This is the seam that keeps the core pure
//! computation over in-memory data.
//!
//! [`RichTextConverter`] is split out of [`PlatformClient`] because the body
//! renderer only ever converts — giving it the narrowest possible dependency
//! keeps rendering testable without a full client.

use crate::error::Result;
use crate::post::Post;

/// Converts a markdown body into the platform's rich-text JSON document.
///
/// Submitting a rich-text document (rather than markdown) makes the platform
/// generate a preview thumbnail from the first image in the post.
///
/// Errors: `Error::ImageNotFound` when the body contains no image to build a
/// thumbnail from; `Error::Conversion` or `Error::Remote` for anything else.
pub trait RichTextConverter {
    fn convert_to_richtext(&self, markdown: &str) -> Result<serde_json::Value>;
}

/// The remote submission client.
///
/// `authorize` runs the platform's credential dance and must be called before
/// anything else; all later operations are read-mostly and take `&self`.
pub trait PlatformClient: RichTextConverter {
    /// Authenticate and return the authorized username.
    fn authorize(&mut self) -> Result<String>;

    /// Submit the post and return its remote identifier.
    ///
    /// Implementations submit `body_richtext` when it is prepared and
    /// `submit_with_thumbnail` is still set, and `body_rendered` markdown
    /// otherwise; `flair_id` is passed through when present.
    fn submit_post(&self, post: &Post) -> Result<String>;

    /// Replace the body of an already-submitted post.
    fn update_post(&self, submission_id: &str, body: &str) -> Result<()>;

    /// Fetch the markdown content of a community wiki page.
    fn read_wiki_page(&self, subreddit: &str, path: &str) -> Result<String>;

    /// Overwrite a community wiki page.
    fn write_wiki_page(&self, subreddit: &str, path: &str, content: &str, reason: &str)
    -> Result<()>;
}
