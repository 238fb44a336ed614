//! # Postline
//!
//! A scheduler for series of text posts. You describe the whole series — one
//! discussion thread per episode, say — in a TOML schedule, and postline
//! submits each post at its scheduled time, keeping the posts linked to each
//! other as the series progresses.
//!
//! # Architecture: Pure Core, Traits at the Edges
//!
//! The scheduling core is ordinary computation over in-memory data. Every
//! interaction with the outside world goes through a trait:
//!
//! ```text
//! ScheduleStorage   where the schedule lives (local file, community wiki)
//! PlatformClient    submission, editing, wiki access
//! RichTextConverter markdown → rich-text documents (thumbnail support)
//! WaitUntil         blocking until the scheduled time
//! ```
//!
//! This separation exists for two reasons:
//!
//! - **Testability**: the whole run loop — load, wait, submit, relink — runs
//!   end to end against in-memory doubles.
//! - **Swappable edges**: a dry-run client or a different storage backend is
//!   a trait impl, not a fork of the core.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`post`] | The [`post::Post`] entity: identity, timing, body state |
//! | [`schedule`] | An ordered, uniquely-named series of posts |
//! | [`template`] | `$name` placeholder substitution (unknown names stay literal) |
//! | [`navigation`] | Previous/next links and sibling cross-references |
//! | [`renderer`] | Renders post bodies; optional rich-text conversion |
//! | [`storage`] | Schedule persistence — file and wiki backends |
//! | [`scheduler`] | Which post is due next, which need their links refreshed |
//! | [`timer`] | Tick-based countdown with cooperative cancellation |
//! | [`client`] | Platform collaborator traits |
//! | [`app`] | The submission run loop |
//! | [`token`] | Refresh token persistence between runs |
//! | [`config`] | `postline.toml` loading and validation |
//! | [`error`] | The crate-wide error taxonomy, with operator hints |
//! | [`output`] | CLI display formatting |
//!
//! # Design Decisions
//!
//! ## Safe Substitution
//!
//! Post bodies are plain markdown with `$name` placeholders. Substitution
//! never fails: a placeholder with no value stays in the output verbatim.
//! A schedule is written once and rendered many times over weeks — a typo'd
//! reference should show up in a preview, not abort a 3 a.m. submission.
//!
//! ## The Schedule File Is the Database
//!
//! There is no state beyond the schedule document itself. Submission ids are
//! merged back into the stored TOML field by field, so keys this crate does
//! not model survive every save (the document is re-serialized, so comments
//! do not). A crashed run resumes by re-reading the same file.
//!
//! ## Past-Due Posts Are Skipped
//!
//! A post whose slot has passed is not submitted late by default — a tool
//! that was down for a week should not flood the community on restart. The
//! `submit_past_due` option restores catch-up submission deliberately.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod navigation;
pub mod output;
pub mod post;
pub mod renderer;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod template;
pub mod timer;
pub mod token;

#[cfg(test)]
pub(crate) mod test_helpers;
