//! Safe placeholder substitution for post body templates.
//!
//! Templates use `$name` or `${name}` placeholders, where a name starts with
//! a letter or underscore and continues with letters, digits, or underscores.
//! `$$` produces a literal `$`.
//!
//! Substitution is deliberately non-throwing: a placeholder with no entry in
//! the mapping — or a `$` followed by something that is not a name at all —
//! is left in the output verbatim. Post bodies routinely reference sibling
//! posts that are resolved at render time, and a typo or a not-yet-known name
//! should produce inspectable output rather than a failed run.

use std::collections::HashMap;

/// Substitute `$name` / `${name}` placeholders from `mapping`.
///
/// Unknown placeholders and malformed `$` sequences are copied through
/// unchanged; this function never fails.
pub fn substitute(template: &str, mapping: &HashMap<String, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if ch != '$' {
            output.push(ch);
            continue;
        }

        match chars.peek() {
            // `$$` escapes to a literal dollar sign.
            Some((_, '$')) => {
                chars.next();
                output.push('$');
            }
            Some((_, '{')) => {
                let rest = &template[index..];
                match braced_name(rest) {
                    Some((name, consumed)) => {
                        match mapping.get(name) {
                            Some(text) => output.push_str(text),
                            None => output.push_str(&rest[..consumed]),
                        }
                        // Skip past `${name}`.
                        for _ in 0..consumed - 1 {
                            chars.next();
                        }
                    }
                    None => output.push('$'),
                }
            }
            Some((next_index, next)) if is_name_start(*next) => {
                let rest = &template[*next_index..];
                let len = name_len(rest);
                let name = &rest[..len];
                match mapping.get(name) {
                    Some(text) => output.push_str(text),
                    None => {
                        output.push('$');
                        output.push_str(name);
                    }
                }
                // Placeholder names are ASCII, so bytes and chars coincide.
                for _ in 0..len {
                    chars.next();
                }
            }
            _ => output.push('$'),
        }
    }

    output
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Byte length of the placeholder name at the start of `text`.
fn name_len(text: &str) -> usize {
    text.find(|c| !is_name_char(c)).unwrap_or(text.len())
}

/// Parse `${name}` at the start of `text` (which begins at the `$`).
///
/// Returns the name and the total byte length of the `${name}` sequence, or
/// `None` if the braces do not enclose a well-formed name.
fn braced_name(text: &str) -> Option<(&str, usize)> {
    let inner = text.strip_prefix("${")?;
    let close = inner.find('}')?;
    let name = &inner[..close];
    let mut chars = name.chars();
    let first = chars.next()?;
    if !is_name_start(first) || !chars.all(is_name_char) {
        return None;
    }
    Some((name, close + 3))
}
