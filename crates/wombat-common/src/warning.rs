//! Parser warnings with colored terminal output.
//!
//! Nothing here is global. The tokenizer and tree builder collect what they
//! accepted leniently into per-call lists; a caller who wants to see them
//! renders those lists with [`render_warnings`].

use std::collections::HashSet;

use owo_colors::OwoColorize;

/// Render one warning as a colored terminal line.
///
/// # Example
/// ```ignore
/// let line = render_warning("Tree Builder", "end tag </p> closed <div>");
/// ```
#[must_use]
pub fn render_warning(component: &str, message: &str) -> String {
    format!("[Wombat {component}] ⚠ {message}")
        .yellow()
        .to_string()
}

/// Render `messages` for `component`, skipping repeats. Lines keep the
/// order in which each message was first seen.
#[must_use]
pub fn render_warnings<I, S>(component: &str, messages: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    messages
        .into_iter()
        .filter(|message| seen.insert(message.as_ref().to_string()))
        .map(|message| render_warning(component, message.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_message_is_deduplicated_within_a_call() {
        let lines = render_warnings("Test", ["a", "b", "a"]);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[Wombat Test] ⚠ a"));
        assert!(lines[1].contains("⚠ b"));
    }

    #[test]
    fn test_calls_do_not_share_state() {
        let first = render_warnings("Test", ["same"]);
        let second = render_warnings("Test", ["same"]);
        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }
}
