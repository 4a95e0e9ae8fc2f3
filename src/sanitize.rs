//! Fragment hygiene applied before markup is handed to the modal host.
//!
//! The server fragment is injected verbatim under `Trusted`; `Clean` strips
//! the constructs that would execute in the host page.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How to treat a fragment body before injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentPolicy {
    /// Byte-for-byte passthrough, the original behavior.
    Trusted,
    /// Strip `<script>` blocks and inline `on*=` handler attributes.
    Clean,
}

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());

static EVENT_HANDLER_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap());

pub fn apply_policy(policy: FragmentPolicy, fragment: &str) -> String {
    match policy {
        FragmentPolicy::Trusted => fragment.to_string(),
        FragmentPolicy::Clean => clean_fragment(fragment),
    }
}

/// Remove script blocks and inline event-handler attributes. All other
/// markup, including unknown or unbalanced tags, passes through untouched —
/// the fragment has no structure we are entitled to assume.
pub fn clean_fragment(fragment: &str) -> String {
    let without_scripts: Cow<str> = SCRIPT_BLOCK.replace_all(fragment, "");
    EVENT_HANDLER_ATTR
        .replace_all(&without_scripts, "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_is_verbatim() {
        let body = "<div onclick=\"x()\"><script>evil()</script></div>";
        assert_eq!(apply_policy(FragmentPolicy::Trusted, body), body);
    }

    #[test]
    fn clean_strips_script_blocks() {
        let body = "<div>before</div><script type=\"text/javascript\">alert(1)</script><div>after</div>";
        assert_eq!(
            clean_fragment(body),
            "<div>before</div><div>after</div>"
        );
    }

    #[test]
    fn clean_strips_inline_handlers() {
        let body = "<a href=\"#\" onclick=\"open()\" onmouseover='peek()'>Wallpaper 42</a>";
        assert_eq!(clean_fragment(body), "<a href=\"#\">Wallpaper 42</a>");
    }

    #[test]
    fn clean_preserves_ordinary_markup() {
        let body = "<div class=\"wallpaper-detail\"><img src=\"/img/42.jpg\"><p>Sunset &amp; sea</p></div>";
        assert_eq!(clean_fragment(body), body);
    }

    #[test]
    fn clean_handles_multiline_scripts() {
        let body = "<p>x</p><SCRIPT>\nwindow.location = 'http://elsewhere';\n</SCRIPT>";
        assert_eq!(clean_fragment(body), "<p>x</p>");
    }

    #[test]
    fn empty_fragment_stays_empty() {
        assert_eq!(clean_fragment(""), "");
    }
}
