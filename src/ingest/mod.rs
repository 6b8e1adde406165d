// src/ingest/mod.rs
pub mod extract;
pub mod http;
pub mod types;

pub use extract::AnnouncementExtractor;
pub use http::HttpPageSource;
pub use types::{Announcement, PageSource};

use once_cell::sync::OnceCell;
use regex::Regex;

/// Collapse whitespace runs (newlines from nested markup, nbsp) and trim.
pub fn normalize_text(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(s, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_collapses_inner_ws_and_trims() {
        let s = "\n   CPH\u{00A0} electrical\n\t shutdown   ";
        assert_eq!(normalize_text(s), "CPH electrical shutdown");
    }

    #[test]
    fn normalize_text_keeps_case_and_punctuation() {
        assert_eq!(normalize_text(" Mar. 3: CPH! "), "Mar. 3: CPH!");
    }
}
