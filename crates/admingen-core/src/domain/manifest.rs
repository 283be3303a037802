//! Shared import-manifest merging.
//!
//! Generated controllers pull their common imports from one shared
//! manifest file (`prelude.rs` in the output tree). The file may already
//! exist — written by a previous batch, or touched by hand — so merging is
//! an explicit read-modify-write over an append-only line set:
//!
//! - a required directive is appended only when no existing line already
//!   satisfies it under a normalized match;
//! - existing lines are never removed or reordered, whatever they contain;
//! - merging the same required set twice is a byte-identical no-op.
//!
//! Idempotence is a tested contract here, not an emergent property.
//!
//! The manifest is the only cross-entity shared mutable resource in a
//! batch. Concurrent batches over the same output tree must serialize the
//! read-modify-write externally; the merger itself takes no locks.

/// An ordered sequence of distinct directive lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportManifest {
    lines: Vec<String>,
}

impl ImportManifest {
    /// Empty manifest (no file existed yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest loaded from an existing file's lines. Lines are kept
    /// verbatim — including blanks and comments — so a rewrite never
    /// clobbers what a human added.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Merge required directives, appending only the ones no existing
    /// line satisfies. Returns the number of lines appended.
    pub fn merge<'a, I>(&mut self, required: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut appended = 0;
        for directive in required {
            let satisfied = self
                .lines
                .iter()
                .any(|line| normalize(line) == normalize(directive));
            if !satisfied {
                self.lines.push(directive.trim_end().to_string());
                appended += 1;
            }
        }
        appended
    }

    /// Render back to file content. A trailing newline keeps the file
    /// append-friendly for the next merge.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Normalized form used for the "already satisfied" check:
/// whitespace-insensitive (interior runs collapse to one space) and
/// trailing-punctuation-insensitive (`;` stripped).
fn normalize(line: &str) -> String {
    line.trim()
        .trim_end_matches(';')
        .trim_end()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_into_empty_appends_everything() {
        let mut m = ImportManifest::new();
        let n = m.merge(["pub use axum::Router;", "pub use serde::Deserialize;"]);
        assert_eq!(n, 2);
        assert_eq!(m.lines().len(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let required = [
            "pub use axum::Router;",
            "pub use serde::Deserialize;",
            "pub use crate::models::Order;",
        ];
        let mut m = ImportManifest::new();
        m.merge(required);
        let first = m.render();

        let appended = m.merge(required);
        assert_eq!(appended, 0);
        assert_eq!(m.render(), first, "re-merge must be byte-identical");
    }

    #[test]
    fn merge_on_reparsed_output_is_a_no_op() {
        let required = ["pub use axum::Router;", "pub use crate::db::Db;"];
        let mut m = ImportManifest::new();
        m.merge(required);
        let rendered = m.render();

        // Simulate the next batch: read the file back, merge again.
        let mut next = ImportManifest::from_lines(rendered.lines());
        assert_eq!(next.merge(required), 0);
        assert_eq!(next.render(), rendered);
    }

    #[test]
    fn whitespace_variants_satisfy_the_requirement() {
        let mut m = ImportManifest::from_lines(["pub  use   axum::Router ;"]);
        assert_eq!(m.merge(["pub use axum::Router;"]), 0);
    }

    #[test]
    fn missing_trailing_semicolon_still_satisfies() {
        let mut m = ImportManifest::from_lines(["pub use axum::Router"]);
        assert_eq!(m.merge(["pub use axum::Router;"]), 0);
    }

    #[test]
    fn unrelated_existing_lines_are_preserved_in_order() {
        let mut m = ImportManifest::from_lines([
            "// hand-written header",
            "pub use my_app::custom::Thing;",
            "",
        ]);
        m.merge(["pub use axum::Router;"]);
        assert_eq!(
            m.lines(),
            &[
                "// hand-written header".to_string(),
                "pub use my_app::custom::Thing;".to_string(),
                "".to_string(),
                "pub use axum::Router;".to_string(),
            ]
        );
    }

    #[test]
    fn merge_never_removes_lines() {
        let mut m = ImportManifest::from_lines(["pub use something::Stale;"]);
        m.merge(["pub use axum::Router;"]);
        assert!(m.lines().iter().any(|l| l.contains("Stale")));
    }
}
