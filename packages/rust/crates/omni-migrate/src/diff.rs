//! Unified diffs of migrated source, as printed by `--diff` and previews.

use similar::TextDiff;

/// Lines of unchanged context around each hunk.
const CONTEXT_LINES: usize = 3;

/// Render a unified diff of `original` against `modified`.
///
/// Both sides of the `---`/`+++` header carry `label` (usually the file
/// path), since migration rewrites a file in place. Identical inputs give an
/// empty string rather than a header with no hunks.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str, label: &str) -> String {
    if original == modified {
        return String::new();
    }

    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(label, label)
        .to_string()
}
