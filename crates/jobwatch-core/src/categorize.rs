//! Keyword-based job categorization.

use indexmap::IndexMap;

/// Category returned when no keyword in the table matches.
pub const OTHER_CATEGORY: &str = "Other";

/// Ordered mapping of category label to keyword substrings.
///
/// Iteration order is the order categories were written in the sites file,
/// and that order decides ties: the first category with a matching keyword
/// wins.
pub type CategoryTable = IndexMap<String, Vec<String>>;

/// Assigns `title` to the first category in `table` that has a keyword
/// occurring in the title, compared case-insensitively.
///
/// Total and deterministic; returns [`OTHER_CATEGORY`] when nothing matches.
#[must_use]
pub fn categorize(title: &str, table: &CategoryTable) -> String {
    let lower_title = title.to_lowercase();

    table
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| lower_title.contains(&keyword.to_lowercase()))
        })
        .map_or_else(|| OTHER_CATEGORY.to_string(), |(category, _)| category.clone())
}
