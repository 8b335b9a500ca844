//!
//! src/title.rs  Andrew Belles  Oct 16th, 2026
//!
//! Turns a display title into the `t=` token OMDb expects
//!

/// "Toy Story" -> "toy+story". Nothing else is escaped, so titles with
/// '&' or '%' reach the query string as-is
pub fn format_title(title: &str) -> String {
    title.to_lowercase()
        .split(' ')
        .collect::<Vec<_>>()
        .join("+")
}
