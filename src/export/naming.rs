use super::ExportKind;

/// Name used when the theme has none.
pub const DEFAULT_STEM: &str = "presentation";

/// Characters a file name cannot carry on common platforms.
fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// File stem from a theme name: every run of whitespace, path separators or other characters
/// not allowed in file names becomes one `_`. The stem never contains a path separator.
pub fn file_stem(theme_name: &str) -> String {
    if theme_name.is_empty() {
        return DEFAULT_STEM.to_owned();
    }
    let mut stem = String::with_capacity(theme_name.len());
    let mut in_space = false;
    for c in theme_name.chars() {
        if is_separator(c) {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    stem
}

/// Download name for an export of `kind`, e.g. `Ocean_Breeze.pdf`.
pub fn file_name(theme_name: &str, kind: ExportKind) -> String {
    format!("{}.{}", file_stem(theme_name), kind.extension())
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
