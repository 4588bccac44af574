/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Cleaned cell value, with blank cells treated as absent.
pub fn clean_cell(raw: Option<&str>) -> Option<String> {
    raw.map(clean_str).filter(|s| !s.is_empty())
}

/// Title-case the first letter of every whitespace-separated word and
/// lower-case the rest. Whitespace runs are kept as they are.
pub fn proper_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for c in raw.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            // Title case: 'ß' upper-cases to "SS" but starts a word as "Ss".
            let mut upper = c.to_uppercase();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
