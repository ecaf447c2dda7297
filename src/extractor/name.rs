//! Candidate name cleaning shared by both extraction tiers

use crate::extractor::profile::UNKNOWN_NAME;

/// Separators that mark the end of a name and the start of contact noise.
const NAME_SEPARATORS: [char; 9] = ['+', '#', '|', '@', '(', ')', ',', ':', ';'];

/// Address/location words that never belong in a name; everything from the
/// first occurrence on is dropped.
const NON_NAME_WORDS: [&str; 6] = ["apt", "street", "road", "nagar", "address", "india"];

/// Clean a raw name candidate down to a plausible person name, or the
/// "Unknown" sentinel when nothing plausible remains.
pub fn clean_name(raw: &str) -> String {
    if raw.trim().is_empty() || raw == UNKNOWN_NAME {
        return UNKNOWN_NAME.to_string();
    }

    // Everything after the first separator is contact info or an address.
    let mut name: String = match raw.find(&NAME_SEPARATORS[..]) {
        Some(idx) => raw[..idx].to_string(),
        None => raw.to_string(),
    };

    name.retain(|c| !c.is_ascii_digit());
    name = collapse_whitespace(&name);

    let mut lowered = name.to_lowercase();
    for word in NON_NAME_WORDS {
        if let Some(idx) = lowered.find(word) {
            name.truncate(idx);
            name = name.trim().to_string();
            lowered = name.to_lowercase();
        }
    }

    if name.is_empty() || letter_ratio(&name) < 0.8 {
        return UNKNOWN_NAME.to_string();
    }

    let name = title_case(&name);
    let capped: Vec<&str> = name.split_whitespace().take(5).collect();
    let name = capped.join(" ");

    if name.len() < 2 {
        UNKNOWN_NAME.to_string()
    } else {
        name
    }
}

/// Fraction of characters that are letters or spaces.
pub fn letter_ratio(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let letters = text.chars().filter(|c| c.is_alphabetic() || *c == ' ').count();
    letters as f64 / text.chars().count() as f64
}

/// Title-case each whitespace-separated token.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
