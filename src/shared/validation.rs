use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches any string containing at least one non-whitespace character
    /// - Valid: "Ada", " Ada "
    /// - Invalid: "", "   "
    pub static ref NOT_BLANK_REGEX: Regex = Regex::new(r"\S").unwrap();

    /// Accepted UI themes
    /// - Valid: "light", "dark", "system"
    /// - Invalid: "Light", "blue", ""
    pub static ref THEME_REGEX: Regex = Regex::new(r"^(light|dark|system)$").unwrap();
}

/// Flatten `validator` errors into one message per failing field
pub fn collect_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages
}
