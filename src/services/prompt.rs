use std::{fs, path::Path};

use crate::error::{AppError, AppResult};

const SYSTEM_TAG: &str = "[SYSTEM]";
const PROFILE_MARKER: &str = "[USER WATCH PROFILE]";

/// System instruction and viewer profile sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Reads the prompt template from disk
pub fn load_prompt(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|e| {
        AppError::InvalidPrompt(format!("cannot read {}: {}", path.display(), e))
    })
}

/// Splits a template into its system instruction and its viewer profile.
///
/// The system part is everything before `[USER WATCH PROFILE]` with the
/// `[SYSTEM]` tag dropped. The user part starts at the marker itself.
pub fn split_prompt(text: &str) -> AppResult<PromptPair> {
    let (system, profile) = text.split_once(PROFILE_MARKER).ok_or_else(|| {
        AppError::InvalidPrompt(format!("template has no {} section", PROFILE_MARKER))
    })?;

    Ok(PromptPair {
        system: system.replace(SYSTEM_TAG, "").trim().to_string(),
        user: format!("{}{}", PROFILE_MARKER, profile),
    })
}

/// First `max_chars` characters of `text`, for console previews
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
