//! Generated file-name scheme for voice notes
//!
//! Single definition of the auto-generated name format,
//! `voice-note-<timestamp_ms>-<suffix>.m4a`, shared by the save operation,
//! the catalog filter, and the duplicate-cleanup grouping.

use std::path::Path;

use crate::domain::error::EmptyNameError;
use crate::domain::note::Timestamp;

/// Prefix token of auto-generated note file names
pub const NOTE_PREFIX: &str = "voice-note";

/// The recognized audio extension (without the dot)
pub const AUDIO_EXTENSION: &str = "m4a";

/// Build the file name for a newly saved recording
pub fn generate(timestamp: Timestamp, suffix: &str) -> String {
    format!(
        "{}-{}-{}.{}",
        NOTE_PREFIX,
        timestamp.as_millis(),
        suffix,
        AUDIO_EXTENSION
    )
}

/// Fresh collision-resistant suffix: six lowercase hex characters
pub fn fresh_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// Extract the generated base pattern `voice-note-<digits>-<suffix>` from the
/// start of a file name. Anything trailing the suffix (including stray doubled
/// extensions left by interrupted saves) is ignored, so siblings like
/// `voice-note-5-xy.m4a` and `voice-note-5-xy.m4a.bak` share a base.
/// Returns `None` for names that do not follow the scheme (user-chosen names).
pub fn base_pattern(file_name: &str) -> Option<&str> {
    let rest = file_name.strip_prefix(NOTE_PREFIX)?.strip_prefix('-')?;

    let ts_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if ts_len == 0 {
        return None;
    }

    let rest = rest.get(ts_len..)?.strip_prefix('-')?;
    let suffix_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        .count();
    if suffix_len == 0 {
        return None;
    }

    // prefix + '-' + digits + '-' + suffix
    let base_len = NOTE_PREFIX.len() + 1 + ts_len + 1 + suffix_len;
    file_name.get(..base_len)
}

/// True when the file name carries the recognized audio extension
pub fn has_audio_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
}

/// Display name for a stored file: the audio extension stripped
pub fn display_name(file_name: &str) -> &str {
    if has_audio_extension(file_name) {
        &file_name[..file_name.len() - AUDIO_EXTENSION.len() - 1]
    } else {
        file_name
    }
}

/// Turn a user-chosen display name into a file name: trim, replace path
/// separators, and append the audio extension unless already present.
/// Rejects names that are empty after trimming.
pub fn sanitize_display_name(name: &str) -> Result<String, EmptyNameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EmptyNameError);
    }

    let safe: String = trimmed
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();

    if has_audio_extension(&safe) {
        Ok(safe)
    } else {
        Ok(format!("{}.{}", safe, AUDIO_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_follows_scheme() {
        let name = generate(Timestamp::from_millis(1700000000000), "ab12cd");
        assert_eq!(name, "voice-note-1700000000000-ab12cd.m4a");
    }

    #[test]
    fn generated_names_parse_back() {
        let name = generate(Timestamp::from_millis(1000), &fresh_suffix());
        assert!(base_pattern(&name).is_some());
        assert!(has_audio_extension(&name));
    }

    #[test]
    fn fresh_suffix_is_six_lowercase_hex() {
        let suffix = fresh_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn base_pattern_strips_extension() {
        assert_eq!(
            base_pattern("voice-note-1000-ab12cd.m4a"),
            Some("voice-note-1000-ab12cd")
        );
    }

    #[test]
    fn base_pattern_groups_stray_siblings() {
        // An interrupted save can leave a doubled extension behind
        assert_eq!(
            base_pattern("voice-note-5-xy.m4a.bak"),
            Some("voice-note-5-xy")
        );
        assert_eq!(base_pattern("voice-note-5-xy.m4a"), Some("voice-note-5-xy"));
    }

    #[test]
    fn base_pattern_rejects_user_names() {
        assert_eq!(base_pattern("groceries.m4a"), None);
        assert_eq!(base_pattern("voice-note.m4a"), None);
        assert_eq!(base_pattern("voice-note--abc.m4a"), None);
        assert_eq!(base_pattern("voice-note-123.m4a"), None);
    }

    #[test]
    fn audio_extension_is_case_insensitive() {
        assert!(has_audio_extension("a.m4a"));
        assert!(has_audio_extension("a.M4A"));
        assert!(!has_audio_extension("a.wav"));
        assert!(!has_audio_extension("m4a"));
    }

    #[test]
    fn display_name_strips_extension() {
        assert_eq!(display_name("groceries.m4a"), "groceries");
        assert_eq!(display_name("voice-note-1000-ab.m4a"), "voice-note-1000-ab");
        assert_eq!(display_name("no-extension"), "no-extension");
    }

    #[test]
    fn sanitize_replaces_path_separators() {
        assert_eq!(
            sanitize_display_name("a/b\\c").unwrap(),
            "a_b_c.m4a"
        );
    }

    #[test]
    fn sanitize_appends_extension_once() {
        assert_eq!(sanitize_display_name("memo").unwrap(), "memo.m4a");
        assert_eq!(sanitize_display_name("memo.m4a").unwrap(), "memo.m4a");
        // An inner dot is not the audio extension
        assert_eq!(sanitize_display_name("memo.v2").unwrap(), "memo.v2.m4a");
    }

    #[test]
    fn sanitize_rejects_empty() {
        assert!(sanitize_display_name("").is_err());
        assert!(sanitize_display_name("   ").is_err());
        assert!(sanitize_display_name("\t\n").is_err());
    }

    #[test]
    fn sanitize_trims_whitespace() {
        assert_eq!(sanitize_display_name("  memo  ").unwrap(), "memo.m4a");
    }
}
