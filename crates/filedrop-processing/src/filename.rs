//! Filename derivation from storage URLs.

use filedrop_core::constants::{CATBOX_FILE_BASE_URL, DEFAULT_AVATAR_PATH};
use filedrop_core::{Config, ProviderKind};
use url::Url;

/// Last path segment of `url`, optionally with its extension stripped.
///
/// Falls back to a naive `/`-split when the input is not a parseable URL, so
/// malformed input yields a best-effort segment instead of panicking. Returns
/// `None` for empty input or a URL whose path ends in `/`.
pub fn extract_filename_from_url(url: &str, without_extension: bool) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .map(str::to_string),
        Err(_) => url.rsplit('/').next().map(str::to_string),
    };

    let filename = segment.filter(|s| !s.is_empty())?;

    if without_extension {
        // Strip the last `.`-suffix only when the dot is not the first
        // character, so dotfiles keep their name.
        return match filename.rfind('.') {
            Some(index) if index > 0 => Some(filename[..index].to_string()),
            _ => Some(filename),
        };
    }

    Some(filename)
}

/// True iff `url` parses as an absolute URL.
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Public URL for a stored object name, resolved against the active provider.
///
/// The sentinel name `default` maps to the bundled placeholder asset, and
/// names that are already absolute URLs pass through untouched.
pub fn public_file_url(name: &str, config: &Config) -> String {
    if name == "default" {
        return DEFAULT_AVATAR_PATH.to_string();
    }
    if name.starts_with("http") {
        return name.to_string();
    }

    match config.provider_kind() {
        Some(ProviderKind::S3) => format!(
            "{}{}",
            config.s3_public_base_url.as_deref().unwrap_or(""),
            name
        ),
        _ => format!("{}{}", CATBOX_FILE_BASE_URL, name),
    }
}
