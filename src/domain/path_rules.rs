use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

use crate::constants::ALLOWED_IMAGE_EXTENSIONS;

// `.` is deliberately absent, so `..` can never pass.
static SUBPATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_\-/\\]+$").expect("sub-path pattern is valid")
});

/// Whether a client-chosen sub-path may be used under a storage root.
pub fn is_valid_subpath(subpath: &str) -> bool {
    SUBPATH_PATTERN.is_match(subpath)
}

/// Extension of the last path element, including the leading dot.
/// Returns an empty string when the name has none.
pub fn extension_of(name: &str) -> &str {
    for (idx, ch) in name.char_indices().rev() {
        match ch {
            '/' | '\\' => break,
            '.' => return &name[idx..],
            _ => {}
        }
    }
    ""
}

/// Case-sensitive check against the image allow-list.
pub fn is_allowed_image(name: &str) -> bool {
    ALLOWED_IMAGE_EXTENSIONS.contains(&extension_of(name))
}

/// A bare file name: non-empty, no separators, not `.` or `..`.
pub fn is_single_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Last segment of a filename as sent by a client, which may carry a path.
/// Trailing separators are ignored, so `dir/` yields `dir`.
pub fn client_file_name(raw: &str) -> &str {
    let trimmed = raw.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

/// Turns a URL path into a path relative to a storage root.
/// Anything that would step outside the root yields `None`.
pub fn relative_request_path(request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            _ => return None,
        }
    }

    Some(relative)
}
