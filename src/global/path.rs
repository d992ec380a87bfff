use std::path::{Path, MAIN_SEPARATOR_STR};

use crate::{ALT_PATH_SEPARATOR, COMPRESSED_MARKER, INTERNAL_SEPARATOR, PATH_SEPARATOR};

/// Convert a path in platform notation into the internal qualified notation:
/// both recognized separators become [`INTERNAL_SEPARATOR`], and the result is
/// anchored with a leading separator (the root).
///
/// ```
/// assert_eq!(flatarch::path::to_qualified("sounds/footstep.wav"), "|sounds|footstep.wav");
/// assert_eq!(flatarch::path::to_qualified("sounds\\footstep.wav"), "|sounds|footstep.wav");
/// ```
pub fn to_qualified(path: &str) -> String {
	let mut qualified: String = path
		.chars()
		.map(|c| {
			if c == PATH_SEPARATOR || c == ALT_PATH_SEPARATOR {
				INTERNAL_SEPARATOR
			} else {
				c
			}
		})
		.collect();

	if !qualified.starts_with(INTERNAL_SEPARATOR) {
		qualified.insert(0, INTERNAL_SEPARATOR);
	}

	qualified
}

/// Convert a qualified path back into platform notation, dropping the root separator
pub fn to_native(path: &str) -> String {
	path.strip_prefix(INTERNAL_SEPARATOR)
		.unwrap_or(path)
		.replace(INTERNAL_SEPARATOR, MAIN_SEPARATOR_STR)
}

/// Everything before the last separator of a qualified path.
/// `None` for root-level entries: they have no containing folder.
pub fn parent(path: &str) -> Option<&str> {
	match path.rfind(INTERNAL_SEPARATOR) {
		Some(0) | None => None,
		Some(idx) => Some(&path[..idx]),
	}
}

/// The segment after the last separator of a qualified path
pub fn file_name(path: &str) -> &str {
	match path.rfind(INTERNAL_SEPARATOR) {
		Some(idx) => &path[idx + 1..],
		None => path,
	}
}

/// Nesting depth of a qualified path: the number of separator characters
pub fn depth(path: &str) -> usize {
	path.matches(INTERNAL_SEPARATOR).count()
}

/// Whether the filename convention marks `path` as a gzip-compressed archive:
/// either of the final two dot-separated filename segments equals [`COMPRESSED_MARKER`].
/// Trailing chunk numbers are ignored, so `packs.archc.3` is compressed while
/// `packs.arch.3` is not.
pub fn is_compressed_path(path: impl AsRef<Path>) -> bool {
	let Some(name) = path.as_ref().file_name().and_then(|n| n.to_str()) else {
		return false;
	};

	name.rsplit('.').take(2).any(|segment| segment == COMPRESSED_MARKER)
}
