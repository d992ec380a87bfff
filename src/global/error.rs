use std::{error, io};
use thiserror::Error;

/// Internal `Result` type alias used by `flatarch`. Basically equal to: `Result<T, InternalError>`
pub type InternalResult<T = ()> = Result<T, InternalError>;

/// All errors manifestable within `flatarch` collected into a neat enum
#[derive(Debug, Error)]
pub enum InternalError {
	/// Generic Error
	#[error("[FlatarchError::GenericError] {0}")]
	OtherError(Box<dyn error::Error + Send + Sync>),
	/// thin wrapper over [io::Error](std::io::Error), captures all IO errors
	#[error("[FlatarchError::IOError] {0}")]
	IOError(#[from] io::Error),
	/// no entry with the given qualified path exists in the index
	#[error("[FlatarchError::MissingEntryError] Entry not found: {0}")]
	MissingEntryError(String),
	/// the source is truncated, or its footer/trailer accounting is inconsistent, hinting at corruption or an incompatible source
	#[error("[FlatarchError::CorruptArchiveError] Corrupt archive source: {0}")]
	CorruptArchiveError(String),
	/// two entries found with the same qualified path, each entry should have a unique path
	#[error("[FlatarchError::DuplicateEntryError] An entry with the path: {0} already exists. Consider changing the path to prevent collisions")]
	DuplicateEntryError(String),
	/// an allocation would place payload bytes beyond the 32-bit offset range
	#[error("[FlatarchError::OffsetOverflowError] Allocation would end at byte {0}, beyond the 32-bit offset cap")]
	OffsetOverflowError(u64),
	/// a web entry's HTTP fetch failed, the enclosing operation is aborted
	#[error("[FlatarchError::RemoteFetchError] {0}")]
	RemoteFetchError(#[from] reqwest::Error),
	/// a commit was requested on an archiver opened from a bare stream, so no destination path is known
	#[error("[FlatarchError::NoCommitTargetError] Cannot commit an archive opened from a stream, there is no destination path")]
	NoCommitTargetError,
}
