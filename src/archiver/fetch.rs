use std::{
	fs,
	io::{Read, Seek, SeekFrom},
	path::Path,
};

use tracing::{debug, info};

use super::Archiver;
use crate::global::{
	error::*,
	path,
	reg_entry::{EntryKind, RegistryEntry},
};

impl Archiver {
	// Read an entry's raw byte range out of the payload region
	fn read_span(&mut self, entry: &RegistryEntry) -> InternalResult<Vec<u8>> {
		let size = entry.size();
		let mut buffer = Vec::with_capacity(size);

		let stream = self.scratch.as_file_mut();
		stream.seek(SeekFrom::Start(entry.start as u64))?;
		stream.take(size as u64).read_to_end(&mut buffer)?;

		if buffer.len() != size {
			return Err(InternalError::CorruptArchiveError(format!(
				"entry {} spans {} bytes but the payload region ends early",
				entry.path, size
			)));
		}

		Ok(buffer)
	}

	fn resolve_required(&self, qualified: &str) -> InternalResult<RegistryEntry> {
		self.registry
			.resolve(qualified)
			.cloned()
			.ok_or_else(|| InternalError::MissingEntryError(qualified.to_string()))
	}

	/// Fetch the content stored under `archive_path`.
	///
	/// Local entries return their payload bytes verbatim. Web entries treat their
	/// payload as a URL and resolve it with one blocking GET — no retry, no caching,
	/// no timeout — and a non-success status or transport failure fails the call.
	pub fn fetch(&mut self, archive_path: &str) -> InternalResult<Vec<u8>> {
		let qualified = path::to_qualified(archive_path);
		self.fetch_qualified(&qualified)
	}

	pub(crate) fn fetch_qualified(&mut self, qualified: &str) -> InternalResult<Vec<u8>> {
		let entry = self.resolve_required(qualified)?;
		let raw = self.read_span(&entry)?;

		match entry.kind {
			EntryKind::Local => Ok(raw),
			EntryKind::Web => {
				let url = String::from_utf8(raw).map_err(|err| {
					InternalError::CorruptArchiveError(format!(
						"web entry {} holds a non-UTF-8 url: {}",
						qualified, err
					))
				})?;

				debug!(url, "downloading web entry");

				let response = reqwest::blocking::Client::builder()
					.timeout(None)
					.build()?
					.get(&url)
					.send()?
					.error_for_status()?;

				Ok(response.bytes()?.to_vec())
			},
		}
	}

	/// The verbatim payload bytes at `archive_path`'s range, skipping web
	/// resolution. For a web entry this is the stored URL string.
	pub fn fetch_raw(&mut self, archive_path: &str) -> InternalResult<Vec<u8>> {
		let qualified = path::to_qualified(archive_path);
		let entry = self.resolve_required(&qualified)?;

		self.read_span(&entry)
	}

	/// Stand-alone metadata for the entry at `archive_path`, without touching any
	/// payload bytes. `None` if no such entry exists.
	pub fn fetch_entry(&self, archive_path: &str) -> Option<RegistryEntry> {
		self.registry.resolve(&path::to_qualified(archive_path)).cloned()
	}

	/// Every entry in insertion order
	pub fn entries(&self) -> &[RegistryEntry] {
		self.registry.entries()
	}

	/// Paths stored under `folder`, converted to platform notation, in insertion
	/// order. `""` (or the bare root separator) lists from the archive root. With
	/// `recursive` off, only immediate children are returned.
	pub fn children(&self, folder: &str, recursive: bool) -> Vec<String> {
		let qualified = path::to_qualified(folder);

		// the bare root separator means the archive root
		let prefix = if qualified.len() == 1 { "" } else { qualified.as_str() };

		self.registry
			.children(prefix, recursive)
			.into_iter()
			.map(path::to_native)
			.collect()
	}

	/// Recreate the archive's tree under `target`.
	///
	/// Folders are created first, parents before children, then every entry is
	/// fetched and written in turn. The first failing entry (a web fetch, say)
	/// aborts the rest; files already written stay on disk, there is no rollback.
	pub fn extract(&mut self, target: impl AsRef<Path>) -> InternalResult<()> {
		let target = target.as_ref();
		info!(target = %target.display(), "extracting archive");

		fs::create_dir_all(target)?;

		let mut folders = self.registry.folders();
		folders.sort_by_key(|folder| path::depth(folder));

		for folder in &folders {
			let dir = target.join(path::to_native(folder));
			if !dir.exists() {
				fs::create_dir_all(&dir)?;
			}
		}

		let files: Vec<String> = self
			.registry
			.children("", true)
			.into_iter()
			.map(String::from)
			.collect();

		debug!(count = files.len(), "extracting entries");

		for qualified in files {
			let data = self.fetch_qualified(&qualified)?;
			fs::write(target.join(path::to_native(&qualified)), data)?;
		}

		Ok(())
	}
}
