use std::{
	fs,
	io::{self, Seek, SeekFrom, Write},
	path::Path,
};

use tracing::debug;
use walkdir::WalkDir;

use super::Archiver;
use crate::global::{error::*, path, reg_entry::EntryKind};

impl Archiver {
	// Allocate a payload range for `archive_path` and write `data` into it immediately
	fn push(&mut self, data: &[u8], archive_path: &str, kind: EntryKind) -> InternalResult<()> {
		let qualified = path::to_qualified(archive_path);
		let start = self.registry.allocate(qualified.into(), data.len() as u64, kind)?;

		let stream = self.scratch.as_file_mut();
		stream.seek(SeekFrom::Start(start as u64))?;
		stream.write_all(data)?;

		Ok(())
	}

	/// Store `data` verbatim under `archive_path`
	pub fn add_bytes(&mut self, data: &[u8], archive_path: &str) -> InternalResult<()> {
		self.push(data, archive_path, EntryKind::Local)
	}

	/// Read `file` fully into memory and store its contents under `archive_path`
	pub fn add_file(&mut self, file: impl AsRef<Path>, archive_path: &str) -> InternalResult<()> {
		let data = fs::read(file)?;
		self.add_bytes(&data, archive_path)
	}

	/// Recursively store every file under `dir`, each mapped to `target` plus its
	/// path relative to `dir`. Files are added one at a time, in enumeration order.
	pub fn add_dir(&mut self, dir: impl AsRef<Path>, target: &str) -> InternalResult<()> {
		let dir = dir.as_ref();
		debug!(dir = %dir.display(), target, "packing folder");

		for entry in WalkDir::new(dir) {
			let entry = entry.map_err(io::Error::from)?;
			if !entry.file_type().is_file() {
				continue;
			}

			let relative = entry
				.path()
				.strip_prefix(dir)
				.map_err(|err| InternalError::OtherError(err.into()))?;

			let archive_path = format!("{}{}{}", target, crate::INTERNAL_SEPARATOR, relative.display());
			self.add_file(entry.path(), &archive_path)?;
		}

		Ok(())
	}

	/// Store the UTF-8 bytes of `url` itself under `archive_path`, tagged as a web
	/// reference. Nothing is downloaded until the entry is read.
	pub fn add_web(&mut self, url: &str, archive_path: &str) -> InternalResult<()> {
		debug!(url, archive_path, "adding web entry");
		self.push(url.as_bytes(), archive_path, EntryKind::Web)
	}

	/// Register one web entry per file found under `mirror`, a local copy of the
	/// remote folder structure. Only the mirror's *paths* are used to discover what
	/// exists remotely — its file contents are never read or stored.
	///
	/// Each entry's URL is `url` immediately followed by the slash-separated
	/// relative path, so `url` usually wants a trailing slash. Each entry's archive
	/// path is `target` plus the same relative path.
	pub fn add_web_dir(&mut self, url: &str, mirror: impl AsRef<Path>, target: &str) -> InternalResult<()> {
		let mirror = mirror.as_ref();
		debug!(url, mirror = %mirror.display(), target, "adding web folder");

		for entry in WalkDir::new(mirror) {
			let entry = entry.map_err(io::Error::from)?;
			if !entry.file_type().is_file() {
				continue;
			}

			let relative = entry
				.path()
				.strip_prefix(mirror)
				.map_err(|err| InternalError::OtherError(err.into()))?;

			let slashed = relative
				.iter()
				.map(|segment| segment.to_string_lossy())
				.collect::<Vec<_>>()
				.join("/");

			let remote = format!("{}{}", url, slashed);
			let archive_path = format!("{}{}{}", target, crate::INTERNAL_SEPARATOR, slashed);

			self.add_web(&remote, &archive_path)?;
		}

		Ok(())
	}
}
