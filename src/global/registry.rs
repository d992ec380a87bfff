use std::{collections::HashMap, io::Read, sync::Arc};

use super::error::*;
use super::path;
use super::reg_entry::{EntryKind, RegistryEntry};

/// The ordered path index of an archive.
///
/// Entries are kept in insertion order, the order their payload ranges were
/// allocated in, with a path-keyed map alongside for constant-time resolution.
/// Serialized, the registry is the archive's trailer: an entry count followed
/// by every record.
#[derive(Debug, Default)]
pub struct Registry {
	entries: Vec<RegistryEntry>,
	index: HashMap<Arc<str>, usize>,
}

impl Registry {
	pub(crate) fn new() -> Registry {
		Registry::default()
	}

	/// One past the highest allocated byte: where the next payload range, or the
	/// trailer, begins. The empty index behaves as if a range ended at -1, so the
	/// first allocation starts at 0.
	pub(crate) fn next_start(&self) -> u32 {
		self.entries.iter().map(|entry| entry.end + 1).max().unwrap_or(0)
	}

	/// Reserve a payload range of `size` bytes for `path` and record the entry.
	/// Returns the start offset the payload bytes belong at.
	///
	/// Ranges are handed out strictly append-only and are never reclaimed, which is
	/// the whole basis of the offset bookkeeping. Single-writer usage only.
	pub(crate) fn allocate(&mut self, path: Arc<str>, size: u64, kind: EntryKind) -> InternalResult<u32> {
		if self.index.contains_key(path.as_ref()) {
			return Err(InternalError::DuplicateEntryError(path.to_string()));
		}

		let start = self.next_start();
		let end = start as u64 + size;
		if end > crate::MAX_OFFSET as u64 {
			return Err(InternalError::OffsetOverflowError(end));
		}

		let entry = RegistryEntry {
			path: path.clone(),
			start,
			end: end as u32,
			kind,
		};

		self.index.insert(path, self.entries.len());
		self.entries.push(entry);

		Ok(start)
	}

	/// Exact-match lookup by qualified path
	pub(crate) fn resolve(&self, path: &str) -> Option<&RegistryEntry> {
		self.index.get(path).map(|idx| &self.entries[*idx])
	}

	/// Every entry, in insertion order
	pub(crate) fn entries(&self) -> &[RegistryEntry] {
		&self.entries
	}

	/// Every folder implied by the stored paths, in discovery order.
	///
	/// Walks each entry's parent chain upward and stops at the first ancestor that
	/// was already recorded. The early stop assumes that ancestor's own parents were
	/// recorded when it was first seen — folders only ever accumulate here, so the
	/// assumption holds, but it is load-bearing: do not reorder this walk.
	pub(crate) fn folders(&self) -> Vec<String> {
		let mut folders: Vec<&str> = Vec::new();

		for entry in &self.entries {
			let mut dir = path::parent(&entry.path);

			while let Some(d) = dir {
				if folders.contains(&d) {
					break;
				}

				folders.push(d);
				dir = path::parent(d);
			}
		}

		folders.into_iter().map(String::from).collect()
	}

	/// Qualified paths of the entries inside `prefix`, in insertion order.
	///
	/// An empty prefix means the archive root and matches everything. Containment is
	/// segment-aware: stripping `prefix` must leave nothing, or a remainder starting
	/// with the separator — `|alpha-extra` is not inside `|alpha`. With `recursive`
	/// off, only paths one segment deeper than `prefix` are returned.
	pub(crate) fn children(&self, prefix: &str, recursive: bool) -> Vec<&str> {
		let within = |entry: &RegistryEntry| -> bool {
			if prefix.is_empty() {
				return true;
			}

			match entry.path.strip_prefix(prefix) {
				Some(rest) => rest.is_empty() || rest.starts_with(crate::INTERNAL_SEPARATOR),
				None => false,
			}
		};

		let target_depth = path::depth(prefix) + 1;

		self.entries
			.iter()
			.filter(|entry| within(entry))
			.filter(|entry| recursive || path::depth(&entry.path) == target_depth)
			.map(|entry| entry.path.as_ref())
			.collect()
	}

	/// Serializes the whole index into trailer form: a little-endian entry count,
	/// then every record in insertion order
	pub(crate) fn to_bytes(&self) -> Vec<u8> {
		let size = 4 + self.entries.iter().map(RegistryEntry::serialized_size).sum::<usize>();
		let mut buffer = Vec::with_capacity(size);

		buffer.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
		for entry in &self.entries {
			buffer.extend_from_slice(&entry.to_bytes());
		}

		buffer
	}

	/// Reads an entry count and that many records from the handle, rebuilding the index.
	/// Foreign archives may hold records sharing one path: all of them are retained in
	/// order, lookups resolve to the first.
	pub(crate) fn from_handle<T: Read>(mut handle: T) -> InternalResult<Registry> {
		let mut count_bytes = [0u8; 4];
		handle.read_exact(&mut count_bytes)?;
		let count = u32::from_le_bytes(count_bytes);

		let mut registry = Registry::new();
		for _ in 0..count {
			let entry = RegistryEntry::from_handle(&mut handle)?;

			registry.index.entry(entry.path.clone()).or_insert(registry.entries.len());
			registry.entries.push(entry);
		}

		Ok(registry)
	}
}
