use std::{fmt, io::Read, str, sync::Arc};
use super::error::*;

/// What the payload bytes of an entry are: stored content, or a reference resolved over the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	/// The payload bytes are the stored content itself
	Local,
	/// The payload bytes are a UTF-8 URL, downloaded only when the entry is read
	Web,
}

impl EntryKind {
	pub(crate) fn to_bits(self) -> u32 {
		match self {
			EntryKind::Local => 0,
			EntryKind::Web => 1,
		}
	}

	pub(crate) fn from_bits(bits: u32) -> InternalResult<EntryKind> {
		match bits {
			0 => Ok(EntryKind::Local),
			1 => Ok(EntryKind::Web),
			unknown => Err(InternalError::CorruptArchiveError(format!(
				"unknown entry kind: {}",
				unknown
			))),
		}
	}
}

/// Stand-alone metadata for one archive entry. This can be inspected without reading any payload bytes.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
	/// The qualified path under which the payload is stored
	pub path: Arc<str>,
	/// The first payload byte, as an offset from the beginning of the archive
	pub start: u32,
	/// One past the last payload byte
	pub end: u32,
	/// Whether the payload is stored content or a lazy web reference
	pub kind: EntryKind,
}

impl RegistryEntry {
	// 4(start) + 4(end) + 4(kind) + ..Dynamic. The record length field itself is not counted
	pub(crate) const FIXED_SIZE: usize = 12;

	/// Number of payload bytes the entry spans
	#[inline(always)]
	pub fn size(&self) -> usize {
		(self.end - self.start) as usize
	}

	// Size of this entry's full binary encoding, including the leading record length field
	pub(crate) fn serialized_size(&self) -> usize {
		4 + Self::FIXED_SIZE + self.path.len()
	}

	/// Given a read handle, will proceed to read and parse bytes into a [`RegistryEntry`] struct. (de-serialization)
	pub(crate) fn from_handle<T: Read>(mut handle: T) -> InternalResult<RegistryEntry> {
		let mut length_bytes = [0u8; 4];
		handle.read_exact(&mut length_bytes)?;

		let record_length = u32::from_le_bytes(length_bytes) as usize;
		if record_length < RegistryEntry::FIXED_SIZE {
			return Err(InternalError::CorruptArchiveError(format!(
				"entry record of {} bytes is shorter than its fixed fields",
				record_length
			)));
		}

		/* The data after this is dynamically sized, read exactly what the length field declared */
		let mut record = vec![0u8; record_length];
		handle.read_exact(&mut record)?;

		let start = u32::from_le_bytes(record[0..4].try_into().unwrap());
		let end = u32::from_le_bytes(record[4..8].try_into().unwrap());
		let kind = EntryKind::from_bits(u32::from_le_bytes(record[8..12].try_into().unwrap()))?;

		let path = str::from_utf8(&record[RegistryEntry::FIXED_SIZE..]).map_err(|err| {
			InternalError::CorruptArchiveError(format!("entry path is not valid UTF-8: {}", err))
		})?;

		if end < start {
			return Err(InternalError::CorruptArchiveError(format!(
				"entry {} ends at {} before its start {}",
				path, end, start
			)));
		}

		if end > crate::MAX_OFFSET {
			return Err(InternalError::CorruptArchiveError(format!(
				"entry {} ends beyond the 32-bit offset cap",
				path
			)));
		}

		Ok(RegistryEntry {
			path: Arc::from(path),
			start,
			end,
			kind,
		})
	}

	/// Serializes a [`RegistryEntry`] struct into an array of bytes
	pub(crate) fn to_bytes(&self) -> Vec<u8> {
		let path = self.path.as_bytes();
		let mut buffer = Vec::with_capacity(self.serialized_size());

		buffer.extend_from_slice(&((RegistryEntry::FIXED_SIZE + path.len()) as u32).to_le_bytes());
		buffer.extend_from_slice(&self.start.to_le_bytes());
		buffer.extend_from_slice(&self.end.to_le_bytes());
		buffer.extend_from_slice(&self.kind.to_bits().to_le_bytes());
		buffer.extend_from_slice(path);

		buffer
	}
}

impl fmt::Display for RegistryEntry {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"[RegistryEntry] path: {}, start: {}, end: {}, kind: {:?}",
			self.path, self.start, self.end, self.kind
		)
	}
}
