use std::{
	fs::File,
	io::{self, Read, Seek, SeekFrom, Write},
	path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

mod add;
mod fetch;

use crate::global::{compressor::Compressor, error::*, path::is_compressed_path, registry::Registry};

// Size of the trailing footer holding the trailer's byte length
pub(crate) const FOOTER_SIZE: u64 = 4;

/// How an [`Archiver`] is released: throw the staged bytes away, or write the
/// index trailer and persist the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeMode {
	/// Close without persisting anything. The private scratch file is deleted
	Discard,
	/// Write the trailer and footer into the staged bytes, then replace the source file
	Commit {
		/// Re-encode the finished archive through the whole-file gzip transform on the way out.
		/// Pair this with a destination name carrying the compressed marker, see
		/// [`is_compressed_path`](crate::path::is_compressed_path)
		compress: bool,
	},
}

/// A single-use engine over one archive.
///
/// An `Archiver` stages all work in a private scratch file drawn from the
/// process-wide temporary storage area; whatever file it was created over or
/// opened from stays untouched until [`finalize`](Archiver::finalize) commits.
/// There is no reopening: committing or discarding consumes the engine.
///
/// All IO is synchronous and blocking. One instance must not be shared across
/// threads, distinct instances over distinct files are independent.
pub struct Archiver {
	pub(crate) scratch: NamedTempFile,
	pub(crate) registry: Registry,
	source: Option<PathBuf>,
}

impl Archiver {
	/// Stage a brand new, empty archive. `path` is not touched until commit time
	pub fn create(path: impl AsRef<Path>) -> InternalResult<Archiver> {
		let path = path.as_ref();
		debug!(path = %path.display(), "staging new archive");

		Ok(Archiver {
			scratch: NamedTempFile::new()?,
			registry: Registry::new(),
			source: Some(path.to_path_buf()),
		})
	}

	/// Open an existing archive file, for reading or appending.
	///
	/// The file is first copied into the private scratch file — decompressed on the
	/// way when the filename convention marks it compressed — so the original stays
	/// intact until an explicit commit replaces it.
	pub fn from_path(path: impl AsRef<Path>) -> InternalResult<Archiver> {
		let path = path.as_ref();
		debug!(path = %path.display(), "opening archive");

		let source = File::open(path)?;
		let mut archiver = Archiver::stage(source, is_compressed_path(path))?;
		archiver.source = Some(path.to_path_buf());

		Ok(archiver)
	}

	/// Open an archive from a bare read handle, e.g. one embedded in an executable.
	///
	/// No destination path is associated with the engine, so a later
	/// [`FinalizeMode::Commit`] fails with [`InternalError::NoCommitTargetError`].
	pub fn from_handle<T: Read>(handle: T, compressed: bool) -> InternalResult<Archiver> {
		Archiver::stage(handle, compressed)
	}

	// Copy (and possibly decompress) a source into a fresh scratch file, then
	// recover the index from the trailer
	fn stage<T: Read>(mut handle: T, compressed: bool) -> InternalResult<Archiver> {
		let mut scratch = NamedTempFile::new()?;

		if compressed {
			Compressor::new(handle).decompress(scratch.as_file_mut())?;
		} else {
			io::copy(&mut handle, scratch.as_file_mut())?;
		}

		let registry = Archiver::read_trailer(scratch.as_file_mut())?;

		Ok(Archiver {
			scratch,
			registry,
			source: None,
		})
	}

	// Locate and deserialize the index trailer. The 4 bytes before the terminating
	// padding byte hold the trailer's length; the trailer ends where the footer begins.
	fn read_trailer(stream: &mut File) -> InternalResult<Registry> {
		debug!("parsing index trailer");

		let length = stream.seek(SeekFrom::End(0))?;
		if length < FOOTER_SIZE + 1 {
			return Err(InternalError::CorruptArchiveError(format!(
				"source is {} bytes, too short to hold a footer",
				length
			)));
		}

		let footer_position = length - 1 - FOOTER_SIZE;
		stream.seek(SeekFrom::Start(footer_position))?;

		let mut footer = [0u8; FOOTER_SIZE as usize];
		stream.read_exact(&mut footer)?;

		let trailer_length = i32::from_le_bytes(footer);
		if trailer_length < 0 || trailer_length as u64 > footer_position {
			return Err(InternalError::CorruptArchiveError(format!(
				"footer declares a trailer of {} bytes, the stream cannot hold it",
				trailer_length
			)));
		}

		stream.seek(SeekFrom::Start(footer_position - trailer_length as u64))?;

		let mut trailer = vec![0u8; trailer_length as usize];
		stream.read_exact(&mut trailer)?;

		match Registry::from_handle(trailer.as_slice()) {
			Err(InternalError::IOError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => Err(
				InternalError::CorruptArchiveError("trailer ended mid-record".to_string()),
			),
			result => result,
		}
	}

	/// Release the engine.
	///
	/// [`FinalizeMode::Discard`] drops all staged work. [`FinalizeMode::Commit`]
	/// serializes the index as the trailer at `lastEnd + 1`, writes the 4-byte
	/// footer, extends the stream by the single terminating padding byte, and
	/// replaces the source file — either by moving the scratch file into place, or
	/// by re-encoding it through gzip when `compress` is set. The engine is
	/// consumed either way.
	pub fn finalize(self, mode: FinalizeMode) -> InternalResult<()> {
		let Archiver {
			mut scratch,
			registry,
			source,
		} = self;

		let FinalizeMode::Commit { compress } = mode else {
			debug!("discarding staged archive");
			return Ok(());
		};

		let Some(source) = source else {
			return Err(InternalError::NoCommitTargetError);
		};

		debug!(path = %source.display(), compress, "committing archive");

		let stream = scratch.as_file_mut();
		stream.seek(SeekFrom::Start(registry.next_start() as u64))?;

		let trailer = registry.to_bytes();
		stream.write_all(&trailer)?;
		stream.write_all(&(trailer.len() as u32).to_le_bytes())?;

		// Exactly one padding byte past the footer terminates the stream
		let position = stream.stream_position()?;
		stream.set_len(position + 1)?;
		stream.flush()?;

		if compress {
			stream.seek(SeekFrom::Start(0))?;

			let mut target = File::create(&source)?;
			Compressor::new(&mut *stream).compress(&mut target)?;
		} else {
			scratch
				.persist(&source)
				.map_err(|err| InternalError::IOError(err.error))?;
		}

		Ok(())
	}
}
