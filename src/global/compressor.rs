use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::error::*;

/// The whole-file gzip transform applied to archives using the compressed
/// filename convention. Wraps a read handle, encodes or decodes into a writer.
#[derive(Debug)]
pub struct Compressor<T: Read> {
	data: T,
}

impl<T: Read> Compressor<T> {
	/// Construct a new compressor over a read handle
	pub fn new(data: T) -> Compressor<T> {
		Compressor { data }
	}

	/// Encode everything in the handle into `output`. Returns the number of bytes consumed from the handle
	pub fn compress(&mut self, output: &mut dyn Write) -> InternalResult<u64> {
		let mut encoder = GzEncoder::new(output, Compression::default());
		let consumed = io::copy(&mut self.data, &mut encoder)?;
		encoder.try_finish()?;

		Ok(consumed)
	}

	/// Decode everything in the handle into `output`. Returns the number of bytes written out
	pub fn decompress(&mut self, output: &mut dyn Write) -> InternalResult<u64> {
		let mut decoder = GzDecoder::new(&mut self.data);
		io::copy(&mut decoder, output).map_err(InternalError::IOError)
	}
}
