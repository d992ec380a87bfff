#![allow(clippy::or_fun_call)]
#![deny(missing_docs)]

/*!
A flat single-file archive container, in pure Rust.

An archive is a payload region of raw byte ranges, a serialized path index
(the *trailer*) written once at the end, a 4-byte *footer* giving the
trailer's length so it can be located by seeking backward from the end of the
stream, and one terminating padding byte. Entries live under a `|`-separated,
root-anchored qualified-path namespace and are either **local** (the payload
is the stored content) or **web** (the payload is a URL, downloaded only when
the entry is read). Whole archives may be gzip-compressed, signalled by the
filename convention: `assets.arch` is plain, `assets.archc` is compressed.

### 🗜️ Show me some code _then!_

```
use flatarch::prelude::*;

let dir = tempfile::tempdir().unwrap();
let target = dir.path().join("assets.arch");

// everything is staged in a private scratch file until the commit
let mut archiver = Archiver::create(&target).unwrap();
archiver.add_bytes(b"fn main() {}", "src/main.rs").unwrap();
archiver.add_web("http://mirror.example/pack.bin", "blobs/pack.bin").unwrap();
archiver.finalize(FinalizeMode::Commit { compress: false }).unwrap();

// roundtrip
let mut archiver = Archiver::from_path(&target).unwrap();
let data = archiver.fetch("src/main.rs").unwrap();
assert_eq!(data.as_slice(), b"fn main() {}");
```
*/


pub(crate) mod archiver;
pub(crate) mod global;

/// Separator used inside qualified archive paths; every qualified path begins with it
pub const INTERNAL_SEPARATOR: char = '|';

/// Platform path notation recognized at the API boundary
pub const PATH_SEPARATOR: char = '/';

/// Alternate platform path notation recognized at the API boundary
pub const ALT_PATH_SEPARATOR: char = '\\';

/// Filename segment marking an uncompressed archive: `assets.arch`
pub const ARCHIVE_MARKER: &str = "arch";

/// Filename segment marking a gzip-compressed archive: `assets.archc`
pub const COMPRESSED_MARKER: &str = "archc";

/// Highest addressable payload offset. Offsets are stored as 32-bit integers,
/// capping an archive's payload region at 2^31 - 1 bytes.
pub const MAX_OFFSET: u32 = i32::MAX as u32;

/// Consolidated crate imports.
pub mod prelude {
	pub use crate::archiver::{Archiver, FinalizeMode};
	pub use crate::global::path::{is_compressed_path, to_native, to_qualified};
	pub use crate::global::{
		compressor::Compressor,
		error::*,
		reg_entry::{EntryKind, RegistryEntry},
	};
}

/// The archive engine and its data structures: [`Archiver`](archive::Archiver),
/// [`FinalizeMode`](archive::FinalizeMode) and [`RegistryEntry`](archive::RegistryEntry)
pub mod archive {
	pub use crate::archiver::{Archiver, FinalizeMode};
	pub use crate::global::compressor::Compressor;
	pub use crate::global::{
		error::*,
		reg_entry::{EntryKind, RegistryEntry},
	};
}

/// Qualified-path helpers: notation conversion, parents, names and nesting depth
pub mod path {
	pub use crate::global::path::*;
}
