//! Archive assembly and manifest rendering

mod assembler;
mod manifest;

pub use assembler::{assemble, PackageError};
pub use manifest::{render_manifest, ManifestConfig, ManifestEntry, VERSION_HEADER};
