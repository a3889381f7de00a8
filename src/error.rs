use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{} not found", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode icon: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Icon size {0}px is outside the supported range of 1-256px")]
    InvalidSize(u32),
    #[error("No icon sizes were configured")]
    NoSizes,
}

pub type Result<T> = std::result::Result<T, Error>;
