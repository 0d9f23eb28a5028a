//! Error type shared by the whole crate

use std::path::PathBuf;

use thiserror::Error;

/// Universal error type for isoview
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a header or data file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required MetaImage header key is absent
    #[error("MetaImage header is missing `{0}`")]
    MissingKey(&'static str),

    /// A MetaImage header value could not be parsed
    #[error("invalid value for `{key}`: {value:?}")]
    InvalidValue { key: String, value: String },

    /// The header describes data this reader cannot decode
    #[error("unsupported MetaImage data: {0}")]
    Unsupported(String),

    /// The data file ended before every voxel was read
    #[error("expected {expected} bytes of voxel data, found {found}")]
    TruncatedData { expected: usize, found: usize },

    /// Grid dimensions are unusable for the requested operation
    #[error("invalid grid dimensions {0:?}")]
    BadDimensions([usize; 3]),

    /// Scalar slice length does not match the grid size
    #[error("scalar count ({0}) does not match grid size ({1})")]
    BadScalarCount(usize, usize),

    /// More slices were requested than the grid can hold
    #[error("cannot place {slices} slices along an axis of {dimension} samples")]
    TooManySlices { slices: usize, dimension: usize },

    /// The operation requires an image with exactly one flat axis
    #[error("image with dimensions {0:?} is not planar")]
    NotPlanar([usize; 3]),

    /// A color was requested by a name that is not in the table
    #[error("unknown color `{0}`")]
    UnknownColor(String),

    /// The windowing system refused to create the event loop or window
    #[error("windowing error: {0}")]
    Window(String),

    /// No suitable GPU adapter or device was found
    #[error("graphics initialisation failed: {0}")]
    Gpu(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// Convenience alias for results carrying [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
