use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// File could not be read.
    Read { path: PathBuf, message: String },
    /// Input folder could not be listed.
    Discover { dir: PathBuf, message: String },
    /// Encoding label outside the supported candidate set.
    UnknownEncoding(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Discover { dir, message } => {
                write!(f, "cannot list {}: {message}", dir.display())
            }
            Self::UnknownEncoding(label) => write!(
                f,
                "unknown encoding '{label}' (expected UTF-8, Shift_JIS, EUC-JP or ISO-2022-JP)"
            ),
        }
    }
}

impl std::error::Error for IoError {}
