//! Error types for network loading and accumulator verification.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::board::Color;

/// Header word checked before any weight is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Version,
    Hash,
    DescriptionLength,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderField::Version => "version",
            HeaderField::Hash => "architecture hash",
            HeaderField::DescriptionLength => "description length",
        };
        f.write_str(name)
    }
}

/// Region of the weight file being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Description,
    FeatureTransformer,
    HiddenLayer1,
    HiddenLayer2,
    Output,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::Description => "description",
            Section::FeatureTransformer => "feature transformer",
            Section::HiddenLayer1 => "hidden layer 1",
            Section::HiddenLayer2 => "hidden layer 2",
            Section::Output => "output layer",
        };
        f.write_str(name)
    }
}

/// Error type for network loading and accumulator verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NnueError {
    /// Weight file could not be opened
    FileNotFound { path: PathBuf, kind: io::ErrorKind },
    /// Version, hash or description length differ from this architecture
    BadHeader {
        field: HeaderField,
        expected: u32,
        found: u32,
    },
    /// Section marker word differs from the expected constant
    BadSectionMarker {
        section: Section,
        expected: u32,
        found: u32,
    },
    /// Input ended inside a section
    TruncatedFile { section: Section },
    /// Bytes remain after the output layer
    TrailingData { units: u64, bytes: u64 },
    /// Underlying reader failed for a reason other than end of input
    Read { section: Section, kind: io::ErrorKind },
    /// Incrementally patched accumulator differs from a full rebuild
    AccumulatorDesync {
        perspective: Color,
        index: usize,
        incremental: i16,
        rebuilt: i16,
    },
}

impl NnueError {
    /// Map a reader failure inside `section`
    pub(crate) fn from_io(section: Section, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => NnueError::TruncatedFile { section },
            kind => NnueError::Read { section, kind },
        }
    }
}

impl fmt::Display for NnueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NnueError::FileNotFound { path, kind } => {
                write!(f, "Cannot open network file '{}': {kind}", path.display())
            }
            NnueError::BadHeader {
                field,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Bad {field} in network header: expected {expected:#010x}, found {found:#010x}"
                )
            }
            NnueError::BadSectionMarker {
                section,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Bad {section} marker: expected {expected:#010x}, found {found:#010x}"
                )
            }
            NnueError::TruncatedFile { section } => {
                write!(f, "Network file truncated in {section}")
            }
            NnueError::TrailingData { units, bytes } => {
                write!(
                    f,
                    "Network file has {bytes} trailing bytes ({units} 4-byte units) after the output layer"
                )
            }
            NnueError::Read { section, kind } => {
                write!(f, "Read error in {section}: {kind}")
            }
            NnueError::AccumulatorDesync {
                perspective,
                index,
                incremental,
                rebuilt,
            } => {
                write!(
                    f,
                    "Accumulator desync for {perspective} at {index}: incremental {incremental}, rebuilt {rebuilt}"
                )
            }
        }
    }
}

impl std::error::Error for NnueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_maps_to_truncated() {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(
            NnueError::from_io(Section::HiddenLayer2, &err),
            NnueError::TruncatedFile {
                section: Section::HiddenLayer2
            }
        );
    }

    #[test]
    fn test_other_io_maps_to_read() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(
            NnueError::from_io(Section::Header, &err),
            NnueError::Read {
                section: Section::Header,
                kind: io::ErrorKind::PermissionDenied
            }
        );
    }

    #[test]
    fn test_bad_header_display() {
        let err = NnueError::BadHeader {
            field: HeaderField::Hash,
            expected: 0x3e5a_a6ee,
            found: 0,
        };
        let text = err.to_string();
        assert!(text.contains("architecture hash"));
        assert!(text.contains("0x3e5aa6ee"));
    }

    #[test]
    fn test_trailing_data_display() {
        let err = NnueError::TrailingData { units: 2, bytes: 9 };
        assert!(err.to_string().contains("9 trailing bytes"));
    }
}
