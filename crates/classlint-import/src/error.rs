//! Import errors.

use miette::Diagnostic;
use std::path::PathBuf;

/// A class file that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassFormatError {
    /// The input ended early.
    #[error("truncated class file at byte {offset}")]
    Truncated {
        /// Read position when the input ran out.
        offset: u64,
    },

    /// The file does not start with `0xCAFEBABE`.
    #[error("bad magic number {found:#010x}")]
    BadMagic {
        /// The first four bytes.
        found: u32,
    },

    /// A constant pool reference points at the wrong kind of entry.
    #[error("constant pool entry #{index} is not a {expected}")]
    BadConstant {
        /// Pool index.
        index: u16,
        /// Expected entry kind.
        expected: &'static str,
    },

    /// A constant pool entry with an unknown tag.
    #[error("constant pool entry #{index} has unknown tag {tag}")]
    UnknownConstantTag {
        /// Pool index.
        index: u16,
        /// The tag byte.
        tag: u8,
    },

    /// A malformed field or method descriptor.
    #[error("malformed type descriptor '{descriptor}'")]
    BadDescriptor {
        /// The descriptor text.
        descriptor: String,
    },

    /// An annotation element value with an unknown tag.
    #[error("unknown annotation element tag {tag:#04x}")]
    UnknownElementTag {
        /// The tag byte.
        tag: u8,
    },

    /// A `CONSTANT_Utf8` entry that is not valid modified UTF-8.
    #[error("constant pool entry #{index} is not valid modified UTF-8")]
    InvalidUtf8 {
        /// Pool index.
        index: u16,
    },
}

/// Fatal import failure. No partial model is produced.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ImportError {
    /// A location could not be read.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(classlint::import::io))]
    Io {
        /// The unreadable path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A `.jar`/`.zip` archive is corrupt.
    #[error("failed to read archive {path}: {source}")]
    #[diagnostic(code(classlint::import::archive))]
    Archive {
        /// The archive path.
        path: PathBuf,
        /// Underlying zip error.
        source: zip::result::ZipError,
    },

    /// A class file is malformed.
    #[error("{origin}: {source}")]
    #[diagnostic(
        code(classlint::import::class_format),
        help("rebuild the project; the artifact may be truncated or not a class file")
    )]
    Format {
        /// File path, or `archive!entry` for archive members.
        origin: String,
        /// What was wrong.
        source: ClassFormatError,
    },

    /// Nothing to import.
    #[error("no import locations given")]
    #[diagnostic(
        code(classlint::import::no_locations),
        help("pass class directories or jars, or set [import].locations in classlint.toml")
    )]
    NoLocations,

    /// An exclude glob does not compile.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    #[diagnostic(code(classlint::import::exclude))]
    InvalidExclude {
        /// The pattern text.
        pattern: String,
        /// Glob error.
        source: glob::PatternError,
    },
}
