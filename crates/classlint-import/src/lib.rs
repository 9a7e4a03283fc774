//! # classlint-import
//!
//! Reads compiled JVM classes into a [`classlint_core::CodeModel`].
//!
//! Locations may be class directories, single `.class` files or
//! `.jar`/`.zip` archives. Parsing is limited to what architecture rules
//! look at: names, kinds, modifiers, supertypes, annotations, members and
//! the classes named by the constant pool. Method bodies are not decoded.
//!
//! ```no_run
//! use classlint_import::ClassFileImporter;
//!
//! # fn main() -> Result<(), classlint_import::ImportError> {
//! let model = ClassFileImporter::new()
//!     .location("target/classes")
//!     .library("lib/spring-web.jar")
//!     .package("com.example")
//!     .import()?;
//! # let _ = model;
//! # Ok(())
//! # }
//! ```
//!
//! [`ClassFileWriter`] produces class files from descriptors. It is used
//! to build fixtures without a Java toolchain.

#![forbid(unsafe_code)]

mod classfile;
mod descriptor;
mod error;
mod importer;
mod mutf8;
mod writer;

pub use classfile::parse_class;
pub use error::{ClassFormatError, ImportError};
pub use importer::ClassFileImporter;
pub use writer::ClassFileWriter;
