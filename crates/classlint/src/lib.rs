//! # classlint
//!
//! Architecture rules for compiled JVM applications, checked against the
//! class files themselves.
//!
//! This is the facade crate that re-exports the code model, the importer
//! and the built-in rules.
//!
//! ## Quick Start: `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! classlint = "0.3"
//! ```
//!
//! ```rust,ignore
//! // tests/architecture.rs
//! classlint::check!(config = "classlint.toml");
//! ```
//!
//! The generated test imports the `[import]` locations of the config,
//! evaluates the preset plus any declarative rules and fails with the full
//! report.
//!
//! ## Programmatic Usage
//!
//! ```no_run
//! use classlint::rules::Preset;
//! use classlint::{ClassFileImporter, RuleSet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ClassFileImporter::new()
//!     .location("build/classes/java/main")
//!     .package("com.example.app")
//!     .import()?;
//!
//! let report = RuleSet::builder()
//!     .rules(Preset::SpringLayered.rules("com.example.app")?)
//!     .build()
//!     .check(&model)?;
//! println!("{} class(es) checked", report.classes_checked);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use classlint_core::*;
pub use classlint_import::{
    parse_class, ClassFileImporter, ClassFileWriter, ClassFormatError, ImportError,
};

/// Built-in rules and presets.
pub mod rules {
    pub use classlint_rules::*;
}

mod runner;

#[doc(hidden)]
pub mod __internal {
    pub use crate::runner::run_check;
}

/// Generates a `#[test]` that runs classlint against the project's classes.
///
/// Every argument is optional:
///
/// ```rust,ignore
/// classlint::check!();
/// classlint::check!(preset = "naming", config = "ci/classlint.toml", fail_on = "warning");
/// ```
///
/// `config` is relative to the workspace root. Arguments override the
/// matching keys of the config file.
#[macro_export]
macro_rules! check {
    () => {
        $crate::check!(@run None, None, None);
    };
    ($($key:ident = $value:literal),+ $(,)?) => {
        $crate::check!(@run
            $crate::check!(@pick preset, $($key = $value),+),
            $crate::check!(@pick config, $($key = $value),+),
            $crate::check!(@pick fail_on, $($key = $value),+)
        );
    };
    (@run $preset:expr, $config:expr, $fail_on:expr) => {
        #[test]
        fn classlint_architecture() {
            $crate::__internal::run_check($preset, $config, $fail_on);
        }
    };
    (@pick preset, preset = $value:literal $(, $($rest:tt)*)?) => { Some($value) };
    (@pick config, config = $value:literal $(, $($rest:tt)*)?) => { Some($value) };
    (@pick fail_on, fail_on = $value:literal $(, $($rest:tt)*)?) => { Some($value) };
    (@pick $want:ident, $other:ident = $value:literal $(, $($rest:tt)*)?) => {
        $crate::check!(@pick $want $(, $($rest)*)?)
    };
    (@pick $want:ident) => { None };
}
