//! Output post-processing.
//!
//! Console commands decorate their output with ANSI sequences when run with
//! `--ansi`. The live stream is relayed as-is; only text that ends up in an
//! error message goes through the sanitizer.
//!
//! # Example
//!
//! ```
//! use script_handler::output::OutputSanitizer;
//!
//! let raw = "\x1b[32m[OK]\x1b[39m Cache cleared";
//! assert_eq!(OutputSanitizer::strip_decoration(raw), "[OK] Cache cleared");
//! ```

mod sanitizer;

pub use sanitizer::OutputSanitizer;
