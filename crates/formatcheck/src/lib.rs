// Domain-driven module structure for the format checker.

// Core model
pub mod format;
pub mod diagnostic;
pub mod charset;

// Domain modules
pub mod log;
pub mod factory;
pub mod validate;

// Infrastructure
pub mod conf;
pub mod runtime;

pub use diagnostic::{Diagnostic, ErrorClass, ErrorKind};
pub use factory::{BuildError, ParserFactoryBuilder, ParserFactoryConfig};
pub use format::{DataFormat, DataFormatConfig, FormatError, FormatSettings};
pub use validate::{validate, ValidationContext, ValidationReport};
