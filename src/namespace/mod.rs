//! Namespace assembler and validator
//!
//! Loads one specification version and exposes its callables as five
//! mappings: top-level functions, array methods, dtype methods, functions by
//! category and functions by extension. Each stub carries the module tag,
//! qualified name and docstring the reference namespace would report, and
//! [`validate_namespace`] checks those invariants.

pub mod assembler;
pub mod stub;
pub mod validation;
pub mod version;

pub use assembler::{make_stubs_namespace, Namespace, NamespaceAssembler, StubMap};
pub use stub::{StubFunction, ALIAS_MARKER};
pub use validation::{validate_namespace, Check, ValidationReport, Violation};
pub use version::ApiVersion;
