//! Signature-to-protocol transformer
//!
//! Every function of a specification version becomes a `@runtime_checkable`
//! `typing.Protocol` whose abstract `__call__` carries the function's
//! signature. Optional extensions (e.g. `linalg`, `fft`) are aggregated into
//! their own `<Name>Namespace` protocol and everything else into one umbrella
//! protocol for the whole namespace.
//!
//! # Example
//!
//! ```ignore
//! use array_api_stubgen::config::ProtocolConfig;
//! use array_api_stubgen::protocol::ProtocolGenerator;
//!
//! let generator = ProtocolGenerator::new(ProtocolConfig::default(), "_types");
//! let summary = generator.run(Path::new("src/array_api_stubs/_draft"))?;
//! println!("{} protocols", summary.protocol_count);
//! ```

pub mod generator;
pub mod render;
pub mod transform;

pub use generator::{GenerationSummary, ProtocolGenerator};
pub use render::{render_module, render_protocol, GeneratedModule};
pub use transform::{
    attributes_to_protocol, collect_type_vars, function_to_protocol, Member, ProtocolDef,
    ProtocolMember, CALL_METHOD,
};
