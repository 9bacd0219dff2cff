//! # typegate-core — data model for dynamic type validation
//!
//! The shared vocabulary of the typegate system:
//!
//! - [`name::TypeName`] — validated fully-qualified type names.
//! - [`mode::ResolutionMode`] — local/remote/fallback source policy.
//! - [`descriptor`] — the descriptor document wire form and its indexed,
//!   queryable [`descriptor::TypeDefinitionSet`].
//! - [`dynamic`] — definition-bound generic values and the lenient JSON
//!   decode.
//! - [`registry`] — the compiled-in local type registry and its
//!   enumeration walk.
//!
//! ## Crate Policy
//!
//! This crate holds data and pure logic only: no I/O, no HTTP, no
//! environment reads. Configuration is always passed in by the caller.

pub mod descriptor;
pub mod dynamic;
pub mod mode;
pub mod name;
pub mod registry;

pub use descriptor::{
    DescriptorError, DescriptorSet, FieldDescriptor, FieldKind, FieldRules, LookupError,
    TypeDefinition, TypeDefinitionSet,
};
pub use dynamic::{DecodeError, DynamicMessage, DynamicValue};
pub use mode::ResolutionMode;
pub use name::{InvalidTypeName, TypeName};
pub use registry::{LocalTypeRegistry, TypeSummary};
