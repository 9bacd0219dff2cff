//! # typegate-constraints — constraint evaluation over dynamic messages
//!
//! Evaluates the constraints declared in a type definition against a
//! decoded [`DynamicMessage`]:
//!
//! - **Declarative field rules** — required, length bounds, numeric
//!   bounds, regex patterns. Applied to whatever value the field holds
//!   after the lenient decode (absent fields hold their zero value).
//! - **Expression constraints** — message-level CEL expressions
//!   (cross-field, conditional) compiled with `cel-interpreter` and
//!   executed with `this` bound to the message.
//!
//! The caller sees a flat, ordered list of [`ConstraintViolation`]
//! records, or an [`EvaluatorError`] when evaluation itself could not run
//! (a rule that fails to compile is an evaluator failure, not a
//! violation).

mod evaluate;

pub use evaluate::{evaluate, ConstraintViolation, EvaluatorError};
