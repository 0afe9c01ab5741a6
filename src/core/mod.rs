/*!
 * Core Module
 * Shared error types
 */

pub mod errors;

pub use errors::{RuntimeError, RuntimeResult};
