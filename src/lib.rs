//! # symcat-base
//!
//! Core library for declarative API knowledge catalogs used by static
//! analysis checks: what the analyzer knows about functions and types it
//! cannot see the definition of.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! catalog   → descriptor tables + read-only query facade
//!   ↓
//! resolve   → call-site name resolution, arity matching
//!   ↓
//! loader    → configuration documents into descriptor tables
//!   ↓
//! valid     → argument validity expression grammar + evaluation
//!   ↓
//! model     → descriptor types (functions, containers, allocation, types)
//!   ↓
//! tokens    → consumed token/AST/symbol contract, pattern matching
//!   ↓
//! base      → primitives (name lists, extensions, tri-state)
//! ```

// ============================================================================
// MODULES (dependency order: base → tokens → model → valid → loader → ...)
// ============================================================================

/// Foundation helpers: name lists, file extensions, tri-state answers
pub mod base;

/// Token stream contract: arena, cursor, pattern matching
pub mod tokens;

/// Descriptor types produced by loading
pub mod model;

/// Argument validity expressions
pub mod valid;

/// Configuration document loading
pub mod loader;

/// Call-site name resolution and arity matching
pub mod resolve;

/// Descriptor tables and the query facade
pub mod catalog;

// Re-export the types almost every consumer touches
pub use catalog::Catalog;
pub use loader::LoadError;
pub use resolve::Resolver;
pub use tokens::{Tok, TokenList};
