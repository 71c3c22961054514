//! Token stream contract consumed by the catalog queries.
//!
//! Check passes hand the catalog tokens produced by the analyzer frontend;
//! the catalog only ever reads them. This module provides the minimal owned
//! form of that contract:
//!
//! - [`TokenList`] - arena-backed token storage with sibling links,
//!   matched-bracket links and binary AST links
//! - [`Tok`] - cheap cursor over a token, pointer-style navigation
//! - [`match_tokens`] - the small token-pattern language used by container
//!   descriptors (`"std :: vector <"`, `"> !!::"`, ...)
//! - symbol bindings: variables shadow library names, function bindings
//!   carry the scope information name resolution needs

mod pattern;
mod token;

pub use pattern::match_tokens;
pub use token::{
    FunctionBinding, Scope, ScopeId, ScopeKind, Tok, TokenId, TokenKind, TokenList, Variable,
};

#[cfg(test)]
mod tests;
