//! Call-site name resolution and arity matching.
//!
//! Maps a call token back to the qualified name a descriptor is stored
//! under, and decides whether the call's argument count is compatible with
//! the descriptor. All resolution logic lives here, keeping the catalog a
//! pure data structure; the resolver borrows it read-only.

use tracing::trace;

use crate::catalog::Catalog;
use crate::model::FunctionDesc;
use crate::tokens::{Tok, match_tokens};

/// Recursion bound for qualified-name resolution. Well-formed upstream
/// symbol graphs are shallow; a malformed cyclic graph becomes a plain
/// resolution failure instead of a stack overflow.
const MAX_RESOLVE_DEPTH: u32 = 64;

/// Read-only resolver over a catalog's function table.
pub struct Resolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Resolver { catalog }
    }

    // ============================================================
    // Primary Resolution API
    // ============================================================

    /// Resolve the qualified name of a call site.
    ///
    /// `ftok` is the name token of the call. Returns `None` when the token
    /// does not look like a call, or when a member receiver's type cannot
    /// be derived.
    pub fn function_name(&self, ftok: Tok<'_>) -> Option<String> {
        // A call name, optionally through a function pointer taken with
        // unary `&`.
        let addressed = ftok.text_at(-1) == Some("&")
            && ftok.prev().map(|p| p.ast_op2().is_none()).unwrap_or(false);
        if !match_tokens(Some(ftok), "%name% )| (") && !addressed {
            return None;
        }

        if let Some(parent) = ftok.ast_parent() {
            let tok = if parent.is_unary_op("&") {
                parent.ast_op1()
            } else {
                ftok.next().and_then(|t| t.ast_op1())
            };
            let name = self.resolve(tok?, 0)?;
            trace!(name = %name, "resolved call site via ast");
            return Some(name.strip_prefix("::").unwrap_or(&name).to_string());
        }

        // No AST available: walk raw `name ::` qualification leftwards.
        if ftok.text_at(-1) == Some(".") {
            return None;
        }
        if !ftok
            .at_offset(-2)
            .map(|t| t.is_name() && t.text_at(1) == Some("::"))
            .unwrap_or(false)
        {
            return Some(ftok.text().to_string());
        }
        let mut name = ftok.text().to_string();
        let mut cur = ftok.at_offset(-2);
        while let Some(tok) = cur {
            if !tok.is_name() || tok.text_at(1) != Some("::") {
                break;
            }
            name = format!("{}::{}", tok.text(), name);
            cur = tok.at_offset(-2);
        }
        Some(name)
    }

    // Recursive resolution over the callee expression AST.
    fn resolve(&self, tok: Tok<'_>, depth: u32) -> Option<String> {
        if depth > MAX_RESOLVE_DEPTH {
            trace!("resolution depth exceeded, giving up");
            return None;
        }

        if tok.is_name() {
            // Inside an explicit qualification the raw name is the answer;
            // the parent node assembles the full string.
            if tok.ast_parent().map(|p| p.text() == "::").unwrap_or(false) {
                return Some(tok.text().to_string());
            }
            // A bare call in a class scope may actually name an inherited
            // member: prefer an arity-compatible `Base::name` descriptor.
            let mut scope = tok.scope();
            while let Some(s) = scope {
                if s.is_class_or_struct() {
                    for base in &s.base_classes {
                        let candidate = format!("{base}::{}", tok.text());
                        if self.catalog.functions.contains_key(&candidate)
                            && self.match_arguments(tok, &candidate).is_some()
                        {
                            trace!(name = %candidate, "resolved through base class");
                            return Some(candidate);
                        }
                    }
                }
                scope = s
                    .nested_in
                    .map(|id| tok.list().scope(id));
            }
            return Some(tok.text().to_string());
        }

        if tok.text() == "::" {
            let rhs = match tok.ast_op2() {
                Some(rhs) => rhs,
                // Global-namespace reference: the single operand alone.
                None => return self.resolve(tok.ast_op1()?, depth + 1),
            };
            let lhs = self.resolve(tok.ast_op1()?, depth + 1)?;
            let rhs = self.resolve(rhs, depth + 1)?;
            return Some(format!("{lhs}::{rhs}"));
        }

        if tok.text() == "." {
            let receiver = tok.ast_op1()?;
            let pointer_access = tok.original_name() == Some("->");
            // Failing to derive the receiver's type is a hard resolution
            // failure, never a silent default.
            let type_name = canonical_receiver_type(receiver, pointer_access)?;
            let member = self.resolve(tok.ast_op2()?, depth + 1)?;
            return Some(format!("{type_name}::{member}"));
        }

        None
    }

    // ============================================================
    // Arity matching
    // ============================================================

    /// Check the call's raw argument count against a descriptor.
    ///
    /// A format-string or variadic position accepts any count at or above
    /// the highest declared position; optional positions open a range;
    /// otherwise the count must equal the highest declared position.
    pub fn match_arguments(&self, ftok: Tok<'_>, name: &str) -> Option<&'a FunctionDesc> {
        if name.is_empty() {
            return None;
        }
        let func = self.catalog.functions.get(name)?;
        let call_args = ftok.call_argument_count() as i32;

        let mut args = 0;
        let mut first_optional = -1;
        for (&nr, check) in &func.argument_checks {
            args = args.max(nr);
            if check.optional && (first_optional == -1 || first_optional > nr) {
                first_optional = nr;
            }
            if check.format_str || check.variadic {
                return (args <= call_args).then_some(func);
            }
        }
        let compatible = if first_optional < 0 {
            args == call_args
        } else {
            call_args >= first_optional - 1 && call_args <= args
        };
        compatible.then_some(func)
    }

    // ============================================================
    // Library-function screening
    // ============================================================

    /// Resolve a call token to its descriptor, or `None` when the token
    /// can never be a library function.
    ///
    /// Keywords and built-in type constructors, tokens bound to variables
    /// (user data always shadows a library name) and user functions
    /// declared outside the global namespace are screened out before the
    /// descriptor lookup.
    pub fn library_function(&self, ftok: Tok<'_>) -> Option<&'a FunctionDesc> {
        if ftok.is_keyword() || ftok.is_standard_type() {
            return None;
        }
        if let Some(binding) = ftok.function() {
            if !binding.in_global_scope {
                return None;
            }
        }
        if ftok.var_id() != 0 {
            return None;
        }
        let name = self.function_name(ftok)?;
        self.match_arguments(ftok, &name)
    }
}

// Canonical type name of a member-access receiver. Value access demands a
// non-pointer variable, `->` access a pointer.
fn canonical_receiver_type(receiver: Tok<'_>, pointer_access: bool) -> Option<String> {
    let var = receiver.variable()?;
    (var.is_pointer == pointer_access).then(|| var.type_name.clone())
}

#[cfg(test)]
mod tests;
