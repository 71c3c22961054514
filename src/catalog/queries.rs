//! Read-only query facade.
//!
//! Every accessor resolves the call token through the resolver first and
//! returns a neutral "no constraint" answer when resolution fails or no
//! descriptor matches. Query time never fails: a check pass with no
//! applicable descriptor simply learns nothing.

use crate::base::{FalseTrueMaybe, file_extension_lower};
use crate::model::{
    Action, AllocFunc, ArgumentCheck, Container, Direction, FunctionDesc, NonOverlappingData,
    SmartPointer, UseRetVal, WarnInfo, Yield,
};
use crate::resolve::Resolver;
use crate::tokens::{Tok, match_tokens};

use super::Catalog;

/// What container detection is asked to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detect {
    ContainerOnly,
    IteratorOnly,
    Both,
}

impl Catalog {
    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    /// Qualified name of a call site, empty resolution folded to `None`.
    pub fn function_name(&self, ftok: Tok<'_>) -> Option<String> {
        self.resolver().function_name(ftok)
    }

    /// Descriptor for a call site, screened and arity-checked.
    pub fn get_function(&self, ftok: Tok<'_>) -> Option<&FunctionDesc> {
        self.resolver().library_function(ftok)
    }

    // ==================================================================
    // Argument checks
    // ==================================================================

    /// Argument check for a call's argument position; the exact position
    /// wins, the `-1` "any position" entry is the fallback.
    pub fn get_arg(&self, ftok: Tok<'_>, argnr: i32) -> Option<&ArgumentCheck> {
        let func = self.resolver().library_function(ftok)?;
        func.argument_checks
            .get(&argnr)
            .or_else(|| func.argument_checks.get(&-1))
    }

    /// Must this argument not be null?
    ///
    /// Arguments of a scanning format-string function are not-null even
    /// without their own entry: the scan target is always written.
    pub fn is_null_arg_bad(&self, ftok: Tok<'_>, argnr: i32) -> bool {
        match self.get_arg(ftok, argnr) {
            Some(arg) => arg.not_null,
            None => self
                .function_name(ftok)
                .and_then(|name| self.functions.get(&name))
                .map(|f| f.format_str && f.format_str_scan)
                .unwrap_or(false),
        }
    }

    /// Must this argument be initialized down to `indirect` levels?
    ///
    /// Arguments of a non-scanning format-string function must be
    /// initialized even without their own entry: they are read.
    pub fn is_uninit_arg_bad(&self, ftok: Tok<'_>, argnr: i32, indirect: i32) -> bool {
        match self.get_arg(ftok, argnr) {
            Some(arg) => arg.not_uninit >= indirect,
            None => self
                .function_name(ftok)
                .and_then(|name| self.functions.get(&name))
                .map(|f| f.format_str && !f.format_str_scan)
                .unwrap_or(false),
        }
    }

    /// Does the initialization requirement reach through the pointer?
    pub fn uninit_arg_checks_indirect(&self, ftok: Tok<'_>, argnr: i32) -> bool {
        self.get_arg(ftok, argnr)
            .map(|arg| arg.not_uninit >= 1)
            .unwrap_or(false)
    }

    /// Data-flow direction of an argument at an indirection level.
    ///
    /// Arguments at or after a format-string position flow according to
    /// the format style: scanned arguments are written, printed ones read.
    pub fn arg_direction(&self, ftok: Tok<'_>, argnr: i32, indirect: i32) -> Direction {
        if let Some(arg) = self.get_arg(ftok, argnr) {
            return usize::try_from(indirect)
                .ok()
                .and_then(|level| arg.direction.get(level).copied())
                .unwrap_or(Direction::Unknown);
        }
        if self.is_formatstr_function(ftok) {
            let fs_argno = self.formatstr_argno(ftok);
            if fs_argno >= 0 && argnr >= fs_argno {
                return if self.formatstr_scan(ftok) {
                    Direction::Out
                } else {
                    Direction::In
                };
            }
        }
        Direction::Unknown
    }

    /// Any argument position carrying a minimum-size constraint?
    pub fn has_min_size(&self, ftok: Tok<'_>) -> bool {
        self.resolver()
            .library_function(ftok)
            .map(|f| f.argument_checks.values().any(|a| !a.min_sizes.is_empty()))
            .unwrap_or(false)
    }

    // ==================================================================
    // Format strings
    // ==================================================================

    pub fn is_formatstr_function(&self, ftok: Tok<'_>) -> bool {
        self.resolver()
            .library_function(ftok)
            .map(|f| f.format_str)
            .unwrap_or(false)
    }

    /// 0-based position of the format-string argument, -1 when there is
    /// none.
    pub fn formatstr_argno(&self, ftok: Tok<'_>) -> i32 {
        self.resolver()
            .library_function(ftok)
            .and_then(|f| {
                f.argument_checks
                    .iter()
                    .find(|(_, check)| check.format_str)
                    .map(|(&nr, _)| nr - 1)
            })
            .unwrap_or(-1)
    }

    pub fn formatstr_scan(&self, ftok: Tok<'_>) -> bool {
        self.resolver()
            .library_function(ftok)
            .map(|f| f.format_str_scan)
            .unwrap_or(false)
    }

    pub fn formatstr_secure(&self, ftok: Tok<'_>) -> bool {
        self.resolver()
            .library_function(ftok)
            .map(|f| f.format_str_secure)
            .unwrap_or(false)
    }

    // ==================================================================
    // Function classification
    // ==================================================================

    /// Collapse the noreturn tri-state: `Maybe` is conservatively treated
    /// as noreturn.
    pub fn is_noreturn(&self, ftok: Tok<'_>) -> bool {
        if ftok.function().map(|f| f.attr_noreturn).unwrap_or(false) {
            return true;
        }
        if ftok.variable().map(|v| v.attr_noreturn).unwrap_or(false) {
            return true;
        }
        if self.resolver().library_function(ftok).is_none() {
            return false;
        }
        match self
            .function_name(ftok)
            .and_then(|name| self.noreturn.get(&name).copied())
        {
            Some(FalseTrueMaybe::True | FalseTrueMaybe::Maybe) => true,
            Some(FalseTrueMaybe::False) | None => false,
        }
    }

    /// Is the function known to return? `Maybe` is not a positive answer
    /// here either: only an explicit `false` entry counts.
    pub fn is_not_noreturn(&self, ftok: Tok<'_>) -> bool {
        if ftok.function().map(|f| f.attr_noreturn).unwrap_or(false) {
            return false;
        }
        if self.resolver().library_function(ftok).is_none() {
            return self
                .function_name(ftok)
                .map(|name| self.has_any_type_check(&name))
                .unwrap_or(false);
        }
        matches!(
            self.function_name(ftok)
                .and_then(|name| self.noreturn.get(&name).copied()),
            Some(FalseTrueMaybe::False)
        )
    }

    /// Const/pure lookup by name; `pure` selects the weaker property.
    pub fn is_function_const_name(&self, name: &str, pure: bool) -> bool {
        self.functions
            .get(name)
            .map(|f| if pure { f.is_pure } else { f.is_const })
            .unwrap_or(false)
    }

    pub fn is_function_const(&self, ftok: Tok<'_>) -> bool {
        if ftok.function().map(|f| f.is_const).unwrap_or(false) {
            return true;
        }
        if self.resolver().library_function(ftok).is_none() {
            return false;
        }
        self.function_name(ftok)
            .and_then(|name| self.functions.get(&name))
            .map(|f| f.is_const)
            .unwrap_or(false)
    }

    pub fn is_use(&self, name: &str) -> bool {
        self.functions.get(name).map(|f| f.use_).unwrap_or(false)
    }

    pub fn is_leak_ignore(&self, name: &str) -> bool {
        self.functions
            .get(name)
            .map(|f| f.leak_ignore)
            .unwrap_or(false)
    }

    pub fn ignore_function(&self, name: &str) -> bool {
        self.functions.get(name).map(|f| f.ignore).unwrap_or(false)
    }

    pub fn use_ret_val_type(&self, ftok: Tok<'_>) -> UseRetVal {
        self.resolver()
            .library_function(ftok)
            .map(|f| f.use_ret_val)
            .unwrap_or(UseRetVal::None)
    }

    /// Known return-value expression, empty when unconfigured.
    pub fn return_value(&self, ftok: Tok<'_>) -> &str {
        if self.resolver().library_function(ftok).is_none() {
            return "";
        }
        self.function_name(ftok)
            .and_then(|name| self.return_value.get(&name))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn return_value_type(&self, ftok: Tok<'_>) -> &str {
        let ftok = unwrap_scope_qualification(ftok);
        if self.resolver().library_function(ftok).is_none() {
            return "";
        }
        self.function_name(ftok)
            .and_then(|name| self.return_value_type.get(&name))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Template argument position of the container a function returns,
    /// -1 when unconfigured.
    pub fn return_value_container(&self, ftok: Tok<'_>) -> i32 {
        if self.resolver().library_function(ftok).is_none() {
            return -1;
        }
        self.function_name(ftok)
            .and_then(|name| self.return_value_container.get(&name))
            .copied()
            .unwrap_or(-1)
    }

    /// Representative values an unconstrained return value may take.
    pub fn unknown_return_values(&self, ftok: Tok<'_>) -> &[i64] {
        if self.resolver().library_function(ftok).is_none() {
            return &[];
        }
        self.function_name(ftok)
            .and_then(|name| self.unknown_return_values.get(&name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_warn_info(&self, ftok: Tok<'_>) -> Option<&WarnInfo> {
        self.resolver().library_function(ftok)?;
        self.function_warn.get(&self.function_name(ftok)?)
    }

    pub fn get_non_overlapping_data(&self, ftok: Tok<'_>) -> Option<&NonOverlappingData> {
        self.resolver().library_function(ftok)?;
        self.non_overlapping_data.get(&self.function_name(ftok)?)
    }

    // ==================================================================
    // Allocation queries
    // ==================================================================

    /// Allocation descriptor for a call, `::` qualification unwrapped.
    ///
    /// A name that is also a configured function descriptor only counts
    /// when the call passes screening and arity matching; a plain
    /// alloc-only name matches by name alone.
    pub fn alloc_func_info(&self, tok: Tok<'_>) -> Option<&AllocFunc> {
        self.alloc_dealloc_info(&self.alloc, tok)
    }

    pub fn dealloc_func_info(&self, tok: Tok<'_>) -> Option<&AllocFunc> {
        self.alloc_dealloc_info(&self.dealloc, tok)
    }

    pub fn realloc_func_info(&self, tok: Tok<'_>) -> Option<&AllocFunc> {
        self.alloc_dealloc_info(&self.realloc, tok)
    }

    fn alloc_dealloc_info<'a>(
        &'a self,
        table: &'a std::collections::BTreeMap<String, AllocFunc>,
        tok: Tok<'_>,
    ) -> Option<&'a AllocFunc> {
        let tok = unwrap_scope_qualification(tok);
        let name = self.resolver().function_name(tok)?;
        if self.functions.contains_key(&name) && self.resolver().library_function(tok).is_none() {
            return None;
        }
        table.get(&name)
    }

    /// Group id of an allocation call, but only when the descriptor's
    /// configured resource position equals `arg`: an id never gets
    /// attributed to an unrelated argument of the same call. 0 means no
    /// allocation.
    pub fn alloc_id(&self, tok: Tok<'_>, arg: i32) -> i32 {
        self.alloc_func_info(tok)
            .filter(|af| af.arg == arg)
            .map(|af| af.group_id)
            .unwrap_or(0)
    }

    pub fn dealloc_id(&self, tok: Tok<'_>, arg: i32) -> i32 {
        self.dealloc_func_info(tok)
            .filter(|af| af.arg == arg)
            .map(|af| af.group_id)
            .unwrap_or(0)
    }

    pub fn realloc_id(&self, tok: Tok<'_>, arg: i32) -> i32 {
        self.realloc_func_info(tok)
            .filter(|af| af.arg == arg)
            .map(|af| af.group_id)
            .unwrap_or(0)
    }

    /// Positionless name lookups for callers that already hold a plain
    /// function name.
    pub fn alloc_func_info_name(&self, name: &str) -> Option<&AllocFunc> {
        self.alloc.get(name)
    }

    pub fn dealloc_func_info_name(&self, name: &str) -> Option<&AllocFunc> {
        self.dealloc.get(name)
    }

    pub fn realloc_func_info_name(&self, name: &str) -> Option<&AllocFunc> {
        self.realloc.get(name)
    }

    pub fn alloc_id_for_name(&self, name: &str) -> i32 {
        self.alloc.get(name).map(|af| af.group_id).unwrap_or(0)
    }

    pub fn dealloc_id_for_name(&self, name: &str) -> i32 {
        self.dealloc.get(name).map(|af| af.group_id).unwrap_or(0)
    }

    // ==================================================================
    // Containers and smart pointers
    // ==================================================================

    /// Classify a type token sequence as a registered container.
    pub fn detect_container(&self, type_start: Tok<'_>) -> Option<&Container> {
        self.detect_container_internal(type_start, Detect::ContainerOnly, false)
            .map(|(c, _)| c)
    }

    /// Classify a type token sequence as an iterator of a registered
    /// container.
    pub fn detect_iterator(&self, type_start: Tok<'_>) -> Option<&Container> {
        self.detect_container_internal(type_start, Detect::IteratorOnly, false)
            .map(|(c, _)| c)
    }

    /// Classify either way; the flag reports which one matched.
    pub fn detect_container_or_iterator(
        &self,
        type_start: Tok<'_>,
        without_std: bool,
    ) -> Option<(&Container, bool)> {
        self.detect_container_internal(type_start, Detect::Both, without_std)
    }

    fn detect_container_internal(
        &self,
        type_start: Tok<'_>,
        detect: Detect,
        without_std: bool,
    ) -> Option<(&Container, bool)> {
        // First token with a bracket partner, before any variable token.
        let mut first_linked = None;
        let mut cur = Some(type_start);
        while let Some(tok) = cur {
            if tok.var_id() != 0 {
                break;
            }
            if tok.link().is_some() {
                first_linked = Some(tok);
                break;
            }
            cur = tok.next();
        }

        for container in self.containers.values() {
            if container.start_pattern.is_empty() {
                continue;
            }
            let pattern = strip_std_prefix(&container.start_pattern2, without_std);

            // Without an end pattern a start-pattern match is the whole
            // decision; such containers have no generic brackets.
            if detect != Detect::IteratorOnly && container.end_pattern.is_empty() {
                if match_tokens(Some(type_start), pattern) {
                    return Some((container, false));
                }
                continue;
            }

            let close = match first_linked.and_then(|t| t.link()) {
                Some(close) => close,
                None => continue,
            };
            if !match_tokens(Some(type_start), pattern) {
                continue;
            }

            if detect != Detect::ContainerOnly
                && !container.it_end_pattern.is_empty()
                && match_tokens(Some(close), &container.it_end_pattern)
            {
                return Some((container, true));
            }
            if detect != Detect::IteratorOnly && match_tokens(Some(close), &container.end_pattern)
            {
                return Some((container, false));
            }
        }
        None
    }

    /// Action performed by a member call on a detected container.
    pub fn container_action(&self, container: &Container, member: &str) -> Action {
        container.get_action(member)
    }

    /// Yield produced by a member call on a detected container.
    pub fn container_yield(&self, container: &Container, member: &str) -> Yield {
        container.get_yield(member)
    }

    pub fn is_smart_pointer(&self, tok: Tok<'_>) -> bool {
        self.detect_smart_pointer(tok, false).is_some()
    }

    /// Walk a qualified type name and look it up as a smart pointer.
    /// `without_std` prepends the implied `std::` of an already-stripped
    /// stream.
    pub fn detect_smart_pointer(&self, tok: Tok<'_>, without_std: bool) -> Option<&SmartPointer> {
        let mut type_name = if without_std {
            String::from("std::")
        } else {
            String::new()
        };
        let mut cur = Some(tok);
        if tok.text() == "::" {
            cur = tok.next();
        }
        while let Some(t) = cur {
            if t.is_name() && t.text_at(1) == Some("::") {
                type_name.push_str(t.text());
                type_name.push_str("::");
                cur = t.at_offset(2);
            } else {
                break;
            }
        }
        if let Some(t) = cur {
            if t.is_name() {
                type_name.push_str(t.text());
            }
        }
        self.smart_pointers.get(&type_name)
    }

    // ==================================================================
    // Markup
    // ==================================================================

    pub fn is_markup_file(&self, path: &str) -> bool {
        self.markup.contains_key(&file_extension_lower(path))
    }

    /// Report errors for this file? Unregistered extensions default to
    /// true: plain code is always checked.
    pub fn report_errors(&self, path: &str) -> bool {
        self.markup
            .get(&file_extension_lower(path))
            .map(|m| m.report_errors)
            .unwrap_or(true)
    }

    pub fn process_markup_after_code(&self, path: &str) -> bool {
        self.markup
            .get(&file_extension_lower(path))
            .map(|m| m.process_after_code)
            .unwrap_or(true)
    }

    pub fn is_keyword(&self, path: &str, keyword: &str) -> bool {
        self.markup
            .get(&file_extension_lower(path))
            .map(|m| m.keywords.contains(keyword))
            .unwrap_or(false)
    }

    pub fn is_importer(&self, path: &str, importer: &str) -> bool {
        self.markup
            .get(&file_extension_lower(path))
            .map(|m| m.importers.contains(importer))
            .unwrap_or(false)
    }

    pub fn is_exporter(&self, prefix: &str) -> bool {
        self.exporters.contains_key(prefix)
    }

    pub fn is_exported_prefix(&self, prefix: &str, token: &str) -> bool {
        self.exporters
            .get(prefix)
            .map(|e| e.is_prefix(token))
            .unwrap_or(false)
    }

    pub fn is_exported_suffix(&self, prefix: &str, token: &str) -> bool {
        self.exporters
            .get(prefix)
            .map(|e| e.is_suffix(token))
            .unwrap_or(false)
    }

    pub fn is_executable_block(&self, path: &str, token: &str) -> bool {
        self.markup
            .get(&file_extension_lower(path))
            .map(|m| m.code_blocks.is_block(token))
            .unwrap_or(false)
    }

    pub fn block_start(&self, path: &str) -> &str {
        self.markup
            .get(&file_extension_lower(path))
            .map(|m| m.code_blocks.start())
            .unwrap_or("")
    }

    pub fn block_end(&self, path: &str) -> &str {
        self.markup
            .get(&file_extension_lower(path))
            .map(|m| m.code_blocks.end())
            .unwrap_or("")
    }

    pub fn block_start_offset(&self, path: &str) -> i32 {
        self.markup
            .get(&file_extension_lower(path))
            .map(|m| m.code_blocks.offset())
            .unwrap_or(-1)
    }

    pub fn markup_extensions(&self) -> impl Iterator<Item = &str> {
        self.markup.keys().map(String::as_str)
    }

    // ==================================================================
    // Reflection
    // ==================================================================

    pub fn is_reflection(&self, token: &str) -> bool {
        self.reflection.contains_key(token)
    }

    /// Argument index carrying reflected code, -1 when the name is no
    /// reflection call.
    pub fn reflection_argument(&self, token: &str) -> i32 {
        self.reflection.get(token).copied().unwrap_or(-1)
    }

    // ==================================================================
    // Validity expressions
    // ==================================================================

    /// Is an integer argument value admissible? No stored expression means
    /// unconstrained.
    pub fn is_int_arg_valid(&self, ftok: Tok<'_>, argnr: i32, value: i64) -> bool {
        self.get_arg(ftok, argnr)
            .map(|arg| crate::valid::eval_int(&arg.valid, value))
            .unwrap_or(true)
    }

    pub fn is_float_arg_valid(&self, ftok: Tok<'_>, argnr: i32, value: f64) -> bool {
        self.get_arg(ftok, argnr)
            .map(|arg| crate::valid::eval_float(&arg.valid, value))
            .unwrap_or(true)
    }
}

// A call spelled through scope qualification hands us the `::` node; the
// interesting token is its rightmost operand.
fn unwrap_scope_qualification(mut tok: Tok<'_>) -> Tok<'_> {
    while tok.text() == "::" {
        match tok.ast_op2().or_else(|| tok.ast_op1()) {
            Some(inner) => tok = inner,
            None => break,
        }
    }
    tok
}

fn strip_std_prefix(pattern: &str, without_std: bool) -> &str {
    if without_std {
        pattern.strip_prefix("std :: ").unwrap_or(pattern)
    } else {
        pattern
    }
}
