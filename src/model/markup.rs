//! Markup dialect descriptors.
//!
//! Markup documents (UI description files and the like) embed fragments of
//! checkable code. The configuration describes, per file extension, which
//! keywords introduce code, which prefixes export or import symbols, and
//! where executable blocks start and end.

use std::collections::BTreeSet;

/// Exporter keyword: token prefixes/suffixes that publish symbols to other
/// documents.
#[derive(Debug, Clone, Default)]
pub struct ExportedFunctions {
    prefixes: BTreeSet<String>,
    suffixes: BTreeSet<String>,
}

impl ExportedFunctions {
    pub fn add_prefix(&mut self, prefix: String) {
        self.prefixes.insert(prefix);
    }

    pub fn add_suffix(&mut self, suffix: String) {
        self.suffixes.insert(suffix);
    }

    pub fn is_prefix(&self, token: &str) -> bool {
        self.prefixes.contains(token)
    }

    pub fn is_suffix(&self, token: &str) -> bool {
        self.suffixes.contains(token)
    }
}

/// Executable code-block structure of a markup dialect.
#[derive(Debug, Clone, Default)]
pub struct CodeBlocks {
    blocks: BTreeSet<String>,
    start: String,
    end: String,
    offset: i32,
}

impl CodeBlocks {
    pub fn add_block(&mut self, name: String) {
        self.blocks.insert(name);
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.blocks.contains(name)
    }

    pub fn set_start(&mut self, start: String) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: String) {
        self.end = end;
    }

    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

/// Everything configured for one markup file extension.
#[derive(Debug, Clone, Default)]
pub struct MarkupInfo {
    pub report_errors: bool,
    pub process_after_code: bool,
    pub keywords: BTreeSet<String>,
    pub importers: BTreeSet<String>,
    pub code_blocks: CodeBlocks,
}
