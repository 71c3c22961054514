//! The catalog: every descriptor table plus the read-only query facade.
//!
//! A [`Catalog`] is built once by one or more [`Catalog::load`] calls and
//! is immutable afterwards. All query entry points degrade to a neutral
//! "no constraint" answer when resolution fails or no descriptor matches,
//! so the absence of knowledge never propagates as an error into a check
//! pass. Cloning deep-copies every table; independent instances never
//! share state, and the group-id counter and loaded-file set live inside
//! the instance rather than in process-wide state.

mod queries;

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::FalseTrueMaybe;
use crate::model::{
    AllocFunc, Container, ExportedFunctions, FunctionDesc, MarkupInfo, NonOverlappingData,
    PlatformType, PodType, SmartPointer, TypeCheck, WarnInfo,
};

/// Knowledge base about functions and types external to the analyzed
/// code, loaded from declarative configuration documents.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) functions: FxHashMap<String, FunctionDesc>,
    /// Insertion-ordered so that container detection is deterministic when
    /// two patterns overlap: first registered wins.
    pub(crate) containers: IndexMap<String, Container>,
    pub(crate) smart_pointers: FxHashMap<String, SmartPointer>,
    pub(crate) function_warn: BTreeMap<String, WarnInfo>,
    /// `"name value"` define lines, insertion-deduplicated.
    pub(crate) defines: BTreeSet<String>,
    /// Group-id counter; owned here so instances never interfere.
    pub(crate) alloc_id: i32,
    /// Absolute paths already loaded; re-loading one is a no-op.
    pub(crate) files: BTreeSet<String>,
    pub(crate) alloc: BTreeMap<String, AllocFunc>,
    pub(crate) dealloc: BTreeMap<String, AllocFunc>,
    pub(crate) realloc: BTreeMap<String, AllocFunc>,
    pub(crate) noreturn: FxHashMap<String, FalseTrueMaybe>,
    pub(crate) return_value: BTreeMap<String, String>,
    pub(crate) return_value_type: BTreeMap<String, String>,
    pub(crate) return_value_container: BTreeMap<String, i32>,
    pub(crate) unknown_return_values: BTreeMap<String, Vec<i64>>,
    /// Markup dialects keyed by lowercase extension (`".qml"`).
    pub(crate) markup: BTreeMap<String, MarkupInfo>,
    /// Exporter macro name to exported prefixes/suffixes.
    pub(crate) exporters: BTreeMap<String, ExportedFunctions>,
    /// Reflection call name to the argument index carrying reflected code.
    pub(crate) reflection: BTreeMap<String, i32>,
    pub(crate) pod_types: FxHashMap<String, PodType>,
    /// Globally scoped platform typedefs.
    pub(crate) platform_types: BTreeMap<String, PlatformType>,
    /// Platform name to its scoped typedefs.
    pub(crate) platforms: BTreeMap<String, BTreeMap<String, PlatformType>>,
    pub(crate) type_checks: BTreeMap<(String, String), TypeCheck>,
    pub(crate) non_overlapping_data: FxHashMap<String, NonOverlappingData>,
    pub(crate) entrypoints: FxHashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Look up a platform typedef: the platform-scoped table first, the
    /// global table as fallback.
    pub fn platform_type(&self, name: &str, platform: &str) -> Option<&PlatformType> {
        if let Some(scoped) = self.platforms.get(platform).and_then(|p| p.get(name)) {
            return Some(scoped);
        }
        self.platform_types.get(name)
    }

    pub fn pod_type(&self, name: &str) -> Option<&PodType> {
        self.pod_types.get(name)
    }

    pub fn get_type_check(&self, check: &str, type_name: &str) -> TypeCheck {
        self.type_checks
            .get(&(check.to_string(), type_name.to_string()))
            .copied()
            .unwrap_or(TypeCheck::Default)
    }

    pub fn has_any_type_check(&self, type_name: &str) -> bool {
        self.type_checks.keys().any(|(_, t)| t == type_name)
    }

    pub fn defines(&self) -> &BTreeSet<String> {
        &self.defines
    }

    pub fn is_entrypoint(&self, func: &str) -> bool {
        func == "main" || self.entrypoints.contains(func)
    }

    pub fn functions(&self) -> &FxHashMap<String, FunctionDesc> {
        &self.functions
    }

    pub fn containers(&self) -> &IndexMap<String, Container> {
        &self.containers
    }

    pub fn smart_pointers(&self) -> &FxHashMap<String, SmartPointer> {
        &self.smart_pointers
    }

    pub fn function_warn(&self) -> &BTreeMap<String, WarnInfo> {
        &self.function_warn
    }

    /// Raw noreturn classification for a name, `None` when unconfigured.
    pub fn noreturn_state(&self, name: &str) -> Option<FalseTrueMaybe> {
        self.noreturn.get(name).copied()
    }
}
