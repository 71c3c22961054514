//! Descriptor types produced by the configuration loader.
//!
//! One descriptor per configured entity: functions with their argument
//! checks, allocation families, containers with member semantics, plain-old
//! and platform-dependent types, markup dialects and warning entries. All
//! of it is plain owned data; the catalog clones freely and never mutates
//! after loading.

mod alloc;
mod container;
mod function;
mod markup;
mod types;
mod warn;

pub use alloc::{AllocFunc, BufferSize, is_memory_id, is_resource_id};
pub use container::{Action, Container, ContainerFunction, RangeItemRecordTypeItem, Yield};
pub use function::{
    ArgumentCheck, Direction, FunctionDesc, IteratorInfo, MinSize, MinSizeKind,
    NonOverlappingData, UseRetVal, INDIRECT_LEVELS,
};
pub use markup::{CodeBlocks, ExportedFunctions, MarkupInfo};
pub use types::{PlatformType, PodType, PodStdType, SmartPointer, TypeCheck};
pub use warn::{Severity, Standards, WarnInfo, compose_warn_message};
