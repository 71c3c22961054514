//! Allocation-family descriptors and group-id parity.
//!
//! Group ids tie an allocation function to the deallocation functions that
//! may release its result. Memory families take even ids, resource
//! families odd ids; id 0 means unassigned. The disjoint id spaces make it
//! impossible for a resource dealloc to match a memory alloc.

/// True for ids minted for "memory" families.
pub fn is_memory_id(id: i32) -> bool {
    id > 0 && id % 2 == 0
}

/// True for ids minted for "resource" families.
pub fn is_resource_id(id: i32) -> bool {
    id > 0 && id % 2 == 1
}

/// Buffer-size heuristic of an allocation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferSize {
    #[default]
    None,
    /// Size given in a single argument.
    Malloc,
    /// Size is count times element size across two arguments.
    Calloc,
    /// Size derived from a string argument.
    Strdup,
}

/// Descriptor for one alloc/realloc/dealloc function.
#[derive(Debug, Clone)]
pub struct AllocFunc {
    pub group_id: i32,
    /// Argument position holding the resource; -1 when the resource is the
    /// return value.
    pub arg: i32,
    /// Allocation cannot fail (never returns the null sentinel).
    pub no_fail: bool,
    /// Allocated memory starts out initialized.
    pub init_data: bool,
    pub buffer_size: BufferSize,
    pub buffer_size_arg1: i32,
    pub buffer_size_arg2: i32,
    /// For realloc entries: position of the pointer being resized.
    pub realloc_arg: i32,
}

impl AllocFunc {
    pub fn new(group_id: i32) -> Self {
        AllocFunc {
            group_id,
            arg: -1,
            no_fail: false,
            init_data: true,
            buffer_size: BufferSize::None,
            buffer_size_arg1: 1,
            buffer_size_arg2: 2,
            realloc_arg: 1,
        }
    }
}
