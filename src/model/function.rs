//! Function descriptors and per-argument checks.

use std::collections::BTreeMap;

use super::container::{Action, Yield};

/// Number of tracked indirection levels for argument directions.
pub const INDIRECT_LEVELS: usize = 3;

/// Data flow direction of one argument at one indirection level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    In,
    Out,
    InOut,
    #[default]
    Unknown,
}

/// How strongly a caller must consume the return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UseRetVal {
    #[default]
    None,
    Default,
    ErrorCode,
}

/// Kind of a minimum-buffer-size constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinSizeKind {
    Strlen,
    ArgValue,
    Sizeof,
    Mul,
    Value,
}

/// Minimum-size constraint on a buffer argument, derived from one or two
/// other arguments or a literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinSize {
    pub kind: MinSizeKind,
    /// Referenced argument position; unused for `Value`.
    pub arg: i32,
    /// Second position, `Mul` only.
    pub arg2: i32,
    /// Literal size, `Value` only.
    pub value: i64,
    /// Element-type override used by `Value`/`ArgValue` sizes.
    pub base_type: String,
}

impl MinSize {
    pub fn new(kind: MinSizeKind, arg: i32) -> Self {
        MinSize {
            kind,
            arg,
            arg2: 0,
            value: 0,
            base_type: String::new(),
        }
    }
}

/// Iterator role of an argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IteratorInfo {
    pub it: bool,
    pub first: bool,
    pub last: bool,
    /// Argument position of the container the iterator belongs to.
    pub container: i32,
}

/// Checks configured for one argument position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentCheck {
    pub optional: bool,
    pub variadic: bool,
    /// Direction per indirection level, `direction[0]` is the value itself.
    pub direction: [Direction; INDIRECT_LEVELS],
    pub not_bool: bool,
    pub not_null: bool,
    /// Indirection level up to which the argument must be initialized;
    /// -1 = no requirement, 0 = the value itself.
    pub not_uninit: i32,
    pub format_str: bool,
    /// Must be a null-terminated string.
    pub strz: bool,
    /// Validity expression, already grammar-checked at load time.
    pub valid: String,
    pub min_sizes: Vec<MinSize>,
    pub iterator_info: IteratorInfo,
}

impl Default for ArgumentCheck {
    fn default() -> Self {
        ArgumentCheck {
            optional: false,
            variadic: false,
            direction: [Direction::Unknown; INDIRECT_LEVELS],
            not_bool: false,
            not_null: false,
            not_uninit: -1,
            format_str: false,
            strz: false,
            valid: String::new(),
            min_sizes: Vec::new(),
            iterator_info: IteratorInfo::default(),
        }
    }
}

/// Non-overlapping buffer constraint between two pointer arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonOverlappingData {
    pub ptr1_arg: i32,
    pub ptr2_arg: i32,
    pub size_arg: i32,
    pub strlen_arg: i32,
    pub count_arg: i32,
}

/// Descriptor for one configured function name.
///
/// Argument positions are 1-based; position -1 holds the "any position"
/// fallback consulted when no exact entry exists.
#[derive(Debug, Clone, Default)]
pub struct FunctionDesc {
    /// Keep the resource alive (memory/resource `use` family member).
    pub use_: bool,
    /// Allocated resources passed in are not leaked by this call.
    pub leak_ignore: bool,
    pub is_const: bool,
    pub is_pure: bool,
    /// Excluded from checking entirely.
    pub ignore: bool,
    pub use_ret_val: UseRetVal,
    pub format_str: bool,
    pub format_str_scan: bool,
    pub format_str_secure: bool,
    /// Container mutation this function performs on its container argument.
    pub container_action: Action,
    /// Container value this function yields from its container argument.
    pub container_yield: Yield,
    /// Return type recorded alongside container delegation.
    pub return_type: String,
    pub argument_checks: BTreeMap<i32, ArgumentCheck>,
}
