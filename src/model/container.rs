//! Container descriptors: token patterns plus member-function semantics.

use rustc_hash::FxHashMap;

/// Mutation performed by invoking a container member function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    Resize,
    Clear,
    Push,
    Pop,
    Find,
    FindConst,
    Insert,
    Erase,
    Append,
    ChangeContent,
    ChangeInternal,
    Change,
    #[default]
    NoAction,
}

impl Action {
    /// Map a configuration string to an action; unknown strings map to
    /// `NoAction` and the loader turns that into a load error where an
    /// action was explicitly given.
    pub fn from_name(name: &str) -> Action {
        match name {
            "resize" => Action::Resize,
            "clear" => Action::Clear,
            "push" => Action::Push,
            "pop" => Action::Pop,
            "find" => Action::Find,
            "find-const" => Action::FindConst,
            "insert" => Action::Insert,
            "erase" => Action::Erase,
            "append" => Action::Append,
            "change-content" => Action::ChangeContent,
            "change-internal" => Action::ChangeInternal,
            "change" => Action::Change,
            _ => Action::NoAction,
        }
    }
}

/// Value semantically produced by invoking a container member function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Yield {
    AtIndex,
    Item,
    Buffer,
    BufferNt,
    StartIterator,
    EndIterator,
    Iterator,
    Size,
    Empty,
    #[default]
    NoYield,
}

impl Yield {
    pub fn from_name(name: &str) -> Yield {
        match name {
            "at_index" => Yield::AtIndex,
            "item" => Yield::Item,
            "buffer" => Yield::Buffer,
            "buffer-nt" => Yield::BufferNt,
            "start-iterator" => Yield::StartIterator,
            "end-iterator" => Yield::EndIterator,
            "iterator" => Yield::Iterator,
            "size" => Yield::Size,
            "empty" => Yield::Empty,
            _ => Yield::NoYield,
        }
    }
}

/// Semantics of one member function of a container.
#[derive(Debug, Clone, Default)]
pub struct ContainerFunction {
    pub action: Action,
    pub yield_: Yield,
    pub return_type: String,
}

/// Named sub-field yielded by range-based iteration over a record-like
/// container element.
#[derive(Debug, Clone)]
pub struct RangeItemRecordTypeItem {
    pub name: String,
    /// Template argument position providing the member type, -1 if none.
    pub template_parameter: i32,
}

/// Descriptor for one registered container type.
#[derive(Debug, Clone)]
pub struct Container {
    /// Token pattern opening the type, e.g. `"std :: vector <"`.
    pub start_pattern: String,
    /// Derived stricter pattern: forbids a trailing `::` unless the start
    /// pattern already ends at the generic-open marker, so a short name
    /// cannot match as a prefix of a longer qualified one.
    pub start_pattern2: String,
    /// Pattern the close-partner suffix must match for the container
    /// itself; empty means a start-pattern match suffices.
    pub end_pattern: String,
    /// Pattern the close-partner suffix must match for an iterator of the
    /// container.
    pub it_end_pattern: String,
    pub op_less_allowed: bool,
    pub has_initializer_list_constructor: bool,
    pub view: bool,
    pub functions: FxHashMap<String, ContainerFunction>,
    /// Template argument position carrying the size, -1 if none.
    pub size_template_arg: i32,
    /// Template argument position carrying the element type, -1 if none.
    pub type_template_arg: i32,
    pub array_like_index_op: bool,
    pub std_string_like: bool,
    pub std_associative_like: bool,
    pub unstable_erase: bool,
    pub unstable_insert: bool,
    pub range_item_record_type: Vec<RangeItemRecordTypeItem>,
}

impl Default for Container {
    fn default() -> Self {
        Container {
            start_pattern: String::new(),
            start_pattern2: String::new(),
            end_pattern: String::new(),
            it_end_pattern: String::new(),
            op_less_allowed: true,
            has_initializer_list_constructor: false,
            view: false,
            functions: FxHashMap::default(),
            size_template_arg: -1,
            type_template_arg: -1,
            array_like_index_op: false,
            std_string_like: false,
            std_associative_like: false,
            unstable_erase: false,
            unstable_insert: false,
            range_item_record_type: Vec::new(),
        }
    }
}

impl Container {
    pub fn new() -> Self {
        Container::default()
    }

    /// Install the start pattern and derive the strict variant.
    pub fn set_start_pattern(&mut self, pattern: &str) {
        self.start_pattern = pattern.to_string();
        self.start_pattern2 = if pattern.ends_with('<') {
            pattern.to_string()
        } else {
            format!("{pattern} !!::")
        };
    }

    pub fn get_action(&self, member: &str) -> Action {
        self.functions
            .get(member)
            .map(|f| f.action)
            .unwrap_or(Action::NoAction)
    }

    pub fn get_yield(&self, member: &str) -> Yield {
        self.functions
            .get(member)
            .map(|f| f.yield_)
            .unwrap_or(Yield::NoYield)
    }

    pub fn get_return_type(&self, member: &str) -> &str {
        self.functions
            .get(member)
            .map(|f| f.return_type.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_and_yield_names_round_trip() {
        assert_eq!(Action::from_name("push"), Action::Push);
        assert_eq!(Action::from_name("find-const"), Action::FindConst);
        assert_eq!(Action::from_name("frobnicate"), Action::NoAction);
        assert_eq!(Yield::from_name("start-iterator"), Yield::StartIterator);
        assert_eq!(Yield::from_name("buffer-nt"), Yield::BufferNt);
        assert_eq!(Yield::from_name(""), Yield::NoYield);
    }

    #[test]
    fn strict_start_pattern_appends_negation() {
        let mut c = Container::new();
        c.set_start_pattern("std :: string");
        assert_eq!(c.start_pattern2, "std :: string !!::");
        c.set_start_pattern("std :: vector <");
        assert_eq!(c.start_pattern2, "std :: vector <");
    }

    #[test]
    fn member_lookup_defaults_to_neutral() {
        let mut c = Container::new();
        c.functions.insert(
            "push_back".into(),
            ContainerFunction {
                action: Action::Push,
                yield_: Yield::NoYield,
                return_type: String::new(),
            },
        );
        assert_eq!(c.get_action("push_back"), Action::Push);
        assert_eq!(c.get_action("unknown"), Action::NoAction);
        assert_eq!(c.get_yield("unknown"), Yield::NoYield);
        assert_eq!(c.get_return_type("unknown"), "");
    }
}
