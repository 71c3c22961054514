//! Element dispatch: one parsed document into the catalog tables.

use std::collections::BTreeSet;

use tracing::trace;

use super::error::LoadError;
use super::xml::XmlElement;
use crate::base::{FalseTrueMaybe, split_names};
use crate::catalog::Catalog;
use crate::model::{
    Action, AllocFunc, ArgumentCheck, BufferSize, Direction, MinSize, MinSizeKind,
    NonOverlappingData, PlatformType, PodStdType, PodType, RangeItemRecordTypeItem, Severity,
    TypeCheck, UseRetVal, WarnInfo, Yield, compose_warn_message, is_memory_id, is_resource_id,
};

/// Supported document format revisions.
const SUPPORTED_FORMATS: std::ops::RangeInclusive<i32> = 1..=2;

pub(crate) fn load_document(catalog: &mut Catalog, root: &XmlElement) -> Result<(), LoadError> {
    if root.name != "def" {
        return Err(LoadError::UnsupportedFormat(root.name.clone()));
    }

    // Ancient documents carry no format attribute; they are revision 1.
    let format = root
        .attribute("format")
        .map(|v| {
            v.parse::<i32>()
                .map_err(|_| LoadError::UnsupportedFormat(v.to_string()))
        })
        .transpose()?
        .unwrap_or(1);
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(LoadError::UnsupportedFormat(format.to_string()));
    }

    let mut unknown_elements = BTreeSet::new();

    for node in &root.children {
        trace!(element = %node.name, "loading configuration element");
        match node.name.as_str() {
            "memory" | "resource" => load_memory_resource(catalog, node, &mut unknown_elements)?,
            "define" => load_define(catalog, node)?,
            "function" => {
                let name = node.require_attribute("name")?;
                for alias in split_names(name) {
                    load_function(catalog, node, &alias, &mut unknown_elements)?;
                }
            }
            "reflection" => load_reflection(catalog, node, &mut unknown_elements)?,
            "markup" => load_markup(catalog, node, &mut unknown_elements)?,
            "container" => load_container(catalog, node, &mut unknown_elements)?,
            "smart-pointer" => load_smart_pointer(catalog, node)?,
            "type-checks" => load_type_checks(catalog, node),
            "podtype" => load_pod_type(catalog, node)?,
            "platformtype" => load_platform_type(catalog, node, &mut unknown_elements)?,
            "entrypoint" => {
                let name = node.require_attribute("name")?;
                catalog.entrypoints.insert(name.to_string());
            }
            other => {
                unknown_elements.insert(other.to_string());
            }
        }
    }

    if !unknown_elements.is_empty() {
        let joined = unknown_elements.into_iter().collect::<Vec<_>>().join(", ");
        return Err(LoadError::UnknownElement(joined));
    }
    Ok(())
}

// ----------------------------------------------------------------------
// memory / resource
// ----------------------------------------------------------------------

fn load_memory_resource(
    catalog: &mut Catalog,
    node: &XmlElement,
    unknown_elements: &mut BTreeSet<String>,
) -> Result<(), LoadError> {
    // A dealloc name already registered by an earlier block extends that
    // block's family instead of minting a fresh id.
    let mut group_id = 0;
    'outer: for child in &node.children {
        if child.name == "dealloc" {
            for name in split_names(child.text()) {
                if let Some(existing) = catalog.dealloc.get(&name) {
                    group_id = existing.group_id;
                    break 'outer;
                }
            }
        }
    }
    if group_id == 0 {
        // Mint the next id in this kind's space; the parity split keeps
        // memory ids and resource ids from ever colliding.
        let is_kind: fn(i32) -> bool = if node.name == "memory" {
            is_memory_id
        } else {
            is_resource_id
        };
        loop {
            catalog.alloc_id += 1;
            if is_kind(catalog.alloc_id) {
                break;
            }
        }
        group_id = catalog.alloc_id;
    }

    for child in &node.children {
        let names = split_names(child.text());
        match child.name.as_str() {
            "alloc" | "realloc" => {
                let mut func = AllocFunc::new(group_id);
                func.no_fail = child.bool_attribute("no-fail", false);
                func.init_data = child.bool_attribute("init", true);
                func.arg = child.int_attribute("arg", -1)?;
                if let Some(buffer_size) = child.attribute("buffer-size") {
                    let (kind, arg1, arg2) = parse_buffer_size(buffer_size)?;
                    func.buffer_size = kind;
                    func.buffer_size_arg1 = arg1;
                    func.buffer_size_arg2 = arg2;
                }
                if child.name == "realloc" {
                    func.realloc_arg = child.int_attribute("realloc-arg", 1)?;
                    for name in names {
                        catalog.realloc.insert(name, func.clone());
                    }
                } else {
                    for name in names {
                        catalog.alloc.insert(name, func.clone());
                    }
                }
            }
            "dealloc" => {
                let mut func = AllocFunc::new(group_id);
                func.arg = child.int_attribute("arg", 1)?;
                for name in names {
                    catalog.dealloc.insert(name, func.clone());
                }
            }
            "use" => {
                for name in names {
                    catalog.functions.entry(name).or_default().use_ = true;
                }
            }
            other => {
                unknown_elements.insert(other.to_string());
            }
        }
    }
    Ok(())
}

// `malloc`, `calloc:3`, `strdup` and friends: a kind name, optionally
// followed by `:<arg1>` and `,<arg2>` with positions 1..=5. Anything else
// is a hard error.
fn parse_buffer_size(value: &str) -> Result<(BufferSize, i32, i32), LoadError> {
    let kind = match value.get(..6) {
        Some("malloc") => BufferSize::Malloc,
        Some("calloc") => BufferSize::Calloc,
        Some("strdup") => BufferSize::Strdup,
        _ => return Err(LoadError::BadAttributeValue(value.to_string())),
    };
    let mut arg1 = 1;
    let mut arg2 = 2;
    let rest = value[6..].as_bytes();
    if !rest.is_empty() {
        if rest[0] == b':' && rest.len() >= 2 && (b'1'..=b'5').contains(&rest[1]) {
            arg1 = i32::from(rest[1] - b'0');
            if rest.len() >= 4 && rest[2] == b',' && (b'1'..=b'5').contains(&rest[3]) {
                arg2 = i32::from(rest[3] - b'0');
            }
        } else {
            return Err(LoadError::BadAttributeValue(value.to_string()));
        }
    }
    Ok((kind, arg1, arg2))
}

// ----------------------------------------------------------------------
// define
// ----------------------------------------------------------------------

fn load_define(catalog: &mut Catalog, node: &XmlElement) -> Result<(), LoadError> {
    let name = node.require_attribute("name")?;
    let value = node.require_attribute("value")?;
    if !catalog.defines.insert(format!("{name} {value}")) {
        return Err(LoadError::DuplicateDefine(name.to_string()));
    }
    Ok(())
}

// ----------------------------------------------------------------------
// function
// ----------------------------------------------------------------------

fn load_function(
    catalog: &mut Catalog,
    node: &XmlElement,
    name: &str,
    unknown_elements: &mut BTreeSet<String>,
) -> Result<(), LoadError> {
    if name.is_empty() {
        return Ok(());
    }

    for child in &node.children {
        match child.name.as_str() {
            "noreturn" => {
                let answer = match child.text() {
                    "false" => FalseTrueMaybe::False,
                    "maybe" => FalseTrueMaybe::Maybe,
                    _ => FalseTrueMaybe::True,
                };
                catalog.noreturn.insert(name.to_string(), answer);
            }
            "pure" => catalog.functions.entry(name.to_string()).or_default().is_pure = true,
            "const" => {
                let func = catalog.functions.entry(name.to_string()).or_default();
                // A constant function is pure as well.
                func.is_pure = true;
                func.is_const = true;
            }
            "leak-ignore" => {
                catalog
                    .functions
                    .entry(name.to_string())
                    .or_default()
                    .leak_ignore = true;
            }
            "ignorefunction" => {
                catalog.functions.entry(name.to_string()).or_default().ignore = true;
            }
            "not-overlapping-data" => {
                let data = NonOverlappingData {
                    ptr1_arg: child.int_attribute("ptr1-arg", -1)?,
                    ptr2_arg: child.int_attribute("ptr2-arg", -1)?,
                    size_arg: child.int_attribute("size-arg", -1)?,
                    strlen_arg: child.int_attribute("strlen-arg", -1)?,
                    count_arg: child.int_attribute("count-arg", -1)?,
                };
                catalog.non_overlapping_data.insert(name.to_string(), data);
            }
            "use-retval" => {
                let func = catalog.functions.entry(name.to_string()).or_default();
                func.use_ret_val = match child.attribute("type") {
                    Some("error-code") => UseRetVal::ErrorCode,
                    _ => UseRetVal::Default,
                };
            }
            "returnValue" => {
                let text = child.text();
                if !text.is_empty() {
                    catalog
                        .return_value
                        .insert(name.to_string(), text.to_string());
                }
                if let Some(type_name) = child.attribute("type") {
                    catalog
                        .return_value_type
                        .insert(name.to_string(), type_name.to_string());
                }
                if let Some(container) = child.attribute("container") {
                    let id = container
                        .parse()
                        .map_err(|_| LoadError::BadAttributeValue(container.to_string()))?;
                    catalog.return_value_container.insert(name.to_string(), id);
                }
                if child.attribute("unknownValues") == Some("all") {
                    catalog
                        .unknown_return_values
                        .insert(name.to_string(), vec![i64::MIN, i64::MAX]);
                }
            }
            "arg" => load_function_arg(catalog, child, name, unknown_elements)?,
            "formatstr" => {
                let func = catalog.functions.entry(name.to_string()).or_default();
                func.format_str = true;
                func.format_str_scan = child.bool_attribute("scan", false);
                func.format_str_secure = child.bool_attribute("secure", false);
            }
            "warn" => load_function_warn(catalog, child, name)?,
            "container" => {
                let func = catalog.functions.entry(name.to_string()).or_default();
                if let Some(action_name) = child.attribute("action") {
                    let action = Action::from_name(action_name);
                    if action == Action::NoAction {
                        return Err(LoadError::BadAttributeValue(action_name.to_string()));
                    }
                    func.container_action = action;
                }
                if let Some(yield_name) = child.attribute("yields") {
                    let yield_ = Yield::from_name(yield_name);
                    if yield_ == Yield::NoYield {
                        return Err(LoadError::BadAttributeValue(yield_name.to_string()));
                    }
                    func.container_yield = yield_;
                }
                if let Some(return_type) = child.attribute("returnType") {
                    func.return_type = return_type.to_string();
                }
            }
            other => {
                unknown_elements.insert(other.to_string());
            }
        }
    }
    // Make sure a descriptor exists even when every child went into a side
    // table; resolution relies on the name being known.
    catalog.functions.entry(name.to_string()).or_default();
    Ok(())
}

fn load_function_arg(
    catalog: &mut Catalog,
    node: &XmlElement,
    name: &str,
    unknown_elements: &mut BTreeSet<String>,
) -> Result<(), LoadError> {
    let nr_str = node.require_attribute("nr")?;
    let any_arg = nr_str == "any";
    let variadic_arg = nr_str == "variadic";
    let nr = if any_arg || variadic_arg {
        -1
    } else {
        nr_str
            .parse()
            .map_err(|_| LoadError::BadAttributeValue(nr_str.to_string()))?
    };

    // Merge into any entry an earlier document configured for the same
    // position.
    let mut ac = catalog
        .functions
        .get(name)
        .and_then(|f| f.argument_checks.get(&nr))
        .cloned()
        .unwrap_or_default();
    ac.optional = node.attribute("default").is_some();
    ac.variadic = variadic_arg;

    if let Some(dir_str) = node.attribute("direction") {
        let dir = parse_direction(dir_str);
        match node.attribute("indirect") {
            Some(indirect) => {
                let level: usize = indirect
                    .parse()
                    .map_err(|_| LoadError::BadAttributeValue(indirect.to_string()))?;
                if let Some(slot) = ac.direction.get_mut(level) {
                    *slot = dir;
                }
            }
            None => ac.direction.fill(dir),
        }
    }

    for check in &node.children {
        let indirect = check.int_attribute("indirect", 0)?;
        match check.name.as_str() {
            "not-bool" => ac.not_bool = true,
            "not-null" => ac.not_null = true,
            "not-uninit" => ac.not_uninit = indirect,
            "formatstr" => ac.format_str = true,
            "strz" => ac.strz = true,
            "valid" => {
                let expr = check.text();
                if !crate::valid::is_compliant(expr) {
                    let shown = if expr.is_empty() {
                        "\"\"".to_string()
                    } else {
                        expr.to_string()
                    };
                    return Err(LoadError::BadAttributeValue(shown));
                }
                ac.valid = expr.to_string();
            }
            "minsize" => load_min_size(&mut ac, check)?,
            "iterator" => {
                ac.iterator_info.it = true;
                let type_str = check.attribute("type");
                ac.iterator_info.first = type_str == Some("first");
                ac.iterator_info.last = type_str == Some("last");
                ac.iterator_info.container = check.int_attribute("container", 0)?;
            }
            other => {
                unknown_elements.insert(other.to_string());
            }
        }
    }

    // A not-null pointer argument must also point at initialized data.
    if ac.not_uninit == 0 && ac.not_null {
        ac.not_uninit = 1;
    }

    catalog
        .functions
        .entry(name.to_string())
        .or_default()
        .argument_checks
        .insert(nr, ac);
    Ok(())
}

// Directions accept any non-empty prefix spelling; `in` is checked before
// `inout`, so `"i"`/`"in"` are In and `"ino"`/`"inout"` are InOut.
fn parse_direction(dir_str: &str) -> Direction {
    if dir_str.is_empty() {
        Direction::Unknown
    } else if "in".starts_with(dir_str) {
        Direction::In
    } else if "out".starts_with(dir_str) {
        Direction::Out
    } else if "inout".starts_with(dir_str) {
        Direction::InOut
    } else {
        Direction::Unknown
    }
}

fn load_min_size(ac: &mut ArgumentCheck, node: &XmlElement) -> Result<(), LoadError> {
    let type_attr = node.require_attribute("type")?;
    let kind = match type_attr {
        "strlen" => MinSizeKind::Strlen,
        "argvalue" => MinSizeKind::ArgValue,
        "sizeof" => MinSizeKind::Sizeof,
        "mul" => MinSizeKind::Mul,
        "value" => MinSizeKind::Value,
        other => return Err(LoadError::BadAttributeValue(other.to_string())),
    };

    if kind == MinSizeKind::Value {
        let value_attr = node.require_attribute("value")?;
        let value: i64 = value_attr
            .parse()
            .map_err(|_| LoadError::BadAttributeValue(value_attr.to_string()))?;
        if value <= 0 {
            return Err(LoadError::BadAttributeValue(value_attr.to_string()));
        }
        let mut min_size = MinSize::new(kind, 0);
        min_size.value = value;
        ac.min_sizes.push(min_size);
    } else {
        let arg_attr = node.require_attribute("arg")?;
        let arg = parse_single_digit_arg(arg_attr)?;
        ac.min_sizes.push(MinSize::new(kind, arg));
        if kind == MinSizeKind::Mul {
            let arg2_attr = node.require_attribute("arg2")?;
            let arg2 = parse_single_digit_arg(arg2_attr)?;
            if let Some(last) = ac.min_sizes.last_mut() {
                last.arg2 = arg2;
            }
        }
    }
    if let Some(base_type) = node.attribute("baseType") {
        if let Some(last) = ac.min_sizes.last_mut() {
            last.base_type = base_type.to_string();
        }
    }
    Ok(())
}

fn parse_single_digit_arg(attr: &str) -> Result<i32, LoadError> {
    let bytes = attr.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii_digit() {
        return Err(LoadError::BadAttributeValue(attr.to_string()));
    }
    Ok(i32::from(bytes[0] - b'0'))
}

fn load_function_warn(
    catalog: &mut Catalog,
    node: &XmlElement,
    name: &str,
) -> Result<(), LoadError> {
    let mut wi = WarnInfo {
        severity: Severity::from_name(node.require_attribute("severity")?),
        ..WarnInfo::default()
    };

    if let Some(cstd) = node.attribute("cstd") {
        if !wi.standards.set_c(cstd) {
            return Err(LoadError::BadAttributeValue(cstd.to_string()));
        }
    }
    if let Some(cppstd) = node.attribute("cppstd") {
        if !wi.standards.set_cpp(cppstd) {
            return Err(LoadError::BadAttributeValue(cppstd.to_string()));
        }
    }

    match (node.attribute("reason"), node.attribute("alternatives")) {
        (Some(reason), Some(alternatives)) => {
            wi.message = compose_warn_message(reason, name, alternatives);
        }
        _ => {
            let message = node.text();
            if message.is_empty() {
                return Err(LoadError::MissingAttribute(
                    "\"reason\" and \"alternatives\" or some text.".to_string(),
                ));
            }
            wi.message = message.to_string();
        }
    }

    catalog.function_warn.insert(name.to_string(), wi);
    Ok(())
}

// ----------------------------------------------------------------------
// reflection
// ----------------------------------------------------------------------

fn load_reflection(
    catalog: &mut Catalog,
    node: &XmlElement,
    unknown_elements: &mut BTreeSet<String>,
) -> Result<(), LoadError> {
    for child in &node.children {
        if child.name != "call" {
            unknown_elements.insert(child.name.clone());
            continue;
        }
        let arg = child.require_attribute("arg")?;
        let arg: i32 = arg
            .parse()
            .map_err(|_| LoadError::BadAttributeValue(arg.to_string()))?;
        catalog.reflection.insert(child.text().to_string(), arg);
    }
    Ok(())
}

// ----------------------------------------------------------------------
// markup
// ----------------------------------------------------------------------

fn load_markup(
    catalog: &mut Catalog,
    node: &XmlElement,
    unknown_elements: &mut BTreeSet<String>,
) -> Result<(), LoadError> {
    let extension = node.require_attribute("ext")?.to_string();
    let info = catalog.markup.entry(extension).or_default();
    info.report_errors = node.attribute("reporterrors") == Some("true");
    info.process_after_code = node.attribute("aftercode") == Some("true");

    for child in &node.children {
        match child.name.as_str() {
            "keywords" => {
                for keyword in &child.children {
                    if keyword.name == "keyword" {
                        let name = keyword.require_attribute("name")?;
                        info.keywords.insert(name.to_string());
                    } else {
                        unknown_elements.insert(keyword.name.clone());
                    }
                }
            }
            "exported" => {
                for exporter in &child.children {
                    if exporter.name != "exporter" {
                        unknown_elements.insert(exporter.name.clone());
                        continue;
                    }
                    let prefix = exporter.require_attribute("prefix")?;
                    let exported = catalog.exporters.entry(prefix.to_string()).or_default();
                    for e in &exporter.children {
                        match e.name.as_str() {
                            "prefix" => exported.add_prefix(e.text().to_string()),
                            "suffix" => exported.add_suffix(e.text().to_string()),
                            other => {
                                unknown_elements.insert(other.to_string());
                            }
                        }
                    }
                }
            }
            "imported" => {
                for importer in &child.children {
                    if importer.name == "importer" {
                        info.importers.insert(importer.text().to_string());
                    } else {
                        unknown_elements.insert(importer.name.clone());
                    }
                }
            }
            "codeblocks" => {
                for block in &child.children {
                    match block.name.as_str() {
                        "block" => {
                            if let Some(name) = block.attribute("name") {
                                info.code_blocks.add_block(name.to_string());
                            }
                        }
                        "structure" => {
                            if let Some(start) = block.attribute("start") {
                                info.code_blocks.set_start(start.to_string());
                            }
                            if let Some(end) = block.attribute("end") {
                                info.code_blocks.set_end(end.to_string());
                            }
                            if let Some(offset) = block.attribute("offset") {
                                let offset: i32 = offset.parse().map_err(|_| {
                                    LoadError::BadAttributeValue(offset.to_string())
                                })?;
                                info.code_blocks.set_offset(offset);
                            }
                        }
                        other => {
                            unknown_elements.insert(other.to_string());
                        }
                    }
                }
            }
            other => {
                unknown_elements.insert(other.to_string());
            }
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------
// container
// ----------------------------------------------------------------------

fn load_container(
    catalog: &mut Catalog,
    node: &XmlElement,
    unknown_elements: &mut BTreeSet<String>,
) -> Result<(), LoadError> {
    let id = node.require_attribute("id")?;

    // `inherits` takes a full copy of the parent and lets this element's
    // own attributes and member entries override individual fields.
    let mut container = match node.attribute("inherits") {
        Some(parent) => catalog
            .containers
            .get(parent)
            .cloned()
            .ok_or_else(|| LoadError::BadAttributeValue(parent.to_string()))?,
        None => catalog.containers.get(id).cloned().unwrap_or_default(),
    };

    if let Some(start_pattern) = node.attribute("startPattern") {
        container.set_start_pattern(start_pattern);
    }
    if let Some(end_pattern) = node.attribute("endPattern") {
        container.end_pattern = end_pattern.to_string();
    }
    if let Some(it_end_pattern) = node.attribute("itEndPattern") {
        container.it_end_pattern = it_end_pattern.to_string();
    }
    if let Some(op_less) = node.attribute("opLessAllowed") {
        container.op_less_allowed = op_less == "true";
    }
    if let Some(ilc) = node.attribute("hasInitializerListConstructor") {
        container.has_initializer_list_constructor = ilc == "true";
    }
    if let Some(view) = node.attribute("view") {
        container.view = view == "true";
    }

    for child in &node.children {
        match child.name.as_str() {
            "size" | "access" | "other" => {
                for function in &child.children {
                    if function.name != "function" {
                        unknown_elements.insert(function.name.clone());
                        continue;
                    }
                    let function_name = function.require_attribute("name")?;

                    let mut action = Action::NoAction;
                    if let Some(action_name) = function.attribute("action") {
                        action = Action::from_name(action_name);
                        if action == Action::NoAction {
                            return Err(LoadError::BadAttributeValue(action_name.to_string()));
                        }
                    }
                    let mut yield_ = Yield::NoYield;
                    if let Some(yield_name) = function.attribute("yields") {
                        yield_ = Yield::from_name(yield_name);
                        if yield_ == Yield::NoYield {
                            return Err(LoadError::BadAttributeValue(yield_name.to_string()));
                        }
                    }

                    let entry = container
                        .functions
                        .entry(function_name.to_string())
                        .or_default();
                    if let Some(return_type) = function.attribute("returnType") {
                        entry.return_type = return_type.to_string();
                    }
                    entry.action = action;
                    entry.yield_ = yield_;
                }

                if child.name == "size" {
                    if let Some(template_arg) = child.attribute("templateParameter") {
                        container.size_template_arg = template_arg
                            .parse()
                            .map_err(|_| LoadError::BadAttributeValue(template_arg.to_string()))?;
                    }
                } else if child.name == "access" {
                    if let Some(index_op) = child.attribute("indexOperator") {
                        container.array_like_index_op = index_op == "array-like";
                    }
                }
            }
            "type" => {
                if let Some(template_arg) = child.attribute("templateParameter") {
                    container.type_template_arg = template_arg
                        .parse()
                        .map_err(|_| LoadError::BadAttributeValue(template_arg.to_string()))?;
                }
                if let Some(string) = child.attribute("string") {
                    container.std_string_like = string == "std-like";
                }
                if let Some(associative) = child.attribute("associative") {
                    container.std_associative_like = associative == "std-like";
                }
                if let Some(unstable) = child.attribute("unstable") {
                    container.unstable_erase |= unstable.contains("erase");
                    container.unstable_insert |= unstable.contains("insert");
                }
            }
            "rangeItemRecordType" => {
                for member in &child.children {
                    let template_parameter = match member.attribute("templateParameter") {
                        Some(v) => v
                            .parse()
                            .map_err(|_| LoadError::BadAttributeValue(v.to_string()))?,
                        None => -1,
                    };
                    container.range_item_record_type.push(RangeItemRecordTypeItem {
                        name: member.attribute("name").unwrap_or("").to_string(),
                        template_parameter,
                    });
                }
            }
            other => {
                unknown_elements.insert(other.to_string());
            }
        }
    }

    catalog.containers.insert(id.to_string(), container);
    Ok(())
}

// ----------------------------------------------------------------------
// smart-pointer
// ----------------------------------------------------------------------

fn load_smart_pointer(catalog: &mut Catalog, node: &XmlElement) -> Result<(), LoadError> {
    let class_name = node.require_attribute("class-name")?;
    let smart_pointer = catalog
        .smart_pointers
        .entry(class_name.to_string())
        .or_default();
    smart_pointer.name = class_name.to_string();
    for child in &node.children {
        if child.name == "unique" {
            smart_pointer.unique = true;
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------
// type-checks
// ----------------------------------------------------------------------

fn load_type_checks(catalog: &mut Catalog, node: &XmlElement) {
    for check in &node.children {
        let check_name = &check.name;
        for check_type in &check.children {
            let type_name = check_type.text();
            if type_name.is_empty() {
                continue;
            }
            let value = match check_type.name.as_str() {
                "check" => TypeCheck::Check,
                "suppress" => TypeCheck::Suppress,
                "checkFiniteLifetime" => TypeCheck::CheckFiniteLifetime,
                _ => continue,
            };
            catalog
                .type_checks
                .insert((check_name.clone(), type_name.to_string()), value);
        }
    }
}

// ----------------------------------------------------------------------
// podtype / platformtype
// ----------------------------------------------------------------------

fn load_pod_type(catalog: &mut Catalog, node: &XmlElement) -> Result<(), LoadError> {
    let name = node.require_attribute("name")?;
    let mut pod_type = PodType::default();
    if let Some(std_type) = node.attribute("stdtype") {
        pod_type.std_type = match std_type {
            "bool" => PodStdType::Bool,
            "char" => PodStdType::Char,
            "short" => PodStdType::Short,
            "int" => PodStdType::Int,
            "long" => PodStdType::Long,
            "long long" => PodStdType::LongLong,
            _ => PodStdType::No,
        };
    }
    if let Some(size) = node.attribute("size") {
        pod_type.size = size
            .parse()
            .map_err(|_| LoadError::BadAttributeValue(size.to_string()))?;
    }
    if let Some(sign) = node.attribute("sign") {
        pod_type.sign = sign.chars().next().unwrap_or('\0');
    }
    for alias in split_names(name) {
        catalog.pod_types.insert(alias, pod_type.clone());
    }
    Ok(())
}

fn load_platform_type(
    catalog: &mut Catalog,
    node: &XmlElement,
    unknown_elements: &mut BTreeSet<String>,
) -> Result<(), LoadError> {
    let type_name = node.require_attribute("name")?;
    let value = node.require_attribute("value")?;

    let mut platform_type = PlatformType {
        value: value.to_string(),
        ..PlatformType::default()
    };
    let mut platforms = BTreeSet::new();
    for child in &node.children {
        match child.name.as_str() {
            "platform" => {
                let target = child.require_attribute("type")?;
                platforms.insert(target.to_string());
            }
            "signed" => platform_type.is_signed = true,
            "unsigned" => platform_type.is_unsigned = true,
            "long" => platform_type.is_long = true,
            "pointer" => platform_type.is_pointer = true,
            "ptr_ptr" => platform_type.is_ptr_ptr = true,
            "const_ptr" => platform_type.is_const_ptr = true,
            other => {
                unknown_elements.insert(other.to_string());
            }
        }
    }

    // Name collisions are always rejected; identical content is reported
    // as a duplicate, anything else as a conflicting redefinition.
    if platforms.is_empty() {
        if let Some(existing) = catalog.platform_type(type_name, "") {
            return Err(if *existing == platform_type {
                LoadError::DuplicatePlatformType(type_name.to_string())
            } else {
                LoadError::PlatformTypeRedefined(type_name.to_string())
            });
        }
        catalog
            .platform_types
            .insert(type_name.to_string(), platform_type);
    } else {
        for platform in platforms {
            if let Some(existing) = catalog.platform_type(type_name, &platform) {
                return Err(if *existing == platform_type {
                    LoadError::DuplicatePlatformType(type_name.to_string())
                } else {
                    LoadError::PlatformTypeRedefined(type_name.to_string())
                });
            }
            catalog
                .platforms
                .entry(platform)
                .or_default()
                .insert(type_name.to_string(), platform_type.clone());
        }
    }
    Ok(())
}
