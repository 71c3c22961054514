//! Name resolution and arity matching tests.

use super::*;
use crate::catalog::Catalog;
use crate::tokens::{FunctionBinding, ScopeKind, TokenList, Variable};

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .load_str(
            r#"<?xml version="1.0"?>
            <def format="2">
              <function name="strcpy">
                <arg nr="1"/>
                <arg nr="2"/>
              </function>
              <function name="printf">
                <arg nr="1"><formatstr/></arg>
              </function>
              <function name="open">
                <arg nr="1"/>
                <arg nr="2"/>
                <arg nr="3" default="0"/>
              </function>
              <function name="std::free">
                <arg nr="1"/>
              </function>
              <function name="std::string::push_back">
                <arg nr="1"/>
              </function>
              <function name="Base::init"/>
            </def>"#,
        )
        .unwrap();
    catalog
}

fn call<'a>(list: &'a mut TokenList, name_occurrence: usize, name: &str) -> crate::tokens::Tok<'a> {
    list.build_call_ast();
    list.find_nth(name, name_occurrence).unwrap()
}

#[test]
fn bare_call_resolves_to_its_name() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);
    let mut list = TokenList::parse("strcpy ( d , s ) ;");
    let ftok = call(&mut list, 0, "strcpy");
    assert_eq!(resolver.function_name(ftok).as_deref(), Some("strcpy"));
    assert!(resolver.library_function(ftok).is_some());
}

#[test]
fn qualified_call_joins_both_sides() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);
    let mut list = TokenList::parse("std :: free ( p ) ;");
    let ftok = call(&mut list, 0, "free");
    assert_eq!(resolver.function_name(ftok).as_deref(), Some("std::free"));
    assert!(resolver.library_function(ftok).is_some());
}

#[test]
fn global_namespace_reference_drops_the_colons() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);
    let mut list = TokenList::parse(":: strcpy ( d , s ) ;");
    let ftok = call(&mut list, 0, "strcpy");
    assert_eq!(resolver.function_name(ftok).as_deref(), Some("strcpy"));
}

#[test]
fn member_call_uses_receiver_type() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);

    let mut list = TokenList::parse("s . push_back ( c ) ;");
    list.declare_variable(
        "s",
        Variable {
            type_name: "std::string".into(),
            is_pointer: false,
            attr_noreturn: false,
        },
    );
    let ftok = call(&mut list, 0, "push_back");
    assert_eq!(
        resolver.function_name(ftok).as_deref(),
        Some("std::string::push_back")
    );
    assert!(resolver.library_function(ftok).is_some());
}

#[test]
fn pointer_access_must_match_the_variable() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);

    // `->` access on a non-pointer receiver cannot derive a type; this is
    // a hard resolution failure.
    let mut list = TokenList::parse("s -> push_back ( c ) ;");
    list.declare_variable(
        "s",
        Variable {
            type_name: "std::string".into(),
            is_pointer: false,
            attr_noreturn: false,
        },
    );
    let ftok = call(&mut list, 0, "push_back");
    assert_eq!(resolver.function_name(ftok), None);

    // With a pointer receiver it resolves.
    let mut list = TokenList::parse("s -> push_back ( c ) ;");
    list.declare_variable(
        "s",
        Variable {
            type_name: "std::string".into(),
            is_pointer: true,
            attr_noreturn: false,
        },
    );
    let ftok = call(&mut list, 0, "push_back");
    assert_eq!(
        resolver.function_name(ftok).as_deref(),
        Some("std::string::push_back")
    );
}

#[test]
fn unknown_receiver_type_fails_resolution() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);
    let mut list = TokenList::parse("mystery . push_back ( c ) ;");
    let ftok = call(&mut list, 0, "push_back");
    assert_eq!(resolver.function_name(ftok), None);
}

#[test]
fn base_class_member_is_preferred_when_arity_matches() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);

    let mut list = TokenList::parse("init ( ) ;");
    let class_scope = list.add_scope(ScopeKind::Class, None);
    list.set_base_classes(class_scope, vec!["Base".to_string()]);
    list.set_scope_of("init", class_scope);
    let ftok = call(&mut list, 0, "init");
    assert_eq!(resolver.function_name(ftok).as_deref(), Some("Base::init"));

    // Wrong arity: fall back to the unqualified name.
    let mut list = TokenList::parse("init ( a , b ) ;");
    let class_scope = list.add_scope(ScopeKind::Class, None);
    list.set_base_classes(class_scope, vec!["Base".to_string()]);
    list.set_scope_of("init", class_scope);
    let ftok = call(&mut list, 0, "init");
    assert_eq!(resolver.function_name(ftok).as_deref(), Some("init"));
}

#[test]
fn exact_arity_is_required_without_options() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);
    for (code, expected) in [
        ("strcpy ( d , s ) ;", true),
        ("strcpy ( d ) ;", false),
        ("strcpy ( d , s , x ) ;", false),
    ] {
        let mut list = TokenList::parse(code);
        let ftok = call(&mut list, 0, "strcpy");
        assert_eq!(
            resolver.match_arguments(ftok, "strcpy").is_some(),
            expected,
            "{code}"
        );
    }
}

#[test]
fn format_string_position_accepts_more_arguments() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);
    for (code, expected) in [
        ("printf ( fmt ) ;", true),
        ("printf ( fmt , a , b , c ) ;", true),
        ("printf ( ) ;", false),
    ] {
        let mut list = TokenList::parse(code);
        let ftok = call(&mut list, 0, "printf");
        assert_eq!(
            resolver.match_arguments(ftok, "printf").is_some(),
            expected,
            "{code}"
        );
    }
}

#[test]
fn optional_positions_open_a_range() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);
    for (code, expected) in [
        ("open ( path , flags ) ;", true),
        ("open ( path , flags , mode ) ;", true),
        ("open ( path ) ;", false),
        ("open ( path , flags , mode , extra ) ;", false),
    ] {
        let mut list = TokenList::parse(code);
        let ftok = call(&mut list, 0, "open");
        assert_eq!(
            resolver.match_arguments(ftok, "open").is_some(),
            expected,
            "{code}"
        );
    }
}

#[test]
fn user_symbols_shadow_library_names() {
    let catalog = catalog();
    let resolver = Resolver::new(&catalog);

    // A variable holding a function pointer is never a library function.
    let mut list = TokenList::parse("strcpy ( d , s ) ;");
    list.declare_variable(
        "strcpy",
        Variable {
            type_name: "fn".into(),
            is_pointer: true,
            attr_noreturn: false,
        },
    );
    let ftok = call(&mut list, 0, "strcpy");
    assert!(resolver.library_function(ftok).is_none());

    // A user function outside the global namespace is screened out.
    let mut list = TokenList::parse("strcpy ( d , s ) ;");
    list.declare_function(
        "strcpy",
        FunctionBinding {
            in_global_scope: false,
            is_const: false,
            attr_noreturn: false,
        },
    );
    let ftok = call(&mut list, 0, "strcpy");
    assert!(resolver.library_function(ftok).is_none());

    // Keywords never resolve.
    let mut list = TokenList::parse("return ( x ) ;");
    let ftok = call(&mut list, 0, "return");
    assert!(resolver.library_function(ftok).is_none());
}
