//! End-to-end query behavior over a loaded catalog and call-site tokens.

use once_cell::sync::Lazy;

use symcat::model::{Direction, UseRetVal, Yield};
use symcat::{Catalog, TokenList};

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let mut catalog = Catalog::new();
    catalog
        .load_str(
            r#"<?xml version="1.0"?>
            <def format="2">
              <memory>
                <alloc>malloc</alloc>
                <realloc>realloc</realloc>
                <dealloc>free</dealloc>
              </memory>
              <resource>
                <alloc arg="1">open_handle</alloc>
                <dealloc>close_handle</dealloc>
              </resource>
              <function name="exit">
                <noreturn>true</noreturn>
                <arg nr="1"/>
              </function>
              <function name="longjmp_maybe">
                <noreturn>maybe</noreturn>
              </function>
              <function name="getenv">
                <noreturn>false</noreturn>
                <use-retval/>
                <const/>
                <arg nr="1"><not-null/><not-uninit/></arg>
              </function>
              <function name="sleep_ms">
                <arg nr="1"><valid>0:</valid></arg>
              </function>
              <function name="scanf">
                <formatstr scan="true"/>
                <arg nr="1"><formatstr/></arg>
              </function>
              <function name="gets">
                <warn severity="error">Never use gets.</warn>
                <arg nr="1"/>
              </function>
              <container id="stdVector" startPattern="std :: vector &lt;" endPattern="&gt; !!::" itEndPattern="&gt; :: iterator|const_iterator">
                <size>
                  <function name="size" yields="size"/>
                  <function name="push_back" action="push"/>
                </size>
              </container>
              <smart-pointer class-name="std::unique_ptr"><unique/></smart-pointer>
            </def>"#,
        )
        .unwrap();
    catalog
});

fn call_tokens(code: &str) -> TokenList {
    let mut list = TokenList::parse(code);
    list.build_call_ast();
    list
}

// ----------------------------------------------------------------------
// Allocation symmetry
// ----------------------------------------------------------------------

#[test]
fn alloc_and_dealloc_ids_match_within_a_family() {
    let alloc = call_tokens("malloc ( 10 ) ;");
    let dealloc = call_tokens("free ( p ) ;");
    let realloc = call_tokens("realloc ( p , 20 ) ;");

    let alloc_tok = alloc.front().unwrap();
    let dealloc_tok = dealloc.front().unwrap();
    let realloc_tok = realloc.front().unwrap();

    // malloc produces its resource as the return value (position -1).
    let id = CATALOG.alloc_id(alloc_tok, -1);
    assert_ne!(id, 0);
    assert_eq!(CATALOG.dealloc_id(dealloc_tok, 1), id);
    assert_eq!(CATALOG.realloc_id(realloc_tok, -1), id);

    // The positional contract: asking about an unrelated argument yields
    // no id at all.
    assert_eq!(CATALOG.alloc_id(alloc_tok, 1), 0);
    assert_eq!(CATALOG.dealloc_id(dealloc_tok, 2), 0);
}

#[test]
fn unrelated_families_never_share_an_id() {
    let open = call_tokens("open_handle ( h ) ;");
    let close = call_tokens("close_handle ( h ) ;");
    let malloc = call_tokens("malloc ( 10 ) ;");

    let open_id = CATALOG.alloc_id(open.front().unwrap(), 1);
    let close_id = CATALOG.dealloc_id(close.front().unwrap(), 1);
    assert_ne!(open_id, 0);
    assert_eq!(open_id, close_id);
    assert_ne!(open_id, CATALOG.alloc_id(malloc.front().unwrap(), -1));
}

// ----------------------------------------------------------------------
// Container and smart-pointer classification
// ----------------------------------------------------------------------

#[test]
fn vector_type_classifies_as_container() {
    let list = TokenList::parse("std :: vector < int > v ;");
    let (container, is_iterator) = CATALOG
        .detect_container_or_iterator(list.front().unwrap(), false)
        .expect("vector should be detected");
    assert!(!is_iterator);
    assert_eq!(container.get_yield("size"), Yield::Size);

    assert!(CATALOG.detect_container(list.front().unwrap()).is_some());
    assert!(CATALOG.detect_iterator(list.front().unwrap()).is_none());
}

#[test]
fn vector_iterator_classifies_as_iterator_of_the_container() {
    let list = TokenList::parse("std :: vector < int > :: iterator it ;");
    let (container, is_iterator) = CATALOG
        .detect_container_or_iterator(list.front().unwrap(), false)
        .expect("iterator should be detected");
    assert!(is_iterator);
    assert_eq!(container.start_pattern, "std :: vector <");

    assert!(CATALOG.detect_container(list.front().unwrap()).is_none());
    assert!(CATALOG.detect_iterator(list.front().unwrap()).is_some());
}

#[test]
fn unknown_types_classify_as_nothing() {
    let list = TokenList::parse("std :: list < int > l ;");
    assert!(
        CATALOG
            .detect_container_or_iterator(list.front().unwrap(), false)
            .is_none()
    );
}

#[test]
fn smart_pointer_detection_walks_qualification() {
    let list = TokenList::parse("std :: unique_ptr < int > p ;");
    let sp = CATALOG
        .detect_smart_pointer(list.front().unwrap(), false)
        .expect("unique_ptr is registered");
    assert!(sp.unique);
    assert!(CATALOG.is_smart_pointer(list.front().unwrap()));

    let list = TokenList::parse("unique_ptr < int > p ;");
    assert!(
        CATALOG.detect_smart_pointer(list.front().unwrap(), true).is_some(),
        "without-std streams imply the std prefix"
    );
}

// ----------------------------------------------------------------------
// Facade neutrality and classification collapse
// ----------------------------------------------------------------------

#[test]
fn noreturn_tri_state_collapses_conservatively() {
    let exit = call_tokens("exit ( 1 ) ;");
    let maybe = call_tokens("longjmp_maybe ( ) ;");
    let getenv = call_tokens("getenv ( name ) ;");
    let unknown = call_tokens("mystery ( ) ;");

    // exit takes one argument in this catalog: arity matches, noreturn.
    assert!(CATALOG.is_noreturn(exit.find("exit").unwrap()));
    assert!(!CATALOG.is_not_noreturn(exit.find("exit").unwrap()));

    // Maybe counts as noreturn but not as known-to-return.
    assert!(CATALOG.is_noreturn(maybe.front().unwrap()));
    assert!(!CATALOG.is_not_noreturn(maybe.front().unwrap()));

    assert!(!CATALOG.is_noreturn(getenv.front().unwrap()));
    assert!(CATALOG.is_not_noreturn(getenv.front().unwrap()));

    // Absence of knowledge degrades to "no constraint".
    assert!(!CATALOG.is_noreturn(unknown.front().unwrap()));
    assert!(!CATALOG.is_not_noreturn(unknown.front().unwrap()));
}

#[test]
fn argument_checks_flow_through_the_facade() {
    let list = call_tokens("getenv ( name ) ;");
    let ftok = list.front().unwrap();
    assert!(CATALOG.is_null_arg_bad(ftok, 1));
    assert!(CATALOG.is_uninit_arg_bad(ftok, 1, 0));
    assert!(CATALOG.is_uninit_arg_bad(ftok, 1, 1));
    assert!(!CATALOG.is_uninit_arg_bad(ftok, 1, 2));
    assert!(CATALOG.uninit_arg_checks_indirect(ftok, 1));
    // No entry for position 2 and no formatstr fallback.
    assert!(!CATALOG.is_null_arg_bad(ftok, 2));
}

#[test]
fn format_string_fallbacks_cover_unlisted_positions() {
    let list = call_tokens("scanf ( fmt , out ) ;");
    let ftok = list.front().unwrap();
    assert!(CATALOG.is_formatstr_function(ftok));
    assert!(CATALOG.formatstr_scan(ftok));
    assert_eq!(CATALOG.formatstr_argno(ftok), 0);
    // Scan targets are written, and must not be null.
    assert_eq!(CATALOG.arg_direction(ftok, 2, 0), Direction::Out);
    assert!(CATALOG.is_null_arg_bad(ftok, 2));
}

#[test]
fn const_pure_and_use_retval() {
    let list = call_tokens("getenv ( name ) ;");
    let ftok = list.front().unwrap();
    assert!(CATALOG.is_function_const(ftok));
    assert!(CATALOG.is_function_const_name("getenv", true));
    assert_eq!(CATALOG.use_ret_val_type(ftok), UseRetVal::Default);

    let unknown = call_tokens("mystery ( ) ;");
    assert_eq!(
        CATALOG.use_ret_val_type(unknown.front().unwrap()),
        UseRetVal::None
    );
}

#[test]
fn validity_expressions_reach_queries() {
    let list = call_tokens("sleep_ms ( t ) ;");
    let ftok = list.front().unwrap();
    assert!(CATALOG.is_int_arg_valid(ftok, 1, 0));
    assert!(CATALOG.is_int_arg_valid(ftok, 1, 500));
    assert!(!CATALOG.is_int_arg_valid(ftok, 1, -1));
    // Unconstrained positions accept everything.
    assert!(CATALOG.is_int_arg_valid(ftok, 2, -1));
}

#[test]
fn warnings_resolve_through_the_call_site() {
    let list = call_tokens("gets ( buf ) ;");
    let warn = CATALOG.get_warn_info(list.front().unwrap()).unwrap();
    assert_eq!(warn.message, "Never use gets.");

    let wrong_arity = call_tokens("gets ( a , b ) ;");
    assert!(CATALOG.get_warn_info(wrong_arity.front().unwrap()).is_none());
}

#[test]
fn arity_gates_every_resolved_query() {
    // getenv declares exactly one argument; a two-argument call does not
    // resolve, so every query degrades to neutral.
    let list = call_tokens("getenv ( a , b ) ;");
    let ftok = list.front().unwrap();
    assert!(CATALOG.get_function(ftok).is_none());
    assert!(!CATALOG.is_function_const(ftok));
    assert_eq!(CATALOG.use_ret_val_type(ftok), UseRetVal::None);
    assert!(!CATALOG.is_null_arg_bad(ftok, 1));
}
