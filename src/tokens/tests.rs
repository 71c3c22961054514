//! Tests for the token arena, AST building and pattern matching.

use super::*;

#[test]
fn lexes_and_links_brackets() {
    let list = TokenList::parse("foo ( a , b ( c ) ) ;");
    let open = list.find("(").unwrap();
    let close = open.link().unwrap();
    assert_eq!(close.text(), ")");
    // Outermost close partner is the last `)`.
    assert_eq!(close.next().unwrap().text(), ";");
}

#[test]
fn links_template_angle_brackets() {
    let list = TokenList::parse("std :: vector < int > v ;");
    let lt = list.find("<").unwrap();
    assert_eq!(lt.link().unwrap().text(), ">");

    // A comparison never gets a link.
    let list = TokenList::parse("a < b ;");
    assert!(list.find("<").unwrap().link().is_none());
}

#[test]
fn arrow_folds_to_dot_with_original_name() {
    let list = TokenList::parse("p -> size ( )");
    let dot = list.find(".").unwrap();
    assert_eq!(dot.original_name(), Some("->"));
}

#[test]
fn call_ast_for_member_access() {
    let mut list = TokenList::parse("s . find ( x ) ;");
    list.build_call_ast();
    let open = list.find("(").unwrap();
    let dot = open.ast_op1().unwrap();
    assert_eq!(dot.text(), ".");
    assert_eq!(dot.ast_op1().unwrap().text(), "s");
    assert_eq!(dot.ast_op2().unwrap().text(), "find");
    assert_eq!(open.ast_op2().unwrap().text(), "x");
}

#[test]
fn call_ast_for_qualified_call() {
    let mut list = TokenList::parse("ns :: sub :: f ( ) ;");
    list.build_call_ast();
    let open = list.find("(").unwrap();
    let outer = open.ast_op1().unwrap();
    assert_eq!(outer.text(), "::");
    assert_eq!(outer.ast_op2().unwrap().text(), "f");
    let inner = outer.ast_op1().unwrap();
    assert_eq!(inner.text(), "::");
    assert_eq!(inner.ast_op1().unwrap().text(), "ns");
    assert_eq!(inner.ast_op2().unwrap().text(), "sub");
}

#[test]
fn call_ast_for_global_qualification() {
    let mut list = TokenList::parse(":: strcpy ( d , s ) ;");
    list.build_call_ast();
    let open = list.find("(").unwrap();
    let colon = open.ast_op1().unwrap();
    assert_eq!(colon.text(), "::");
    assert_eq!(colon.ast_op1().unwrap().text(), "strcpy");
    assert!(colon.ast_op2().is_none());
    // Arguments form a comma chain.
    let comma = open.ast_op2().unwrap();
    assert_eq!(comma.text(), ",");
    assert_eq!(comma.ast_op1().unwrap().text(), "d");
    assert_eq!(comma.ast_op2().unwrap().text(), "s");
}

#[test]
fn raw_argument_count() {
    let count = |code: &str| TokenList::parse(code).front().unwrap().call_argument_count();
    assert_eq!(count("f ( )"), 0);
    assert_eq!(count("f ( a )"), 1);
    assert_eq!(count("f ( a , b )"), 2);
    // Nested call commas are not top-level.
    assert_eq!(count("f ( g ( a , b ) , c )"), 2);
}

#[test]
fn keywords_and_standard_types_are_flagged() {
    let list = TokenList::parse("if ( int ) x");
    assert!(list.find("if").unwrap().is_keyword());
    assert!(list.find("int").unwrap().is_standard_type());
    assert!(!list.find("x").unwrap().is_keyword());
}

#[test]
fn variables_shadow_names() {
    let mut list = TokenList::parse("free ( p )");
    list.declare_variable(
        "p",
        Variable {
            type_name: "char".into(),
            is_pointer: true,
            attr_noreturn: false,
        },
    );
    assert_eq!(list.find("p").unwrap().var_id(), 1);
    assert_eq!(list.find("free").unwrap().var_id(), 0);
}

// ----------------------------------------------------------------------
// Pattern matching
// ----------------------------------------------------------------------

#[test]
fn pattern_literals_and_categories() {
    let list = TokenList::parse("std :: vector < int >");
    let front = list.front();
    assert!(match_tokens(front, "std :: vector <"));
    assert!(match_tokens(front, "std :: %name% <"));
    assert!(!match_tokens(front, "std :: map <"));
}

#[test]
fn pattern_negation() {
    let list = TokenList::parse("> :: iterator");
    assert!(!match_tokens(list.front(), "> !!::"));
    let list = TokenList::parse("> x");
    assert!(match_tokens(list.front(), "> !!::"));
    // End of stream satisfies a negation.
    let list = TokenList::parse(">");
    assert!(match_tokens(list.front(), "> !!::"));
}

#[test]
fn pattern_alternation_and_optional() {
    let list = TokenList::parse("> :: iterator");
    assert!(match_tokens(list.front(), "> :: iterator|const_iterator"));
    let list = TokenList::parse("> :: const_iterator");
    assert!(match_tokens(list.front(), "> :: iterator|const_iterator"));

    // `)|` makes the close bracket optional.
    let list = TokenList::parse("f (");
    assert!(match_tokens(list.front(), "%name% )| ("));
    let list = TokenList::parse("f ) (");
    assert!(match_tokens(list.front(), "%name% )| ("));
}
