//! Grammar and evaluation tests for validity expressions.

use rstest::rstest;

use super::*;

#[rstest]
#[case("1:5")]
#[case("-1:5")]
#[case("0:,")]
#[case(":10")]
#[case("1,2,3")]
#[case("1:5,8,10:,")]
#[case("-6.7:-5.5")]
#[case("!0.0")]
#[case("1.5E2")]
fn compliant_expressions(#[case] expr: &str) {
    assert!(is_compliant(expr), "{expr:?} should be compliant");
}

#[rstest]
#[case("")]
#[case(".5")]
#[case("1::5")]
#[case("1:.5")]
#[case("1.2.3")]
#[case("2-1")]
#[case(",.5")]
#[case("1EE5")]
#[case("!x")]
#[case("1;5")]
#[case("1:5 ")]
fn non_compliant_expressions(#[case] expr: &str) {
    assert!(!is_compliant(expr), "{expr:?} should be rejected");
}

#[test]
fn inclusive_range() {
    assert!(eval_int("1:5", 1));
    assert!(eval_int("1:5", 3));
    assert!(eval_int("1:5", 5));
    assert!(!eval_int("1:5", 0));
    assert!(!eval_int("1:5", 6));
}

#[test]
fn open_ranges() {
    assert!(eval_int("0:,", 0));
    assert!(eval_int("0:,", 123456));
    assert!(!eval_int("0:,", -1));

    assert!(eval_int(":10", 10));
    assert!(eval_int(":10", -100));
    assert!(!eval_int(":10", 11));
}

#[test]
fn literal_lists_and_mixed_segments() {
    assert!(eval_int("1,2,3", 2));
    assert!(!eval_int("1,2,3", 4));
    assert!(eval_int("1:5,8", 8));
    assert!(!eval_int("1:5,8", 7));
    assert!(eval_int("-1", -1));
}

#[test]
fn absent_expression_is_unconstrained() {
    assert!(eval_int("", i64::MIN));
    assert!(eval_float("", f64::NAN.abs()));
}

#[test]
fn float_ranges_and_negation() {
    assert!(eval_float("-6.7:-5.5", -6.0));
    assert!(!eval_float("-6.7:-5.5", -5.0));
    assert!(eval_float("!0.5", 1.0));
    assert!(!eval_float("!0.5", 0.5));
    // Exact float matching requires a float-spelled literal.
    assert!(eval_float("2.5", 2.5));
    assert!(!eval_float("2", 2.0));
}

#[test]
fn int_expression_with_dot_uses_float_semantics() {
    assert!(eval_int("0.0:1.0", 0));
    assert!(eval_int("0.0:1.0", 1));
    assert!(!eval_int("0.0:1.0", 2));
}
