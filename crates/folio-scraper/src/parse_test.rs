use super::*;

#[test]
fn thousands_suffix() {
    assert_eq!(parse_count("12K"), 12_000);
    assert_eq!(parse_count("12k"), 12_000);
    assert_eq!(parse_count("1.2K"), 1_200);
}

#[test]
fn millions_suffix_rounds() {
    assert_eq!(parse_count("1.5M"), 1_500_000);
    assert_eq!(parse_count("2.35m"), 2_350_000);
}

#[test]
fn comma_separated() {
    assert_eq!(parse_count("1,234"), 1_234);
    assert_eq!(parse_count("12,345,678"), 12_345_678);
}

#[test]
fn plain_integer_and_fraction() {
    assert_eq!(parse_count("5000"), 5_000);
    assert_eq!(parse_count("42.9"), 42);
}

#[test]
fn text_around_the_number_is_ignored() {
    assert_eq!(parse_count("1.2K subscribers"), 1_200);
    assert_eq!(parse_count("5,000 subscribers"), 5_000);
}

#[test]
fn empty_and_malformed_yield_zero() {
    assert_eq!(parse_count(""), 0);
    assert_eq!(parse_count("no subscribers yet"), 0);
    assert_eq!(parse_count("K"), 0);
    assert_eq!(parse_count("."), 0);
}

#[test]
fn repeated_dots_stop_at_the_second() {
    assert_eq!(parse_count("1.5.3K"), 1_500);
}

#[test]
fn leading_number_keeps_one_decimal_point() {
    assert_eq!(leading_number("1.5M"), "1.5");
    assert_eq!(leading_number("12"), "12");
    assert_eq!(leading_number("3."), "3");
    assert_eq!(leading_number("K12"), "");
}
