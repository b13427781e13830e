//! Unit tests for the adjustment rules: the documented examples, the
//! idempotence guarantee, and deletion-order independence.

use outcheck::adjust::{apply_chain, Adjustment};

const MESSY: &str = "delta alpha\nalpha 42 beta\ncharlie@5ab21f beta\nalpha 42 beta\n-17 omega";

fn assert_idempotent(rule: Adjustment) {
    let once = rule.apply(MESSY).unwrap();
    let twice = rule.apply(&once).unwrap();
    assert_eq!(once, twice, "{:?} is not idempotent", rule);
}

#[test]
fn sort_lines_is_idempotent() {
    assert_idempotent(Adjustment::SortLines);
}

#[test]
fn sort_words_is_idempotent() {
    assert_idempotent(Adjustment::SortWords);
}

#[test]
fn unique_lines_is_idempotent() {
    assert_idempotent(Adjustment::UniqueLines);
}

#[test]
fn unique_words_is_idempotent() {
    assert_idempotent(Adjustment::UniqueWords);
}

#[test]
fn words_only_is_idempotent() {
    assert_idempotent(Adjustment::WordsOnly);
}

#[test]
fn strip_digits_is_idempotent() {
    assert_idempotent(Adjustment::StripDigits);
}

#[test]
fn strip_addresses_is_idempotent() {
    assert_idempotent(Adjustment::StripAddresses);
}

#[test]
fn remove_characters_is_idempotent() {
    assert_idempotent(Adjustment::RemoveCharacters("{}".to_string()));
}

#[test]
fn strip_digits_removes_runs_and_preceding_minus() {
    assert_eq!(
        Adjustment::StripDigits.apply("abc123def-45").unwrap(),
        "abcdef"
    );
}

#[test]
fn unique_lines_output_has_no_duplicates_and_only_input_lines() {
    let input_lines: Vec<&str> = MESSY.lines().collect();
    let output = Adjustment::UniqueLines.apply(MESSY).unwrap();
    let output_lines: Vec<&str> = output.lines().collect();

    let mut seen = std::collections::HashSet::new();
    for line in &output_lines {
        assert!(seen.insert(*line), "duplicate line in output: {}", line);
        assert!(input_lines.contains(line), "invented line: {}", line);
    }
}

#[test]
fn words_only_rejects_whole_tokens_containing_digits() {
    let output = Adjustment::WordsOnly.apply("foo 123 bar3 baz").unwrap();
    // "bar3" is rejected whole; no partial "bar" survives.
    assert_eq!(output, "baz\nfoo");
}

#[test]
fn words_only_sorts_surviving_tokens() {
    let output = Adjustment::WordsOnly.apply("foo bar baz").unwrap();
    assert_eq!(output, "bar\nbaz\nfoo");
}

#[test]
fn delete_lines_removes_targets_regardless_of_declaration_order() {
    let block = "one\ntwo\nthree\nfour\nfive";
    let ascending = Adjustment::DeleteLines(vec![2, 4]).apply(block).unwrap();
    let descending = Adjustment::DeleteLines(vec![4, 2]).apply(block).unwrap();
    assert_eq!(ascending, "one\nthree\nfive");
    assert_eq!(descending, ascending);
}

#[test]
fn chains_compose_left_to_right() {
    // The pattern used for tabulated counts: drop braces, then sort tokens.
    let chain = vec![
        Adjustment::RemoveCharacters("{}".to_string()),
        Adjustment::SortWords,
    ];
    let output = apply_chain(&chain, "{b=2, a=1}").unwrap();
    assert_eq!(output, "a=1\nb=2,");
}

#[test]
fn empty_chain_is_the_identity() {
    assert_eq!(apply_chain(&[], "as is\n").unwrap(), "as is\n");
}
