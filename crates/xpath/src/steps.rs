//! A `nom`-based splitter for location paths that keeps predicates intact.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::is_not,
    character::complete::char,
    combinator::{all_consuming, recognize},
    multi::{many0, separated_list1},
    sequence::delimited,
};

fn predicate(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('['),
        many0(alt((predicate, is_not("[]")))),
        char(']'),
    ))
    .parse(input)
}

fn step(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((predicate, is_not("/["))))).parse(input)
}

fn location_path(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char('/'), step)).parse(input)
}

/// Splits a path into its steps, ignoring leading slashes and empty steps.
///
/// Slashes inside predicates (`Item[Code/@type='x']`) do not split. When the
/// predicates are unbalanced the path is split on every slash instead.
pub fn split_steps(path: &str) -> Vec<&str> {
    let body = path.trim().trim_start_matches('/');
    if body.is_empty() {
        return Vec::new();
    }
    let steps = match location_path(body) {
        Ok((_, steps)) => steps,
        Err(_) => body.split('/').collect(),
    };
    steps.into_iter().filter(|s| !s.is_empty()).collect()
}

/// The name test of a step, without its predicates.
pub fn step_name(step: &str) -> &str {
    match step.find('[') {
        Some(idx) => &step[..idx],
        None => step,
    }
}

/// True when every `[` is closed by a matching `]`.
pub fn brackets_balanced(path: &str) -> bool {
    let mut depth: usize = 0;
    for c in path.chars() {
        match c {
            '[' => depth += 1,
            ']' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}
