//! Rewriting source paths against the context node of a loop.

use crate::steps::{split_steps, step_name};

fn step_matches(context_step: &str, step: &str) -> bool {
    let wanted = step_name(context_step);
    let actual = step_name(step);
    if wanted == "*" {
        !actual.starts_with('@')
    } else {
        wanted == actual
    }
}

fn window_matches(window: &[&str], context: &[&str]) -> bool {
    window
        .iter()
        .zip(context)
        .all(|(step, ctx)| step_matches(ctx, step))
}

/// Rewrites `path` relative to `context`, the select expression of an
/// enclosing `for-each` or the match of a record template.
///
/// Source paths are read as starting at the document element. An absolute
/// context (`/a/b`, `/*[1]`) must match the leading steps of `path`; a
/// descendant context (`//b`, `b`) matches at its deepest occurrence. Returns
/// `.` when `path` selects the context node itself and `None` when `path`
/// does not lie beneath the context.
pub fn relative_to(path: &str, context: &str) -> Option<String> {
    let context = context.trim();
    let ctx_steps = split_steps(context);
    if ctx_steps.is_empty() {
        return None;
    }
    let steps = split_steps(path);
    if steps.len() < ctx_steps.len() {
        return None;
    }

    let anchored = context.starts_with('/') && !context.starts_with("//");
    let end = if anchored {
        window_matches(&steps[..ctx_steps.len()], &ctx_steps).then_some(ctx_steps.len())?
    } else {
        (ctx_steps.len()..=steps.len())
            .rev()
            .find(|&end| window_matches(&steps[end - ctx_steps.len()..end], &ctx_steps))?
    };

    if end == steps.len() {
        Some(".".to_string())
    } else {
        Some(steps[end..].join("/"))
    }
}

/// Adds a positional predicate to the last element step of `path`.
///
/// `Phone/@type` with position 2 becomes `Phone[2]/@type`. A path made of
/// attribute steps only is returned unchanged.
pub fn with_position(path: &str, position: u32) -> String {
    let body = path.trim_start_matches('/');
    let prefix = &path[..path.len() - body.len()];
    let mut steps: Vec<String> = split_steps(body).into_iter().map(str::to_string).collect();

    if let Some(step) = steps
        .iter_mut()
        .rev()
        .find(|s| !s.starts_with('@') && s.as_str() != ".")
    {
        step.push_str(&format!("[{}]", position));
    }
    format!("{}{}", prefix, steps.join("/"))
}
