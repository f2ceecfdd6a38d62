//! Hostlist expressions: compact node and switch name lists.
//!
//! `node[01-03,07],login1` expands to `node01 node02 node03 node07 login1`.
//! Zero padding on a range's lower bound is preserved across the range.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{TopologyError, TopologyResult};

/// `prefix[ranges]suffix`, one bracket group per item.
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\[\]]*)\[([^\[\]]+)\]([^\[\]]*)$").expect("static hostlist regex")
});

/// Largest number of names a single range may produce.
const MAX_RANGE_LEN: u64 = 65_536;

/// Expand a hostlist expression into names, in declaration order.
pub fn expand(expr: &str) -> TopologyResult<Vec<String>> {
    let mut names = Vec::new();

    for item in split_items(expr) {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        if !item.contains('[') && !item.contains(']') {
            names.push(item.to_string());
            continue;
        }

        let caps = BRACKETED
            .captures(item)
            .ok_or_else(|| invalid(expr, format!("malformed item {item:?}")))?;
        let (prefix, ranges, suffix) = (&caps[1], &caps[2], &caps[3]);

        for range in ranges.split(',') {
            expand_range(expr, prefix, range.trim(), suffix, &mut names)?;
        }
    }

    Ok(names)
}

/// Split on commas that are not inside brackets.
fn split_items(expr: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in expr.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&expr[start..]);
    items
}

fn expand_range(
    expr: &str,
    prefix: &str,
    range: &str,
    suffix: &str,
    out: &mut Vec<String>,
) -> TopologyResult<()> {
    let (lo_str, hi_str) = range.split_once('-').unwrap_or((range, range));
    let (lo_str, hi_str) = (lo_str.trim(), hi_str.trim());

    let lo: u64 = lo_str
        .parse()
        .map_err(|_| invalid(expr, format!("non-numeric bound {lo_str:?}")))?;
    let hi: u64 = hi_str
        .parse()
        .map_err(|_| invalid(expr, format!("non-numeric bound {hi_str:?}")))?;

    if hi < lo {
        return Err(invalid(expr, format!("descending range {range:?}")));
    }
    if hi - lo >= MAX_RANGE_LEN {
        return Err(invalid(expr, format!("range {range:?} is too large")));
    }

    let width = if lo_str.len() > 1 && lo_str.starts_with('0') {
        lo_str.len()
    } else {
        0
    };

    for n in lo..=hi {
        out.push(format!("{prefix}{n:0width$}{suffix}"));
    }
    Ok(())
}

fn invalid(expr: &str, reason: String) -> TopologyError {
    TopologyError::Hostlist {
        expr: expr.to_string(),
        reason,
    }
}
