//! Declaration sorting inside `{ ... }` rule blocks.
//!
//! The text is never parsed into rules. A regex walks it block by block,
//! the body of each block is cut into declarations, and only those are
//! reordered. Everything outside the bodies is copied through.

use crate::style::properties::{PropertyTable, SortKey};
use once_cell::sync::Lazy;
use regex::Regex;

/// Selector and `{` (plus one line break), body up to the first `}`, the `}`;
/// or the rest of the text when no complete block is left.
static RULE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(.*?\{\r?\n?)(.*?)(\})|(.+)").expect("invalid rule block regex")
});

/// Up to the next `;`, taking along the rest of the line when it only holds
/// whitespace or a comment; otherwise a trailing fragment without `;`.
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)[^;]*;(?:[ \t]*(?:/\*[^\n]*?\*/[ \t]*)?(?:\r?\n|\z))?|.+")
        .expect("invalid declaration regex")
});

/// Sort key of one declaration line.
///
/// The property name is whatever precedes the first `:`. Lines without a
/// colon are never matched.
pub fn prioritize(line: &str, table: &PropertyTable) -> SortKey {
    let Some((name, _)) = line.split_once(':') else {
        return SortKey::UNMATCHED;
    };
    match table.lookup(name) {
        Some(key) => {
            log::trace!(
                "Line of CSS: '{}', priority for sorting: #{}",
                line.trim(),
                key.priority
            );
            key
        }
        None => SortKey::UNMATCHED,
    }
}

/// Reorder the declarations of every rule block in `css`.
pub fn sort_properties(css: &str, table: &PropertyTable) -> String {
    log::debug!("Sorting all CSS / SCSS properties");
    let mut sorted = String::with_capacity(css.len() + css.len() / 8);

    for caps in RULE_BLOCK.captures_iter(css) {
        if let Some(trailing) = caps.get(4) {
            sorted.push_str(trailing.as_str());
            continue;
        }

        let opening = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());
        let closing = caps.get(3).map_or("", |m| m.as_str());

        let opens_line = opening.ends_with('\n');
        let declarations = split_declarations(body, opens_line);

        sorted.push_str(opening);
        if !declarations.is_empty() {
            if !opens_line {
                sorted.push('\n');
            }
            sorted.push_str(&regroup(declarations, table));
        }
        sorted.push_str(closing);
    }

    sorted
}

/// Cut a block body into declarations, in source order.
///
/// `starts_on_new_line` says whether the body begins right after a line
/// break; a declaration that shares its line with whatever came before loses
/// its leading spaces, since it is going to get a line of its own. Blank
/// units and units made only of `;` are dropped.
pub fn split_declarations(body: &str, starts_on_new_line: bool) -> Vec<&str> {
    let mut declarations = Vec::new();
    let mut at_line_start = starts_on_new_line;

    for unit in DECLARATION.find_iter(body).map(|m| m.as_str()) {
        let begins_new_line = at_line_start || unit.starts_with(['\n', '\r']);
        at_line_start = unit.ends_with('\n');

        let mut declaration = unit.trim_start_matches(['\n', '\r']);
        if !begins_new_line {
            declaration = declaration.trim_start_matches([' ', '\t']);
        }
        let content = declaration.trim();
        if !content.is_empty() && !content.chars().all(|ch| ch == ';') {
            declarations.push(declaration);
        }
    }

    declarations
}

/// Stable-sort declarations by `(group, priority)` and lay them out one per
/// line, with a blank line wherever the group changes. Every declaration
/// comes out terminated, wherever it lands.
fn regroup(declarations: Vec<&str>, table: &PropertyTable) -> String {
    let mut keyed: Vec<(SortKey, &str)> = declarations
        .into_iter()
        .map(|declaration| (prioritize(declaration, table), declaration))
        .collect();
    keyed.sort_by_key(|(key, _)| *key);

    let mut out = String::new();
    let mut previous_group = None;
    for (key, declaration) in keyed {
        if previous_group.is_some_and(|group| group != key.group) {
            out.push('\n');
        }
        previous_group = Some(key.group);

        if needs_terminator(declaration) {
            out.push_str(declaration.trim_end());
            out.push_str(";\n");
        } else if declaration.ends_with('\n') {
            out.push_str(declaration);
        } else {
            out.push_str(declaration.trim_end_matches([' ', '\t']));
            out.push('\n');
        }
    }
    out
}

/// A declaration missing its closing `;`, typically the last one of a
/// minified block. Comments and brace-terminated fragments are left alone.
fn needs_terminator(declaration: &str) -> bool {
    let content = declaration.trim_end();
    !content.is_empty()
        && !content.ends_with(';')
        && !content.ends_with("*/")
        && !content.ends_with(['{', '}'])
}
