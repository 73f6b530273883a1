//! Text rewrites applied after sorting.
//!
//! Every stage is a plain `&str -> String` function; [`crate::prettify`] chains
//! them in a fixed order, and the order matters.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Lines longer than this are candidates for selector splitting.
pub const LONG_SELECTOR_WIDTH: usize = 80;

static ZERO_UNITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\s:])0(px|em|rem|%|in|cm|mm|pc|pt|ex)").expect("invalid zero unit regex")
});
static SEMICOLONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r";;+").expect("invalid semicolon regex"));
static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("invalid blank line regex"));
static SPACE_BEFORE_BRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\{\n").expect("invalid brace spacing regex"));
static EMPTY_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^}{]+\{\}").expect("invalid empty rule regex"));

/// Drop the unit from zero lengths: `margin: 0px` becomes `margin: 0`.
///
/// Only a `0` right after whitespace or a colon counts, so `10px` and
/// `0.5em` are left alone.
pub fn condense_zero_units(css: &str) -> String {
    log::debug!("Condensing all zeroes on values");
    ZERO_UNITS.replace_all(css, "${1}0").into_owned()
}

/// Collapse runs of `;` into one.
pub fn condense_semicolons(css: &str) -> String {
    log::debug!("Condensing all unnecessary multiple adjacent semicolons");
    SEMICOLONS.replace_all(css, ";").into_owned()
}

/// Break lines after a `}` once they are at least `min_len` characters long.
///
/// Only `}` is ever a break point, and a `}` that already ends its line is
/// left as it is.
pub fn wrap_css_lines(css: &str, min_len: usize) -> String {
    log::debug!("Wrapping lines to ~{} max line length", min_len);
    let mut wrapped = String::with_capacity(css.len() + css.len() / min_len.max(1));
    let mut line_len = 0usize;
    let mut chars = css.chars().peekable();

    while let Some(ch) = chars.next() {
        wrapped.push(ch);
        match ch {
            '\n' => line_len = 0,
            '}' if line_len >= min_len && !matches!(chars.peek(), None | Some('\n' | '\r')) => {
                wrapped.push('\n');
                line_len = 0;
            }
            _ => line_len += 1,
        }
    }

    wrapped
}

/// Put each selector of an overly long selector list on its own line.
///
/// Applies to lines over [`LONG_SELECTOR_WIDTH`] characters that start with
/// `*`, `.` or `#`, contain a comma and end with `{`.
pub fn split_long_selectors(css: &str) -> String {
    log::debug!("Splitting too long chained selectors on CSS / SCSS");
    let mut result = String::with_capacity(css.len());

    for line in css.lines() {
        let too_long = line.chars().count() > LONG_SELECTOR_WIDTH
            && line.contains(',')
            && line.trim().ends_with('{');
        if too_long && line.starts_with(['*', '.', '#']) {
            let split = line
                .replace(", ", ",")
                .replace(',', ",\n")
                .replace('{', "{\n");
            result.push_str(&split);
        } else {
            result.push_str(line);
            result.push('\n');
        }
    }

    result
}

/// Whitespace cleanup.
///
/// Trailing spaces go, a run of exactly 3 blank lines becomes 2, exactly 5
/// becomes 4 and 6 or more turn into a horizontal rule comment. Runs of other
/// lengths stay as they are. `{` at a line end gets exactly one space before
/// it, tabs become 4 spaces and the text ends with a single newline.
pub fn normalize_whitespace(css: &str) -> String {
    log::debug!("Normalizing white spaces on CSS");
    let mut trimmed = String::with_capacity(css.len());
    for line in css.lines() {
        trimmed.push_str(line.trim_end());
        trimmed.push('\n');
    }

    let collapsed = BLANK_LINES.replace_all(&trimmed, |caps: &Captures<'_>| {
        // n line breaks in a row leave n - 1 blank lines between text.
        match caps[0].len() - 1 {
            3 => "\n".repeat(3),
            5 => "\n".repeat(5),
            blank if blank >= 6 => format!("\n\n\n{}\n\n\n", horizontal_rule()),
            _ => caps[0].to_string(),
        }
    });

    let spaced = collapsed.replace(" ;\n", ";\n");
    let braced = SPACE_BEFORE_BRACE.replace_all(&spaced, " {\n");

    let mut normalized = braced.replace('\t', "    ").trim_end().to_string();
    normalized.push('\n');
    normalized
}

/// `/* ------...------ */` with 72 dashes.
pub fn horizontal_rule() -> String {
    format!("/* {} */", "-".repeat(72))
}

/// Pad the colon of every simple `property: value;` line so that all values
/// start in the same column.
///
/// Lines with braces, `@import` lines and lines without exactly one colon are
/// left alone. Input without a single qualifying line comes back unchanged.
pub fn justify_right(css: &str) -> String {
    log::debug!("Justifying to the right all CSS / SCSS property values");
    let max_indent = css
        .lines()
        .filter(|line| is_justifiable(line))
        .filter_map(|line| line.split_once(':'))
        .map(|(name, _)| name.trim_end().chars().count() + 1)
        .fold(1, usize::max);
    if max_indent <= 1 {
        return css.to_string();
    }

    let mut justified = String::with_capacity(css.len() + css.len() / 4);
    for line in css.lines() {
        match line.split_once(':') {
            Some((name, value)) if is_justifiable(line) => {
                let name = name.trim_end();
                let width = name.chars().count() + 1;
                justified.push_str(name);
                justified.push(':');
                justified.push_str(&" ".repeat((max_indent + 1).saturating_sub(width)));
                justified.push_str(value.trim_start());
            }
            _ => justified.push_str(line),
        }
        justified.push('\n');
    }
    justified
}

/// A brace-free `name: value;` line with exactly one colon, not an `@import`.
fn is_justifiable(line: &str) -> bool {
    !line.is_empty()
        && !line.contains(['{', '}'])
        && line.split(':').count() == 2
        && line.trim().ends_with(';')
        && !line.trim_start().to_lowercase().starts_with("@import ")
}

/// Prepend `@charset utf-8;` unless the text already declares a charset.
pub fn add_encoding(css: &str) -> String {
    log::debug!("Adding encoding declaration if needed");
    if css.contains("@charset") {
        css.to_string()
    } else {
        format!("@charset utf-8;\n\n\n{}", css)
    }
}

/// Blank line between a closing `}` and a following `#`, `.` or `*` selector.
pub fn simple_replace(css: &str) -> String {
    css.replace("}\n#", "}\n\n#")
        .replace("}\n.", "}\n\n.")
        .replace("}\n*", "}\n\n*")
}

/// Delete rules with a literally empty body, `selector{}`.
pub fn remove_empty_rules(css: &str) -> String {
    log::debug!("Removing all unnecessary empty rules");
    EMPTY_RULE.replace_all(css, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_units_are_condensed() {
        assert_eq!(condense_zero_units("margin: 0px;"), "margin: 0;");
        assert_eq!(condense_zero_units("margin:0em 0% 0rem\t0pt;"), "margin:0 0 0\t0;");
        assert_eq!(condense_zero_units("width: 10px;"), "width: 10px;");
        assert_eq!(condense_zero_units("width: 0.5em;"), "width: 0.5em;");
        assert_eq!(condense_zero_units("top:-0px;"), "top:-0px;");
    }

    #[test]
    fn semicolons_are_condensed() {
        assert_eq!(condense_semicolons("color: red;;;"), "color: red;");
        assert_eq!(condense_semicolons("a;b;;c"), "a;b;c");
    }

    #[test]
    fn wrap_breaks_after_brace_on_long_lines() {
        let rule = ".aaaaaaaa{color:red}";
        let css = rule.repeat(6);
        let wrapped = wrap_css_lines(&css, 80);
        assert_eq!(
            wrapped,
            format!("{}\n{}", rule.repeat(5), rule.repeat(1))
        );
    }

    #[test]
    fn wrap_leaves_short_lines_and_existing_breaks() {
        assert_eq!(wrap_css_lines("a{b:c}d{e:f}", 80), "a{b:c}d{e:f}");
        let long = format!("{}}}\n.next{{}}", "x".repeat(90));
        assert_eq!(wrap_css_lines(&long, 80), long);
        assert_eq!(wrap_css_lines("abc}def}", 3), "abc}\ndef}");
    }

    #[test]
    fn long_selector_list_is_split() {
        let selector = format!(".alpha-{0}, .beta-{0}, .gamma-{0}, .delta-{0} {{", "x".repeat(14));
        assert!(selector.chars().count() > 80);
        assert_eq!(
            split_long_selectors(&selector),
            format!(".alpha-{0},\n.beta-{0},\n.gamma-{0},\n.delta-{0} {{\n", "x".repeat(14))
        );
    }

    #[test]
    fn short_or_unqualified_selectors_are_kept() {
        assert_eq!(split_long_selectors(".a, .b {"), ".a, .b {\n");
        let no_prefix = format!("div.{0}, span.{0} {{", "y".repeat(40));
        assert_eq!(split_long_selectors(&no_prefix), format!("{}\n", no_prefix));
        let no_comma = format!(".{} {{", "z".repeat(90));
        assert_eq!(split_long_selectors(&no_comma), format!("{}\n", no_comma));
    }

    #[test]
    fn whitespace_is_normalized() {
        assert_eq!(
            normalize_whitespace("a{   \n\tcolor: red ;\n}   \n\n\n"),
            "a {\n    color: red;\n}\n"
        );
        assert_eq!(normalize_whitespace("a  \n\t {\nb: c;\n}"), "a {\nb: c;\n}\n");
    }

    #[test]
    fn blank_line_runs_follow_exact_thresholds() {
        let run = |blank: usize| format!("a\n{}b", "\n".repeat(blank));
        assert_eq!(normalize_whitespace(&run(1)), "a\n\nb\n");
        assert_eq!(normalize_whitespace(&run(2)), "a\n\n\nb\n");
        assert_eq!(normalize_whitespace(&run(3)), "a\n\n\nb\n");
        assert_eq!(normalize_whitespace(&run(4)), "a\n\n\n\n\nb\n");
        assert_eq!(normalize_whitespace(&run(5)), "a\n\n\n\n\nb\n");
        let banner = format!("a\n\n\n{}\n\n\nb\n", horizontal_rule());
        assert_eq!(normalize_whitespace(&run(6)), banner);
        assert_eq!(normalize_whitespace(&run(11)), banner);
    }

    #[test]
    fn horizontal_rule_has_72_dashes() {
        let rule = horizontal_rule();
        assert_eq!(rule.matches('-').count(), 72);
        assert!(rule.starts_with("/* ") && rule.ends_with(" */"));
    }

    #[test]
    fn justify_aligns_values() {
        let css = "a {\n    color: red;\n    margin-top: 0;\n}\n";
        assert_eq!(
            justify_right(css),
            "a {\n    color:      red;\n    margin-top: 0;\n}\n"
        );
    }

    #[test]
    fn justify_skips_imports_and_urls() {
        let css = "@import url(x.css);\na {\n  background: url(http://x/y.png);\n  top: 0;\n}\n";
        assert_eq!(
            justify_right(css),
            "@import url(x.css);\na {\n  background: url(http://x/y.png);\n  top: 0;\n}\n"
        );
    }

    #[test]
    fn justify_skips_imports_in_any_case() {
        let css = "@IMPORT url(\"http://fonts.example.com/a.css\");\na {\ntop:0;\n}\n";
        assert_eq!(
            justify_right(css),
            "@IMPORT url(\"http://fonts.example.com/a.css\");\na {\ntop: 0;\n}\n"
        );
        let only_imports = "@Import url(\"x:y.css\");\n";
        assert_eq!(justify_right(only_imports), only_imports);
    }

    #[test]
    fn justify_without_candidates_returns_input() {
        assert_eq!(justify_right("a {}"), "a {}");
        assert_eq!(justify_right(""), "");
    }

    #[test]
    fn encoding_is_added_once() {
        assert_eq!(add_encoding("a {}\n"), "@charset utf-8;\n\n\na {}\n");
        let declared = "@charset \"UTF-8\";\na {}\n";
        assert_eq!(add_encoding(declared), declared);
        assert_eq!(add_encoding(&add_encoding("x")), add_encoding("x"));
    }

    #[test]
    fn simple_replace_separates_rules() {
        assert_eq!(
            simple_replace("a {\n}\n#b {\n}\n.c {\n}\n*d {\n}\np {\n}\n"),
            "a {\n}\n\n#b {\n}\n\n.c {\n}\n\n*d {\n}\np {\n}\n"
        );
    }

    #[test]
    fn empty_rules_are_removed() {
        assert_eq!(remove_empty_rules("a{}\nb{color:red}"), "\nb{color:red}");
        assert_eq!(remove_empty_rules(".x { }"), ".x { }");
    }
}
