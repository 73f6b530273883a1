use crate::error::{Error, Result};
use crate::options::PrettifyOptions;
use crate::parser::{html, printer};
use crate::style::normalize;
use crate::style::properties::PropertyTable;
use crate::style::sorter;

/// Prettify CSS / SCSS text.
///
/// Sorts declarations inside every block, then runs the normalizer stages in
/// their fixed order. Never fails; blank input is returned as it is.
pub fn prettify_css(css: &str, options: &PrettifyOptions) -> String {
    if css.trim().is_empty() {
        return css.to_string();
    }
    log::info!("Prettify CSS / SCSS...");

    let table = PropertyTable::builtin(options.grouped);
    let mut css = sorter::sort_properties(css, table);
    if options.remove_empty_rules {
        css = normalize::remove_empty_rules(&css);
    }
    css = normalize::condense_zero_units(&css);
    css = normalize::wrap_css_lines(&css, options.wrap_width);
    css = normalize::split_long_selectors(&css);
    css = normalize::condense_semicolons(&css);
    css = normalize::normalize_whitespace(&css);
    if options.justify {
        css = normalize::justify_right(&css);
    }
    css = normalize::add_encoding(&css);
    css = normalize::simple_replace(&css);

    log::info!("Finished prettify CSS / SCSS");
    css
}

/// [`prettify_css`] with only the two classic switches.
pub fn prettify_css_with(css: &str, justify: bool, grouped: bool) -> String {
    prettify_css(css, &PrettifyOptions::new().justify(justify).grouped(grouped))
}

/// Prettify HTML, indenting each nesting level by `indent_width` spaces.
pub fn prettify_html(html_content: &str, indent_width: usize) -> Result<String> {
    log::info!("Prettify HTML...");
    let document = html::create_dom_tree(html_content)?;
    let rendered = printer::render_document(&document, indent_width);
    let mut pretty = rendered.replace('\t', "    ").trim().to_string();
    pretty.push('\n');
    log::info!("Finished prettify HTML");
    Ok(pretty)
}

/// [`prettify_html`] for raw bytes, which must be UTF-8. A leading byte
/// order mark is skipped.
pub fn prettify_html_bytes(bytes: &[u8], indent_width: usize) -> Result<String> {
    let html_content = decode_utf8(bytes)?;
    prettify_html(html_content, indent_width)
}

/// Decodes UTF-8 text, skipping a byte order mark.
pub fn decode_utf8(bytes: &[u8]) -> Result<&str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map_err(|e| Error::parse(format!("input is not valid UTF-8: {}", e)))
}
