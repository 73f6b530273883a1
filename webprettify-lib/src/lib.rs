//! CSS / SCSS and HTML prettifier.
//!
//! CSS is handled as text: declarations are sorted inside each block and a
//! fixed chain of rewrites cleans the result up. HTML is parsed with
//! html5ever and rendered back with one node per line.

pub mod dom;
pub mod error;
pub mod files;
pub mod options;
pub mod prettify;

pub mod parser {
    pub mod html;
    pub mod printer;
}

pub mod style {
    pub mod normalize;
    pub mod properties;
    pub mod sorter;
}

pub use error::{Error, Result};
pub use options::PrettifyOptions;
pub use prettify::{prettify_css, prettify_css_with, prettify_html, prettify_html_bytes};
