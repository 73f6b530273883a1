/// Line length after which `}` may end a line when re-wrapping CSS.
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// Spaces per nesting level in prettified HTML.
pub const DEFAULT_HTML_INDENT: usize = 4;

/// Knobs for one prettify run, passed explicitly to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettifyOptions {
    /// Align declaration values into one column.
    pub justify: bool,
    /// Keep catalogue groups apart with a blank line.
    pub grouped: bool,
    /// Drop `selector{}` rules before normalizing.
    pub remove_empty_rules: bool,
    pub wrap_width: usize,
    pub html_indent_width: usize,
}

impl Default for PrettifyOptions {
    fn default() -> Self {
        PrettifyOptions {
            justify: false,
            grouped: false,
            remove_empty_rules: false,
            wrap_width: DEFAULT_WRAP_WIDTH,
            html_indent_width: DEFAULT_HTML_INDENT,
        }
    }
}

impl PrettifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn justify(mut self, justify: bool) -> Self {
        self.justify = justify;
        self
    }

    pub fn grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    pub fn remove_empty_rules(mut self, remove: bool) -> Self {
        self.remove_empty_rules = remove;
        self
    }

    pub fn wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    pub fn html_indent_width(mut self, width: usize) -> Self {
        self.html_indent_width = width;
        self
    }
}
