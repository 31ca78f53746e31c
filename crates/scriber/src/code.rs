//! A small code-fragment model for the generated source.
//!
//! Translation produces unindented fragments; the output assembler decides
//! the indent level when rendering, so templates never re-derive indentation
//! at each call site.

/// Fixed indent width shared by every template.
pub const INDENT: &str = "  ";

/// An ordered block of unindented generated statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    lines: Vec<String>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fragment holding a single statement.
    pub fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn prepend(&mut self, line: impl Into<String>) {
        self.lines.insert(0, line.into());
    }

    pub fn append(&mut self, other: Fragment) {
        self.lines.extend(other.lines);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render the fragment with every line shifted right by `indent` levels.
    pub fn render(&self, indent: usize, out: &mut String) {
        for line in &self.lines {
            for _ in 0..indent {
                out.push_str(INDENT);
            }
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// Quote a string as a single-quoted JavaScript literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Quote a string as a template literal, for multi-line snapshot bodies.
pub fn js_template(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('`');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' => out.push_str("\\$"),
            _ => out.push(ch),
        }
    }
    out.push('`');
    out
}

/// Render a list of strings as a JavaScript array literal.
pub fn js_string_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|value| js_string(value)).collect();
    format!("[{}]", items.join(", "))
}
