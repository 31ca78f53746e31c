//! Output assembly: wraps the translated fragments in one of three dialect
//! templates.

use crate::code::Fragment;
use crate::record::RecordingHeader;

/// Output dialect for the assembled source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Full test file with setup and teardown.
    #[default]
    Test,
    /// Standalone script with top-level requires.
    Script,
    /// Bare action list with no wrapping.
    Body,
}

/// Supported launch targets. The header's browser id is a launch-call
/// lookup, not a validation gate; unknown ids fall back to chromium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowserKind {
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    fn from_header(header: &RecordingHeader) -> Self {
        match header.browser_name.as_str() {
            "firefox" => Self::Firefox,
            "webkit" => Self::Webkit,
            _ => Self::Chromium,
        }
    }

    fn module(self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::Webkit => "webkit",
        }
    }
}

/// Assemble the final source text from the header and translated fragments,
/// in recorded order.
pub fn assemble(header: &RecordingHeader, fragments: &[Fragment], format: OutputFormat) -> String {
    match format {
        OutputFormat::Test => assemble_test(header, fragments),
        OutputFormat::Script => assemble_script(header, fragments),
        OutputFormat::Body => assemble_body(fragments),
    }
}

fn assemble_test(header: &RecordingHeader, fragments: &[Fragment]) -> String {
    let module = BrowserKind::from_header(header).module();
    let mut out = String::new();
    out.push_str("const { test, expect } = require('@playwright/test');\n");
    out.push_str(&format!("const {{ {module} }} = require('playwright');\n"));
    out.push('\n');
    out.push_str("test('recorded session', async () => {\n");
    setup(header).render(1, &mut out);
    for fragment in fragments {
        fragment.render(1, &mut out);
    }
    teardown().render(1, &mut out);
    out.push_str("});\n");
    out
}

fn assemble_script(header: &RecordingHeader, fragments: &[Fragment]) -> String {
    let module = BrowserKind::from_header(header).module();
    let mut out = String::new();
    out.push_str("const { expect } = require('@playwright/test');\n");
    out.push_str(&format!("const {{ {module} }} = require('playwright');\n"));
    out.push('\n');
    out.push_str("(async () => {\n");
    setup(header).render(1, &mut out);
    for fragment in fragments {
        fragment.render(1, &mut out);
    }
    teardown().render(1, &mut out);
    out.push_str("})();\n");
    out
}

fn assemble_body(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        fragment.render(0, &mut out);
    }
    out
}

fn setup(header: &RecordingHeader) -> Fragment {
    let module = BrowserKind::from_header(header).module();
    let mut fragment = Fragment::new();
    if header.headless() {
        fragment.push(format!("const browser = await {module}.launch();"));
    } else {
        fragment.push(format!(
            "const browser = await {module}.launch({{ headless: false }});"
        ));
    }
    fragment.push("const context = await browser.newContext();");
    fragment.push("const page = await context.newPage();");
    fragment
}

fn teardown() -> Fragment {
    let mut fragment = Fragment::new();
    fragment.push("await context.close();");
    fragment.push("await browser.close();");
    fragment
}
