use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{CompileError, Result};

/// Launch configuration captured by the recorder alongside the browser id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOptions {
    pub headless: Option<bool>,
}

/// First line of a recording: which browser was driven and how it was
/// launched. Read once, never mutated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingHeader {
    pub browser_name: String,
    #[serde(default)]
    pub launch_options: LaunchOptions,
}

impl RecordingHeader {
    /// Headless unless the recorder explicitly launched headed.
    pub fn headless(&self) -> bool {
        self.launch_options.headless.unwrap_or(true)
    }
}

/// A point within the target element, in element-local coordinates.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One interaction-triggered browser event attached to an action.
#[derive(Debug, Clone, Deserialize)]
pub struct Signal {
    pub name: String,
}

/// One attribute of a legacy locator encoding.
#[derive(Debug, Clone, Deserialize)]
pub struct LocatorAttr {
    pub name: String,
    pub value: Value,
}

/// The tagged-object locator encoding. Exactly one tag is populated per
/// instance; the `kind`/`body` pair is a historical schema version that only
/// ever carried role lookups.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedLocator {
    pub role: Option<String>,
    /// Exact-name filter for role locators.
    pub name: Option<String>,
    pub text: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub test_id: Option<String>,
    pub alt_text: Option<String>,
    pub title: Option<String>,
    pub css: Option<String>,
    pub kind: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub attrs: Vec<LocatorAttr>,
}

/// How the recorder described the target element. The wire shapes are
/// incompatible (object vs. bare string vs. array), so this decodes as an
/// untagged union.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocatorSpec {
    Tagged(Box<TaggedLocator>),
    /// Bare string form: raw CSS.
    Css(String),
    /// Array form: chained locators. Recorded by newer schema versions but
    /// not translatable here.
    Chain(Vec<Value>),
}

/// One recorded interaction, the atomic unit of translation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    /// Kind tag. Open string set at the boundary, narrowed to the closed
    /// [`crate::ActionKind`] set during translation.
    pub name: String,
    /// Which open page/tab the action targets.
    #[serde(default = "default_page_alias")]
    pub page_alias: String,
    pub locator: Option<LocatorSpec>,
    /// Raw engine selector, recorded when no structured locator was
    /// available.
    pub selector: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub key: Option<String>,
    /// Bit-encoded keyboard modifiers (Alt=1, ControlOrMeta=2, Meta=4,
    /// Shift=8).
    #[serde(default)]
    pub modifiers: u32,
    #[serde(default = "default_click_count")]
    pub click_count: u32,
    pub position: Option<Position>,
    pub button: Option<String>,
    /// Path or list of paths for file-input actions.
    pub files: Option<Value>,
    /// Values for select actions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Contains-match instead of exact-match for text assertions.
    #[serde(default)]
    pub substring: bool,
    /// Expected state for checked assertions.
    #[serde(default)]
    pub checked: bool,
    pub value: Option<String>,
    pub snapshot: Option<String>,
    #[serde(default)]
    pub signals: Vec<Signal>,
    /// Selectors locating the chain of nested frames down to the target.
    #[serde(default)]
    pub frame_path: Vec<String>,
    /// Full decoded line, kept verbatim for diagnostics.
    #[serde(skip)]
    pub raw: Value,
}

fn default_page_alias() -> String {
    "page".to_string()
}

fn default_click_count() -> u32 {
    1
}

/// A fully decoded recording: one header plus the ordered action stream.
#[derive(Debug, Clone)]
pub struct Recording {
    pub header: RecordingHeader,
    pub actions: Vec<ActionRecord>,
}

/// Decode a line-delimited recording blob.
///
/// The first non-blank line is the header; every following non-blank line is
/// one action record. Actions keep their recorded order throughout the
/// pipeline.
pub fn parse_recording(input: &str) -> Result<Recording> {
    let mut lines = input.lines().map(str::trim).filter(|line| !line.is_empty());

    let header_line = lines.next().ok_or(CompileError::EmptyInput)?;
    let header: RecordingHeader =
        serde_json::from_str(header_line).map_err(|source| CompileError::Decode {
            source,
            line: header_line.to_string(),
        })?;

    let mut actions = Vec::new();
    for line in lines {
        let raw: Value = serde_json::from_str(line).map_err(|source| CompileError::Decode {
            source,
            line: line.to_string(),
        })?;
        let mut action: ActionRecord =
            serde_json::from_value(raw.clone()).map_err(|source| CompileError::Decode {
                source,
                line: line.to_string(),
            })?;
        action.raw = raw;
        actions.push(action);
    }

    if actions.is_empty() {
        return Err(CompileError::NoActionsRecorded);
    }

    debug!(
        browser = %header.browser_name,
        actions = actions.len(),
        "decoded recording"
    );
    Ok(Recording { header, actions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_actions() {
        let input = concat!(
            "{\"browserName\":\"firefox\",\"launchOptions\":{\"headless\":false}}\n",
            "{\"name\":\"navigate\",\"url\":\"https://example.com\"}\n",
            "{\"name\":\"click\",\"selector\":\"#go\",\"clickCount\":2}\n",
        );
        let recording = parse_recording(input).unwrap();

        assert_eq!(recording.header.browser_name, "firefox");
        assert!(!recording.header.headless());
        assert_eq!(recording.actions.len(), 2);
        assert_eq!(recording.actions[0].name, "navigate");
        assert_eq!(
            recording.actions[0].url.as_deref(),
            Some("https://example.com")
        );
        assert_eq!(recording.actions[1].click_count, 2);
    }

    #[test]
    fn blank_lines_carry_no_meaning() {
        let input = "\n\n{\"browserName\":\"chromium\"}\n\n{\"name\":\"navigate\",\"url\":\"x\"}\n\n";
        let recording = parse_recording(input).unwrap();
        assert_eq!(recording.actions.len(), 1);
    }

    #[test]
    fn defaults_apply_to_omitted_fields() {
        let input = "{\"browserName\":\"chromium\"}\n{\"name\":\"click\",\"selector\":\"#go\"}\n";
        let recording = parse_recording(input).unwrap();
        let action = &recording.actions[0];

        assert_eq!(action.page_alias, "page");
        assert_eq!(action.click_count, 1);
        assert_eq!(action.modifiers, 0);
        assert!(action.signals.is_empty());
        assert!(action.frame_path.is_empty());
        assert!(recording.header.headless());
    }

    #[test]
    fn raw_record_is_retained() {
        let input = "{\"browserName\":\"chromium\"}\n{\"name\":\"click\",\"selector\":\"#go\"}\n";
        let recording = parse_recording(input).unwrap();
        assert_eq!(recording.actions[0].raw["selector"], "#go");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            parse_recording("  \n \n"),
            Err(CompileError::EmptyInput)
        ));
        assert!(matches!(parse_recording(""), Err(CompileError::EmptyInput)));
    }

    #[test]
    fn header_only_input_is_rejected() {
        assert!(matches!(
            parse_recording("{\"browserName\":\"chromium\"}\n"),
            Err(CompileError::NoActionsRecorded)
        ));
    }

    #[test]
    fn malformed_line_is_a_decode_failure() {
        let input = "{\"browserName\":\"chromium\"}\nnot json\n";
        match parse_recording(input) {
            Err(CompileError::Decode { line, .. }) => assert_eq!(line, "not json"),
            other => panic!("expected decode failure, got {other:?}"),
        }
    }

    #[test]
    fn locator_spec_decodes_all_three_shapes() {
        let tagged: LocatorSpec =
            serde_json::from_str("{\"role\":\"button\",\"name\":\"Go\"}").unwrap();
        assert!(matches!(tagged, LocatorSpec::Tagged(_)));

        let css: LocatorSpec = serde_json::from_str("\"div.card\"").unwrap();
        assert!(matches!(css, LocatorSpec::Css(_)));

        let chain: LocatorSpec = serde_json::from_str("[{\"role\":\"list\"}]").unwrap();
        assert!(matches!(chain, LocatorSpec::Chain(_)));
    }
}
