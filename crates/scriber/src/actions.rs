//! Action translation: the central dispatch from recorded action kinds to
//! code fragments.

use serde_json::Value;
use tracing::debug;

use crate::code::{js_string, js_string_list, js_template, Fragment};
use crate::error::{CompileError, Result};
use crate::frames::build_frame_chain;
use crate::locator::resolve_locator;
use crate::record::ActionRecord;
use crate::signals::wrap_signals;

/// The closed set of recorded action kinds.
///
/// The recorder emits an open string set; translation narrows it here, and
/// anything outside the set aborts compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    OpenPage,
    ClosePage,
    Navigate,
    Click,
    Fill,
    Press,
    Hover,
    Check,
    Uncheck,
    Select,
    SetInputFiles,
    AssertText,
    AssertValue,
    AssertChecked,
    AssertVisible,
    AssertSnapshot,
}

impl ActionKind {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "openPage" => Self::OpenPage,
            "closePage" => Self::ClosePage,
            "navigate" => Self::Navigate,
            "click" => Self::Click,
            "fill" => Self::Fill,
            "press" => Self::Press,
            "hover" => Self::Hover,
            "check" => Self::Check,
            "uncheck" => Self::Uncheck,
            "select" => Self::Select,
            "setInputFiles" => Self::SetInputFiles,
            "assertText" => Self::AssertText,
            "assertValue" => Self::AssertValue,
            "assertChecked" => Self::AssertChecked,
            "assertVisible" => Self::AssertVisible,
            "assertSnapshot" => Self::AssertSnapshot,
            _ => return None,
        })
    }
}

/// Keyboard modifier bits in canonical rendering order.
const MODIFIER_BITS: [(u32, &str); 4] = [
    (1, "Alt"),
    (2, "ControlOrMeta"),
    (4, "Meta"),
    (8, "Shift"),
];

/// Decode a modifier mask into its canonical, order-stable name list.
pub fn decode_modifiers(mask: u32) -> Vec<&'static str> {
    MODIFIER_BITS
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|&(_, name)| name)
        .collect()
}

/// Translate one action record into its unindented code fragment: frame
/// bindings first, then the signal-wrapped action statement.
pub fn translate_action(action: &ActionRecord) -> Result<Fragment> {
    let kind = ActionKind::parse(&action.name).ok_or_else(|| CompileError::UnknownAction {
        kind: action.name.clone(),
        record: action.raw.clone(),
    })?;
    debug!(kind = %action.name, alias = %action.page_alias, "translating action");

    let (frames, root) = build_frame_chain(action);
    let body = translate_kind(kind, action, &root)?;
    let wrapped = wrap_signals(action, body)?;

    let mut fragment = frames;
    fragment.append(wrapped);
    Ok(fragment)
}

fn translate_kind(kind: ActionKind, action: &ActionRecord, root: &str) -> Result<Fragment> {
    let alias = action.page_alias.as_str();
    Ok(match kind {
        ActionKind::OpenPage => {
            // The templates bind the primary page themselves.
            if alias == "page" {
                Fragment::new()
            } else {
                Fragment::line(format!("const {alias} = await context.newPage();"))
            }
        }
        ActionKind::ClosePage => Fragment::line(format!("await {alias}.close();")),
        ActionKind::Navigate => Fragment::line(format!(
            "await {alias}.goto({});",
            js_string(action.url.as_deref().unwrap_or_default())
        )),
        ActionKind::Click => click_fragment(action, root)?,
        ActionKind::Fill => Fragment::line(format!(
            "await {}.fill({});",
            resolve_locator(action, root)?,
            js_string(action.text.as_deref().unwrap_or_default())
        )),
        ActionKind::Press => {
            let locator = resolve_locator(action, root)?;
            let combo = key_combination(action.modifiers, action.key.as_deref().unwrap_or_default());
            Fragment::line(format!("await {locator}.press({});", js_string(&combo)))
        }
        ActionKind::Hover => {
            Fragment::line(format!("await {}.hover();", resolve_locator(action, root)?))
        }
        ActionKind::Check => {
            Fragment::line(format!("await {}.check();", resolve_locator(action, root)?))
        }
        ActionKind::Uncheck => {
            Fragment::line(format!("await {}.uncheck();", resolve_locator(action, root)?))
        }
        ActionKind::Select => {
            let locator = resolve_locator(action, root)?;
            let values = match action.options.as_slice() {
                [single] => js_string(single),
                options => js_string_list(options),
            };
            Fragment::line(format!("await {locator}.selectOption({values});"))
        }
        ActionKind::SetInputFiles => files_fragment(action, root)?,
        ActionKind::AssertText => {
            let locator = resolve_locator(action, root)?;
            let matcher = if action.substring {
                "toContainText"
            } else {
                "toHaveText"
            };
            Fragment::line(format!(
                "await expect({locator}).{matcher}({});",
                js_string(action.text.as_deref().unwrap_or_default())
            ))
        }
        ActionKind::AssertValue => {
            let locator = resolve_locator(action, root)?;
            match action.value.as_deref() {
                Some(value) if !value.is_empty() => Fragment::line(format!(
                    "await expect({locator}).toHaveValue({});",
                    js_string(value)
                )),
                _ => Fragment::line(format!("await expect({locator}).toBeEmpty();")),
            }
        }
        ActionKind::AssertChecked => {
            let locator = resolve_locator(action, root)?;
            if action.checked {
                Fragment::line(format!("await expect({locator}).toBeChecked();"))
            } else {
                Fragment::line(format!("await expect({locator}).not.toBeChecked();"))
            }
        }
        ActionKind::AssertVisible => Fragment::line(format!(
            "await expect({}).toBeVisible();",
            resolve_locator(action, root)?
        )),
        ActionKind::AssertSnapshot => Fragment::line(format!(
            "await expect({}).toMatchAriaSnapshot({});",
            resolve_locator(action, root)?,
            js_template(action.snapshot.as_deref().unwrap_or_default())
        )),
    })
}

/// Render a key with its modifier mask as a `+`-joined combination.
fn key_combination(mask: u32, key: &str) -> String {
    let modifiers = decode_modifiers(mask);
    if modifiers.is_empty() {
        key.to_string()
    } else {
        format!("{}+{}", modifiers.join("+"), key)
    }
}

fn click_fragment(action: &ActionRecord, root: &str) -> Result<Fragment> {
    let locator = resolve_locator(action, root)?;
    let modifiers = decode_modifiers(action.modifiers);
    let button = action.button.as_deref().filter(|button| *button != "left");
    let plain = modifiers.is_empty() && button.is_none() && action.position.is_none();

    if plain && action.click_count == 1 {
        return Ok(Fragment::line(format!("await {locator}.click();")));
    }
    if plain && action.click_count == 2 {
        return Ok(Fragment::line(format!("await {locator}.dblclick();")));
    }

    let mut options = Vec::new();
    if let Some(button) = button {
        options.push(format!("button: {}", js_string(button)));
    }
    if !modifiers.is_empty() {
        let names: Vec<String> = modifiers.iter().map(|name| js_string(name)).collect();
        options.push(format!("modifiers: [{}]", names.join(", ")));
    }
    if let Some(position) = action.position {
        options.push(format!(
            "position: {{ x: {}, y: {} }}",
            position.x, position.y
        ));
    }
    if action.click_count != 1 {
        options.push(format!("clickCount: {}", action.click_count));
    }
    Ok(Fragment::line(format!(
        "await {locator}.click({{ {} }});",
        options.join(", ")
    )))
}

fn files_fragment(action: &ActionRecord, root: &str) -> Result<Fragment> {
    let locator = resolve_locator(action, root)?;
    let malformed = || CompileError::MalformedFilesField {
        record: action.raw.clone(),
    };

    let rendered = match action.files.as_ref().ok_or_else(malformed)? {
        Value::String(path) => js_string(path),
        Value::Array(items) => {
            let mut paths = Vec::with_capacity(items.len());
            for item in items {
                paths.push(item.as_str().ok_or_else(malformed)?.to_string());
            }
            match paths.as_slice() {
                [] => return Err(malformed()),
                [single] => js_string(single),
                _ => js_string_list(&paths),
            }
        }
        _ => return Err(malformed()),
    };
    Ok(Fragment::line(format!(
        "await {locator}.setInputFiles({rendered});"
    )))
}
