//! Locator resolution: turns a recorded locator description into the
//! canonical call expression rooted at the page or frame binding in scope.

use tracing::debug;

use crate::code::js_string;
use crate::error::{CompileError, Result};
use crate::record::{ActionRecord, LocatorSpec, TaggedLocator};
use crate::roles::resolve_role;

/// Produce the canonical locator call for `action`, rooted at `root` (the
/// page alias, or the innermost frame binding when the action targets a
/// nested frame).
///
/// Resolution order: structured locator first (tagged object, then the
/// legacy `kind`/`body` encoding, then bare-string CSS), then the raw
/// selector mini-syntax, then failure.
pub fn resolve_locator(action: &ActionRecord, root: &str) -> Result<String> {
    match &action.locator {
        Some(LocatorSpec::Tagged(tagged)) => resolve_tagged(tagged, action, root),
        Some(LocatorSpec::Css(css)) => Ok(format!("{root}.locator({})", js_string(css))),
        Some(LocatorSpec::Chain(_)) => Err(CompileError::ChainedLocatorUnsupported {
            record: action.raw.clone(),
        }),
        None => match &action.selector {
            Some(selector) => resolve_raw_selector(selector, action, root),
            None => Err(CompileError::NoLocator {
                record: action.raw.clone(),
            }),
        },
    }
}

fn resolve_tagged(tagged: &TaggedLocator, action: &ActionRecord, root: &str) -> Result<String> {
    if let Some(role) = &tagged.role {
        let canonical = canonical_role(role, action)?;
        return Ok(role_call(root, canonical, tagged.name.as_deref()));
    }
    if let Some(text) = &tagged.text {
        return Ok(format!("{root}.getByText({})", js_string(text)));
    }
    if let Some(label) = &tagged.label {
        return Ok(format!("{root}.getByLabel({})", js_string(label)));
    }
    if let Some(placeholder) = &tagged.placeholder {
        return Ok(format!("{root}.getByPlaceholder({})", js_string(placeholder)));
    }
    if let Some(test_id) = &tagged.test_id {
        return Ok(format!("{root}.getByTestId({})", js_string(test_id)));
    }
    if let Some(alt_text) = &tagged.alt_text {
        return Ok(format!("{root}.getByAltText({})", js_string(alt_text)));
    }
    if let Some(title) = &tagged.title {
        return Ok(format!("{root}.getByTitle({})", js_string(title)));
    }
    if let Some(css) = &tagged.css {
        return Ok(format!("{root}.locator({})", js_string(css)));
    }

    // Legacy `kind`/`body` schema: only role lookups ever used this encoding.
    if let Some(kind) = &tagged.kind {
        if kind == "role" {
            let body = tagged.body.as_deref().unwrap_or_default();
            let canonical = canonical_role(body, action)?;
            let name = tagged
                .attrs
                .iter()
                .find(|attr| attr.name == "name")
                .and_then(|attr| attr.value.as_str());
            return Ok(role_call(root, canonical, name));
        }
        return Err(CompileError::UnrecognizedLocatorFormat {
            detail: format!("legacy locator kind '{kind}'"),
            record: action.raw.clone(),
        });
    }

    Err(CompileError::UnrecognizedLocatorFormat {
        detail: "object carries no recognized locator tag".to_string(),
        record: action.raw.clone(),
    })
}

fn role_call(root: &str, role: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!(
            "{root}.getByRole({}, {{ name: {}, exact: true }})",
            js_string(role),
            js_string(name)
        ),
        None => format!("{root}.getByRole({})", js_string(role)),
    }
}

fn canonical_role(role: &str, action: &ActionRecord) -> Result<&'static str> {
    resolve_role(role).ok_or_else(|| CompileError::UnknownAriaRole {
        role: role.to_string(),
        record: action.raw.clone(),
    })
}

/// Ordered matchers for the engine's internal selector mini-syntax. Anything
/// the matchers cannot claim falls back to raw CSS.
fn resolve_raw_selector(selector: &str, action: &ActionRecord, root: &str) -> Result<String> {
    if let Some(rest) = selector.strip_prefix("internal:role=") {
        let (role_part, attrs) = match rest.find('[') {
            Some(index) => (&rest[..index], &rest[index..]),
            None => (rest, ""),
        };
        let canonical = canonical_role(role_part.trim(), action)?;
        return Ok(role_call(root, canonical, attribute_value(attrs, "name")));
    }
    if let Some(rest) = selector.strip_prefix("internal:text=") {
        if let Some(text) = quoted_value(rest) {
            return Ok(format!("{root}.getByText({})", js_string(text)));
        }
    }
    if let Some(rest) = selector.strip_prefix("internal:label=") {
        if let Some(label) = quoted_value(rest) {
            return Ok(format!("{root}.getByLabel({})", js_string(label)));
        }
    }
    if let Some(rest) = selector.strip_prefix("internal:testid=") {
        if let Some(id) = quoted_value(rest) {
            return Ok(format!("{root}.getByTestId({})", js_string(id)));
        }
    }
    if let Some(rest) = selector.strip_prefix("internal:attr=") {
        if let Some(placeholder) = attribute_value(rest, "placeholder") {
            return Ok(format!("{root}.getByPlaceholder({})", js_string(placeholder)));
        }
    }

    debug!(selector, "selector did not match internal syntax, treating as CSS");
    Ok(format!("{root}.locator({})", js_string(selector)))
}

/// Extract the quoted value of `key` from a `[key="value"]` attribute list.
fn attribute_value<'a>(input: &'a str, key: &str) -> Option<&'a str> {
    let mut rest = input;
    while let Some(start) = rest.find('[') {
        let end = rest[start..].find(']')? + start;
        let body = &rest[start + 1..end];
        if let Some((attr_key, attr_value)) = body.split_once('=') {
            if attr_key.trim() == key {
                return quoted_value(attr_value);
            }
        }
        rest = &rest[end + 1..];
    }
    None
}

/// Extract a double-quoted value, tolerating a trailing match-mode flag
/// (`"Submit"s`, `"submit"i`).
fn quoted_value(input: &str) -> Option<&str> {
    let rest = input.trim().strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action(value: serde_json::Value) -> ActionRecord {
        let mut action: ActionRecord = serde_json::from_value(value.clone()).unwrap();
        action.raw = value;
        action
    }

    #[test]
    fn role_locator_without_name_filter() {
        let action = action(json!({"name": "click", "locator": {"role": "button"}}));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.getByRole('button')"
        );
    }

    #[test]
    fn role_locator_with_name_filter_is_exact() {
        let action = action(json!({
            "name": "click",
            "locator": {"role": "button", "name": "Submit"}
        }));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.getByRole('button', { name: 'Submit', exact: true })"
        );
    }

    #[test]
    fn role_names_resolve_case_insensitively() {
        let action = action(json!({"name": "click", "locator": {"role": "Button"}}));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.getByRole('button')"
        );
    }

    #[test]
    fn unknown_role_fails_naming_the_string() {
        let action = action(json!({"name": "click", "locator": {"role": "teleporter"}}));
        match resolve_locator(&action, "page") {
            Err(CompileError::UnknownAriaRole { role, .. }) => assert_eq!(role, "teleporter"),
            other => panic!("expected unknown role, got {other:?}"),
        }
    }

    #[test]
    fn each_tag_maps_to_its_call() {
        let cases = [
            (json!({"text": "Sign in"}), "page.getByText('Sign in')"),
            (json!({"label": "Email"}), "page.getByLabel('Email')"),
            (
                json!({"placeholder": "you@example.com"}),
                "page.getByPlaceholder('you@example.com')",
            ),
            (json!({"testId": "cta"}), "page.getByTestId('cta')"),
            (json!({"altText": "Logo"}), "page.getByAltText('Logo')"),
            (json!({"title": "Close"}), "page.getByTitle('Close')"),
            (json!({"css": "div.card"}), "page.locator('div.card')"),
        ];
        for (locator, expected) in cases {
            let action = action(json!({"name": "click", "locator": locator}));
            assert_eq!(resolve_locator(&action, "page").unwrap(), expected);
        }
    }

    #[test]
    fn bare_string_locator_is_css() {
        let action = action(json!({"name": "click", "locator": "#login > button"}));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.locator('#login > button')"
        );
    }

    #[test]
    fn chained_locators_are_unsupported() {
        let action = action(json!({"name": "click", "locator": [{"role": "list"}, {"text": "x"}]}));
        assert!(matches!(
            resolve_locator(&action, "page"),
            Err(CompileError::ChainedLocatorUnsupported { .. })
        ));
    }

    #[test]
    fn legacy_role_encoding_resolves_with_name_attr() {
        let action = action(json!({
            "name": "click",
            "locator": {
                "kind": "role",
                "body": "button",
                "attrs": [{"name": "name", "value": "Submit"}]
            }
        }));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.getByRole('button', { name: 'Submit', exact: true })"
        );
    }

    #[test]
    fn legacy_role_encoding_without_attrs() {
        let action = action(json!({"name": "click", "locator": {"kind": "role", "body": "link"}}));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.getByRole('link')"
        );
    }

    #[test]
    fn legacy_non_role_kind_is_fatal() {
        let action = action(json!({"name": "click", "locator": {"kind": "xpath", "body": "//a"}}));
        match resolve_locator(&action, "page") {
            Err(CompileError::UnrecognizedLocatorFormat { detail, .. }) => {
                assert!(detail.contains("xpath"));
            }
            other => panic!("expected unrecognized format, got {other:?}"),
        }
    }

    #[test]
    fn untagged_object_is_fatal() {
        let action = action(json!({"name": "click", "locator": {"mystery": true}}));
        assert!(matches!(
            resolve_locator(&action, "page"),
            Err(CompileError::UnrecognizedLocatorFormat { .. })
        ));
    }

    #[test]
    fn internal_role_selector_parses() {
        let action = action(json!({"name": "click", "selector": "internal:role=button"}));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.getByRole('button')"
        );
    }

    #[test]
    fn internal_role_selector_extracts_name_attribute() {
        let action = action(json!({
            "name": "click",
            "selector": "internal:role=button[name=\"Submit\"s]"
        }));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.getByRole('button', { name: 'Submit', exact: true })"
        );
    }

    #[test]
    fn internal_text_label_and_testid_selectors_parse() {
        let cases = [
            ("internal:text=\"Sign in\"i", "page.getByText('Sign in')"),
            ("internal:label=\"Email\"", "page.getByLabel('Email')"),
            ("internal:testid=\"cta\"", "page.getByTestId('cta')"),
        ];
        for (selector, expected) in cases {
            let action = action(json!({"name": "click", "selector": selector}));
            assert_eq!(resolve_locator(&action, "page").unwrap(), expected);
        }
    }

    #[test]
    fn internal_attr_selector_extracts_placeholder() {
        let action = action(json!({
            "name": "click",
            "selector": "internal:attr=[placeholder=\"Search…\"]"
        }));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.getByPlaceholder('Search…')"
        );
    }

    #[test]
    fn unmatched_raw_selector_falls_back_to_css() {
        let action = action(json!({"name": "click", "selector": "div.card >> nth=2"}));
        assert_eq!(
            resolve_locator(&action, "page").unwrap(),
            "page.locator('div.card >> nth=2')"
        );
    }

    #[test]
    fn missing_locator_and_selector_is_fatal() {
        let action = action(json!({"name": "click"}));
        assert!(matches!(
            resolve_locator(&action, "page"),
            Err(CompileError::NoLocator { .. })
        ));
    }

    #[test]
    fn resolution_roots_at_the_given_binding() {
        let action = action(json!({"name": "click", "locator": {"role": "button"}}));
        assert_eq!(
            resolve_locator(&action, "frame1").unwrap(),
            "frame1.getByRole('button')"
        );
    }
}
