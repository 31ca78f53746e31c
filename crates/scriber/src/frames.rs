//! Frame-chain expansion for actions targeting elements inside nested
//! iframes.

use crate::code::{js_string, Fragment};
use crate::record::ActionRecord;

/// Expand an action's frame path into sequential frame bindings.
///
/// Returns the binding statements and the name of the locator root the
/// action should resolve against: the page alias when the path is empty,
/// otherwise the last frame binding. Each binding drills down from the
/// previous one.
pub fn build_frame_chain(action: &ActionRecord) -> (Fragment, String) {
    let mut fragment = Fragment::new();
    let mut root = action.page_alias.clone();

    for (index, selector) in action.frame_path.iter().enumerate() {
        let binding = format!("frame{index}");
        fragment.push(format!(
            "const {binding} = {root}.frameLocator({});",
            js_string(selector)
        ));
        root = binding;
    }

    (fragment, root)
}
