//! Signal handling for interaction-triggered browser events.

use crate::code::Fragment;
use crate::error::{CompileError, Result};
use crate::record::ActionRecord;

/// The closed set of interaction-triggered events the generated code must
/// handle. Signal names are an open string set at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Dialog,
    Popup,
    Download,
}

impl SignalKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dialog" => Some(Self::Dialog),
            "popup" => Some(Self::Popup),
            "download" => Some(Self::Download),
            _ => None,
        }
    }
}

/// Apply signal handling around a translated action.
///
/// The nesting order is fixed: popup wraps the raw action, download wraps
/// the popup-wrapped form, and dialog is a registration statement preceding
/// everything (the handler must exist before the action fires, so it is
/// never a nesting wrapper). Repeated signals of one kind are not validated;
/// the last one wins.
pub fn wrap_signals(action: &ActionRecord, body: Fragment) -> Result<Fragment> {
    let mut dialog = false;
    let mut popup = false;
    let mut download = false;
    for signal in &action.signals {
        match SignalKind::parse(&signal.name) {
            Some(SignalKind::Dialog) => dialog = true,
            Some(SignalKind::Popup) => popup = true,
            Some(SignalKind::Download) => download = true,
            None => {
                return Err(CompileError::UnknownSignal {
                    name: signal.name.clone(),
                    record: action.raw.clone(),
                });
            }
        }
    }

    let alias = action.page_alias.as_str();
    let mut fragment = body;

    if popup {
        fragment.prepend(format!(
            "const popupPromise = {alias}.waitForEvent('popup');"
        ));
        fragment.push("const popup = await popupPromise;");
    }
    if download {
        fragment.prepend(format!(
            "const downloadPromise = {alias}.waitForEvent('download');"
        ));
        fragment.push("const download = await downloadPromise;");
    }
    if dialog {
        fragment.prepend(format!(
            "{alias}.once('dialog', dialog => {{ dialog.dismiss().catch(() => {{}}); }});"
        ));
    }
    Ok(fragment)
}
