use serde_json::Value;
use thiserror::Error;

/// Everything that can abort a compilation.
///
/// All variants are terminal: the pipeline never retries or produces partial
/// output. Variants that concern one specific action carry its full decoded
/// record so callers can reproduce the failure.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Recording is empty: no non-blank lines found")]
    EmptyInput,

    #[error("Recording contains a header but no actions")]
    NoActionsRecorded,

    #[error("Malformed recording line: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        line: String,
    },

    #[error("Unknown action kind: '{kind}'")]
    UnknownAction { kind: String, record: Value },

    #[error("Unknown signal: '{name}'")]
    UnknownSignal { name: String, record: Value },

    #[error("Unrecognized locator format: {detail}")]
    UnrecognizedLocatorFormat { detail: String, record: Value },

    #[error("Unknown ARIA role: '{role}'")]
    UnknownAriaRole { role: String, record: Value },

    #[error("Malformed files field: expected a path or a non-empty list of paths")]
    MalformedFilesField { record: Value },

    #[error("Chained locators are not supported")]
    ChainedLocatorUnsupported { record: Value },

    #[error("Action is not page-level but carries no locator or selector")]
    NoLocator { record: Value },
}

impl CompileError {
    /// The full offending record, when the failure concerns a single action.
    pub fn offending_record(&self) -> Option<&Value> {
        match self {
            Self::UnknownAction { record, .. }
            | Self::UnknownSignal { record, .. }
            | Self::UnrecognizedLocatorFormat { record, .. }
            | Self::UnknownAriaRole { record, .. }
            | Self::MalformedFilesField { record }
            | Self::ChainedLocatorUnsupported { record }
            | Self::NoLocator { record } => Some(record),
            Self::EmptyInput | Self::NoActionsRecorded | Self::Decode { .. } => None,
        }
    }

    /// Remediation guidance rendered by terminate-mode diagnostics.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::NoActionsRecorded => {
                "Record at least one interaction before exporting."
            }
            Self::Decode { .. } => {
                "The recording file is corrupt; re-export it from the recorder."
            }
            _ => {
                "This recording is unsupported; fix the offending action or translate it by hand."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
