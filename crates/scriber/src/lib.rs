//! Scriber: compiles recorded browser sessions into runnable Playwright
//! source.
//!
//! The pipeline is a pure function from the recorder's line-delimited log to
//! source text: decode the header and action stream, resolve each action's
//! locator, translate the action, wrap its signals, and assemble one of
//! three output dialects. Any unrecognized input aborts compilation
//! immediately; there is no partial output.

pub mod actions;
pub mod code;
pub mod emit;
pub mod error;
pub mod frames;
pub mod locator;
pub mod record;
pub mod roles;
pub mod signals;

pub use actions::{decode_modifiers, ActionKind};
pub use emit::OutputFormat;
pub use error::{CompileError, Result};
pub use record::{
    ActionRecord, LaunchOptions, LocatorSpec, Recording, RecordingHeader, Signal,
};
pub use signals::SignalKind;

use tracing::debug;

/// Compile a recorded session into source text in the requested dialect.
///
/// This is the raise-mode entry point: every failure is returned as a
/// structured [`CompileError`] carrying the offending record where one
/// exists. The command-line front end wraps this with terminate-mode
/// diagnostics.
///
/// ```
/// use scriber::{compile, OutputFormat};
///
/// let recording = r#"
/// {"browserName":"chromium"}
/// {"name":"navigate","url":"https://example.com"}
/// "#;
/// let source = compile(recording, OutputFormat::Script).unwrap();
/// assert!(source.contains("await page.goto('https://example.com');"));
/// ```
pub fn compile(input: &str, format: OutputFormat) -> Result<String> {
    let recording = record::parse_recording(input)?;

    let mut fragments = Vec::with_capacity(recording.actions.len());
    for action in &recording.actions {
        fragments.push(actions::translate_action(action)?);
    }

    debug!(fragments = fragments.len(), ?format, "assembling output");
    Ok(emit::assemble(&recording.header, &fragments, format))
}
