//! Logging shorthands shared by every crate in the workspace.

/// Target used for events that report a completed step.
pub const SUCCESS_TARGET: &str = "battcheck::success";

/// Logs a completed step. Rendered with a distinct glyph by the CLI formatter.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: $crate::macros::SUCCESS_TARGET, $($arg)*)
    };
}
