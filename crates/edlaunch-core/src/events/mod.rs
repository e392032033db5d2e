use tracing::{error, info, warn};

use crate::errors::LauncherError;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

/// Log an error at `warn` when the user caused it, `error` otherwise.
pub fn log_app_error(error: &dyn LauncherError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.user_error",
            error_code = error.error_code(),
            error = %error
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error_code = error.error_code(),
            error = %error
        );
    }
}
