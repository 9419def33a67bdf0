pub mod auth;
pub mod clock;
pub mod config;
pub mod edit;
pub mod init;
pub mod log;
pub mod month;
pub mod status;

use crate::errors::{AppResult, LifecycleError, LifecycleResult};
use crate::ui::messages::warning;

/// Turn a lifecycle outcome into a command outcome.
///
/// Refusals (already working, not working, ...) are shown as warnings and
/// yield `None`; storage failures propagate as errors.
pub fn report<T>(res: LifecycleResult<T>) -> AppResult<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(LifecycleError::Store(e)) => Err(e),
        Err(refused) => {
            warning(refused);
            Ok(None)
        }
    }
}
