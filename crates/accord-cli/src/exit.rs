//! Process exit codes.

use accord_engine::EngineError;

pub const SUCCESS: i32 = 0;
/// Usage, configuration, or startup failure.
pub const USAGE: i32 = 1;
/// Some files of an upload could not be located.
pub const UNRESOLVED: i32 = 2;
/// The run record could not be written.
pub const RUN_RECORD: i32 = 5;
/// A verdict could not be stored.
pub const PERSISTENCE: i32 = 20;

#[must_use]
pub const fn for_engine_error(error: &EngineError) -> i32 {
    match error {
        EngineError::Unresolved { .. } => UNRESOLVED,
        EngineError::RunRecord(_) => RUN_RECORD,
        EngineError::Persistence(_) => PERSISTENCE,
        _ => USAGE,
    }
}
