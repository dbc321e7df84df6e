//! Process exit codes.

pub const EXIT_SUCCESS: i32 = 0;
/// Completed, but the input had problems (e.g. content failed validation)
pub const EXIT_WARNING: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
