//! Operation names a static query is expected to understand.

pub const GET: &str = "get";
pub const FIRST: &str = "first";
pub const COUNT: &str = "count";
pub const EXISTS: &str = "exists";
pub const DOESNT_EXIST: &str = "doesnt_exist";
pub const UPDATE: &str = "update";
pub const INSERT: &str = "insert";
pub const DELETE: &str = "delete";

/// Triggers that write to storage, whatever statement the query renders.
pub fn is_mutating(trigger: &str) -> bool {
    [UPDATE, INSERT, DELETE]
        .iter()
        .any(|name| trigger.eq_ignore_ascii_case(name))
}
