/// Fixed-width content digest of a statement, rendered as 32 lowercase hex characters.
/// Cache keys are built from this value, so changing it orphans every stored entry.
pub fn statement_digest(statement: &str) -> String {
    format!("{:x}", md5::compute(statement.as_bytes()))
}
