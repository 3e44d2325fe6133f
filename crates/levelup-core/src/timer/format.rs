/// Render whole seconds as `minutes:seconds`, seconds padded to two digits.
///
/// Minutes are not wrapped into hours, so an hour-long buff reads `60:00`.
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
