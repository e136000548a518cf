//! Message severities and the user-visible message format.
//!
//! A message is emitted iff its level is at least the interpreter's current
//! verbosity. `M_QUIET` is above every real level, so it suppresses all of
//! them.

pub const M_ALL: i32 = 0;
pub const M_DEBUG: i32 = 5;
pub const M_STATUS: i32 = 7;
pub const M_INFO: i32 = 10;
pub const M_DEPRECATED: i32 = 18;
pub const M_WARNING: i32 = 20;
pub const M_ERROR: i32 = 30;
pub const M_FATAL: i32 = 40;
pub const M_QUIET: i32 = 100;

/// Named levels, in ascending order. Also bound in `systemdict` as `M_ALL` ...
pub const LEVELS: [(&str, i32); 9] = [
    ("ALL", M_ALL),
    ("DEBUG", M_DEBUG),
    ("STATUS", M_STATUS),
    ("INFO", M_INFO),
    ("DEPRECATED", M_DEPRECATED),
    ("WARNING", M_WARNING),
    ("ERROR", M_ERROR),
    ("FATAL", M_FATAL),
    ("QUIET", M_QUIET),
];

/// Parse `INFO`, `info` or `M_INFO`; plain integers are accepted too.
pub fn level_from_name(name: &str) -> Option<i32> {
    let upper = name.trim().to_ascii_uppercase();
    let bare = upper.strip_prefix("M_").unwrap_or(&upper);
    LEVELS
        .iter()
        .find(|(label, _)| *label == bare)
        .map(|(_, level)| *level)
        .or_else(|| bare.parse().ok())
}

/// Header label for a message level.
pub fn level_label(level: i32) -> &'static str {
    match level {
        l if l >= M_FATAL => "FATAL",
        l if l >= M_ERROR => "ERROR",
        l if l >= M_WARNING => "WARNING",
        l if l >= M_DEPRECATED => "DEPRECATED",
        l if l >= M_INFO => "INFO",
        l if l >= M_STATUS => "STATUS",
        _ => "DEBUG",
    }
}

/// `LEVEL [from]: text`, with continuation lines indented under the header.
pub fn format_message(level: i32, from: &str, text: &str) -> String {
    let mut out = format!("{} [{from}]: ", level_label(level));
    let mut lines = text.lines();
    out.push_str(lines.next().unwrap_or(""));
    for line in lines {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}
