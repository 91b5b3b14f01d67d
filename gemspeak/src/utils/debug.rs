// ANSI color codes for request ID colorization
const COLORS: &[&str] = &[
    "\x1b[31m", "\x1b[32m", "\x1b[33m", "\x1b[34m", "\x1b[35m", "\x1b[36m",
    "\x1b[91m", "\x1b[92m", "\x1b[93m", "\x1b[94m", "\x1b[95m", "\x1b[96m",
];
const RESET: &str = "\x1b[0m";

/// Short request ID for log lines: the first segment of a uuid, or the
/// whole string if it has no dash.
pub fn short_request_id(request_id: &str) -> &str {
    request_id.split('-').next().unwrap_or(request_id)
}

/// Same request ID, same color, so interleaved log lines stay readable.
pub fn get_request_id_color(request_id: &str) -> &'static str {
    let mut hash = 0u32;
    for byte in request_id.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(byte as u32);
    }
    COLORS[(hash as usize) % COLORS.len()]
}

/// Colored `[id]` prefix for log lines belonging to one generate request.
pub fn format_request_prefix(request_id: &str) -> String {
    let short = short_request_id(request_id);
    format!("{}[{}]{}", get_request_id_color(short), short, RESET)
}
