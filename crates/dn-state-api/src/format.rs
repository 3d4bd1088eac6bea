//! Human-readable unit formatting.

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Round to two decimals with halves going away from zero.
///
/// `{:.2}` alone resolves an exact midpoint such as `1.125` to the even digit.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a byte count as gibibytes with two decimals, e.g. `"3.00 GB"`.
#[must_use]
pub fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", round2(bytes as f64 / GIB))
}

/// Format a bit rate as `"X.XX Mbps"`, dividing by 1024².
#[must_use]
pub fn format_mbps(bits_per_second: f64) -> String {
    format!("{:.2} Mbps", round2(bits_per_second / MIB))
}

/// Format a latency as-is followed by `" ms"`.
///
/// Whole numbers print without a fractional part: `20.0` renders `"20 ms"`.
#[must_use]
pub fn format_ping(ms: f64) -> String {
    format!("{ms} ms")
}
