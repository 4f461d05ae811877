//! Human-readable renderings for the upload log
//!
//! Byte sizes use binary (1024) steps; durations are fixed-point
//! milliseconds.

/// Unit ladder for [`format_bytes`]
pub const BYTE_UNITS: [&str; 9] = [
    "bytes", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB",
];

/// Render a byte count with the largest binary unit that keeps the value >= 1.
///
/// Values below 10 in a scaled unit get one decimal place (`1.5 KiB`),
/// anything else is rounded to a whole number. A fraction that rounds to
/// `.0` is dropped, so exactly one KiB renders as `1 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let decimals = usize::from(value < 10.0 && unit > 0);
    let rendered = format!("{value:.decimals$}");
    let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);

    format!("{rendered} {}", BYTE_UNITS[unit])
}

/// Render a millisecond duration as fixed-point with `precision` decimals.
pub fn format_duration(millis: f64, precision: usize) -> String {
    format!("{millis:.precision$} ms")
}
