//! SRT timestamp formatting.

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
///
/// Milliseconds are the fractional remainder rounded toward zero. The
/// value is first snapped to whole microseconds so that binary float noise
/// (`3661.001` is stored as `3661.000999...`) does not drop a millisecond.
/// Negative and non-finite inputs format as zero.
///
/// # Examples
/// ```
/// use ecut_models::timestamp::format_srt_timestamp;
/// assert_eq!(format_srt_timestamp(61.5), "00:01:01,500");
/// assert_eq!(format_srt_timestamp(3661.001), "01:01:01,001");
/// ```
pub fn format_srt_timestamp(seconds: f64) -> String {
    let micros = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1_000_000.0).round() as u64
    } else {
        0
    };
    let total_ms = micros / 1000;

    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}
