/// Format seconds as `MM:SS`.
///
/// Negative and non-finite input counts as zero; fractions are floored. The
/// minutes field is not wrapped at 60.
pub fn format_time(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Normalized playhead position in `[0, 1]`; 0 whenever `duration` is not a
/// positive number.
pub fn progress_fraction(current: f64, duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 && current.is_finite() {
        (current / duration).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
