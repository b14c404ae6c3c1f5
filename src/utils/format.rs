//! Display helpers for the countdown

/// Format seconds as zero-padded `MM:SS`
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Percentage of the current phase already elapsed
pub fn progress_percent(time_remaining: u32, total_time: u32) -> f64 {
    if total_time == 0 {
        return 0.0;
    }
    let elapsed = total_time.saturating_sub(time_remaining);
    f64::from(elapsed) / f64::from(total_time) * 100.0
}
