/// Formats a duration in seconds as `HH:MM:SS.mmm`. Hours widen past 99.
pub fn duration_str(sec: f64) -> String {
    let total_ms = (sec * 1000f64).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = total_ms / 60_000 % 60;
    let seconds = total_ms / 1000 % 60;
    let milliseconds = total_ms % 1000;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
}
