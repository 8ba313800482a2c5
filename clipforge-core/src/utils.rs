//! Small parsing helpers shared by the validators.

/// Parses an FFmpeg-style timestamp to seconds. Accepts `HH:MM:SS[.ms]` or a
/// plain non-negative number of seconds. Returns None if invalid.
#[must_use]
pub fn parse_timestamp(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.split(':').collect();
    match parts.len() {
        1 => {
            let secs = parts[0].parse::<f64>().ok()?;
            (secs >= 0.0 && secs.is_finite()).then_some(secs)
        }
        3 => {
            let hours = parts[0].parse::<f64>().ok()?;
            let minutes = parts[1].parse::<f64>().ok()?;
            let seconds = parts[2].parse::<f64>().ok()?;
            if hours < 0.0 || minutes < 0.0 || seconds < 0.0 {
                return None;
            }
            Some(hours * 3600.0 + minutes * 60.0 + seconds)
        }
        _ => None,
    }
}

/// True if `name` contains a printf-style sequence token (`%d` or `%0Nd`),
/// as required by the segment and image-sequence muxers.
#[must_use]
pub fn has_sequence_token(name: &str) -> bool {
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'd' {
                return true;
            }
        }
        i += 1;
    }
    false
}
