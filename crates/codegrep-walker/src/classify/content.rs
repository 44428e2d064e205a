//! Content sniffing: binary detection and shebang lines.

/// Leading bytes examined for binary detection and shebangs.
pub const SNIFF_LEN: usize = 512;

/// Control-character share above which content counts as binary.
pub const BINARY_THRESHOLD: f64 = 0.30;

/// Heuristic binary check over (at most) the first `SNIFF_LEN` bytes.
///
/// Any NUL byte means binary. Otherwise content is binary when more than
/// `BINARY_THRESHOLD` of the bytes are control characters other than tab,
/// line feed, and carriage return. Empty content is text.
pub fn is_binary_content(content: &[u8]) -> bool {
    let sample = &content[..content.len().min(SNIFF_LEN)];
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }

    let control = sample
        .iter()
        .filter(|&&b| b < 32 && !matches!(b, b'\t' | b'\n' | b'\r'))
        .count();
    control as f64 / sample.len() as f64 > BINARY_THRESHOLD
}

/// The lowercased interpreter directive of a `#!` first line.
pub fn shebang_line(content: &[u8]) -> Option<String> {
    let first_line = content.split(|&b| b == b'\n').next()?.trim_ascii();
    let directive = first_line.strip_prefix(b"#!")?;
    let text = String::from_utf8_lossy(directive);
    Some(text.trim().to_lowercase())
}
