//! Derived download metrics: size parsing, ETA and human-readable rates.

/// Binary unit prefixes recognised in size strings, by power of 1024.
const SIZE_PREFIXES: [char; 5] = ['B', 'K', 'M', 'G', 'T'];

/// Decimal units used when formatting transfer rates.
const RATE_UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

/// Parse a human-readable size string ("700 MB", "1.2 GiB", "500 B") into
/// bytes.
///
/// The unit is matched on its first letter. An unknown or missing unit
/// yields the bare number; an unparseable number yields 0.
pub fn parse_size(size: &str) -> f64 {
    let size = size.trim();
    let split = size
        .find(|c: char| c.is_alphabetic())
        .unwrap_or(size.len());
    let (number, unit) = size.split_at(split);

    let value: f64 = number.trim().replace(',', "").parse().unwrap_or(0.0);

    let multiplier = unit
        .trim()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .and_then(|c| SIZE_PREFIXES.iter().position(|p| *p == c))
        .map(|power| 1024f64.powi(power as i32))
        .unwrap_or(1.0);

    value * multiplier
}

/// Estimated seconds until completion.
///
/// `None` when nothing is being received, the download is complete, or the
/// size does not give a finite estimate.
pub fn compute_eta(total_bytes: f64, progress: f64, download_rate: u64) -> Option<f64> {
    if download_rate == 0 || progress >= 1.0 {
        return None;
    }
    let eta = total_bytes * (1.0 - progress) / download_rate as f64;
    eta.is_finite().then_some(eta)
}

/// Format a byte count with binary units, in a form [`parse_size`] reads
/// back ("1.20 GB").
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a transfer rate with decimal units ("1.50 MB/s").
pub fn format_rate(bytes_per_sec: f64) -> String {
    let mut value = bytes_per_sec.max(0.0);
    for (i, unit) in RATE_UNITS.iter().enumerate() {
        if value < 1000.0 {
            return if i == 0 {
                format!("{:.0} {}/s", value, unit)
            } else {
                format!("{:.2} {}/s", value, unit)
            };
        }
        value /= 1000.0;
    }
    format!("{:.2} PB/s", value)
}
