const TRAFFIC_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// `1234567` becomes `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Byte count in binary units with two decimals above one kilobyte.
pub fn format_traffic(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < TRAFFIC_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.2} {}", TRAFFIC_UNITS[unit])
}

/// Percentage of `part` in `total`, zero when there is no total.
pub fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = part as f64 / total as f64;
    ratio * 100.0
}
