/// Binary prefixes: kilo, mega, giga, tera, peta, exa, zetta, yotta, and
/// the unofficial "hella" for 1024^9
const UNIT_PREFIXES: [char; 9] = ['k', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y', 'H'];

/// Converts a byte count into a one-decimal figure with a binary prefix
///
/// Counts under 1024 are shown verbatim in bytes. Larger counts are scaled
/// by the largest power of 1024 that does not exceed them.
///
/// # Examples
///
/// ```
/// use purr_links::resolver::human_readable_bytes;
///
/// assert_eq!(human_readable_bytes(512), "512 B");
/// assert_eq!(human_readable_bytes(2048), "2.0 kiB");
/// assert_eq!(human_readable_bytes(5 * 1024 * 1024), "5.0 MiB");
/// ```
pub fn human_readable_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    // floor(log1024(bytes)), computed on integers to dodge float error at
    // exact powers of 1024
    let mut exp = 0usize;
    let mut scaled = bytes;
    while scaled >= 1024 && exp < UNIT_PREFIXES.len() {
        scaled /= 1024;
        exp += 1;
    }

    let value = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{:.1} {}iB", value, UNIT_PREFIXES[exp - 1])
}
