//! Badge geometry: metric -> labels, colour and pixel widths.
//!
//! Widths come from a per-character table measured against single-letter SVG text
//! rendered by Chrome. The table decides rectangle widths, so it must stay exact.

pub const LEFT_LABEL: &str = "users";
pub const RIGHT_LABEL_SUFFIX: &str = "/week";

pub const COLOR_HEALTHY: &str = "#4c1";
pub const COLOR_MODERATE: &str = "#a4a61d";
pub const COLOR_LOW: &str = "#e05d44";

/// Width of an empty string.
pub const BASE_WIDTH: u32 = 10;
/// Increment for any character absent from `CHAR_WIDTHS`.
pub const DEFAULT_CHAR_WIDTH: u32 = 8;

/// character bucket -> width increment
pub const CHAR_WIDTHS: [(&str, u32); 5] = [
    ("i", 2),
    (";I\\fjlrt", 4),
    ("13579:?EFJPTZ[]`bcdgkopsvy", 6),
    ("KL", 7),
    ("<>@GOWm", 10),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeLayout {
    pub left_label: String,
    pub right_label: String,
    pub left_width: u32,
    pub right_width: u32,
    pub left_center: u32,
    pub right_center: u32,
    pub total_width: u32,
    pub color: &'static str,
}

impl BadgeLayout {
    /// Negative metrics are clamped to zero.
    pub fn for_metric(value: i64) -> Self {
        let (magnitude, color) = format_magnitude(value.max(0));
        let left_label = LEFT_LABEL.to_string();
        let right_label = format!("{}{}", magnitude, RIGHT_LABEL_SUFFIX);

        let left_width = text_width(&left_label);
        let right_width = text_width(&right_label);

        Self {
            left_center: left_width / 2 + 1,
            right_center: left_width + right_width / 2 - 1,
            total_width: left_width + right_width,
            left_label,
            right_label,
            left_width,
            right_width,
            color,
        }
    }
}

/// Truncating magnitude buckets; exactly 1_000 and 1_000_000 stay in the lower bucket.
pub fn format_magnitude(n: i64) -> (String, &'static str) {
    if n > 1_000_000 {
        (format!("{}M", n / 1_000_000), COLOR_HEALTHY)
    } else if n > 1_000 {
        (format!("{}k", n / 1_000), COLOR_MODERATE)
    } else {
        (n.to_string(), COLOR_LOW)
    }
}

pub fn char_width(c: char) -> u32 {
    CHAR_WIDTHS
        .iter()
        .find(|(chars, _)| chars.contains(c))
        .map(|(_, width)| *width)
        .unwrap_or(DEFAULT_CHAR_WIDTH)
}

pub fn text_width(s: &str) -> u32 {
    s.chars().fold(BASE_WIDTH, |width, c| width + char_width(c))
}
