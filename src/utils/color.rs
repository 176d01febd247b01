use eframe::egui::Color32;

pub mod palette {
    pub const PRIMARY: &str = "#1976d2";
    pub const PRIMARY_LIGHT: &str = "#42a5f5";
    pub const PRIMARY_DARK: &str = "#1565c0";
    pub const BACKGROUND: &str = "#f5f7fa";
    pub const HEADER_START: &str = "#667eea";
    pub const HEADER_END: &str = "#764ba2";

    pub const ERROR: &str = "#d32f2f";
    pub const WARNING: &str = "#ed6c02";
    pub const INFO: &str = "#0288d1";
    pub const SUCCESS: &str = "#2e7d32";
    pub const NEUTRAL: &str = "#9e9e9e";
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(value: &str) -> Option<Color32> {
    let digits = value.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn hex(value: &str) -> Color32 {
    parse_hex(value).unwrap_or(Color32::GRAY)
}
