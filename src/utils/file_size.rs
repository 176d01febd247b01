pub struct FileSizeUtils;

impl FileSizeUtils {
    const UNITS: [&'static str; 4] = ["B", "KB", "MB", "GB"];

    pub fn format_size(bytes: u64) -> String {
        let mut size = bytes as f64;
        let mut unit = 0;

        while size >= 1024.0 && unit < Self::UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }

        if unit == 0 {
            format!("{} {}", bytes, Self::UNITS[0])
        } else if size.fract() == 0.0 {
            format!("{} {}", size as u64, Self::UNITS[unit])
        } else {
            format!("{:.2} {}", size, Self::UNITS[unit])
        }
    }

    /// Whole kilobytes, as shown under the preview.
    pub fn format_kilobytes(bytes: u64) -> String {
        format!("{}KB", (bytes as f64 / 1024.0).round() as u64)
    }
}
