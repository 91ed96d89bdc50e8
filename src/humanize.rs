//! Human-readable byte sizes for saved files

use std::fmt;

/// Byte count rendered with a binary unit, e.g. `3.4MB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// One decimal at most. Rounding happens before the unit is picked, so
    /// 1048575 bytes reads `1MB` rather than `1024KB`.
    pub fn to_human_readable(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

        let mut value = self.0 as f64;
        let mut unit = 0;
        loop {
            let rounded = (value * 10.0).round() / 10.0;
            if rounded < 1024.0 || unit == UNITS.len() - 1 {
                value = rounded;
                break;
            }
            value /= 1024.0;
            unit += 1;
        }

        if value.fract() == 0.0 {
            format!("{:.0}{}", value, UNITS[unit])
        } else {
            format!("{:.1}{}", value, UNITS[unit])
        }
    }
}

impl From<usize> for ByteSize {
    fn from(value: usize) -> Self {
        ByteSize(value as u64)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_human_readable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_units() {
        assert_eq!(ByteSize(512).to_human_readable(), "512B");
        assert_eq!(ByteSize(1024).to_human_readable(), "1KB");
        assert_eq!(ByteSize(5 * 1024 * 1024).to_human_readable(), "5MB");
        assert_eq!(ByteSize(2 * 1024 * 1024 * 1024).to_human_readable(), "2GB");
    }

    #[test]
    fn test_fractional_units() {
        assert_eq!(ByteSize(1536).to_human_readable(), "1.5KB");
        assert_eq!(ByteSize(3 * 1024 * 1024 + 400 * 1024).to_human_readable(), "3.4MB");
    }

    #[test]
    fn test_unit_boundaries_round_up() {
        assert_eq!(ByteSize(1023).to_human_readable(), "1023B");
        assert_eq!(ByteSize(1_048_575).to_human_readable(), "1MB");
        assert_eq!(ByteSize(1023 * 1024).to_human_readable(), "1023KB");
        assert_eq!(ByteSize(1024 * 1024 * 1024 - 1).to_human_readable(), "1GB");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ByteSize::from(2048usize)), "2KB");
    }
}
