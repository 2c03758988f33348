use palette::Srgb;

use crate::pipeline::classify::ImpactBucket;

// ---------------------------------------------------------------------------
// Bucket colours
// ---------------------------------------------------------------------------

/// Fill colour for a bucket: sea green, gold, crimson.
pub fn bucket_color(bucket: ImpactBucket) -> Srgb<u8> {
    match bucket {
        ImpactBucket::Low => Srgb::new(0x2E, 0x8B, 0x57),
        ImpactBucket::Medium => Srgb::new(0xFF, 0xD7, 0x00),
        ImpactBucket::High => Srgb::new(0xDC, 0x14, 0x3C),
    }
}

/// `#RRGGBB` form of the bucket colour, for map renderers.
pub fn bucket_hex(bucket: ImpactBucket) -> String {
    hex(bucket_color(bucket))
}

pub fn hex(c: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
}

/// Colour a line of terminal text with the bucket's 24-bit colour.
pub fn ansi_paint(bucket: ImpactBucket, text: &str) -> String {
    let c = bucket_color(bucket);
    format!("\x1b[38;2;{};{};{}m{text}\x1b[0m", c.red, c.green, c.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_hex_codes() {
        assert_eq!(bucket_hex(ImpactBucket::Low), "#2E8B57");
        assert_eq!(bucket_hex(ImpactBucket::Medium), "#FFD700");
        assert_eq!(bucket_hex(ImpactBucket::High), "#DC143C");
    }

    #[test]
    fn ansi_wraps_text() {
        let s = ansi_paint(ImpactBucket::High, "x");
        assert!(s.starts_with("\x1b[38;2;220;20;60m"));
        assert!(s.ends_with("x\x1b[0m"));
    }
}
