//! Color utility functions shared across the catalog and exports.
//!
//! Signage colours are stored the way the web tool stores them: `#rrggbb`
//! strings. New signage types get a palette colour generated by stepping the
//! hue around the HSV wheel.

/// Golden-angle hue step so consecutive palette colours stay distinct.
const PALETTE_HUE_STEP: f32 = 137.508;

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}

/// Parse a `#rrggbb` (or `rrggbb`) colour string.
///
/// Returns None for anything that isn't six hex digits.
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Format an RGB triple as a lowercase `#rrggbb` string.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Normalize a user-entered colour to `#rrggbb`, or None if it doesn't parse.
pub fn normalize_hex(color: &str) -> Option<String> {
    parse_hex(color).map(to_hex)
}

/// Generate the palette colour for the `index`-th signage type.
pub fn palette_color(index: usize) -> String {
    let hue = (index as f32 * PALETTE_HUE_STEP) % 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.65, 0.9);
    to_hex([
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_to_rgb_red() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((r - 1.0).abs() < 0.01);
        assert!(g.abs() < 0.01);
        assert!(b.abs() < 0.01);
    }

    #[test]
    fn test_hsv_to_rgb_blue() {
        let (r, g, b) = hsv_to_rgb(240.0, 1.0, 1.0);
        assert!(r.abs() < 0.01);
        assert!(g.abs() < 0.01);
        assert!((b - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex("FF8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex(" #AABBCC "), Some("#aabbcc".to_string()));
        assert_eq!(normalize_hex("red"), None);
    }

    #[test]
    fn test_palette_colors_are_valid_and_distinct() {
        let first = palette_color(0);
        let second = palette_color(1);
        assert!(parse_hex(&first).is_some());
        assert!(parse_hex(&second).is_some());
        assert_ne!(first, second);
    }
}
