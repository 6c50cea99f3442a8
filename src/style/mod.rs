use serde::{Deserialize, Serialize};

use crate::render::AspectRatio;

/// User-facing caption styling options
///
/// All fields are optional; unset fields fall back to the defaults documented
/// on [`resolve_style`]. Colors are web-style `#RRGGBB` hex strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptionStyle {
    /// Font size in points
    pub font_size: Option<u32>,

    /// Foreground (text) color as `#RRGGBB`
    pub font_color: Option<String>,

    /// Background box color as `#RRGGBB`
    pub bg_color: Option<String>,

    /// Background box opacity, 0.0 (invisible) to 1.0 (opaque)
    ///
    /// Defaults to 0.5 with the stock black box, and to 1.0 when a custom
    /// `bg_color` is supplied without an explicit opacity.
    pub bg_opacity: Option<f64>,
}

/// Convert a `#RRGGBB` hex color to the `&HBBGGRR` byte order used by ASS
///
/// libass colors are little-endian, so red and blue swap places. Malformed
/// input (wrong length, non-hex digits) falls back to white.
pub fn hex_to_bgr(hex_color: &str) -> String {
    let hex = hex_color.trim_start_matches('#');

    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let r = &hex[0..2];
        let g = &hex[2..4];
        let b = &hex[4..6];
        format!("&H{}{}{}", b, g, r).to_uppercase()
    } else {
        "&HFFFFFF".to_string()
    }
}

/// Resolve caption style options into an ASS `force_style` string
///
/// Defaults: font size 24 (14 for portrait video), white text, black
/// background box at 50% opacity. `BorderStyle=3` with `Outline=1` renders
/// the background as a filled box behind the text.
pub fn resolve_style(style: &CaptionStyle, aspect_ratio: AspectRatio) -> String {
    let default_font_size = match aspect_ratio {
        AspectRatio::Portrait => 14,
        _ => 24,
    };
    let font_size = style.font_size.unwrap_or(default_font_size);

    let primary_color = style
        .font_color
        .as_deref()
        .map(hex_to_bgr)
        .unwrap_or_else(|| "&HFFFFFF".to_string());

    // ASS alpha is inverted: 00 is opaque, FF is fully transparent. A custom
    // background color defaults to an opaque box unless an opacity is given.
    let opacity = style
        .bg_opacity
        .unwrap_or(if style.bg_color.is_some() { 1.0 } else { 0.5 })
        .clamp(0.0, 1.0);
    let alpha = ((1.0 - opacity) * 255.0).round() as u8;

    let bgr = style
        .bg_color
        .as_deref()
        .map(hex_to_bgr)
        .unwrap_or_else(|| "&H000000".to_string());
    let back_color = format!("&H{:02X}{}", alpha, &bgr[2..]);

    format!(
        "FontSize={},PrimaryColour={},OutlineColour=&H00000000,BackColour={},BorderStyle=3,Outline=1,Shadow=0,MarginV=20",
        font_size, primary_color, back_color
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_bgr_swaps_red_and_blue() {
        assert_eq!(hex_to_bgr("#FF0000"), "&H0000FF");
        assert_eq!(hex_to_bgr("#0000FF"), "&HFF0000");
        assert_eq!(hex_to_bgr("#123456"), "&H563412");
    }

    #[test]
    fn test_hex_to_bgr_round_trips() {
        // Swapping twice restores the original byte order
        let once = hex_to_bgr("#123456");
        let back = hex_to_bgr(&format!("#{}", &once[2..]));
        assert_eq!(back, "&H123456");
    }

    #[test]
    fn test_malformed_hex_falls_back_to_white() {
        assert_eq!(hex_to_bgr("#FFF"), "&HFFFFFF");
        assert_eq!(hex_to_bgr("not-a-color"), "&HFFFFFF");
        assert_eq!(hex_to_bgr(""), "&HFFFFFF");
    }

    #[test]
    fn test_default_style_landscape() {
        let resolved = resolve_style(&CaptionStyle::default(), AspectRatio::Wide);

        assert!(resolved.contains("FontSize=24"));
        assert!(resolved.contains("PrimaryColour=&HFFFFFF"));
        // 50% opacity over black
        assert!(resolved.contains("BackColour=&H80000000"));
        assert!(resolved.contains("BorderStyle=3"));
    }

    #[test]
    fn test_default_style_portrait_shrinks_font() {
        let resolved = resolve_style(&CaptionStyle::default(), AspectRatio::Portrait);
        assert!(resolved.contains("FontSize=14"));
    }

    #[test]
    fn test_custom_background_defaults_to_opaque() {
        let style = CaptionStyle {
            bg_color: Some("#112233".to_string()),
            ..Default::default()
        };

        let resolved = resolve_style(&style, AspectRatio::Wide);
        assert!(resolved.contains("BackColour=&H00332211"));
    }

    #[test]
    fn test_explicit_opacity_overrides_default() {
        let style = CaptionStyle {
            bg_color: Some("#112233".to_string()),
            bg_opacity: Some(0.5),
            ..Default::default()
        };

        let resolved = resolve_style(&style, AspectRatio::Wide);
        assert!(resolved.contains("BackColour=&H80332211"));
    }

    #[test]
    fn test_custom_font_overrides() {
        let style = CaptionStyle {
            font_size: Some(32),
            font_color: Some("#00FF00".to_string()),
            ..Default::default()
        };

        let resolved = resolve_style(&style, AspectRatio::Square);
        assert!(resolved.contains("FontSize=32"));
        assert!(resolved.contains("PrimaryColour=&H00FF00"));
    }
}
