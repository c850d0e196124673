//! QR code for a restaurant's public menu URL

use qrcode::QrCode;
use qrcode::render::svg;
use shared::error::{AppError, ErrorCode};
use shared::models::is_valid_theme_color;

pub const DEFAULT_DARK: &str = "#000000";
pub const DEFAULT_LIGHT: &str = "#FFFFFF";
pub const DEFAULT_WIDTH: u32 = 300;

const MIN_WIDTH: u32 = 100;
const MAX_WIDTH: u32 = 2000;

/// Canonical public menu URL encoded in the QR code
pub fn menu_url(origin: &str, slug: &str) -> String {
    format!("{}/r/{slug}", origin.trim_end_matches('/'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrOptions {
    /// Module color, `#RRGGBB`
    pub dark: String,
    /// Background color, `#RRGGBB`
    pub light: String,
    /// Minimum rendered width in pixels
    pub width: u32,
    pub quiet_zone: bool,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            dark: DEFAULT_DARK.to_string(),
            light: DEFAULT_LIGHT.to_string(),
            width: DEFAULT_WIDTH,
            quiet_zone: true,
        }
    }
}

impl QrOptions {
    fn validate(&self) -> Result<(), AppError> {
        for (field, color) in [("dark", &self.dark), ("light", &self.light)] {
            if !is_valid_theme_color(color) {
                return Err(AppError::with_message(
                    ErrorCode::InvalidFormat,
                    format!("{field} must be a #RRGGBB color"),
                )
                .with_detail("field", field));
            }
        }
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&self.width) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("width must be between {MIN_WIDTH} and {MAX_WIDTH}"),
            )
            .with_detail("field", "width"));
        }
        Ok(())
    }
}

/// Render `url` as an SVG document
pub fn render_svg(url: &str, options: &QrOptions) -> Result<String, AppError> {
    options.validate()?;
    let code = QrCode::new(url.as_bytes()).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Cannot encode QR code: {e}"))
    })?;

    Ok(code
        .render()
        .min_dimensions(options.width, options.width)
        .dark_color(svg::Color(&options.dark))
        .light_color(svg::Color(&options.light))
        .quiet_zone(options.quiet_zone)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_url() {
        assert_eq!(
            menu_url("https://menu.example.com/", "mario-s-pizza"),
            "https://menu.example.com/r/mario-s-pizza"
        );
    }

    #[test]
    fn test_render_svg_uses_colors() {
        let options = QrOptions {
            dark: "#3B82F6".into(),
            ..QrOptions::default()
        };
        let svg = render_svg("https://menu.example.com/r/cafe", &options).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#3B82F6"));
        assert!(svg.contains("#FFFFFF"));
    }

    #[test]
    fn test_invalid_options() {
        let bad_color = QrOptions {
            light: "white".into(),
            ..QrOptions::default()
        };
        assert_eq!(
            render_svg("x", &bad_color).unwrap_err().code,
            ErrorCode::InvalidFormat
        );

        let bad_width = QrOptions {
            width: 5,
            ..QrOptions::default()
        };
        assert_eq!(
            render_svg("x", &bad_width).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }
}
