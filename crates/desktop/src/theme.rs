use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use crate::settings::Appearance;

/// Resolve the iced Theme from appearance + high_contrast settings.
pub fn resolve_theme(appearance: Appearance, high_contrast: bool) -> Theme {
    let dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => system_prefers_dark(),
    };
    Theme::custom("PDF Blur", palette(dark, high_contrast))
}

/// Stock iced palette with the orange accent and our own surfaces.
fn palette(dark: bool, high_contrast: bool) -> Palette {
    let base = if dark { Palette::DARK } else { Palette::LIGHT };
    let (background, text, primary) = match (dark, high_contrast) {
        (true, false) => (color!(0x202124), color!(0xd4d4d4), color!(0xf28b3c)),
        (false, false) => (color!(0xf4f4f2), color!(0x1d1d1f), color!(0xd9630b)),
        (true, true) => (Color::BLACK, Color::WHITE, color!(0xffa64d)),
        (false, true) => (Color::WHITE, Color::BLACK, color!(0xa84300)),
    };
    Palette {
        background,
        text,
        primary,
        ..base
    }
}

/// Secondary text such as hints and the status line.
pub fn tertiary_color(theme: &Theme) -> Color {
    Color {
        a: 0.6,
        ..theme.extended_palette().background.base.text
    }
}

/// Backdrop behind the page preview, slightly offset from the window background.
pub fn surface_color(theme: &Theme) -> Color {
    theme.extended_palette().background.weak.color
}

/// Outline of the live selection rectangle.
pub fn selection_stroke_color(theme: &Theme) -> Color {
    theme.palette().primary
}

pub fn selection_fill_color(theme: &Theme) -> Color {
    Color {
        a: 0.18,
        ..theme.palette().primary
    }
}

#[cfg(target_os = "macos")]
fn system_prefers_dark() -> bool {
    std::process::Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).trim() == "Dark")
        .unwrap_or(true)
}

// Dark is assumed where the OS setting is not queried.
#[cfg(not(target_os = "macos"))]
fn system_prefers_dark() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::dark(true, Color::BLACK, Color::WHITE)]
    #[case::light(false, Color::WHITE, Color::BLACK)]
    fn test_high_contrast_uses_pure_surfaces(
        #[case] dark: bool,
        #[case] background: Color,
        #[case] text: Color,
    ) {
        let p = palette(dark, true);
        assert_eq!(p.background, background);
        assert_eq!(p.text, text);
    }

    #[test]
    fn test_selection_fill_is_translucent_primary() {
        let theme = resolve_theme(Appearance::Light, false);
        let fill = selection_fill_color(&theme);
        let stroke = selection_stroke_color(&theme);
        assert!(fill.a < 1.0);
        assert_eq!((fill.r, fill.g, fill.b), (stroke.r, stroke.g, stroke.b));
    }
}
