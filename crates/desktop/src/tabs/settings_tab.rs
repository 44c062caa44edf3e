use iced::widget::{button, checkbox, column, pick_list, row, slider, text, Space};
use iced::{Alignment, Element};

use pdfblur_core::shared::constants::{MAX_BLUR_RADIUS, MAX_DPI, MIN_BLUR_RADIUS, MIN_DPI};

use crate::app::{scaled, Message};
use crate::settings::{Appearance, Settings, MAX_FONT_SCALE, MIN_FONT_SCALE};

pub fn view<'a>(settings: &Settings) -> Element<'a, Message> {
    let fs = settings.font_scale;

    column![
        text("Blur").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            text("Radius").size(scaled(13.0, fs)).width(90),
            slider(
                MIN_BLUR_RADIUS..=MAX_BLUR_RADIUS,
                settings.blur_radius,
                Message::BlurRadiusChanged
            )
            .step(1.0),
            text(format!("{:.0} px", settings.blur_radius)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(8),
        row![
            text("Resolution").size(scaled(13.0, fs)).width(90),
            slider(MIN_DPI..=MAX_DPI, settings.dpi, Message::DpiChanged).step(1u32),
            text(format!("{} dpi", settings.dpi)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text("Resolution applies to the next PDF you open.").size(scaled(12.0, fs)),
        Space::new().height(8),
        button(text("Restore defaults").size(scaled(13.0, fs)))
            .on_press(Message::RestoreDefaults)
            .padding([6, 14])
            .style(button::secondary),
        Space::new().height(20),
        text("Theme").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            text("Mode").size(scaled(13.0, fs)),
            pick_list(Appearance::ALL, Some(settings.appearance), |a| {
                Message::AppearanceChanged(a)
            })
            .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(12),
        checkbox(settings.high_contrast)
            .label("High contrast")
            .on_toggle(Message::HighContrastChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(20),
        text("Font size").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            slider(
                MIN_FONT_SCALE..=MAX_FONT_SCALE,
                settings.font_scale,
                Message::FontScaleChanged
            )
            .step(0.05),
            text(format!("{:.0}%", settings.font_scale * 100.0)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    ]
    .spacing(0)
    .into()
}
