use iced::widget::{column, text, Space};
use iced::Element;

use crate::app::{scaled, Message};

pub fn view(fs: f32) -> Element<'static, Message> {
    let version = env!("CARGO_PKG_VERSION");

    column![
        text("PDF Blur").size(scaled(22.0, fs)),
        Space::new().height(4),
        text(format!("Version {version}")).size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "Open a PDF, drag rectangles over anything you want hidden, and \
             save a new copy with those areas blurred. Everything runs on \
             your computer."
        )
        .size(scaled(13.0, fs)),
        Space::new().height(20),
        text("Blurring is permanent").size(scaled(16.0, fs)),
        Space::new().height(8),
        text(
            "Each blur is applied to the page image as soon as you release \
             the mouse and cannot be undone. The saved PDF contains page \
             images only, so text is no longer selectable or searchable. \
             Keep your original file if you might need it later."
        )
        .size(scaled(13.0, fs)),
    ]
    .spacing(0)
    .into()
}
