use iced::widget::{button, column, container, image, row, text, Space};
use iced::{Alignment, Color, Element, Length, Theme};

use pdfblur_core::session::redaction_session::RedactionSession;

use crate::app::{page_label, scaled, Message};
use crate::theme::{surface_color, tertiary_color};
use crate::widgets::page_canvas;

const HINT: &str = "Drag on the page to blur a region";

pub fn view<'a>(
    fs: f32,
    session: &RedactionSession,
    preview: Option<&image::Handle>,
    status: &'a str,
    can_open_export: bool,
    theme: &Theme,
) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let loaded = session.is_loaded();

    let toolbar = row![
        button(text("Open PDF").size(scaled(13.0, fs)))
            .on_press(Message::OpenPdf)
            .padding([6, 14]),
        button(text("Save PDF").size(scaled(13.0, fs)))
            .on_press_maybe(loaded.then_some(Message::SavePdf))
            .padding([6, 14])
            .style(button::secondary),
        Space::new().width(12),
        button(text("\u{00AB} Previous").size(scaled(13.0, fs)))
            .on_press_maybe(session.has_previous().then_some(Message::PreviousPage))
            .padding([6, 12])
            .style(button::secondary),
        text(page_label(session.current_index(), session.page_count())).size(scaled(13.0, fs)),
        button(text("Next \u{00BB}").size(scaled(13.0, fs)))
            .on_press_maybe(session.has_next().then_some(Message::NextPage))
            .padding([6, 12])
            .style(button::secondary),
        Space::new().width(Length::Fill),
        text(HINT).size(scaled(12.0, fs)).color(tertiary),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let page_area = match (preview, session.current_page()) {
        (Some(handle), Some(page)) => page_canvas::view(
            handle,
            page.width(),
            page.height(),
            session.drag_point(),
            session.live_selection(),
        ),
        _ => empty_state(fs, tertiary),
    };

    let surface = surface_color(theme);
    let page_area = container(page_area)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(surface)),
            ..container::Style::default()
        });

    let mut status_line = row![text(status).size(scaled(12.0, fs)).color(tertiary)]
        .spacing(12)
        .align_y(Alignment::Center);
    if can_open_export {
        status_line = status_line.push(
            button(text("Open exported file").size(scaled(12.0, fs)))
                .on_press(Message::OpenExported)
                .style(button::text),
        );
    }

    column![toolbar, page_area, status_line]
        .spacing(10)
        .height(Length::Fill)
        .into()
}

fn empty_state<'a>(fs: f32, tertiary: Color) -> Element<'a, Message> {
    let inner = column![
        text("Drop a PDF here to get started").size(scaled(17.0, fs)).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        Space::new().height(6),
        text("or click Open PDF to browse your computer")
            .size(scaled(14.0, fs))
            .color(tertiary),
    ]
    .align_x(Alignment::Center);

    container(inner)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
