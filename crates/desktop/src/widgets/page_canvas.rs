use iced::mouse;
use iced::widget::canvas::{self, Frame, Path, Stroke};
use iced::widget::{image, stack, Canvas};
use iced::{ContentFit, Element, Event, Length, Rectangle, Renderer, Size, Theme};

use pdfblur_core::editing::display_transform::DisplayTransform;
use pdfblur_core::shared::geometry::{self, DisplayRect};

use crate::app::Message;
use crate::theme::{selection_fill_color, selection_stroke_color};

/// Mouse layer drawn over the page image.
///
/// Turns left-button drags into selection messages in canvas-local
/// coordinates and draws the live selection rectangle.
pub struct PageCanvas {
    page_width: u32,
    page_height: u32,
    /// Live corner of the drag in canvas-local coordinates, while dragging.
    drag_point: Option<geometry::Point>,
    selection: Option<DisplayRect>,
}

impl PageCanvas {
    fn selecting(&self) -> bool {
        self.drag_point.is_some()
    }

    fn transform(&self, bounds: Rectangle) -> DisplayTransform {
        DisplayTransform::contain(
            self.page_width,
            self.page_height,
            geometry::Size::new(bounds.width, bounds.height),
        )
    }
}

fn local_point(position: iced::Point, bounds: Rectangle) -> geometry::Point {
    geometry::Point::new(position.x - bounds.x, position.y - bounds.y)
}

impl canvas::Program<Message> for PageCanvas {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let Event::Mouse(mouse_event) = event else {
            return None;
        };

        match mouse_event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                // Only start drags on the page area itself.
                let position = cursor.position_in(bounds)?;
                let point = geometry::Point::new(position.x, position.y);
                Some(canvas::Action::publish(Message::SelectionStarted(point)).and_capture())
            }
            // Past the edge the drag keeps tracking; commit clamps to the page.
            mouse::Event::CursorMoved { .. } if self.selecting() => {
                let position = cursor.position()?;
                Some(
                    canvas::Action::publish(Message::SelectionMoved(local_point(position, bounds)))
                        .and_capture(),
                )
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) if self.selecting() => {
                let point = cursor
                    .position()
                    .map(|p| local_point(p, bounds))
                    .or(self.drag_point)?;
                Some(
                    canvas::Action::publish(Message::SelectionEnded(point, self.transform(bounds)))
                        .and_capture(),
                )
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let Some(rect) = self.selection else {
            return vec![];
        };

        let mut frame = Frame::new(renderer, bounds.size());
        let top_left = iced::Point::new(rect.x, rect.y);
        let size = Size::new(rect.width, rect.height);

        frame.fill_rectangle(top_left, size, selection_fill_color(theme));
        frame.stroke(
            &Path::rectangle(top_left, size),
            Stroke::default()
                .with_color(selection_stroke_color(theme))
                .with_width(1.5),
        );

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.selecting() || cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

/// The page image with the selection layer stacked on top.
///
/// Both layers fill the same bounds and the image is fitted with
/// [`ContentFit::Contain`], which is the mapping the canvas reports.
pub fn view<'a>(
    handle: &image::Handle,
    page_width: u32,
    page_height: u32,
    drag_point: Option<geometry::Point>,
    selection: Option<DisplayRect>,
) -> Element<'a, Message> {
    let page = image(handle.clone())
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(ContentFit::Contain);

    let overlay = Canvas::new(PageCanvas {
        page_width,
        page_height,
        drag_point,
        selection,
    })
    .width(Length::Fill)
    .height(Length::Fill);

    stack![page, overlay].into()
}
