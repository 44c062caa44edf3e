use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::editing::display_transform::DisplayTransform;
use crate::shared::error::BlurError;
use crate::shared::geometry::{DisplayRect, Point};
use crate::shared::page::Page;
use crate::shared::region::Region;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    Selecting { anchor: Point, current: Point },
}

/// Mouse-driven rectangle selection over a displayed page.
///
/// Holds only the transient drag. The blur happens when the drag is
/// committed, directly on the page bitmap.
#[derive(Debug, Default)]
pub struct RegionEditor {
    state: SelectionState,
}

impl RegionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SelectionState::Selecting { .. })
    }

    /// Starts a drag at `point`. A drag already in progress is discarded.
    pub fn begin_selection(&mut self, point: Point) {
        self.state = SelectionState::Selecting {
            anchor: point,
            current: point,
        };
    }

    /// Moves the live corner and returns the rectangle to draw as feedback.
    pub fn update_selection(&mut self, point: Point) -> Option<DisplayRect> {
        match &mut self.state {
            SelectionState::Idle => None,
            SelectionState::Selecting { anchor, current } => {
                *current = point;
                Some(DisplayRect::from_corners(*anchor, point))
            }
        }
    }

    pub fn live_rect(&self) -> Option<DisplayRect> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Selecting { anchor, current } => {
                Some(DisplayRect::from_corners(anchor, current))
            }
        }
    }

    /// Last position reported for the live corner of the drag.
    pub fn drag_point(&self) -> Option<Point> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Selecting { current, .. } => Some(current),
        }
    }

    pub fn cancel_selection(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Ends the drag at `point` and blurs the selected area of `page`.
    ///
    /// Returns the region that was blurred, or `None` when nothing was being
    /// selected or the selection clamps to a degenerate rectangle. The editor
    /// is idle afterwards in every case.
    pub fn commit_selection(
        &mut self,
        point: Point,
        transform: &DisplayTransform,
        page: &mut Page,
        blurrer: &dyn RegionBlurrer,
    ) -> Result<Option<Region>, BlurError> {
        let SelectionState::Selecting { anchor, .. } = std::mem::take(&mut self.state) else {
            return Ok(None);
        };

        let Some(region) = map_selection(anchor, point, transform, page.width(), page.height())
        else {
            log::debug!("Ignoring degenerate selection on page {}", page.index() + 1);
            return Ok(None);
        };

        blurrer.blur(page, &region)?;
        Ok(Some(region))
    }
}

/// Maps a display-space drag onto page pixels, clamped to the page.
pub fn map_selection(
    anchor: Point,
    point: Point,
    transform: &DisplayTransform,
    page_width: u32,
    page_height: u32,
) -> Option<Region> {
    Region::clamped(
        transform.to_pixel(anchor),
        transform.to_pixel(point),
        page_width,
        page_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blurring::infrastructure::cpu_gaussian_blurrer::CpuGaussianBlurrer;
    use crate::shared::geometry::Size;
    use rstest::rstest;
    use std::cell::RefCell;

    /// Records regions instead of touching pixels.
    #[derive(Default)]
    struct RecordingBlurrer {
        calls: RefCell<Vec<Region>>,
    }

    impl RegionBlurrer for RecordingBlurrer {
        fn blur(&self, _page: &mut Page, region: &Region) -> Result<(), BlurError> {
            self.calls.borrow_mut().push(*region);
            Ok(())
        }

        fn radius(&self) -> f32 {
            1.0
        }
    }

    fn checker_page(width: u32, height: u32) -> Page {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Page::new(data, width, height, 0, 72)
    }

    fn drag(
        editor: &mut RegionEditor,
        from: Point,
        to: Point,
        transform: &DisplayTransform,
        page: &mut Page,
        blurrer: &dyn RegionBlurrer,
    ) -> Option<Region> {
        editor.begin_selection(from);
        editor.update_selection(to);
        editor.commit_selection(to, transform, page, blurrer).unwrap()
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut editor = RegionEditor::new();
        assert_eq!(editor.state(), SelectionState::Idle);

        editor.begin_selection(Point::new(1.0, 2.0));
        assert!(editor.is_selecting());

        let mut page = checker_page(10, 10);
        editor
            .commit_selection(
                Point::new(8.0, 8.0),
                &DisplayTransform::identity(),
                &mut page,
                &RecordingBlurrer::default(),
            )
            .unwrap();
        assert_eq!(editor.state(), SelectionState::Idle);
    }

    #[test]
    fn test_update_while_idle_is_ignored() {
        let mut editor = RegionEditor::new();
        assert_eq!(editor.update_selection(Point::new(5.0, 5.0)), None);
        assert_eq!(editor.state(), SelectionState::Idle);
    }

    #[test]
    fn test_update_returns_normalized_live_rect() {
        let mut editor = RegionEditor::new();
        editor.begin_selection(Point::new(50.0, 40.0));
        let rect = editor.update_selection(Point::new(10.0, 60.0)).unwrap();
        assert_eq!(rect, DisplayRect { x: 10.0, y: 40.0, width: 40.0, height: 20.0 });
        assert_eq!(editor.live_rect(), Some(rect));
    }

    #[test]
    fn test_begin_while_selecting_restarts() {
        let mut editor = RegionEditor::new();
        editor.begin_selection(Point::new(0.0, 0.0));
        editor.update_selection(Point::new(30.0, 30.0));
        editor.begin_selection(Point::new(5.0, 5.0));
        assert_eq!(
            editor.state(),
            SelectionState::Selecting {
                anchor: Point::new(5.0, 5.0),
                current: Point::new(5.0, 5.0),
            }
        );
    }

    #[test]
    fn test_drag_point_tracks_live_corner_not_rect_corner() {
        let mut editor = RegionEditor::new();
        assert_eq!(editor.drag_point(), None);
        editor.begin_selection(Point::new(200.0, 200.0));
        editor.update_selection(Point::new(50.0, 50.0));
        assert_eq!(editor.drag_point(), Some(Point::new(50.0, 50.0)));
        editor.cancel_selection();
        assert_eq!(editor.drag_point(), None);
    }

    #[test]
    fn test_update_does_not_touch_page() {
        let mut editor = RegionEditor::new();
        let page = checker_page(20, 20);
        let original = page.clone();
        editor.begin_selection(Point::new(0.0, 0.0));
        editor.update_selection(Point::new(15.0, 15.0));
        assert_eq!(page, original);
    }

    #[test]
    fn test_cancel_discards_drag_without_blurring() {
        let mut editor = RegionEditor::new();
        let blurrer = RecordingBlurrer::default();
        let mut page = checker_page(20, 20);
        editor.begin_selection(Point::new(0.0, 0.0));
        editor.cancel_selection();
        let result = editor
            .commit_selection(
                Point::new(15.0, 15.0),
                &DisplayTransform::identity(),
                &mut page,
                &blurrer,
            )
            .unwrap();
        assert_eq!(result, None);
        assert!(blurrer.calls.borrow().is_empty());
    }

    #[test]
    fn test_commit_maps_through_transform() {
        // 100x100 page shown at 2x with a 50 px left letterbox
        let transform = DisplayTransform::contain(100, 100, Size::new(300.0, 200.0));
        let blurrer = RecordingBlurrer::default();
        let mut page = checker_page(100, 100);
        let region = drag(
            &mut RegionEditor::new(),
            Point::new(70.0, 20.0),
            Point::new(90.0, 60.0),
            &transform,
            &mut page,
            &blurrer,
        );
        assert_eq!(region, Some(Region::new(10, 10, 10, 20)));
        assert_eq!(blurrer.calls.borrow().as_slice(), &[Region::new(10, 10, 10, 20)]);
    }

    #[rstest]
    #[case::click(Point::new(10.0, 10.0), Point::new(10.0, 10.0))]
    #[case::one_pixel_wide(Point::new(10.0, 10.0), Point::new(11.0, 30.0))]
    #[case::left_of_page(Point::new(-40.0, 5.0), Point::new(-10.0, 15.0))]
    #[case::below_page(Point::new(5.0, 60.0), Point::new(15.0, 90.0))]
    fn test_degenerate_selection_is_noop(#[case] from: Point, #[case] to: Point) {
        let blurrer = RecordingBlurrer::default();
        let mut page = checker_page(50, 50);
        let region = drag(
            &mut RegionEditor::new(),
            from,
            to,
            &DisplayTransform::identity(),
            &mut page,
            &blurrer,
        );
        assert_eq!(region, None);
        assert!(blurrer.calls.borrow().is_empty());
    }

    #[test]
    fn test_selection_fully_outside_leaves_bitmap_unchanged() {
        let blurrer = CpuGaussianBlurrer::new(2.0).unwrap();
        let mut page = checker_page(40, 40);
        let original = page.clone();
        drag(
            &mut RegionEditor::new(),
            Point::new(50.0, 50.0),
            Point::new(90.0, 90.0),
            &DisplayTransform::identity(),
            &mut page,
            &blurrer,
        );
        assert_eq!(page, original);
    }

    #[test]
    fn test_partially_outside_blurs_only_intersection() {
        let blurrer = CpuGaussianBlurrer::new(2.0).unwrap();
        let mut page = checker_page(40, 40);
        let original = page.clone();
        let region = drag(
            &mut RegionEditor::new(),
            Point::new(25.0, -10.0),
            Point::new(60.0, 15.0),
            &DisplayTransform::identity(),
            &mut page,
            &blurrer,
        )
        .unwrap();

        assert_eq!(region, Region::new(25, 0, 15, 15));
        for y in 0..40 {
            for x in 0..40 {
                if !region.contains(x, y) {
                    assert_eq!(page.pixel(x, y), original.pixel(x, y), "({x}, {y})");
                }
            }
        }
        assert_ne!(page.data(), original.data());
    }

    #[test]
    fn test_repeated_commit_blurs_further() {
        let blurrer = CpuGaussianBlurrer::new(1.0).unwrap();
        let mut editor = RegionEditor::new();
        let mut page = checker_page(30, 30);
        let transform = DisplayTransform::identity();
        let (a, b) = (Point::new(5.0, 5.0), Point::new(25.0, 25.0));

        drag(&mut editor, a, b, &transform, &mut page, &blurrer);
        let once = page.clone();
        drag(&mut editor, a, b, &transform, &mut page, &blurrer);

        assert_ne!(page.data(), once.data());
    }

    #[rstest]
    #[case::down_right(Point::new(5.0, 5.0), Point::new(25.0, 15.0))]
    #[case::up_left(Point::new(25.0, 15.0), Point::new(5.0, 5.0))]
    #[case::up_right(Point::new(5.0, 15.0), Point::new(25.0, 5.0))]
    fn test_map_selection_any_direction(#[case] a: Point, #[case] b: Point) {
        let region = map_selection(a, b, &DisplayTransform::identity(), 30, 30);
        assert_eq!(region, Some(Region::new(5, 5, 20, 10)));
    }
}
