//! Stateless layout and hit-test helpers over host-owned elements.

use serde::{Deserialize, Serialize};

/// Half-open rectangle: `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Padding or margin on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Receives intercept-suppression requests from a child.
pub trait InterceptParent {
    fn request_disallow_intercept(&self, disallow: bool);
}

pub trait Element {
    /// Bounds in the parent's coordinate frame.
    fn bounds(&self) -> Bounds;

    /// Absolute position of the top-left corner on screen.
    fn screen_origin(&self) -> (i32, i32);

    fn width(&self) -> i32 {
        self.bounds().width()
    }

    fn height(&self) -> i32 {
        self.bounds().height()
    }

    /// `None` when the element's layout carries no margins.
    fn margins(&self) -> Option<Insets> {
        None
    }

    /// Negative `direction` probes left, positive probes right.
    fn can_scroll_horizontally(&self, direction: i32) -> bool;

    /// Negative `direction` probes up, positive probes down.
    fn can_scroll_vertically(&self, direction: i32) -> bool;

    fn parent(&self) -> Option<&dyn InterceptParent> {
        None
    }
}

pub trait Container {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn padding(&self) -> Insets;
}

/// Adjusts `delta` so that `current + delta` stays within `[min, max]`.
pub fn legal_delta(current: i32, min: i32, max: i32, delta: i32) -> i32 {
    if delta == 0 {
        return 0;
    }
    let (current, min, max, delta) = (
        i64::from(current),
        i64::from(min),
        i64::from(max),
        i64::from(delta),
    );
    let future = current + delta;
    let legal = if future < min {
        delta + (min - future)
    } else if future > max {
        delta + (max - future)
    } else {
        delta
    };
    // saturate when the range is wider than an i32 step can cover
    legal.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub fn is_point_under_element(bounds: &Bounds, x: i32, y: i32) -> bool {
    bounds.contains(x, y)
}

pub fn is_point_under_element_on_screen<E: Element + ?Sized>(element: &E, x: i32, y: i32) -> bool {
    let (left, top) = element.screen_origin();
    Bounds::new(
        left,
        top,
        left.saturating_add(element.width()),
        top.saturating_add(element.height()),
    )
    .contains(x, y)
}

/// Every child containing the point, frontmost first. The last child is the
/// topmost in z-order.
pub fn find_topmost_elements_under<E: Element>(children: &[E], x: i32, y: i32) -> Vec<&E> {
    let mut found = Vec::with_capacity(2);
    for child in children.iter().rev() {
        if is_point_under_element(&child.bounds(), x, y) {
            found.push(child);
        }
    }
    found
}

fn margin_of<E: Element + ?Sized>(child: &E, with_margin: bool, side: fn(&Insets) -> i32) -> i32 {
    if !with_margin {
        return 0;
    }
    child.margins().as_ref().map_or(0, side)
}

/// `left` the child needs to sit against the container's left edge.
pub fn left_align_container_left<C, E>(container: &C, child: &E, with_margin: bool) -> i32
where
    C: Container + ?Sized,
    E: Element + ?Sized,
{
    container.padding().left + margin_of(child, with_margin, |m| m.left)
}

/// `left` the child needs to sit against the container's right edge.
pub fn left_align_container_right<C, E>(container: &C, child: &E, with_margin: bool) -> i32
where
    C: Container + ?Sized,
    E: Element + ?Sized,
{
    container.width() - container.padding().right - child.width()
        - margin_of(child, with_margin, |m| m.right)
}

/// `top` the child needs to sit against the container's top edge.
pub fn top_align_container_top<C, E>(container: &C, child: &E, with_margin: bool) -> i32
where
    C: Container + ?Sized,
    E: Element + ?Sized,
{
    container.padding().top + margin_of(child, with_margin, |m| m.top)
}

/// `top` the child needs to sit against the container's bottom edge.
///
/// Subtracts the container's bottom padding. The Java `getTopAlignParentBottom`
/// this helper is usually ported from subtracts the top padding instead.
pub fn top_align_container_bottom<C, E>(container: &C, child: &E, with_margin: bool) -> i32
where
    C: Container + ?Sized,
    E: Element + ?Sized,
{
    container.height() - container.padding().bottom - child.height()
        - margin_of(child, with_margin, |m| m.bottom)
}

pub fn is_scroll_exhausted_left<E: Element + ?Sized>(element: &E) -> bool {
    !element.can_scroll_horizontally(-1)
}

pub fn is_scroll_exhausted_top<E: Element + ?Sized>(element: &E) -> bool {
    !element.can_scroll_vertically(-1)
}

pub fn is_scroll_exhausted_right<E: Element + ?Sized>(element: &E) -> bool {
    !element.can_scroll_horizontally(1)
}

pub fn is_scroll_exhausted_bottom<E: Element + ?Sized>(element: &E) -> bool {
    !element.can_scroll_vertically(1)
}

/// Asks the element's parent to stop (or resume) intercepting its events.
pub fn request_parent_not_intercept<E: Element + ?Sized>(element: &E, disallow: bool) {
    if let Some(parent) = element.parent() {
        parent.request_disallow_intercept(disallow);
    }
}
