#![forbid(unsafe_code)]

//! Capability interface between the overlay manager and a rendering backend.
//!
//! A backend owns the modal root and knows how to measure, clone, and mount.
//! The manager decides *what* to mount and *when*; it never touches the
//! document directly.

use std::borrow::Cow;

use tour_core::config::ClassNames;
use tour_core::geometry::{Rect, Size, Viewport};

use super::bubble::{Bubble, BubbleContent};

/// A navigation control inside the bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavControl {
    Prev,
    Next,
    Close,
    /// Position-indicator dot for the step at this index.
    Dot(usize),
}

impl NavControl {
    /// Value of the `data-tour-control` attribute for this control.
    pub fn attr_value(self) -> Cow<'static, str> {
        match self {
            Self::Prev => Cow::Borrowed("prev"),
            Self::Next => Cow::Borrowed("next"),
            Self::Close => Cow::Borrowed("close"),
            Self::Dot(index) => Cow::Owned(format!("dot-{index}")),
        }
    }

    /// Parse a `data-tour-control` attribute value.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "prev" => Some(Self::Prev),
            "next" => Some(Self::Next),
            "close" => Some(Self::Close),
            other => other
                .strip_prefix("dot-")
                .and_then(|index| index.parse().ok())
                .map(Self::Dot),
        }
    }
}

/// Reference to a click handler a backend attached.
///
/// The manager keeps every id it receives and hands each one back to
/// [`OverlayBackend::unbind_control`] before the overlay is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Everything a backend needs to draw one step.
#[derive(Debug, Clone)]
pub struct OverlayTree<N> {
    /// Id of the element the clone was taken from.
    pub step_id: String,
    pub position: usize,
    /// Detached deep copy of the target.
    pub clone: N,
    /// Where the clone goes; the target's measured rect.
    pub clone_rect: Rect,
    pub bubble: Bubble,
    pub classes: ClassNames,
}

impl<N> OverlayTree<N> {
    /// Inner HTML for the bubble element.
    pub fn bubble_markup(&self) -> String {
        self.bubble.content.to_markup(&self.classes)
    }

    /// Inline style placing the clone exactly over the original.
    pub fn clone_style(&self) -> String {
        let r = self.clone_rect;
        format!(
            "top: {}px; left: {}px; width: {}px; height: {}px; position: absolute;",
            r.top, r.left, r.width, r.height
        )
    }

    /// Inline style positioning the bubble.
    pub fn bubble_style(&self) -> String {
        let p = self.bubble.placement;
        format!("left: {}px; top: {}px;", p.left, p.top)
    }
}

/// Rendering capability used by [`OverlayManager`](super::OverlayManager).
pub trait OverlayBackend {
    /// Backend-specific handle for a cloned element.
    type Node;
    /// Backend failure type.
    type Error: std::error::Error + 'static;

    /// Current viewport width and modal-root scroll height.
    fn viewport(&self) -> Viewport;

    /// Live bounding rectangle of the element with `id`, if it exists.
    fn measure_rect(&self, id: &str) -> Option<Rect>;

    /// Detached deep copy of the element with `id`, if it exists.
    fn clone_target_element(&mut self, id: &str) -> Option<Self::Node>;

    /// Rendered size of a bubble with this content.
    fn measure_bubble(&mut self, content: &BubbleContent, classes: &ClassNames) -> Size;

    /// Append the overlay to the modal root.
    fn mount_overlay(&mut self, tree: OverlayTree<Self::Node>) -> Result<(), Self::Error>;

    /// Attach a click handler for `control` in the mounted bubble.
    fn bind_control(&mut self, control: NavControl) -> Result<HandlerId, Self::Error>;

    /// Detach a handler previously returned by [`bind_control`](Self::bind_control).
    fn unbind_control(&mut self, handler: HandlerId);

    /// Remove every child of the modal root.
    fn unmount_overlay(&mut self);

    /// Toggle the modal state classes and freeze or restore page scrolling.
    fn set_modal_open(&mut self, open: bool, classes: &ClassNames);
}
