#![forbid(unsafe_code)]

//! In-memory backend for tests and non-browser hosts.
//!
//! Models just enough of a document to exercise the overlay manager: a set
//! of element rectangles, a modal root holding at most one overlay, bound
//! click handlers, root classes, and a scroll position that is frozen while
//! the modal is open.

use std::collections::BTreeMap;

use ahash::AHashMap;
use tour_core::config::ClassNames;
use tour_core::geometry::{Rect, Size, Viewport};

use super::backend::{HandlerId, NavControl, OverlayBackend, OverlayTree};
use super::bubble::BubbleContent;

/// Clone produced by [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessNode {
    pub source_id: String,
}

/// Operations recorded in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOp {
    Mount { step_id: String, position: usize },
    Unmount,
    Bind(NavControl),
    Unbind(NavControl),
    SetOpen(bool),
}

/// Error injected through [`HeadlessBackend::fail_bind_after`],
/// [`HeadlessBackend::fail_mount`] or
/// [`HeadlessBackend::fail_next_mount_after_write`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("headless backend: {0}")]
pub struct HeadlessError(pub &'static str);

/// Document stand-in.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    viewport: Viewport,
    elements: AHashMap<String, Rect>,
    bubble_height: f64,
    mounted: Option<OverlayTree<HeadlessNode>>,
    handlers: BTreeMap<HandlerId, NavControl>,
    next_handler: u64,
    root_classes: Vec<String>,
    scroll_y: f64,
    frozen_scroll: Option<f64>,
    ops: Vec<BackendOp>,
    binds_before_failure: Option<usize>,
    fail_mount: bool,
    fail_after_write: bool,
}

impl HeadlessBackend {
    /// Empty document with the given viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: AHashMap::new(),
            bubble_height: 100.0,
            mounted: None,
            handlers: BTreeMap::new(),
            next_handler: 1,
            root_classes: Vec::new(),
            scroll_y: 0.0,
            frozen_scroll: None,
            ops: Vec::new(),
            binds_before_failure: None,
            fail_mount: false,
            fail_after_write: false,
        }
    }

    /// Add an element.
    #[must_use]
    pub fn with_element(mut self, id: impl Into<String>, rect: Rect) -> Self {
        self.elements.insert(id.into(), rect);
        self
    }

    /// Height reported for every bubble.
    #[must_use]
    pub fn with_bubble_height(mut self, height: f64) -> Self {
        self.bubble_height = height;
        self
    }

    /// Let `n` binds succeed, then fail every later one.
    #[must_use]
    pub fn fail_bind_after(mut self, n: usize) -> Self {
        self.binds_before_failure = Some(n);
        self
    }

    /// Make every mount fail.
    #[must_use]
    pub fn fail_mount(mut self, fail: bool) -> Self {
        self.fail_mount = fail;
        self
    }

    /// Let the next mount write its overlay into the modal root, then report
    /// failure anyway. Later mounts succeed.
    #[must_use]
    pub fn fail_next_mount_after_write(mut self) -> Self {
        self.fail_after_write = true;
        self
    }

    /// Move or resize an element (layout shift).
    pub fn set_element(&mut self, id: impl Into<String>, rect: Rect) {
        self.elements.insert(id.into(), rect);
    }

    /// Remove an element from the document.
    pub fn remove_element(&mut self, id: &str) {
        self.elements.remove(id);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Scroll the page. Ignored while the modal has scrolling frozen.
    pub fn scroll_to(&mut self, y: f64) {
        if self.frozen_scroll.is_none() {
            self.scroll_y = y;
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Body offset applied while scrolling is frozen.
    pub fn body_top(&self) -> Option<f64> {
        self.frozen_scroll.map(|y| -y)
    }

    /// The overlay currently in the modal root.
    pub fn mounted(&self) -> Option<&OverlayTree<HeadlessNode>> {
        self.mounted.as_ref()
    }

    /// Number of handlers still attached.
    pub fn live_handlers(&self) -> usize {
        self.handlers.len()
    }

    pub fn root_classes(&self) -> &[String] {
        &self.root_classes
    }

    pub fn ops(&self) -> &[BackendOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Simulate a click: returns the control only if a handler is attached.
    pub fn click(&self, control: NavControl) -> Option<NavControl> {
        self.handlers.values().any(|c| *c == control).then_some(control)
    }

    fn set_class(&mut self, class: &str, present: bool) {
        let idx = self.root_classes.iter().position(|c| c == class);
        match (idx, present) {
            (None, true) => self.root_classes.push(class.to_string()),
            (Some(i), false) => {
                self.root_classes.remove(i);
            }
            _ => {}
        }
    }
}

impl OverlayBackend for HeadlessBackend {
    type Node = HeadlessNode;
    type Error = HeadlessError;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn measure_rect(&self, id: &str) -> Option<Rect> {
        self.elements.get(id).copied()
    }

    fn clone_target_element(&mut self, id: &str) -> Option<HeadlessNode> {
        self.elements.contains_key(id).then(|| HeadlessNode {
            source_id: id.to_string(),
        })
    }

    fn measure_bubble(&mut self, _content: &BubbleContent, _classes: &ClassNames) -> Size {
        Size::new(0.0, self.bubble_height)
    }

    fn mount_overlay(&mut self, tree: OverlayTree<HeadlessNode>) -> Result<(), HeadlessError> {
        if self.fail_mount {
            return Err(HeadlessError("mount rejected"));
        }
        self.ops.push(BackendOp::Mount {
            step_id: tree.step_id.clone(),
            position: tree.position,
        });
        self.mounted = Some(tree);
        if std::mem::take(&mut self.fail_after_write) {
            return Err(HeadlessError("mount interrupted"));
        }
        Ok(())
    }

    fn bind_control(&mut self, control: NavControl) -> Result<HandlerId, HeadlessError> {
        if self.mounted.is_none() {
            return Err(HeadlessError("no bubble mounted"));
        }
        if let Some(remaining) = self.binds_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(HeadlessError("bind rejected"));
            }
            *remaining -= 1;
        }
        let id = HandlerId::new(self.next_handler);
        self.next_handler += 1;
        self.handlers.insert(id, control);
        self.ops.push(BackendOp::Bind(control));
        Ok(id)
    }

    fn unbind_control(&mut self, handler: HandlerId) {
        if let Some(control) = self.handlers.remove(&handler) {
            self.ops.push(BackendOp::Unbind(control));
        }
    }

    fn unmount_overlay(&mut self) {
        self.mounted = None;
        self.ops.push(BackendOp::Unmount);
    }

    fn set_modal_open(&mut self, open: bool, classes: &ClassNames) {
        self.set_class(&classes.modal_open, open);
        self.set_class(&classes.modal_close, !open);
        if open {
            self.frozen_scroll = Some(self.scroll_y);
        } else if let Some(y) = self.frozen_scroll.take() {
            self.scroll_y = y;
        }
        self.ops.push(BackendOp::SetOpen(open));
    }
}
