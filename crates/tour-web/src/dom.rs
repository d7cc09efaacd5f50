#![forbid(unsafe_code)]

//! [`OverlayBackend`] over the browser DOM.
//!
//! The modal and app roots are looked up once, by id, at construction. The
//! overlay for a step is a wrapper `div` carrying the app's last child's
//! classes, holding the deep-cloned target (absolutely positioned over the
//! original) and the bubble. A persistent host slot is appended after the
//! wrapper on every mount.
//!
//! Click handlers never call back into the tour synchronously. They hand the
//! control to a [`ControlSink`], which is expected to defer dispatch; the
//! handler's closure may be dropped by the very dispatch it triggers.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tour_core::config::ClassNames;
use tour_core::geometry::{Rect, Size, Viewport};
use tour_widgets::overlay::CONTROL_ATTR;
use tour_widgets::{BubbleContent, HandlerId, NavControl, OverlayBackend, OverlayTree};
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, DomTokenList, Element, Event, HtmlElement, Window};

use crate::error::DomError;

/// Receives every control the user clicks.
pub type ControlSink = Rc<dyn Fn(NavControl)>;

const HOST_SLOT_CLASS: &str = "tour-host-slot";
const HIDDEN_STYLE: &str = "visibility: hidden; position: absolute; left: 0px; top: 0px;";

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

struct BoundHandler {
    target: Element,
    closure: Closure<dyn FnMut(Event)>,
}

impl BoundHandler {
    fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("click", self.closure.as_ref().unchecked_ref());
    }
}

/// Browser rendering backend.
pub struct DomBackend {
    window: Window,
    document: Document,
    modal_root: HtmlElement,
    app_root: Element,
    host_slot: Element,
    bubble: Option<Element>,
    handlers: BTreeMap<HandlerId, BoundHandler>,
    next_handler: u64,
    sink: Option<ControlSink>,
    /// Page offset saved while the modal is open.
    frozen_scroll: Option<f64>,
}

impl fmt::Debug for DomBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomBackend")
            .field("modal_root", &self.modal_root.id())
            .field("app_root", &self.app_root.id())
            .field("mounted", &self.bubble.is_some())
            .field("handlers", &self.handlers.len())
            .field("has_sink", &self.sink.is_some())
            .field("frozen_scroll", &self.frozen_scroll)
            .finish()
    }
}

impl DomBackend {
    /// Bind to the modal root and app root with these element ids.
    pub fn new(modal_root_id: &str, app_root_id: &str) -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::NoWindow)?;
        let document = window.document().ok_or(DomError::NoDocument)?;
        let modal_root = document
            .get_element_by_id(modal_root_id)
            .ok_or_else(|| DomError::MissingRoot(modal_root_id.to_string()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::NotHtml(modal_root_id.to_string()))?;
        let app_root = document
            .get_element_by_id(app_root_id)
            .ok_or_else(|| DomError::MissingRoot(app_root_id.to_string()))?;
        let host_slot = document.create_element("div")?;
        host_slot.set_class_name(HOST_SLOT_CLASS);
        Ok(Self {
            window,
            document,
            modal_root,
            app_root,
            host_slot,
            bubble: None,
            handlers: BTreeMap::new(),
            next_handler: 1,
            sink: None,
            frozen_scroll: None,
        })
    }

    /// Where clicked controls are delivered.
    pub fn set_control_sink(&mut self, sink: ControlSink) {
        self.sink = Some(sink);
    }

    /// Element the host may render its own content into. It lives in the
    /// modal root next to the overlay while a step is mounted.
    pub fn host_slot(&self) -> &Element {
        &self.host_slot
    }

    pub fn modal_root(&self) -> &HtmlElement {
        &self.modal_root
    }

    pub fn live_handlers(&self) -> usize {
        self.handlers.len()
    }

    fn freeze_scroll(&mut self) {
        let Some(body) = self.document.body() else {
            return;
        };
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let style = body.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("top", &format!("-{scroll_y}px"));
        self.frozen_scroll = Some(scroll_y);
        debug!(scroll_y, "page scroll frozen");
    }

    /// Undo [`freeze_scroll`](Self::freeze_scroll). Nothing happens if the
    /// page was never frozen.
    fn restore_scroll(&mut self) {
        let Some(scroll_y) = self.frozen_scroll.take() else {
            return;
        };
        if let Some(body) = self.document.body() {
            let style = body.style();
            let _ = style.remove_property("position");
            let _ = style.remove_property("top");
        }
        self.window.scroll_to_with_x_and_y(0.0, scroll_y);
        debug!(scroll_y, "page scroll restored");
    }

    fn build_wrapper(&self) -> Result<Element, DomError> {
        let wrapper = self.document.create_element("div")?;
        if let Some(last) = self.app_root.last_element_child() {
            wrapper.set_class_name(&last.class_name());
        }
        Ok(wrapper)
    }
}

impl OverlayBackend for DomBackend {
    type Node = HtmlElement;
    type Error = DomError;

    fn viewport(&self) -> Viewport {
        let inner = self
            .window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0);
        let document_width = self
            .document
            .document_element()
            .map_or(0, |el| el.client_width());
        let body_width = self.document.body().map_or(0, |body| body.client_width());
        let width = inner
            .max(f64::from(document_width))
            .max(f64::from(body_width));
        Viewport::new(width, f64::from(self.modal_root.scroll_height()))
    }

    fn measure_rect(&self, id: &str) -> Option<Rect> {
        let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
        Some(Rect::new(rect.top(), rect.left(), rect.width(), rect.height()))
    }

    fn clone_target_element(&mut self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)?
            .clone_node_with_deep(true)
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    /// Lay out a hidden copy of the bubble inside a wrapper carrying the
    /// app's classes, so inherited styles match the mounted bubble.
    fn measure_bubble(&mut self, content: &BubbleContent, classes: &ClassNames) -> Size {
        let Ok(wrapper) = self.build_wrapper() else {
            return Size::default();
        };
        let Ok(sample) = self.document.create_element("div") else {
            return Size::default();
        };
        sample.set_class_name(&classes.bubble);
        sample.set_inner_html(&content.to_markup(classes));
        let _ = sample.set_attribute("style", HIDDEN_STYLE);
        if wrapper.append_child(&sample).is_err() || self.modal_root.append_child(&wrapper).is_err()
        {
            return Size::default();
        }
        let size = sample.dyn_ref::<HtmlElement>().map_or_else(Size::default, |el| {
            Size::new(f64::from(el.offset_width()), f64::from(el.offset_height()))
        });
        wrapper.remove();
        size
    }

    fn mount_overlay(&mut self, tree: OverlayTree<HtmlElement>) -> Result<(), DomError> {
        let wrapper = self.build_wrapper()?;

        tree.clone.set_attribute("style", &tree.clone_style())?;
        tree.clone.class_list().add_1(&tree.classes.overlay_element)?;
        wrapper.append_child(&tree.clone)?;

        let bubble = self.document.create_element("div")?;
        bubble.set_class_name(&tree.classes.bubble);
        bubble.set_inner_html(&tree.bubble_markup());
        bubble.set_attribute("style", &tree.bubble_style())?;
        wrapper.append_child(&bubble)?;

        self.modal_root.append_child(&wrapper)?;
        self.modal_root.append_child(&self.host_slot)?;
        self.bubble = Some(bubble);
        Ok(())
    }

    fn bind_control(&mut self, control: NavControl) -> Result<HandlerId, DomError> {
        let bubble = self.bubble.as_ref().ok_or(DomError::NotMounted)?;
        let value = control.attr_value();
        let target = bubble
            .query_selector(&format!("[{CONTROL_ATTR}='{value}']"))?
            .ok_or_else(|| DomError::MissingControl(value.into_owned()))?;

        let sink = self.sink.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            if let Some(sink) = &sink {
                sink(control);
            }
        });
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;

        let id = HandlerId::new(self.next_handler);
        self.next_handler += 1;
        self.handlers.insert(id, BoundHandler { target, closure });
        trace!(handler = id.get(), ?control, "click listener attached");
        Ok(id)
    }

    fn unbind_control(&mut self, handler: HandlerId) {
        if let Some(bound) = self.handlers.remove(&handler) {
            bound.detach();
        }
    }

    fn unmount_overlay(&mut self) {
        for (_, bound) in std::mem::take(&mut self.handlers) {
            bound.detach();
        }
        self.bubble = None;
        while let Some(child) = self.modal_root.last_element_child() {
            let _ = self.modal_root.remove_child(&child);
        }
    }

    fn set_modal_open(&mut self, open: bool, classes: &ClassNames) {
        let list = self.modal_root.class_list();
        if open {
            swap_class(&list, &classes.modal_open, &classes.modal_close);
            self.freeze_scroll();
        } else {
            swap_class(&list, &classes.modal_close, &classes.modal_open);
            self.restore_scroll();
        }
    }
}

fn swap_class(list: &DomTokenList, add: &str, remove: &str) {
    if let Err(err) = list.remove_1(remove) {
        warn!(class = remove, error = ?err, "failed to remove modal class");
    }
    if let Err(err) = list.add_1(add) {
        warn!(class = add, error = ?err, "failed to add modal class");
    }
}
