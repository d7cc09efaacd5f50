#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for [`TourGuide`].
//!
//! Only compiled on `wasm32` targets.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::Function;
use tour_core::config::TourConfig;
use tour_core::error::ConfigError;
use tour_widgets::{NavControl, OverlayError, Tour, TourUpdate};
use tracing::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::DomBackend;
use crate::error::DomError;
use crate::logging;

type Transition = Result<TourUpdate, OverlayError<DomError>>;

struct Shared {
    tour: RefCell<Tour<DomBackend>>,
    /// Last index recorded by the session's close callback, pending delivery.
    closed: Rc<Cell<Option<usize>>>,
    on_close: Function,
}

impl Shared {
    /// Run one transition, then deliver `onClose` once the tour is released
    /// so the host may call back into the guide.
    fn apply(&self, f: impl FnOnce(&mut Tour<DomBackend>) -> Transition) -> bool {
        let result = match self.tour.try_borrow_mut() {
            Ok(mut tour) => f(&mut tour),
            Err(_) => {
                debug!("tour busy; re-entrant call ignored");
                return false;
            }
        };
        if let Some(last) = self.closed.take()
            && let Err(err) = self
                .on_close
                .call1(&JsValue::NULL, &JsValue::from_f64(last as f64))
        {
            error!(?err, "onClose callback threw");
        }
        match result {
            Ok(update) => update.changed(),
            Err(err) => {
                error!(%err, "tour transition failed");
                false
            }
        }
    }
}

/// Defer a clicked control to a fresh task so the listener that fired it
/// can be detached by the resulting re-mount.
fn dispatch_later(shared: Weak<Shared>, control: NavControl) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(shared) = shared.upgrade() {
            shared.apply(|tour| tour.dispatch(control));
        }
    });
}

/// Install console logging with an `EnvFilter` directive.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(directive: Option<String>) {
    logging::init(directive.as_deref().unwrap_or(logging::DEFAULT_DIRECTIVE));
}

/// Guided tour bound to a modal root and an app root.
#[wasm_bindgen]
pub struct TourGuide {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl TourGuide {
    /// `configJson` is either `{ steps, placement?, classes? }` or a bare
    /// steps array. `onClose(lastIndex)` runs after the overlay is torn down.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        modal_root_id: &str,
        app_root_id: &str,
        on_close: JsValue,
    ) -> Result<TourGuide, JsError> {
        logging::install_panic_hook();

        let on_close = on_close
            .dyn_into::<Function>()
            .map_err(|_| ConfigError::MissingCallback("onClose"))?;
        let config = TourConfig::from_json(config_json)?;
        let backend = DomBackend::new(modal_root_id, app_root_id)?;

        let closed = Rc::new(Cell::new(None));
        let record = Rc::clone(&closed);
        let tour = Tour::from_config(config, backend, move |last| record.set(Some(last)))?;

        let shared = Rc::new(Shared {
            tour: RefCell::new(tour),
            closed,
            on_close,
        });
        let weak = Rc::downgrade(&shared);
        shared
            .tour
            .borrow_mut()
            .overlay_mut()
            .backend_mut()
            .set_control_sink(Rc::new(move |control| {
                dispatch_later(weak.clone(), control)
            }));
        debug!(modal_root_id, app_root_id, "tour guide created");
        Ok(Self { shared })
    }

    /// Open at the first step. Returns whether anything changed.
    pub fn open(&self) -> bool {
        self.shared.apply(Tour::open)
    }

    pub fn close(&self) -> bool {
        self.shared.apply(|tour| Ok(tour.close()))
    }

    pub fn next(&self) -> bool {
        self.shared.apply(Tour::next)
    }

    pub fn prev(&self) -> bool {
        self.shared.apply(Tour::prev)
    }

    #[wasm_bindgen(js_name = jumpTo)]
    pub fn jump_to(&self, index: usize) -> bool {
        self.shared.apply(|tour| tour.jump_to(index))
    }

    /// Reactive open flag.
    #[wasm_bindgen(js_name = setOpen)]
    pub fn set_open(&self, open: bool) -> bool {
        self.shared.apply(|tour| tour.set_open(open))
    }

    /// Re-measure the current step after a resize or layout change.
    pub fn refresh(&self) {
        self.shared
            .apply(|tour| tour.refresh().map(|mount| TourUpdate { event: None, mount }));
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.shared.tour.try_borrow().is_ok_and(|tour| tour.is_open())
    }

    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.shared
            .tour
            .try_borrow()
            .map_or(0, |tour| tour.current_index())
    }

    #[wasm_bindgen(js_name = stepCount)]
    pub fn step_count(&self) -> usize {
        self.shared
            .tour
            .try_borrow()
            .map_or(0, |tour| tour.session().step_count())
    }

    /// Element for host content rendered alongside the tour.
    #[wasm_bindgen(js_name = hostSlot)]
    pub fn host_slot(&self) -> Option<web_sys::Element> {
        self.shared
            .tour
            .try_borrow()
            .ok()
            .map(|tour| tour.overlay().backend().host_slot().clone())
    }
}

impl Drop for TourGuide {
    fn drop(&mut self) {
        self.shared.apply(|tour| Ok(tour.close()));
    }
}
