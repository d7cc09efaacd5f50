#![forbid(unsafe_code)]

//! Drives an [`OverlayManager`] from a [`TourSession`].
//!
//! Every session transition that changes the visible step is followed by a
//! full re-mount. Closing tears the overlay down and restores the page
//! before the host's close callback runs.

use tracing::{debug, info};

use tour_core::config::TourConfig;
use tour_core::error::ConfigError;

use crate::overlay::{MountOutcome, NavControl, OverlayBackend, OverlayError, OverlayManager};
use crate::session::{TourEvent, TourSession};

/// Result of a driver call: the transition (if any) and what got mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct TourUpdate {
    pub event: Option<TourEvent>,
    pub mount: Option<MountOutcome>,
}

impl TourUpdate {
    const NONE: Self = Self {
        event: None,
        mount: None,
    };

    /// Whether the call changed anything.
    pub fn changed(&self) -> bool {
        self.event.is_some()
    }
}

/// A tour session bound to a rendering backend.
#[derive(Debug)]
pub struct Tour<B: OverlayBackend> {
    session: TourSession,
    overlay: OverlayManager<B>,
}

impl<B: OverlayBackend> Tour<B> {
    /// Bind an existing session to an overlay manager.
    ///
    /// A manager that has never been opened gets its closed classes applied
    /// here, so the modal root is styled before the first `open`.
    pub fn new(session: TourSession, mut overlay: OverlayManager<B>) -> Self {
        if !overlay.is_open() {
            overlay.set_open(false);
        }
        Self { session, overlay }
    }

    /// Build from configuration with the host's close callback.
    pub fn from_config(
        config: TourConfig,
        backend: B,
        on_close: impl FnMut(usize) + 'static,
    ) -> Result<Self, ConfigError> {
        let TourConfig {
            steps,
            placement,
            classes,
        } = config;
        classes.validate()?;
        let session = TourSession::builder()
            .validated_steps(steps)
            .on_close(on_close)
            .build()?;
        let overlay = OverlayManager::with_config(backend, placement, classes);
        Ok(Self::new(session, overlay))
    }

    pub fn session(&self) -> &TourSession {
        &self.session
    }

    pub fn overlay(&self) -> &OverlayManager<B> {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayManager<B> {
        &mut self.overlay
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    /// Open at step 0 and mount it.
    pub fn open(&mut self) -> Result<TourUpdate, OverlayError<B::Error>> {
        let Some(event) = self.session.open() else {
            return Ok(TourUpdate::NONE);
        };
        info!(steps = self.session.step_count(), "tour opened");
        self.overlay.set_open(true);
        let mount = self.mount_current()?;
        Ok(TourUpdate {
            event: Some(event),
            mount,
        })
    }

    pub fn next(&mut self) -> Result<TourUpdate, OverlayError<B::Error>> {
        let event = self.session.next();
        self.after_step_change(event)
    }

    pub fn prev(&mut self) -> Result<TourUpdate, OverlayError<B::Error>> {
        let event = self.session.prev();
        self.after_step_change(event)
    }

    pub fn jump_to(&mut self, index: usize) -> Result<TourUpdate, OverlayError<B::Error>> {
        let event = self.session.jump_to(index);
        self.after_step_change(event)
    }

    /// Tear down the overlay, restore the page, then close the session.
    pub fn close(&mut self) -> TourUpdate {
        if !self.session.is_open() {
            return TourUpdate::NONE;
        }
        self.overlay.set_open(false);
        let event = self.session.close();
        info!(?event, "tour closed");
        TourUpdate { event, mount: None }
    }

    /// Reactive equivalent of [`open`](Self::open) / [`close`](Self::close).
    pub fn set_open(&mut self, open: bool) -> Result<TourUpdate, OverlayError<B::Error>> {
        if open {
            self.open()
        } else {
            Ok(self.close())
        }
    }

    /// Route a clicked control to its transition.
    pub fn dispatch(&mut self, control: NavControl) -> Result<TourUpdate, OverlayError<B::Error>> {
        debug!(?control, "tour control activated");
        match control {
            NavControl::Next => self.next(),
            NavControl::Prev => self.prev(),
            NavControl::Close => Ok(self.close()),
            NavControl::Dot(index) => self.jump_to(index),
        }
    }

    /// Re-measure and re-mount the current step (after scroll or resize).
    pub fn refresh(&mut self) -> Result<Option<MountOutcome>, OverlayError<B::Error>> {
        self.mount_current()
    }

    fn after_step_change(
        &mut self,
        event: Option<TourEvent>,
    ) -> Result<TourUpdate, OverlayError<B::Error>> {
        if event.is_none() {
            return Ok(TourUpdate::NONE);
        }
        let mount = self.mount_current()?;
        Ok(TourUpdate { event, mount })
    }

    fn mount_current(&mut self) -> Result<Option<MountOutcome>, OverlayError<B::Error>> {
        let Some(step) = self.session.current_step() else {
            return Ok(None);
        };
        self.overlay.mount(step, self.session.steps()).map(Some)
    }
}
