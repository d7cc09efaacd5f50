#![forbid(unsafe_code)]

//! End-to-end overlay lifecycle against the headless backend.
//!
//! Covers mount ordering, handler bookkeeping, missing targets, and the
//! diagnostics emitted for them.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tour_core::config::TourConfig;
use tour_core::geometry::{Rect, Viewport};
use tour_widgets::overlay::headless::{BackendOp, HeadlessBackend};
use tour_widgets::{MountOutcome, NavControl, SkipReason, Tour, TourEvent};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

const SEVEN_STEPS: &str = r#"[
    {"id":"one","content":"This is the first item","position":0},
    {"id":"two","content":"This is the second item","position":1},
    {"id":"three","content":"This is the third item","position":2},
    {"id":"four","content":"This is the fourth item","position":3},
    {"id":"five","content":"This is the fifth item","position":4},
    {"id":"six","content":"This is the sixth item","position":5},
    {"id":"seven","content":"This is the seventh item","position":6}
]"#;

fn backend() -> HeadlessBackend {
    let mut backend = HeadlessBackend::new(Viewport::new(1280.0, 2400.0)).with_bubble_height(140.0);
    for (i, id) in ["one", "two", "three", "four", "five", "six", "seven"]
        .into_iter()
        .enumerate()
    {
        backend.set_element(id, Rect::new(100.0 + 200.0 * i as f64, 40.0 * i as f64, 180.0, 120.0));
    }
    backend
}

fn tour_with(backend: HeadlessBackend, closes: Rc<RefCell<Vec<usize>>>) -> Tour<HeadlessBackend> {
    let config = TourConfig::from_json(SEVEN_STEPS).expect("valid config");
    Tour::from_config(config, backend, move |last| closes.borrow_mut().push(last))
        .expect("valid tour")
}

// ── Tracing capture ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    step_id: Option<String>,
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    step_id: Option<String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "step_id" => self.step_id = Some(format!("{value:?}")),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "step_id" => self.step_id = Some(value.to_string()),
            _ => {}
        }
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            step_id: visitor.step_id,
        });
    }
}

fn with_capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let out = events.lock().unwrap().clone();
    out
}

// ── Tests ───────────────────────────────────────────────────────────────

#[test]
fn full_walkthrough_never_overlaps_two_steps() {
    let closes = Rc::new(RefCell::new(Vec::new()));
    let mut tour = tour_with(backend(), closes.clone());

    tour.open().expect("open");
    for _ in 0..10 {
        tour.next().expect("next");
    }
    assert_eq!(tour.current_index(), 6);
    tour.close();

    let ops = tour.overlay().backend().ops();
    let mut mounted = false;
    for op in ops {
        match op {
            BackendOp::Mount { .. } => {
                assert!(!mounted, "mount while another step is mounted: {ops:?}");
                mounted = true;
            }
            BackendOp::Unmount => mounted = false,
            _ => {}
        }
    }
    assert!(!mounted);
    let mounts = ops
        .iter()
        .filter(|op| matches!(op, BackendOp::Mount { .. }))
        .count();
    assert_eq!(mounts, 7, "one mount per distinct step");
    assert_eq!(*closes.borrow(), vec![6]);
}

#[test]
fn handlers_never_leak_across_remounts() {
    let mut tour = tour_with(backend(), Rc::default());
    tour.open().expect("open");
    // 7 dots + close + prev + next.
    assert_eq!(tour.overlay().backend().live_handlers(), 10);
    for _ in 0..3 {
        tour.next().expect("next");
        assert_eq!(tour.overlay().backend().live_handlers(), 10);
    }
    tour.prev().expect("prev");
    assert_eq!(tour.overlay().backend().live_handlers(), 10);
    tour.close();
    assert_eq!(tour.overlay().backend().live_handlers(), 0);
}

#[test]
fn dot_indicator_tracks_current_step() {
    let mut tour = tour_with(backend(), Rc::default());
    tour.open().expect("open");
    tour.jump_to(3).expect("jump");
    let tree = tour.overlay().backend().mounted().expect("mounted");
    let current: Vec<_> = tree
        .bubble
        .content
        .dots
        .iter()
        .filter(|d| d.current)
        .map(|d| d.position)
        .collect();
    assert_eq!(current, vec![3]);
    assert_eq!(tree.bubble.content.badge, 4);
    assert_eq!(
        tree.bubble_markup()
            .matches("class='highlight tour-highlight'")
            .count(),
        1
    );
}

#[test]
fn clicks_only_reach_bound_controls() {
    let mut tour = tour_with(backend(), Rc::default());
    assert_eq!(tour.overlay().backend().click(NavControl::Next), None);
    tour.open().expect("open");
    let clicked = tour
        .overlay()
        .backend()
        .click(NavControl::Next)
        .expect("next is bound");
    tour.dispatch(clicked).expect("dispatch");
    assert_eq!(tour.current_index(), 1);
}

#[test]
fn missing_target_is_skipped_and_logged() {
    let mut backend = backend();
    backend.remove_element("three");
    let mut tour = tour_with(backend, Rc::default());

    let events = with_capture(|| {
        tour.open().expect("open");
        tour.next().expect("next");
        let update = tour.next().expect("next to missing target");
        assert_eq!(
            update.mount,
            Some(MountOutcome::Skipped(SkipReason::TargetNotFound {
                id: "three".into()
            }))
        );
        assert!(tour.overlay().backend().mounted().is_none());
        let update = tour.next().expect("navigation continues");
        assert!(matches!(
            update.event,
            Some(TourEvent::StepChanged { from: 2, to: 3, .. })
        ));
        assert!(update.mount.is_some_and(|m| m.is_mounted()));
    });

    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1, "events: {events:?}");
    assert_eq!(warnings[0].step_id.as_deref(), Some("three"));
    assert!(warnings[0].message.contains("not found"));
}

#[test]
fn backend_mount_failure_propagates() {
    let mut tour = tour_with(backend().fail_mount(true), Rc::default());
    let err = tour.open().unwrap_err();
    assert!(err.to_string().contains("mount rejected"));
    assert!(tour.is_open(), "session state is unaffected by render failure");
    assert_eq!(tour.close().event, Some(TourEvent::Closed { last_index: 0 }));
}

#[test]
fn bottom_overflow_places_bubble_above() {
    let backend = HeadlessBackend::new(Viewport::new(1280.0, 800.0))
        .with_bubble_height(95.0)
        .with_element("one", Rect::new(650.0, 20.0, 100.0, 40.0))
        .with_element("two", Rect::new(100.0, 20.0, 100.0, 40.0));
    let config = TourConfig::from_json(
        r#"[{"id":"one","content":"a","position":0},{"id":"two","content":"b","position":1}]"#,
    )
    .expect("valid");
    let mut tour = Tour::from_config(config, backend, |_| {}).expect("valid");
    let update = tour.open().expect("open");
    let Some(MountOutcome::Mounted(report)) = update.mount else {
        panic!("expected mount");
    };
    // 690 + 100 > 800 - 100, so 650 - (100 + 150).
    assert_eq!(report.placement.top, 400.0);
    assert_eq!(
        tour.overlay().backend().mounted().expect("mounted").bubble_style(),
        "left: 20px; top: 400px;"
    );
}
