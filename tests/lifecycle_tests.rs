mod common;

use common::*;
use configured_builder::{BuildState, BuilderError, ConfiguredBuilder, Configurer, ObjectBuilder};
use parking_lot::Mutex;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_apply_a_then_b_call_order() {
    let builder = recording_builder();
    builder.apply(Recorder::<1>::new("a")).unwrap();
    builder.apply(Recorder::<2>::new("b")).unwrap();

    let events = builder.build().unwrap();

    assert_eq!(
        *events,
        vec![
            "before_init",
            "a.init",
            "b.init",
            "before_configure",
            "a.configure",
            "b.configure",
            "perform_build",
        ]
    );
}

#[test]
fn test_every_init_precedes_every_configure() {
    let builder = recording_builder();
    builder.apply(Recorder::<1>::new("one")).unwrap();
    builder.apply(Recorder::<2>::new("two")).unwrap();
    builder.apply(Recorder::<3>::new("three")).unwrap();

    let events = builder.build().unwrap();

    let last_init = events.iter().rposition(|e| e.ends_with(".init")).unwrap();
    let first_configure = events.iter().position(|e| e.ends_with(".configure")).unwrap();
    assert!(last_init < first_configure);
    for label in ["one", "two", "three"] {
        assert_eq!(builder.target().count(&format!("{label}.init")), 1);
        assert_eq!(builder.target().count(&format!("{label}.configure")), 1);
    }
}

#[test]
fn test_configurer_applied_during_init_is_initialized() {
    let builder = recording_builder();
    builder.apply(Spawner).unwrap();
    builder.apply(Recorder::<1>::new("after")).unwrap();

    let events = builder.build().unwrap();

    assert_eq!(
        *events,
        vec![
            "before_init",
            "spawner.init",
            "late.init",
            "after.init",
            "before_configure",
            "spawner.configure",
            "after.configure",
            "late.configure",
            "perform_build",
        ]
    );
    assert!(builder.get_configurer::<Recorder<90>>().is_some());
}

#[test]
fn test_configurer_applied_in_before_init_is_initialized_once() {
    let builder = ConfiguredBuilder::new(RecordingTarget::applying_before_init());

    let events = builder.build().unwrap();

    // Applied after the builder entered INITIALIZING but before the phase
    // snapshot: initialized by apply, skipped by the phase loop.
    assert_eq!(
        *events,
        vec![
            "before_init",
            "early.init",
            "before_configure",
            "early.configure",
            "perform_build",
        ]
    );
    assert_eq!(builder.target().count("early.init"), 1);
    assert!(builder.get_configurer::<Recorder<92>>().is_some());
}

#[test]
fn test_reapplied_instance_is_initialized_once() {
    let builder = recording_builder();
    let again = builder.apply(Recorder::<1>::new("again")).unwrap();
    builder.apply(Reapplier { again }).unwrap();

    builder.build().unwrap();

    assert_eq!(builder.target().count("again.init"), 1);
    assert_eq!(builder.target().count("again.configure"), 1);
    assert_eq!(builder.target().count("reapplier.init"), 1);
}

#[test]
fn test_replacement_during_init_initializes_both_instances() {
    let builder = recording_builder();
    builder
        .apply(Reapplier {
            again: Arc::new(Recorder::<1>::new("replacement")),
        })
        .unwrap();
    builder.apply(Recorder::<1>::new("original")).unwrap();

    let events = builder.build().unwrap();

    // The original was present when the phase started, the replacement
    // arrived during it: each is initialized once, only the survivor is configured.
    assert_eq!(builder.target().count("original.init"), 1);
    assert_eq!(builder.target().count("replacement.init"), 1);
    assert_eq!(builder.target().count("original.configure"), 0);
    assert_eq!(builder.target().count("replacement.configure"), 1);
    assert_eq!(
        builder.get_configurer::<Recorder<1>>().unwrap().label,
        "replacement"
    );
    assert_eq!(events.last().map(String::as_str), Some("perform_build"));
}

#[test]
fn test_apply_while_configuring_is_rejected() {
    let builder = recording_builder();
    builder.apply(LateApplier).unwrap();

    builder.build().unwrap();

    assert_eq!(builder.target().count("late_applier.rejected"), 1);
    assert_eq!(builder.target().count("late_applier.accepted"), 0);
    assert!(builder.get_configurer::<Recorder<91>>().is_none());
}

#[test]
fn test_apply_after_build_fails_for_any_configurer() {
    let builder = recording_builder();
    builder.build().unwrap();

    assert!(builder.apply(Recorder::<1>::new("x")).unwrap_err().is_illegal_state());
    assert!(builder.apply(Spawner).unwrap_err().is_illegal_state());
    assert!(builder.apply(LateApplier).unwrap_err().is_illegal_state());
    assert_eq!(builder.configurer_count(), 0);
}

#[test]
fn test_configurer_error_surfaces_verbatim_and_stops_build() {
    let builder = recording_builder();
    builder.apply(Recorder::<1>::new("before")).unwrap();
    builder.apply(FailingInit).unwrap();
    builder.apply(Recorder::<2>::new("after")).unwrap();

    let err = builder.build().unwrap_err();

    assert!(matches!(err, BuilderError::Callback(_)));
    assert_eq!(err.to_string(), "login page is not configured");
    assert_eq!(builder.build_state(), BuildState::Initializing);
    assert_eq!(
        builder.target().events(),
        vec!["before_init", "before.init", "failing.init"]
    );
    assert!(matches!(builder.get_object(), Err(BuilderError::NotBuilt)));
}

#[test]
fn test_before_configure_failure_leaves_configuring_state() {
    let builder = ConfiguredBuilder::new(RecordingTarget::failing_before_configure());
    builder.apply(Recorder::<1>::new("a")).unwrap();

    let err = builder.build().unwrap_err();

    assert_eq!(err.to_string(), "before_configure refused");
    assert_eq!(builder.build_state(), BuildState::Configuring);
    assert_eq!(builder.target().count("a.configure"), 0);
    assert!(builder.apply(Recorder::<2>::new("b")).unwrap_err().is_illegal_state());
}

#[test]
fn test_perform_build_failure_leaves_building_state() {
    let builder = ConfiguredBuilder::new(RecordingTarget::failing_perform_build());

    let err = builder.build().unwrap_err();

    assert_eq!(err.to_string(), "perform_build refused");
    assert_eq!(builder.build_state(), BuildState::Building);
    assert!(!builder.is_built());
}

#[test]
fn test_build_is_attempted_only_once() {
    let builder = ConfiguredBuilder::new(RecordingTarget::failing_perform_build());

    assert!(builder.build().is_err());
    assert!(matches!(builder.build(), Err(BuilderError::AlreadyBuilt)));
    assert_eq!(builder.target().count("before_init"), 1);
}

#[test]
fn test_object_builder_trait() {
    fn build_any<B: ObjectBuilder>(builder: &B) -> Arc<B::Output> {
        builder.build().unwrap()
    }

    let builder = recording_builder();
    let built = build_any(&builder);
    assert!(Arc::ptr_eq(&built, &ObjectBuilder::get_object(&builder).unwrap()));
}

/// Blocks inside `init` until the test releases it
struct Gate {
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl Configurer<RecordingTarget> for Gate {
    fn init(&self, builder: &Builder) -> configured_builder::BuilderResult<()> {
        builder.target().record("gate.init");
        self.entered.lock().send(()).ok();
        self.release.lock().recv().ok();
        Ok(())
    }
}

#[test]
fn test_apply_from_other_thread_waits_for_build() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();

    let builder = Arc::new(recording_builder());
    builder
        .apply(Gate {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        })
        .unwrap();

    let building = {
        let builder = Arc::clone(&builder);
        thread::spawn(move || builder.build().map(|_| ()))
    };
    entered_rx.recv().unwrap();

    let applying = {
        let builder = Arc::clone(&builder);
        thread::spawn(move || builder.apply(Recorder::<1>::new("intruder")).map(|_| ()))
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!applying.is_finished());

    release_tx.send(()).unwrap();
    building.join().unwrap().unwrap();

    let err = applying.join().unwrap().unwrap_err();
    assert!(err.is_illegal_state());
    assert_eq!(builder.target().count("intruder.init"), 0);
    assert_eq!(builder.build_state(), BuildState::Built);
}
