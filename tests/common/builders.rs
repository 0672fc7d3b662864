//! Recording build targets and configurers shared by the integration tests.

use configured_builder::{BuildLifecycle, BuilderResult, ConfiguredBuilder, Configurer};
use parking_lot::Mutex;
use std::sync::Arc;

/// Build target that records every lifecycle callback in order
#[derive(Default)]
pub struct RecordingTarget {
    events: Mutex<Vec<String>>,
    pub fail_before_configure: bool,
    pub fail_perform_build: bool,
    /// Apply a `Recorder<92>` labelled "early" from `before_init`
    pub apply_before_init: bool,
}

impl RecordingTarget {
    pub fn failing_before_configure() -> Self {
        Self {
            fail_before_configure: true,
            ..Self::default()
        }
    }

    pub fn failing_perform_build() -> Self {
        Self {
            fail_perform_build: true,
            ..Self::default()
        }
    }

    pub fn applying_before_init() -> Self {
        Self {
            apply_before_init: true,
            ..Self::default()
        }
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.lock().iter().filter(|e| *e == event).count()
    }
}

impl BuildLifecycle for RecordingTarget {
    type Output = Vec<String>;

    fn before_init(&self, builder: &ConfiguredBuilder<Self>) -> BuilderResult<()> {
        self.record("before_init");
        if self.apply_before_init {
            builder.apply(Recorder::<92>::new("early"))?;
        }
        Ok(())
    }

    fn before_configure(&self, _: &ConfiguredBuilder<Self>) -> BuilderResult<()> {
        self.record("before_configure");
        if self.fail_before_configure {
            return Err(anyhow::anyhow!("before_configure refused").into());
        }
        Ok(())
    }

    fn perform_build(&self, _: &ConfiguredBuilder<Self>) -> BuilderResult<Vec<String>> {
        self.record("perform_build");
        if self.fail_perform_build {
            return Err(anyhow::anyhow!("perform_build refused").into());
        }
        Ok(self.events())
    }
}

pub type Builder = ConfiguredBuilder<RecordingTarget>;

pub fn recording_builder() -> Builder {
    ConfiguredBuilder::new(RecordingTarget::default())
}

/// Configurer recording `<label>.init` and `<label>.configure`.
///
/// Each `N` is a distinct type, so the registry keeps one `Recorder<N>` per `N`.
#[derive(Debug)]
pub struct Recorder<const N: usize> {
    pub label: String,
}

impl<const N: usize> Recorder<N> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl<const N: usize> Configurer<RecordingTarget> for Recorder<N> {
    fn init(&self, builder: &Builder) -> BuilderResult<()> {
        builder.target().record(format!("{}.init", self.label));
        Ok(())
    }

    fn configure(&self, builder: &Builder) -> BuilderResult<()> {
        builder.target().record(format!("{}.configure", self.label));
        Ok(())
    }
}

/// Applies a `Recorder<90>` labelled "late" from its own `init`
#[derive(Debug)]
pub struct Spawner;

impl Configurer<RecordingTarget> for Spawner {
    fn init(&self, builder: &Builder) -> BuilderResult<()> {
        builder.target().record("spawner.init");
        builder.apply(Recorder::<90>::new("late"))?;
        Ok(())
    }

    fn configure(&self, builder: &Builder) -> BuilderResult<()> {
        builder.target().record("spawner.configure");
        Ok(())
    }
}

/// Re-applies a configurer instance it was handed from its own `init`
#[derive(Debug)]
pub struct Reapplier {
    pub again: Arc<Recorder<1>>,
}

impl Configurer<RecordingTarget> for Reapplier {
    fn init(&self, builder: &Builder) -> BuilderResult<()> {
        builder.target().record("reapplier.init");
        builder.apply_arc(Arc::clone(&self.again))?;
        Ok(())
    }
}

/// Tries to apply another configurer while configuring and records the outcome
#[derive(Debug)]
pub struct LateApplier;

impl Configurer<RecordingTarget> for LateApplier {
    fn configure(&self, builder: &Builder) -> BuilderResult<()> {
        match builder.apply(Recorder::<91>::new("too-late")) {
            Ok(_) => builder.target().record("late_applier.accepted"),
            Err(err) if err.is_illegal_state() => builder.target().record("late_applier.rejected"),
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

/// Fails in `init` with a configurer-specific error
#[derive(Debug)]
pub struct FailingInit;

impl Configurer<RecordingTarget> for FailingInit {
    fn init(&self, builder: &Builder) -> BuilderResult<()> {
        builder.target().record("failing.init");
        Err(anyhow::anyhow!("login page is not configured").into())
    }
}
