//! Test support: logging init, in-memory store, recording observer
//!
//! Lives in the library (not behind cfg(test)) so integration tests can
//! drive the engine without a real backend.

use std::env;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, info};
use tracing_subscriber::{filter::filter_fn, fmt, fmt::format::FmtSpan, prelude::*, EnvFilter};

use crate::application::events::{TreeEvent, TreeObserver};
use crate::domain::ClassificationRecord;
use crate::infrastructure::error::{StoreError, StoreResult};
use crate::infrastructure::traits::{ClassificationStore, StoreScope};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let noisy_modules = [""];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::ENTER)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Build a TASK/DOMAIN_A record for tests.
pub fn record(id: &str, key: &str, parent: Option<&str>) -> ClassificationRecord {
    ClassificationRecord {
        id: id.to_string(),
        key: key.to_string(),
        parent_id: parent.map(String::from),
        category: "MANUAL".to_string(),
        kind: "TASK".to_string(),
        name: format!("Classification {key}"),
        domain: "DOMAIN_A".to_string(),
    }
}

/// In-memory `ClassificationStore` with failure injection and hold gates
/// for exercising in-flight behavior.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<ClassificationRecord>>,
    fail_fetch_all: AtomicBool,
    fail_fetch_by_id: AtomicBool,
    fail_update: AtomicBool,
    fetch_all_calls: AtomicUsize,
    fetch_gate: Mutex<Option<Arc<Semaphore>>>,
    update_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl InMemoryStore {
    pub fn new(records: Vec<ClassificationRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Current stored records (clone).
    pub fn records(&self) -> Vec<ClassificationRecord> {
        self.lock_records().clone()
    }

    /// Number of fetch_all calls seen so far.
    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_fetch_all(&self, fail: bool) {
        self.fail_fetch_all.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_fetch_by_id(&self, fail: bool) {
        self.fail_fetch_by_id.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent fetch_all calls block until `release_fetches`.
    pub fn hold_fetches(&self) {
        *self.lock(&self.fetch_gate) = Some(Arc::new(Semaphore::new(0)));
    }

    /// Stop gating fetches and wake every blocked call.
    pub fn release_fetches(&self) {
        if let Some(gate) = self.lock(&self.fetch_gate).take() {
            // Closing fails all pending and future acquires, waking everyone
            gate.close();
        }
    }

    /// Make subsequent update calls block until `release_updates`.
    pub fn hold_updates(&self) {
        *self.lock(&self.update_gate) = Some(Arc::new(Semaphore::new(0)));
    }

    /// Stop gating updates and wake every blocked call.
    pub fn release_updates(&self) {
        if let Some(gate) = self.lock(&self.update_gate).take() {
            gate.close();
        }
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, Vec<ClassificationRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock<'a, T>(&self, gate: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn wait_for(&self, gate: &Mutex<Option<Arc<Semaphore>>>) {
        let held = self.lock(gate).clone();
        if let Some(sem) = held {
            // Err means the gate was closed (released); either way, proceed
            let _ = sem.acquire().await;
        }
    }
}

#[async_trait]
impl ClassificationStore for InMemoryStore {
    async fn fetch_all(&self, scope: &StoreScope) -> StoreResult<Vec<ClassificationRecord>> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for(&self.fetch_gate).await;
        if self.fail_fetch_all.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected fetch_all failure".into()));
        }
        Ok(self
            .lock_records()
            .iter()
            .filter(|r| r.kind == scope.kind && r.domain == scope.domain)
            .cloned()
            .collect())
    }

    async fn fetch_by_id(&self, id: &str) -> StoreResult<ClassificationRecord> {
        if self.fail_fetch_by_id.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "injected fetch_by_id failure".into(),
            ));
        }
        self.lock_records()
            .iter()
            .rev()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_by_id(
        &self,
        id: &str,
        record: &ClassificationRecord,
    ) -> StoreResult<ClassificationRecord> {
        self.wait_for(&self.update_gate).await;
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected update failure".into()));
        }
        let mut records = self.lock_records();
        let slot = records
            .iter()
            .rposition(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        records[slot] = record.clone();
        Ok(records[slot].clone())
    }
}

/// Observer that records every event for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<TreeEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<TreeEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TreeObserver for RecordingObserver {
    fn on_event(&self, event: &TreeEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
