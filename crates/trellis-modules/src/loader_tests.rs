use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use semver::Version;
use tokio::sync::Notify;

use trellis_core::{ConfigApi, ModuleApi};

use super::*;
use crate::export::ExportValue;

struct NoConfig;

impl ConfigApi for NoConfig {
    fn get(&self, _key: &str) -> Option<serde_json::Value> {
        None
    }
}

fn api() -> ModuleApi {
    ModuleApi::new(Arc::new(NoConfig))
}

fn host_version() -> Version {
    Version::new(1, 0, 1)
}

struct CountingModule {
    loads: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Module for CountingModule {
    async fn load(&mut self) -> ModuleResult<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct CountingFactory {
    version: &'static str,
    loads: Arc<AtomicUsize>,
}

impl crate::ModuleFactory for CountingFactory {
    fn module_api_version(&self) -> &str {
        self.version
    }

    fn create(&self, _api: ModuleApi) -> Box<dyn Module> {
        Box::new(CountingModule {
            loads: Arc::clone(&self.loads),
        })
    }
}

fn counting_export(version: &'static str) -> (ModuleExport, Arc<AtomicUsize>) {
    let loads = Arc::new(AtomicUsize::new(0));
    let export = ModuleExport::with_default(Arc::new(CountingFactory {
        version,
        loads: Arc::clone(&loads),
    }));
    (export, loads)
}

// ---------------------------------------------------------------------------
// Registration and start
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_then_start_invokes_initializer() {
    let (export, loads) = counting_export("^1.0.0");
    let mut loader = ModuleLoader::new(api(), host_version());

    loader.load(&export).unwrap();
    assert_eq!(loader.states(), vec![ModuleState::Registered]);

    loader.start().await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(loader.states(), vec![ModuleState::Started]);
}

#[tokio::test]
async fn incompatible_module_is_rejected_and_never_initialized() {
    let (export, loads) = counting_export("^2");
    let mut loader = ModuleLoader::new(api(), host_version());

    let err = loader.load(&export).unwrap_err();
    match err {
        ModuleError::Incompatible { required, running } => {
            assert_eq!(required, "^2");
            assert_eq!(running, host_version());
        },
        other => panic!("expected Incompatible, got {other:?}"),
    }

    loader.start().await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 0);
    assert_eq!(loader.module_count(), 0);
}

#[tokio::test]
async fn unparseable_version_range_is_incompatible() {
    let (export, _) = counting_export("not a version range");
    let mut loader = ModuleLoader::new(api(), host_version());

    assert!(matches!(
        loader.load(&export).unwrap_err(),
        ModuleError::Incompatible { .. }
    ));
}

#[tokio::test]
async fn non_module_export_is_rejected() {
    let mut export = ModuleExport::new();
    export.insert("default", ExportValue::Data(serde_json::json!({})));

    let mut loader = ModuleLoader::new(api(), host_version());
    assert!(matches!(
        loader.load(&export).unwrap_err(),
        ModuleError::InvalidModule
    ));
}

// ---------------------------------------------------------------------------
// One-shot lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_twice_rejects_second_call_without_reinvoking() {
    let (export, loads) = counting_export("^1.0.0");
    let mut loader = ModuleLoader::new(api(), host_version());
    loader.load(&export).unwrap();

    loader.start().await.unwrap();
    assert!(matches!(
        loader.start().await.unwrap_err(),
        ModuleError::AlreadyStarted
    ));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn load_after_start_is_rejected() {
    let mut loader = ModuleLoader::new(api(), host_version());
    loader.start().await.unwrap();
    assert!(loader.is_started());

    let (export, loads) = counting_export("^1.0.0");
    assert!(matches!(
        loader.load(&export).unwrap_err(),
        ModuleError::AlreadyStarted
    ));
    assert_eq!(loads.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

struct FailingModule;

#[async_trait::async_trait]
impl Module for FailingModule {
    async fn load(&mut self) -> ModuleResult<()> {
        Err(ModuleError::LoadFailed {
            message: "boom".into(),
        })
    }
}

struct FailingFactory;

impl crate::ModuleFactory for FailingFactory {
    fn module_api_version(&self) -> &str {
        "^1.0.0"
    }

    fn create(&self, _api: ModuleApi) -> Box<dyn Module> {
        Box::new(FailingModule)
    }
}

struct SlowModule {
    completed: Arc<AtomicBool>,
    done: Arc<Notify>,
}

#[async_trait::async_trait]
impl Module for SlowModule {
    async fn load(&mut self) -> ModuleResult<()> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.completed.store(true, Ordering::SeqCst);
        self.done.notify_one();
        Ok(())
    }
}

struct SlowFactory {
    completed: Arc<AtomicBool>,
    done: Arc<Notify>,
}

impl crate::ModuleFactory for SlowFactory {
    fn module_api_version(&self) -> &str {
        "^1.0.0"
    }

    fn create(&self, _api: ModuleApi) -> Box<dyn Module> {
        Box::new(SlowModule {
            completed: Arc::clone(&self.completed),
            done: Arc::clone(&self.done),
        })
    }
}

#[tokio::test]
async fn initializer_failure_surfaces_without_cancelling_others() {
    let completed = Arc::new(AtomicBool::new(false));
    let done = Arc::new(Notify::new());

    let mut loader = ModuleLoader::new(api(), host_version());
    loader
        .load(&ModuleExport::with_default(Arc::new(FailingFactory)))
        .unwrap();
    loader
        .load(&ModuleExport::with_default(Arc::new(SlowFactory {
            completed: Arc::clone(&completed),
            done: Arc::clone(&done),
        })))
        .unwrap();

    let err = loader.start().await.unwrap_err();
    assert!(matches!(err, ModuleError::LoadFailed { .. }));

    // The slow module keeps running after the error surfaced and completes
    // with its side effects intact.
    done.notified().await;
    assert!(completed.load(Ordering::SeqCst));
}
