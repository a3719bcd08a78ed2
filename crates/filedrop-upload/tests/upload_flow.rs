//! End-to-end orchestration tests against an in-memory provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use filedrop_core::{
    AnonymousSession, DeleteResult, FileData, ProviderKind, StaticSession, UploadOptions,
    UploadResult,
};
use filedrop_storage::StorageProvider;
use filedrop_upload::{delete_files_with, Notifier, ProviderFactory, Uploader};

/// Provider double. Files whose name contains "fail" are rejected, files
/// named "slow" settle after a short delay; everything else succeeds with
/// its own name as the stored name.
struct MockProvider {
    deletes: Mutex<Vec<Vec<String>>>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            deletes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StorageProvider for MockProvider {
    async fn upload_file(&self, file: &FileData, _options: &UploadOptions) -> UploadResult {
        if file.name.contains("fail") {
            return UploadResult::failure("boom");
        }
        if file.name.contains("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        UploadResult::success(file.name.clone())
    }

    async fn delete_files(&self, identifiers: &[String]) -> DeleteResult {
        self.deletes.lock().unwrap().push(identifiers.to_vec());
        DeleteResult::success(format!(
            "{} file(s) deleted successfully!",
            identifiers.len()
        ))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::S3
    }
}

/// Notifier that records every message in arrival order.
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn recorded(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn loading(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(("loading".to_string(), message.to_string()));
    }

    fn success(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(("success".to_string(), message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(("error".to_string(), message.to_string()));
    }
}

fn counting_factory(provider: Arc<MockProvider>) -> (ProviderFactory, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let factory: ProviderFactory = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&provider) as Arc<dyn StorageProvider>)
    });
    (factory, calls)
}

fn file(name: &str) -> FileData {
    FileData::new(name, "image/png", Bytes::from_static(b"pixels"))
}

fn permissive_options() -> UploadOptions {
    UploadOptions {
        accepted_types: vec![filedrop_core::FileCategory::All],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_empty_batch_short_circuits() {
    let (factory, calls) = counting_factory(Arc::new(MockProvider::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let uploader = Uploader::from_factory(factory, notifier.clone());

    let summary = uploader.upload_many(&[], &permissive_options()).await;

    assert!(summary.results.is_empty());
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.failure_count, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(notifier.recorded().is_empty());
    assert!(!uploader.is_uploading());
    assert!(uploader.progress().is_none());
}

#[tokio::test]
async fn test_concurrent_batch_preserves_input_order() {
    let (factory, _) = counting_factory(Arc::new(MockProvider::new()));
    let uploader = Uploader::from_factory(factory, Arc::new(RecordingNotifier::default()));

    // The slow file is first; it still settles into slot zero.
    let files = vec![file("slow"), file("b.png"), file("c.png"), file("d.png")];
    let summary = uploader.upload_many(&files, &permissive_options()).await;

    assert_eq!(summary.results.len(), 4);
    assert_eq!(summary.success_names, vec!["slow", "b.png", "c.png", "d.png"]);
    assert_eq!(summary.success_count, 4);
    assert_eq!(summary.failure_count, 0);
}

#[tokio::test]
async fn test_sequential_batch_preserves_input_order() {
    let (factory, _) = counting_factory(Arc::new(MockProvider::new()));
    let uploader = Uploader::from_factory(factory, Arc::new(RecordingNotifier::default()));

    let options = UploadOptions {
        concurrent: false,
        ..permissive_options()
    };
    let files = vec![file("slow"), file("b.png")];
    let summary = uploader.upload_many(&files, &options).await;

    assert_eq!(summary.success_names, vec!["slow", "b.png"]);
}

#[tokio::test]
async fn test_mixed_batch_tallies_and_notifies() {
    let (factory, _) = counting_factory(Arc::new(MockProvider::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let uploader = Uploader::from_factory(factory, notifier.clone());

    let files = vec![file("a.png"), file("fail.png"), file("c.png")];
    let summary = uploader.upload_many(&files, &permissive_options()).await;

    assert_eq!(summary.success_count, 2);
    assert_eq!(summary.failure_count, 1);
    assert_eq!(
        summary.success_count + summary.failure_count,
        summary.results.len()
    );
    assert_eq!(summary.results[1].error.as_deref(), Some("boom"));

    let recorded = notifier.recorded();
    assert_eq!(
        recorded[0],
        ("loading".to_string(), "Uploading 3 files...".to_string())
    );
    assert_eq!(
        recorded[1],
        ("success".to_string(), "2 files uploaded, 1 failed".to_string())
    );
}

#[tokio::test]
async fn test_all_success_summary_message() {
    let (factory, _) = counting_factory(Arc::new(MockProvider::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let uploader = Uploader::from_factory(factory, notifier.clone());

    uploader
        .upload_many(&[file("a.png"), file("b.png")], &permissive_options())
        .await;

    let recorded = notifier.recorded();
    assert_eq!(
        recorded.last().unwrap(),
        &(
            "success".to_string(),
            "All 2 files uploaded successfully!".to_string()
        )
    );
}

#[tokio::test]
async fn test_all_failed_summary_message() {
    let (factory, _) = counting_factory(Arc::new(MockProvider::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let uploader = Uploader::from_factory(factory, notifier.clone());

    uploader
        .upload_many(&[file("fail-a"), file("fail-b")], &permissive_options())
        .await;

    let recorded = notifier.recorded();
    assert_eq!(
        recorded.last().unwrap(),
        &(
            "error".to_string(),
            "Failed to upload any of the files".to_string()
        )
    );
}

#[tokio::test]
async fn test_single_upload_clears_flag() {
    let (factory, calls) = counting_factory(Arc::new(MockProvider::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let uploader = Uploader::from_factory(factory, notifier.clone());

    let result = uploader
        .upload_single(&file("a.png"), &permissive_options(), true)
        .await;

    assert_eq!(result.name.as_deref(), Some("a.png"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!uploader.is_uploading());
    assert_eq!(
        notifier.recorded()[0],
        ("loading".to_string(), "Uploading...".to_string())
    );
}

#[tokio::test]
async fn test_factory_error_becomes_failure_result() {
    let factory: ProviderFactory = Arc::new(|| {
        Err(filedrop_core::UploadError::Config(
            "missing required S3 configuration: S3_BUCKET_NAME".to_string(),
        ))
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let uploader = Uploader::from_factory(factory, notifier.clone());

    let result = uploader
        .upload_single(&file("a.png"), &permissive_options(), true)
        .await;

    assert!(result.is_failure());
    let error = result.error.unwrap();
    assert!(error.contains("Configuration error"));
    assert!(notifier
        .recorded()
        .iter()
        .any(|(kind, message)| kind == "error" && message == &error));
    assert!(!uploader.is_uploading());
}

#[tokio::test]
async fn test_progress_observable_mid_batch_and_cleared_after() {
    let (factory, _) = counting_factory(Arc::new(MockProvider::new()));
    let uploader = Arc::new(Uploader::from_factory(
        factory,
        Arc::new(RecordingNotifier::default()),
    ));

    let files = vec![file("slow"), file("slow-2")];
    let options = UploadOptions {
        max_concurrency: 1,
        ..permissive_options()
    };

    let runner = Arc::clone(&uploader);
    let handle = tokio::spawn(async move { runner.upload_many(&files, &options).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(uploader.is_uploading());
    let progress = uploader.progress().expect("batch should be in flight");
    assert_eq!(progress.total, 2);
    assert!(progress.current < 2);

    let summary = handle.await.unwrap();
    assert_eq!(summary.success_count, 2);
    assert!(!uploader.is_uploading());
    assert!(uploader.progress().is_none());
}

#[tokio::test]
async fn test_delete_requires_session() {
    let provider = Arc::new(MockProvider::new());
    let (factory, calls) = counting_factory(Arc::clone(&provider));

    let result = delete_files_with(
        &factory,
        &AnonymousSession,
        &["https://files.catbox.moe/abc.png".to_string()],
    )
    .await;

    assert_eq!(result.error.as_deref(), Some("Not authenticated"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(provider.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_rejects_empty_identifiers() {
    let (factory, calls) = counting_factory(Arc::new(MockProvider::new()));
    let session = StaticSession::new("user-1");

    let result = delete_files_with(&factory, &session, &[]).await;

    assert_eq!(result.error.as_deref(), Some("No files to delete"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_delete_forwards_identifiers_to_provider() {
    let provider = Arc::new(MockProvider::new());
    let (factory, _) = counting_factory(Arc::clone(&provider));
    let session = StaticSession::new("user-1");
    let identifiers = vec!["key-a".to_string(), "key-b".to_string()];

    let result = delete_files_with(&factory, &session, &identifiers).await;

    assert!(result.is_success());
    assert_eq!(
        result.message.as_deref(),
        Some("2 file(s) deleted successfully!")
    );
    assert_eq!(provider.deletes.lock().unwrap().as_slice(), &[identifiers]);
}

#[tokio::test]
async fn test_delete_normalizes_factory_error() {
    let factory: ProviderFactory = Arc::new(|| {
        Err(filedrop_core::UploadError::Config(
            "CATBOX_API must be set".to_string(),
        ))
    });
    let session = StaticSession::new("user-1");

    let result = delete_files_with(&factory, &session, &["key".to_string()]).await;

    assert_eq!(
        result.error.as_deref(),
        Some("Configuration error: CATBOX_API must be set")
    );
}
