//! Single-file and batch upload orchestration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use filedrop_core::error::UploadErrorResult;
use filedrop_core::{
    Config, FileData, MultipleUploadResult, UploadOptions, UploadProgress, UploadResult,
};
use filedrop_storage::{create_provider, StorageProvider};
use futures::future::join_all;

use crate::notify::{Notifier, TracingNotifier};

/// Resolves the active provider for one call.
///
/// Invoked fresh on every upload/delete so the active provider always
/// reflects current configuration.
pub type ProviderFactory =
    Arc<dyn Fn() -> UploadErrorResult<Arc<dyn StorageProvider>> + Send + Sync>;

/// Upload orchestrator.
///
/// Owns the per-invocation "is uploading" flag and batch progress record;
/// neither is shared across orchestrator instances. Every failure mode is
/// normalized into the typed result shape; callers inspect results, they
/// never catch.
pub struct Uploader {
    factory: ProviderFactory,
    notifier: Arc<dyn Notifier>,
    uploading: AtomicBool,
    progress: Mutex<Option<UploadProgress>>,
}

impl Uploader {
    pub fn new(config: Config) -> Self {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        let factory: ProviderFactory = Arc::new(move || create_provider(&config));
        Self::from_factory(factory, notifier)
    }

    /// Build around an injected provider factory (tests, embedders).
    pub fn from_factory(factory: ProviderFactory, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            factory,
            notifier,
            uploading: AtomicBool::new(false),
            progress: Mutex::new(None),
        }
    }

    /// Whether an upload invocation is currently in flight.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Snapshot of the current batch progress, if a batch is running.
    pub fn progress(&self) -> Option<UploadProgress> {
        self.progress.lock().expect("progress state poisoned").clone()
    }

    /// Upload one file through the active provider.
    ///
    /// `notify` controls whether lifecycle messages are surfaced; the result
    /// itself is always returned.
    pub async fn upload_single(
        &self,
        file: &FileData,
        options: &UploadOptions,
        notify: bool,
    ) -> UploadResult {
        self.uploading.store(true, Ordering::SeqCst);
        if notify {
            self.notifier.loading("Uploading...");
        }

        let result = self.upload_via_provider(file, options, notify).await;

        self.uploading.store(false, Ordering::SeqCst);
        result
    }

    /// Upload a batch, preserving input order in the results regardless of
    /// completion order.
    pub async fn upload_many(
        &self,
        files: &[FileData],
        options: &UploadOptions,
    ) -> MultipleUploadResult {
        if files.is_empty() {
            return MultipleUploadResult::empty();
        }

        self.uploading.store(true, Ordering::SeqCst);
        self.set_progress(Some(UploadProgress {
            current: 0,
            total: files.len(),
            current_file_name: None,
        }));
        self.notifier
            .loading(&format!("Uploading {} files...", files.len()));

        let results = if options.concurrent {
            self.upload_windowed(files, options).await
        } else {
            self.upload_sequential(files, options).await
        };

        let summary = MultipleUploadResult::from_results(results);
        self.notify_summary(&summary);

        self.set_progress(None);
        self.uploading.store(false, Ordering::SeqCst);
        summary
    }

    /// Concurrent mode: fixed windows of `max_concurrency` files. All
    /// uploads within a window run simultaneously; window N+1 does not start
    /// until every task in window N has settled.
    async fn upload_windowed(
        &self,
        files: &[FileData],
        options: &UploadOptions,
    ) -> Vec<UploadResult> {
        let width = options.max_concurrency.max(1);
        let mut results = Vec::with_capacity(files.len());

        for window in files.chunks(width) {
            let tasks = window.iter().map(|file| self.upload_one_tracked(file, options));
            results.extend(join_all(tasks).await);
        }

        results
    }

    /// Sequential mode: one file at a time in input order, with progress
    /// updates before and after each file.
    async fn upload_sequential(
        &self,
        files: &[FileData],
        options: &UploadOptions,
    ) -> Vec<UploadResult> {
        let mut results = Vec::with_capacity(files.len());

        for (index, file) in files.iter().enumerate() {
            self.set_progress(Some(UploadProgress {
                current: index,
                total: files.len(),
                current_file_name: Some(file.name.clone()),
            }));

            results.push(self.upload_via_provider(file, options, false).await);

            self.set_progress(Some(UploadProgress {
                current: index + 1,
                total: files.len(),
                current_file_name: Some(file.name.clone()),
            }));
        }

        results
    }

    async fn upload_one_tracked(
        &self,
        file: &FileData,
        options: &UploadOptions,
    ) -> UploadResult {
        self.note_current_file(&file.name);
        let result = self.upload_via_provider(file, options, false).await;
        self.bump_progress();
        result
    }

    async fn upload_via_provider(
        &self,
        file: &FileData,
        options: &UploadOptions,
        notify: bool,
    ) -> UploadResult {
        let provider = match (self.factory)() {
            Ok(provider) => provider,
            Err(e) => {
                let message = e.to_string();
                if notify {
                    self.notifier.error(&message);
                }
                return UploadResult::failure(message);
            }
        };

        let result = provider.upload_file(file, options).await;
        if notify {
            if let Some(ref error) = result.error {
                self.notifier.error(error);
            }
        }
        result
    }

    fn notify_summary(&self, summary: &MultipleUploadResult) {
        if summary.success_count > 0 && summary.failure_count == 0 {
            self.notifier.success(&format!(
                "All {} files uploaded successfully!",
                summary.success_count
            ));
        } else if summary.success_count > 0 && summary.failure_count > 0 {
            self.notifier.success(&format!(
                "{} files uploaded, {} failed",
                summary.success_count, summary.failure_count
            ));
        } else if summary.failure_count > 0 {
            self.notifier.error("Failed to upload any of the files");
        } else {
            self.notifier.success("Upload completed");
        }
    }

    fn set_progress(&self, progress: Option<UploadProgress>) {
        *self.progress.lock().expect("progress state poisoned") = progress;
    }

    fn note_current_file(&self, name: &str) {
        if let Some(progress) = self
            .progress
            .lock()
            .expect("progress state poisoned")
            .as_mut()
        {
            progress.current_file_name = Some(name.to_string());
        }
    }

    fn bump_progress(&self) {
        if let Some(progress) = self
            .progress
            .lock()
            .expect("progress state poisoned")
            .as_mut()
        {
            progress.current += 1;
        }
    }
}
