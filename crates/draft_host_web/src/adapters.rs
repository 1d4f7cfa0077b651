use std::rc::Rc;

use draft_host::{
    DraftHostServices, DraftStorage, HostStrategy, ImageCompressor, ImageError, ImageFuture,
    ManualScheduler, MemoryDraftStorage, NoopImageCompressor, NoticeSink, TimerHandle,
    TimerScheduler, TimerTask,
};

use crate::{CanvasImageCompressor, WebDraftStorage, WebTimerScheduler};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "host-headless")]
    {
        HostStrategy::Headless
    }

    #[cfg(not(feature = "host-headless"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete storage backend behind [`DraftStorage`].
#[derive(Debug, Clone)]
pub enum DraftStorageAdapter {
    /// `localStorage`-backed storage.
    Browser(WebDraftStorage),
    /// Process-local storage; drafts do not survive a reload.
    Headless(MemoryDraftStorage),
}

impl DraftStorage for DraftStorageAdapter {
    fn load_raw(&self, key: &str) -> Result<Option<String>, String> {
        match self {
            Self::Browser(store) => store.load_raw(key),
            Self::Headless(store) => store.load_raw(key),
        }
    }

    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.save_raw(key, raw_json),
            Self::Headless(store) => store.save_raw(key, raw_json),
        }
    }

    fn delete_raw(&self, key: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.delete_raw(key),
            Self::Headless(store) => store.delete_raw(key),
        }
    }
}

/// Adapter enum that erases the concrete timer backend behind [`TimerScheduler`].
#[derive(Debug, Clone)]
pub enum TimerSchedulerAdapter {
    /// `setTimeout`-backed timers.
    Browser(WebTimerScheduler),
    /// Virtual clock; pending writes only land on an explicit advance or a flush.
    Headless(ManualScheduler),
}

impl TimerScheduler for TimerSchedulerAdapter {
    fn schedule(&self, delay_ms: u32, task: TimerTask) -> TimerHandle {
        match self {
            Self::Browser(scheduler) => scheduler.schedule(delay_ms, task),
            Self::Headless(scheduler) => scheduler.schedule(delay_ms, task),
        }
    }

    fn cancel(&self, handle: TimerHandle) {
        match self {
            Self::Browser(scheduler) => scheduler.cancel(handle),
            Self::Headless(scheduler) => scheduler.cancel(handle),
        }
    }
}

/// Adapter enum that erases the concrete image pipeline behind [`ImageCompressor`].
#[derive(Debug, Clone, Copy)]
pub enum ImageCompressorAdapter {
    /// Canvas-backed compressor.
    Browser(CanvasImageCompressor),
    /// No image pipeline.
    Headless(NoopImageCompressor),
}

impl ImageCompressor for ImageCompressorAdapter {
    fn compress<'a>(
        &'a self,
        data_url: &'a str,
        max_width: u32,
        quality: f64,
    ) -> ImageFuture<'a, Result<String, ImageError>> {
        match self {
            Self::Browser(compressor) => compressor.compress(data_url, max_width, quality),
            Self::Headless(compressor) => compressor.compress(data_url, max_width, quality),
        }
    }
}

/// Builds the storage adapter for the compile-time selected host strategy.
pub fn draft_storage() -> DraftStorageAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => DraftStorageAdapter::Browser(WebDraftStorage),
        HostStrategy::Headless => DraftStorageAdapter::Headless(MemoryDraftStorage::default()),
    }
}

/// Builds the timer adapter for the compile-time selected host strategy.
pub fn timer_scheduler() -> TimerSchedulerAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => TimerSchedulerAdapter::Browser(WebTimerScheduler::default()),
        HostStrategy::Headless => TimerSchedulerAdapter::Headless(ManualScheduler::default()),
    }
}

/// Builds the image compressor adapter for the compile-time selected host strategy.
pub fn image_compressor() -> ImageCompressorAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => ImageCompressorAdapter::Browser(CanvasImageCompressor),
        HostStrategy::Headless => ImageCompressorAdapter::Headless(NoopImageCompressor),
    }
}

/// Builds the full host service bundle for the selected strategy, delivering notices to
/// `notices`.
pub fn build_host_services(notices: Rc<dyn NoticeSink>) -> DraftHostServices {
    DraftHostServices {
        storage: Rc::new(draft_storage()),
        scheduler: Rc::new(timer_scheduler()),
        compressor: Rc::new(image_compressor()),
        notices,
        host_strategy: selected_host_strategy(),
    }
}

#[cfg(test)]
mod tests {
    use draft_host::NoopNoticeSink;

    use super::*;

    #[test]
    fn services_report_the_selected_strategy() {
        let services = build_host_services(Rc::new(NoopNoticeSink));
        assert_eq!(services.host_strategy, selected_host_strategy());
        assert_eq!(host_strategy_name(), selected_host_strategy().as_str());
    }

    #[test]
    fn headless_storage_adapter_delegates_to_memory() {
        let memory = MemoryDraftStorage::default();
        let adapter = DraftStorageAdapter::Headless(memory.clone());
        adapter.save_raw("k", "[]").expect("save");
        assert_eq!(memory.raw("k"), Some("[]".to_string()));
        adapter.delete_raw("k").expect("delete");
        assert!(!memory.contains_key("k"));
    }

    #[test]
    fn headless_timer_adapter_waits_for_the_clock() {
        let clock = ManualScheduler::default();
        let adapter = TimerSchedulerAdapter::Headless(clock.clone());
        let fired = Rc::new(std::cell::Cell::new(false));
        let flag = fired.clone();
        adapter.schedule(10, Box::new(move || flag.set(true)));
        assert!(!fired.get());
        clock.advance(10);
        assert!(fired.get());
    }
}
