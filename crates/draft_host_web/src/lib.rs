//! Browser (`wasm32`) implementations of [`draft_host`] service contracts.
//!
//! `localStorage` draft storage, `setTimeout` timers, canvas image compression, and
//! `FileReader` helpers. On non-wasm targets every adapter compiles to an inert fallback so the
//! workspace builds and tests natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories.
pub mod adapters;
pub mod file;
pub mod image;
pub mod storage;
pub mod timer;

pub use adapters::{
    build_host_services, draft_storage, host_strategy_name, image_compressor,
    selected_host_strategy, timer_scheduler, DraftStorageAdapter, ImageCompressorAdapter,
    TimerSchedulerAdapter,
};
pub use file::{image_candidate, read_file_as_data_url};
pub use image::CanvasImageCompressor;
pub use storage::local_storage::WebDraftStorage;
pub use timer::WebTimerScheduler;
