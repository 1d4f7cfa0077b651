//! Host contracts for draft persistence: key/value storage, timers, image downscaling, and
//! user notices.
//!
//! Concrete browser adapters live in `draft_host_web`; the draft stores that consume these
//! contracts live in `registration_draft`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod image;
pub mod notifications;
pub mod storage;
pub mod time;
pub mod timer;

pub use host::{DraftHostServices, HostStrategy};
pub use image::{
    clamp_quality, scaled_dimensions, ImageCandidate, ImageCompressor, ImageDimensions,
    ImageError, ImageFuture, NoopImageCompressor, COMPRESSED_MIME_TYPE, DEFAULT_MAX_WIDTH,
    DEFAULT_QUALITY,
};
pub use notifications::{DraftNotice, MemoryNoticeSink, NoopNoticeSink, NoticeSink, NoticeVariant};
pub use storage::draft_store::{DraftStorage, MemoryDraftStorage, NoopDraftStorage};
pub use storage::{load_typed_with, save_typed_with};
pub use time::{next_item_id, unix_time_ms_now};
pub use timer::{ManualScheduler, NoopScheduler, TimerHandle, TimerScheduler, TimerTask};
