//! Host service bundle injected into draft sessions.

use std::{fmt, rc::Rc};

use crate::{
    DraftStorage, ImageCompressor, ManualScheduler, MemoryDraftStorage, NoopImageCompressor,
    NoopNoticeSink, NoticeSink, TimerScheduler,
};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed services (`localStorage`, `setTimeout`, canvas).
    Browser,
    /// In-process services for tests, previews, and non-browser targets.
    Headless,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Headless => "headless",
        }
    }
}

/// Host service bundle shared by every store of one draft session.
///
/// Environment-specific selection happens before this bundle reaches `registration_draft`, which
/// keeps the draft logic independent of browser APIs.
#[derive(Clone)]
pub struct DraftHostServices {
    /// Key/value draft storage shared by all stores (keys are disjoint by configuration).
    pub storage: Rc<dyn DraftStorage>,
    /// Timer source for debounced writes.
    pub scheduler: Rc<dyn TimerScheduler>,
    /// Image downscaler used before persisting uploads.
    pub compressor: Rc<dyn ImageCompressor>,
    /// Receiver for user-facing notices.
    pub notices: Rc<dyn NoticeSink>,
    /// Strategy that produced this bundle.
    pub host_strategy: HostStrategy,
}

impl fmt::Debug for DraftHostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftHostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}

impl DraftHostServices {
    /// Builds a headless bundle over the given in-memory storage and manual clock.
    pub fn headless(storage: MemoryDraftStorage, scheduler: ManualScheduler) -> Self {
        Self {
            storage: Rc::new(storage),
            scheduler: Rc::new(scheduler),
            compressor: Rc::new(NoopImageCompressor),
            notices: Rc::new(NoopNoticeSink),
            host_strategy: HostStrategy::Headless,
        }
    }

    /// Replaces the image compressor.
    pub fn with_compressor(mut self, compressor: Rc<dyn ImageCompressor>) -> Self {
        self.compressor = compressor;
        self
    }

    /// Replaces the notice sink.
    pub fn with_notices(mut self, notices: Rc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }
}
