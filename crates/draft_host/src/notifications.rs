//! User-facing notice contracts (toast-style success and failure messages).

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Presentation hint for a notice.
pub enum NoticeVariant {
    /// Informational or success message.
    #[default]
    Default,
    /// Failure the user should act on.
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A discrete message for the UI notification layer.
pub struct DraftNotice {
    /// Short heading.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Presentation hint.
    pub variant: NoticeVariant,
}

impl DraftNotice {
    /// Builds a default-variant notice.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    /// Builds a `Success` notice.
    pub fn success(description: impl Into<String>) -> Self {
        Self::new("Success", description)
    }

    /// Builds a destructive `Error` notice.
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            ..Self::new("Error", description)
        }
    }
}

/// Receiver for notices raised by draft operations. Rendering is the sink's concern.
pub trait NoticeSink {
    /// Delivers one notice.
    fn notify(&self, notice: DraftNotice);
}

impl<S: NoticeSink + ?Sized> NoticeSink for Rc<S> {
    fn notify(&self, notice: DraftNotice) {
        (**self).notify(notice);
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Sink that discards every notice.
pub struct NoopNoticeSink;

impl NoticeSink for NoopNoticeSink {
    fn notify(&self, _notice: DraftNotice) {}
}

#[derive(Debug, Clone, Default)]
/// Sink that records notices in memory; clones share the same log.
pub struct MemoryNoticeSink {
    inner: Rc<RefCell<Vec<DraftNotice>>>,
}

impl MemoryNoticeSink {
    /// Returns a copy of every recorded notice.
    pub fn notices(&self) -> Vec<DraftNotice> {
        self.inner.borrow().clone()
    }

    /// Drains and returns the recorded notices.
    pub fn take(&self) -> Vec<DraftNotice> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }
}

impl NoticeSink for MemoryNoticeSink {
    fn notify(&self, notice: DraftNotice) {
        self.inner.borrow_mut().push(notice);
    }
}
