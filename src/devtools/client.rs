//! Handler capability set for the devtools browser.
//!
//! The browser engine asks its client for one handler per slot; every slot
//! defaults to "no handler". The devtools client only supplies download and
//! life-span handling, so it does not pick up the host page's zoom or
//! popups.

use std::path::PathBuf;
use std::sync::Arc;

use glasspane_core::WindowHandle;

use super::DevToolsTracker;

/// Handler slots a browser client can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerSlot {
    Audio,
    ContextMenu,
    Dialog,
    Display,
    Download,
    Drag,
    Find,
    Focus,
    JsDialog,
    Keyboard,
    LifeSpan,
    Load,
    Print,
    Render,
    Request,
}

pub trait DownloadHandler: Send + Sync {
    /// Destination to prefill in the save dialog.
    fn on_before_download(&self, suggested_name: Option<&str>) -> PathBuf;

    fn on_download_updated(&self) {}
}

pub trait LifeSpanHandler: Send + Sync {
    /// Return `true` to cancel the popup.
    fn on_before_popup(&self, _target_url: &str) -> bool {
        false
    }

    fn on_after_created(&self, _window: WindowHandle) {}

    /// Return `true` to cancel the close.
    fn do_close(&self) -> bool {
        false
    }

    fn on_before_close(&self) {}
}

/// One method per handler slot, each defaulting to no capability.
pub trait ClientHandlers: Send + Sync {
    fn download_handler(&self) -> Option<Arc<dyn DownloadHandler>> {
        None
    }

    fn life_span_handler(&self) -> Option<Arc<dyn LifeSpanHandler>> {
        None
    }

    /// Return `true` if the message was handled.
    fn on_process_message_received(&self, _name: &str) -> bool {
        false
    }

    /// Whether the client fills `slot`.
    fn provides(&self, slot: HandlerSlot) -> bool {
        match slot {
            HandlerSlot::Download => self.download_handler().is_some(),
            HandlerSlot::LifeSpan => self.life_span_handler().is_some(),
            _ => false,
        }
    }
}

/// Saves devtools downloads (heap snapshots, HAR files) into the user's
/// Downloads folder.
#[derive(Debug, Clone)]
pub struct DevToolsDownloadHandler {
    dir: PathBuf,
}

impl DevToolsDownloadHandler {
    pub fn new() -> Self {
        let dir = dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .unwrap_or_else(|| PathBuf::from("C:\\"));
        Self { dir }
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Default for DevToolsDownloadHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadHandler for DevToolsDownloadHandler {
    fn on_before_download(&self, suggested_name: Option<&str>) -> PathBuf {
        match suggested_name {
            Some(name) if !name.is_empty() => self.dir.join(name),
            _ => self.dir.clone(),
        }
    }
}

/// Tracks the devtools window and dresses it to match the host.
pub struct DevToolsLifeSpanHandler {
    tracker: Arc<DevToolsTracker>,
}

impl LifeSpanHandler for DevToolsLifeSpanHandler {
    fn on_after_created(&self, window: WindowHandle) {
        let tracker = &self.tracker;
        tracker.shell.copy_icon(tracker.host_window(), window);

        if !tracker.system_theme.apps_use_light_theme() {
            tracker.theme().force_dark(window);
            // 修复标题栏不刷新
            tracker.shell.refresh_frame(window);
        }

        tracker.set_window(window);
        tracing::debug!(window = window.as_raw(), "DevTools window created");
    }

    fn on_before_close(&self) {
        self.tracker.set_window(WindowHandle::NULL);
        tracing::debug!("DevTools window closed");
    }
}

/// Client handed to the browser engine when it creates the devtools window.
pub struct DevToolsClient {
    tracker: Arc<DevToolsTracker>,
    downloads: Arc<DevToolsDownloadHandler>,
}

impl DevToolsClient {
    pub(crate) fn new(tracker: Arc<DevToolsTracker>) -> Self {
        Self {
            tracker,
            downloads: Arc::new(DevToolsDownloadHandler::new()),
        }
    }
}

impl ClientHandlers for DevToolsClient {
    fn download_handler(&self) -> Option<Arc<dyn DownloadHandler>> {
        Some(self.downloads.clone())
    }

    fn life_span_handler(&self) -> Option<Arc<dyn LifeSpanHandler>> {
        Some(Arc::new(DevToolsLifeSpanHandler {
            tracker: self.tracker.clone(),
        }))
    }
}
