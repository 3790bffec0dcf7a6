//! DevTools launcher.
//!
//! Two ways to open devtools for the host browser:
//! - remote: open the frontend URL of the remote-debugging endpoint in the
//!   system browser. The URL is discovered once, in the background, by
//!   [`DevTools::prepare`].
//! - local: raise the embedded devtools window if it exists, otherwise ask
//!   the browser engine to create one with a dedicated [`DevToolsClient`].

mod client;
mod shell;
#[cfg(windows)]
mod win32;

pub use client::{
    ClientHandlers, DevToolsClient, DevToolsDownloadHandler, DevToolsLifeSpanHandler,
    DownloadHandler, HandlerSlot, LifeSpanHandler,
};
pub use shell::{platform_shell, NoopShell, ShellOps, ShowCommand};

use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{anyhow, Context};
use glasspane_core::{
    Capabilities, DevToolsSettings, SharedCompositor, SystemThemeSource, ThemeController,
    WindowHandle,
};
use serde::Deserialize;

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Window parameters for a newly created devtools window. Position and size
/// are left to the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevToolsWindowInfo {
    pub title: String,
}

/// The browser engine side of devtools creation.
pub trait DevToolsHost: Send + Sync {
    /// Create the embedded devtools window for the host browser.
    ///
    /// Returns `false` if the browser is not available yet.
    fn show_dev_tools(&self, info: &DevToolsWindowInfo, client: Arc<DevToolsClient>) -> bool;
}

/// Host for setups with no embedded browser attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevToolsHost;

impl DevToolsHost for NoDevToolsHost {
    fn show_dev_tools(&self, _info: &DevToolsWindowInfo, _client: Arc<DevToolsClient>) -> bool {
        false
    }
}

/// Platform services the devtools window needs.
#[derive(Clone)]
pub struct DevToolsPlatform {
    pub shell: Arc<dyn ShellOps>,
    pub system_theme: Arc<dyn SystemThemeSource>,
    pub compositor: SharedCompositor,
    pub capabilities: Capabilities,
}

/// State shared between the launcher and the devtools life-span handler.
pub struct DevToolsTracker {
    window: AtomicIsize,
    host_window: AtomicIsize,
    shell: Arc<dyn ShellOps>,
    system_theme: Arc<dyn SystemThemeSource>,
    compositor: SharedCompositor,
    capabilities: Capabilities,
}

impl DevToolsTracker {
    pub fn window(&self) -> WindowHandle {
        WindowHandle::from_raw(self.window.load(Ordering::Acquire))
    }

    pub(crate) fn set_window(&self, window: WindowHandle) {
        self.window.store(window.as_raw(), Ordering::Release);
    }

    /// Window the devtools window takes its icon from.
    pub fn host_window(&self) -> WindowHandle {
        WindowHandle::from_raw(self.host_window.load(Ordering::Acquire))
    }

    pub(crate) fn set_host_window(&self, window: WindowHandle) {
        self.host_window.store(window.as_raw(), Ordering::Release);
    }

    fn theme(&self) -> ThemeController<'_> {
        ThemeController::new(self.compositor.as_ref(), self.capabilities)
    }
}

/// What [`DevTools::open`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevToolsOutcome {
    OpenedRemote(String),
    Raised,
    Created,
    Unavailable(&'static str),
}

#[derive(Debug, Deserialize)]
struct DevToolsTarget {
    #[serde(rename = "devtoolsFrontendUrl")]
    devtools_frontend_url: Option<String>,
}

pub struct DevTools {
    settings: DevToolsSettings,
    remote_url: Arc<OnceLock<String>>,
    tracker: Arc<DevToolsTracker>,
    host: Arc<dyn DevToolsHost>,
}

impl DevTools {
    pub fn new(
        settings: DevToolsSettings,
        host_window: WindowHandle,
        host: Arc<dyn DevToolsHost>,
        platform: DevToolsPlatform,
    ) -> Self {
        let tracker = DevToolsTracker {
            window: AtomicIsize::new(0),
            host_window: AtomicIsize::new(host_window.as_raw()),
            shell: platform.shell,
            system_theme: platform.system_theme,
            compositor: platform.compositor,
            capabilities: platform.capabilities,
        };

        Self {
            settings,
            remote_url: Arc::new(OnceLock::new()),
            tracker: Arc::new(tracker),
            host,
        }
    }

    pub fn settings(&self) -> &DevToolsSettings {
        &self.settings
    }

    pub fn tracker(&self) -> &Arc<DevToolsTracker> {
        &self.tracker
    }

    /// Frontend URL found by discovery, if it has completed.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.get().map(String::as_str)
    }

    /// Record a frontend URL obtained elsewhere. The first value wins.
    pub fn set_remote_url(&self, url: String) -> bool {
        self.remote_url.set(url).is_ok()
    }

    /// Fresh handler set for a new devtools browser.
    pub fn client(&self) -> Arc<DevToolsClient> {
        Arc::new(DevToolsClient::new(self.tracker.clone()))
    }

    /// Start remote-debugging discovery on a background thread.
    ///
    /// Does nothing when remote debugging is disabled (port 0).
    pub fn prepare(&self) -> Option<JoinHandle<()>> {
        let port = self.settings.remote_debugging_port;
        if port == 0 {
            return None;
        }

        let remote_url = self.remote_url.clone();
        let spawned = std::thread::Builder::new()
            .name("devtools-discovery".to_string())
            .spawn(move || match discover_frontend_url(port) {
                Ok(url) => {
                    tracing::info!(%url, "Remote DevTools frontend discovered");
                    let _ = remote_url.set(url);
                }
                Err(e) => tracing::warn!(port, "Remote DevTools discovery failed: {:#}", e),
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to spawn devtools discovery thread");
                None
            }
        }
    }

    pub fn open(&self, remote: bool) -> DevToolsOutcome {
        let outcome = if remote { self.open_remote() } else { self.open_local() };
        tracing::debug!(remote, ?outcome, "OpenDevTools");
        outcome
    }

    fn open_remote(&self) -> DevToolsOutcome {
        if self.settings.remote_debugging_port == 0 {
            return DevToolsOutcome::Unavailable("remote debugging is disabled");
        }
        let Some(url) = self.remote_url() else {
            return DevToolsOutcome::Unavailable("remote DevTools URL not discovered yet");
        };

        if self.tracker.shell.open_url(url) {
            DevToolsOutcome::OpenedRemote(url.to_string())
        } else {
            DevToolsOutcome::Unavailable("failed to open remote DevTools URL")
        }
    }

    fn open_local(&self) -> DevToolsOutcome {
        let shell = &self.tracker.shell;
        let window = self.tracker.window();

        // May run off the UI thread, so trust the window owner rather than
        // the browser's own bookkeeping.
        if shell.owned_by_current_process(window) {
            let command = if shell.is_minimized(window) {
                ShowCommand::Restore
            } else {
                ShowCommand::Normal
            };
            shell.show(window, command);
            shell.set_foreground(window);
            return DevToolsOutcome::Raised;
        }

        let info = DevToolsWindowInfo {
            title: format!("DevTools - {}", self.settings.window_title),
        };
        if self.host.show_dev_tools(&info, self.client()) {
            DevToolsOutcome::Created
        } else {
            DevToolsOutcome::Unavailable("browser is not available")
        }
    }
}

fn discover_frontend_url(port: u16) -> anyhow::Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(DISCOVERY_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let body = client
        .get(format!("http://localhost:{}/json/list", port))
        .send()
        .context("target list request failed")?
        .error_for_status()?
        .text()
        .context("failed to read target list")?;

    frontend_url_from_listing(port, &body)
        .ok_or_else(|| anyhow!("no devtoolsFrontendUrl in target list"))
}

/// First `devtoolsFrontendUrl` in a `/json/list` response, made absolute.
pub fn frontend_url_from_listing(port: u16, body: &str) -> Option<String> {
    let targets: Vec<DevToolsTarget> = serde_json::from_str(body).ok()?;
    targets
        .into_iter()
        .find_map(|target| target.devtools_frontend_url)
        .map(|path| format!("http://127.0.0.1:{}{}", port, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glasspane_core::{FixedTheme, NativeCall, OsVersion, RecordingCompositor, WindowAttribute};
    use std::sync::Mutex;

    const HOST: WindowHandle = WindowHandle::from_raw(0x100);
    const DEVTOOLS: WindowHandle = WindowHandle::from_raw(0x200);

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ShellCall {
        OpenUrl(String),
        Show(WindowHandle, ShowCommand),
        Foreground(WindowHandle),
        CopyIcon(WindowHandle, WindowHandle),
        RefreshFrame(WindowHandle),
    }

    #[derive(Default)]
    struct FakeShell {
        calls: Mutex<Vec<ShellCall>>,
        minimized: bool,
    }

    impl FakeShell {
        fn calls(&self) -> Vec<ShellCall> {
            self.calls.lock().unwrap().clone()
        }

        fn push(&self, call: ShellCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl ShellOps for FakeShell {
        fn open_url(&self, url: &str) -> bool {
            self.push(ShellCall::OpenUrl(url.to_string()));
            true
        }

        fn owned_by_current_process(&self, window: WindowHandle) -> bool {
            !window.is_null()
        }

        fn is_minimized(&self, _window: WindowHandle) -> bool {
            self.minimized
        }

        fn show(&self, window: WindowHandle, command: ShowCommand) {
            self.push(ShellCall::Show(window, command));
        }

        fn set_foreground(&self, window: WindowHandle) {
            self.push(ShellCall::Foreground(window));
        }

        fn copy_icon(&self, from: WindowHandle, to: WindowHandle) {
            self.push(ShellCall::CopyIcon(from, to));
        }

        fn refresh_frame(&self, window: WindowHandle) {
            self.push(ShellCall::RefreshFrame(window));
        }
    }

    #[derive(Default)]
    struct FakeHost {
        titles: Mutex<Vec<String>>,
        clients: Mutex<Vec<Arc<DevToolsClient>>>,
    }

    impl DevToolsHost for FakeHost {
        fn show_dev_tools(&self, info: &DevToolsWindowInfo, client: Arc<DevToolsClient>) -> bool {
            self.titles.lock().unwrap().push(info.title.clone());
            self.clients.lock().unwrap().push(client);
            true
        }
    }

    struct Fixture {
        devtools: DevTools,
        shell: Arc<FakeShell>,
        host: Arc<FakeHost>,
        compositor: RecordingCompositor,
    }

    fn fixture(port: u16, light: bool, minimized: bool) -> Fixture {
        let shell = Arc::new(FakeShell {
            minimized,
            ..FakeShell::default()
        });
        let host = Arc::new(FakeHost::default());
        let compositor = RecordingCompositor::new();
        let settings = DevToolsSettings {
            remote_debugging_port: port,
            window_title: "Host".to_string(),
        };
        let platform = DevToolsPlatform {
            shell: shell.clone(),
            system_theme: Arc::new(FixedTheme { light }),
            compositor: Arc::new(compositor.clone()),
            capabilities: Capabilities::new(OsVersion::windows(22631)),
        };

        Fixture {
            devtools: DevTools::new(settings, HOST, host.clone(), platform),
            shell,
            host,
            compositor,
        }
    }

    #[test]
    fn test_frontend_url_from_listing() {
        let body = r#"[
            {"type": "service_worker", "url": "chrome://x"},
            {"type": "page", "devtoolsFrontendUrl": "/devtools/inspector.html?ws=127.0.0.1:8999/devtools/page/AB"}
        ]"#;
        assert_eq!(
            frontend_url_from_listing(8999, body).as_deref(),
            Some("http://127.0.0.1:8999/devtools/inspector.html?ws=127.0.0.1:8999/devtools/page/AB")
        );
        assert_eq!(frontend_url_from_listing(8999, "[]"), None);
        assert_eq!(frontend_url_from_listing(8999, "<html>"), None);
    }

    #[test]
    fn test_remote_requires_port_and_url() {
        let f = fixture(0, true, false);
        assert!(f.devtools.prepare().is_none());
        assert!(matches!(f.devtools.open(true), DevToolsOutcome::Unavailable(_)));

        let f = fixture(8999, true, false);
        assert!(matches!(f.devtools.open(true), DevToolsOutcome::Unavailable(_)));

        assert!(f.devtools.set_remote_url("http://127.0.0.1:8999/devtools".into()));
        assert!(!f.devtools.set_remote_url("http://other".into()));
        assert_eq!(
            f.devtools.open(true),
            DevToolsOutcome::OpenedRemote("http://127.0.0.1:8999/devtools".into())
        );
        assert_eq!(
            f.shell.calls(),
            vec![ShellCall::OpenUrl("http://127.0.0.1:8999/devtools".into())]
        );
    }

    #[test]
    fn test_local_creates_then_raises() {
        let f = fixture(0, true, false);

        assert_eq!(f.devtools.open(false), DevToolsOutcome::Created);
        assert_eq!(*f.host.titles.lock().unwrap(), vec!["DevTools - Host".to_string()]);

        let client = f.host.clients.lock().unwrap()[0].clone();
        assert!(client.provides(HandlerSlot::Download));
        assert!(client.provides(HandlerSlot::LifeSpan));
        assert!(!client.provides(HandlerSlot::Render));

        let life_span = client.life_span_handler().unwrap();
        life_span.on_after_created(DEVTOOLS);
        assert_eq!(f.devtools.tracker().window(), DEVTOOLS);

        assert_eq!(f.devtools.open(false), DevToolsOutcome::Raised);
        assert_eq!(
            f.shell.calls(),
            vec![
                ShellCall::CopyIcon(HOST, DEVTOOLS),
                ShellCall::Show(DEVTOOLS, ShowCommand::Normal),
                ShellCall::Foreground(DEVTOOLS),
            ]
        );
        // Light system theme: the title bar is left alone.
        assert!(f.compositor.calls().is_empty());

        life_span.on_before_close();
        assert!(f.devtools.tracker().window().is_null());
        assert_eq!(f.devtools.open(false), DevToolsOutcome::Created);
    }

    #[test]
    fn test_minimized_window_is_restored() {
        let f = fixture(0, true, true);
        f.devtools.tracker().set_window(DEVTOOLS);

        assert_eq!(f.devtools.open(false), DevToolsOutcome::Raised);
        assert_eq!(
            f.shell.calls(),
            vec![
                ShellCall::Show(DEVTOOLS, ShowCommand::Restore),
                ShellCall::Foreground(DEVTOOLS),
            ]
        );
    }

    #[test]
    fn test_dark_system_theme_darkens_devtools() {
        let f = fixture(0, false, false);
        f.devtools.client().life_span_handler().unwrap().on_after_created(DEVTOOLS);

        assert_eq!(
            f.compositor.calls(),
            vec![NativeCall::SetAttribute(DEVTOOLS, WindowAttribute::USE_IMMERSIVE_DARK_MODE, 1)]
        );
        assert_eq!(
            f.shell.calls(),
            vec![ShellCall::CopyIcon(HOST, DEVTOOLS), ShellCall::RefreshFrame(DEVTOOLS)]
        );
    }

    #[test]
    fn test_no_host_reports_unavailable() {
        let f = fixture(0, true, false);
        let platform = DevToolsPlatform {
            shell: f.shell.clone(),
            system_theme: Arc::new(FixedTheme { light: true }),
            compositor: Arc::new(RecordingCompositor::new()),
            capabilities: Capabilities::default(),
        };
        let devtools =
            DevTools::new(DevToolsSettings::default(), HOST, Arc::new(NoDevToolsHost), platform);
        assert!(matches!(devtools.open(false), DevToolsOutcome::Unavailable(_)));
    }
}
