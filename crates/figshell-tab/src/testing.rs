//! In-memory collaborators for exercising tabs without a window system.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use figshell_common::{Coordinator, Rect, ShellError, SurfaceError, TabId, WindowId};

use crate::external::ExternalOpener;
use crate::permission::{PermissionPrompt, PromptRequest};
use crate::surface::ContentSurface;

/// Records every coordinator call.
#[derive(Debug, Default)]
pub struct RecordingCoordinator {
    sign_outs: AtomicUsize,
    new_tabs: Mutex<Vec<String>>,
    bounds_requests: Mutex<Vec<WindowId>>,
}

impl RecordingCoordinator {
    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub fn new_tabs(&self) -> Vec<String> {
        self.new_tabs.lock().unwrap().clone()
    }

    pub fn bounds_requests(&self) -> Vec<WindowId> {
        self.bounds_requests.lock().unwrap().clone()
    }
}

impl Coordinator for RecordingCoordinator {
    fn notify_sign_out(&self) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }

    fn notify_open_in_new_tab(&self, url: &str) {
        self.new_tabs.lock().unwrap().push(url.to_string());
    }

    fn request_bounds(&self, window_id: WindowId) {
        self.bounds_requests.lock().unwrap().push(window_id);
    }
}

/// Records every URL handed to the system browser.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingOpener {
    /// An opener that records the URL and then reports failure.
    pub fn failing() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl ExternalOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), ShellError> {
        self.opened.lock().unwrap().push(url.to_string());
        if self.fail {
            Err(ShellError::Open {
                url: url.to_string(),
                reason: "no handler".into(),
            })
        } else {
            Ok(())
        }
    }
}

/// Prompt that always gives the same answer and counts how often it was shown.
#[derive(Debug)]
pub struct ScriptedPrompt {
    answer: bool,
    shown: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            shown: AtomicUsize::new(0),
        }
    }

    pub fn times_shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionPrompt for ScriptedPrompt {
    async fn confirm(&self, _request: &PromptRequest) -> bool {
        self.shown.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

/// Surface that keeps everything in memory.
#[derive(Debug)]
pub struct FakeSurface {
    id: TabId,
    pub url: Option<String>,
    pub loads: Vec<String>,
    pub sent: Mutex<Vec<(String, serde_json::Value)>>,
    pub zoom: Mutex<Option<f64>>,
    pub bounds: Mutex<Option<Rect>>,
    pub auto_resize: bool,
    pub visible: Mutex<bool>,
    pub reloads: AtomicUsize,
    pub devtools_toggles: AtomicUsize,
}

impl FakeSurface {
    pub fn new(id: u32) -> Self {
        Self {
            id: TabId(id),
            url: None,
            loads: Vec::new(),
            sent: Mutex::new(Vec::new()),
            zoom: Mutex::new(None),
            bounds: Mutex::new(None),
            auto_resize: false,
            visible: Mutex::new(true),
            reloads: AtomicUsize::new(0),
            devtools_toggles: AtomicUsize::new(0),
        }
    }

    pub fn showing(id: u32, url: &str) -> Self {
        let mut surface = Self::new(id);
        surface.url = Some(url.to_string());
        surface
    }

    pub fn sent(&self) -> Vec<(String, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.lock().unwrap()
    }

    pub fn last_bounds(&self) -> Option<Rect> {
        *self.bounds.lock().unwrap()
    }
}

impl ContentSurface for FakeSurface {
    fn id(&self) -> TabId {
        self.id
    }

    fn url(&self) -> Option<String> {
        self.url.clone()
    }

    fn load_url(&mut self, url: &str) -> Result<(), SurfaceError> {
        self.url = Some(url.to_string());
        self.loads.push(url.to_string());
        Ok(())
    }

    fn send(&self, channel: &str, payload: &serde_json::Value) -> Result<(), SurfaceError> {
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), payload.clone()));
        Ok(())
    }

    fn set_zoom(&self, factor: f64) -> Result<(), SurfaceError> {
        *self.zoom.lock().unwrap() = Some(factor);
        Ok(())
    }

    fn set_bounds(&self, bounds: Rect) -> Result<(), SurfaceError> {
        *self.bounds.lock().unwrap() = Some(bounds);
        Ok(())
    }

    fn set_auto_resize(&mut self, enabled: bool) {
        self.auto_resize = enabled;
    }

    fn auto_resize(&self) -> bool {
        self.auto_resize
    }

    fn set_visible(&self, visible: bool) -> Result<(), SurfaceError> {
        *self.visible.lock().unwrap() = visible;
        Ok(())
    }

    fn reload(&self) -> Result<(), SurfaceError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn toggle_devtools(&self) {
        self.devtools_toggles.fetch_add(1, Ordering::SeqCst);
    }
}
