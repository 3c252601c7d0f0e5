use std::sync::{Arc, Mutex};

use super::*;
use crate::testing::{FakeSurface, RecordingCoordinator, RecordingOpener, ScriptedPrompt};

const FILES: &str = "https://www.figma.com/files/recent";

struct Harness {
    tab: Tab<FakeSurface>,
    coordinator: Arc<RecordingCoordinator>,
    opener: Arc<RecordingOpener>,
}

fn harness_at(url: &str) -> Harness {
    let coordinator = Arc::new(RecordingCoordinator::default());
    let opener = Arc::new(RecordingOpener::default());
    let gatekeeper = Gatekeeper::new(TabId(4), coordinator.clone(), opener.clone());
    let tab = Tab::new(WindowId(1), FakeSurface::showing(4, url), gatekeeper);
    Harness {
        tab,
        coordinator,
        opener,
    }
}

fn harness() -> Harness {
    harness_at(FILES)
}

fn recorder() -> (Arc<Mutex<Vec<bool>>>, impl Fn() -> PermissionCallback) {
    let answers = Arc::new(Mutex::new(Vec::new()));
    let make = {
        let answers = answers.clone();
        move || -> PermissionCallback {
            let answers = answers.clone();
            Box::new(move |granted| answers.lock().unwrap().push(granted))
        }
    };
    (answers, make)
}

// -- construction --

#[test]
fn id_comes_from_surface() {
    let h = harness();
    assert_eq!(h.tab.id(), TabId(4));
    assert_eq!(h.tab.id(), h.tab.surface().id());
}

#[test]
fn construction_requests_bounds_and_autosizes() {
    let h = harness();
    assert_eq!(h.coordinator.bounds_requests(), vec![WindowId(1)]);
    assert!(h.tab.surface().auto_resize);
    assert!(!h.tab.is_using_microphone());
    assert!(!h.tab.is_in_voice_call());
    assert!(!h.tab.moves());
    assert_eq!(h.tab.file_key(), None);
}

#[test]
fn load_url_updates_tab_and_surface() {
    let mut h = harness();
    h.tab.load_url("https://www.figma.com/file/abc/Design").unwrap();
    assert_eq!(h.tab.url(), Some("https://www.figma.com/file/abc/Design"));
    assert_eq!(
        h.tab.surface().loads,
        vec!["https://www.figma.com/file/abc/Design".to_string()]
    );
}

#[test]
fn host_commands_reach_surface() {
    let mut h = harness();
    h.tab.set_bounds(Rect::new(0.0, 40.0, 800.0, 560.0));
    h.tab.reload();
    h.tab.toggle_devtools();
    h.tab.set_autosize(false);
    h.tab.set_title("Design");
    h.tab.set_moves(true);

    let surface = h.tab.surface();
    assert_eq!(
        *surface.bounds.lock().unwrap(),
        Some(Rect::new(0.0, 40.0, 800.0, 560.0))
    );
    assert_eq!(surface.reloads.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(
        surface
            .devtools_toggles
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
    assert!(!surface.auto_resize);
    assert_eq!(h.tab.title(), Some("Design"));
    assert!(h.tab.moves());
}

// -- navigation --

#[test]
fn navigation_uses_surface_url_as_current() {
    let h = harness();
    assert_eq!(h.tab.on_will_navigate(FILES), NavigationDecision::Suppress);
    assert_eq!(
        h.tab.on_will_navigate("https://www.figma.com/file/abc/Design"),
        NavigationDecision::Allow
    );
}

#[test]
fn login_tab_never_navigates_in_place() {
    let h = harness_at("https://www.figma.com/login");
    for target in [FILES, "https://www.figma.com/logout", "https://example.com"] {
        assert!(!h.tab.on_will_navigate(target).proceeds());
    }
    assert_eq!(h.coordinator.sign_outs(), 0);
}

#[test]
fn logout_emits_exactly_one_sign_out() {
    let h = harness();
    let decision = h.tab.on_will_navigate("https://www.figma.com/logout");
    assert!(decision.proceeds());
    assert_eq!(h.coordinator.sign_outs(), 1);
}

#[test]
fn unloaded_surface_still_classifies() {
    let coordinator = Arc::new(RecordingCoordinator::default());
    let opener = Arc::new(RecordingOpener::default());
    let gatekeeper = Gatekeeper::new(TabId(8), coordinator, opener);
    let tab = Tab::new(WindowId(1), FakeSurface::new(8), gatekeeper);

    assert_eq!(tab.on_will_navigate(FILES), NavigationDecision::Allow);
}

#[test]
fn new_window_routes_through_gatekeeper() {
    let h = harness();
    h.tab.on_new_window("https://www.figma.com/proto/abc/Flow");
    h.tab.on_new_window("https://www.figma.com/start_google_sso");
    h.tab.on_new_window("https://github.com/");

    assert_eq!(
        h.coordinator.new_tabs(),
        vec!["https://www.figma.com/proto/abc/Flow".to_string()]
    );
    assert_eq!(h.opener.opened(), vec!["https://github.com/".to_string()]);
}

// -- state signals --

#[test]
fn file_key_from_other_sender_is_ignored() {
    let mut h = harness();
    assert!(!h.tab.update_file_key(TabId(99), WindowId(1), "other"));
    assert_eq!(h.tab.file_key(), None);

    assert!(h.tab.update_file_key(TabId(4), WindowId(1), "Xy12"));
    assert_eq!(h.tab.file_key(), Some("Xy12"));

    assert!(!h.tab.update_file_key(TabId(5), WindowId(1), "stolen"));
    assert_eq!(h.tab.file_key(), Some("Xy12"));
}

#[test]
fn update_scale_sets_zoom() {
    let h = harness();
    h.tab.update_scale(1.25);
    assert_eq!(*h.tab.surface().zoom.lock().unwrap(), Some(1.25));
}

#[test]
fn state_signals_are_pushed_to_page() {
    let mut h = harness();
    h.tab.set_is_in_voice_call(true);
    h.tab.set_using_microphone(true);

    assert!(h.tab.is_in_voice_call());
    assert!(h.tab.is_using_microphone());
    assert_eq!(
        h.tab.surface().sent(),
        vec![
            (
                "setIsInVoiceCall".to_string(),
                json!({"id": 4, "isInVoiceCall": true})
            ),
            (
                "setUsingMicrophone".to_string(),
                json!({"id": 4, "isUsingMicrophone": true})
            ),
        ]
    );
}

#[test]
fn external_update_can_clear_microphone_flag() {
    let mut h = harness();
    h.tab.set_using_microphone(true);
    h.tab.set_using_microphone(false);
    assert!(!h.tab.is_using_microphone());
}

// -- permissions: callback API --

#[test]
fn non_media_kinds_deny_without_prompt() {
    let mut h = harness();
    let (answers, callback) = recorder();

    for kind in [
        PermissionKind::Geolocation,
        PermissionKind::Notifications,
        PermissionKind::ClipboardRead,
        PermissionKind::Unknown,
    ] {
        assert_eq!(h.tab.handle_permission_request(kind, callback()), None);
    }
    assert_eq!(*answers.lock().unwrap(), vec![false; 4]);
    assert!(!h.tab.prompt_outstanding());
}

#[test]
fn non_media_denied_even_with_microphone_granted() {
    let mut h = harness();
    h.tab.set_using_microphone(true);
    let (answers, callback) = recorder();
    assert_eq!(
        h.tab
            .handle_permission_request(PermissionKind::Geolocation, callback()),
        None
    );
    assert_eq!(*answers.lock().unwrap(), vec![false]);
}

#[test]
fn media_prompts_once_and_queues_followers() {
    let mut h = harness();
    let (answers, callback) = recorder();

    let first = h.tab.handle_permission_request(PermissionKind::Media, callback());
    assert_eq!(first, Some(PromptRequest::microphone()));
    let second = h.tab.handle_permission_request(PermissionKind::Media, callback());
    assert_eq!(second, None);
    assert!(h.tab.prompt_outstanding());
    assert!(answers.lock().unwrap().is_empty());

    h.tab.resolve_permission_prompt(true);
    assert_eq!(*answers.lock().unwrap(), vec![true, true]);
    assert!(h.tab.is_using_microphone());
    assert!(!h.tab.prompt_outstanding());
}

#[test]
fn declined_prompt_denies_and_leaves_flag() {
    let mut h = harness();
    let (answers, callback) = recorder();

    h.tab.handle_permission_request(PermissionKind::Media, callback());
    h.tab.resolve_permission_prompt(false);

    assert_eq!(*answers.lock().unwrap(), vec![false]);
    assert!(!h.tab.is_using_microphone());
    assert!(h.tab.surface().sent().is_empty());
}

#[test]
fn stale_answer_is_dropped() {
    let mut h = harness();
    h.tab.resolve_permission_prompt(true);
    assert!(!h.tab.is_using_microphone());
}

#[test]
fn dropping_tab_denies_waiting_callbacks() {
    let mut h = harness();
    let (answers, callback) = recorder();
    h.tab.handle_permission_request(PermissionKind::Media, callback());

    drop(h.tab);
    assert_eq!(*answers.lock().unwrap(), vec![false]);
}

// -- permissions: async API --

#[tokio::test]
async fn granted_media_skips_prompt() {
    let mut h = harness();
    h.tab.set_using_microphone(true);
    let prompt = ScriptedPrompt::answering(false);

    assert!(h.tab.request_permission(PermissionKind::Media, &prompt).await);
    assert_eq!(prompt.times_shown(), 0);
}

#[tokio::test]
async fn user_declines_microphone() {
    let mut h = harness();
    let prompt = ScriptedPrompt::answering(false);

    assert!(!h.tab.request_permission(PermissionKind::Media, &prompt).await);
    assert_eq!(prompt.times_shown(), 1);
    assert!(!h.tab.is_using_microphone());
}

#[tokio::test]
async fn user_accepts_microphone_then_latches() {
    let mut h = harness();
    let prompt = ScriptedPrompt::answering(true);

    assert!(h.tab.request_permission(PermissionKind::Media, &prompt).await);
    assert!(h.tab.is_using_microphone());
    assert!(h.tab.request_permission(PermissionKind::Media, &prompt).await);
    assert_eq!(prompt.times_shown(), 1);
}

#[tokio::test]
async fn geolocation_never_prompts() {
    let mut h = harness();
    let prompt = ScriptedPrompt::answering(true);

    assert!(
        !h.tab
            .request_permission(PermissionKind::Geolocation, &prompt)
            .await
    );
    assert_eq!(prompt.times_shown(), 0);
}

#[tokio::test]
async fn async_request_denies_while_host_prompt_outstanding() {
    let mut h = harness();
    let (_answers, callback) = recorder();
    h.tab.handle_permission_request(PermissionKind::Media, callback());

    let prompt = ScriptedPrompt::answering(true);
    assert!(!h.tab.request_permission(PermissionKind::Media, &prompt).await);
    assert_eq!(prompt.times_shown(), 0);
}

// -- IPC messages --

#[test]
fn messages_from_own_surface_are_applied() {
    let mut h = harness();
    h.tab
        .handle_message(TabId(4), TabMessage::UpdateUiScale(0.8));
    h.tab
        .handle_message(TabId(4), TabMessage::SetIsInVoiceCall(true));
    h.tab.handle_message(
        TabId(4),
        TabMessage::UpdateFileKey {
            window_id: WindowId(1),
            key: "Xy12".into(),
        },
    );

    assert_eq!(*h.tab.surface().zoom.lock().unwrap(), Some(0.8));
    assert!(h.tab.is_in_voice_call());
    assert_eq!(h.tab.file_key(), Some("Xy12"));
}

#[test]
fn messages_from_other_surfaces_are_ignored() {
    let mut h = harness();
    h.tab
        .handle_message(TabId(7), TabMessage::UpdateUiScale(3.0));
    h.tab
        .handle_message(TabId(7), TabMessage::SetUsingMicrophone(true));
    h.tab.handle_message(
        TabId(7),
        TabMessage::UpdateFileKey {
            window_id: WindowId(1),
            key: "other".into(),
        },
    );
    let prompt = h
        .tab
        .handle_message(TabId(7), TabMessage::RequestMicrophonePermission);

    assert_eq!(prompt, None);
    assert_eq!(*h.tab.surface().zoom.lock().unwrap(), None);
    assert!(!h.tab.is_using_microphone());
    assert_eq!(h.tab.file_key(), None);
}

#[test]
fn page_microphone_request_prompts_then_notifies_page() {
    let mut h = harness();
    let prompt = h
        .tab
        .handle_message(TabId(4), TabMessage::RequestMicrophonePermission);
    assert_eq!(prompt, Some(PromptRequest::microphone()));

    assert!(h.tab.surface().sent().is_empty());

    h.tab.resolve_permission_prompt(true);
    assert!(h.tab.is_using_microphone());
    assert_eq!(
        h.tab.surface().sent(),
        vec![
            (
                "setUsingMicrophone".to_string(),
                json!({"id": 4, "isUsingMicrophone": true})
            ),
            (
                "permissionResult".to_string(),
                json!({"id": 4, "kind": "media", "granted": true})
            ),
        ]
    );

    // Already granted: no second prompt.
    assert_eq!(
        h.tab
            .handle_message(TabId(4), TabMessage::RequestMicrophonePermission),
        None
    );
}

#[test]
fn page_permission_request_for_other_kinds_is_denied() {
    let mut h = harness();
    let prompt = h.tab.handle_message(
        TabId(4),
        TabMessage::PermissionRequest(PermissionKind::DisplayCapture),
    );
    assert_eq!(prompt, None);
    assert!(!h.tab.prompt_outstanding());
    assert_eq!(
        h.tab.surface().sent(),
        vec![(
            "permissionResult".to_string(),
            json!({"id": 4, "kind": "display-capture", "granted": false})
        )]
    );
}

#[test]
fn page_geolocation_request_is_reported_denied() {
    let mut h = harness();
    let prompt = h.tab.handle_message(
        TabId(4),
        TabMessage::PermissionRequest(PermissionKind::Geolocation),
    );

    assert_eq!(prompt, None);
    assert_eq!(
        h.tab.surface().sent(),
        vec![(
            "permissionResult".to_string(),
            json!({"id": 4, "kind": "geolocation", "granted": false})
        )]
    );
}

#[test]
fn declined_page_microphone_request_is_reported_to_page() {
    let mut h = harness();
    assert!(h
        .tab
        .handle_message(TabId(4), TabMessage::PermissionRequest(PermissionKind::Media))
        .is_some());
    // Joins the outstanding prompt.
    assert_eq!(
        h.tab
            .handle_message(TabId(4), TabMessage::RequestMicrophonePermission),
        None
    );

    h.tab.resolve_permission_prompt(false);

    assert!(!h.tab.is_using_microphone());
    let denied = json!({"id": 4, "kind": "media", "granted": false});
    assert_eq!(
        h.tab.surface().sent(),
        vec![
            ("permissionResult".to_string(), denied.clone()),
            ("permissionResult".to_string(), denied),
        ]
    );
}

#[test]
fn in_page_location_change_moves_the_tab() {
    let mut h = harness();
    let design = "https://www.figma.com/design/Xy12/Wireframes";

    h.tab
        .handle_message(TabId(7), TabMessage::LocationChanged(design.into()));
    assert_eq!(h.tab.url(), Some(FILES));

    h.tab
        .handle_message(TabId(4), TabMessage::LocationChanged(design.into()));
    assert_eq!(h.tab.url(), Some(design));
}
