mod common;

use common::{backend_event, input, start_job, RecordingBackend};
use photoslicer_core::JobState;
use photoslicer_settings::{
    ControlChange, Direction, LanguageId, SaveFormat, SettingsSnapshot, ThemeId,
};
use photoslicer_ui::{BackendEvent, Operation, OperatorInput, SessionEvent};
use std::path::PathBuf;
use std::time::Duration;

#[tokio::test]
async fn test_every_change_commits_a_full_snapshot() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);

    let inputs = [
        OperatorInput::Control(ControlChange::Width("1024".to_string())),
        OperatorInput::Control(ControlChange::Zip(true)),
        OperatorInput::Control(ControlChange::Pdf(true)),
        OperatorInput::Control(ControlChange::Format("webp".to_string())),
        OperatorInput::SwitchTab("single".to_string()),
        OperatorInput::SetTheme(ThemeId::Green),
        OperatorInput::SetLanguage(LanguageId::Fa),
    ];
    let expected_commits = inputs.len();
    for change in inputs {
        input(&mut session, change).await;
    }

    let saved = backend.saved();
    assert_eq!(saved.len(), expected_commits);
    assert!(saved.iter().all(|s| !(s.archive_as_zip && s.archive_as_pdf)));

    let last = saved.last().unwrap();
    assert_eq!(last.width, 1024);
    assert!(last.archive_as_pdf);
    assert!(!last.archive_as_zip);
    assert_eq!(last.save_format, SaveFormat::Webp);
    assert_eq!(last.active_tab, "single");
    assert_eq!(last.theme, ThemeId::Green);
    assert_eq!(last.language, LanguageId::Fa);
    assert_eq!(*last, session.snapshot());
}

#[tokio::test]
async fn test_default_theme_is_sent_without_marker() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);

    input(&mut session, OperatorInput::SetTheme(ThemeId::Red)).await;
    let view = session.view();
    assert_eq!(view.theme_marker, Some("red"));
    assert_eq!(view.active_theme_selector.as_deref(), Some("dot-red"));

    input(&mut session, OperatorInput::SetTheme(ThemeId::Blue)).await;
    let view = session.view();
    assert_eq!(view.theme_marker, None);
    assert_eq!(view.active_theme_selector.as_deref(), Some("dot-blue"));

    let last = backend.saved().pop().unwrap();
    let json = serde_json::to_value(&last).unwrap();
    assert!(json.get("theme").is_none());
}

#[tokio::test]
async fn test_failed_save_notifies_once() {
    let backend = RecordingBackend::new();
    backend.fail(Operation::SaveSettings);
    let mut session = common::session(&backend);

    input(&mut session, OperatorInput::Control(ControlChange::Enhance(true))).await;

    let view = session.view();
    assert_eq!(session.notifications().error_count(), 1);
    assert_eq!(view.toasts[0].message, "Settings could not be saved.");
    assert_eq!(view.job_state, JobState::Idle);
    assert!(session.snapshot().ai_enhance);
}

#[tokio::test]
async fn test_loaded_settings_rebuild_identically() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);
    let persisted = SettingsSnapshot {
        custom_width_enabled: true,
        width: 960,
        height_limit: 12000,
        save_quality: 85,
        save_format: SaveFormat::Png,
        archive_as_zip: true,
        no_stitch: true,
        active_tab: "single".to_string(),
        theme: ThemeId::Purple,
        language: LanguageId::Fa,
        ..Default::default()
    };

    session.load_settings(&persisted);

    assert_eq!(session.snapshot(), persisted);
    let view = session.view();
    assert_eq!(view.direction, Direction::Rtl);
    assert_eq!(view.theme_marker, Some("purple"));
    assert_eq!(view.active_tab, "single");
    assert_eq!(view.action_label, "شروع");
    assert!(backend.saved().is_empty());
}

#[tokio::test]
async fn test_browse_fills_source() {
    let backend = RecordingBackend::new();
    backend.set_folder(Some("/photos/picked"));
    let mut session = common::session(&backend);

    input(&mut session, OperatorInput::Browse).await;
    assert_eq!(session.view().source, "/photos/picked");
    assert_eq!(backend.count(Operation::SaveSettings), 1);

    backend.set_folder(None);
    input(&mut session, OperatorInput::Browse).await;
    assert_eq!(session.view().source, "/photos/picked");
    assert_eq!(backend.count(Operation::SaveSettings), 1);
    assert_eq!(backend.count(Operation::SelectFolder), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_folder_pick_still_fills_source() {
    let backend = RecordingBackend::new();
    backend.set_folder(Some("/photos/chapter-1"));
    backend.delay(Operation::SelectFolder, Duration::from_secs(15));
    let mut session = common::session(&backend);

    input(&mut session, OperatorInput::Browse).await;
    tokio::time::sleep(Duration::from_secs(20)).await;
    session.settle().await;

    let view = session.view();
    assert_eq!(view.source, "/photos/chapter-1");
    assert!(view.toasts.is_empty());
    assert_eq!(session.notifications().error_count(), 0);
    assert_eq!(backend.count(Operation::SaveSettings), 1);
}

#[tokio::test]
async fn test_open_result_needs_an_output() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);

    input(&mut session, OperatorInput::OpenResult).await;
    assert_eq!(backend.count(Operation::OpenFileExplorer), 0);

    start_job(&mut session, "/photos/batch").await;
    backend_event(
        &mut session,
        BackendEvent::Completed {
            output_path: PathBuf::from("/photos/batch/output"),
        },
    )
    .await;
    input(&mut session, OperatorInput::OpenResult).await;
    assert_eq!(backend.opened(), vec![PathBuf::from("/photos/batch/output")]);
}

#[tokio::test]
async fn test_app_ready_is_announced_once() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);

    for _ in 0..3 {
        session.handle_event(SessionEvent::BridgeReady);
    }
    session.settle().await;

    assert_eq!(backend.count(Operation::AppReady), 1);
}

#[tokio::test]
async fn test_resize_applies_uniform_zoom() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);

    session.handle_event(SessionEvent::Resize {
        width: 1040.0,
        height: 1620.0,
    });
    assert_eq!(session.view().zoom, 2.0);

    session.handle_event(SessionEvent::Resize {
        width: 0.0,
        height: 500.0,
    });
    assert_eq!(session.view().zoom, 2.0);

    session.handle_event(SessionEvent::Resize {
        width: 260.0,
        height: 810.0,
    });
    assert_eq!(session.view().zoom, 0.5);
}

#[tokio::test]
async fn test_minimize_keeps_session_running() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);

    input(&mut session, OperatorInput::Minimize).await;

    assert_eq!(backend.count(Operation::MinimizeWindow), 1);
    assert!(!session.is_finished());
}

#[tokio::test]
async fn test_close_ends_the_loop() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);
    let handle = session.handle();

    assert!(handle.operator(OperatorInput::Close));
    tokio::time::timeout(Duration::from_secs(5), session.run())
        .await
        .expect("session should end after close");

    assert!(session.is_finished());
    assert_eq!(backend.count(Operation::CloseWindow), 1);
}

#[tokio::test]
async fn test_failed_close_still_ends_the_loop() {
    let backend = RecordingBackend::new();
    backend.fail(Operation::CloseWindow);
    let mut session = common::session(&backend);
    let handle = session.handle();

    handle.operator(OperatorInput::Close);
    tokio::time::timeout(Duration::from_secs(5), session.run())
        .await
        .expect("session should end after close");

    assert_eq!(session.notifications().error_count(), 1);
}

#[tokio::test]
async fn test_shutdown_stops_running_clock() {
    let backend = RecordingBackend::new();
    let mut session = common::session(&backend);
    start_job(&mut session, "/photos/batch").await;
    assert!(session.clock().is_running());

    session.handle().send(SessionEvent::Shutdown);
    tokio::time::timeout(Duration::from_secs(5), session.run())
        .await
        .expect("session should end after shutdown");

    assert!(!session.clock().is_running());
}

#[tokio::test]
async fn test_view_serializes_for_text_hosts() {
    let backend = RecordingBackend::new();
    let session = common::session(&backend);

    let json = session.view().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["job_state"], "idle");
    assert_eq!(value["action_label"], "INITIATE");
    assert_eq!(value["timer_text"], "00:00:00");
    assert_eq!(value["direction"], "ltr");
}
