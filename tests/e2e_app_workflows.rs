// End-to-end workflows through the same handlers the window uses.

use alarm_clock::alerts::TickWindow;
use alarm_clock::command_handlers::CommandHandlers;
use alarm_clock::ui_state::{EditorState, SyncState, UiState};
use alarm_clock::{
    process_tick, AppError, AppResult, AppState, MonitorEvent, NotificationRequest, Notify, OutlookReminder,
    RepeatPreset, ReminderApi, Store, SyncProgress, TokenProvider, UiEvent,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc, Weekday};
use mockall::mock;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio_util::sync::CancellationToken;

mock! {
    pub Notifier {}
    impl Notify for Notifier {
        fn show(&self, request: &NotificationRequest) -> AppResult<u32>;
        fn close(&self, id: u32);
        fn is_open(&self, id: u32) -> bool;
        fn close_all(&self);
    }
}

mock! {
    pub Api {}
    #[async_trait]
    impl ReminderApi for Api {
        async fn validate_token(&self, token: &str) -> AppResult<bool>;
        async fn get_reminders(
            &self,
            token: &str,
            begin: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> AppResult<Vec<OutlookReminder>>;
    }
}

mock! {
    pub Login {}
    #[async_trait]
    impl TokenProvider for Login {
        async fn login(&self, progress: UnboundedSender<SyncProgress>) -> AppResult<String>;
    }
}

fn handlers(dir: &TempDir, store: &Store, api: MockApi, login: MockLogin) -> CommandHandlers {
    CommandHandlers::new(
        store,
        dir.path().join("autostart").join("alarm-clock.desktop"),
        PathBuf::from("/usr/bin/alarm-clock"),
        Arc::new(api),
        Arc::new(login),
    )
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
    let naive = NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap();
    Local.from_local_datetime(&naive).earliest().unwrap()
}

#[test]
fn test_create_alarm_in_editor_then_it_rings() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("config.json")).unwrap();
    let handlers = handlers(&dir, &store, MockApi::new(), MockLogin::new());

    // Weekend alarm entered through the editor
    let mut editor = EditorState::create();
    editor.time = "09:45:00".into();
    editor.name = "  Brunch ".into();
    editor.select_preset(RepeatPreset::Custom);
    editor.toggle_day(Weekday::Sat);
    editor.toggle_day(Weekday::Sun);
    let alarm = editor.to_alarm().unwrap();

    let saved = tokio_test::block_on(handlers.alarms.save_alarm(alarm)).unwrap();
    assert_eq!(saved.name, "Brunch");

    let mut notifier = MockNotifier::new();
    notifier
        .expect_show()
        .withf(|request| request.summary == "Brunch")
        .times(1)
        .returning(|_| Ok(7));
    let state = AppState {
        store: store.clone(),
        notifier: Arc::new(notifier),
        outlook: Arc::new(MockApi::new()),
        shutdown: CancellationToken::new(),
    };

    // 2024-01-13 is a Saturday
    let window = TickWindow {
        from: local(2024, 1, 13, 9, 44, 59),
        to: local(2024, 1, 13, 9, 45, 0),
    };
    let events = process_tick(&state, &window);
    assert!(matches!(events.as_slice(), [MonitorEvent::AlarmFired(a)] if a.id == saved.id));
    assert!(store.alarm(saved.id).unwrap().enabled);
}

#[test]
fn test_edit_keeps_identity_and_disabled_state() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("config.json")).unwrap();
    let handlers = handlers(&dir, &store, MockApi::new(), MockLogin::new());

    let mut editor = EditorState::create();
    editor.time = "07:00:00".into();
    let original = tokio_test::block_on(handlers.alarms.save_alarm(editor.to_alarm().unwrap())).unwrap();
    tokio_test::block_on(handlers.alarms.set_enabled(original.id, false)).unwrap();

    let mut editor = EditorState::edit(&store.alarm(original.id).unwrap());
    editor.time = "07:30:00".into();
    tokio_test::block_on(handlers.alarms.save_alarm(editor.to_alarm().unwrap())).unwrap();

    let alarms = store.alarms();
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].id, original.id);
    assert_eq!(alarms[0].time_text(), "07:30:00");
    assert!(!alarms[0].enabled);
}

#[test]
fn test_invalid_time_is_rejected_before_saving() {
    let mut editor = EditorState::create();
    editor.time = "25:00".into();
    assert!(matches!(editor.to_alarm(), Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_first_synchronization_logs_in_and_reports_progress() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("config.json")).unwrap();

    let mut login = MockLogin::new();
    login.expect_login().times(1).returning(|progress| {
        let _ = progress.send(SyncProgress::step(50, "Waiting for login..."));
        Ok("Bearer fresh".to_string())
    });
    let mut api = MockApi::new();
    api.expect_get_reminders()
        .withf(|token, _, _| token == "Bearer fresh")
        .times(1)
        .returning(|_, _, _| {
            let start = Utc::now() + Duration::hours(2);
            Ok(vec![OutlookReminder {
                id: "m1".into(),
                subject: "Planning".into(),
                location: String::new(),
                reminder_time: start - Duration::minutes(15),
                start,
                end: start + Duration::hours(1),
                notification_id: None,
            }])
        });
    let handlers = handlers(&dir, &store, api, login);

    let (ui_tx, mut ui_rx) = unbounded_channel();
    let result = handlers.outlook.synchronize(ui_tx).await.unwrap();
    assert!(result.logged_in);
    assert_eq!(result.summary(), "Successfully imported 1 reminders from Outlook.");
    assert_eq!(store.outlook_token().as_deref(), Some("Bearer fresh"));

    // Replay the progress the window would have shown
    let mut ui = UiState::new(-1, 15, false);
    ui.sync = Some(SyncState::new());
    let mut labels = Vec::new();
    while let Ok(event) = ui_rx.try_recv() {
        if let UiEvent::SyncProgress(progress) = event {
            if let Some(sync) = ui.sync.as_mut() {
                sync.apply(progress);
                labels.push(sync.label.clone());
            }
        }
    }
    assert_eq!(
        labels,
        vec!["Connecting with Outlook...", "Waiting for login...", "Downloading reminders..."]
    );
    assert!(ui.is_syncing());
}

#[tokio::test]
async fn test_cancelled_login_keeps_previous_reminders() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("config.json")).unwrap();
    let start = Utc::now() + Duration::hours(1);
    store
        .replace_reminders(vec![OutlookReminder {
            id: "old".into(),
            subject: "Review".into(),
            location: String::new(),
            reminder_time: start - Duration::minutes(5),
            start,
            end: start + Duration::minutes(30),
            notification_id: None,
        }])
        .unwrap();

    let mut login = MockLogin::new();
    login.expect_login().times(1).returning(|_| Err(AppError::LoginCancelled));
    let mut api = MockApi::new();
    api.expect_get_reminders().never();
    let handlers = handlers(&dir, &store, api, login);

    let (ui_tx, _ui_rx) = unbounded_channel();
    let result = handlers.outlook.synchronize(ui_tx).await;
    assert!(matches!(result, Err(AppError::LoginCancelled)));
    assert_eq!(store.reminder_count(), 1);
    assert!(store.outlook_token().is_none());
}
