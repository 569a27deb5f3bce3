use alarm_clock::alerts::TickWindow;
use alarm_clock::{
    process_tick, Alarm, AppResult, AppState, MonitorEvent, NotificationRequest, Notify, OutlookReminder, RepeatDays,
    ReminderApi, Settings, Store, Ticker,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use mockall::{mock, predicate::*};
use std::sync::Arc;
use tempfile::TempDir;
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

fn create_state(dir: &TempDir, notifier: MockNotifier) -> AppState {
    AppState {
        store: Store::open(dir.path().join("config.json")).unwrap(),
        notifier: Arc::new(notifier),
        outlook: Arc::new(MockApi::new()),
        shutdown: CancellationToken::new(),
    }
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
    let naive = NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap();
    Local.from_local_datetime(&naive).earliest().unwrap()
}

fn window(from: DateTime<Local>, to: DateTime<Local>) -> TickWindow {
    TickWindow { from, to }
}

fn reminder(id: &str, remind_at: DateTime<Utc>, start: DateTime<Utc>) -> OutlookReminder {
    OutlookReminder {
        id: id.to_string(),
        subject: format!("Meeting {}", id),
        location: "Room 4".to_string(),
        reminder_time: remind_at,
        start,
        end: start + Duration::minutes(30),
        notification_id: None,
    }
}

#[test]
fn test_once_alarm_fires_then_disables() {
    let dir = TempDir::new().unwrap();
    let mut notifier = MockNotifier::new();
    notifier
        .expect_show()
        .withf(|request| request.summary == "Wake up" && request.sound.is_some())
        .times(1)
        .returning(|_| Ok(1));
    let state = create_state(&dir, notifier);

    let alarm = Alarm::new("Wake up", NaiveTime::from_hms_opt(7, 0, 0).unwrap(), RepeatDays::once());
    let id = alarm.id;
    state.store.upsert_alarm(alarm).unwrap();

    // 2024-01-08 is a Monday
    let events = process_tick(&state, &window(local(2024, 1, 8, 6, 59, 59), local(2024, 1, 8, 7, 0, 0)));
    assert!(matches!(events.as_slice(), [MonitorEvent::AlarmFired(a)] if a.id == id));
    assert!(!state.store.alarm(id).unwrap().enabled);

    // The following tick must not ring again
    let events = process_tick(&state, &window(local(2024, 1, 8, 7, 0, 0), local(2024, 1, 8, 7, 0, 1)));
    assert!(events.is_empty());
}

#[test]
fn test_repeating_alarm_respects_weekdays() {
    let dir = TempDir::new().unwrap();
    let mut notifier = MockNotifier::new();
    notifier.expect_show().times(1).returning(|_| Ok(2));
    let state = create_state(&dir, notifier);

    let alarm = Alarm::new("", NaiveTime::from_hms_opt(8, 30, 0).unwrap(), RepeatDays::business_days());
    let id = alarm.id;
    state.store.upsert_alarm(alarm).unwrap();

    // Saturday 2024-01-13: skipped
    let events = process_tick(&state, &window(local(2024, 1, 13, 8, 29, 59), local(2024, 1, 13, 8, 30, 0)));
    assert!(events.is_empty());

    // Monday 2024-01-15: rings and stays enabled
    let events = process_tick(&state, &window(local(2024, 1, 15, 8, 29, 59), local(2024, 1, 15, 8, 30, 0)));
    assert_eq!(events.len(), 1);
    assert!(state.store.alarm(id).unwrap().enabled);
}

#[test]
fn test_missed_alarm_fires_after_suspend() {
    let dir = TempDir::new().unwrap();
    let mut notifier = MockNotifier::new();
    notifier.expect_show().times(1).returning(|_| Ok(3));
    let state = create_state(&dir, notifier);

    state
        .store
        .upsert_alarm(Alarm::new("Lunch", NaiveTime::from_hms_opt(12, 0, 0).unwrap(), RepeatDays::every_day()))
        .unwrap();

    let mut ticker = Ticker::new(local(2024, 1, 8, 11, 0, 0));
    let window = ticker.advance(local(2024, 1, 8, 13, 0, 0));
    assert_eq!(process_tick(&state, &window).len(), 1);
}

#[test]
fn test_reminder_is_shown_once_and_refreshed_per_minute() {
    let dir = TempDir::new().unwrap();
    let mut notifier = MockNotifier::new();
    notifier
        .expect_show()
        .withf(|request| request.replaces_id.is_none() && request.sound.is_some())
        .times(1)
        .returning(|_| Ok(42));
    notifier
        .expect_show()
        .withf(|request| request.replaces_id == Some(42) && request.sound.is_none())
        .times(1)
        .returning(|_| Ok(42));
    notifier.expect_is_open().with(eq(42)).returning(|_| true);
    let state = create_state(&dir, notifier);

    let now = Local::now();
    let remind_at = now.with_timezone(&Utc) - Duration::seconds(30);
    state
        .store
        .replace_reminders(vec![reminder("a", remind_at, remind_at + Duration::minutes(15))])
        .unwrap();

    let events = process_tick(&state, &window(now - Duration::seconds(1), now));
    assert!(matches!(events.as_slice(), [MonitorEvent::ReminderNotified { id, .. }] if id == "a"));
    assert_eq!(state.store.reminders()[0].notification_id, Some(42));

    // Same minute: nothing to update
    let later = now + Duration::seconds(1);
    assert!(process_tick(&state, &window(now, later)).is_empty());

    // The next minute mark after the reminder time refreshes the countdown
    let mark = (remind_at + Duration::minutes(1)).with_timezone(&Local);
    let events = process_tick(&state, &window(mark - Duration::seconds(1), mark));
    assert_eq!(events.len(), 1);
}

#[test]
fn test_dismissed_reminder_stays_closed() {
    let dir = TempDir::new().unwrap();
    let mut notifier = MockNotifier::new();
    notifier.expect_is_open().with(eq(9)).returning(|_| false);
    notifier.expect_show().never();
    let state = create_state(&dir, notifier);

    let now = Local::now();
    let remind_at = now.with_timezone(&Utc) - Duration::seconds(61);
    let mut dismissed = reminder("b", remind_at, remind_at + Duration::minutes(10));
    dismissed.notification_id = Some(9);
    state.store.replace_reminders(vec![dismissed]).unwrap();
    state.store.set_reminder_notification("b", Some(9));

    let mark = (remind_at + Duration::minutes(1)).with_timezone(&Local);
    assert!(process_tick(&state, &window(mark - Duration::seconds(1), mark)).is_empty());

    // A resync downloads the same meeting again, still closed
    state
        .store
        .replace_reminders(vec![reminder("b", remind_at, remind_at + Duration::minutes(10))])
        .unwrap();
    assert_eq!(state.store.reminders()[0].notification_id, Some(9));
    assert!(process_tick(&state, &window(mark - Duration::seconds(1), mark)).is_empty());
}

#[test]
fn test_forced_lead_time_overrides_outlook() {
    let dir = TempDir::new().unwrap();
    let mut notifier = MockNotifier::new();
    notifier.expect_show().times(1).returning(|_| Ok(5));
    let state = create_state(&dir, notifier);

    state
        .store
        .update_settings(Settings {
            forced_outlook_reminder_minutes: 5,
            ..Settings::default()
        })
        .unwrap();

    let now = Local::now();
    let now_utc = now.with_timezone(&Utc);
    // Outlook would remind a minute before start, the override 5 minutes before
    let start = now_utc + Duration::minutes(5);
    state
        .store
        .replace_reminders(vec![reminder("c", start - Duration::minutes(1), start)])
        .unwrap();

    let events = process_tick(&state, &window(now - Duration::seconds(1), now));
    assert_eq!(events.len(), 1);
}
