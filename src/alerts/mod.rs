use chrono::{DateTime, Datelike, Duration as ChronoDuration, Local, NaiveDateTime, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration, Instant};

use crate::models::{Alarm, NotificationRequest, OutlookReminder};
use crate::{outlook, AppState};

pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub enum MonitorEvent {
    AlarmFired(Alarm),
    ReminderNotified { id: String, subject: String },
    RemindersRefreshed(usize),
    Error(String),
}

/// The stretch of wall-clock time covered by one tick, exclusive at the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickWindow {
    pub from: DateTime<Local>,
    pub to: DateTime<Local>,
}

impl TickWindow {
    pub fn naive(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.from.naive_local(), self.to.naive_local())
    }

    pub fn utc(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.from.with_timezone(&Utc), self.to.with_timezone(&Utc))
    }
}

/// Remembers the previous tick so every instant is checked exactly once.
#[derive(Debug)]
pub struct Ticker {
    last_tick: DateTime<Local>,
}

impl Ticker {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { last_tick: now }
    }

    pub fn last_tick(&self) -> DateTime<Local> {
        self.last_tick
    }

    /// Window since the last tick. After a suspend it covers at most a day,
    /// and a clock set backwards yields an empty window.
    pub fn advance(&mut self, now: DateTime<Local>) -> TickWindow {
        let earliest = now - ChronoDuration::hours(24);
        let from = self.last_tick.clamp(earliest, now);
        self.last_tick = now;
        TickWindow { from, to: now }
    }
}

/// Whether the alarm's time of day occurs in `(from, to]` on a day it repeats.
pub fn is_alarm_due(alarm: &Alarm, from: NaiveDateTime, to: NaiveDateTime) -> bool {
    if !alarm.enabled || from >= to {
        return false;
    }

    let mut day = from.date();
    while day <= to.date() {
        let at = day.and_time(alarm.time);
        if at > from && at <= to && alarm.repeat.fires_on(day.weekday()) {
            return true;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    false
}

/// Whether a reminder notification should be shown or refreshed this tick.
pub fn is_reminder_due(
    reminder: &OutlookReminder,
    forced_lead: Option<ChronoDuration>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> bool {
    let remind_at = reminder.effective_reminder_time(forced_lead);
    if remind_at > to {
        return false;
    }
    // Final "Now" update as the meeting starts
    if reminder.start > from && reminder.start <= to {
        return true;
    }
    if reminder.start <= to {
        return false;
    }
    if reminder.notification_id.is_some() {
        // Refresh the countdown once a minute, aligned to the reminder time
        let minutes = (to - remind_at).num_minutes();
        let mark = remind_at + ChronoDuration::minutes(minutes);
        return mark > from;
    }
    true
}

/// Runs one tick: fires due alarms and shows or refreshes reminder notifications.
pub fn process_tick(state: &AppState, window: &TickWindow) -> Vec<MonitorEvent> {
    let mut events = Vec::new();

    let (from, to) = window.naive();
    for alarm in state.store.alarms() {
        if !is_alarm_due(&alarm, from, to) {
            continue;
        }

        info!("Alarm '{}' is going off", alarm.display_name());
        if let Err(e) = state.notifier.show(&NotificationRequest::for_alarm(&alarm)) {
            error!("Failed to show alarm notification: {}", e);
            events.push(MonitorEvent::Error(e.to_string()));
        }

        if alarm.is_once() {
            if let Err(e) = state.store.disable_alarm(alarm.id) {
                error!("Failed to disable once alarm: {}", e);
                events.push(MonitorEvent::Error(e.to_string()));
            }
        }
        events.push(MonitorEvent::AlarmFired(alarm));
    }

    let (from, to) = window.utc();
    let forced_lead = state.store.settings().reminder_override();
    for reminder in state.store.reminders() {
        if !is_reminder_due(&reminder, forced_lead, from, to) {
            continue;
        }

        if let Some(id) = reminder.notification_id {
            if !state.notifier.is_open(id) {
                debug!("Reminder '{}' was dismissed", reminder.subject);
                continue;
            }
        }

        match state.notifier.show(&NotificationRequest::for_reminder(&reminder, to)) {
            Ok(id) => {
                state.store.set_reminder_notification(&reminder.id, Some(id));
                events.push(MonitorEvent::ReminderNotified {
                    id: reminder.id.clone(),
                    subject: reminder.subject.clone(),
                });
            }
            Err(e) => {
                error!("Failed to show reminder notification: {}", e);
                events.push(MonitorEvent::Error(e.to_string()));
            }
        }
    }

    events
}

pub async fn monitor_alarms(state: Arc<AppState>, sender: Option<Sender<MonitorEvent>>) {
    info!("Starting alarm monitor loop");

    let mut ticker = Ticker::new(Local::now());
    let mut last_refresh: Option<Instant> = None;
    let mut refresh_task: Option<JoinHandle<()>> = None;

    loop {
        if state.shutdown.is_cancelled() {
            info!("Shutdown signal received, stopping monitor loop");
            break;
        }

        let window = ticker.advance(Local::now());
        for event in process_tick(&state, &window) {
            if let Some(tx) = &sender {
                let _ = tx.send(event).await;
            }
        }

        let refresh_running = refresh_task.as_ref().is_some_and(|h| !h.is_finished());
        if !refresh_running && refresh_is_due(&state, last_refresh) {
            last_refresh = Some(Instant::now());
            refresh_task = Some(spawn_refresh(Arc::clone(&state), sender.clone()));
        }

        tokio::select! {
            _ = sleep(TICK_INTERVAL) => {}
            _ = state.shutdown.cancelled() => {
                info!("Shutdown signal received during sleep, stopping monitor loop");
                break;
            }
        }
    }

    if let Some(handle) = refresh_task {
        handle.abort();
    }
    info!("Alarm monitor loop stopped gracefully");
}

fn refresh_is_due(state: &AppState, last_refresh: Option<Instant>) -> bool {
    let Some(interval) = state.store.settings().sync_interval() else {
        return false;
    };
    if state.store.outlook_token().is_none() {
        return false;
    }
    last_refresh.map_or(true, |at| at.elapsed() >= interval)
}

fn spawn_refresh(state: Arc<AppState>, sender: Option<Sender<MonitorEvent>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let event = match outlook::refresh(&state.store, state.outlook.as_ref()).await {
            Ok(result) => MonitorEvent::RemindersRefreshed(result.imported),
            Err(e) => {
                warn!("Background reminder refresh failed: {}", e);
                MonitorEvent::Error(e.to_safe_string())
            }
        };
        if let Some(tx) = sender {
            let _ = tx.send(event).await;
        }
    })
}
