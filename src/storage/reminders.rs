// file: src/storage/reminders.rs
use std::collections::HashMap;

use crate::models::OutlookReminder;

/// Swaps in a freshly downloaded list. Notifications already on screen stay
/// attached to the reminder with the same id so updates keep replacing them.
pub fn replace(existing: &mut Vec<OutlookReminder>, new: Vec<OutlookReminder>) -> usize {
    let open: HashMap<String, u32> = existing
        .iter()
        .filter_map(|r| r.notification_id.map(|nid| (r.id.clone(), nid)))
        .collect();

    *existing = new
        .into_iter()
        .map(|mut r| {
            r.notification_id = open.get(&r.id).copied();
            r
        })
        .collect();
    existing.sort_by_key(|r| r.start);
    existing.len()
}

pub fn set_notification(reminders: &mut [OutlookReminder], id: &str, notification_id: Option<u32>) -> bool {
    match reminders.iter_mut().find(|r| r.id == id) {
        Some(reminder) => {
            reminder.notification_id = notification_id;
            true
        }
        None => false,
    }
}
