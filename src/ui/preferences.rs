// src/ui/preferences.rs

use iced::widget::{checkbox, column, container, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::messages::Message;
use crate::ui::section_header;
use crate::ui::styles::{input, panel, Panel, ZEN_SUBTEXT, ZEN_TEXT};
use crate::ui_state::UiState;
use crate::utils::parse_reminder_override;

pub fn view(state: &UiState) -> Element<'_, Message> {
    let override_valid = parse_reminder_override(&state.reminder_override).is_some();
    let interval_valid = state.sync_interval.trim().parse::<u32>().is_ok();

    let override_field = text_input("Default", &state.reminder_override)
        .on_input(Message::ReminderOverrideChanged)
        .on_submit(Message::ReminderOverrideSubmitted)
        .width(100)
        .padding(6)
        .style(input(!override_valid));

    let interval_field = text_input("15", &state.sync_interval)
        .on_input(Message::SyncIntervalChanged)
        .on_submit(Message::SyncIntervalSubmitted)
        .width(100)
        .padding(6)
        .style(input(!interval_valid));

    container(
        column![
            section_header("Preferences"),
            checkbox("Start automatically on boot", state.autostart)
                .on_toggle(Message::AutostartToggled),
            labelled("Override Outlook reminder:", override_field, "minutes"),
            text("Default keeps the reminder time set in Outlook.")
                .size(12)
                .style(ZEN_SUBTEXT),
            labelled("Refresh reminders every:", interval_field, "minutes"),
            text("0 turns the background refresh off.")
                .size(12)
                .style(ZEN_SUBTEXT),
        ]
        .spacing(12),
    )
    .padding(24)
    .max_width(520)
    .width(Length::Fill)
    .style(panel(Panel::Card))
    .into()
}

fn labelled<'a>(
    label: &'a str,
    field: impl Into<Element<'a, Message>>,
    suffix: &'a str,
) -> Element<'a, Message> {
    row![
        text(label).size(14).style(ZEN_TEXT).width(240),
        field.into(),
        text(suffix).size(14).style(ZEN_SUBTEXT),
    ]
    .spacing(8)
    .align_items(Alignment::Center)
    .into()
}
