// src/ui/mod.rs

use iced::widget::{button, checkbox, column, container, horizontal_space, progress_bar, row, scrollable, text};
use iced::{font, Alignment, Element, Font, Length};

use crate::messages::Message;
use crate::models::Alarm;
use crate::ui_state::{Notice, SyncState, View};
use crate::utils::reminder_count_label;

pub mod editor;
pub mod preferences;
pub mod styles;

use styles::{button_style, panel, ButtonStyle, Panel, ZEN_ACCENT, ZEN_SUBTEXT, ZEN_TEXT};

pub const BOLD: Font = Font {
    weight: font::Weight::Bold,
    ..Font::DEFAULT
};

pub const ITALIC: Font = Font {
    style: font::Style::Italic,
    ..Font::DEFAULT
};

pub fn section_header(label: &str) -> Element<'_, Message> {
    text(label).size(20).style(ZEN_ACCENT).into()
}

/// "Add new alarm…", "Preferences" and the Outlook actions.
pub fn toolbar<'a>(current: View, reminder_count: usize, syncing: bool) -> Element<'a, Message> {
    let entry = |label: &'a str, view: View, msg: Message| {
        button(text(label).size(14))
            .padding([8, 12])
            .style(button_style(ButtonStyle::Toolbar {
                active: view == current,
            }))
            .on_press(msg)
    };

    let synchronize = button(text("Synchronize...").size(14))
        .padding([8, 12])
        .style(button_style(ButtonStyle::Toolbar { active: false }))
        .on_press_maybe((!syncing).then_some(Message::Synchronize));

    container(
        row![
            entry("Add new alarm\u{2026}", View::Editor, Message::AddAlarm),
            entry("Preferences", View::Preferences, Message::ShowPreferences),
            horizontal_space(),
            text("Outlook").size(14).style(ZEN_TEXT),
            synchronize,
            text(reminder_count_label(reminder_count)).size(12).style(ZEN_SUBTEXT),
        ]
        .spacing(8)
        .align_items(Alignment::Center),
    )
    .width(Length::Fill)
    .padding([8, 16])
    .style(panel(Panel::Toolbar))
    .into()
}

pub fn alarm_card(alarm: &Alarm) -> Element<'_, Message> {
    let id = alarm.id;

    let title = if alarm.is_unnamed() {
        text(alarm.display_name()).size(16).font(ITALIC).style(ZEN_SUBTEXT)
    } else {
        text(alarm.display_name()).size(16).font(BOLD).style(ZEN_TEXT)
    };

    let schedule = row![
        text(alarm.time_text()).size(13).style(ZEN_TEXT),
        text(alarm.repeat.summary()).size(13).style(ZEN_SUBTEXT),
    ]
    .spacing(6);

    container(
        row![
            checkbox("", alarm.enabled).on_toggle(move |enabled| Message::ToggleAlarm(id, enabled)),
            column![title, schedule].spacing(4),
            horizontal_space(),
            button(text("Edit").size(13))
                .padding([6, 10])
                .style(button_style(ButtonStyle::Flat))
                .on_press(Message::EditAlarm(id)),
            button(text("Delete").size(13))
                .padding([6, 10])
                .style(button_style(ButtonStyle::Destructive))
                .on_press(Message::DeleteAlarm(id)),
        ]
        .spacing(12)
        .align_items(Alignment::Center),
    )
    .padding([8, 16])
    .width(Length::Fill)
    .style(panel(Panel::Card))
    .into()
}

pub fn empty_state<'a>() -> Element<'a, Message> {
    container(
        column![
            text("You don't have any alarms yet.").size(18).style(ZEN_TEXT),
            text("Click on \"Add new alarm...\" to add a new one.")
                .size(14)
                .style(ZEN_SUBTEXT),
            button("Add new alarm...")
                .padding([8, 16])
                .width(140)
                .style(button_style(ButtonStyle::Primary))
                .on_press(Message::AddAlarm),
        ]
        .spacing(12)
        .align_items(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x()
    .center_y()
    .into()
}

/// Alarm entries sorted by time, or the empty state.
pub fn alarm_list(alarms: &[Alarm]) -> Element<'_, Message> {
    if alarms.is_empty() {
        return empty_state();
    }

    let cards: Vec<Element<Message>> = alarms.iter().map(alarm_card).collect();
    scrollable(column(cards).spacing(8).padding(16))
        .height(Length::Fill)
        .into()
}

pub fn notice_banner(notice: &Notice) -> Element<'_, Message> {
    container(
        row![
            column![
                text(&notice.title).size(15).font(BOLD),
                text(&notice.body).size(13),
            ]
            .spacing(4),
            horizontal_space(),
            button(text("OK").size(13))
                .padding([6, 12])
                .style(button_style(ButtonStyle::Flat))
                .on_press(Message::DismissNotice),
        ]
        .align_items(Alignment::Center),
    )
    .padding(12)
    .width(Length::Fill)
    .style(panel(Panel::Notice {
        critical: notice.critical,
    }))
    .into()
}

pub fn sync_panel(state: &SyncState) -> Element<'_, Message> {
    // No percentage while downloading, so the bar stays full as a busy indicator
    let value = state.value.map_or(100.0, f32::from);

    container(
        column![
            text(&state.label).size(14).style(ZEN_TEXT),
            progress_bar(0.0..=100.0, value).height(8),
        ]
        .spacing(8),
    )
    .padding(12)
    .width(Length::Fill)
    .style(panel(Panel::Card))
    .into()
}
