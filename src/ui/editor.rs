// src/ui/editor.rs

use iced::widget::{button, column, container, horizontal_space, radio, row, text, text_input, tooltip};
use iced::{Alignment, Element, Length};

use crate::messages::Message;
use crate::models::{weekday_from_index, RepeatPreset, DAY_ABBREVIATIONS};
use crate::ui::styles::{button_style, input, panel, ButtonStyle, Panel, ZEN_CRITICAL, ZEN_SUBTEXT, ZEN_TEXT};
use crate::ui::section_header;
use crate::ui_state::EditorState;

pub fn view(editor: &EditorState) -> Element<'_, Message> {
    let time_field = text_input("HH:MM:SS", &editor.time)
        .on_input(Message::EditorTimeChanged)
        .on_submit(Message::SaveEditor)
        .size(24)
        .padding(10)
        .style(input(editor.error.is_some()));

    let presets = column(
        RepeatPreset::ALL
            .iter()
            .map(|preset| {
                tooltip(
                    radio(
                        preset.label(),
                        *preset,
                        Some(editor.preset),
                        Message::EditorPresetSelected,
                    )
                    .size(16),
                    text(preset.tooltip()).size(12),
                    tooltip::Position::Right,
                )
                .into()
            })
            .collect::<Vec<Element<Message>>>(),
    )
    .spacing(6);

    let days = row((0..7u8)
        .filter_map(|i| weekday_from_index(i).map(|day| (i, day)))
        .map(|(i, day)| {
            button(text(DAY_ABBREVIATIONS[i as usize]).size(12))
                .width(44)
                .padding([6, 0])
                .style(button_style(ButtonStyle::Day {
                    selected: editor.repeat.contains(day),
                }))
                .on_press_maybe(editor.days_editable().then_some(Message::EditorDayToggled(day)))
                .into()
        })
        .collect::<Vec<Element<Message>>>())
    .spacing(4);

    let name_field = text_input("Morning Alarm", &editor.name)
        .on_input(Message::EditorNameChanged)
        .on_submit(Message::SaveEditor)
        .padding(8)
        .style(input(false));

    let error = editor
        .error
        .as_deref()
        .map(|e| text(e).size(13).style(ZEN_CRITICAL));

    let actions = row![
        horizontal_space(),
        button(editor.save_label())
            .padding([8, 16])
            .style(button_style(ButtonStyle::Primary))
            .on_press(Message::SaveEditor),
        button("Cancel")
            .padding([8, 16])
            .style(button_style(ButtonStyle::Flat))
            .on_press(Message::ShowAlarms),
    ]
    .spacing(8);

    let mut form = column![
        section_header(editor.title()),
        time_field,
        presets,
        days,
        text("Name:").size(14).style(ZEN_TEXT),
        name_field,
    ]
    .spacing(12);

    if let Some(error) = error {
        form = form.push(error);
    }

    container(
        column![
            form,
            text("Press Enter in the time or name field to save.")
                .size(12)
                .style(ZEN_SUBTEXT),
            actions
        ]
        .spacing(16)
        .align_items(Alignment::Start),
    )
    .padding(24)
    .max_width(420)
    .width(Length::Fill)
    .style(panel(Panel::Card))
    .into()
}
