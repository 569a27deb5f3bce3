use iced::widget::{button, container, text_input};
use iced::{theme, Background, Border, Color, Shadow, Theme, Vector};

// Zen Theme Colors
pub const ZEN_BG: Color = Color::from_rgb(0.992, 0.988, 0.973); // #FDFCF8
pub const ZEN_SURFACE: Color = Color::from_rgb(0.949, 0.937, 0.914); // #F2EFE9
pub const ZEN_TEXT: Color = Color::from_rgb(0.29, 0.29, 0.29); // #4A4A4A
pub const ZEN_SUBTEXT: Color = Color::from_rgb(0.55, 0.55, 0.55); // #8C8C8C
pub const ZEN_ACCENT: Color = Color::from_rgb(0.545, 0.616, 0.467); // #8B9D77 (Sage)
pub const ZEN_ACCENT_HOVER: Color = Color::from_rgb(0.49, 0.56, 0.41);
pub const ZEN_DESTRUCTIVE: Color = Color::from_rgb(0.831, 0.647, 0.647); // #D4A5A5
pub const ZEN_CRITICAL: Color = Color::from_rgb(0.72, 0.36, 0.36);

fn rounded(radius: f32) -> Border {
    Border {
        radius: radius.into(),
        ..Default::default()
    }
}

fn outlined(color: Color) -> Border {
    Border {
        radius: 6.0.into(),
        width: 1.0,
        color,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    /// Toolbar entries, highlighted when their view is open
    Toolbar { active: bool },
    /// Icon-like edit/delete actions inside a card
    Flat,
    Destructive,
    /// Weekday toggle in the editor
    Day { selected: bool },
}

impl button::StyleSheet for ButtonStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        match self {
            ButtonStyle::Primary => button::Appearance {
                background: Some(Background::Color(ZEN_ACCENT)),
                text_color: Color::WHITE,
                border: rounded(6.0),
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.1),
                    offset: Vector::new(0.0, 2.0),
                    blur_radius: 4.0,
                },
                ..Default::default()
            },
            ButtonStyle::Toolbar { active: true } => button::Appearance {
                background: Some(Background::Color(Color::WHITE)),
                text_color: ZEN_ACCENT,
                border: rounded(6.0),
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.05),
                    offset: Vector::new(0.0, 1.0),
                    blur_radius: 2.0,
                },
                ..Default::default()
            },
            ButtonStyle::Toolbar { active: false } | ButtonStyle::Flat => button::Appearance {
                background: None,
                text_color: ZEN_SUBTEXT,
                ..Default::default()
            },
            ButtonStyle::Destructive => button::Appearance {
                background: None,
                text_color: ZEN_DESTRUCTIVE,
                border: outlined(ZEN_DESTRUCTIVE),
                ..Default::default()
            },
            ButtonStyle::Day { selected } => button::Appearance {
                background: Some(Background::Color(if *selected { ZEN_ACCENT } else { Color::WHITE })),
                text_color: if *selected { Color::WHITE } else { ZEN_TEXT },
                border: outlined(Color::from_rgba(0.0, 0.0, 0.0, 0.1)),
                ..Default::default()
            },
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        let base = self.active(style);
        match self {
            ButtonStyle::Primary => button::Appearance {
                background: Some(Background::Color(ZEN_ACCENT_HOVER)),
                ..base
            },
            ButtonStyle::Toolbar { active: false } | ButtonStyle::Flat => button::Appearance {
                background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.03))),
                text_color: ZEN_TEXT,
                border: rounded(6.0),
                ..base
            },
            ButtonStyle::Destructive => button::Appearance {
                background: Some(Background::Color(ZEN_DESTRUCTIVE)),
                text_color: Color::WHITE,
                ..base
            },
            _ => base,
        }
    }

    fn pressed(&self, style: &Self::Style) -> button::Appearance {
        self.active(style)
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        let base = self.active(style);
        match self {
            ButtonStyle::Primary => button::Appearance {
                background: Some(Background::Color(Color::from_rgb(0.8, 0.8, 0.8))),
                text_color: Color::from_rgb(0.5, 0.5, 0.5),
                shadow: Shadow::default(),
                ..base
            },
            // Faded like an unavailable control
            _ => button::Appearance {
                background: base.background.map(|bg| match bg {
                    Background::Color(c) => Background::Color(Color { a: 0.4, ..c }),
                    other => other,
                }),
                text_color: Color {
                    a: 0.4,
                    ..base.text_color
                },
                ..base
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Background,
    Toolbar,
    Card,
    Notice { critical: bool },
}

impl container::StyleSheet for Panel {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        match self {
            Panel::Background => container::Appearance {
                background: Some(Background::Color(ZEN_BG)),
                ..Default::default()
            },
            Panel::Toolbar => container::Appearance {
                background: Some(Background::Color(ZEN_SURFACE)),
                border: Border {
                    width: 1.0,
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.05),
                    ..Default::default()
                },
                ..Default::default()
            },
            Panel::Card => container::Appearance {
                background: Some(Background::Color(Color::WHITE)),
                border: Border {
                    radius: 8.0.into(),
                    width: 1.0,
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.03),
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.02),
                    offset: Vector::new(0.0, 2.0),
                    blur_radius: 4.0,
                },
                ..Default::default()
            },
            Panel::Notice { critical } => {
                let tint = if *critical { ZEN_CRITICAL } else { ZEN_ACCENT };
                container::Appearance {
                    background: Some(Background::Color(Color { a: 0.12, ..tint })),
                    border: outlined(tint),
                    text_color: Some(ZEN_TEXT),
                    ..Default::default()
                }
            }
        }
    }
}

/// Text field, outlined red while its content does not parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputStyle {
    pub invalid: bool,
}

impl text_input::StyleSheet for InputStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            background: Background::Color(Color::WHITE),
            border: outlined(if self.invalid {
                ZEN_CRITICAL
            } else {
                Color::from_rgba(0.0, 0.0, 0.0, 0.1)
            }),
            icon_color: ZEN_SUBTEXT,
        }
    }

    fn focused(&self, style: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            border: outlined(if self.invalid { ZEN_CRITICAL } else { ZEN_ACCENT }),
            icon_color: ZEN_ACCENT,
            ..self.active(style)
        }
    }

    fn placeholder_color(&self, _style: &Self::Style) -> Color {
        Color::from_rgba(0.0, 0.0, 0.0, 0.3)
    }

    fn value_color(&self, _style: &Self::Style) -> Color {
        ZEN_TEXT
    }

    fn disabled_color(&self, _style: &Self::Style) -> Color {
        Color::from_rgba(0.0, 0.0, 0.0, 0.3)
    }

    fn selection_color(&self, _style: &Self::Style) -> Color {
        Color { a: 0.2, ..ZEN_ACCENT }
    }

    fn disabled(&self, style: &Self::Style) -> text_input::Appearance {
        self.active(style)
    }
}

pub fn button_style(style: ButtonStyle) -> theme::Button {
    theme::Button::Custom(Box::new(style))
}

pub fn panel(panel: Panel) -> theme::Container {
    theme::Container::Custom(Box::new(panel))
}

pub fn input(invalid: bool) -> theme::TextInput {
    theme::TextInput::Custom(Box::new(InputStyle { invalid }))
}
