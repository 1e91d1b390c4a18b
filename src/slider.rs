//! Distance slider used by the adoption search screen.
//!
//! The widget is stateless: [`Slider::render`] is a pure function of its props, and
//! interaction only reports the snapped value through `on_change`.

use serde::Serialize;

pub const THUMB_SIZE: u32 = 16;
pub const THUMB_BORDER_RADIUS: u32 = 16;
pub const THUMB_BORDER_COLOR: &str = "white";
pub const THUMB_BORDER_WIDTH: u32 = 3;
pub const ACCENT_COLOR: &str = "#2bda8e";
pub const TRACK_HEIGHT: u32 = 6;
pub const TRACK_BORDER_RADIUS: u32 = 6;
pub const MAXIMUM_TRACK_TINT: &str = "rgba(157, 163, 180, 0.10)";
pub const LABEL_FONT_SIZE: u32 = 14;
pub const STEP: f64 = 1.0;

/// Colors shared with the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub secondary: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self { secondary: ACCENT_COLOR.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderProps {
    pub minimum: f64,
    pub maximum: f64,
    pub value: f64,
    pub value_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbStyle {
    pub width: u32,
    pub height: u32,
    pub border_radius: u32,
    pub border_color: String,
    pub border_width: u32,
    pub background_color: String,
}

impl Default for ThumbStyle {
    fn default() -> Self {
        Self {
            width: THUMB_SIZE,
            height: THUMB_SIZE,
            border_radius: THUMB_BORDER_RADIUS,
            border_color: THUMB_BORDER_COLOR.to_string(),
            border_width: THUMB_BORDER_WIDTH,
            background_color: ACCENT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackStyle {
    pub height: u32,
    pub border_radius: u32,
}

impl Default for TrackStyle {
    fn default() -> Self {
        Self { height: TRACK_HEIGHT, border_radius: TRACK_BORDER_RADIUS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelStyle {
    pub color: String,
    pub font_size: u32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self { color: ACCENT_COLOR.to_string(), font_size: LABEL_FONT_SIZE }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperStyle {
    pub flex: u32,
    pub align_items: String,
}

impl Default for WrapperStyle {
    fn default() -> Self {
        Self { flex: 1, align_items: "stretch".into() }
    }
}

/// Everything the rendering layer needs to draw the control and its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderView {
    pub minimum_value: f64,
    pub maximum_value: f64,
    pub step: f64,
    pub value: f64,
    pub thumb_style: ThumbStyle,
    pub track_style: TrackStyle,
    pub minimum_track_tint_color: String,
    pub maximum_track_tint_color: String,
    pub wrapper_style: WrapperStyle,
    pub label: String,
    pub label_style: LabelStyle,
}

pub struct Slider {
    props: SliderProps,
    theme: Theme,
    on_change: Box<dyn FnMut(f64) + Send>,
}

impl std::fmt::Debug for Slider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider").field("props", &self.props).field("theme", &self.theme).finish()
    }
}

impl Slider {
    pub fn new(props: SliderProps, on_change: impl FnMut(f64) + Send + 'static) -> Self {
        Self { props, theme: Theme::default(), on_change: Box::new(on_change) }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn props(&self) -> &SliderProps {
        &self.props
    }

    #[must_use]
    pub fn render(&self) -> SliderView {
        SliderView {
            minimum_value: self.props.minimum,
            maximum_value: self.props.maximum,
            step: STEP,
            value: self.props.value,
            thumb_style: ThumbStyle::default(),
            track_style: TrackStyle::default(),
            minimum_track_tint_color: self.theme.secondary.clone(),
            maximum_track_tint_color: MAXIMUM_TRACK_TINT.to_string(),
            wrapper_style: WrapperStyle::default(),
            label: label(self.props.value, &self.props.value_text),
            label_style: LabelStyle::default(),
        }
    }

    /// Reports a drag to `raw`, snapped to a whole step counted from `minimum` and kept
    /// within `[minimum, maximum]`. Props are left alone; the owner decides whether to
    /// re-render with the new value.
    pub fn slide_to(&mut self, raw: f64) -> f64 {
        let snapped = snap(raw, self.props.minimum, self.props.maximum);
        log::trace!("slider moved to {raw}, reporting {snapped}");
        (self.on_change)(snapped);
        snapped
    }
}

fn snap(raw: f64, minimum: f64, maximum: f64) -> f64 {
    let stepped = minimum + ((raw - minimum) / STEP).round() * STEP;
    stepped.min(maximum).max(minimum)
}

/// `"{value} {text}"`, with integral values printed without a fraction.
#[must_use]
pub fn label(value: f64, text: &str) -> String {
    format!("{} {text}", format_value(value))
}

#[allow(clippy::cast_possible_truncation)]
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
