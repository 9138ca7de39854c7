//! Declarative widget configurations.
//!
//! A widget here is the set of props a UI toolkit needs to draw an input plus
//! the rules for which values that input can emit. Drawing is left to the
//! toolkit; [`crate::form::FieldBinder`] connects a widget to a form field.

mod choice;
mod file;
mod numeric;
mod text;

use std::fmt::{Display, Formatter};

use crate::form::FieldType;

pub use choice::{
    Checkbox, Chip, ChipGroup, MultiChipGroup, MultiSelect, NativeSelect, RadioGroup,
    SegmentedControl, Select, SelectOption, Switch,
};
pub use file::FileInput;
pub use numeric::{NumberInput, Rating, Slider, SliderMark};
pub use text::{
    Autocomplete, ColorInput, ColorPicker, JsonInput, PasswordInput, PinInput, PinKind,
    TextInput, Textarea,
};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldProps {
    pub label: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub with_asterisk: bool,
    pub disabled: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WidgetKind {
    Autocomplete,
    Checkbox,
    Chip,
    ChipGroup,
    ColorInput,
    ColorPicker,
    FileInput,
    JsonInput,
    MultiSelect,
    NativeSelect,
    NumberInput,
    PasswordInput,
    PinInput,
    RadioGroup,
    Rating,
    SegmentedControl,
    Select,
    Slider,
    Switch,
    Textarea,
    TextInput,
}

impl Display for WidgetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WidgetKind::Autocomplete => "Autocomplete",
            WidgetKind::Checkbox => "Checkbox",
            WidgetKind::Chip => "Chip",
            WidgetKind::ChipGroup => "Chip.Group",
            WidgetKind::ColorInput => "ColorInput",
            WidgetKind::ColorPicker => "ColorPicker",
            WidgetKind::FileInput => "FileInput",
            WidgetKind::JsonInput => "JsonInput",
            WidgetKind::MultiSelect => "MultiSelect",
            WidgetKind::NativeSelect => "NativeSelect",
            WidgetKind::NumberInput => "NumberInput",
            WidgetKind::PasswordInput => "PasswordInput",
            WidgetKind::PinInput => "PinInput",
            WidgetKind::RadioGroup => "Radio.Group",
            WidgetKind::Rating => "Rating",
            WidgetKind::SegmentedControl => "SegmentedControl",
            WidgetKind::Select => "Select",
            WidgetKind::Slider => "Slider",
            WidgetKind::Switch => "Switch",
            WidgetKind::Textarea => "Textarea",
            WidgetKind::TextInput => "TextInput",
        };
        f.write_str(name)
    }
}

/// What a widget does with its value when it loses focus.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BlurEffect<V> {
    Keep,
    Replace(V),
    Invalid(String),
}

pub trait Widget: Clone + Send + Sync + 'static {
    type Value: FieldType;

    fn kind(&self) -> WidgetKind;
    fn props(&self) -> &FieldProps;

    /// Maps an emitted value onto what the widget can hold, or `None` when
    /// the widget could never emit it.
    fn normalize(&self, value: Self::Value) -> Option<Self::Value> {
        Some(value)
    }

    fn on_blur(&self, _value: &Self::Value) -> BlurEffect<Self::Value> {
        BlurEffect::Keep
    }
}

/// Any widget, as stored in a page layout.
#[derive(Clone, Debug)]
pub enum WidgetSpec {
    Autocomplete(Autocomplete),
    Checkbox(Checkbox),
    Chip(Chip),
    ChipGroup(ChipGroup),
    MultiChipGroup(MultiChipGroup),
    ColorInput(ColorInput),
    ColorPicker(ColorPicker),
    FileInput(FileInput),
    JsonInput(JsonInput),
    MultiSelect(MultiSelect),
    NativeSelect(NativeSelect),
    NumberInput(NumberInput),
    PasswordInput(PasswordInput),
    PinInput(PinInput),
    RadioGroup(RadioGroup),
    Rating(Rating),
    SegmentedControl(SegmentedControl),
    Select(Select),
    Slider(Slider),
    Switch(Switch),
    Textarea(Textarea),
    TextInput(TextInput),
}

macro_rules! widget_spec_dispatch {
    ($self:ident, $widget:ident => $body:expr) => {
        match $self {
            WidgetSpec::Autocomplete($widget) => $body,
            WidgetSpec::Checkbox($widget) => $body,
            WidgetSpec::Chip($widget) => $body,
            WidgetSpec::ChipGroup($widget) => $body,
            WidgetSpec::MultiChipGroup($widget) => $body,
            WidgetSpec::ColorInput($widget) => $body,
            WidgetSpec::ColorPicker($widget) => $body,
            WidgetSpec::FileInput($widget) => $body,
            WidgetSpec::JsonInput($widget) => $body,
            WidgetSpec::MultiSelect($widget) => $body,
            WidgetSpec::NativeSelect($widget) => $body,
            WidgetSpec::NumberInput($widget) => $body,
            WidgetSpec::PasswordInput($widget) => $body,
            WidgetSpec::PinInput($widget) => $body,
            WidgetSpec::RadioGroup($widget) => $body,
            WidgetSpec::Rating($widget) => $body,
            WidgetSpec::SegmentedControl($widget) => $body,
            WidgetSpec::Select($widget) => $body,
            WidgetSpec::Slider($widget) => $body,
            WidgetSpec::Switch($widget) => $body,
            WidgetSpec::Textarea($widget) => $body,
            WidgetSpec::TextInput($widget) => $body,
        }
    };
}

impl WidgetSpec {
    pub fn kind(&self) -> WidgetKind {
        widget_spec_dispatch!(self, widget => widget.kind())
    }

    pub fn props(&self) -> &FieldProps {
        widget_spec_dispatch!(self, widget => widget.props())
    }
}

macro_rules! impl_into_widget_spec {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for WidgetSpec {
                fn from(widget: $variant) -> Self {
                    WidgetSpec::$variant(widget)
                }
            }
        )+
    };
}

impl_into_widget_spec!(
    Autocomplete,
    Checkbox,
    Chip,
    ChipGroup,
    MultiChipGroup,
    ColorInput,
    ColorPicker,
    FileInput,
    JsonInput,
    MultiSelect,
    NativeSelect,
    NumberInput,
    PasswordInput,
    PinInput,
    RadioGroup,
    Rating,
    SegmentedControl,
    Select,
    Slider,
    Switch,
    Textarea,
    TextInput,
);
