use super::{FieldProps, Widget, WidgetKind};
use crate::impl_field_like;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: Option<String>,
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
            disabled: false,
        }
    }

    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(value).label(label)
    }

    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.label = Some(value.into());
        self
    }

    pub fn disabled(mut self, value: bool) -> Self {
        self.disabled = value;
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        SelectOption::new(value)
    }
}

impl From<(&str, &str)> for SelectOption {
    fn from((value, label): (&str, &str)) -> Self {
        SelectOption::labeled(value, label)
    }
}

fn collect_options<I, O>(options: I) -> Vec<SelectOption>
where
    I: IntoIterator<Item = O>,
    O: Into<SelectOption>,
{
    options.into_iter().map(Into::into).collect()
}

/// An empty string means "nothing selected".
fn pick_single(options: &[SelectOption], value: String) -> Option<String> {
    if value.is_empty()
        || options
            .iter()
            .any(|option| !option.disabled && option.value == value)
    {
        Some(value)
    } else {
        None
    }
}

fn pick_many(options: &[SelectOption], values: Vec<String>) -> Vec<String> {
    let mut picked: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let known = options
            .iter()
            .any(|option| !option.disabled && option.value == value);
        if known && !picked.contains(&value) {
            picked.push(value);
        }
    }
    picked
}

macro_rules! toggle_widget {
    ($name:ident => $kind:ident) => {
        #[derive(Clone, Debug, Default)]
        pub struct $name {
            props: FieldProps,
            value: Option<String>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Value attribute carried by the underlying input; the bound
            /// field itself only stores the checked state.
            pub fn value(mut self, value: impl Into<String>) -> Self {
                self.value = Some(value.into());
                self
            }

            pub fn input_value(&self) -> Option<&str> {
                self.value.as_deref()
            }
        }

        impl Widget for $name {
            type Value = bool;

            fn kind(&self) -> WidgetKind {
                WidgetKind::$kind
            }

            fn props(&self) -> &FieldProps {
                &self.props
            }
        }
    };
}

toggle_widget!(Checkbox => Checkbox);
toggle_widget!(Switch => Switch);
toggle_widget!(Chip => Chip);

macro_rules! single_choice_widget {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default)]
        pub struct $name {
            props: FieldProps,
            data: Vec<SelectOption>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn data<I, O>(mut self, options: I) -> Self
            where
                I: IntoIterator<Item = O>,
                O: Into<SelectOption>,
            {
                self.data = collect_options(options);
                self
            }

            pub fn option(mut self, option: impl Into<SelectOption>) -> Self {
                self.data.push(option.into());
                self
            }

            pub fn options(&self) -> &[SelectOption] {
                &self.data
            }
        }

        impl Widget for $name {
            type Value = String;

            fn kind(&self) -> WidgetKind {
                WidgetKind::$kind
            }

            fn props(&self) -> &FieldProps {
                &self.props
            }

            fn normalize(&self, value: String) -> Option<String> {
                pick_single(&self.data, value)
            }
        }
    };
}

single_choice_widget!(
    /// Single-selection chip group.
    ChipGroup => ChipGroup
);
single_choice_widget!(RadioGroup => RadioGroup);
single_choice_widget!(SegmentedControl => SegmentedControl);
single_choice_widget!(Select => Select);
single_choice_widget!(NativeSelect => NativeSelect);

impl ChipGroup {
    /// Switches to multiple selection, keeping the configured chips.
    pub fn multiple(self) -> MultiChipGroup {
        MultiChipGroup {
            props: self.props,
            data: self.data,
        }
    }
}

macro_rules! multi_choice_widget {
    ($name:ident => $kind:ident) => {
        #[derive(Clone, Debug, Default)]
        pub struct $name {
            props: FieldProps,
            data: Vec<SelectOption>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn data<I, O>(mut self, options: I) -> Self
            where
                I: IntoIterator<Item = O>,
                O: Into<SelectOption>,
            {
                self.data = collect_options(options);
                self
            }

            pub fn option(mut self, option: impl Into<SelectOption>) -> Self {
                self.data.push(option.into());
                self
            }

            pub fn options(&self) -> &[SelectOption] {
                &self.data
            }
        }

        impl Widget for $name {
            type Value = Vec<String>;

            fn kind(&self) -> WidgetKind {
                WidgetKind::$kind
            }

            fn props(&self) -> &FieldProps {
                &self.props
            }

            fn normalize(&self, values: Vec<String>) -> Option<Vec<String>> {
                Some(pick_many(&self.data, values))
            }
        }
    };
}

multi_choice_widget!(MultiChipGroup => ChipGroup);
multi_choice_widget!(MultiSelect => MultiSelect);

impl_field_like!(
    Checkbox,
    Switch,
    Chip,
    ChipGroup,
    MultiChipGroup,
    RadioGroup,
    SegmentedControl,
    Select,
    NativeSelect,
    MultiSelect,
);
