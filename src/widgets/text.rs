use super::{BlurEffect, FieldProps, Widget, WidgetKind};
use crate::impl_field_like;

macro_rules! plain_text_widget {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default)]
        pub struct $name {
            props: FieldProps,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
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
        }
    };
}

plain_text_widget!(TextInput => TextInput);
plain_text_widget!(PasswordInput => PasswordInput);
plain_text_widget!(
    /// Free-text colour field; any CSS colour string is kept as typed.
    ColorInput => ColorInput
);
plain_text_widget!(ColorPicker => ColorPicker);

#[derive(Clone, Debug)]
pub struct Textarea {
    props: FieldProps,
    autosize: bool,
    min_rows: u32,
}

impl Default for Textarea {
    fn default() -> Self {
        Self {
            props: FieldProps::default(),
            autosize: false,
            min_rows: 1,
        }
    }
}

impl Textarea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn autosize(mut self, autosize: bool) -> Self {
        self.autosize = autosize;
        self
    }

    pub fn min_rows(mut self, rows: u32) -> Self {
        self.min_rows = rows.max(1);
        self
    }

    pub fn rows_for(&self, value: &str) -> u32 {
        if !self.autosize {
            return self.min_rows;
        }
        let lines = u32::try_from(value.lines().count()).unwrap_or(u32::MAX);
        lines.max(self.min_rows)
    }
}

impl Widget for Textarea {
    type Value = String;

    fn kind(&self) -> WidgetKind {
        WidgetKind::Textarea
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }
}

/// Text input with a suggestion list. Values outside the list are allowed.
#[derive(Clone, Debug, Default)]
pub struct Autocomplete {
    props: FieldProps,
    data: Vec<String>,
}

impl Autocomplete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data<I, S>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data = data.into_iter().map(Into::into).collect();
        self
    }

    pub fn options(&self) -> &[String] {
        &self.data
    }

    /// Case-insensitive substring match over the suggestion list.
    pub fn suggestions(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        self.data
            .iter()
            .filter(|option| query.is_empty() || option.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }
}

impl Widget for Autocomplete {
    type Value = String;

    fn kind(&self) -> WidgetKind {
        WidgetKind::Autocomplete
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PinKind {
    #[default]
    Alphanumeric,
    Number,
}

#[derive(Clone, Debug)]
pub struct PinInput {
    props: FieldProps,
    length: usize,
    kind: PinKind,
}

impl Default for PinInput {
    fn default() -> Self {
        Self {
            props: FieldProps::default(),
            length: 4,
            kind: PinKind::Alphanumeric,
        }
    }
}

impl PinInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = length.max(1);
        self
    }

    pub fn pin_kind(mut self, kind: PinKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn cell_count(&self) -> usize {
        self.length
    }

    fn accepts_char(&self, ch: char) -> bool {
        match self.kind {
            PinKind::Alphanumeric => ch.is_ascii_alphanumeric(),
            PinKind::Number => ch.is_ascii_digit(),
        }
    }
}

impl Widget for PinInput {
    type Value = String;

    fn kind(&self) -> WidgetKind {
        WidgetKind::PinInput
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }

    fn normalize(&self, value: String) -> Option<String> {
        Some(
            value
                .chars()
                .filter(|ch| self.accepts_char(*ch))
                .take(self.length)
                .collect(),
        )
    }
}

/// Textarea for JSON documents. Reformats valid JSON on blur and flags text
/// that does not parse; neither affects what the form schema accepts.
#[derive(Clone, Debug)]
pub struct JsonInput {
    props: FieldProps,
    validation_error: Option<String>,
    format_on_blur: bool,
    autosize: bool,
    min_rows: u32,
}

impl Default for JsonInput {
    fn default() -> Self {
        Self {
            props: FieldProps::default(),
            validation_error: None,
            format_on_blur: false,
            autosize: false,
            min_rows: 1,
        }
    }
}

impl JsonInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validation_error(mut self, message: impl Into<String>) -> Self {
        self.validation_error = Some(message.into());
        self
    }

    pub fn format_on_blur(mut self, format: bool) -> Self {
        self.format_on_blur = format;
        self
    }

    pub fn autosize(mut self, autosize: bool) -> Self {
        self.autosize = autosize;
        self
    }

    pub fn min_rows(mut self, rows: u32) -> Self {
        self.min_rows = rows.max(1);
        self
    }

    pub fn min_row_count(&self) -> u32 {
        self.min_rows
    }
}

impl Widget for JsonInput {
    type Value = String;

    fn kind(&self) -> WidgetKind {
        WidgetKind::JsonInput
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }

    fn on_blur(&self, value: &String) -> BlurEffect<String> {
        if value.trim().is_empty() {
            return BlurEffect::Keep;
        }
        match serde_json::from_str::<serde_json::Value>(value) {
            Ok(document) if self.format_on_blur => match serde_json::to_string_pretty(&document) {
                Ok(formatted) if &formatted != value => BlurEffect::Replace(formatted),
                _ => BlurEffect::Keep,
            },
            Ok(_) => BlurEffect::Keep,
            Err(_) => match &self.validation_error {
                Some(message) => BlurEffect::Invalid(message.clone()),
                None => BlurEffect::Keep,
            },
        }
    }
}

impl_field_like!(
    TextInput,
    PasswordInput,
    ColorInput,
    ColorPicker,
    Textarea,
    Autocomplete,
    PinInput,
    JsonInput,
);
