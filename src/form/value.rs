use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

use super::validation::FieldValidationError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// A picked file as reported by a file widget. The bytes stay with the widget.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FilePayload {
    pub name: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime: None,
        }
    }

    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal),
    Text(String),
    List(Vec<String>),
    File(FilePayload),
}

impl FieldValue {
    /// Shape name used in `Expected .., received ..` messages.
    pub fn shape(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
            FieldValue::List(_) => "array",
            FieldValue::File(_) => "file",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Text(value) => write!(f, "{value:?}"),
            FieldValue::List(values) => write!(f, "{values:?}"),
            FieldValue::File(file) => write!(f, "<file {} ({} bytes)>", file.name, file.size),
        }
    }
}

/// Rust types that can live in a [`FormState`] slot.
pub trait FieldType: Clone + PartialEq + Send + Sync + 'static {
    const EXPECTED: &'static str;

    fn into_value(self) -> FieldValue;
    fn from_value(value: &FieldValue) -> Option<Self>;

    fn decode(value: Option<&FieldValue>) -> Result<Self, FieldValidationError> {
        let Some(value) = value else {
            return Err(FieldValidationError::missing());
        };
        Self::from_value(value)
            .ok_or_else(|| FieldValidationError::invalid_type(Self::EXPECTED, value.shape()))
    }
}

impl FieldType for String {
    const EXPECTED: &'static str = "string";

    fn into_value(self) -> FieldValue {
        FieldValue::Text(self)
    }

    fn from_value(value: &FieldValue) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }
}

impl FieldType for bool {
    const EXPECTED: &'static str = "boolean";

    fn into_value(self) -> FieldValue {
        FieldValue::Bool(self)
    }

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl FieldType for Decimal {
    const EXPECTED: &'static str = "number";

    fn into_value(self) -> FieldValue {
        FieldValue::Number(self)
    }

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl FieldType for Vec<String> {
    const EXPECTED: &'static str = "array";

    fn into_value(self) -> FieldValue {
        FieldValue::List(self)
    }

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::List(values) => Some(values.clone()),
            _ => None,
        }
    }
}

impl FieldType for Option<FilePayload> {
    const EXPECTED: &'static str = "file";

    fn into_value(self) -> FieldValue {
        match self {
            Some(file) => FieldValue::File(file),
            None => FieldValue::Null,
        }
    }

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => Some(None),
            FieldValue::File(file) => Some(Some(file.clone())),
            _ => None,
        }
    }
}

impl FieldType for FieldValue {
    const EXPECTED: &'static str = "any";

    fn into_value(self) -> FieldValue {
        self
    }

    fn from_value(value: &FieldValue) -> Option<Self> {
        Some(value.clone())
    }

    fn decode(value: Option<&FieldValue>) -> Result<Self, FieldValidationError> {
        Ok(value.cloned().unwrap_or(FieldValue::Null))
    }
}

/// Conversion from a widget's emitted value into the value type of the field
/// it is bound to.
pub trait Accepts<V>: FieldType {
    fn accept(value: V) -> Self;
}

impl<V: FieldType> Accepts<V> for V {
    fn accept(value: V) -> Self {
        value
    }
}

impl Accepts<String> for FieldValue {
    fn accept(value: String) -> Self {
        value.into_value()
    }
}

impl Accepts<bool> for FieldValue {
    fn accept(value: bool) -> Self {
        value.into_value()
    }
}

impl Accepts<Decimal> for FieldValue {
    fn accept(value: Decimal) -> Self {
        value.into_value()
    }
}

impl Accepts<Vec<String>> for FieldValue {
    fn accept(value: Vec<String>) -> Self {
        value.into_value()
    }
}

impl Accepts<Option<FilePayload>> for FieldValue {
    fn accept(value: Option<FilePayload>) -> Self {
        value.into_value()
    }
}

/// The live value map of a form, in schema order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormState {
    values: IndexMap<FieldKey, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(key, value)
    }

    pub fn with(mut self, key: FieldKey, value: impl FieldType) -> Self {
        self.values.insert(key, value.into_value());
        self
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn get_as<V: FieldType>(&self, key: FieldKey) -> Option<V> {
        self.values.get(&key).and_then(V::from_value)
    }

    pub fn decode<V: FieldType>(&self, key: FieldKey) -> Result<V, FieldValidationError> {
        V::decode(self.values.get(&key))
    }

    pub fn contains_key(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
