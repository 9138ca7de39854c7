use std::collections::HashSet;
use std::marker::PhantomData;

use super::validation::{FieldLens, FieldValidationError, FormModel};
use super::value::{FieldKey, FieldType, FieldValue, FormState};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(FieldKey),
    #[error("default of field `{key}` is a {received}, but its rule expects a {expected}")]
    DefaultMismatch {
        key: FieldKey,
        expected: &'static str,
        received: &'static str,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rule {
    /// A string of at least one character.
    RequiredString { message: String },
    Boolean,
    String,
    StringArray,
    Number,
    /// Opaque payloads such as files or free-form JSON text. Never fails.
    Any,
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::RequiredString {
            message: message.into(),
        }
    }

    pub fn expected_shape(&self) -> &'static str {
        match self {
            Rule::RequiredString { .. } | Rule::String => "string",
            Rule::Boolean => "boolean",
            Rule::StringArray => "array",
            Rule::Number => "number",
            Rule::Any => "any",
        }
    }

    fn matches_shape(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Rule::Any, _) => true,
            (Rule::RequiredString { .. } | Rule::String, FieldValue::Text(_)) => true,
            (Rule::Boolean, FieldValue::Bool(_)) => true,
            (Rule::StringArray, FieldValue::List(_)) => true,
            (Rule::Number, FieldValue::Number(_)) => true,
            _ => false,
        }
    }

    pub fn check(&self, value: Option<&FieldValue>) -> Result<(), FieldValidationError> {
        let value = match (self, value) {
            (Rule::Any, _) => return Ok(()),
            (_, None) => return Err(FieldValidationError::missing()),
            (_, Some(value)) => value,
        };
        if !self.matches_shape(value) {
            return Err(FieldValidationError::invalid_type(
                self.expected_shape(),
                value.shape(),
            ));
        }
        match (self, value) {
            (Rule::RequiredString { message }, FieldValue::Text(text)) if text.is_empty() => {
                Err(FieldValidationError::too_small(message.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub key: FieldKey,
    pub rule: Rule,
    pub default: FieldValue,
}

/// The fixed field list of a form model.
#[derive(Clone, Debug)]
pub struct Schema<T> {
    fields: Vec<Field>,
    _model: PhantomData<fn() -> T>,
}

impl<T: FormModel> Schema<T> {
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder {
            fields: Vec::new(),
            _model: PhantomData,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, key: FieldKey) -> Option<&Field> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.field(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.iter().map(|field| field.key)
    }

    pub fn default_values(&self) -> FormState {
        let mut state = FormState::new();
        for field in &self.fields {
            state.insert(field.key, field.default.clone());
        }
        state
    }
}

pub struct SchemaBuilder<T> {
    fields: Vec<Field>,
    _model: PhantomData<fn() -> T>,
}

impl<T: FormModel> SchemaBuilder<T> {
    pub fn field<L>(mut self, lens: L, rule: Rule, default: L::Value) -> Self
    where
        L: FieldLens<T>,
    {
        self.fields.push(Field {
            key: lens.key(),
            rule,
            default: default.into_value(),
        });
        self
    }

    pub fn build(self) -> Result<Schema<T>, SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.key) {
                return Err(SchemaError::DuplicateField(field.key));
            }
            if !field.rule.matches_shape(&field.default) {
                return Err(SchemaError::DefaultMismatch {
                    key: field.key,
                    expected: field.rule.expected_shape(),
                    received: field.default.shape(),
                });
            }
        }
        Ok(Schema {
            fields: self.fields,
            _model: PhantomData,
        })
    }
}
