use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::controller::{
    FieldValidatorFn, FormController, FormError, FormModelValidatorFn, FormResult, Trigger,
    first_error_key, read_lock, write_lock,
};
use super::schema::{Field, Schema};
use super::value::{FieldKey, FieldType, FieldValue, FormState};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidType,
    TooSmall,
    Custom,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldValidationError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Custom, message)
    }

    pub fn too_small(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooSmall, message)
    }

    pub fn invalid_type(expected: &str, received: &str) -> Self {
        Self::new(
            ErrorKind::InvalidType,
            format!("Expected {expected}, received {received}"),
        )
    }

    pub fn missing() -> Self {
        Self::new(ErrorKind::InvalidType, "Required")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Validation errors keyed by field, in the order they were found.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: IndexMap<FieldKey, Vec<FieldValidationError>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: FieldKey, error: FieldValidationError) {
        self.errors.entry(key).or_default().push(error);
    }

    pub fn get(&self, key: FieldKey) -> &[FieldValidationError] {
        self.errors.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    /// First message recorded for `key`.
    pub fn message(&self, key: FieldKey) -> Option<&str> {
        self.get(key).first().map(FieldValidationError::message)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.errors.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &[FieldValidationError])> {
        self.errors
            .iter()
            .map(|(key, errors)| (*key, errors.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(super) fn take(&mut self, key: FieldKey) -> Vec<FieldValidationError> {
        self.errors.shift_remove(&key).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValidationResult<T> {
    Valid(T),
    Invalid(FieldErrors),
}

impl<T> ValidationResult<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ValidationResult::Valid(value) => Some(value),
            ValidationResult::Invalid(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(errors) => Some(errors),
        }
    }
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: FieldType;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

/// A typed form model. Usually derived with `#[derive(FormModel)]`.
pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
    fn to_state(&self) -> FormState;
    fn from_state(state: &FormState) -> Result<Self, FieldErrors>;
}

/// Applies a schema to a value map.
pub trait Validator: Send + Sync {
    fn validate_field(
        &self,
        field: &Field,
        value: Option<&FieldValue>,
    ) -> Result<(), FieldValidationError>;

    fn validate(&self, fields: &[Field], state: &FormState) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in fields {
            if let Err(error) = self.validate_field(field, state.get(field.key)) {
                errors.push(field.key, error);
            }
        }
        errors
    }
}

/// Checks each field against its declared [`Rule`](super::Rule) and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct SchemaValidator;

impl Validator for SchemaValidator {
    fn validate_field(
        &self,
        field: &Field,
        value: Option<&FieldValue>,
    ) -> Result<(), FieldValidationError> {
        field.rule.check(value)
    }
}

/// Runs `validator` over `state` and decodes the typed model when every field
/// passes.
pub fn resolve<T: FormModel>(
    schema: &Schema<T>,
    validator: &dyn Validator,
    state: &FormState,
) -> ValidationResult<T> {
    let errors = validator.validate(schema.fields(), state);
    if !errors.is_empty() {
        return ValidationResult::Invalid(errors);
    }
    match T::from_state(state) {
        Ok(model) => ValidationResult::Valid(model),
        Err(errors) => ValidationResult::Invalid(errors),
    }
}

pub trait FieldValidator<T, L>: Send + Sync
where
    L: FieldLens<T>,
{
    fn validate(&self, values: &FormState, value: &L::Value) -> Result<(), FieldValidationError>;
}

impl<T, L, F> FieldValidator<T, L> for F
where
    L: FieldLens<T>,
    F: Fn(&FormState, &L::Value) -> Result<(), FieldValidationError> + Send + Sync,
{
    fn validate(&self, values: &FormState, value: &L::Value) -> Result<(), FieldValidationError> {
        (self)(values, value)
    }
}

/// Cross-field rule run on full-form validation.
pub trait FormValidator: Send + Sync {
    fn validate(&self, values: &FormState) -> Vec<(FieldKey, FieldValidationError)>;
}

impl<F> FormValidator for F
where
    F: Fn(&FormState) -> Vec<(FieldKey, FieldValidationError)> + Send + Sync,
{
    fn validate(&self, values: &FormState) -> Vec<(FieldKey, FieldValidationError)> {
        (self)(values)
    }
}

impl<T: FormModel> FormController<T> {
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L> + 'static,
    {
        let key = self.known_key(lens.key())?;
        let validator = Arc::new(validator);
        // A value of the wrong shape is reported by the schema rule already.
        let wrapped: FieldValidatorFn = Arc::new(move |values: &FormState| {
            match values.get_as::<L::Value>(key) {
                Some(value) => validator.validate(values, &value),
                None => Ok(()),
            }
        });
        let mut validators = write_lock(&self.field_validators, "registering field validator")?;
        validators.entry(key).or_default().push(wrapped);
        Ok(())
    }

    pub fn register_form_validator<V>(&self, validator: V) -> FormResult<()>
    where
        V: FormValidator + 'static,
    {
        let validator = Arc::new(validator);
        let wrapped: FormModelValidatorFn =
            Arc::new(move |values: &FormState| validator.validate(values));
        let mut validators = write_lock(&self.form_validators, "registering form validator")?;
        validators.push(wrapped);
        Ok(())
    }

    pub fn register_dependency<S, D>(&self, source: S, dependent: D) -> FormResult<()>
    where
        S: FieldLens<T>,
        D: FieldLens<T>,
    {
        let source = self.known_key(source.key())?;
        let dependent = self.known_key(dependent.key())?;
        let mut dependencies = write_lock(&self.dependencies, "registering dependency")?;
        dependencies.entry(source).or_default().insert(dependent);
        Ok(())
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        self.set_value(lens.key(), value.into_value())
    }

    /// Writes a raw value. The key must be declared by the schema.
    pub fn set_value(&self, key: FieldKey, value: FieldValue) -> FormResult<()> {
        let key = self.known_key(key)?;
        let submitted = {
            let mut state = write_lock(&self.state, "writing form value")?;
            let is_dirty = state.initial.get(key) != Some(&value);
            debug!(form = %state.id, field = %key, shape = value.shape(), "field changed");
            state.values.insert(key, value);
            if is_dirty {
                state.dirty_fields.insert(key);
            } else {
                state.dirty_fields.remove(&key);
            }
            state.ensure_meta(key).dirty = is_dirty;
            state.submit_count > 0
        };
        self.run_trigger(key, Trigger::Change, submitted)
    }

    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        self.touch_key(lens.key())
    }

    pub(super) fn touch_key(&self, key: FieldKey) -> FormResult<()> {
        let key = self.known_key(key)?;
        let submitted = {
            let mut state = write_lock(&self.state, "touching field")?;
            state.ensure_meta(key).touched = true;
            state.submit_count > 0
        };
        self.run_trigger(key, Trigger::Blur, submitted)
    }

    pub fn validate_field<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        let key = self.known_key(lens.key())?;
        let valid = self.validate_field_by_key(key)?;
        self.revalidate_dependents(key)?;
        Ok(valid)
    }

    /// Validates every field, stores the errors in field metadata and returns
    /// the typed model when the whole form passes.
    pub fn validate_form(&self) -> FormResult<ValidationResult<T>> {
        let values = read_lock(&self.state, "reading values for form validation")?
            .values
            .clone();
        let field_validators = read_lock(
            &self.field_validators,
            "reading field validators for form validation",
        )?
        .clone();
        let form_validators = read_lock(
            &self.form_validators,
            "reading form validators for form validation",
        )?
        .clone();

        let mut errors = self.validator.validate(self.schema.fields(), &values);
        for key in self.schema.keys() {
            let Some(validators) = field_validators.get(&key) else {
                continue;
            };
            for validator in validators {
                if self.options.validate_first_error_only && errors.contains(key) {
                    break;
                }
                if let Err(error) = validator(&values) {
                    errors.push(key, error);
                }
            }
        }
        for validator in form_validators {
            for (key, error) in validator(&values) {
                errors.push(key, error);
            }
        }

        let result = if errors.is_empty() {
            match T::from_state(&values) {
                Ok(model) => ValidationResult::Valid(model),
                Err(decode_errors) => ValidationResult::Invalid(decode_errors),
            }
        } else {
            ValidationResult::Invalid(errors)
        };

        {
            let mut state = write_lock(&self.state, "applying form validation result")?;
            let mut pending = result.errors().cloned().unwrap_or_default();
            let mut keys = state
                .field_meta
                .keys()
                .copied()
                .collect::<BTreeSet<FieldKey>>();
            keys.extend(pending.keys());
            for key in keys {
                state.ensure_meta(key).errors = pending.take(key);
            }
            state.first_error = first_error_key(&self.schema, &state.field_meta);
        }

        Ok(result)
    }

    pub(super) fn validate_field_by_key(&self, key: FieldKey) -> FormResult<bool> {
        let values = read_lock(&self.state, "reading values for field validation")?
            .values
            .clone();
        let validators = read_lock(
            &self.field_validators,
            "reading field validators for key validation",
        )?
        .get(&key)
        .cloned()
        .unwrap_or_default();

        let mut errors = Vec::new();
        if let Some(field) = self.schema.field(key)
            && let Err(error) = self.validator.validate_field(field, values.get(key))
        {
            errors.push(error);
        }
        for validator in validators {
            if self.options.validate_first_error_only && !errors.is_empty() {
                break;
            }
            if let Err(error) = validator(&values) {
                errors.push(error);
            }
        }

        let mut state = write_lock(&self.state, "writing field validation result")?;
        let valid = errors.is_empty();
        state.ensure_meta(key).errors = errors;
        state.first_error = first_error_key(&self.schema, &state.field_meta);
        Ok(valid)
    }

    pub(super) fn revalidate_dependents(&self, source: FieldKey) -> FormResult<()> {
        let dependents = read_lock(&self.dependencies, "reading field dependencies")?
            .get(&source)
            .cloned()
            .unwrap_or_default();
        for dependent in dependents {
            let _ = self.validate_field_by_key(dependent)?;
        }
        Ok(())
    }

    fn run_trigger(&self, key: FieldKey, trigger: Trigger, submitted: bool) -> FormResult<()> {
        let fires = if submitted {
            self.options.revalidate_mode.fires_on(trigger)
        } else {
            self.options.validate_mode.fires_on(trigger)
        };
        if fires {
            let _ = self.validate_field_by_key(key)?;
            self.revalidate_dependents(key)?;
        }
        Ok(())
    }

    pub(super) fn known_key(&self, key: FieldKey) -> FormResult<FieldKey> {
        if self.schema.contains(key) {
            Ok(key)
        } else {
            Err(FormError::UnknownField(key))
        }
    }
}
