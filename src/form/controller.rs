use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Deserialize;
use tracing::{debug, info};

use super::schema::Schema;
use super::sink::SubmitSink;
use super::validation::{
    FieldLens, FieldValidationError, FormModel, SchemaValidator, ValidationResult, Validator,
};
use super::value::{FieldKey, FieldType, FieldValue, FormState};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "form-{}", self.0)
    }
}

/// When a field is validated before the first submit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

/// When a field is validated again once the form has been submitted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevalidateMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Trigger {
    Change,
    Blur,
}

impl ValidationMode {
    pub(super) fn fires_on(self, trigger: Trigger) -> bool {
        matches!(
            (self, trigger),
            (ValidationMode::OnChange, Trigger::Change) | (ValidationMode::OnBlur, Trigger::Blur)
        )
    }
}

impl RevalidateMode {
    pub(super) fn fires_on(self, trigger: Trigger) -> bool {
        matches!(
            (self, trigger),
            (RevalidateMode::OnChange, Trigger::Change) | (RevalidateMode::OnBlur, Trigger::Blur)
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub revalidate_mode: RevalidateMode,
    pub validate_first_error_only: bool,
    pub focus_first_error_on_submit: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnSubmit,
            revalidate_mode: RevalidateMode::OnChange,
            validate_first_error_only: false,
            focus_first_error_on_submit: true,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldMeta {
    pub dirty: bool,
    pub touched: bool,
    pub errors: Vec<FieldValidationError>,
    /// Error raised by the widget itself, e.g. unparseable JSON text.
    pub widget_error: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    Valid,
    Invalid,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot {
    pub values: FormState,
    pub submit_count: u32,
    pub last_submit: Option<SubmitOutcome>,
    pub is_dirty: bool,
    /// The current values pass the schema and no field has a recorded error.
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldKey, FieldMeta>,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("field `{0}` is not declared by the form schema")]
    UnknownField(FieldKey),
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type FieldValidatorFn =
    Arc<dyn Fn(&FormState) -> Result<(), FieldValidationError> + Send + Sync>;
pub(super) type FormModelValidatorFn =
    Arc<dyn Fn(&FormState) -> Vec<(FieldKey, FieldValidationError)> + Send + Sync>;
pub(super) type FocusHandler = Arc<dyn Fn() + Send + Sync>;

pub(super) struct ControllerState {
    pub(super) id: FormId,
    pub(super) initial: FormState,
    pub(super) values: FormState,
    pub(super) submit_count: u32,
    pub(super) last_submit: Option<SubmitOutcome>,
    pub(super) dirty_fields: BTreeSet<FieldKey>,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta>,
    pub(super) first_error: Option<FieldKey>,
}

impl ControllerState {
    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta {
        self.field_meta.entry(key).or_default()
    }
}

/// Shared handle to a live form. Clones observe the same state.
#[derive(Clone)]
pub struct FormController<T: FormModel> {
    pub(super) options: FormOptions,
    pub(super) schema: Arc<Schema<T>>,
    pub(super) validator: Arc<dyn Validator>,
    pub(super) state: Arc<RwLock<ControllerState>>,
    pub(super) field_validators: Arc<RwLock<BTreeMap<FieldKey, Vec<FieldValidatorFn>>>>,
    pub(super) form_validators: Arc<RwLock<Vec<FormModelValidatorFn>>>,
    pub(super) dependencies: Arc<RwLock<BTreeMap<FieldKey, BTreeSet<FieldKey>>>>,
    pub(super) focus_handlers: Arc<RwLock<BTreeMap<FieldKey, FocusHandler>>>,
}

impl<T: FormModel> FormController<T> {
    pub fn new(schema: Schema<T>, options: FormOptions) -> Self {
        Self::with_validator(schema, SchemaValidator, options)
    }

    pub fn with_validator(
        schema: Schema<T>,
        validator: impl Validator + 'static,
        options: FormOptions,
    ) -> Self {
        let initial = schema.default_values();
        let id = FormId::next();
        debug!(form = %id, fields = initial.len(), "form created");
        Self {
            options,
            schema: Arc::new(schema),
            validator: Arc::new(validator),
            state: Arc::new(RwLock::new(ControllerState {
                id,
                values: initial.clone(),
                initial,
                submit_count: 0,
                last_submit: None,
                dirty_fields: BTreeSet::new(),
                field_meta: BTreeMap::new(),
                first_error: None,
            })),
            field_validators: Arc::new(RwLock::new(BTreeMap::new())),
            form_validators: Arc::new(RwLock::new(Vec::new())),
            dependencies: Arc::new(RwLock::new(BTreeMap::new())),
            focus_handlers: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    /// Current value of a field, or `None` when the stored value has another shape.
    pub fn get<L>(&self, lens: L) -> FormResult<Option<L::Value>>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field value")?
            .values
            .get_as::<L::Value>(lens.key()))
    }

    pub fn value(&self, key: FieldKey) -> FormResult<Option<FieldValue>> {
        Ok(read_lock(&self.state, "reading raw field value")?
            .values
            .get(key)
            .cloned())
    }

    pub fn values(&self) -> FormResult<FormState> {
        Ok(read_lock(&self.state, "reading form values")?.values.clone())
    }

    pub fn register_focus_handler<L>(
        &self,
        lens: L,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = self.known_key(lens.key())?;
        let mut handlers = write_lock(&self.focus_handlers, "registering focus handler")?;
        handlers.insert(key, Arc::new(handler));
        Ok(())
    }

    /// Validates the whole form and reports the outcome to `sink`.
    pub fn submit<S>(&self, sink: &S) -> FormResult<ValidationResult<T>>
    where
        S: SubmitSink<T> + ?Sized,
    {
        let (id, submit_count) = {
            let mut state = write_lock(&self.state, "preparing submit")?;
            state.submit_count = state.submit_count.saturating_add(1);
            (state.id, state.submit_count)
        };

        let result = self.validate_form()?;
        let outcome = if result.is_valid() {
            SubmitOutcome::Valid
        } else {
            SubmitOutcome::Invalid
        };
        write_lock(&self.state, "recording submit outcome")?.last_submit = Some(outcome);

        match result.errors() {
            None => info!(form = %id, submit_count, "form submitted"),
            Some(errors) => info!(
                form = %id,
                submit_count,
                invalid_fields = errors.len(),
                "form submit rejected"
            ),
        }
        sink.report(&result);

        if !result.is_valid() && self.options.focus_first_error_on_submit {
            let _ = self.focus_first_error()?;
        }
        Ok(result)
    }

    pub fn focus_first_error(&self) -> FormResult<bool> {
        let first_error = read_lock(&self.state, "reading first error key")?.first_error;
        let Some(key) = first_error else {
            return Ok(false);
        };
        let handler = read_lock(&self.focus_handlers, "reading focus handlers")?
            .get(&key)
            .cloned();
        if let Some(handler) = handler {
            handler();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn reset_to_initial(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.values = state.initial.clone();
        state.submit_count = 0;
        state.last_submit = None;
        state.dirty_fields.clear();
        state.first_error = None;
        for meta in state.field_meta.values_mut() {
            *meta = FieldMeta::default();
        }
        Ok(())
    }

    /// Replaces both the initial and the current values with `model`.
    pub fn reset_with(&self, model: &T) -> FormResult<()> {
        let next = model.to_state();
        for key in next.keys() {
            self.known_key(key)?;
        }
        {
            let mut state = write_lock(&self.state, "resetting form with values")?;
            let mut values = state.initial.clone();
            for (key, value) in next.iter() {
                values.insert(key, value.clone());
            }
            state.initial = values.clone();
            state.values = values;
        }
        self.reset_to_initial()
    }

    pub fn reset_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = self.known_key(lens.key())?;
        let mut state = write_lock(&self.state, "resetting field")?;
        if let Some(initial) = state.initial.get(key).cloned() {
            state.values.insert(key, initial);
        }
        state.dirty_fields.remove(&key);
        *state.ensure_meta(key) = FieldMeta::default();
        state.first_error = first_error_key(&self.schema, &state.field_meta);
        Ok(())
    }

    pub fn clear_errors(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "clearing all field errors")?;
        for meta in state.field_meta.values_mut() {
            meta.errors.clear();
            meta.widget_error = None;
        }
        state.first_error = None;
        Ok(())
    }

    pub fn clear_field_errors<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = self.known_key(lens.key())?;
        let mut state = write_lock(&self.state, "clearing field errors")?;
        if let Some(meta) = state.field_meta.get_mut(&key) {
            meta.errors.clear();
            meta.widget_error = None;
        }
        state.first_error = first_error_key(&self.schema, &state.field_meta);
        Ok(())
    }

    /// Attaches an error from outside the schema, e.g. a server response.
    pub fn set_field_error<L>(&self, lens: L, message: impl Into<String>) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = self.known_key(lens.key())?;
        let mut state = write_lock(&self.state, "setting field error")?;
        state
            .ensure_meta(key)
            .errors
            .push(FieldValidationError::custom(message));
        state.first_error = first_error_key(&self.schema, &state.field_meta);
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        let is_valid = state.field_meta.values().all(|meta| meta.errors.is_empty())
            && self
                .validator
                .validate(self.schema.fields(), &state.values)
                .is_empty();
        Ok(FormSnapshot {
            values: state.values.clone(),
            submit_count: state.submit_count,
            last_submit: state.last_submit,
            is_dirty: !state.dirty_fields.is_empty(),
            is_valid,
            field_meta: state.field_meta.clone(),
        })
    }

    pub fn field_meta<L>(&self, lens: L) -> FormResult<Option<FieldMeta>>
    where
        L: FieldLens<T>,
    {
        self.field_meta_by_key(lens.key())
    }

    pub fn field_meta_by_key(&self, key: FieldKey) -> FormResult<Option<FieldMeta>> {
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&key)
            .cloned())
    }

    /// The error a widget should show: nothing until the field was touched or
    /// the form submitted, then the first schema error, then the widget's own.
    pub fn display_error(&self, key: FieldKey) -> FormResult<Option<String>> {
        let state = read_lock(&self.state, "reading display error message")?;
        let Some(meta) = state.field_meta.get(&key) else {
            return Ok(None);
        };
        if !meta.touched && state.submit_count == 0 {
            return Ok(None);
        }
        Ok(meta
            .errors
            .first()
            .map(|error| error.message.clone())
            .or_else(|| meta.widget_error.clone()))
    }

    pub(super) fn set_widget_error(&self, key: FieldKey, error: Option<String>) -> FormResult<()> {
        let mut state = write_lock(&self.state, "writing widget error")?;
        state.ensure_meta(key).widget_error = error;
        Ok(())
    }

    pub(super) fn decode<V: FieldType>(&self, key: FieldKey) -> FormResult<Option<V>> {
        Ok(read_lock(&self.state, "decoding field value")?
            .values
            .get_as::<V>(key))
    }
}

pub(super) fn first_error_key<T: FormModel>(
    schema: &Schema<T>,
    field_meta: &BTreeMap<FieldKey, FieldMeta>,
) -> Option<FieldKey> {
    schema.keys().find(|key| {
        field_meta
            .get(key)
            .is_some_and(|meta| !meta.errors.is_empty())
    })
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
