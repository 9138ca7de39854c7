mod binding;
mod controller;
mod schema;
mod sink;
mod validation;
mod value;

#[cfg(test)]
mod log_capture;
#[cfg(test)]
mod tests;

pub use calmform_derive::FormModel;
pub use binding::{BoundField, FieldBinder};
pub use controller::{
    FieldMeta, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    RevalidateMode, SubmitOutcome, ValidationMode,
};
pub use schema::{Field, Rule, Schema, SchemaBuilder, SchemaError};
pub use sink::{ConsoleSink, SubmitSink};
pub use validation::{
    ErrorKind, FieldErrors, FieldLens, FieldValidationError, FieldValidator, FormModel,
    FormValidator, SchemaValidator, ValidationResult, Validator, resolve,
};
pub use value::{Accepts, FieldKey, FieldType, FieldValue, FilePayload, FormState};
