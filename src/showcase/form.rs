use rust_decimal::Decimal;
use serde::Serialize;

use crate::form::{
    FieldValue, FormController, FormModel, FormOptions, FormState, Rule, Schema, SchemaError,
    SchemaValidator, SubmitSink, ValidationResult, resolve,
};

/// Values of the showcase form, one field per widget kind.
#[derive(Clone, Debug, PartialEq, FormModel, Serialize)]
#[form(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseValues {
    pub autocomplete: String,
    pub checkbox: bool,
    pub chip: bool,
    pub chipgroup_single: String,
    pub chipgroup_multiple: Vec<String>,
    pub color_input: String,
    pub color_picker: String,
    pub file_input: FieldValue,
    pub json_input: FieldValue,
    pub multi_select: FieldValue,
    pub native_select: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub number_input: Decimal,
    pub password_input: String,
    pub pin_input: String,
    pub radio: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub rating: Decimal,
    pub segmented_control: String,
    pub select: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub slider: Decimal,
    pub switch: bool,
    pub textarea: String,
    pub text_input: String,
}

impl Default for ShowcaseValues {
    fn default() -> Self {
        Self {
            autocomplete: String::new(),
            checkbox: true,
            chip: true,
            chipgroup_single: "react".to_string(),
            chipgroup_multiple: Vec::new(),
            color_input: String::new(),
            color_picker: String::new(),
            file_input: FieldValue::Null,
            json_input: FieldValue::Text(String::new()),
            multi_select: FieldValue::List(Vec::new()),
            native_select: String::new(),
            number_input: Decimal::from(18),
            password_input: String::new(),
            pin_input: String::new(),
            radio: String::new(),
            rating: Decimal::from(2),
            segmented_control: String::new(),
            select: String::new(),
            slider: Decimal::from(40),
            switch: false,
            textarea: String::new(),
            text_input: String::new(),
        }
    }
}

pub fn define_schema() -> Result<Schema<ShowcaseValues>, SchemaError> {
    let f = ShowcaseValues::fields();
    let d = ShowcaseValues::default();
    Schema::builder()
        .field(f.autocomplete(), Rule::required("Required"), d.autocomplete)
        .field(f.checkbox(), Rule::Boolean, d.checkbox)
        .field(f.chip(), Rule::Boolean, d.chip)
        .field(f.chipgroup_single(), Rule::String, d.chipgroup_single)
        .field(f.chipgroup_multiple(), Rule::StringArray, d.chipgroup_multiple)
        .field(f.color_input(), Rule::String, d.color_input)
        .field(f.color_picker(), Rule::String, d.color_picker)
        .field(f.file_input(), Rule::Any, d.file_input)
        .field(f.json_input(), Rule::Any, d.json_input)
        .field(f.multi_select(), Rule::Any, d.multi_select)
        .field(f.native_select(), Rule::String, d.native_select)
        .field(f.number_input(), Rule::Number, d.number_input)
        .field(f.password_input(), Rule::String, d.password_input)
        .field(f.pin_input(), Rule::String, d.pin_input)
        .field(f.radio(), Rule::String, d.radio)
        .field(f.rating(), Rule::Number, d.rating)
        .field(f.segmented_control(), Rule::String, d.segmented_control)
        .field(f.select(), Rule::String, d.select)
        .field(f.slider(), Rule::Number, d.slider)
        .field(f.switch(), Rule::Boolean, d.switch)
        .field(f.textarea(), Rule::String, d.textarea)
        .field(f.text_input(), Rule::String, d.text_input)
        .build()
}

pub fn default_values() -> FormState {
    ShowcaseValues::default().to_state()
}

/// One submit attempt against `state`, without a live controller.
pub fn submit<S>(
    schema: &Schema<ShowcaseValues>,
    state: &FormState,
    sink: &S,
) -> ValidationResult<ShowcaseValues>
where
    S: SubmitSink<ShowcaseValues> + ?Sized,
{
    let result = resolve(schema, &SchemaValidator, state);
    sink.report(&result);
    result
}

pub fn controller(options: FormOptions) -> Result<FormController<ShowcaseValues>, SchemaError> {
    Ok(FormController::new(define_schema()?, options))
}
