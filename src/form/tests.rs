use super::*;
use rstest::rstest;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::contracts::FieldLike;
use crate::form::log_capture::CapturedLogs;
use crate::widgets::{JsonInput, PasswordInput, Select, TextInput};

#[derive(Clone, Debug, PartialEq, crate::form::FormModel)]
struct ProfileForm {
    email: String,
    password: String,
    confirm_password: String,
    plan: String,
    enabled: bool,
    amount: Decimal,
    tags: Vec<String>,
    attachment: FieldValue,
}

fn base_form() -> ProfileForm {
    ProfileForm {
        email: "user@example.com".to_string(),
        password: "pass".to_string(),
        confirm_password: "pass".to_string(),
        plan: "basic".to_string(),
        enabled: false,
        amount: Decimal::from_i128_with_scale(1200, 2),
        tags: vec!["a".to_string()],
        attachment: FieldValue::Null,
    }
}

fn profile_schema() -> Schema<ProfileForm> {
    let fields = ProfileForm::fields();
    let base = base_form();
    Schema::builder()
        .field(fields.email(), Rule::required("Email is required"), base.email)
        .field(fields.password(), Rule::String, base.password)
        .field(fields.confirm_password(), Rule::String, base.confirm_password)
        .field(fields.plan(), Rule::String, base.plan)
        .field(fields.enabled(), Rule::Boolean, base.enabled)
        .field(fields.amount(), Rule::Number, base.amount)
        .field(fields.tags(), Rule::StringArray, base.tags)
        .field(fields.attachment(), Rule::Any, base.attachment)
        .build()
        .expect("profile schema is well formed")
}

fn controller_with(options: FormOptions) -> FormController<ProfileForm> {
    FormController::new(profile_schema(), options)
}

fn on_change() -> FormOptions {
    FormOptions {
        validate_mode: ValidationMode::OnChange,
        ..FormOptions::default()
    }
}

fn errors_of(
    controller: &FormController<ProfileForm>,
    key: FieldKey,
) -> Vec<FieldValidationError> {
    controller
        .field_meta_by_key(key)
        .expect("field meta")
        .map(|meta| meta.errors)
        .unwrap_or_default()
}

fn silent_sink() -> impl Fn(&ValidationResult<ProfileForm>) + Send + Sync {
    |_result: &ValidationResult<ProfileForm>| {}
}

#[test]
fn field_lens_updates_state_and_dirty_state() {
    let controller = controller_with(FormOptions::default());
    let fields = ProfileForm::fields();

    controller
        .set(fields.email(), "changed@example.com".to_string())
        .expect("set must succeed");
    let snapshot = controller.snapshot().expect("snapshot must succeed");
    assert!(snapshot.is_dirty);
    assert_eq!(
        snapshot.values.get_as::<String>(fields.email().key()),
        Some("changed@example.com".to_string())
    );
    assert!(
        snapshot
            .field_meta
            .get(&fields.email().key())
            .is_some_and(|meta| meta.dirty)
    );

    controller
        .set(fields.email(), "user@example.com".to_string())
        .expect("restore initial value");
    assert!(!controller.snapshot().expect("snapshot").is_dirty);
}

#[test]
fn validation_mode_controls_when_errors_appear() {
    let fields = ProfileForm::fields();

    let eager = controller_with(on_change());
    eager
        .set(fields.email(), String::new())
        .expect("set should trigger validation");
    assert_eq!(
        errors_of(&eager, fields.email().key()),
        vec![FieldValidationError::too_small("Email is required")]
    );

    let lazy = controller_with(FormOptions::default());
    lazy.set(fields.email(), String::new())
        .expect("set should not trigger validation immediately");
    assert!(errors_of(&lazy, fields.email().key()).is_empty());
    assert!(!lazy.validate_form().expect("validate form").is_valid());
    assert_eq!(errors_of(&lazy, fields.email().key()).len(), 1);
}

#[test]
fn on_blur_mode_waits_for_touch() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions {
        validate_mode: ValidationMode::OnBlur,
        ..FormOptions::default()
    });

    controller
        .set(fields.email(), String::new())
        .expect("set invalid value");
    assert!(errors_of(&controller, fields.email().key()).is_empty());

    controller.touch(fields.email()).expect("touch field");
    assert_eq!(errors_of(&controller, fields.email().key()).len(), 1);
}

#[test]
fn fields_revalidate_on_change_after_first_submit() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions::default());

    controller
        .set(fields.email(), String::new())
        .expect("set invalid value");
    let result = controller.submit(&silent_sink()).expect("submit");
    assert!(!result.is_valid());
    assert_eq!(errors_of(&controller, fields.email().key()).len(), 1);

    controller
        .set(fields.email(), "back@example.com".to_string())
        .expect("fix value");
    assert!(errors_of(&controller, fields.email().key()).is_empty());
}

#[test]
fn dependencies_revalidate_linked_fields() {
    let fields = ProfileForm::fields();
    let controller = controller_with(on_change());
    controller
        .register_field_validator(
            fields.confirm_password(),
            |values: &FormState, value: &String| {
                let password = values.get_as::<String>(FieldKey::new("password"));
                if password.as_ref() != Some(value) {
                    Err(FieldValidationError::custom("password mismatch"))
                } else {
                    Ok(())
                }
            },
        )
        .expect("register validator");
    controller
        .register_dependency(fields.password(), fields.confirm_password())
        .expect("register dependency");

    controller
        .set(fields.password(), "new-pass".to_string())
        .expect("set source field");
    assert_eq!(
        errors_of(&controller, fields.confirm_password().key()),
        vec![FieldValidationError::custom("password mismatch")]
    );

    controller
        .set(fields.confirm_password(), "new-pass".to_string())
        .expect("set dependent field");
    assert!(errors_of(&controller, fields.confirm_password().key()).is_empty());
}

#[rstest]
#[case(false, 2)]
#[case(true, 1)]
fn first_error_only_stops_after_first_failure(#[case] first_only: bool, #[case] expected: usize) {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions {
        validate_first_error_only: first_only,
        ..FormOptions::default()
    });
    controller
        .register_field_validator(fields.email(), |_values: &FormState, value: &String| {
            if value.chars().count() < 3 {
                Err(FieldValidationError::custom("too short"))
            } else {
                Ok(())
            }
        })
        .expect("register length validator");
    controller
        .register_field_validator(fields.email(), |_values: &FormState, value: &String| {
            if value.contains('@') {
                Ok(())
            } else {
                Err(FieldValidationError::custom("missing @"))
            }
        })
        .expect("register format validator");

    controller
        .set(fields.email(), "x".to_string())
        .expect("set short email");
    let result = controller.validate_form().expect("validate form");
    let errors = result.errors().expect("form must be invalid");
    assert_eq!(errors.get(fields.email().key()).len(), expected);
    assert_eq!(errors.message(fields.email().key()), Some("too short"));
}

#[test]
fn form_validators_attach_errors_to_named_fields() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions::default());
    controller
        .register_form_validator(|values: &FormState| {
            let password = values.get_as::<String>(FieldKey::new("password"));
            let confirm = values.get_as::<String>(FieldKey::new("confirm_password"));
            if password == confirm {
                Vec::new()
            } else {
                vec![(
                    FieldKey::new("confirm_password"),
                    FieldValidationError::custom("passwords differ"),
                )]
            }
        })
        .expect("register form validator");

    assert!(controller.validate_form().expect("validate form").is_valid());

    controller
        .set(fields.password(), "other".to_string())
        .expect("set password");
    let result = controller.validate_form().expect("validate form");
    let errors = result.errors().expect("form must be invalid");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.message(fields.confirm_password().key()),
        Some("passwords differ")
    );
}

#[test]
fn submit_reports_to_sink_and_focuses_first_invalid_field() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions::default());
    let focused = Arc::new(Mutex::new(Vec::new()));
    {
        let focused = focused.clone();
        controller
            .register_focus_handler(fields.email(), move || {
                focused.lock().expect("focus log").push("email");
            })
            .expect("register email focus");
    }
    {
        let focused = focused.clone();
        controller
            .register_focus_handler(fields.password(), move || {
                focused.lock().expect("focus log").push("password");
            })
            .expect("register password focus");
    }

    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let reports = reports.clone();
        move |result: &ValidationResult<ProfileForm>| {
            reports.lock().expect("report log").push(result.is_valid());
        }
    };

    controller
        .set(fields.email(), String::new())
        .expect("set invalid email");
    let result = controller.submit(&sink).expect("submit");
    assert!(!result.is_valid());
    assert_eq!(*reports.lock().expect("report log"), vec![false]);
    assert_eq!(*focused.lock().expect("focus log"), vec!["email"]);

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_count, 1);
    assert_eq!(snapshot.last_submit, Some(SubmitOutcome::Invalid));
    assert!(!snapshot.is_valid);

    controller
        .set(fields.email(), "ok@example.com".to_string())
        .expect("set valid email");
    let result = controller.submit(&sink).expect("submit");
    assert_eq!(result.value().map(|form| form.email.as_str()), Some("ok@example.com"));
    assert_eq!(*reports.lock().expect("report log"), vec![false, true]);
    assert_eq!(focused.lock().expect("focus log").len(), 1);
}

#[test]
fn repeated_submit_without_changes_is_idempotent() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions::default());
    controller
        .set(fields.email(), String::new())
        .expect("set invalid email");

    let first = controller.submit(&silent_sink()).expect("first submit");
    let second = controller.submit(&silent_sink()).expect("second submit");
    assert_eq!(first, second);
    assert_eq!(controller.snapshot().expect("snapshot").submit_count, 2);
}

#[test]
fn reset_field_and_clear_errors_are_consistent() {
    let fields = ProfileForm::fields();
    let controller = controller_with(on_change());

    controller
        .set(fields.email(), String::new())
        .expect("set invalid value");
    controller
        .clear_field_errors(fields.email())
        .expect("clear field errors");
    assert!(errors_of(&controller, fields.email().key()).is_empty());

    controller
        .set(fields.email(), "dirty@example.com".to_string())
        .expect("set dirty value");
    controller.reset_field(fields.email()).expect("reset field");
    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(
        snapshot.values.get_as::<String>(fields.email().key()),
        Some("user@example.com".to_string())
    );
    assert!(
        snapshot
            .field_meta
            .get(&fields.email().key())
            .is_some_and(|meta| !meta.dirty)
    );
    assert!(!snapshot.is_dirty);
}

#[test]
fn reset_with_replaces_initial_values() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions::default());
    controller.submit(&silent_sink()).expect("submit");

    let next = ProfileForm {
        email: "next@example.com".to_string(),
        tags: vec!["x".to_string(), "y".to_string()],
        ..base_form()
    };
    controller.reset_with(&next).expect("reset with model");

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.values, next.to_state());
    assert_eq!(snapshot.submit_count, 0);
    assert_eq!(snapshot.last_submit, None);
    assert!(!snapshot.is_dirty);

    controller
        .set(fields.email(), "next@example.com".to_string())
        .expect("set same value");
    assert!(!controller.snapshot().expect("snapshot").is_dirty);
}

#[test]
fn error_visibility_requires_touch_or_submit() {
    let fields = ProfileForm::fields();
    let controller = controller_with(on_change());

    controller
        .set(fields.email(), String::new())
        .expect("set invalid");
    assert_eq!(
        controller
            .display_error(fields.email().key())
            .expect("display error"),
        None
    );

    controller.touch(fields.email()).expect("touch field");
    assert_eq!(
        controller
            .display_error(fields.email().key())
            .expect("display error"),
        Some("Email is required".to_string())
    );

    controller
        .set_field_error(fields.plan(), "Plan is sold out")
        .expect("set external error");
    assert_eq!(
        controller
            .display_error(fields.plan().key())
            .expect("display error"),
        None
    );
    controller.submit(&silent_sink()).expect("submit");
    controller
        .set_field_error(fields.plan(), "Plan is sold out")
        .expect("set external error again");
    assert_eq!(
        controller
            .display_error(fields.plan().key())
            .expect("display error"),
        Some("Plan is sold out".to_string())
    );

    controller.clear_errors().expect("clear errors");
    let snapshot = controller.snapshot().expect("snapshot");
    assert!(snapshot.field_meta.values().all(|meta| meta.errors.is_empty()));
    assert!(!snapshot.is_valid);

    controller
        .set(fields.email(), "user@example.com".to_string())
        .expect("restore email");
    assert!(controller.snapshot().expect("snapshot").is_valid);
}

#[test]
fn fresh_snapshot_reflects_invalid_defaults() {
    let fields = ProfileForm::fields();
    let controller = FormController::new(
        Schema::builder()
            .field(fields.email(), Rule::required("Email is required"), String::new())
            .field(fields.password(), Rule::String, String::new())
            .field(fields.confirm_password(), Rule::String, String::new())
            .field(fields.plan(), Rule::String, String::new())
            .field(fields.enabled(), Rule::Boolean, false)
            .field(fields.amount(), Rule::Number, Decimal::ZERO)
            .field(fields.tags(), Rule::StringArray, Vec::new())
            .field(fields.attachment(), Rule::Any, FieldValue::Null)
            .build()
            .expect("schema with empty email"),
        FormOptions::default(),
    );

    let snapshot = controller.snapshot().expect("snapshot");
    assert!(snapshot.field_meta.is_empty());
    assert!(!snapshot.is_valid);

    controller
        .set(fields.email(), "new@example.com".to_string())
        .expect("fill email");
    assert!(controller.snapshot().expect("snapshot").is_valid);
}

#[test]
fn single_field_update_keeps_other_field_meta_stable() {
    let fields = ProfileForm::fields();
    let invoked = Arc::new(AtomicUsize::new(0));
    let controller = controller_with(on_change());
    {
        let invoked = invoked.clone();
        controller
            .register_field_validator(
                fields.password(),
                move |_values: &FormState, _value: &String| {
                    invoked.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            )
            .expect("register password validator");
    }
    {
        let invoked = invoked.clone();
        controller
            .register_field_validator(fields.plan(), move |_values: &FormState, _value: &String| {
                invoked.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .expect("register plan validator");
    }

    controller
        .set(fields.plan(), "pro".to_string())
        .expect("update plan only");

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(invoked.load(Ordering::SeqCst), 1);
    assert_eq!(snapshot.field_meta.len(), 1);
    assert!(
        snapshot
            .field_meta
            .get(&fields.plan().key())
            .is_some_and(|meta| meta.dirty && meta.errors.is_empty())
    );
}

#[test]
fn field_change_events_never_carry_values() {
    let controller = controller_with(on_change());
    let password = controller
        .bind(ProfileForm::fields().password(), PasswordInput::new())
        .expect("bind password");

    let logs = CapturedLogs::default();
    logs.run(|| password.change("hunter2-S3cret!".to_string()))
        .expect("change password");

    let output = logs.contents();
    assert!(output.contains("field changed"));
    assert!(output.contains("field=password"));
    assert!(output.contains("shape="));
    assert!(!output.contains("hunter2"));
}

#[test]
fn unknown_keys_are_rejected() {
    let controller = controller_with(FormOptions::default());
    let missing = FieldKey::new("nickname");
    assert_eq!(
        controller.set_value(missing, FieldValue::Text("neo".to_string())),
        Err(FormError::UnknownField(missing))
    );
    assert_eq!(controller.value(missing).expect("read value"), None);
}

#[test]
fn schema_rejects_duplicate_keys_and_mismatched_defaults() {
    let fields = ProfileForm::fields();
    let duplicate = Schema::<ProfileForm>::builder()
        .field(fields.email(), Rule::String, String::new())
        .field(fields.email(), Rule::String, String::new())
        .build()
        .err();
    assert_eq!(
        duplicate,
        Some(SchemaError::DuplicateField(fields.email().key()))
    );

    let mismatch = Schema::<ProfileForm>::builder()
        .field(fields.plan(), Rule::Number, "basic".to_string())
        .build()
        .err();
    assert_eq!(
        mismatch,
        Some(SchemaError::DefaultMismatch {
            key: fields.plan().key(),
            expected: "number",
            received: "string",
        })
    );

    let empty_required = Schema::<ProfileForm>::builder()
        .field(fields.email(), Rule::required("Required"), String::new())
        .build();
    assert!(empty_required.is_ok());
}

#[rstest]
#[case(
    Rule::required("Required"),
    Some(FieldValue::Text(String::new())),
    Some((ErrorKind::TooSmall, "Required"))
)]
#[case(Rule::required("Required"), Some(FieldValue::Text("a".to_string())), None)]
#[case(
    Rule::required("Required"),
    Some(FieldValue::Null),
    Some((ErrorKind::InvalidType, "Expected string, received null"))
)]
#[case(Rule::String, None, Some((ErrorKind::InvalidType, "Required")))]
#[case(
    Rule::Number,
    Some(FieldValue::Bool(true)),
    Some((ErrorKind::InvalidType, "Expected number, received boolean"))
)]
#[case(Rule::StringArray, Some(FieldValue::List(Vec::new())), None)]
#[case(Rule::Boolean, Some(FieldValue::Bool(false)), None)]
#[case(Rule::Any, None, None)]
#[case(Rule::Any, Some(FieldValue::Text("{not json".to_string())), None)]
fn rules_check_shape_and_presence(
    #[case] rule: Rule,
    #[case] value: Option<FieldValue>,
    #[case] expected: Option<(ErrorKind, &str)>,
) {
    let error = rule.check(value.as_ref()).err();
    let outcome = error.as_ref().map(|error| (error.kind, error.message()));
    assert_eq!(outcome, expected);
}

#[test]
fn resolve_decodes_model_or_reports_missing_fields() {
    let schema = profile_schema();
    let valid = resolve(&schema, &SchemaValidator, &schema.default_values());
    assert_eq!(valid, ValidationResult::Valid(base_form()));

    let partial = FormState::new().with(FieldKey::new("email"), "only@example.com".to_string());
    let result = resolve(&schema, &SchemaValidator, &partial);
    let errors = result.errors().expect("missing fields must fail");
    assert_eq!(errors.message(FieldKey::new("password")), Some("Required"));
    assert!(!errors.contains(FieldKey::new("email")));
    assert!(!errors.contains(FieldKey::new("attachment")));
}

#[test]
fn select_binding_rejects_options_it_cannot_emit() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions::default());
    let plan = controller
        .bind(fields.plan(), Select::new().data(["basic", "pro"]))
        .expect("bind select");

    assert!(!plan.change("enterprise".to_string()).expect("change"));
    assert_eq!(plan.value().expect("value"), Some("basic".to_string()));
    assert!(plan.change("pro".to_string()).expect("change"));
    assert_eq!(plan.value().expect("value"), Some("pro".to_string()));
    assert!(plan.is_dirty().expect("dirty flag"));
    assert!(plan.change(String::new()).expect("clear selection"));
}

#[test]
fn disabled_widgets_ignore_changes() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions::default());
    let email = controller
        .bind(fields.email(), TextInput::new().disabled(true))
        .expect("bind text input");

    assert!(!email.change("new@example.com".to_string()).expect("change"));
    assert_eq!(email.value().expect("value"), Some("user@example.com".to_string()));
    assert!(email.is_required());
}

#[test]
fn json_input_formats_on_blur_and_flags_invalid_text() {
    let fields = ProfileForm::fields();
    let controller = controller_with(FormOptions::default());
    let attachment = controller
        .bind(
            fields.attachment(),
            JsonInput::new()
                .format_on_blur(true)
                .validation_error("Invalid json"),
        )
        .expect("bind json input");

    assert!(attachment.change(r#"{"a":1}"#.to_string()).expect("change"));
    attachment.blur().expect("blur");
    assert_eq!(
        attachment.value().expect("value"),
        Some(FieldValue::Text("{\n  \"a\": 1\n}".to_string()))
    );
    assert!(attachment.is_touched().expect("touched flag"));
    assert_eq!(attachment.error().expect("error"), None);

    assert!(attachment.change("{oops".to_string()).expect("change"));
    attachment.blur().expect("blur");
    assert_eq!(
        attachment.value().expect("value"),
        Some(FieldValue::Text("{oops".to_string()))
    );
    assert_eq!(
        attachment.error().expect("error"),
        Some("Invalid json".to_string())
    );
    assert!(controller.validate_form().expect("validate form").is_valid());

    assert!(attachment.change(r#"[1, 2]"#.to_string()).expect("change"));
    assert_eq!(attachment.error().expect("error"), None);
}

#[test]
fn binding_unknown_field_fails() {
    #[derive(Clone, Copy)]
    struct NicknameLens;

    impl FieldLens<ProfileForm> for NicknameLens {
        type Value = String;

        fn key(self) -> FieldKey {
            FieldKey::new("nickname")
        }

        fn get<'a>(self, model: &'a ProfileForm) -> &'a Self::Value {
            &model.email
        }

        fn set(self, model: &mut ProfileForm, value: Self::Value) {
            model.email = value;
        }
    }

    let controller = controller_with(FormOptions::default());
    let err = controller.bind(NicknameLens, TextInput::new()).err();
    assert_eq!(err, Some(FormError::UnknownField(FieldKey::new("nickname"))));
    assert_eq!(
        controller.clear_field_errors(NicknameLens),
        Err(FormError::UnknownField(FieldKey::new("nickname")))
    );
}

#[test]
fn form_options_load_from_json_with_defaults() {
    let options: FormOptions =
        serde_json::from_str(r#"{"validateMode":"onBlur","validateFirstErrorOnly":true}"#)
            .expect("parse options");
    assert_eq!(options.validate_mode, ValidationMode::OnBlur);
    assert_eq!(options.revalidate_mode, RevalidateMode::OnChange);
    assert!(options.validate_first_error_only);
    assert!(options.focus_first_error_on_submit);
}

#[test]
fn derive_macro_generates_field_lenses() {
    let fields = ProfileForm::fields();
    assert_eq!(fields.email().key().as_str(), "email");
    assert_eq!(fields.confirm_password().key().as_str(), "confirm_password");

    let mut form = base_form();
    fields.tags().set(&mut form, vec!["b".to_string()]);
    assert_eq!(fields.tags().get(&form), &vec!["b".to_string()]);
    assert_eq!(ProfileForm::from_state(&form.to_state()), Ok(form));
}
