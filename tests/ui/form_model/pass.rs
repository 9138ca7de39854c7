use calmform::form::{FieldKey, FieldLens, FieldValue, FormModel, FormState};

#[derive(Clone, calmform::form::FormModel)]
#[form(rename_all = "camelCase")]
struct SignupForm {
    email_address: String,
    newsletter: bool,
    #[form(rename = "attachment")]
    resume: FieldValue,
}

fn main() {
    let fields = SignupForm::fields();
    let lens = fields.email_address();
    let mut model = SignupForm {
        email_address: "a@calm.form".to_string(),
        newsletter: false,
        resume: FieldValue::Null,
    };
    lens.set(&mut model, "b@calm.form".to_string());
    assert_eq!(lens.key().as_str(), "emailAddress");
    assert_eq!(lens.get(&model), "b@calm.form");
    assert_eq!(fields.resume().key().as_str(), "attachment");

    let state = model.to_state();
    assert_eq!(
        state.keys().collect::<Vec<_>>(),
        vec![
            FieldKey::new("emailAddress"),
            FieldKey::new("newsletter"),
            FieldKey::new("attachment"),
        ]
    );

    let decoded = SignupForm::from_state(&state).unwrap();
    assert!(!decoded.newsletter);

    let broken = FormState::new().with(FieldKey::new("emailAddress"), true);
    let errors = SignupForm::from_state(&broken).err().unwrap();
    assert_eq!(
        errors.message(FieldKey::new("emailAddress")),
        Some("Expected string, received boolean")
    );
    assert_eq!(errors.message(FieldKey::new("newsletter")), Some("Required"));
    assert!(!errors.contains(FieldKey::new("attachment")));
}
