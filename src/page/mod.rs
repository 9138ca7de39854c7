//! Page layout: a welcome banner, a colour-scheme toggle and one bound form.

use std::fmt::Write as _;

use crate::form::{
    Accepts, BoundField, FieldBinder, FieldKey, FieldLens, FormController, FormError, FormModel,
    FormResult, SchemaError,
};
use crate::theme::ColorScheme;
use crate::widgets::{Widget, WidgetSpec};

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum PageError {
    #[error("field `{0}` is already bound to another widget on this form")]
    DuplicateBinding(FieldKey),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Welcome {
    pub title: String,
    pub body: String,
}

impl Welcome {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ColorSchemeToggle {
    scheme: ColorScheme,
}

impl ColorSchemeToggle {
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn set(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    pub fn toggle(&mut self) -> ColorScheme {
        self.scheme = self.scheme.toggled();
        self.scheme
    }
}

#[derive(Clone, Debug)]
pub struct FormEntry {
    pub key: FieldKey,
    pub widget: WidgetSpec,
}

/// Ordered widgets of one form. Each field is bound at most once.
#[derive(Clone, Debug)]
pub struct FormView {
    entries: Vec<FormEntry>,
    submit_label: String,
}

impl Default for FormView {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            submit_label: "Submit".to_string(),
        }
    }
}

impl FormView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    pub fn submit_text(&self) -> &str {
        &self.submit_label
    }

    pub fn entries(&self) -> &[FormEntry] {
        &self.entries
    }

    pub fn entry(&self, key: FieldKey) -> Option<&FormEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn bind<T, B, L, W>(
        &mut self,
        binder: &B,
        lens: L,
        widget: W,
    ) -> Result<BoundField<T, L, W>, PageError>
    where
        T: FormModel,
        B: FieldBinder<T>,
        L: FieldLens<T>,
        L::Value: Accepts<W::Value>,
        W: Widget + Into<WidgetSpec>,
    {
        let key = lens.key();
        if self.entry(key).is_some() {
            return Err(PageError::DuplicateBinding(key));
        }
        let bound = binder.bind(lens, widget.clone())?;
        self.entries.push(FormEntry {
            key,
            widget: widget.into(),
        });
        Ok(bound)
    }
}

#[derive(Clone, Debug)]
pub struct HomePage {
    pub welcome: Welcome,
    pub color_scheme: ColorSchemeToggle,
    pub form: FormView,
}

impl HomePage {
    pub fn new(welcome: Welcome, form: FormView) -> Self {
        Self {
            welcome,
            color_scheme: ColorSchemeToggle::default(),
            form,
        }
    }

    /// Plain-text rendering of the page against the live form state.
    pub fn outline<T: FormModel>(&self, controller: &FormController<T>) -> FormResult<String> {
        let mut out = String::new();
        let _ = writeln!(out, "# {}", self.welcome.title);
        let _ = writeln!(out, "{}", self.welcome.body);
        let _ = writeln!(out, "[color scheme: {}]", self.color_scheme.scheme());
        let _ = writeln!(out);

        for entry in self.form.entries() {
            let props = entry.widget.props();
            let label = props.label.as_deref().unwrap_or(entry.key.as_str());
            let required = props.with_asterisk
                || controller.schema().field(entry.key).is_some_and(|field| {
                    matches!(field.rule, crate::form::Rule::RequiredString { .. })
                });
            let value = controller
                .value(entry.key)?
                .map(|value| value.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(
                out,
                "{:<18} {}{} = {}",
                entry.widget.kind().to_string(),
                label,
                if required { " *" } else { "" },
                value
            );
            if let Some(error) = controller.display_error(entry.key)? {
                let _ = write!(out, "  ! {error}");
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out);
        let _ = write!(out, "[{}]", self.form.submit_text());
        Ok(out)
    }
}
