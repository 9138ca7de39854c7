use tracing::debug;

use super::controller::{FormController, FormResult};
use super::schema::Rule;
use super::validation::{FieldLens, FormModel};
use super::value::{Accepts, FieldKey};
use crate::widgets::{BlurEffect, Widget};

/// Connects a widget to one field of a form.
pub trait FieldBinder<T: FormModel> {
    fn bind<L, W>(&self, lens: L, widget: W) -> FormResult<BoundField<T, L, W>>
    where
        L: FieldLens<T>,
        L::Value: Accepts<W::Value>,
        W: Widget;
}

impl<T: FormModel> FieldBinder<T> for FormController<T> {
    fn bind<L, W>(&self, lens: L, widget: W) -> FormResult<BoundField<T, L, W>>
    where
        L: FieldLens<T>,
        L::Value: Accepts<W::Value>,
        W: Widget,
    {
        let _ = self.known_key(lens.key())?;
        Ok(BoundField {
            controller: self.clone(),
            lens,
            widget,
        })
    }
}

#[derive(Clone)]
pub struct BoundField<T: FormModel, L, W> {
    controller: FormController<T>,
    lens: L,
    widget: W,
}

impl<T, L, W> BoundField<T, L, W>
where
    T: FormModel,
    L: FieldLens<T>,
    L::Value: Accepts<W::Value>,
    W: Widget,
{
    pub fn key(&self) -> FieldKey {
        self.lens.key()
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn lens(&self) -> L {
        self.lens
    }

    pub fn value(&self) -> FormResult<Option<L::Value>> {
        self.controller.get(self.lens)
    }

    /// Pushes a value emitted by the widget. Returns `false` when the widget
    /// could not have produced it (an option outside its data, a file of a
    /// refused type) and the state is left untouched.
    pub fn change(&self, next: W::Value) -> FormResult<bool> {
        if self.widget.props().disabled {
            debug!(field = %self.key(), "change ignored on disabled widget");
            return Ok(false);
        }
        let Some(normalized) = self.widget.normalize(next) else {
            debug!(field = %self.key(), widget = %self.widget.kind(), "widget rejected value");
            return Ok(false);
        };
        self.controller.set_widget_error(self.key(), None)?;
        self.controller
            .set(self.lens, <L::Value as Accepts<W::Value>>::accept(normalized))?;
        Ok(true)
    }

    /// Marks the field touched after applying the widget's blur behaviour.
    pub fn blur(&self) -> FormResult<()> {
        let key = self.key();
        if let Some(current) = self.controller.decode::<W::Value>(key)? {
            match self.widget.on_blur(&current) {
                BlurEffect::Keep => self.controller.set_widget_error(key, None)?,
                BlurEffect::Replace(next) => {
                    self.controller.set_widget_error(key, None)?;
                    self.controller
                        .set(self.lens, <L::Value as Accepts<W::Value>>::accept(next))?;
                }
                BlurEffect::Invalid(message) => {
                    self.controller.set_widget_error(key, Some(message))?
                }
            }
        }
        self.controller.touch_key(key)
    }

    pub fn error(&self) -> FormResult<Option<String>> {
        self.controller.display_error(self.key())
    }

    pub fn is_required(&self) -> bool {
        self.widget.props().with_asterisk
            || self
                .controller
                .schema()
                .field(self.key())
                .is_some_and(|field| matches!(field.rule, Rule::RequiredString { .. }))
    }

    pub fn is_dirty(&self) -> FormResult<bool> {
        Ok(self
            .controller
            .field_meta(self.lens)?
            .is_some_and(|meta| meta.dirty))
    }

    pub fn is_touched(&self) -> FormResult<bool> {
        Ok(self
            .controller
            .field_meta(self.lens)?
            .is_some_and(|meta| meta.touched))
    }
}
