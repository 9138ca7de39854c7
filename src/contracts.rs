use crate::widgets::FieldProps;

/// Builder methods shared by every widget that renders as a labelled field.
pub trait FieldLike: Sized {
    fn props_mut(&mut self) -> &mut FieldProps;

    fn label(mut self, value: impl Into<String>) -> Self {
        self.props_mut().label = Some(value.into());
        self
    }

    fn description(mut self, value: impl Into<String>) -> Self {
        self.props_mut().description = Some(value.into());
        self
    }

    fn placeholder(mut self, value: impl Into<String>) -> Self {
        self.props_mut().placeholder = Some(value.into());
        self
    }

    fn with_asterisk(mut self, value: bool) -> Self {
        self.props_mut().with_asterisk = value;
        self
    }

    fn disabled(mut self, value: bool) -> Self {
        self.props_mut().disabled = value;
        self
    }
}

#[macro_export]
macro_rules! impl_field_like {
    ($($type:ty),+ $(,)?) => {
        $(
            impl $crate::contracts::FieldLike for $type {
                fn props_mut(&mut self) -> &mut $crate::widgets::FieldProps {
                    &mut self.props
                }
            }
        )+
    };
}
