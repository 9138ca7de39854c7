use super::{FieldProps, Widget, WidgetKind};
use crate::form::FilePayload;
use crate::impl_field_like;

#[derive(Clone, Debug, Default)]
pub struct FileInput {
    props: FieldProps,
    accept: Vec<String>,
    clearable: bool,
}

impl FileInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comma-separated MIME types, `image/*` style wildcards allowed.
    pub fn accept(mut self, accept: &str) -> Self {
        self.accept = accept
            .split(',')
            .map(|part| part.trim().to_ascii_lowercase())
            .filter(|part| !part.is_empty())
            .collect();
        self
    }

    /// Without a clear button the widget never emits an empty selection.
    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    fn accepts(&self, file: &FilePayload) -> bool {
        if self.accept.is_empty() {
            return true;
        }
        let Some(mime) = file.mime.as_deref().map(str::to_ascii_lowercase) else {
            return false;
        };
        self.accept.iter().any(|pattern| match pattern.strip_suffix("/*") {
            Some(group) => mime
                .split_once('/')
                .is_some_and(|(file_group, _)| file_group == group),
            None => *pattern == mime,
        })
    }
}

impl Widget for FileInput {
    type Value = Option<FilePayload>;

    fn kind(&self) -> WidgetKind {
        WidgetKind::FileInput
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }

    fn normalize(&self, value: Option<FilePayload>) -> Option<Option<FilePayload>> {
        match value {
            Some(file) if self.accepts(&file) => Some(Some(file)),
            Some(_) => None,
            None if self.clearable => Some(None),
            None => None,
        }
    }
}

impl_field_like!(FileInput);
