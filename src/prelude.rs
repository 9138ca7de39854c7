pub use crate::contracts::FieldLike;
pub use crate::form::{
    BoundField, ConsoleSink, FieldBinder, FieldErrors, FieldKey, FieldLens, FieldValidationError,
    FieldValue, FilePayload, FormController, FormError, FormModel, FormOptions, FormResult,
    FormState, RevalidateMode, Rule, Schema, SchemaError, SubmitSink, ValidationMode,
    ValidationResult,
};
pub use crate::page::{ColorSchemeToggle, FormView, HomePage, PageError, Welcome};
pub use crate::theme::ColorScheme;
pub use crate::widgets::{
    Autocomplete, Checkbox, Chip, ChipGroup, ColorInput, ColorPicker, FileInput, JsonInput,
    MultiChipGroup, MultiSelect, NativeSelect, NumberInput, PasswordInput, PinInput, PinKind,
    RadioGroup, Rating, SegmentedControl, Select, SelectOption, Slider, SliderMark, Switch,
    TextInput, Textarea, Widget, WidgetSpec,
};
