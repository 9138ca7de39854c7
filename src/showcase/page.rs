use super::form::{
    ShowcaseValues, ShowcaseValuesAutocompleteLens, ShowcaseValuesCheckboxLens,
    ShowcaseValuesChipLens, ShowcaseValuesChipgroupMultipleLens,
    ShowcaseValuesChipgroupSingleLens, ShowcaseValuesColorInputLens,
    ShowcaseValuesColorPickerLens, ShowcaseValuesFileInputLens, ShowcaseValuesJsonInputLens,
    ShowcaseValuesMultiSelectLens, ShowcaseValuesNativeSelectLens, ShowcaseValuesNumberInputLens,
    ShowcaseValuesPasswordInputLens, ShowcaseValuesPinInputLens, ShowcaseValuesRadioLens,
    ShowcaseValuesRatingLens, ShowcaseValuesSegmentedControlLens, ShowcaseValuesSelectLens,
    ShowcaseValuesSliderLens, ShowcaseValuesSwitchLens, ShowcaseValuesTextInputLens,
    ShowcaseValuesTextareaLens,
};
use crate::contracts::FieldLike;
use crate::form::{BoundField, FormController, FormModel};
use crate::page::{FormView, HomePage, PageError, Welcome};
use crate::widgets::{
    Autocomplete, Checkbox, Chip, ChipGroup, ColorInput, ColorPicker, FileInput, JsonInput,
    MultiChipGroup, MultiSelect, NativeSelect, NumberInput, PasswordInput, PinInput, RadioGroup,
    Rating, SegmentedControl, Select, SelectOption, Slider, SliderMark, Switch, TextInput,
    Textarea,
};

type Bound<L, W> = BoundField<ShowcaseValues, L, W>;

const FRAMEWORKS: [(&str, &str); 4] = [
    ("react", "React"),
    ("ng", "Angular"),
    ("svelte", "Svelte"),
    ("vue", "Vue"),
];

/// Typed handles to every widget of the showcase form.
#[derive(Clone)]
pub struct ShowcaseBindings {
    pub autocomplete: Bound<ShowcaseValuesAutocompleteLens, Autocomplete>,
    pub checkbox: Bound<ShowcaseValuesCheckboxLens, Checkbox>,
    pub chip: Bound<ShowcaseValuesChipLens, Chip>,
    pub chipgroup_single: Bound<ShowcaseValuesChipgroupSingleLens, ChipGroup>,
    pub chipgroup_multiple: Bound<ShowcaseValuesChipgroupMultipleLens, MultiChipGroup>,
    pub color_input: Bound<ShowcaseValuesColorInputLens, ColorInput>,
    pub color_picker: Bound<ShowcaseValuesColorPickerLens, ColorPicker>,
    pub file_input: Bound<ShowcaseValuesFileInputLens, FileInput>,
    pub json_input: Bound<ShowcaseValuesJsonInputLens, JsonInput>,
    pub multi_select: Bound<ShowcaseValuesMultiSelectLens, MultiSelect>,
    pub native_select: Bound<ShowcaseValuesNativeSelectLens, NativeSelect>,
    pub number_input: Bound<ShowcaseValuesNumberInputLens, NumberInput>,
    pub password_input: Bound<ShowcaseValuesPasswordInputLens, PasswordInput>,
    pub pin_input: Bound<ShowcaseValuesPinInputLens, PinInput>,
    pub radio: Bound<ShowcaseValuesRadioLens, RadioGroup>,
    pub rating: Bound<ShowcaseValuesRatingLens, Rating>,
    pub segmented_control: Bound<ShowcaseValuesSegmentedControlLens, SegmentedControl>,
    pub select: Bound<ShowcaseValuesSelectLens, Select>,
    pub slider: Bound<ShowcaseValuesSliderLens, Slider>,
    pub switch: Bound<ShowcaseValuesSwitchLens, Switch>,
    pub textarea: Bound<ShowcaseValuesTextareaLens, Textarea>,
    pub text_input: Bound<ShowcaseValuesTextInputLens, TextInput>,
}

pub fn welcome() -> Welcome {
    Welcome::new(
        "Welcome to calmform",
        "Every input below is bound to one form controller. \
         Submit the form to see the validated values in the console.",
    )
}

/// Lays out the showcase form on a home page and binds each widget to
/// `controller`.
pub fn build_page(
    controller: &FormController<ShowcaseValues>,
) -> Result<(HomePage, ShowcaseBindings), PageError> {
    let f = ShowcaseValues::fields();
    let mut form = FormView::new().submit_label("Submit");

    let autocomplete = form.bind(
        controller,
        f.autocomplete(),
        Autocomplete::new()
            .label("Your favorite framework/library")
            .placeholder("Pick one")
            .data(["React", "Angular", "Svelte", "Vue"]),
    )?;
    let checkbox = form.bind(
        controller,
        f.checkbox(),
        Checkbox::new()
            .value("Test")
            .label("I agree to sell my privacy"),
    )?;
    let chip = form.bind(controller, f.chip(), Chip::new().label("Awesome chip"))?;
    let chipgroup_single = form.bind(
        controller,
        f.chipgroup_single(),
        ChipGroup::new().data(["1", "2", "3"]),
    )?;
    let chipgroup_multiple = form.bind(
        controller,
        f.chipgroup_multiple(),
        ChipGroup::new()
            .data([("react", "React"), ("ng", "Angular"), ("svelte", "Svelte")])
            .multiple(),
    )?;
    let color_input = form.bind(
        controller,
        f.color_input(),
        ColorInput::new()
            .placeholder("Pick color")
            .label("Your favorite color"),
    )?;
    let color_picker = form.bind(controller, f.color_picker(), ColorPicker::new())?;
    let file_input = form.bind(
        controller,
        f.file_input(),
        FileInput::new()
            .placeholder("Pick file")
            .label("Your resume")
            .with_asterisk(true)
            .clearable(true),
    )?;
    let json_input = form.bind(
        controller,
        f.json_input(),
        JsonInput::new()
            .label("Your package.json")
            .placeholder("Textarea will autosize to fit the content")
            .validation_error("Invalid json")
            .format_on_blur(true)
            .autosize(true)
            .min_rows(4),
    )?;
    let multi_select = form.bind(
        controller,
        f.multi_select(),
        MultiSelect::new()
            .data(FRAMEWORKS)
            .option(("riot", "Riot"))
            .option(("next", "Next.js"))
            .option(("blitz", "Blitz.js"))
            .label("Your favorite frameworks/libraries")
            .placeholder("Pick all that you like"),
    )?;
    let native_select = form.bind(
        controller,
        f.native_select(),
        NativeSelect::new()
            .data(["React", "Vue", "Angular", "Svelte"])
            .label("Select your favorite framework/library")
            .description("This is anonymous")
            .with_asterisk(true),
    )?;
    let number_input = form.bind(
        controller,
        f.number_input(),
        NumberInput::new()
            .placeholder("Your age")
            .label("Your age")
            .with_asterisk(true),
    )?;
    let password_input = form.bind(
        controller,
        f.password_input(),
        PasswordInput::new()
            .placeholder("Password")
            .label("Password")
            .description(
                "Password must include at least one letter, number and special character",
            )
            .with_asterisk(true),
    )?;
    let pin_input = form.bind(controller, f.pin_input(), PinInput::new())?;
    let radio = form.bind(
        controller,
        f.radio(),
        RadioGroup::new()
            .data([
                SelectOption::labeled("react", "React"),
                SelectOption::labeled("svelte", "Svelte"),
                SelectOption::labeled("ng", "Angular"),
                SelectOption::labeled("vue", "Vue"),
            ])
            .label("Select your favorite framework/library")
            .description("This is anonymous")
            .with_asterisk(true),
    )?;
    let rating = form.bind(controller, f.rating(), Rating::new())?;
    let segmented_control = form.bind(
        controller,
        f.segmented_control(),
        SegmentedControl::new().data([
            ("react", "React"),
            ("ng", "Angular"),
            ("vue", "Vue"),
            ("svelte", "Svelte"),
        ]),
    )?;
    let select = form.bind(
        controller,
        f.select(),
        Select::new()
            .data(FRAMEWORKS)
            .label("Your favorite framework/library")
            .placeholder("Pick one"),
    )?;
    let slider = form.bind(
        controller,
        f.slider(),
        Slider::new().marks([
            SliderMark::new(20).label("20%"),
            SliderMark::new(50).label("50%"),
            SliderMark::new(80).label("80%"),
        ]),
    )?;
    let switch = form.bind(
        controller,
        f.switch(),
        Switch::new().label("I agree to sell my privacy"),
    )?;
    let textarea = form.bind(
        controller,
        f.textarea(),
        Textarea::new()
            .placeholder("Your comment")
            .label("Your comment")
            .with_asterisk(true),
    )?;
    let text_input = form.bind(
        controller,
        f.text_input(),
        TextInput::new()
            .placeholder("Your name")
            .label("Full name")
            .with_asterisk(true),
    )?;

    let bindings = ShowcaseBindings {
        autocomplete,
        checkbox,
        chip,
        chipgroup_single,
        chipgroup_multiple,
        color_input,
        color_picker,
        file_input,
        json_input,
        multi_select,
        native_select,
        number_input,
        password_input,
        pin_input,
        radio,
        rating,
        segmented_control,
        select,
        slider,
        switch,
        textarea,
        text_input,
    };
    Ok((HomePage::new(welcome(), form), bindings))
}
