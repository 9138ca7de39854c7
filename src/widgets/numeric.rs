use rust_decimal::{Decimal, RoundingStrategy};

use super::{FieldProps, Widget, WidgetKind};
use crate::impl_field_like;

fn ordered(a: Decimal, b: Decimal) -> (Decimal, Decimal) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Rounds `value` to the nearest multiple of `step` counted from `origin`.
fn snap(value: Decimal, origin: Decimal, step: Decimal) -> Decimal {
    if step <= Decimal::ZERO {
        return value;
    }
    value
        .checked_sub(origin)
        .and_then(|offset| offset.checked_div(step))
        .map(|steps| steps.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|steps| steps.checked_mul(step))
        .and_then(|offset| origin.checked_add(offset))
        .unwrap_or(value)
}

#[derive(Clone, Debug, Default)]
pub struct NumberInput {
    props: FieldProps,
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl NumberInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: impl Into<Decimal>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Decimal>) -> Self {
        self.max = Some(max.into());
        self
    }
}

impl Widget for NumberInput {
    type Value = Decimal;

    fn kind(&self) -> WidgetKind {
        WidgetKind::NumberInput
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }

    fn normalize(&self, value: Decimal) -> Option<Decimal> {
        let mut value = value;
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        Some(value)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SliderMark {
    pub value: Decimal,
    pub label: Option<String>,
}

impl SliderMark {
    pub fn new(value: impl Into<Decimal>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct Slider {
    props: FieldProps,
    min: Decimal,
    max: Decimal,
    step: Decimal,
    marks: Vec<SliderMark>,
}

impl Default for Slider {
    fn default() -> Self {
        Self {
            props: FieldProps::default(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
            step: Decimal::ONE,
            marks: Vec::new(),
        }
    }
}

impl Slider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, min: impl Into<Decimal>, max: impl Into<Decimal>) -> Self {
        let (min, max) = ordered(min.into(), max.into());
        self.min = min;
        self.max = max;
        self
    }

    /// Non-positive steps are ignored.
    pub fn step(mut self, step: impl Into<Decimal>) -> Self {
        let step = step.into();
        if step > Decimal::ZERO {
            self.step = step;
        }
        self
    }

    pub fn mark(mut self, mark: SliderMark) -> Self {
        self.marks.push(mark);
        self
    }

    pub fn marks(mut self, marks: impl IntoIterator<Item = SliderMark>) -> Self {
        self.marks.extend(marks);
        self
    }

    pub fn mark_list(&self) -> &[SliderMark] {
        &self.marks
    }

    pub fn bounds(&self) -> (Decimal, Decimal) {
        (self.min, self.max)
    }
}

impl Widget for Slider {
    type Value = Decimal;

    fn kind(&self) -> WidgetKind {
        WidgetKind::Slider
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }

    fn normalize(&self, value: Decimal) -> Option<Decimal> {
        let clamped = value.clamp(self.min, self.max);
        Some(snap(clamped, self.min, self.step).clamp(self.min, self.max))
    }
}

#[derive(Clone, Debug)]
pub struct Rating {
    props: FieldProps,
    count: u32,
    fractions: u32,
}

impl Default for Rating {
    fn default() -> Self {
        Self {
            props: FieldProps::default(),
            count: 5,
            fractions: 1,
        }
    }
}

impl Rating {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    /// Number of selectable parts per symbol; 2 allows half ratings.
    pub fn fractions(mut self, fractions: u32) -> Self {
        self.fractions = fractions.max(1);
        self
    }

    pub fn symbol_count(&self) -> u32 {
        self.count
    }
}

impl Widget for Rating {
    type Value = Decimal;

    fn kind(&self) -> WidgetKind {
        WidgetKind::Rating
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }

    fn normalize(&self, value: Decimal) -> Option<Decimal> {
        let max = Decimal::from(self.count);
        let step = Decimal::ONE / Decimal::from(self.fractions);
        let clamped = value.clamp(Decimal::ZERO, max);
        Some(snap(clamped, Decimal::ZERO, step).clamp(Decimal::ZERO, max))
    }
}

impl_field_like!(NumberInput, Slider, Rating);
