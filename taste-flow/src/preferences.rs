use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::step::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DietType {
    Vegetarian,
    NonVegetarian,
}

impl DietType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::NonVegetarian => "Non-Vegetarian",
        }
    }
}

/// Cuisines offered on the food category step, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum FoodCategory {
    Italian,
    Asian,
    Mexican,
    Indian,
    American,
    Mediterranean,
}

/// Moods offered on the mood step, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum Mood {
    Happy,
    Adventurous,
    Comfort,
    Energetic,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlcoholPreference {
    Yes,
    No,
}

impl AlcoholPreference {
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// One answer to one question step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum Selection {
    DietType(DietType),
    FoodCategory(FoodCategory),
    Mood(Mood),
    Alcohol(AlcoholPreference),
}

impl Selection {
    /// The step on which this selection is offered.
    pub fn step(&self) -> Step {
        match self {
            Selection::DietType(_) => Step::DietType,
            Selection::FoodCategory(_) => Step::FoodCategory,
            Selection::Mood(_) => Step::Mood,
            Selection::Alcohol(_) => Step::Alcohol,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Selection::DietType(d) => d.label().to_string(),
            Selection::FoodCategory(c) => c.to_string(),
            Selection::Mood(m) => m.to_string(),
            Selection::Alcohol(a) => a.label().to_string(),
        }
    }

    /// Every selection offered on `step`, in display order. Empty for non-question steps.
    pub fn options_for(step: Step) -> Vec<Selection> {
        match step {
            Step::DietType => DietType::iter().map(Selection::DietType).collect(),
            Step::FoodCategory => FoodCategory::iter().map(Selection::FoodCategory).collect(),
            Step::Mood => Mood::iter().map(Selection::Mood).collect(),
            Step::Alcohol => AlcoholPreference::iter().map(Selection::Alcohol).collect(),
            Step::Splash | Step::Loading | Step::Results | Step::Error => Vec::new(),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::DietType(d) => write!(f, "dietType={d}"),
            Selection::FoodCategory(c) => write!(f, "foodCategory={c}"),
            Selection::Mood(m) => write!(f, "mood={m}"),
            Selection::Alcohol(a) => write!(f, "alcohol={a}"),
        }
    }
}

/// Choices accumulated over the question steps. Unset fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
    #[serde(default)]
    pub diet_type: Option<DietType>,
    #[serde(default)]
    pub food_category: Option<FoodCategory>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub alcohol: Option<AlcoholPreference>,
}

impl PreferenceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, selection: Selection) {
        match selection {
            Selection::DietType(d) => self.diet_type = Some(d),
            Selection::FoodCategory(c) => self.food_category = Some(c),
            Selection::Mood(m) => self.mood = Some(m),
            Selection::Alcohol(a) => self.alcohol = Some(a),
        }
    }

    /// Whether `selection` is the value currently recorded for its field.
    pub fn is_selected(&self, selection: &Selection) -> bool {
        match selection {
            Selection::DietType(d) => self.diet_type == Some(*d),
            Selection::FoodCategory(c) => self.food_category == Some(*c),
            Selection::Mood(m) => self.mood == Some(*m),
            Selection::Alcohol(a) => self.alcohol == Some(*a),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.diet_type.is_some()
            && self.food_category.is_some()
            && self.mood.is_some()
            && self.alcohol.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
