//! Wizard steps.
//!
//! ```text
//! Splash ─(timer)─> DietType ─> FoodCategory ─> Mood ─> Alcohol ─(submit)─> Loading
//!                                                                          │      │
//!                                                                     Results    Error
//! ```
//!
//! Start Over returns any step to `Splash`; Retry returns `Error` to `Loading`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Step {
    Splash,
    DietType,
    FoodCategory,
    Mood,
    Alcohol,
    Loading,
    Results,
    /// Provider failure; offers retry or start over.
    Error,
}

impl Step {
    /// The four steps that each record one preference, in the order they are asked.
    pub const QUESTIONS: [Step; 4] = [Step::DietType, Step::FoodCategory, Step::Mood, Step::Alcohol];

    /// Next step on the happy path, or `None` where only an external event moves on.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Splash => Some(Self::DietType),
            Self::DietType => Some(Self::FoodCategory),
            Self::FoodCategory => Some(Self::Mood),
            Self::Mood => Some(Self::Alcohol),
            Self::Alcohol => Some(Self::Loading),
            Self::Loading => Some(Self::Results),
            Self::Results | Self::Error => None,
        }
    }

    /// Position among [`Step::QUESTIONS`], if this step asks for a preference.
    pub fn question_index(self) -> Option<usize> {
        Self::QUESTIONS.iter().position(|s| *s == self)
    }

    #[inline]
    pub fn is_question(self) -> bool {
        self.question_index().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn happy_path_visits_every_step_once() {
        let mut visited = vec![Step::Splash];
        let mut current = Step::Splash;
        while let Some(next) = current.next() {
            visited.push(next);
            current = next;
        }
        assert_eq!(
            visited,
            vec![
                Step::Splash,
                Step::DietType,
                Step::FoodCategory,
                Step::Mood,
                Step::Alcohol,
                Step::Loading,
                Step::Results,
            ]
        );
    }

    #[test]
    fn only_question_steps_have_an_index() {
        for step in Step::iter() {
            let expected = matches!(
                step,
                Step::DietType | Step::FoodCategory | Step::Mood | Step::Alcohol
            );
            assert_eq!(step.is_question(), expected, "{step}");
        }
        assert_eq!(Step::Mood.question_index(), Some(2));
    }

    #[test]
    fn names_match_wire_form() {
        assert_eq!(Step::FoodCategory.to_string(), "foodCategory");
        assert_eq!("dietType".parse::<Step>().unwrap(), Step::DietType);
        assert_eq!(
            serde_json::to_string(&Step::Results).unwrap(),
            "\"results\""
        );
    }
}
