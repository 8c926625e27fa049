//! Render model for each step.
//!
//! Rendering is a pure function of a [`WizardSnapshot`]; it never changes state and
//! never reaches the provider, so a front-end may render as often as it likes.

use serde::Serialize;

use crate::{
    preferences::Selection,
    step::Step,
    wizard::{UserAction, WizardSnapshot},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub step: Step,
    pub title: String,
    pub subtitle: String,
    /// Answers offered on a question step.
    pub options: Vec<ViewOption>,
    pub cards: Vec<DishCard>,
    /// Buttons that are not answers (start over, try again).
    pub actions: Vec<ViewAction>,
    pub progress: Option<Progress>,
    /// Whether a spinner should be shown.
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOption {
    pub label: String,
    pub selected: bool,
    pub action: UserAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewAction {
    pub label: String,
    pub action: UserAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishCard {
    pub name: String,
    pub description: String,
    pub image: String,
    pub rating: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSegment {
    pub step: Step,
    pub filled: bool,
    pub current: bool,
}

/// Four-segment indicator shown on the question steps only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub segments: Vec<ProgressSegment>,
}

impl Progress {
    fn for_step(step: Step) -> Option<Self> {
        let index = step.question_index()?;
        let segments = Step::QUESTIONS
            .iter()
            .enumerate()
            .map(|(i, s)| ProgressSegment {
                step: *s,
                filled: index >= i,
                current: index == i,
            })
            .collect();
        Some(Self { segments })
    }
}

impl View {
    pub fn render(snapshot: &WizardSnapshot) -> Self {
        let step = snapshot.step;
        let (title, subtitle) = match step {
            Step::Splash => ("Taste Finder", "Discover your perfect dish"),
            Step::DietType => ("Dietary Preference", "What type of food do you prefer?"),
            Step::FoodCategory => ("Cuisine", "What cuisine are you craving today?"),
            Step::Mood => ("Your Mood", "How are you feeling today?"),
            Step::Alcohol => ("Alcohol Preference", "Would you like alcohol with your meal?"),
            Step::Loading => (
                "Curating perfect dishes for you...",
                "Based on your preferences, our AI is finding the best matches",
            ),
            Step::Results => ("Your Perfect Matches", "Based on your unique preferences"),
            Step::Error => (
                "Something went wrong",
                "We couldn't fetch recommendations this time",
            ),
        };

        let options = Selection::options_for(step)
            .into_iter()
            .map(|selection| ViewOption {
                label: selection.label(),
                selected: snapshot.preferences.is_selected(&selection),
                action: UserAction::Select(selection),
            })
            .collect();

        let cards = match step {
            Step::Results => snapshot
                .recommendations
                .iter()
                .map(|dish| DishCard {
                    name: dish.name.clone(),
                    description: dish.description.clone(),
                    image: dish.image_or_placeholder().to_string(),
                    rating: dish.rating,
                })
                .collect(),
            _ => Vec::new(),
        };

        let start_over = ViewAction {
            label: "Start Over".to_string(),
            action: UserAction::StartOver,
        };
        let actions = match step {
            Step::Results => vec![start_over],
            Step::Error => vec![
                ViewAction {
                    label: "Try Again".to_string(),
                    action: UserAction::Retry,
                },
                start_over,
            ],
            Step::Splash
            | Step::DietType
            | Step::FoodCategory
            | Step::Mood
            | Step::Alcohol
            | Step::Loading => Vec::new(),
        };

        let subtitle = match (step, &snapshot.error) {
            (Step::Error, Some(error)) => format!("{subtitle}: {error}"),
            _ => subtitle.to_string(),
        };

        Self {
            step,
            title: title.to_string(),
            subtitle,
            options,
            cards,
            actions,
            progress: Progress::for_step(step),
            busy: step == Step::Loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        preferences::{DietType, FoodCategory},
        provider::ProviderError,
        recommendation::{DishRecommendation, PLACEHOLDER_IMAGE},
        wizard::{Input, Wizard},
    };

    fn wizard_on(step: Step) -> Wizard {
        let mut wizard = Wizard::new();
        if step == Step::Splash {
            return wizard;
        }
        wizard.apply(Input::SplashElapsed).unwrap();
        while wizard.step() != step {
            let option = Selection::options_for(wizard.step())[0];
            wizard.apply(option.into()).unwrap();
        }
        wizard
    }

    #[test]
    fn splash_has_no_inputs_and_no_progress() {
        let view = View::render(&Wizard::new().snapshot());
        assert_eq!(view.title, "Taste Finder");
        assert!(view.options.is_empty());
        assert!(view.actions.is_empty());
        assert!(view.progress.is_none());
    }

    #[test]
    fn food_category_lists_six_cuisines() {
        let view = View::render(&wizard_on(Step::FoodCategory).snapshot());
        assert_eq!(view.title, "Cuisine");
        assert_eq!(view.options.len(), 6);
        assert_eq!(view.options[0].label, "Italian");
        assert_eq!(
            view.options[0].action,
            UserAction::Select(Selection::FoodCategory(FoodCategory::Italian))
        );
    }

    #[test]
    fn progress_fills_up_to_current_question() {
        let view = View::render(&wizard_on(Step::Mood).snapshot());
        let progress = view.progress.unwrap();
        let filled: Vec<bool> = progress.segments.iter().map(|s| s.filled).collect();
        let current: Vec<bool> = progress.segments.iter().map(|s| s.current).collect();
        assert_eq!(filled, [true, true, true, false]);
        assert_eq!(current, [false, false, true, false]);
    }

    #[test]
    fn recorded_choice_is_marked_selected() {
        let mut snapshot = wizard_on(Step::DietType).snapshot();
        snapshot.preferences.diet_type = Some(DietType::NonVegetarian);
        let view = View::render(&snapshot);
        let selected: Vec<&str> = view
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(selected, ["Non-Vegetarian"]);
    }

    #[test]
    fn results_show_cards_with_placeholder_fallback() {
        let mut wizard = wizard_on(Step::Loading);
        wizard
            .apply(Input::RecommendationsReady(vec![
                DishRecommendation::new("Soup", "Warm.", 4.1),
                DishRecommendation::new("Stew", "Hearty.", 4.3).with_image("/stew.png"),
            ]))
            .unwrap();
        let view = View::render(&wizard.snapshot());
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].image, PLACEHOLDER_IMAGE);
        assert_eq!(view.cards[1].image, "/stew.png");
        assert_eq!(view.actions[0].action, UserAction::StartOver);
        assert!(view.progress.is_none());
    }

    #[test]
    fn error_offers_retry_and_start_over() {
        let mut wizard = wizard_on(Step::Loading);
        wizard
            .apply(Input::RecommendationsFailed(ProviderError::Rejected(
                "offline".into(),
            )))
            .unwrap();
        let view = View::render(&wizard.snapshot());
        let actions: Vec<UserAction> = view.actions.iter().map(|a| a.action).collect();
        assert_eq!(actions, [UserAction::Retry, UserAction::StartOver]);
        assert!(view.subtitle.contains("offline"));
    }

    #[test]
    fn rendering_does_not_change_state() {
        let wizard = wizard_on(Step::Alcohol);
        let before = wizard.clone();
        let first = View::render(&wizard.snapshot());
        let second = View::render(&wizard.snapshot());
        assert_eq!(first, second);
        assert_eq!(wizard, before);
        assert!(View::render(&wizard_on(Step::Loading).snapshot()).busy);
    }
}
