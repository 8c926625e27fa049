use taste_flow::{UserAction, View};

/// What a line typed by the user asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Action(UserAction),
    Quit,
    Unknown(String),
}

fn action_key(action: &UserAction) -> &'static str {
    match action {
        UserAction::StartOver => "s",
        UserAction::Retry => "r",
        UserAction::Select(_) => "",
    }
}

/// Map a typed line onto the view currently on screen.
///
/// Options are picked by their 1-based number, buttons by their letter.
pub fn parse_command(line: &str, view: &View) -> Command {
    let input = line.trim().to_lowercase();
    if matches!(input.as_str(), "q" | "quit" | "exit") {
        return Command::Quit;
    }

    if let Ok(n) = input.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| view.options.get(i)) {
            Some(option) => Command::Action(option.action),
            None => Command::Unknown(input),
        };
    }

    view.actions
        .iter()
        .find(|a| action_key(&a.action) == input)
        .map(|a| Command::Action(a.action))
        .unwrap_or(Command::Unknown(input))
}

pub fn render_text(view: &View) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n== {} ==\n{}\n", view.title, view.subtitle));

    for (i, option) in view.options.iter().enumerate() {
        let mark = if option.selected { "  (selected)" } else { "" };
        out.push_str(&format!("  {}) {}{}\n", i + 1, option.label, mark));
    }

    for card in &view.cards {
        out.push_str(&format!(
            "  * {:.1}  {}\n      {}\n      image: {}\n",
            card.rating, card.name, card.description, card.image
        ));
    }

    if view.busy {
        out.push_str("  ...\n");
    }

    for action in &view.actions {
        out.push_str(&format!("  [{}] {}\n", action_key(&action.action), action.label));
    }

    if let Some(progress) = &view.progress {
        let bar: String = progress
            .segments
            .iter()
            .map(|s| match (s.current, s.filled) {
                (true, _) => '@',
                (false, true) => '#',
                (false, false) => '.',
            })
            .collect();
        out.push_str(&format!("  [{bar}]\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taste_flow::{
        DietType, DishRecommendation, Input, MockProvider, PreferenceRecord, Selection, Step,
        Wizard,
    };

    fn diet_view() -> View {
        let mut wizard = Wizard::new();
        wizard.apply(Input::SplashElapsed).unwrap();
        View::render(&wizard.snapshot())
    }

    fn results_view() -> View {
        let mut wizard = Wizard::new();
        wizard.apply(Input::SplashElapsed).unwrap();
        while wizard.step() != Step::Loading {
            let option = Selection::options_for(wizard.step())[0];
            wizard.apply(option.into()).unwrap();
        }
        let dishes: Vec<DishRecommendation> = MockProvider::dishes_for(&PreferenceRecord {
            diet_type: Some(DietType::Vegetarian),
            ..PreferenceRecord::default()
        });
        wizard.apply(Input::RecommendationsReady(dishes)).unwrap();
        View::render(&wizard.snapshot())
    }

    #[test]
    fn numbers_pick_options() {
        let view = diet_view();
        assert_eq!(
            parse_command(" 2 ", &view),
            Command::Action(UserAction::Select(Selection::DietType(
                DietType::NonVegetarian
            )))
        );
        assert!(matches!(parse_command("0", &view), Command::Unknown(_)));
        assert!(matches!(parse_command("3", &view), Command::Unknown(_)));
    }

    #[test]
    fn letters_pick_buttons_only_when_shown() {
        assert!(matches!(parse_command("s", &diet_view()), Command::Unknown(_)));
        assert_eq!(
            parse_command("S", &results_view()),
            Command::Action(UserAction::StartOver)
        );
        assert_eq!(parse_command("quit", &diet_view()), Command::Quit);
    }

    #[test]
    fn text_lists_options_progress_and_cards() {
        let text = render_text(&diet_view());
        assert!(text.contains("== Dietary Preference =="));
        assert!(text.contains("1) Vegetarian"));
        assert!(text.contains("2) Non-Vegetarian"));
        assert!(text.contains("[@...]"));

        let text = render_text(&results_view());
        assert!(text.contains("Mushroom Risotto"));
        assert!(text.contains("4.8"));
        assert!(text.contains("[s] Start Over"));
    }
}
