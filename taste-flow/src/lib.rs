pub mod config;
pub mod controller;
pub mod error;
pub mod preferences;
pub mod provider;
pub mod recommendation;
pub mod registry;
pub mod step;
pub mod view;
pub mod wizard;

// Re-export commonly used types
pub use config::WizardConfig;
pub use controller::{WizardController, WizardHandle};
pub use error::{FlowError, Result};
pub use preferences::{AlcoholPreference, DietType, FoodCategory, Mood, PreferenceRecord, Selection};
pub use provider::{MockProvider, ProviderError, RecommendationProvider};
pub use recommendation::{DishRecommendation, PLACEHOLDER_IMAGE};
pub use registry::SessionRegistry;
pub use step::Step;
pub use view::View;
pub use wizard::{Effect, Input, Transition, UserAction, Wizard, WizardSnapshot};
