mod focus;
mod markup;
mod renderer;
mod state;
pub mod theme;
mod updates;
mod widgets;

pub use focus::{EscapeOutcome, FocusTarget};
pub use renderer::render;
pub use state::{Overlay, SettingsForm, SettingsSubmission, ViewState};
pub use theme::Theme;
pub use updates::{Update, UpdateLoop};
