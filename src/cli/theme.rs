use super::ui;
use crate::preferences::{Preferences, Theme};
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Set(Theme),
    Toggle,
}

/// Shows the saved theme, or changes it first when an action is given.
pub async fn run(prefs: &Preferences, action: Option<ThemeAction>) -> Result<()> {
    let theme = match action {
        Some(ThemeAction::Set(theme)) => {
            prefs.set_theme(theme).await;
            theme
        }
        Some(ThemeAction::Toggle) => prefs.toggle_theme().await,
        None => prefs.theme().await,
    };
    println!(
        "Theme: {}",
        ui::style_text(&theme.to_string(), ui::StyleType::Title)
    );
    Ok(())
}
