use crate::core::store::{LocalStore, THEME_KEY};
use anyhow::anyhow;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Theme::Light => "light",
                Theme::Dark => "dark",
            }
        )
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow!("Invalid theme: {}", s)),
        }
    }
}

/// Persisted display preferences.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn LocalStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// The saved theme, `Light` when nothing valid is stored.
    pub async fn theme(&self) -> Theme {
        match self.store.get(THEME_KEY).await {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring saved theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "Could not read saved theme");
                Theme::default()
            }
        }
    }

    pub async fn set_theme(&self, theme: Theme) {
        match self.store.set(THEME_KEY, &theme.to_string()).await {
            Ok(()) => debug!("Saved theme {}", theme),
            Err(e) => error!(error = %e, "Failed to save theme"),
        }
    }

    pub async fn toggle_theme(&self) -> Theme {
        let theme = self.theme().await.toggled();
        self.set_theme(theme).await;
        theme
    }
}
