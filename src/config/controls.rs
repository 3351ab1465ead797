//! Control symbol configuration
//!
//! The `[controls]` section overrides individual symbols and switches
//! optional controls on or off. Everything unspecified keeps the built-in
//! binding, so an empty section means "defaults".

use crate::controls::{Action, ControlMap, ControlSymbol};
use crate::error::ConfigurationError;
use serde::Deserialize;

/// Control bindings layered over the defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlsConfig {
    /// Explicit symbol per action (enables the action)
    pub symbols: Vec<(Action, ControlSymbol)>,
    /// Optional controls turned on with their default symbol
    pub enable: Vec<Action>,
    /// Controls turned off (applied last)
    pub disable: Vec<Action>,
}

/// `[controls]` as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileControls {
    pub front: Option<String>,
    pub back: Option<String>,
    pub jump: Option<String>,
    pub next: Option<String>,
    pub rear: Option<String>,
    pub info: Option<String>,
    pub stop: Option<String>,
    pub trash: Option<String>,
    pub enable: Option<Vec<String>>,
    pub disable: Option<Vec<String>>,
}

fn parse_actions(names: Option<Vec<String>>) -> Vec<Action> {
    names
        .unwrap_or_default()
        .into_iter()
        .filter_map(|name| {
            let action = Action::from_str(&name);
            if action.is_none() {
                eprintln!("Warning: unknown control '{}' in [controls], ignoring", name);
            }
            action
        })
        .collect()
}

impl ControlsConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileControls>) -> Self {
        let file = file.unwrap_or_default();

        let symbols = [
            (Action::Front, file.front),
            (Action::Back, file.back),
            (Action::Jump, file.jump),
            (Action::Next, file.next),
            (Action::Rear, file.rear),
            (Action::Info, file.info),
            (Action::Stop, file.stop),
            (Action::Trash, file.trash),
        ]
        .into_iter()
        .filter_map(|(action, symbol)| {
            symbol
                .filter(|s| !s.trim().is_empty())
                .map(|s| (action, ControlSymbol::parse(&s)))
        })
        .collect();

        Self {
            symbols,
            enable: parse_actions(file.enable),
            disable: parse_actions(file.disable),
        }
    }

    /// Build the validated control map
    pub fn control_map(&self) -> Result<ControlMap, ConfigurationError> {
        let mut builder = ControlMap::builder();
        for action in &self.enable {
            builder = builder.enable(*action);
        }
        for (action, symbol) in &self.symbols {
            builder = builder.bind(*action, symbol.clone());
        }
        for action in &self.disable {
            builder = builder.disable(*action);
        }
        builder.build()
    }
}
