//! Control symbols and the action mapping
//!
//! Each logical [`Action`] may be bound to one [`ControlSymbol`]. The map is
//! built once from the defaults overlaid by overrides and never mutated
//! afterwards. An action without a symbol is disabled.

use crate::error::ConfigurationError;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier a viewer reacts with
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlSymbol {
    /// Unicode emoji (or any name-based symbol)
    Named(String),
    /// Platform custom-emoji id
    Custom(u64),
}

impl ControlSymbol {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Parse a config value: all digits is a custom id, anything else a name
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.parse::<u64>() {
            Ok(id) => Self::Custom(id),
            Err(_) => Self::Named(value.to_string()),
        }
    }
}

impl fmt::Display for ControlSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{}", name),
            Self::Custom(id) => write!(f, "{}", id),
        }
    }
}

/// Symbol as it arrives on an inbound reaction event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSymbol {
    pub id: Option<u64>,
    pub name: String,
}

impl ReactionSymbol {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn custom(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    /// Custom ids take precedence over names
    pub fn identifier(&self) -> ControlSymbol {
        match self.id {
            Some(id) => ControlSymbol::Custom(id),
            None => ControlSymbol::Named(self.name.clone()),
        }
    }
}

impl From<&ControlSymbol> for ReactionSymbol {
    fn from(symbol: &ControlSymbol) -> Self {
        match symbol {
            ControlSymbol::Named(name) => Self::named(name.clone()),
            ControlSymbol::Custom(id) => Self::custom(*id, String::new()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Logical control actions, in attachment order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Front,
    Back,
    Jump,
    Next,
    Rear,
    Info,
    Stop,
    Trash,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Front,
        Action::Back,
        Action::Jump,
        Action::Next,
        Action::Rear,
        Action::Info,
        Action::Stop,
        Action::Trash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Jump => "jump",
            Self::Next => "next",
            Self::Rear => "rear",
            Self::Info => "info",
            Self::Stop => "stop",
            Self::Trash => "trash",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Built-in symbol for this action
    pub fn default_symbol(&self) -> ControlSymbol {
        let emoji = match self {
            Self::Front => "⏮",
            Self::Back => "◀",
            Self::Jump => "↗",
            Self::Next => "▶",
            Self::Rear => "⏭",
            Self::Info => "ℹ",
            Self::Stop => "⏹",
            Self::Trash => "🗑",
        };
        ControlSymbol::named(emoji)
    }

    /// Whether the action is on by default
    ///
    /// The basic set is back/jump/next/trash; the rest must be opted into.
    pub fn enabled_by_default(&self) -> bool {
        matches!(self, Self::Back | Self::Jump | Self::Next | Self::Trash)
    }

    fn is_mandatory(&self) -> bool {
        matches!(self, Self::Back | Self::Next)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Control Map
// ─────────────────────────────────────────────────────────────────────────────

/// Validated action -> symbol mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMap {
    bindings: BTreeMap<Action, ControlSymbol>,
}

impl ControlMap {
    pub fn builder() -> ControlMapBuilder {
        ControlMapBuilder::default()
    }

    /// Resolve an inbound symbol to its action, if enabled
    pub fn resolve(&self, symbol: &ControlSymbol) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == symbol)
            .map(|(action, _)| *action)
    }

    pub fn symbol(&self, action: Action) -> Option<&ControlSymbol> {
        self.bindings.get(&action)
    }

    pub fn is_enabled(&self, action: Action) -> bool {
        self.bindings.contains_key(&action)
    }

    /// Enabled bindings in attachment order
    pub fn enabled(&self) -> impl Iterator<Item = (Action, &ControlSymbol)> {
        self.bindings.iter().map(|(action, symbol)| (*action, symbol))
    }

    pub fn symbols(&self) -> Vec<ControlSymbol> {
        self.bindings.values().cloned().collect()
    }
}

impl Default for ControlMap {
    fn default() -> Self {
        let bindings = Action::ALL
            .into_iter()
            .filter(Action::enabled_by_default)
            .map(|action| (action, action.default_symbol()))
            .collect();
        Self { bindings }
    }
}

/// Overrides layered over the default bindings
#[derive(Debug, Clone, Default)]
pub struct ControlMapBuilder {
    overrides: BTreeMap<Action, Option<ControlSymbol>>,
}

impl ControlMapBuilder {
    /// Bind `action` to `symbol`, enabling it
    pub fn bind(mut self, action: Action, symbol: ControlSymbol) -> Self {
        self.overrides.insert(action, Some(symbol));
        self
    }

    /// Enable `action` with its default symbol
    pub fn enable(self, action: Action) -> Self {
        let symbol = action.default_symbol();
        self.bind(action, symbol)
    }

    pub fn disable(mut self, action: Action) -> Self {
        self.overrides.insert(action, None);
        self
    }

    pub fn build(self) -> Result<ControlMap, ConfigurationError> {
        let mut bindings = ControlMap::default().bindings;
        for (action, symbol) in self.overrides {
            match symbol {
                Some(symbol) => bindings.insert(action, symbol),
                None => bindings.remove(&action),
            };
        }

        for action in Action::ALL.into_iter().filter(Action::is_mandatory) {
            if !bindings.contains_key(&action) {
                return Err(ConfigurationError::MissingControl {
                    action: action.as_str(),
                });
            }
        }

        let mut seen: BTreeMap<&ControlSymbol, Action> = BTreeMap::new();
        for (action, symbol) in &bindings {
            if let Some(first) = seen.insert(symbol, *action) {
                return Err(ConfigurationError::DuplicateSymbol {
                    symbol: symbol.to_string(),
                    first: first.as_str(),
                    second: action.as_str(),
                });
            }
        }

        Ok(ControlMap { bindings })
    }
}
