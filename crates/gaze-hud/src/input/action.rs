//! Key-driven actions

use std::collections::HashMap;
use std::fmt;

use gaze_hud_config::KeyConfig;

/// Something the user asked for with a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RequestCalibration,
    ToggleOutputFilter,
    /// Write the latest sample to the debug log
    LogSample,
    ToggleIndicator,
    Quit,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::RequestCalibration => "calibrate",
            Action::ToggleOutputFilter => "toggle filter",
            Action::LogSample => "log sample",
            Action::ToggleIndicator => "toggle indicator",
            Action::Quit => "quit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Character to action lookup built from the key configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<char, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_config(&KeyConfig::default())
    }
}

impl KeyBindings {
    /// Build bindings from configuration. Unparseable entries are skipped;
    /// config validation reports them before this point.
    pub fn from_config(keys: &KeyConfig) -> Self {
        let pairs = [
            (&keys.calibrate, Action::RequestCalibration),
            (&keys.toggle_filter, Action::ToggleOutputFilter),
            (&keys.log_sample, Action::LogSample),
            (&keys.toggle_indicator, Action::ToggleIndicator),
            (&keys.quit, Action::Quit),
        ];
        let bindings = pairs
            .into_iter()
            .filter_map(|(value, action)| {
                KeyConfig::parse_key(value).map(|c| (c.to_ascii_lowercase(), action))
            })
            .collect();
        Self { bindings }
    }

    /// Action bound to a character, case-insensitive
    pub fn action_for(&self, c: char) -> Option<Action> {
        self.bindings.get(&c.to_ascii_lowercase()).copied()
    }

    /// Key bound to an action, for help text
    pub fn key_for(&self, action: Action) -> Option<char> {
        self.bindings
            .iter()
            .find(|(_, a)| **a == action)
            .map(|(c, _)| *c)
    }
}
