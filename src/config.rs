//! Key-binding configuration.
//!
//! The file is a JSON object `{"keys": {<action>: [<key-spec>, ...]}}`.
//! Each action is merged independently: a missing, empty or mistyped entry
//! falls back to that action's default without disturbing the others.
//!
//! Search order: `$RIDETERM_CONFIG`, `./config.json`,
//! `~/.config/rideterm/config.json`. The first readable file wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RIDETERM_CONFIG";

/// Every bindable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Prefix key for pane commands.
    Leader,
    /// Run the input line.
    Execute,
    /// (after leader) toggle the debug log.
    ToggleDebug,
    /// Move focus to the next pane.
    CyclePane,
    /// Close the focused pane.
    ClosePane,
    /// (after leader) quit.
    Quit,
    /// (after leader) show key bindings.
    ShowKeys,
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Start of line.
    Home,
    /// End of line.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Delete before the cursor.
    Backspace,
    /// Delete at the cursor.
    Delete,
}

impl Action {
    /// All actions in help order.
    pub const ALL: [Action; 17] = [
        Action::Leader,
        Action::Execute,
        Action::ToggleDebug,
        Action::CyclePane,
        Action::ClosePane,
        Action::Quit,
        Action::ShowKeys,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Home,
        Action::End,
        Action::PageUp,
        Action::PageDown,
        Action::Backspace,
        Action::Delete,
    ];

    /// Key in the config file.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Execute => "execute",
            Self::ToggleDebug => "toggle_debug",
            Self::CyclePane => "cycle_pane",
            Self::ClosePane => "close_pane",
            Self::Quit => "quit",
            Self::ShowKeys => "show_keys",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
            Self::End => "end",
            Self::PageUp => "pgup",
            Self::PageDown => "pgdn",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
        }
    }

    /// One-line description for the help pane.
    pub fn help(self) -> &'static str {
        match self {
            Self::Leader => "leader prefix",
            Self::Execute => "execute input",
            Self::ToggleDebug => "toggle debug log",
            Self::CyclePane => "next pane",
            Self::ClosePane => "close pane",
            Self::Quit => "quit",
            Self::ShowKeys => "show key mappings",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "line start",
            Self::End => "line end",
            Self::PageUp => "page up",
            Self::PageDown => "page down",
            Self::Backspace => "delete back",
            Self::Delete => "delete forward",
        }
    }

    /// Help section this action belongs to.
    pub fn section(self) -> &'static str {
        match self {
            Self::Leader
            | Self::Execute
            | Self::ToggleDebug
            | Self::CyclePane
            | Self::ClosePane
            | Self::Quit
            | Self::ShowKeys => "Actions",
            Self::Up
            | Self::Down
            | Self::Left
            | Self::Right
            | Self::Home
            | Self::End
            | Self::PageUp
            | Self::PageDown => "Navigation",
            Self::Backspace | Self::Delete => "Editing",
        }
    }

    fn defaults(self) -> &'static [&'static str] {
        match self {
            Self::Leader => &["ctrl+]"],
            Self::Execute => &["enter"],
            Self::ToggleDebug => &["d"],
            Self::CyclePane => &["tab"],
            Self::ClosePane => &["esc"],
            Self::Quit => &["q"],
            Self::ShowKeys => &["?"],
            Self::Up => &["up"],
            Self::Down => &["down"],
            Self::Left => &["left"],
            Self::Right => &["right"],
            Self::Home => &["home"],
            Self::End => &["end"],
            Self::PageUp => &["pgup"],
            Self::PageDown => &["pgdown"],
            Self::Backspace => &["backspace"],
            Self::Delete => &["delete"],
        }
    }
}

/// On-disk shape. Entries stay untyped so each can fail on its own.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    keys: BTreeMap<String, serde_json::Value>,
}

/// Resolved key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: BTreeMap<Action, Vec<String>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            bindings: Action::ALL
                .iter()
                .map(|&action| {
                    let keys = action.defaults().iter().map(|k| (*k).to_string()).collect();
                    (action, keys)
                })
                .collect(),
        }
    }
}

impl KeyMap {
    /// Built-in bindings.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Parse config text, merging per action.
    ///
    /// Returns the merged map plus one [`ClientError::Config`] per field that
    /// fell back. Unparseable text falls back entirely.
    pub fn parse(text: &str) -> (Self, Vec<ClientError>) {
        let mut map = Self::default();
        let file: ConfigFile = match serde_json::from_str(text) {
            Ok(file) => file,
            Err(e) => return (map, vec![ClientError::Config(format!("invalid config: {e}"))]),
        };

        let mut problems = Vec::new();
        for action in Action::ALL {
            let Some(raw) = file.keys.get(action.config_key()) else {
                continue;
            };
            match key_list(raw) {
                Ok(keys) if !keys.is_empty() => {
                    map.bindings.insert(action, keys);
                }
                Ok(_) => {}
                Err(detail) => problems.push(ClientError::Config(format!(
                    "keys.{}: {detail}",
                    action.config_key()
                ))),
            }
        }
        (map, problems)
    }

    /// Load from `path`.
    pub fn load_from(path: &Path) -> Result<(Self, Vec<ClientError>), ClientError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Load from the first readable search path, or defaults.
    pub fn load() -> Self {
        for path in config_paths() {
            match Self::load_from(&path) {
                Ok((map, problems)) => {
                    log::info!("Loaded key bindings from {}", path.display());
                    for problem in problems {
                        log::warn!("{problem}; using default");
                    }
                    return map;
                }
                Err(e) => log::debug!("No config at {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    /// Key specs bound to `action`.
    pub fn keys(&self, action: Action) -> &[String] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if `spec` triggers `action`.
    pub fn matches(&self, action: Action, spec: &str) -> bool {
        self.keys(action).iter().any(|k| k == spec)
    }

    /// Human-readable binding list, e.g. `ctrl+], f1`.
    pub fn describe(&self, action: Action) -> String {
        self.keys(action).join(", ")
    }
}

fn key_list(raw: &serde_json::Value) -> Result<Vec<String>, String> {
    match raw {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_lowercase())
                    .ok_or_else(|| format!("expected string, got {item}"))
            })
            .collect(),
        serde_json::Value::String(s) => Ok(vec![s.trim().to_lowercase()]),
        other => Err(format!("expected list of key names, got {other}")),
    }
}

/// Directory holding the user config and the docs index.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("rideterm"))
}

/// Config file candidates in priority order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        paths.push(PathBuf::from(explicit));
    }
    paths.push(PathBuf::from("config.json"));
    if let Some(dir) = config_dir() {
        paths.push(dir.join("config.json"));
    }
    paths
}
