//! Keyboard input bindings as a typed record.
//!
//! Each `BindingName` maps to one key code (DOM `KeyboardEvent.key` values).
//! Changes are announced to registered listeners; serialization is a JSON
//! object keyed by snake_case binding names, and missing names fall back to
//! their defaults on load.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::events::Listeners;
use crate::ids::ListenerId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingName {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    TurnLeft,
    TurnRight,
    ToggleMute,
    ToggleAudio,
    ZoomIn,
    ZoomOut,
}

impl BindingName {
    pub const ALL: [BindingName; 10] = [
        BindingName::MoveForward,
        BindingName::MoveBackward,
        BindingName::MoveLeft,
        BindingName::MoveRight,
        BindingName::TurnLeft,
        BindingName::TurnRight,
        BindingName::ToggleMute,
        BindingName::ToggleAudio,
        BindingName::ZoomIn,
        BindingName::ZoomOut,
    ];

    pub fn default_key(self) -> &'static str {
        match self {
            BindingName::MoveForward => "w",
            BindingName::MoveBackward => "s",
            BindingName::MoveLeft => "a",
            BindingName::MoveRight => "d",
            BindingName::TurnLeft => "q",
            BindingName::TurnRight => "e",
            BindingName::ToggleMute => "m",
            BindingName::ToggleAudio => "v",
            BindingName::ZoomIn => "=",
            BindingName::ZoomOut => "-",
        }
    }
}

/// Emitted when a binding is assigned a different key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingChanged {
    pub name: BindingName,
    pub old: String,
    pub new: String,
}

pub struct InputBindings {
    keys: BTreeMap<BindingName, String>,
    listeners: Listeners<BindingChanged>,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_map(BTreeMap::new())
    }
}

impl fmt::Debug for InputBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.keys.iter()).finish()
    }
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_map(mut keys: BTreeMap<BindingName, String>) -> Self {
        for name in BindingName::ALL {
            keys.entry(name)
                .or_insert_with(|| name.default_key().to_string());
        }
        Self {
            keys,
            listeners: Listeners::new(),
        }
    }

    pub fn get(&self, name: BindingName) -> &str {
        self.keys
            .get(&name)
            .map(String::as_str)
            .unwrap_or_else(|| name.default_key())
    }

    /// Assign `key` to `name`. Listeners run only when the key actually
    /// changes; the return value says whether it did.
    pub fn set(&mut self, name: BindingName, key: impl Into<String>) -> bool {
        let key = key.into();
        let old = self.get(name).to_string();
        if old == key {
            return false;
        }
        self.keys.insert(name, key.clone());
        self.listeners.emit(&BindingChanged {
            name,
            old,
            new: key,
        });
        true
    }

    /// Restore every binding to its default, notifying per changed binding.
    pub fn reset(&mut self) {
        for name in BindingName::ALL {
            self.set(name, name.default_key());
        }
    }

    /// First binding (in declaration order) using `key`.
    pub fn name_for_key(&self, key: &str) -> Option<BindingName> {
        self.keys
            .iter()
            .find_map(|(name, k)| (k == key).then_some(*name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingName, &str)> + '_ {
        self.keys.iter().map(|(name, key)| (*name, key.as_str()))
    }

    pub fn on_change(&mut self, listener: impl FnMut(&BindingChanged) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

impl Serialize for InputBindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.keys.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InputBindings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keys = BTreeMap::<BindingName, String>::deserialize(deserializer)?;
        Ok(Self::from_map(keys))
    }
}
