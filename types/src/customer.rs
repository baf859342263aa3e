use serde::{Deserialize, Serialize};

/// Classes offered on the checkout form.
pub const CHARACTER_CLASSES: &[&str] = &[
    "Guerreiro",
    "Mago",
    "Ladino",
    "Clérigo",
    "Bardo",
    "Paladino",
    "Ranger",
    "Druida",
    "Monge",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub character_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild: Option<String>,
}

impl CustomerDetails {
    #[must_use]
    pub fn new(name: impl Into<String>, character_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            character_class: character_class.into(),
            guild: None,
        }
    }
}

impl Default for CustomerDetails {
    fn default() -> Self {
        Self::new(String::new(), CHARACTER_CLASSES[0])
    }
}
