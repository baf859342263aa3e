//! Catalog entries and gold-piece amounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An amount of gold pieces ("PO" on receipts).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Gold(u64);

impl Gold {
    pub const ZERO: Gold = Gold(0);

    #[must_use]
    pub const fn new(pieces: u64) -> Self {
        Self(pieces)
    }

    #[must_use]
    pub const fn pieces(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn checked_sub(self, other: Gold) -> Option<Gold> {
        self.0.checked_sub(other.0).map(Gold)
    }

    #[must_use]
    pub fn saturating_add(self, other: Gold) -> Gold {
        Gold(self.0.saturating_add(other.0))
    }

    #[must_use]
    pub fn saturating_mul(self, quantity: u64) -> Gold {
        Gold(self.0.saturating_mul(quantity))
    }
}

impl fmt::Display for Gold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} PO", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Weapon,
    Armor,
    Potion,
    Misc,
    Scroll,
    Artifact,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Weapon,
        Category::Armor,
        Category::Potion,
        Category::Misc,
        Category::Scroll,
        Category::Artifact,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Weapon => "weapon",
            Category::Armor => "armor",
            Category::Potion => "potion",
            Category::Misc => "misc",
            Category::Scroll => "scroll",
            Category::Artifact => "artifact",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown category {0:?} (expected weapon, armor, potion, misc, scroll or artifact)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// A product listed in a store's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Gold,
    pub category: Category,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Field-wise edit of a catalog entry. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Gold>,
    pub category: Option<Category>,
    pub image: Option<String>,
    pub stock: Option<u32>,
}

impl ProductUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(stock) = self.stock {
            product.stock = Some(stock);
        }
    }
}
