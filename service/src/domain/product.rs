//! [`Product`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Product available for ordering.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Product {
    /// ID of this [`Product`].
    pub id: Id,

    /// [`Name`] of this [`Product`].
    pub name: Name,

    /// Description of this [`Product`], if any.
    pub description: Option<String>,

    /// Category this [`Product`] belongs to, if any.
    pub category: Option<String>,

    /// Price of a single unit.
    pub price: Decimal,

    /// Number of units in stock.
    pub stock: u32,

    /// ID of the supplier [`User`] providing this [`Product`], if any.
    pub supplier_id: Option<user::Id>,
}

impl Product {
    /// Indicates whether this [`Product`] can be ordered.
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// [`Product`] attributes to create or update it with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// [`Name`] of the [`Product`].
    pub name: Name,

    /// Description of the [`Product`], if any.
    pub description: Option<String>,

    /// Category of the [`Product`], if any.
    pub category: Option<String>,

    /// Price of a single unit.
    pub price: Decimal,

    /// Number of units in stock.
    pub stock: u32,

    /// ID of the supplier [`User`] providing the [`Product`], if any.
    pub supplier_id: Option<user::Id>,
}

impl Draft {
    /// Builds a [`Product`] with the provided [`Id`] out of this [`Draft`].
    #[must_use]
    pub fn into_product(self, id: Id) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            stock: self.stock,
            supplier_id: self.supplier_id,
        }
    }
}

/// ID of a [`Product`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
pub struct Id(String);

/// Name of a [`Product`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

#[cfg(test)]
mod spec {
    use super::Name;

    #[test]
    fn validates_name() {
        assert!(Name::new("Office chair").is_some());
        assert!(Name::new("Office chair ").is_none());
        assert!(Name::new("").is_none());
        assert!(Name::new("x".repeat(257)).is_none());
    }
}
