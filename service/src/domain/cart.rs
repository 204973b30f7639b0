//! [`Cart`] definitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    order::{LineItem, Quantity},
    product, Product,
};

/// Shopping cart of a client, persisted on the device between runs.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Cart {
    /// [`Item`]s in this [`Cart`], in the order they were added.
    #[serde(default)]
    items: Vec<Item>,
}

impl Cart {
    /// Adds the provided [`Item`] to this [`Cart`].
    ///
    /// If the same [`Product`] is in the [`Cart`] already, the quantities are
    /// summed and the latest name and price win.
    pub fn add(&mut self, item: Item) {
        if let Some(existing) =
            self.items.iter_mut().find(|i| i.product_id == item.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            existing.name = item.name;
            existing.unit_price = item.unit_price;
        } else {
            self.items.push(item);
        }
    }

    /// Sets the quantity of the provided [`Product`] in this [`Cart`].
    ///
    /// Zero `quantity` removes the [`Product`] from the [`Cart`].
    ///
    /// Returns `false` if there is no such [`Product`] in the [`Cart`].
    pub fn set_quantity(&mut self, product_id: &product::Id, quantity: u32) -> bool {
        let Some(pos) =
            self.items.iter().position(|i| &i.product_id == product_id)
        else {
            return false;
        };
        match Quantity::new(quantity) {
            Some(qty) => self.items[pos].quantity = qty,
            None => drop(self.items.remove(pos)),
        }
        true
    }

    /// Removes the provided [`Product`] from this [`Cart`].
    ///
    /// Returns `false` if there is no such [`Product`] in the [`Cart`].
    pub fn remove(&mut self, product_id: &product::Id) -> bool {
        let len = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() != len
    }

    /// Removes all the [`Item`]s from this [`Cart`].
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the [`Item`]s of this [`Cart`].
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the number of distinct [`Product`]s in this [`Cart`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Indicates whether this [`Cart`] is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total number of units in this [`Cart`].
    #[must_use]
    pub fn units(&self) -> u64 {
        self.items
            .iter()
            .map(|i| u64::from(u32::from(i.quantity)))
            .sum()
    }

    /// Computes the subtotal of this [`Cart`] from its [`Item`]s.
    ///
    /// Always recomputed, so repeated calls over the same [`Item`]s agree.
    /// Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(Item::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Converts this [`Cart`] into order [`LineItem`]s.
    #[must_use]
    pub fn to_line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|i| LineItem {
                product_id: i.product_id.clone(),
                name: i.name.clone(),
                quantity: i.quantity,
                unit_price: i.unit_price,
            })
            .collect()
    }
}

/// Single [`Product`] line of a [`Cart`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Item {
    /// ID of the [`Product`].
    pub product_id: product::Id,

    /// Name of the [`Product`] when it was added.
    pub name: String,

    /// Price of a single unit when it was added.
    pub unit_price: Decimal,

    /// [`Quantity`] of units.
    pub quantity: Quantity,
}

impl Item {
    /// Creates a new [`Item`] out of the provided [`Product`].
    #[must_use]
    pub fn of(product: &Product, quantity: Quantity) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.to_string(),
            unit_price: product.price,
            quantity,
        }
    }

    /// Returns the quantity multiplied by the unit price, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(u32::from(self.quantity)).saturating_mul(self.unit_price)
    }
}

#[cfg(test)]
pub(crate) mod spec {
    use rust_decimal::Decimal;

    use crate::domain::order::Quantity;

    use super::{Cart, Item};

    pub(crate) fn item(product: &str, quantity: u32, price: i64) -> Item {
        Item {
            product_id: product.into(),
            name: product.to_uppercase(),
            unit_price: Decimal::from(price),
            quantity: Quantity::new(quantity).unwrap(),
        }
    }

    #[test]
    fn merges_same_product() {
        let mut cart = Cart::default();
        cart.add(item("chair", 1, 500));
        cart.add(item("desk", 1, 300));
        cart.add(item("chair", 1, 450));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.units(), 3);
        assert_eq!(cart.items()[0].unit_price, Decimal::from(450));
        assert_eq!(cart.subtotal(), Decimal::from(1200));
    }

    #[test]
    fn saturates_subtotal() {
        let mut cart = Cart::default();
        cart.add(Item {
            unit_price: Decimal::MAX,
            ..item("chair", 2, 0)
        });
        cart.add(item("desk", 1, 300));

        assert_eq!(cart.subtotal(), Decimal::MAX);
    }

    #[test]
    fn subtotal_is_idempotent() {
        let mut cart = Cart::default();
        cart.add(item("chair", 2, 500));
        cart.add(item("desk", 1, 300));

        let first = cart.subtotal();
        for _ in 0..3 {
            assert_eq!(cart.subtotal(), first);
        }
        assert_eq!(first, Decimal::from(1300));
    }

    #[test]
    fn zero_quantity_removes_item() {
        let mut cart = Cart::default();
        cart.add(item("chair", 2, 500));
        cart.add(item("desk", 1, 300));

        assert!(cart.set_quantity(&"chair".into(), 5));
        assert_eq!(cart.subtotal(), Decimal::from(2800));

        assert!(cart.set_quantity(&"chair".into(), 0));
        assert_eq!(cart.len(), 1);
        assert!(!cart.set_quantity(&"lamp".into(), 1));

        assert!(cart.remove(&"desk".into()));
        assert!(!cart.remove(&"desk".into()));
        assert!(cart.is_empty());
    }

    #[test]
    fn persists_as_json() {
        let mut cart = Cart::default();
        cart.add(item("chair", 2, 500));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);

        assert_eq!(
            serde_json::from_str::<Cart>("{}").unwrap(),
            Cart::default(),
        );
    }
}
