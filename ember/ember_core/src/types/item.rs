//! Item stacks and fixed-size slot containers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::DocumentValue;
use crate::types::MaterialId;

/// A stack of items of one material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: MaterialId,
    pub amount: u32,
}

impl ItemStack {
    /// Create an item stack.
    pub fn new(material: MaterialId, amount: u32) -> Self {
        Self { material, amount }
    }

    /// Encode this stack as a document mapping node.
    pub fn to_value(&self) -> DocumentValue {
        let mut m = BTreeMap::new();
        m.insert(
            "material".to_string(),
            DocumentValue::String(self.material.as_str().to_string()),
        );
        m.insert("amount".to_string(), DocumentValue::Int(self.amount as i64));
        DocumentValue::Mapping(m)
    }

    /// Reconstruct a stack from a document mapping node.
    ///
    /// # Returns
    ///
    /// The stack, or `None` if the node is not a well-formed item mapping.
    pub fn from_value(value: &DocumentValue) -> Option<Self> {
        let m = value.as_mapping()?;
        let material = m.get("material")?.as_str()?;
        let amount = m.get("amount")?.as_i64()?;
        if amount < 0 {
            return None;
        }
        Some(Self::new(MaterialId::new(material), amount as u32))
    }
}

/// A fixed-size slot container, e.g. a menu or a stored chest.
///
/// Slots hold `None` when empty. The size is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    title: String,
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    /// Create an empty container with the given number of slots.
    pub fn new(size: usize, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slots: vec![None; size],
        }
    }

    /// The container title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// The item in a slot, or `None` for an empty or out-of-range slot.
    pub fn item(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Put an item into a slot. Out-of-range slots are ignored.
    pub fn set_item(&mut self, slot: usize, item: Option<ItemStack>) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = item;
        }
    }

    /// Iterate over all slots in order.
    pub fn slots(&self) -> impl Iterator<Item = Option<&ItemStack>> {
        self.slots.iter().map(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_stack_value_round_trip() {
        let stack = ItemStack::new(MaterialId::new("iron_ingot"), 12);
        let value = stack.to_value();
        assert_eq!(ItemStack::from_value(&value), Some(stack));
    }

    #[test]
    fn test_item_stack_rejects_malformed_nodes() {
        assert!(ItemStack::from_value(&DocumentValue::Null).is_none());
        assert!(ItemStack::from_value(&DocumentValue::String("iron".into())).is_none());
    }

    #[test]
    fn test_inventory_slots() {
        let mut inv = Inventory::new(9, "Menu");
        assert_eq!(inv.size(), 9);
        assert!(inv.item(4).is_none());

        inv.set_item(4, Some(ItemStack::new(MaterialId::new("emerald"), 1)));
        assert_eq!(inv.item(4).unwrap().amount, 1);

        // Out-of-range writes are ignored, size stays fixed
        inv.set_item(99, Some(ItemStack::new(MaterialId::new("dirt"), 1)));
        assert_eq!(inv.size(), 9);
    }
}
