//! LCD menu navigator.
//!
//! A circular ordered list of `(label, action)` pairs with a cursor.
//! Navigation and execution are decoupled: `move_next()` only moves the
//! cursor, and the controller decides when to run the current action.
//! Actions are a tagged enum ([`MenuAction`]) resolved by the controller,
//! never stored callables.

use heapless::Vec;

use crate::app::commands::MenuAction;

/// Labels are sized for one 16x2 LCD row, padded with spaces.
pub const MENU_LABEL_LEN: usize = 16;

const MENU_CAP: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

#[derive(Debug, Default)]
pub struct MenuNavigator {
    items: Vec<MenuItem, MENU_CAP>,
    cursor: usize,
}

impl MenuNavigator {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }

    /// Append an entry.  Returns `false` if the fixed-capacity list is full.
    pub fn add_item(&mut self, label: &'static str, action: MenuAction) -> bool {
        debug_assert!(label.len() <= MENU_LABEL_LEN);
        self.items.push(MenuItem { label, action }).is_ok()
    }

    /// Advance the cursor, wrapping to the first item past the end.
    pub fn move_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.items.len();
    }

    /// Label of the item under the cursor.
    pub fn current_label(&self) -> &'static str {
        self.items.get(self.cursor).map_or("", |item| item.label)
    }

    /// Action of the item under the cursor.
    pub fn current_action(&self) -> Option<MenuAction> {
        self.items.get(self.cursor).map(|item| item.action)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
