//! Shopping Cart Business Logic Helpers
//!
//! Pure transforms over [`CartState`]. Each mutating helper leaves the
//! derived totals consistent with the items before returning.

use super::models::{is_valid_unit_price, CartItem, CartState, NewCartItem};

/// Recomputes `total_items` and `total_price` from the line items.
///
/// The price total is rounded to cents so repeated float additions do not
/// leak into the persisted record.
pub fn recompute_totals(state: &mut CartState) {
    state.total_items = state.items.iter().map(|i| u64::from(i.quantity)).sum();
    let total = state
        .items
        .iter()
        .map(CartItem::line_total)
        .fold(0.0, |acc, line| acc + line);
    state.total_price = (total * 100.0).round() / 100.0;
}

/// Adds one unit of `item`, aggregating with an existing line of the same
/// product.
pub fn add_item(state: &mut CartState, item: NewCartItem) {
    if let Some(existing) = state
        .items
        .iter_mut()
        .find(|i| i.product_id == item.product_id)
    {
        existing.quantity = existing.quantity.saturating_add(1);
    } else {
        state.items.push(item.into_line_item());
    }
    recompute_totals(state);
}

/// Sets the absolute quantity of a line item.
///
/// A quantity of zero or less removes the item. Unknown products are left
/// alone.
pub fn set_quantity(state: &mut CartState, product_id: &str, quantity: i64) {
    if quantity <= 0 {
        remove_item(state, product_id);
        return;
    }

    if let Some(existing) = state.items.iter_mut().find(|i| i.product_id == product_id) {
        existing.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    }
    recompute_totals(state);
}

/// Removes the line for `product_id`. Returns whether anything was removed.
pub fn remove_item(state: &mut CartState, product_id: &str) -> bool {
    let before = state.items.len();
    state.items.retain(|i| i.product_id != product_id);
    recompute_totals(state);
    state.items.len() != before
}

/// Current quantity of `product_id`, 0 when absent.
pub fn quantity_of(state: &CartState, product_id: &str) -> u32 {
    state
        .items
        .iter()
        .find(|i| i.product_id == product_id)
        .map_or(0, |i| i.quantity)
}

/// Repairs a record loaded from storage: drops zero-quantity, unidentified
/// and mispriced lines and recomputes the totals.
pub fn sanitize(state: &mut CartState) {
    state.items.retain(|i| {
        i.quantity >= 1 && !i.product_id.is_empty() && is_valid_unit_price(i.unit_price)
    });
    recompute_totals(state);
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Kettle, 1x Toaster"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.title))
        .collect::<Vec<_>>()
        .join(", ")
}
