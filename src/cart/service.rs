//! Shopping Cart Store
//!
//! Read-transform-write operations over the persisted cart record. Every
//! mutation recomputes the totals, persists the record and emits exactly one
//! [`CartEvent`]. Storage failures are logged and treated as an empty cart;
//! they never reach the caller.
//!
//! Listeners are invoked while the write lock is held, so events arrive in
//! the order the states were persisted. A listener may call [`CartStore::read`]
//! but must not mutate the cart.

use super::helpers::{self, format_item_summary, sanitize};
use super::models::{CartChange, CartEvent, CartState, NewCartItem};
use super::notifier::{CartNotifier, Subscription};
use super::store::KeyValueStore;
use crate::error::StoreError;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// Cart operations bound to a storage port and a fixed key
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    notifier: CartNotifier,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl CartStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            notifier: CartNotifier::new(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn notifier(&self) -> &CartNotifier {
        &self.notifier
    }

    /// Registers a change listener; see [`CartNotifier::subscribe`].
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    /// Current cart, or an empty one if nothing is stored or storage fails.
    pub fn read(&self) -> CartState {
        match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => CartState::default(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Cart storage unreadable, using empty cart");
                CartState::default()
            }
        }
    }

    /// Adds one unit of `item`.
    ///
    /// Items whose unit price is negative, not finite or above
    /// [`MAX_UNIT_PRICE`](super::models::MAX_UNIT_PRICE) are refused and the
    /// current cart is returned unchanged.
    pub fn add(&self, item: NewCartItem) -> CartState {
        if !item.has_valid_price() {
            warn!(
                product_id = %item.product_id,
                unit_price = item.unit_price,
                "Refusing cart item with unusable price"
            );
            return self.read();
        }
        let product_id = item.product_id.clone();
        self.mutate(CartChange::Added, Some(product_id), |state| {
            helpers::add_item(state, item)
        })
    }

    /// Sets the absolute quantity; zero or less behaves like [`Self::remove`].
    pub fn set_quantity(&self, product_id: &str, quantity: i64) -> CartState {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        self.mutate(
            CartChange::QuantitySet,
            Some(product_id.to_string()),
            |state| helpers::set_quantity(state, product_id, quantity),
        )
    }

    /// Removes the line for `product_id`; absent products are a no-op.
    pub fn remove(&self, product_id: &str) -> CartState {
        self.mutate(CartChange::Removed, Some(product_id.to_string()), |state| {
            if !helpers::remove_item(state, product_id) {
                debug!(product_id, "Remove of product not in cart");
            }
        })
    }

    /// Replaces the cart with an empty one.
    pub fn clear(&self) -> CartState {
        self.mutate(CartChange::Cleared, None, |state| {
            if !state.is_empty() {
                info!(items = %format_item_summary(&state.items), "Clearing cart");
            }
            *state = CartState::default();
        })
    }

    /// Quantity of `product_id` in the cart, 0 when absent.
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        helpers::quantity_of(&self.read(), product_id)
    }

    fn mutate<F>(&self, change: CartChange, product_id: Option<String>, apply: F) -> CartState
    where
        F: FnOnce(&mut CartState),
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let (mut state, writable) = match self.load() {
            Ok(state) => (state.unwrap_or_default(), true),
            // A record that no longer parses is replaced.
            Err(e @ StoreError::Serialization(_)) => {
                warn!(key = %self.key, error = %e, "Discarding unparseable cart record");
                (CartState::default(), true)
            }
            Err(e) => {
                error!(
                    key = %self.key,
                    error = %e,
                    "Cart storage unreadable, leaving record untouched"
                );
                (CartState::default(), false)
            }
        };

        apply(&mut state);
        helpers::recompute_totals(&mut state);
        if writable {
            self.persist(&state);
        }

        debug!(
            ?change,
            total_items = state.total_items,
            total_price = state.total_price,
            "Cart updated"
        );

        self.notifier.notify(&CartEvent {
            change,
            product_id,
            state: state.clone(),
        });
        state
    }

    fn load(&self) -> Result<Option<CartState>, StoreError> {
        let Some(raw) = self.storage.read(&self.key)? else {
            return Ok(None);
        };
        let mut state: CartState = serde_json::from_str(&raw)?;
        sanitize(&mut state);
        Ok(Some(state))
    }

    fn persist(&self, state: &CartState) {
        let result = serde_json::to_string(state)
            .map_err(StoreError::from)
            .and_then(|raw| self.storage.write(&self.key, &raw));

        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}
