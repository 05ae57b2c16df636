use crate::api::{Dish, Order};
use crate::errors::Result;
use crate::store::{IdGenerator, Store};

const SEED_DISHES: &str = include_str!("../data/dishes.json");
const SEED_ORDERS: &str = include_str!("../data/orders.json");

/// Everything the API stores: the menu, the orders and the id generator shared by both.
///
/// It is owned by the [`crate::app::App`] and lent to handlers for the duration of a single
/// request.
#[derive(Debug, Default)]
pub struct Database {
    pub dishes: Store<Dish>,
    pub orders: Store<Order>,
    pub ids: IdGenerator,
}

impl Database {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database filled with the bundled menu and orders
    pub fn seeded() -> Result<Self> {
        let dishes: Vec<Dish> = serde_json::from_str(SEED_DISHES)?;
        let orders: Vec<Order> = serde_json::from_str(SEED_ORDERS)?;
        Ok(Database {
            dishes: Store::with_records(dishes),
            orders: Store::with_records(orders),
            ids: IdGenerator::new(),
        })
    }
}
