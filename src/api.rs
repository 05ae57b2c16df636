// This file contains the basic types used to communicate through the API
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Envelope wrapping every request and response body: `{"data": ...}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Envelope { data }
    }
}

/// A dish on the menu, as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dish {
    /// Unique ID, given by the server on creation
    pub id: String,
    pub name: String,
    pub description: String,
    /// Kept as the number the client sent so that `5` is echoed as `5`, not `5.0`
    pub price: serde_json::Number,
    pub image_url: String,
}

/// Lifecycle of an order. Any state may follow any other, only deletion looks at it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// One line of an order: which dish, and how many of it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Reference to a dish. Not checked against the menu.
    ///
    /// Other properties a client puts on a line item are not kept.
    #[serde(rename = "dishId", default, skip_serializing_if = "Option::is_none")]
    pub dish_id: Option<String>,
    /// Always at least 1
    pub quantity: u64,
}

/// A full order, as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique ID, given by the server on creation
    pub id: String,
    /// Delivery address
    pub deliver_to: String,
    pub mobile_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    /// Never empty
    pub dishes: Vec<LineItem>,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(OrderStatus::OutForDelivery).unwrap(),
            json!("out-for-delivery")
        );
        assert_eq!("delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert!("cancelled".parse::<OrderStatus>().is_err());
        assert!("Pending".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_field_names() {
        let order = Order {
            id: "1".to_string(),
            deliver_to: "1 Main St".to_string(),
            mobile_number: "555-0100".to_string(),
            status: OrderStatus::Pending,
            dishes: vec![LineItem {
                dish_id: Some("3".to_string()),
                quantity: 2,
            }],
        };

        let value = serde_json::to_value(Envelope::new(order)).unwrap();
        assert_eq!(value["data"]["deliverTo"], "1 Main St");
        assert_eq!(value["data"]["mobileNumber"], "555-0100");
        assert_eq!(value["data"]["status"], "pending");
        assert_eq!(value["data"]["dishes"][0]["dishId"], "3");
        assert_eq!(value["data"]["dishes"][0]["quantity"], 2);
    }

    #[test]
    fn test_dish_price_is_echoed_verbatim() {
        let dish: Dish = serde_json::from_value(json!({
            "id": "1",
            "name": "Taco",
            "description": "d",
            "price": 5,
            "image_url": "u"
        }))
        .unwrap();

        assert_eq!(serde_json::to_value(&dish).unwrap()["price"], json!(5));
    }
}
