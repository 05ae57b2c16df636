use serde_json::Value;

use super::json_response;
use super::payload::{self, is_truthy, read_payload, required_string, route_param, Payload};
use crate::api::{LineItem, Order, OrderStatus};
use crate::database::Database;
use crate::errors::{ApiError, ApiResult};
use crate::http::{Request, Response};
use crate::routes::{params, HttpParams};
use crate::store::Store;

const RESOURCE: &str = "Order";

/// Fields every order payload must carry, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 3] = ["deliverTo", "mobileNumber", "dishes"];

/// An order payload that passed shape validation.
///
/// The status is left raw: it is optional on creation but mandatory on update, so each handler
/// checks it on its own terms.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPayload {
    pub id: Option<String>,
    pub deliver_to: String,
    pub mobile_number: String,
    pub status: Option<Value>,
    pub dishes: Vec<LineItem>,
}

impl OrderPayload {
    fn into_order(self, id: String, status: OrderStatus) -> Order {
        Order {
            id,
            deliver_to: self.deliver_to,
            mobile_number: self.mobile_number,
            status,
            dishes: self.dishes,
        }
    }
}

/// Existence guard: the order with the given id, or NotFound
pub fn exists<'a>(store: &'a Store<Order>, order_id: &str) -> ApiResult<&'a Order> {
    store.find(order_id).ok_or_else(|| ApiError::NotFound {
        resource: RESOURCE,
        id: order_id.to_string(),
    })
}

/// Shape validator: required fields, then a non-empty list of dishes with sane quantities
pub fn validate(payload: &Payload) -> ApiResult<OrderPayload> {
    payload::require_fields(payload, &REQUIRED_FIELDS)?;

    let dishes = match payload.get("dishes") {
        Some(Value::Array(dishes)) => dishes,
        _ => {
            return Err(ApiError::InvalidCollection(
                "Order must include a dishes array".to_string(),
            ))
        }
    };
    if dishes.is_empty() {
        return Err(ApiError::InvalidCollection(
            "Order must include at least one dish".to_string(),
        ));
    }
    let dishes = dishes
        .iter()
        .enumerate()
        .map(|(index, item)| line_item(index, item))
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(OrderPayload {
        id: payload::optional_id(payload, "id")?,
        deliver_to: required_string(payload, "deliverTo")?,
        mobile_number: required_string(payload, "mobileNumber")?,
        status: payload::present(payload, "status").cloned(),
        dishes,
    })
}

fn line_item(index: usize, item: &Value) -> ApiResult<LineItem> {
    let quantity = item
        .get("quantity")
        .and_then(Value::as_u64)
        .filter(|quantity| *quantity >= 1)
        .ok_or_else(|| {
            ApiError::InvalidType(format!(
                "Dish {} must have a quantity that is an integer greater than 0",
                index
            ))
        })?;

    let dish_id = match item.get("dishId").filter(|id| is_truthy(id)) {
        None => None,
        Some(id) => Some(payload::canonical_id(id).ok_or_else(|| {
            ApiError::InvalidType(format!(
                "Dish {} must have a dishId that is a string or an integer",
                index
            ))
        })?),
    };

    Ok(LineItem { dish_id, quantity })
}

fn invalid_status() -> ApiError {
    ApiError::InvalidEnum(
        "Order must have a status of pending, preparing, out-for-delivery, or delivered"
            .to_string(),
    )
}

fn parse_status(status: &Value) -> ApiResult<OrderStatus> {
    status
        .as_str()
        .and_then(|status| status.parse().ok())
        .ok_or_else(invalid_status)
}

/// Status check for updates: the status must be there, and be one of the known values.
///
/// Any status may replace any other.
pub fn check_status(payload: &OrderPayload) -> ApiResult<OrderStatus> {
    payload
        .status
        .as_ref()
        .ok_or_else(invalid_status)
        .and_then(parse_status)
}

/// Identity reconciler: settle the id of an update payload against the route id
pub fn reconcile_identity(
    route_id: &str,
    payload: OrderPayload,
    status: OrderStatus,
) -> ApiResult<Order> {
    let id = payload::reconcile_identity(RESOURCE, route_id, payload.id.clone())?;
    Ok(payload.into_order(id, status))
}

/// Only orders nobody started working on can be removed
pub fn ensure_pending(order: &Order) -> ApiResult<()> {
    if order.status == OrderStatus::Pending {
        Ok(())
    } else {
        Err(ApiError::InvalidState(
            "Only a pending order can be removed".to_string(),
        ))
    }
}

/// Copy the fields of `update` onto `stored`. The id never changes.
fn merge(stored: &mut Order, update: &Order) {
    stored.deliver_to.clone_from(&update.deliver_to);
    stored.mobile_number.clone_from(&update.mobile_number);
    stored.status = update.status;
    stored.dishes.clone_from(&update.dishes);
}

/// GET /orders
pub fn list(_: Request, _: HttpParams, db: &mut Database) -> ApiResult<Response> {
    Ok(json_response(200, db.orders.all()))
}

/// GET /orders/{order_id}
pub fn read(_: Request, params: HttpParams, db: &mut Database) -> ApiResult<Response> {
    let order = exists(&db.orders, route_param(&params, params::ORDER_ID)?)?;
    Ok(json_response(200, order))
}

/// POST /orders
///
/// New orders are pending unless the payload says otherwise.
pub fn create(request: Request, _: HttpParams, db: &mut Database) -> ApiResult<Response> {
    let payload = validate(&read_payload(&request.body)?)?;
    let status = match &payload.status {
        Some(status) => parse_status(status)?,
        None => OrderStatus::Pending,
    };

    let id = db.ids.next_id(&db.orders);
    let order = db.orders.insert(payload.into_order(id, status));
    tracing::debug!(order_id = %order.id, status = %order.status, "order created");
    Ok(json_response(201, order))
}

/// PUT /orders/{order_id}
pub fn update(request: Request, params: HttpParams, db: &mut Database) -> ApiResult<Response> {
    let order_id = route_param(&params, params::ORDER_ID)?;
    exists(&db.orders, order_id)?;

    let payload = validate(&read_payload(&request.body)?)?;
    let status = check_status(&payload)?;
    let order = reconcile_identity(order_id, payload, status)?;

    db.orders
        .update(order_id, |stored| merge(stored, &order))
        .ok_or_else(|| ApiError::NotFound {
            resource: RESOURCE,
            id: order_id.to_string(),
        })?;
    tracing::debug!(order_id, status = %order.status, "order updated");
    Ok(json_response(200, &order))
}

/// DELETE /orders/{order_id}
pub fn delete(_: Request, params: HttpParams, db: &mut Database) -> ApiResult<Response> {
    let order_id = route_param(&params, params::ORDER_ID)?;
    ensure_pending(exists(&db.orders, order_id)?)?;

    db.orders.remove(order_id);
    tracing::debug!(order_id, "order removed");
    Ok(Response::no_content())
}
