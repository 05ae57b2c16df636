use serde_json::{Number, Value};

use super::json_response;
use super::payload::{self, read_payload, required_string, route_param, Payload};
use crate::api::Dish;
use crate::database::Database;
use crate::errors::{ApiError, ApiResult};
use crate::http::{Request, Response};
use crate::routes::{params, HttpParams};
use crate::store::Store;

const RESOURCE: &str = "Dish";

/// Fields every dish payload must carry, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "description", "price", "image_url"];

/// A dish payload that passed validation, before it gets its final id
#[derive(Debug, Clone, PartialEq)]
pub struct DishPayload {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: Number,
    pub image_url: String,
}

impl DishPayload {
    fn into_dish(self, id: String) -> Dish {
        Dish {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
        }
    }
}

/// Existence guard: the dish with the given id, or NotFound
pub fn exists<'a>(store: &'a Store<Dish>, dish_id: &str) -> ApiResult<&'a Dish> {
    store.find(dish_id).ok_or_else(|| ApiError::NotFound {
        resource: RESOURCE,
        id: dish_id.to_string(),
    })
}

/// Shape validator: every required field is present, and the price is a number of at least 1
pub fn validate(payload: &Payload) -> ApiResult<DishPayload> {
    payload::require_fields(payload, &REQUIRED_FIELDS)?;

    let price = match payload.get("price") {
        Some(Value::Number(price)) if price.as_f64().is_some_and(|p| p >= 1.0) => price.clone(),
        _ => {
            return Err(ApiError::InvalidType(
                "Dish must have a price that is a number greater than or equal to 1".to_string(),
            ))
        }
    };

    Ok(DishPayload {
        id: payload::optional_id(payload, "id")?,
        name: required_string(payload, "name")?,
        description: required_string(payload, "description")?,
        price,
        image_url: required_string(payload, "image_url")?,
    })
}

/// Identity reconciler: settle the id of an update payload against the route id
pub fn reconcile_identity(route_id: &str, payload: DishPayload) -> ApiResult<Dish> {
    let id = payload::reconcile_identity(RESOURCE, route_id, payload.id.clone())?;
    Ok(payload.into_dish(id))
}

/// Copy the fields of `update` onto `stored`. The id never changes.
fn merge(stored: &mut Dish, update: &Dish) {
    stored.name.clone_from(&update.name);
    stored.description.clone_from(&update.description);
    stored.price = update.price.clone();
    stored.image_url.clone_from(&update.image_url);
}

/// GET /dishes
pub fn list(_: Request, _: HttpParams, db: &mut Database) -> ApiResult<Response> {
    Ok(json_response(200, db.dishes.all()))
}

/// GET /dishes/{dish_id}
pub fn read(_: Request, params: HttpParams, db: &mut Database) -> ApiResult<Response> {
    let dish = exists(&db.dishes, route_param(&params, params::DISH_ID)?)?;
    Ok(json_response(200, dish))
}

/// POST /dishes
///
/// Any id in the payload is ignored, the dish gets a fresh one.
pub fn create(request: Request, _: HttpParams, db: &mut Database) -> ApiResult<Response> {
    let payload = validate(&read_payload(&request.body)?)?;

    let id = db.ids.next_id(&db.dishes);
    let dish = db.dishes.insert(payload.into_dish(id));
    tracing::debug!(dish_id = %dish.id, "dish created");
    Ok(json_response(201, dish))
}

/// PUT /dishes/{dish_id}
///
/// Responds with the reconciled payload, which the stored dish now matches.
pub fn update(request: Request, params: HttpParams, db: &mut Database) -> ApiResult<Response> {
    let dish_id = route_param(&params, params::DISH_ID)?;
    exists(&db.dishes, dish_id)?;

    let payload = validate(&read_payload(&request.body)?)?;
    let dish = reconcile_identity(dish_id, payload)?;

    db.dishes
        .update(dish_id, |stored| merge(stored, &dish))
        .ok_or_else(|| ApiError::NotFound {
            resource: RESOURCE,
            id: dish_id.to_string(),
        })?;
    tracing::debug!(dish_id, "dish updated");
    Ok(json_response(200, &dish))
}
