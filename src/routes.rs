use std::collections::HashMap;

use crate::database::Database;
use crate::errors::{self, ApiError, ApiResult};
use crate::http::{Request, Response};
use matchit::Router;

/// Utility macro generating a constant for the HTTP endpoint, and associate it with
/// an identifier. Matchit requires both
macro_rules! make_paths {
    ($($name:ident: $path:expr,)*) => {
        pub mod paths {
            $(
                pub const $name: &str = $path;
            )*
        }
        pub mod endpoints {
            $(
                pub const $name: &str = stringify!($name);
            )*
        }
    }
}

make_paths! {
    DISHES: "/dishes",
    DISH_BY_ID: "/dishes/{dish_id}",
    ORDERS: "/orders",
    ORDER_BY_ID: "/orders/{order_id}",
}

/// Utility to add a list of paths to the router automatically
macro_rules! add_path{
    ($router:ident $(, $path:ident)*) => {
        $(
            $router.insert(paths::$path, endpoints::$path)?;
        )*
    }
}

/// Names of the parameters in the HTTP paths, used to extract them
/// from the parameters inside of request handling
pub mod params {
    /// Key of dish ids in HTTP paths
    pub const DISH_ID: &str = "dish_id";

    /// Key of order ids in HTTP paths
    pub const ORDER_ID: &str = "order_id";
}

/// Return the HTTP path for a dish based on its id
pub fn dish_by_id(dish_id: &str) -> String {
    paths::DISH_BY_ID.replace("{dish_id}", dish_id)
}

/// Return the HTTP path for an order based on its id
pub fn order_by_id(order_id: &str) -> String {
    paths::ORDER_BY_ID.replace("{order_id}", order_id)
}

// spurious warning, I am using this in tests
#[allow(unused_macros)]
/// Utility to create easily hashmaps of parameters for testing
macro_rules! make_params {
    () => {
        std::collections::HashMap::new()
    };
    ($name:ident: $value:expr $(, $name2:ident: $value2:expr)* ) => {
        {
            let mut map = std::collections::HashMap::new();
            map.insert($crate::routes::params::$name.to_string(), $value.to_string());
            $(
                map.insert($crate::routes::params::$name2.to_string(), $value2.to_string());
            )*
            map
        }
    }
}

#[allow(unused_imports)]
pub(crate) use make_params;

/// Create a new router with the paths defined in this module
///
/// Errors from this functions are programming errors, most likely steming from a
/// misuse of matchit
fn new_router() -> errors::Result<Router<&'static str>> {
    let mut router = Router::new();
    add_path!(router, DISHES, DISH_BY_ID, ORDERS, ORDER_BY_ID);
    Ok(router)
}

/// Type of the object containing the HTTP path parameters passed to handlers
pub type HttpParams = HashMap<String, String>;
/// Type of the function that handles HTTP requests
pub type HttpHandler = fn(Request, HttpParams, &mut Database) -> ApiResult<Response>;

/// The router is in charge of taking in raw HTTP requests and to dispatch them to
/// the appropriate handler function.
pub struct HttpRouter {
    routes: Router<&'static str>,
    handlers: HashMap<&'static str, HashMap<&'static str, HttpHandler>>,
}

impl HttpRouter {
    /// Creates a new empty router
    ///
    /// Although the matchit router is not empty, there are no methods associated
    /// to the routes yet, so no request can be processed
    /// Errors in this function are programming errors.
    pub fn new() -> errors::Result<Self> {
        let routes = new_router()?;
        Ok(HttpRouter {
            routes,
            handlers: HashMap::new(),
        })
    }

    /// Add a new route to the router
    pub fn add_route(&mut self, method: &'static str, route: &'static str, handler: HttpHandler) {
        let method_to_handler = self.handlers.entry(route).or_default();
        method_to_handler.insert(method, handler);
    }

    /// Sends a request to the appropriate handler if it exists
    ///
    /// If there is a route matching the request, its handler will be called and the result of the
    /// function will be the result of the handler. An unknown path yields
    /// `ApiError::RouteNotFound`, a known path without a handler for the request method yields
    /// `ApiError::MethodNotAllowed`. The query string, if any, is not used for matching.
    ///
    /// Checking that all parameters are presents and that the body is correct is the
    /// responsibility of the handler
    pub fn route(&self, request: Request, db: &mut Database) -> ApiResult<Response> {
        let path = request
            .path
            .split_once('?')
            .map_or(request.path.as_str(), |(path, _)| path);

        let route = self
            .routes
            .at(path)
            .map_err(|_| ApiError::RouteNotFound(path.to_string()))?;
        let handler = self
            .handlers
            .get(route.value)
            .and_then(|method_to_handler| method_to_handler.get(request.method.as_str()))
            .ok_or_else(|| ApiError::MethodNotAllowed {
                method: request.method.clone(),
                path: path.to_string(),
            })?;

        let params: HttpParams = route
            .params
            .iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        handler(request, params, db)
    }
}
