use std::sync::Mutex;

use crate::database::Database;
use crate::endpoints::create_http_router;
use crate::errors::Result;
use crate::http::{Request, Response};
use crate::routes::HttpRouter;

/// The application: a router and the database it serves.
///
/// Requests may come from several threads. The database lock is held for the whole handling of
/// a request, so each request sees and leaves the stores in a consistent state.
pub struct App {
    router: HttpRouter,
    db: Mutex<Database>,
}

impl App {
    pub fn new(db: Database) -> Result<Self> {
        Ok(App {
            router: create_http_router()?,
            db: Mutex::new(db),
        })
    }

    /// Run a request through the router and turn the outcome into a response.
    ///
    /// This is the only place where errors become responses.
    pub fn handle(&self, request: Request) -> Response {
        let method = request.method.clone();
        let path = request.path.clone();

        let mut db = match self.db.lock() {
            Ok(db) => db,
            Err(poisoned) => {
                tracing::error!("database lock poisoned by a panicking request");
                poisoned.into_inner()
            }
        };
        let response = self
            .router
            .route(request, &mut db)
            .unwrap_or_else(|err| {
                tracing::debug!(%err, "request rejected");
                err.into_response()
            });
        drop(db);

        tracing::info!(
            %method,
            %path,
            status = response.status.unwrap_or(500),
            "request handled"
        );
        response
    }
}
