//! HTTP handlers for order endpoints.
//!
//! The same handlers serve both route trees; `OrderHandlers::route` decides
//! which scope a caller gets.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::order::{
    CreateOrderCommand, CreateOrderHandler, DeleteOrderCommand, DeleteOrderHandler,
    GetOrderHandler, GetOrderQuery, ListOrdersHandler, ListOrdersQuery, UpdateOrderCommand,
    UpdateOrderHandler,
};
use crate::domain::foundation::{resolve_scope, OrderId, Principal, RouteKind, Scope};
use crate::domain::order::OrderError;
use crate::ports::OrderRepository;

use super::dto::{ErrorResponse, ListOrdersParams, OrderRequest, OrderResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct OrderHandlers {
    list_handler: Arc<ListOrdersHandler>,
    get_handler: Arc<GetOrderHandler>,
    create_handler: Arc<CreateOrderHandler>,
    update_handler: Arc<UpdateOrderHandler>,
    delete_handler: Arc<DeleteOrderHandler>,
    route: RouteKind,
    verbose_errors: bool,
}

impl OrderHandlers {
    /// Builds the handler set for one repository, serving the public tree.
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self {
            list_handler: Arc::new(ListOrdersHandler::new(repository.clone())),
            get_handler: Arc::new(GetOrderHandler::new(repository.clone())),
            create_handler: Arc::new(CreateOrderHandler::new(repository.clone())),
            update_handler: Arc::new(UpdateOrderHandler::new(repository.clone())),
            delete_handler: Arc::new(DeleteOrderHandler::new(repository)),
            route: RouteKind::Public,
            verbose_errors: false,
        }
    }

    /// Same handlers, mounted on another route tree.
    pub fn for_route(&self, route: RouteKind) -> Self {
        Self {
            route,
            ..self.clone()
        }
    }

    /// Include infrastructure error text in 500 bodies.
    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }

    pub fn route(&self) -> RouteKind {
        self.route
    }

    fn scope_for(&self, principal: &Principal) -> Scope {
        let scope = resolve_scope(principal, self.route);
        tracing::debug!(user = %principal.name(), route = %self.route, scope = %scope, "Resolved scope");
        scope
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET {root} - List orders visible to the caller
pub async fn list_orders(
    State(handlers): State<OrderHandlers>,
    RequireAuth(principal): RequireAuth,
    query: Result<Query<Vec<(String, String)>>, axum::extract::rejection::QueryRejection>,
) -> Response {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(e.body_text())))
                .into_response()
        }
    };
    let params = match ListOrdersParams::from_pairs(&pairs) {
        Ok(params) => params,
        Err(e) => return handle_order_error(e.into(), handlers.verbose_errors),
    };

    let query = ListOrdersQuery {
        scope: handlers.scope_for(&principal),
        product_type: params.product_type,
        page: params.page,
    };

    match handlers.list_handler.handle(query).await {
        Ok(page) => {
            let page = page.map(OrderResponse::from);
            let mut response = (StatusCode::OK, Json(page.items)).into_response();
            response
                .headers_mut()
                .insert("x-total-count", HeaderValue::from(page.total));
            response
        }
        Err(e) => handle_order_error(e, handlers.verbose_errors),
    }
}

/// GET {root}/:id - Get one order
pub async fn get_order(
    State(handlers): State<OrderHandlers>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetOrderQuery {
        id,
        scope: handlers.scope_for(&principal),
    };

    match handlers.get_handler.handle(query).await {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(order))).into_response(),
        Err(e) => handle_order_error(e, handlers.verbose_errors),
    }
}

/// POST {root} - Create an order
pub async fn create_order(
    State(handlers): State<OrderHandlers>,
    RequireAuth(principal): RequireAuth,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(e),
    };
    let (requested_owner, details) = req.into_parts();

    let cmd = CreateOrderCommand {
        scope: handlers.scope_for(&principal),
        principal,
        requested_owner,
        details,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(order) => {
            let location = order
                .id()
                .map(|id| format!("{}/{}", handlers.route.base_path(), id));
            let mut response =
                (StatusCode::CREATED, Json(OrderResponse::from(order))).into_response();
            if let Some(value) = location.and_then(|l| HeaderValue::from_str(&l).ok()) {
                response.headers_mut().insert(header::LOCATION, value);
            }
            response
        }
        Err(e) => handle_order_error(e, handlers.verbose_errors),
    }
}

/// PUT {root}/:id - Overwrite an order
pub async fn update_order(
    State(handlers): State<OrderHandlers>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<String>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(e),
    };
    let (requested_owner, details) = req.into_parts();

    let cmd = UpdateOrderCommand {
        id,
        scope: handlers.scope_for(&principal),
        principal,
        requested_owner,
        details,
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_order_error(e, handlers.verbose_errors),
    }
}

/// DELETE {root}/:id - Delete an order
pub async fn delete_order(
    State(handlers): State<OrderHandlers>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = DeleteOrderCommand {
        id,
        scope: handlers.scope_for(&principal),
    };

    match handlers.delete_handler.handle(cmd).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_order_error(e, handlers.verbose_errors),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_id(raw: &str) -> Result<OrderId, Response> {
    raw.parse::<OrderId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid order ID")),
        )
            .into_response()
    })
}

fn bad_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(rejection.body_text())),
    )
        .into_response()
}

fn handle_order_error(error: OrderError, verbose: bool) -> Response {
    match error {
        OrderError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Order", &id.to_string())),
        )
            .into_response(),
        OrderError::ValidationFailed { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::bad_request(message)
                    .with_details(serde_json::json!({ "field": field })),
            ),
        )
            .into_response(),
        OrderError::Infrastructure(msg) => {
            tracing::error!("Order store failure: {}", msg);
            let message = if verbose {
                msg
            } else {
                "Internal server error".to_string()
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(message)),
            )
                .into_response()
        }
    }
}
