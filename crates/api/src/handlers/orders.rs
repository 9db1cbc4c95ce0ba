//! Handlers for order CRUD, listing, and filtered listing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use orders_core::error::CoreError;
use orders_core::import::ValidOrder;
use orders_core::pagination::{
    parse_sort_terms, validate_pageable, PageRequest, SortConstraint, DEFAULT_PAGE,
    DEFAULT_PAGE_SIZE,
};
use orders_core::report::{parse_optional_payment, parse_optional_status, parse_optional_uuid};
use orders_core::types::{DbId, Timestamp};
use orders_db::models::order::OrderWithCustomer;
use orders_db::repositories::{CustomerRepo, OrderRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::query::PageableParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Sort policy for the order listing.
const ORDER_SORT: SortConstraint =
    SortConstraint::whitelist(&["status", "payment_method", "amount"]);

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for creating an order. All fields are required.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub status: String,
    pub payment_method: String,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount: f64,
}

/// Request body for updating an order. All fields are required.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    pub status: String,
    pub payment_method: String,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount: f64,
}

/// Request body for the filtered listing. An empty object is a valid,
/// unconstrained filter.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct OrderFilterRequest {
    pub customer_id: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    #[validate(range(min = 0, message = "Page must be >= 0"))]
    pub page: Option<i32>,
    #[validate(range(min = 1, max = 100, message = "Size must be between 1 and 100"))]
    pub size: Option<i32>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Customer fields embedded in an order response.
#[derive(Debug, Serialize)]
pub struct OrderCustomer {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
}

/// Full order view with its customer.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: DbId,
    pub amount: f64,
    pub status: String,
    pub payment_method: Option<String>,
    pub created_at: Timestamp,
    pub customer: OrderCustomer,
}

impl From<OrderWithCustomer> for OrderResponse {
    fn from(row: OrderWithCustomer) -> Self {
        Self {
            id: row.id,
            amount: row.amount,
            status: row.status,
            payment_method: row.payment_method,
            created_at: row.created_at,
            customer: OrderCustomer {
                id: row.customer_id,
                first_name: row.customer_first_name,
                last_name: row.customer_last_name,
                email: row.customer_email,
                phone: row.customer_phone,
                city: row.customer_city,
            },
        }
    }
}

/// Abbreviated customer used by the filtered listing.
#[derive(Debug, Serialize)]
pub struct OrderCustomerShort {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
}

/// Abbreviated order view for the filtered listing.
#[derive(Debug, Serialize)]
pub struct OrderShortResponse {
    pub id: DbId,
    pub amount: f64,
    pub status: String,
    pub payment_method: Option<String>,
    pub created_at: Timestamp,
    pub customer: OrderCustomerShort,
}

impl From<OrderWithCustomer> for OrderShortResponse {
    fn from(row: OrderWithCustomer) -> Self {
        Self {
            id: row.id,
            amount: row.amount,
            status: row.status,
            payment_method: row.payment_method,
            created_at: row.created_at,
            customer: OrderCustomerShort {
                id: row.customer_id,
                full_name: format!(
                    "{} {}",
                    row.customer_first_name, row.customer_last_name
                ),
                email: row.customer_email,
            },
        }
    }
}

/// One page of full order views.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total_pages: i64,
}

/// One page of abbreviated order views.
#[derive(Debug, Serialize)]
pub struct OrderShortListResponse {
    pub orders: Vec<OrderShortResponse>,
    pub total_pages: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/orders
///
/// Paginated order listing. Sorting is restricted to status,
/// payment_method, and amount.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<PageableParams>,
) -> AppResult<Json<DataResponse<OrderListResponse>>> {
    let sort_terms = parse_sort_terms(params.sort.as_deref())?;
    let page = validate_pageable(
        params.page.as_deref(),
        params.size.as_deref(),
        sort_terms,
        &ORDER_SORT,
    )?;

    let rows = OrderRepo::list_with_customer(&state.pool, &page).await?;
    let total = OrderRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: OrderListResponse {
            orders: rows.into_iter().map(OrderResponse::from).collect(),
            total_pages: page.total_pages(total),
        },
    }))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderResponse>>> {
    let row = OrderRepo::find_with_customer(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;

    Ok(Json(DataResponse {
        data: OrderResponse::from(row),
    }))
}

/// POST /api/orders
///
/// Creates an order for an existing customer.
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<OrderResponse>>)> {
    body.validate()?;

    let customer_id = require_field(
        parse_optional_uuid(Some(body.customer_id.as_str()))?,
        "customer_id",
    )?;
    let status = require_field(parse_optional_status(Some(body.status.as_str()))?, "status")?;
    let payment_method = require_field(
        parse_optional_payment(Some(body.payment_method.as_str()))?,
        "payment_method",
    )?;

    let customer = CustomerRepo::find_by_id(&state.pool, customer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Customer",
            id: customer_id,
        })?;

    let order = OrderRepo::create(
        &state.pool,
        &ValidOrder {
            customer_id,
            amount: body.amount,
            status,
            payment_method,
        },
    )
    .await?;

    tracing::info!(order_id = %order.id, customer_id = %customer_id, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: OrderResponse {
                id: order.id,
                amount: order.amount,
                status: order.status,
                payment_method: order.payment_method,
                created_at: order.created_at,
                customer: OrderCustomer {
                    id: customer.id,
                    first_name: customer.first_name,
                    last_name: customer.last_name,
                    email: customer.email,
                    phone: customer.phone,
                    city: customer.city,
                },
            },
        }),
    ))
}

/// PUT /api/orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateOrderRequest>,
) -> AppResult<Json<DataResponse<OrderResponse>>> {
    body.validate()?;

    let status = require_field(parse_optional_status(Some(body.status.as_str()))?, "status")?;
    let payment_method = require_field(
        parse_optional_payment(Some(body.payment_method.as_str()))?,
        "payment_method",
    )?;

    OrderRepo::update(&state.pool, id, status, payment_method, body.amount)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;

    // Re-read with the customer joined for the response.
    let row = OrderRepo::find_with_customer(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;

    Ok(Json(DataResponse {
        data: OrderResponse::from(row),
    }))
}

/// DELETE /api/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = OrderRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "Order", id }.into());
    }

    Ok(Json(MessageResponse::ok(format!(
        "Order with id '{id}' was deleted."
    ))))
}

/// POST /api/orders/_list
///
/// Filtered, paginated listing. Filter terms are optional and ANDed; a
/// supplied customer filter must reference an existing customer.
pub async fn list_filtered(
    State(state): State<AppState>,
    Json(body): Json<OrderFilterRequest>,
) -> AppResult<Json<DataResponse<OrderShortListResponse>>> {
    body.validate()?;

    let customer_id = parse_optional_uuid(body.customer_id.as_deref())?;
    let status = parse_optional_status(body.status.as_deref())?;
    let payment_method = parse_optional_payment(body.payment_method.as_deref())?;

    if let Some(id) = customer_id {
        if !CustomerRepo::exists_by_id(&state.pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "Customer",
                id,
            }
            .into());
        }
    }

    let page = PageRequest {
        page: body.page.unwrap_or(DEFAULT_PAGE as i32) as u32,
        size: body.size.unwrap_or(DEFAULT_PAGE_SIZE as i32) as u32,
        sort: Vec::new(),
    };

    let rows =
        OrderRepo::find_by_filters(&state.pool, customer_id, status, payment_method, &page)
            .await?;
    let total =
        OrderRepo::count_by_filters(&state.pool, customer_id, status, payment_method).await?;

    Ok(Json(DataResponse {
        data: OrderShortListResponse {
            orders: rows.into_iter().map(OrderShortResponse::from).collect(),
            total_pages: page.total_pages(total),
        },
    }))
}

/// Unwrap an optional parsed field that the request requires.
fn require_field<T>(value: Option<T>, field: &'static str) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::InvalidParameter(format!("'{field}' is required")))
}
