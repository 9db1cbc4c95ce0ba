//! Handlers for customer CRUD and listing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use orders_core::error::CoreError;
use orders_core::pagination::{parse_sort_terms, validate_pageable, SortConstraint};
use orders_core::types::DbId;
use orders_db::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use orders_db::repositories::CustomerRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::query::PageableParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Sort policy for the customer listing.
const CUSTOMER_SORT: SortConstraint =
    SortConstraint::whitelist(&["first_name", "last_name", "city"]);

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Request body for creating a customer. All fields are required.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 3, max = 100, message = "Name is required"))]
    pub first_name: String,
    #[validate(length(min = 3, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 3, max = 255, message = "City is required"))]
    pub city: String,
}

/// Request body for updating a customer. Absent fields keep their value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 3, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 3, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 50))]
    pub phone: Option<String>,
    #[validate(length(min = 3, max = 255))]
    pub city: Option<String>,
}

/// One page of customers plus the page count for the whole table.
#[derive(Debug, Serialize)]
pub struct CustomerListResponse {
    pub customers: Vec<Customer>,
    pub total_pages: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/customers
///
/// Paginated customer listing. Sorting is restricted to first_name,
/// last_name, and city.
pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<PageableParams>,
) -> AppResult<Json<DataResponse<CustomerListResponse>>> {
    let sort_terms = parse_sort_terms(params.sort.as_deref())?;
    let page = validate_pageable(
        params.page.as_deref(),
        params.size.as_deref(),
        sort_terms,
        &CUSTOMER_SORT,
    )?;

    let customers = CustomerRepo::list(&state.pool, &page).await?;
    let total = CustomerRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: CustomerListResponse {
            customers,
            total_pages: page.total_pages(total),
        },
    }))
}

/// GET /api/customers/{id}
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Customer>>> {
    let customer = CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Customer",
            id,
        })?;

    Ok(Json(DataResponse { data: customer }))
}

/// POST /api/customers
///
/// Creates a customer; a duplicate email is rejected with 409.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Customer>>)> {
    body.validate()?;

    if CustomerRepo::exists_by_email(&state.pool, &body.email).await? {
        return Err(CoreError::Conflict(format!(
            "Customer with email '{}' already exists",
            body.email
        ))
        .into());
    }

    let customer = CustomerRepo::create(
        &state.pool,
        &CreateCustomer {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            city: body.city,
        },
    )
    .await?;

    tracing::info!(customer_id = %customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// PUT /api/customers/{id}
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateCustomerRequest>,
) -> AppResult<Json<DataResponse<Customer>>> {
    body.validate()?;

    let customer = CustomerRepo::update(
        &state.pool,
        id,
        &UpdateCustomer {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            city: body.city,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Customer",
        id,
    })?;

    Ok(Json(DataResponse { data: customer }))
}

/// DELETE /api/customers/{id}
///
/// Deletes a customer and, via cascade, all of its orders.
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = CustomerRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "Customer",
            id,
        }
        .into());
    }

    Ok(Json(MessageResponse::ok(format!(
        "Customer with id '{id}' was deleted."
    ))))
}
