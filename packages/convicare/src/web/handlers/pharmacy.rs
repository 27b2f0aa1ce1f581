use crate::error::Error;
use crate::web::extract::Authenticated;
use crate::web::AppState;
use axum::extract::{Path, State};
use axum::response::Html;

pub async fn list(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Html<String>, Error> {
    let orders = state.reports.list_pharmacy_orders().await?;
    state.views.pharmacy_list(&identity, &orders)
}

pub async fn detail(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let order = state
        .repository
        .find_pharmacy_order(id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Pharmacy order",
            id,
        })?;
    state.views.pharmacy_detail(&identity, &order)
}
