use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use api_types::fleet::{
    ActiveUpdate, Created, CustomerNew, CustomerView, DriverNew, DriverView, VehicleNew,
    VehicleView,
};
use engine::{CustomerCmd, DriverCmd, VehicleCmd, customers, drivers, vehicles};

fn vehicle_view(model: vehicles::Model) -> VehicleView {
    VehicleView {
        id: model.id,
        name: model.name,
        registration_no: model.registration_no,
        active: model.active,
    }
}

fn driver_view(model: drivers::Model) -> DriverView {
    DriverView {
        id: model.id,
        name: model.name,
        phone: model.phone,
        active: model.active,
    }
}

fn customer_view(model: customers::Model) -> CustomerView {
    CustomerView {
        id: model.id,
        name: model.name,
        contact: model.contact,
        gst_no: model.gst_no,
        active: model.active,
    }
}

pub async fn vehicle_create(
    State(state): State<ServerState>,
    Json(body): Json<VehicleNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_vehicle(VehicleCmd {
            name: body.name,
            registration_no: body.registration_no,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn vehicle_list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<VehicleView>>, ServerError> {
    let rows = state.engine.list_vehicles().await?;
    Ok(Json(rows.into_iter().map(vehicle_view).collect()))
}

pub async fn vehicle_get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleView>, ServerError> {
    Ok(Json(vehicle_view(state.engine.vehicle(&id).await?)))
}

pub async fn vehicle_update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ActiveUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_vehicle(&id, body.name, body.active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn vehicle_remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_vehicle(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn driver_create(
    State(state): State<ServerState>,
    Json(body): Json<DriverNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_driver(DriverCmd {
            name: body.name,
            phone: body.phone,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn driver_list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<DriverView>>, ServerError> {
    let rows = state.engine.list_drivers().await?;
    Ok(Json(rows.into_iter().map(driver_view).collect()))
}

pub async fn driver_get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DriverView>, ServerError> {
    Ok(Json(driver_view(state.engine.driver(&id).await?)))
}

pub async fn driver_update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ActiveUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_driver(&id, body.name, None, body.active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn driver_remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_driver(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn customer_create(
    State(state): State<ServerState>,
    Json(body): Json<CustomerNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_customer(CustomerCmd {
            name: body.name,
            contact: body.contact,
            gst_no: body.gst_no,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn customer_list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CustomerView>>, ServerError> {
    let rows = state.engine.list_customers().await?;
    Ok(Json(rows.into_iter().map(customer_view).collect()))
}

pub async fn customer_get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerView>, ServerError> {
    Ok(Json(customer_view(state.engine.customer(&id).await?)))
}

pub async fn customer_update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ActiveUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_customer(&id, body.name, None, None, body.active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn customer_remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_customer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
