use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use api_types::trip::{
    RouteExpenseNew, RouteNew, RouteStatus, RouteView, TripCreated, TripNew, TripStatus,
    TripUpdate, TripView,
};
use engine::{
    RouteCmd, RouteExpenseCmd, TripCmd, TripUpdateCmd, trip_routes, trips, users,
};

fn route_status_to_engine(status: RouteStatus) -> engine::RouteStatus {
    match status {
        RouteStatus::Pending => engine::RouteStatus::Pending,
        RouteStatus::Completed => engine::RouteStatus::Completed,
    }
}

fn route_status_to_api(status: engine::RouteStatus) -> RouteStatus {
    match status {
        engine::RouteStatus::Pending => RouteStatus::Pending,
        engine::RouteStatus::Completed => RouteStatus::Completed,
    }
}

fn trip_status_to_engine(status: TripStatus) -> engine::TripStatus {
    match status {
        TripStatus::Draft => engine::TripStatus::Draft,
        TripStatus::InProgress => engine::TripStatus::InProgress,
        TripStatus::Completed => engine::TripStatus::Completed,
    }
}

fn trip_status_to_api(status: engine::TripStatus) -> TripStatus {
    match status {
        engine::TripStatus::Draft => TripStatus::Draft,
        engine::TripStatus::InProgress => TripStatus::InProgress,
        engine::TripStatus::Completed => TripStatus::Completed,
    }
}

fn route_cmd(body: RouteNew) -> RouteCmd {
    RouteCmd {
        customer_id: body.customer_id,
        bank_id: body.bank_id,
        rate_minor: body.rate_minor,
        weight_milli: body.weight_milli,
        amount_minor: body.amount_minor,
        advance_minor: body.advance_minor.unwrap_or(0),
        expenses: body
            .expenses
            .unwrap_or_default()
            .into_iter()
            .map(|RouteExpenseNew { description, amount_minor }| RouteExpenseCmd {
                description,
                amount_minor,
            })
            .collect(),
        status: body
            .status
            .map(route_status_to_engine)
            .unwrap_or(engine::RouteStatus::Pending),
    }
}

fn route_view(model: trip_routes::Model) -> Result<RouteView, ServerError> {
    let status = engine::RouteStatus::try_from(model.status.as_str())?;
    Ok(RouteView {
        id: model.id,
        route_no: model.route_no,
        customer_id: model.customer_id,
        bank_id: model.bank_id,
        rate_minor: model.rate_minor,
        weight_milli: model.weight_milli,
        amount_minor: model.amount_minor,
        advance_minor: model.advance_minor,
        expenses_minor: model.expenses_minor,
        status: route_status_to_api(status),
    })
}

fn trip_view(
    trip: trips::Model,
    routes: Vec<trip_routes::Model>,
) -> Result<TripView, ServerError> {
    let status = engine::TripStatus::try_from(trip.status.as_str())?;
    let routes = routes
        .into_iter()
        .map(route_view)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TripView {
        id: trip.id,
        vehicle_id: trip.vehicle_id,
        driver_id: trip.driver_id,
        start_km: trip.start_km,
        end_km: trip.end_km,
        start_date: trip.start_date,
        end_date: trip.end_date,
        status: trip_status_to_api(status),
        route_cost_minor: trip.route_cost_minor,
        expenses_minor: trip.expenses_minor,
        diesel_cost_minor: trip.diesel_cost_minor,
        remaining_minor: trip.remaining_minor,
        fuel_used_milli: trip.fuel_used_milli,
        routes,
    })
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(body): Json<TripNew>,
) -> Result<(StatusCode, Json<TripCreated>), ServerError> {
    let id = state
        .engine
        .new_trip(TripCmd {
            vehicle_id: body.vehicle_id,
            driver_id: body.driver_id,
            start_km: body.start_km,
            end_km: body.end_km,
            start_date: body.start_date,
            end_date: body.end_date,
            routes: body.routes.into_iter().map(route_cmd).collect(),
            occurred_at: body.occurred_at,
            created_by: user.username,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(TripCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<TripView>>, ServerError> {
    let rows = state.engine.list_trips().await?;
    let views = rows
        .into_iter()
        .map(|(trip, routes)| trip_view(trip, routes))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<TripView>, ServerError> {
    let (trip, routes) = state.engine.trip(&id).await?;
    Ok(Json(trip_view(trip, routes)?))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<TripUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_trip(
            &id,
            TripUpdateCmd {
                status: body.status.map(trip_status_to_engine),
                end_km: body.end_km,
                route_statuses: body
                    .route_statuses
                    .unwrap_or_default()
                    .into_iter()
                    .map(|update| (update.route_no, route_status_to_engine(update.status)))
                    .collect(),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_trip(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
