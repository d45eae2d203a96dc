use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{
    banks, budgets, cashbook, fleet, fuel, invoices, maintenance, reports, transactions, trips,
};
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // A missing or malformed header is a 401, not the extractor's 400.
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/banks", post(banks::create).get(banks::list))
        .route(
            "/banks/{id}",
            get(banks::get).put(banks::update).delete(banks::remove),
        )
        .route("/transfers", post(banks::transfer))
        .route("/transactions", get(transactions::list))
        .route("/incomes", post(cashbook::income_create).get(cashbook::income_list))
        .route(
            "/incomes/{id}",
            put(cashbook::income_update).delete(cashbook::income_remove),
        )
        .route(
            "/expenses",
            post(cashbook::expense_create).get(cashbook::expense_list),
        )
        .route(
            "/expenses/{id}",
            put(cashbook::expense_update).delete(cashbook::expense_remove),
        )
        .route("/vehicles", post(fleet::vehicle_create).get(fleet::vehicle_list))
        .route(
            "/vehicles/{id}",
            get(fleet::vehicle_get)
                .put(fleet::vehicle_update)
                .delete(fleet::vehicle_remove),
        )
        .route("/drivers", post(fleet::driver_create).get(fleet::driver_list))
        .route(
            "/drivers/{id}",
            get(fleet::driver_get)
                .put(fleet::driver_update)
                .delete(fleet::driver_remove),
        )
        .route(
            "/customers",
            post(fleet::customer_create).get(fleet::customer_list),
        )
        .route(
            "/customers/{id}",
            get(fleet::customer_get)
                .put(fleet::customer_update)
                .delete(fleet::customer_remove),
        )
        .route("/fuel-tracking", post(fuel::create).get(fuel::list))
        .route(
            "/fuel-tracking/{id}",
            get(fuel::get).put(fuel::update).delete(fuel::remove),
        )
        .route("/driver-budgets", post(budgets::create).get(budgets::list))
        .route("/driver-budgets/{id}", delete(budgets::remove))
        .route(
            "/maintenance",
            post(maintenance::create).get(maintenance::list),
        )
        .route(
            "/maintenance/{id}",
            get(maintenance::get).delete(maintenance::remove),
        )
        .route("/maintenance/{id}/accept", post(maintenance::accept))
        .route("/maintenance/{id}/decline", post(maintenance::decline))
        .route("/maintenance/monitor", get(maintenance::monitor))
        .route("/trips", post(trips::create).get(trips::list))
        .route(
            "/trips/{id}",
            get(trips::get).put(trips::update).delete(trips::remove),
        )
        .route("/invoices", post(invoices::create).get(invoices::list))
        .route(
            "/invoices/{id}",
            get(invoices::get)
                .put(invoices::update)
                .delete(invoices::remove),
        )
        .route("/reports/download", get(reports::download))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Build the full application router over a fresh state.
pub fn app(engine: Engine, db: DatabaseConnection) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

pub async fn run(engine: Engine, db: DatabaseConnection, bind: &str) {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("server listening on {addr}");

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
