#![allow(dead_code)]

use chrono::{DateTime, Utc};
use engine::{BankCmd, CustomerCmd, DriverCmd, Engine, FillUpCmd, VehicleCmd, users};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveValue, Database, EntityTrait};

pub const USER: &str = "admin";

pub async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    // Banks carry an owner FK, so the fixture user must exist first.
    users::Entity::insert(users::ActiveModel {
        username: ActiveValue::Set(USER.to_string()),
        password: ActiveValue::Set("secret".to_string()),
    })
    .exec(&db)
    .await
    .unwrap();
    Engine::builder().database(db).build()
}

pub async fn bank(engine: &Engine, account_no: &str, opening_minor: i64) -> String {
    engine
        .new_bank(BankCmd {
            name: format!("Bank {account_no}"),
            account_no: account_no.to_string(),
            opening_balance_minor: opening_minor,
            owner: USER.to_string(),
        })
        .await
        .unwrap()
}

pub async fn vehicle(engine: &Engine, registration_no: &str) -> String {
    engine
        .new_vehicle(VehicleCmd {
            name: format!("Truck {registration_no}"),
            registration_no: registration_no.to_string(),
        })
        .await
        .unwrap()
}

pub async fn driver(engine: &Engine, name: &str) -> String {
    engine
        .new_driver(DriverCmd {
            name: name.to_string(),
            phone: None,
        })
        .await
        .unwrap()
}

pub async fn customer(engine: &Engine, name: &str) -> String {
    engine
        .new_customer(CustomerCmd {
            name: name.to_string(),
            contact: None,
            gst_no: None,
        })
        .await
        .unwrap()
}

pub fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().to_utc()
}

pub fn fill_up(
    vehicle_id: &str,
    bank_id: &str,
    start_km: i64,
    end_km: i64,
    quantity_milli: i64,
    rate_minor: i64,
) -> FillUpCmd {
    FillUpCmd {
        vehicle_id: vehicle_id.to_string(),
        bank_id: bank_id.to_string(),
        start_km,
        end_km,
        quantity_milli,
        rate_minor,
        occurred_at: None,
        created_by: USER.to_string(),
    }
}
