//! Vehicles, drivers and customers.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, customers, drivers, vehicles};

use super::{Engine, normalize_optional_text, normalize_required, with_tx};

pub struct VehicleCmd {
    pub name: String,
    pub registration_no: String,
}

pub struct DriverCmd {
    pub name: String,
    pub phone: Option<String>,
}

pub struct CustomerCmd {
    pub name: String,
    pub contact: Option<String>,
    pub gst_no: Option<String>,
}

impl Engine {
    pub async fn new_vehicle(&self, cmd: VehicleCmd) -> ResultEngine<String> {
        let name = normalize_required(&cmd.name, "vehicle name")?;
        let registration_no = normalize_required(&cmd.registration_no, "registration number")?;

        with_tx!(self, |db_tx| {
            let existing = vehicles::Entity::find()
                .filter(vehicles::Column::RegistrationNo.eq(registration_no.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(registration_no));
            }

            let id = Uuid::new_v4().to_string();
            let model = vehicles::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                name: ActiveValue::Set(name),
                registration_no: ActiveValue::Set(registration_no),
                active: ActiveValue::Set(true),
            };
            model.insert(&db_tx).await?;
            Ok(id)
        })
    }

    pub async fn vehicle(&self, id: &str) -> ResultEngine<vehicles::Model> {
        vehicles::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("vehicle {id}")))
    }

    pub async fn list_vehicles(&self) -> ResultEngine<Vec<vehicles::Model>> {
        Ok(vehicles::Entity::find()
            .order_by_asc(vehicles::Column::Name)
            .all(&self.database)
            .await?)
    }

    pub async fn update_vehicle(
        &self,
        id: &str,
        name: Option<String>,
        active: Option<bool>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let vehicle = vehicles::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("vehicle {id}")))?;
            let mut model: vehicles::ActiveModel = vehicle.into();
            if let Some(name) = name {
                model.name = ActiveValue::Set(normalize_required(&name, "vehicle name")?);
            }
            if let Some(active) = active {
                model.active = ActiveValue::Set(active);
            }
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_vehicle(&self, id: &str) -> ResultEngine<()> {
        let deleted = vehicles::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("vehicle {id}")));
        }
        Ok(())
    }

    pub async fn new_driver(&self, cmd: DriverCmd) -> ResultEngine<String> {
        let name = normalize_required(&cmd.name, "driver name")?;
        let id = Uuid::new_v4().to_string();
        let model = drivers::ActiveModel {
            id: ActiveValue::Set(id.clone()),
            name: ActiveValue::Set(name),
            phone: ActiveValue::Set(normalize_optional_text(cmd.phone.as_deref())),
            active: ActiveValue::Set(true),
        };
        model.insert(&self.database).await?;
        Ok(id)
    }

    pub async fn driver(&self, id: &str) -> ResultEngine<drivers::Model> {
        drivers::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("driver {id}")))
    }

    pub async fn list_drivers(&self) -> ResultEngine<Vec<drivers::Model>> {
        Ok(drivers::Entity::find()
            .order_by_asc(drivers::Column::Name)
            .all(&self.database)
            .await?)
    }

    pub async fn update_driver(
        &self,
        id: &str,
        name: Option<String>,
        phone: Option<String>,
        active: Option<bool>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let driver = drivers::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("driver {id}")))?;
            let mut model: drivers::ActiveModel = driver.into();
            if let Some(name) = name {
                model.name = ActiveValue::Set(normalize_required(&name, "driver name")?);
            }
            if let Some(phone) = phone {
                model.phone = ActiveValue::Set(normalize_optional_text(Some(&phone)));
            }
            if let Some(active) = active {
                model.active = ActiveValue::Set(active);
            }
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_driver(&self, id: &str) -> ResultEngine<()> {
        let deleted = drivers::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("driver {id}")));
        }
        Ok(())
    }

    pub async fn new_customer(&self, cmd: CustomerCmd) -> ResultEngine<String> {
        let name = normalize_required(&cmd.name, "customer name")?;
        let id = Uuid::new_v4().to_string();
        let model = customers::ActiveModel {
            id: ActiveValue::Set(id.clone()),
            name: ActiveValue::Set(name),
            contact: ActiveValue::Set(normalize_optional_text(cmd.contact.as_deref())),
            gst_no: ActiveValue::Set(normalize_optional_text(cmd.gst_no.as_deref())),
            active: ActiveValue::Set(true),
        };
        model.insert(&self.database).await?;
        Ok(id)
    }

    pub async fn customer(&self, id: &str) -> ResultEngine<customers::Model> {
        customers::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("customer {id}")))
    }

    pub async fn list_customers(&self) -> ResultEngine<Vec<customers::Model>> {
        Ok(customers::Entity::find()
            .order_by_asc(customers::Column::Name)
            .all(&self.database)
            .await?)
    }

    pub async fn update_customer(
        &self,
        id: &str,
        name: Option<String>,
        contact: Option<String>,
        gst_no: Option<String>,
        active: Option<bool>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let customer = customers::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("customer {id}")))?;
            let mut model: customers::ActiveModel = customer.into();
            if let Some(name) = name {
                model.name = ActiveValue::Set(normalize_required(&name, "customer name")?);
            }
            if let Some(contact) = contact {
                model.contact = ActiveValue::Set(normalize_optional_text(Some(&contact)));
            }
            if let Some(gst_no) = gst_no {
                model.gst_no = ActiveValue::Set(normalize_optional_text(Some(&gst_no)));
            }
            if let Some(active) = active {
                model.active = ActiveValue::Set(active);
            }
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_customer(&self, id: &str) -> ResultEngine<()> {
        let deleted = customers::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("customer {id}")));
        }
        Ok(())
    }
}
