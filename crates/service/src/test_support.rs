#![cfg(test)]
use chrono::NaiveDate;
use configs::DatabaseConfig;
use models::collection::{Branch, NewCollection, Service, Status};
use models::db::Db;
use models::{account, company};
use rust_decimal::Decimal;

/// Ids of the reference rows every test database starts with.
#[derive(Clone, Copy, Debug)]
pub struct Seed {
    pub company_id: i32,
    pub other_company_id: i32,
    pub user_id: i32,
}

/// Fresh, migrated in-memory database per call.
pub async fn memory_db() -> Result<Db, anyhow::Error> {
    Ok(Db::connect(&DatabaseConfig::sqlite_memory()).await?)
}

pub async fn seeded_db() -> Result<(Db, Seed), anyhow::Error> {
    let db = memory_db().await?;
    let company_id = company::create(db.connection(), "Acme Logistics").await?.id;
    let other_company_id = company::create(db.connection(), "Blue Freight").await?.id;
    let user_id = account::create(db.connection(), "Collections Desk").await?.id;
    Ok((db, Seed { company_id, other_company_id, user_id }))
}

pub fn new_collection(seed: &Seed, invoice_number: &str, invoice_date: NaiveDate) -> NewCollection {
    NewCollection {
        invoice_number: invoice_number.to_string(),
        company_id: seed.company_id,
        customer_name: "Fleet Customer".into(),
        user_id: seed.user_id,
        service: Service::Sensors,
        invoice_date,
        due_date: invoice_date + chrono::Duration::days(30),
        amount: Decimal::new(150050, 2),
        amount_paid: Decimal::ZERO,
        status: Status::Pending,
        last_partial_payment_date: None,
        branch: Branch::Q1,
    }
}
