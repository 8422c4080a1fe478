use std::str::FromStr;

use configs::ValidationConfig;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{account, company};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Service {
    #[sea_orm(string_value = "app")]
    App,
    #[sea_orm(string_value = "sensors")]
    Sensors,
    #[sea_orm(string_value = "field_service")]
    FieldService,
    #[sea_orm(string_value = "installations")]
    Installations,
    #[sea_orm(string_value = "spare_parts")]
    SpareParts,
    #[sea_orm(string_value = "general_service")]
    GeneralService,
    #[sea_orm(string_value = "tires")]
    Tires,
    #[sea_orm(string_value = "hardware")]
    Hardware,
    #[sea_orm(string_value = "training")]
    Training,
}

impl Service {
    pub const ALL: [Service; 9] = [
        Service::App,
        Service::Sensors,
        Service::FieldService,
        Service::Installations,
        Service::SpareParts,
        Service::GeneralService,
        Service::Tires,
        Service::Hardware,
        Service::Training,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::App => "app",
            Service::Sensors => "sensors",
            Service::FieldService => "field_service",
            Service::Installations => "installations",
            Service::SpareParts => "spare_parts",
            Service::GeneralService => "general_service",
            Service::Tires => "tires",
            Service::Hardware => "hardware",
            Service::Training => "training",
        }
    }
}

impl FromStr for Service {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ModelError::invalid(format!("invalid service: '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::PartiallyPaid,
        Status::Paid,
        Status::Overdue,
        Status::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::PartiallyPaid => "partially_paid",
            Status::Paid => "paid",
            Status::Overdue => "overdue",
            Status::Cancelled => "cancelled",
        }
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ModelError::invalid(format!("invalid status: '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum Branch {
    #[sea_orm(string_value = "Q1")]
    Q1,
    #[sea_orm(string_value = "Q2")]
    Q2,
    #[sea_orm(string_value = "QT")]
    QT,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Q1, Branch::Q2, Branch::QT];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Q1 => "Q1",
            Branch::Q2 => "Q2",
            Branch::QT => "QT",
        }
    }
}

impl FromStr for Branch {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ModelError::invalid(format!("invalid branch: '{s}'")))
    }
}

/// One invoice being collected. Rows are never removed; `is_deleted` hides them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub company_id: i32,
    pub customer_name: String,
    pub user_id: i32,
    pub service: Service,
    pub invoice_date: Date,
    pub due_date: Date,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount_paid: Decimal,
    pub status: Status,
    pub last_partial_payment_date: Option<Date>,
    pub branch: Branch,
    pub is_deleted: bool,
    pub created_at: DateTimeUtc,
    pub last_update: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Company,
    Account,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::belongs_to(company::Entity)
                .from(Column::CompanyId)
                .to(company::Column::Id)
                .into(),
            Relation::Account => Entity::belongs_to(account::Entity)
                .from(Column::UserId)
                .to(account::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn outstanding_balance(&self) -> Decimal {
        self.amount - self.amount_paid
    }
}

/// Read shape returned by the API: the stored row plus the derived balance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionRecord {
    #[serde(flatten)]
    pub record: Model,
    pub outstanding_balance: Decimal,
}

impl From<Model> for CollectionRecord {
    fn from(record: Model) -> Self {
        let outstanding_balance = record.outstanding_balance();
        Self { record, outstanding_balance }
    }
}

/// Payload for creating an invoice record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewCollection {
    pub invoice_number: String,
    pub company_id: i32,
    pub customer_name: String,
    pub user_id: i32,
    pub service: Service,
    pub invoice_date: Date,
    pub due_date: Date,
    pub amount: Decimal,
    #[serde(default)]
    pub amount_paid: Decimal,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub last_partial_payment_date: Option<Date>,
    pub branch: Branch,
}

impl NewCollection {
    pub fn validate(&self, rules: &ValidationConfig) -> Result<(), ModelError> {
        validate_invoice_number(&self.invoice_number)?;
        validate_positive_id("company_id", self.company_id)?;
        validate_customer_name(&self.customer_name)?;
        validate_positive_id("user_id", self.user_id)?;
        validate_amount("amount", self.amount)?;
        validate_amount("amount_paid", self.amount_paid)?;
        validate_overpayment(rules, Some(self.amount), Some(self.amount_paid))
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionPatch {
    pub invoice_number: Option<String>,
    pub company_id: Option<i32>,
    pub customer_name: Option<String>,
    pub user_id: Option<i32>,
    pub service: Option<Service>,
    pub invoice_date: Option<Date>,
    pub due_date: Option<Date>,
    pub amount: Option<Decimal>,
    pub amount_paid: Option<Decimal>,
    pub status: Option<Status>,
    pub last_partial_payment_date: Option<Date>,
    pub branch: Option<Branch>,
}

impl CollectionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self, rules: &ValidationConfig) -> Result<(), ModelError> {
        if let Some(v) = &self.invoice_number { validate_invoice_number(v)?; }
        if let Some(v) = self.company_id { validate_positive_id("company_id", v)?; }
        if let Some(v) = &self.customer_name { validate_customer_name(v)?; }
        if let Some(v) = self.user_id { validate_positive_id("user_id", v)?; }
        if let Some(v) = self.amount { validate_amount("amount", v)?; }
        if let Some(v) = self.amount_paid { validate_amount("amount_paid", v)?; }
        validate_overpayment(rules, self.amount, self.amount_paid)
    }
}

pub fn validate_invoice_number(v: &str) -> Result<(), ModelError> {
    let len = v.chars().count();
    if len == 0 || len > 100 {
        return Err(ModelError::invalid("invoice_number must be 1..=100 characters"));
    }
    Ok(())
}

pub fn validate_customer_name(v: &str) -> Result<(), ModelError> {
    let len = v.chars().count();
    if len == 0 || len > 255 {
        return Err(ModelError::invalid("customer_name must be 1..=255 characters"));
    }
    Ok(())
}

fn validate_positive_id(field: &str, v: i32) -> Result<(), ModelError> {
    if v <= 0 {
        return Err(ModelError::invalid(format!("{field} must be greater than 0")));
    }
    Ok(())
}

fn validate_amount(field: &str, v: Decimal) -> Result<(), ModelError> {
    if v.is_sign_negative() && !v.is_zero() {
        return Err(ModelError::invalid(format!("{field} must be greater than or equal to 0")));
    }
    Ok(())
}

fn validate_overpayment(rules: &ValidationConfig, amount: Option<Decimal>, paid: Option<Decimal>) -> Result<(), ModelError> {
    if rules.allow_overpayment {
        return Ok(());
    }
    match (amount, paid) {
        (Some(amount), Some(paid)) if paid > amount => {
            Err(ModelError::invalid("amount_paid must not exceed amount"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample() -> NewCollection {
        NewCollection {
            invoice_number: "INV-1".into(),
            company_id: 1,
            customer_name: "Acme".into(),
            user_id: 1,
            service: Service::Sensors,
            invoice_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            amount: Decimal::new(10000, 2),
            amount_paid: Decimal::ZERO,
            status: Status::Pending,
            last_partial_payment_date: None,
            branch: Branch::Q1,
        }
    }

    #[test]
    fn enums_round_trip_through_strings() {
        for s in Service::ALL { assert_eq!(s.as_str().parse::<Service>().unwrap(), s); }
        for s in Status::ALL { assert_eq!(s.as_str().parse::<Status>().unwrap(), s); }
        for b in Branch::ALL { assert_eq!(b.as_str().parse::<Branch>().unwrap(), b); }
        assert!("q1".parse::<Branch>().is_err());
        assert!("refunded".parse::<Status>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_value(Service::FieldService).unwrap(), "field_service");
        assert_eq!(serde_json::to_value(Status::PartiallyPaid).unwrap(), "partially_paid");
        assert_eq!(serde_json::to_value(Branch::QT).unwrap(), "QT");
    }

    #[test]
    fn create_payload_defaults_paid_and_status() {
        let json = serde_json::json!({
            "invoice_number": "INV-9",
            "company_id": 3,
            "customer_name": "Globex",
            "user_id": 2,
            "service": "tires",
            "invoice_date": "2024-01-10",
            "due_date": "2024-02-10",
            "amount": 250.5,
            "branch": "Q2"
        });
        let parsed: NewCollection = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.amount_paid, Decimal::ZERO);
        assert_eq!(parsed.status, Status::Pending);
        assert_eq!(parsed.last_partial_payment_date, None);
    }

    #[test]
    fn validation_checks_bounds() {
        let rules = ValidationConfig::default();
        assert!(sample().validate(&rules).is_ok());

        let mut bad = sample();
        bad.invoice_number = String::new();
        assert!(bad.validate(&rules).is_err());

        let mut bad = sample();
        bad.company_id = 0;
        assert!(bad.validate(&rules).is_err());

        let mut bad = sample();
        bad.amount = Decimal::new(-1, 0);
        assert!(bad.validate(&rules).is_err());

        let mut bad = sample();
        bad.customer_name = "x".repeat(256);
        assert!(bad.validate(&rules).is_err());
    }

    #[test]
    fn overpayment_follows_rule() {
        let mut over = sample();
        over.amount_paid = Decimal::new(20000, 2);
        assert!(over.validate(&ValidationConfig { allow_overpayment: true }).is_ok());
        assert!(over.validate(&ValidationConfig { allow_overpayment: false }).is_err());

        let patch = CollectionPatch { amount_paid: Some(Decimal::new(5, 0)), ..Default::default() };
        assert!(patch.validate(&ValidationConfig { allow_overpayment: false }).is_ok());
    }

    #[test]
    fn empty_patch_detected() {
        assert!(CollectionPatch::default().is_empty());
        let p: CollectionPatch = serde_json::from_str(r#"{"status":"paid"}"#).unwrap();
        assert!(!p.is_empty());
        assert_eq!(p.status, Some(Status::Paid));
    }

    #[test]
    fn record_derives_outstanding_balance() {
        let m = Model {
            id: 1,
            invoice_number: "INV-1".into(),
            company_id: 1,
            customer_name: "Acme".into(),
            user_id: 1,
            service: Service::App,
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            amount: Decimal::new(10000, 2),
            amount_paid: Decimal::new(2550, 2),
            status: Status::PartiallyPaid,
            last_partial_payment_date: None,
            branch: Branch::Q1,
            is_deleted: false,
            created_at: chrono::Utc::now(),
            last_update: chrono::Utc::now(),
        };
        let rec = CollectionRecord::from(m);
        assert_eq!(rec.outstanding_balance, Decimal::new(7450, 2));
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["invoice_number"], "INV-1");
        assert!(v.get("outstanding_balance").is_some());
    }
}
