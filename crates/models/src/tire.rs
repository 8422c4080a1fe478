use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tires_catalog")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub size: String,
    pub layer_index: Option<String>,
    pub layers: Option<i32>,
    pub max_pressure: Option<i32>,
    pub min_pressure: Option<i32>,
    pub max_depth: Option<i32>,
    pub min_depth: Option<i32>,
    pub wear_type: Option<String>,
    pub profitability: Option<i32>,
    pub performance: Option<i32>,
    pub temperature: Option<String>,
    pub speed: Option<String>,
    pub speed_number: Option<i32>,
    pub braking: Option<String>,
    pub load_type: Option<String>,
    #[sea_orm(column_name = "_load")]
    #[serde(rename = "load")]
    pub load_value: Option<i32>,
    pub road_type: Option<String>,
    pub terrain_type: Option<String>,
    pub position: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn zero() -> Option<i32> { Some(0) }

/// Body of `POST /api/tires` and `PUT /api/tires/{id}`. Updates replace the
/// whole row, so both use the same shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TireInput {
    pub brand: String,
    pub model: String,
    pub size: String,
    #[serde(default)]
    pub layer_index: Option<String>,
    #[serde(default = "zero")]
    pub layers: Option<i32>,
    #[serde(default = "zero")]
    pub max_pressure: Option<i32>,
    #[serde(default = "zero")]
    pub min_pressure: Option<i32>,
    #[serde(default = "zero")]
    pub max_depth: Option<i32>,
    #[serde(default = "zero")]
    pub min_depth: Option<i32>,
    #[serde(default)]
    pub wear_type: Option<String>,
    #[serde(default = "zero")]
    pub profitability: Option<i32>,
    #[serde(default = "zero")]
    pub performance: Option<i32>,
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default = "zero")]
    pub speed_number: Option<i32>,
    #[serde(default)]
    pub braking: Option<String>,
    #[serde(default)]
    pub load_type: Option<String>,
    #[serde(default = "zero")]
    pub load: Option<i32>,
    #[serde(default)]
    pub road_type: Option<String>,
    #[serde(default)]
    pub terrain_type: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

impl TireInput {
    pub fn new(brand: &str, model: &str, size: &str) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            size: size.into(),
            layer_index: None,
            layers: zero(),
            max_pressure: zero(),
            min_pressure: zero(),
            max_depth: zero(),
            min_depth: zero(),
            wear_type: None,
            profitability: zero(),
            performance: zero(),
            temperature: None,
            speed: None,
            speed_number: zero(),
            braking: None,
            load_type: None,
            load: zero(),
            road_type: None,
            terrain_type: None,
            position: None,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        required_text("brand", &self.brand, 100)?;
        required_text("model", &self.model, 100)?;
        required_text("size", &self.size, 50)?;

        let texts = [
            ("layer_index", &self.layer_index),
            ("wear_type", &self.wear_type),
            ("temperature", &self.temperature),
            ("speed", &self.speed),
            ("braking", &self.braking),
            ("load_type", &self.load_type),
            ("road_type", &self.road_type),
            ("terrain_type", &self.terrain_type),
            ("position", &self.position),
        ];
        for (field, value) in texts {
            if let Some(v) = value {
                if v.chars().count() > 50 {
                    return Err(ModelError::invalid(format!("{field} must be at most 50 characters")));
                }
            }
        }

        let ints = [
            ("layers", self.layers),
            ("max_pressure", self.max_pressure),
            ("min_pressure", self.min_pressure),
            ("max_depth", self.max_depth),
            ("min_depth", self.min_depth),
            ("profitability", self.profitability),
            ("performance", self.performance),
            ("speed_number", self.speed_number),
            ("load", self.load),
        ];
        for (field, value) in ints {
            if matches!(value, Some(v) if v < 0) {
                return Err(ModelError::invalid(format!("{field} must be greater than or equal to 0")));
            }
        }
        Ok(())
    }
}

fn required_text(field: &str, v: &str, max: usize) -> Result<(), ModelError> {
    let len = v.chars().count();
    if len == 0 || len > max {
        return Err(ModelError::invalid(format!("{field} must be 1..={max} characters")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_numbers_default_to_zero() {
        let t: TireInput = serde_json::from_str(r#"{"brand":"Michelin","model":"X Multi","size":"295/80R22.5"}"#).unwrap();
        assert_eq!(t.layers, Some(0));
        assert_eq!(t.load, Some(0));
        assert_eq!(t.position, None);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn explicit_null_is_kept() {
        let t: TireInput = serde_json::from_str(r#"{"brand":"B","model":"M","size":"S","layers":null}"#).unwrap();
        assert_eq!(t.layers, None);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut t = TireInput::new("", "M", "S");
        assert!(t.validate().is_err());
        t.brand = "B".into();
        t.size = "x".repeat(51);
        assert!(t.validate().is_err());
        t.size = "S".into();
        t.max_depth = Some(-1);
        assert!(t.validate().is_err());
        t.max_depth = Some(12);
        t.position = Some("p".repeat(51));
        assert!(t.validate().is_err());
    }

    #[test]
    fn load_column_serializes_as_load() {
        let m = Model {
            id: 1,
            brand: "B".into(),
            model: "M".into(),
            size: "S".into(),
            layer_index: None,
            layers: None,
            max_pressure: None,
            min_pressure: None,
            max_depth: None,
            min_depth: None,
            wear_type: None,
            profitability: None,
            performance: None,
            temperature: None,
            speed: None,
            speed_number: None,
            braking: None,
            load_type: None,
            load_value: Some(150),
            road_type: None,
            terrain_type: None,
            position: None,
            created_at: 0,
            updated_at: 0,
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["load"], 150);
        assert!(v.get("load_value").is_none());
    }
}
