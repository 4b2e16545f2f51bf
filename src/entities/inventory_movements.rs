use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_movements")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    pub quantity: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub movement_type: String,
    pub reference: Option<String>,
    pub reason: Option<String>,
    pub batch_number: Option<String>,
    pub timestamp: DateTimeWithTimeZone,
    pub user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
