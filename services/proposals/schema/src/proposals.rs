use sea_orm::entity::prelude::*;

/// One commercial proposal and its delivery/decision status.
/// `id` and `submitted_at` are assigned by the database on insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "proposals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_name: String,
    pub company_name: String,
    /// Decimal amount kept as text.
    pub amount: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub recipient_email: String,
    pub validity: Option<chrono::NaiveDate>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    /// Lowercase status name (`pending`, `sent`, `failed`, `accepted`, `rejected`).
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
