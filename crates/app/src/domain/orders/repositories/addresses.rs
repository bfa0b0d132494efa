//! Order Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::orders::{
    data::NewOrderAddress,
    records::{OrderAddress, OrderAddressUuid},
};

const CREATE_ADDRESS_SQL: &str = include_str!("../sql/create_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderAddressesRepository;

impl PgOrderAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: &NewOrderAddress,
    ) -> Result<OrderAddress, sqlx::Error> {
        query_as::<Postgres, OrderAddress>(CREATE_ADDRESS_SQL)
            .bind(address.uuid.into_uuid())
            .bind(&address.province)
            .bind(&address.district)
            .bind(&address.ward)
            .bind(&address.detail)
            .bind(&address.user_phone)
            .bind(&address.user_name)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderAddress {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderAddressUuid::from_uuid(row.try_get("uuid")?),
            province: row.try_get("province")?,
            district: row.try_get("district")?,
            ward: row.try_get("ward")?,
            detail: row.try_get("detail")?,
            user_phone: row.try_get("user_phone")?,
            user_name: row.try_get("user_name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
