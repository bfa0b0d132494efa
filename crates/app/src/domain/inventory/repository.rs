//! Inventory Repository

use sqlx::{Postgres, Transaction, query, query_as};

use crate::domain::{
    amounts::to_column_amount,
    products::records::{VariantRecord, VariantUuid},
};

const GET_VARIANT_SQL: &str = include_str!("sql/get_variant.sql");
const TRY_RESERVE_SQL: &str = include_str!("sql/try_reserve.sql");
const RELEASE_SQL: &str = include_str!("sql/release.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Option<VariantRecord>, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(GET_VARIANT_SQL)
            .bind(variant.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Atomically take `quantity` units from the variant's stock.
    ///
    /// Returns `false` when the variant is missing, unavailable, or holds
    /// fewer than `quantity` units; stock is left untouched in that case.
    pub(crate) async fn try_reserve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        quantity: u64,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(TRY_RESERVE_SQL)
            .bind(variant.into_uuid())
            .bind(to_column_amount(quantity, "stock_count")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    /// Return `quantity` units to the variant's stock.
    pub(crate) async fn release(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        quantity: u64,
    ) -> Result<(), sqlx::Error> {
        let rows_affected = query(RELEASE_SQL)
            .bind(variant.into_uuid())
            .bind(to_column_amount(quantity, "stock_count")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }
}
