//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    amounts::{to_column_amount, try_get_amount},
    pricing::DiscountPercent,
    products::{
        data::{NewVariant, VariantUpdate},
        records::{ProductRecord, ProductUuid, VariantRecord, VariantUuid},
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const LIST_VARIANTS_SQL: &str = include_str!("sql/list_variants.sql");
const UPDATE_VARIANT_SQL: &str = include_str!("sql/update_variant.sql");
const ADD_SOLD_QUANTITY_SQL: &str = include_str!("sql/add_sold_quantity.sql");
const SUBTRACT_SOLD_QUANTITY_SQL: &str = include_str!("sql/subtract_sold_quantity.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        name: &str,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: &NewVariant,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(CREATE_VARIANT_SQL)
            .bind(variant.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(&variant.name)
            .bind(to_column_amount(variant.unit_price, "unit_price")?)
            .bind(i16::from(variant.discount_percent))
            .bind(variant.is_available)
            .bind(to_column_amount(variant.stock_count, "stock_count")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<VariantRecord>, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(LIST_VARIANTS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: VariantUuid,
        update: &VariantUpdate,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(UPDATE_VARIANT_SQL)
            .bind(variant.into_uuid())
            .bind(product.into_uuid())
            .bind(to_column_amount(update.unit_price, "unit_price")?)
            .bind(i16::from(update.discount_percent))
            .bind(update.is_available)
            .bind(to_column_amount(update.stock_count, "stock_count")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Raise the running sold-quantity counter of a product.
    pub(crate) async fn add_sold_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(ADD_SOLD_QUANTITY_SQL)
            .bind(product.into_uuid())
            .bind(to_column_amount(quantity, "sold_quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Lower the running sold-quantity counter of a product.
    pub(crate) async fn subtract_sold_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SUBTRACT_SOLD_QUANTITY_SQL)
            .bind(product.into_uuid())
            .bind(to_column_amount(quantity, "sold_quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            sold_quantity: try_get_amount(row, "sold_quantity")?,
            variants: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_percent = DiscountPercent::try_from(row.try_get::<i16, _>("discount_percent")?)
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_percent".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            unit_price: try_get_amount(row, "unit_price")?,
            discount_percent,
            is_available: row.try_get("is_available")?,
            stock_count: try_get_amount(row, "stock_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
