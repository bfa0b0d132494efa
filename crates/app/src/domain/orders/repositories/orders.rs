//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    amounts::{to_column_amount, try_get_amount},
    orders::{
        data::{NewOrder, OrderFilter},
        records::{Order, OrderAddress, OrderAddressUuid, OrderUuid},
        status::OrderStatus,
    },
    pagination::PageRequest,
    users::records::UserUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("../sql/set_order_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: UserUuid,
        address: OrderAddressUuid,
        order: &NewOrder,
        total_cost: u64,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(customer.into_uuid())
            .bind(address.into_uuid())
            .bind(to_column_amount(order.shipping_cost, "shipping_cost")?)
            .bind(to_column_amount(order.payment_cost, "payment_cost")?)
            .bind(to_column_amount(total_cost, "total_cost")?)
            .bind(order.note.as_deref())
            .bind(&order.payment_method)
            .bind(&order.shipping_method)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(filter.customer.map(UserUuid::into_uuid))
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(i64::from(page.limit()))
            .bind(to_column_amount(page.offset(), "offset")?)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrderFilter,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(filter.customer.map(UserUuid::into_uuid))
            .bind(filter.status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        updated_by: Option<UserUuid>,
    ) -> Result<(), sqlx::Error> {
        let rows_affected = query(SET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(updated_by.map(UserUuid::into_uuid))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        let address = OrderAddress {
            uuid: OrderAddressUuid::from_uuid(row.try_get("address_uuid")?),
            province: row.try_get("address_province")?,
            district: row.try_get("address_district")?,
            ward: row.try_get("address_ward")?,
            detail: row.try_get("address_detail")?,
            user_phone: row.try_get("address_user_phone")?,
            user_name: row.try_get("address_user_name")?,
            created_at: row
                .try_get::<SqlxTimestamp, _>("address_created_at")?
                .to_jiff(),
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: UserUuid::from_uuid(row.try_get("customer_uuid")?),
            status,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            payment_cost: try_get_amount(row, "payment_cost")?,
            total_cost: try_get_amount(row, "total_cost")?,
            note: row.try_get("note")?,
            payment_method: row.try_get("payment_method")?,
            shipping_method: row.try_get("shipping_method")?,
            updated_by: row
                .try_get::<Option<uuid::Uuid>, _>("updated_by")?
                .map(UserUuid::from_uuid),
            address,
            lines: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
