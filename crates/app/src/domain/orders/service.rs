//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{records::CartValidation, repository::PgCartsRepository},
        inventory::repository::PgInventoryRepository,
        orders::{
            data::{NewOrder, NewOrderLine, OrderFilter},
            errors::OrdersServiceError,
            records::{Order, OrderLine, OrderLineUuid, OrderUuid},
            repositories::{PgOrderAddressesRepository, PgOrderLinesRepository, PgOrdersRepository},
            status::OrderStatus,
        },
        pagination::{Page, PageRequest},
        pricing::{final_price, order_total},
        products::repository::PgProductsRepository,
        users::records::{Actor, UserUuid},
    },
    retry::RetryPolicy,
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    retry: RetryPolicy,
    orders: PgOrdersRepository,
    lines: PgOrderLinesRepository,
    addresses: PgOrderAddressesRepository,
    carts: PgCartsRepository,
    inventory: PgInventoryRepository,
    products: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, retry: RetryPolicy) -> Self {
        Self {
            db,
            retry,
            orders: PgOrdersRepository::new(),
            lines: PgOrderLinesRepository::new(),
            addresses: PgOrderAddressesRepository::new(),
            carts: PgCartsRepository::new(),
            inventory: PgInventoryRepository::new(),
            products: PgProductsRepository::new(),
        }
    }

    /// One attempt at turning the customer's cart into an order.
    ///
    /// Every early return drops `tx`, rolling back anything already written.
    async fn try_create_order(
        &self,
        customer: UserUuid,
        order: &NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.carts.lock_owner(&mut tx, customer).await?;

        let mut cart = self.carts.list_lines(&mut tx, customer).await?;

        if cart.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let validation = CartValidation::from_lines(&cart);

        if !validation.valid {
            return Err(OrdersServiceError::Unavailable(validation.failures()));
        }

        // Reserve in a fixed order so concurrent checkouts lock rows consistently.
        cart.sort_by_key(|line| line.item.variant_uuid);

        let address = self.addresses.create_address(&mut tx, &order.address).await?;

        let mut new_lines = Vec::with_capacity(cart.len());

        for line in &cart {
            let variant = line.item.variant_uuid;

            if !self
                .inventory
                .try_reserve(&mut tx, variant, line.item.quantity)
                .await?
            {
                return Err(OrdersServiceError::OutOfStock { variant });
            }

            // The reservation holds the row lock, so this price is the one being paid.
            let record = self
                .inventory
                .get_variant(&mut tx, variant)
                .await?
                .ok_or(OrdersServiceError::OutOfStock { variant })?;

            new_lines.push(NewOrderLine {
                uuid: OrderLineUuid::new(),
                product_uuid: line.item.product_uuid,
                variant_uuid: variant,
                quantity: line.item.quantity,
                unit_price: final_price(record.unit_price, record.discount_percent),
            });
        }

        let total_cost = order_total(
            new_lines.iter().map(|line| (line.unit_price, line.quantity)),
            order.shipping_cost,
            order.payment_cost,
        )?;

        let mut created = self
            .orders
            .create_order(&mut tx, customer, address.uuid, order, total_cost)
            .await?;

        for line in &new_lines {
            let line = self.lines.create_line(&mut tx, created.uuid, line).await?;

            self.products
                .add_sold_quantity(&mut tx, line.product_uuid, line.quantity)
                .await?;

            created.lines.push(line);
        }

        self.carts.clear(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Hand every line's stock back and take it off the sold counters.
    async fn release_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lines: &[OrderLine],
    ) -> Result<(), OrdersServiceError> {
        let mut lines = lines.to_vec();

        lines.sort_by_key(|line| line.variant_uuid);

        for line in &lines {
            self.inventory
                .release(tx, line.variant_uuid, line.quantity)
                .await?;

            self.products
                .subtract_sold_quantity(tx, line.product_uuid, line.quantity)
                .await?;
        }

        Ok(())
    }

    async fn with_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut order: Order,
    ) -> Result<Order, OrdersServiceError> {
        order.lines = self.lines.list_lines(tx, &[order.uuid]).await?;

        Ok(order)
    }

    /// Move a locked order to `Cancelled`, releasing its stock.
    async fn cancel_locked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
        updated_by: Option<UserUuid>,
    ) -> Result<(), OrdersServiceError> {
        self.release_lines(tx, &order.lines).await?;

        self.orders
            .set_status(tx, order.uuid, OrderStatus::Cancelled, updated_by)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            customer_uuid = %customer,
            order_uuid = %order.uuid,
            line_count = tracing::field::Empty,
            total_cost = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(
        &self,
        customer: UserUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        let order = &order;

        let created = self
            .retry
            .run("orders.create_order", || self.try_create_order(customer, order))
            .await
            .inspect_err(|error| match error {
                OrdersServiceError::EmptyCart
                | OrdersServiceError::Unavailable(_)
                | OrdersServiceError::OutOfStock { .. } => {
                    warn!(reason = %error, "checkout rejected");
                }
                _ => {}
            })?;

        let span = Span::current();

        span.record("line_count", created.lines.len());
        span.record("total_cost", created.total_cost);

        info!("created order");

        Ok(created)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self, actor),
        fields(order_uuid = %order, actor_uuid = %actor.user, from_status = tracing::field::Empty),
        err
    )]
    async fn cancel_order(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self.orders.lock_order(&mut tx, order).await?;

        if !actor.can_access(locked.customer_uuid) {
            return Err(OrdersServiceError::Forbidden);
        }

        Span::current().record("from_status", locked.status.as_str());

        let locked = self.with_lines(&mut tx, locked).await?;

        let status = locked.status;

        match status {
            OrderStatus::Cancelled => {
                tx.commit().await?;

                return Ok(locked);
            }
            from if !from.can_transition_to(OrderStatus::Cancelled) => {
                return Err(OrdersServiceError::InvalidTransition {
                    from,
                    to: OrderStatus::Cancelled,
                });
            }
            _ => {}
        }

        let updated_by = actor.is_staff().then_some(actor.user);

        self.cancel_locked(&mut tx, &locked, updated_by).await?;

        let cancelled = self.orders.get_order(&mut tx, order).await?;
        let cancelled = self.with_lines(&mut tx, cancelled).await?;

        tx.commit().await?;

        info!("cancelled order");

        Ok(cancelled)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self, actor),
        fields(
            order_uuid = %order,
            actor_uuid = %actor.user,
            to_status = %status,
            from_status = tracing::field::Empty
        ),
        err
    )]
    async fn update_status(
        &self,
        actor: Actor,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        if !actor.is_staff() {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut tx = self.db.begin_transaction().await?;

        let locked = self.orders.lock_order(&mut tx, order).await?;

        Span::current().record("from_status", locked.status.as_str());

        if !locked.status.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidTransition {
                from: locked.status,
                to: status,
            });
        }

        if status.releases_stock() {
            let locked = self.with_lines(&mut tx, locked).await?;

            self.cancel_locked(&mut tx, &locked, Some(actor.user)).await?;
        } else {
            self.orders
                .set_status(&mut tx, order, status, Some(actor.user))
                .await?;
        }

        let updated = self.orders.get_order(&mut tx, order).await?;
        let updated = self.with_lines(&mut tx, updated).await?;

        tx.commit().await?;

        info!("updated order status");

        Ok(updated)
    }

    async fn get_order(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.orders.get_order(&mut tx, order).await?;

        if !actor.can_access(record.customer_uuid) {
            return Err(OrdersServiceError::Forbidden);
        }

        let record = self.with_lines(&mut tx, record).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_orders(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<Order>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let total = self.orders.count_orders(&mut tx, filter).await?;
        let mut orders = self.orders.list_orders(&mut tx, filter, page).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();
        let lines = self.lines.list_lines(&mut tx, &uuids).await?;

        tx.commit().await?;

        for order in &mut orders {
            order.lines = lines
                .iter()
                .filter(|line| line.order_uuid == order.uuid)
                .copied()
                .collect();
        }

        Ok(Page::new(orders, total, page))
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the customer's cart into a pending order.
    ///
    /// Stock for every line is reserved and the cart cleared in the same
    /// transaction; on any failure nothing changes.
    async fn create_order(
        &self,
        customer: UserUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// Cancel an order and return its stock. Cancelling twice is a no-op.
    async fn cancel_order(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Move an order along its lifecycle. Staff only.
    async fn update_status(
        &self,
        actor: Actor,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order with its lines and address.
    async fn get_order(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieve a page of orders, newest first.
    async fn list_orders(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<Order>, OrdersServiceError>;
}
