//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{Cart, CartItem, CartItemUuid, CartSummary, CartValidation},
            repository::PgCartsRepository,
        },
        inventory::{check_availability, repository::PgInventoryRepository},
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    inventory: PgInventoryRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            inventory: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let lines = self.carts.list_lines(&mut tx, user).await?;

        tx.commit().await?;

        let summary = CartSummary::from_lines(&lines)?;

        Ok(Cart {
            user_uuid: user,
            lines,
            summary,
        })
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            variant_uuid = %item.variant_uuid,
            quantity = item.quantity,
            line_quantity = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let variant = self
            .inventory
            .get_variant(&mut tx, item.variant_uuid)
            .await?
            .filter(|variant| variant.product_uuid == item.product_uuid)
            .ok_or(CartsServiceError::NotFound)?;

        let line = self.carts.upsert_item(&mut tx, user, &item).await?;

        Span::current().record("line_quantity", line.quantity);

        let availability = check_availability(Some(&variant), line.quantity);

        if !availability.is_available() {
            return Err(CartsServiceError::Unavailable(availability));
        }

        tx.commit().await?;

        info!(item_uuid = %line.uuid, "added item to cart");

        Ok(line)
    }

    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self),
        fields(user_uuid = %user, item_uuid = %item),
        err
    )]
    async fn update_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<Option<CartItem>, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let existing = self.carts.get_item(&mut tx, user, item).await?;

        // Negative quantities remove the line, same as zero.
        let quantity = u64::try_from(quantity).unwrap_or_default();

        if quantity == 0 {
            self.carts.delete_item(&mut tx, user, item).await?;

            tx.commit().await?;

            info!("removed cart item");

            return Ok(None);
        }

        let variant = self
            .inventory
            .get_variant(&mut tx, existing.variant_uuid)
            .await?
            .filter(|variant| variant.product_uuid == existing.product_uuid);

        let availability = check_availability(variant.as_ref(), quantity);

        if !availability.is_available() {
            return Err(CartsServiceError::Unavailable(availability));
        }

        let updated = self.carts.set_quantity(&mut tx, user, item, quantity).await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn remove_item(&self, user: UserUuid, item: CartItemUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.carts.delete_item(&mut tx, user, item).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn clear(&self, user: UserUuid) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let removed = self.carts.clear(&mut tx, user).await?;

        tx.commit().await?;

        Ok(removed)
    }

    async fn validate(&self, user: UserUuid) -> Result<CartValidation, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let lines = self.carts.list_lines(&mut tx, user).await?;

        tx.commit().await?;

        Ok(CartValidation::from_lines(&lines))
    }

    async fn summary(&self, user: UserUuid) -> Result<CartSummary, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let lines = self.carts.list_lines(&mut tx, user).await?;

        tx.commit().await?;

        Ok(CartSummary::from_lines(&lines)?)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart with current prices.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add a line, merging with an existing line for the same variant.
    async fn add_item(&self, user: UserUuid, item: NewCartItem)
    -> Result<CartItem, CartsServiceError>;

    /// Set a line's quantity. A quantity of zero or less removes the line.
    async fn update_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<Option<CartItem>, CartsServiceError>;

    /// Remove a line. Removing an absent line is not an error.
    async fn remove_item(&self, user: UserUuid, item: CartItemUuid) -> Result<(), CartsServiceError>;

    /// Remove every line, returning how many were removed.
    async fn clear(&self, user: UserUuid) -> Result<u64, CartsServiceError>;

    /// Check every line against current stock without changing anything.
    async fn validate(&self, user: UserUuid) -> Result<CartValidation, CartsServiceError>;

    /// Line count, total quantity and priced total of the user's cart.
    async fn summary(&self, user: UserUuid) -> Result<CartSummary, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{inventory::Availability, products::records::VariantUuid},
        test::{
            TestContext,
            helpers::{create_variant, disable_variant, new_item},
        },
    };

    use super::*;

    #[tokio::test]
    async fn empty_cart_has_zero_summary() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.get_cart(ctx.customer.user).await?;

        assert!(cart.lines.is_empty());
        assert_eq!(cart.summary, CartSummary::default());

        Ok(())
    }

    #[tokio::test]
    async fn add_item_returns_line() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 5).await?;
        let new = new_item(product, variant, 2);

        let item = ctx.carts.add_item(ctx.customer.user, new.clone()).await?;

        assert_eq!(item.uuid, new.uuid);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.user_uuid, ctx.customer.user);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_variant_twice_merges_quantities() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 5).await?;

        let first = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 2))
            .await?;

        let second = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 1))
            .await?;

        assert_eq!(second.uuid, first.uuid);
        assert_eq!(second.quantity, 3);

        let cart = ctx.carts.get_cart(ctx.customer.user).await?;

        assert_eq!(cart.lines.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn merged_quantity_beyond_stock_is_rejected_and_rolled_back() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 3).await?;

        ctx.carts
            .add_item(ctx.customer.user, new_item(product, variant, 2))
            .await?;

        let result = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 2))
            .await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Unavailable(Availability::InsufficientStock {
                    remaining: 3
                }))
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.customer.user).await?;

        assert_eq!(cart.summary.total_quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_with_zero_quantity_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 3).await?;

        let result = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 0))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_with_unknown_variant_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, _) = create_variant(&ctx, 10_000, 0, 3).await?;

        let result = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, VariantUuid::new(), 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_with_variant_of_other_product_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, _) = create_variant(&ctx, 10_000, 0, 3).await?;
        let (_, other_variant) = create_variant(&ctx, 10_000, 0, 3).await?;

        let result = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, other_variant, 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_replaces_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 10).await?;

        let item = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 1))
            .await?;

        let updated = ctx
            .carts
            .update_quantity(ctx.customer.user, item.uuid, 7)
            .await?;

        assert_eq!(updated.map(|line| line.quantity), Some(7));

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_to_zero_removes_line() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 10).await?;

        let item = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 1))
            .await?;

        assert!(
            ctx.carts
                .update_quantity(ctx.customer.user, item.uuid, 0)
                .await?
                .is_none()
        );

        assert!(ctx.carts.get_cart(ctx.customer.user).await?.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_beyond_stock_keeps_previous_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 4).await?;

        let item = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 1))
            .await?;

        let result = ctx
            .carts
            .update_quantity(ctx.customer.user, item.uuid, 5)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.customer.user).await?;

        assert_eq!(cart.summary.total_quantity, 1);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_of_other_users_line_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 4).await?;

        let item = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 1))
            .await?;

        let result = ctx.carts.update_quantity(ctx.staff.user, item.uuid, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_and_clear_are_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 4).await?;
        let (other_product, other_variant) = create_variant(&ctx, 5_000, 0, 4).await?;

        let item = ctx
            .carts
            .add_item(ctx.customer.user, new_item(product, variant, 1))
            .await?;

        ctx.carts
            .add_item(ctx.customer.user, new_item(other_product, other_variant, 1))
            .await?;

        ctx.carts.remove_item(ctx.customer.user, item.uuid).await?;
        ctx.carts.remove_item(ctx.customer.user, item.uuid).await?;

        assert_eq!(ctx.carts.clear(ctx.customer.user).await?, 1);
        assert_eq!(ctx.carts.clear(ctx.customer.user).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn validate_reports_lines_that_became_unavailable() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 10_000, 0, 4).await?;
        let (other_product, other_variant) = create_variant(&ctx, 5_000, 0, 4).await?;

        ctx.carts
            .add_item(ctx.customer.user, new_item(product, variant, 1))
            .await?;

        ctx.carts
            .add_item(ctx.customer.user, new_item(other_product, other_variant, 1))
            .await?;

        assert!(ctx.carts.validate(ctx.customer.user).await?.valid);

        disable_variant(&ctx, product, variant).await?;

        let validation = ctx.carts.validate(ctx.customer.user).await?;

        assert!(!validation.valid);
        assert_eq!(validation.results.len(), 2);
        assert_eq!(validation.failures().len(), 1);
        assert_eq!(
            validation.failures().first().map(|failure| failure.variant_uuid),
            Some(variant)
        );

        Ok(())
    }

    #[tokio::test]
    async fn summary_prices_lines_at_discounted_price() -> TestResult {
        let ctx = TestContext::new().await;
        let (product, variant) = create_variant(&ctx, 100_000, 10, 5).await?;

        ctx.carts
            .add_item(ctx.customer.user, new_item(product, variant, 2))
            .await?;

        let summary = ctx.carts.summary(ctx.customer.user).await?;

        assert_eq!(
            summary,
            CartSummary {
                item_count: 1,
                total_quantity: 2,
                total_price: 180_000,
            }
        );

        Ok(())
    }
}
