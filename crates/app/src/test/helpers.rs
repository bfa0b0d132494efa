//! Test Helpers

use sqlx::query_scalar;
use testresult::TestResult;

use crate::{
    domain::{
        carts::{data::NewCartItem, records::CartItemUuid},
        orders::data::{NewOrder, NewOrderAddress},
        orders::records::{OrderAddressUuid, OrderUuid},
        pricing::DiscountPercent,
        products::{
            ProductsService,
            data::{NewProduct, NewVariant, VariantUpdate},
            records::{ProductUuid, VariantUuid},
        },
        users::{
            UsersService,
            data::NewUser,
            records::{Actor, UserRole, UserUuid},
        },
    },
    test::TestContext,
};

/// Create a product with a single available variant.
pub(crate) async fn create_variant(
    ctx: &TestContext,
    unit_price: u64,
    discount_percent: u8,
    stock_count: u64,
) -> TestResult<(ProductUuid, VariantUuid)> {
    let product = ProductUuid::new();
    let variant = VariantUuid::new();

    ctx.products
        .create_product(NewProduct {
            uuid: product,
            name: "Linen Shirt".to_string(),
            variants: vec![NewVariant {
                uuid: variant,
                name: "M / Blue".to_string(),
                unit_price,
                discount_percent: DiscountPercent::new(discount_percent)?,
                is_available: true,
                stock_count,
            }],
        })
        .await?;

    Ok((product, variant))
}

/// Mark a variant as no longer for sale, keeping its price and stock.
pub(crate) async fn disable_variant(
    ctx: &TestContext,
    product: ProductUuid,
    variant: VariantUuid,
) -> TestResult {
    let current = ctx
        .products
        .get_product(product)
        .await?
        .variants
        .into_iter()
        .find(|v| v.uuid == variant)
        .ok_or("variant not found")?;

    ctx.products
        .update_variant(
            product,
            variant,
            VariantUpdate {
                unit_price: current.unit_price,
                discount_percent: current.discount_percent,
                is_available: false,
                stock_count: current.stock_count,
            },
        )
        .await?;

    Ok(())
}

pub(crate) async fn variant_stock(ctx: &TestContext, variant: VariantUuid) -> TestResult<u64> {
    let stock: i64 = query_scalar("SELECT stock_count FROM product_variants WHERE uuid = $1")
        .bind(variant.into_uuid())
        .fetch_one(ctx.db.pool())
        .await?;

    Ok(u64::try_from(stock)?)
}

pub(crate) async fn create_customer(ctx: &TestContext, name: &str) -> TestResult<Actor> {
    let uuid = UserUuid::new();

    ctx.users
        .create_user(NewUser {
            uuid,
            name: name.to_string(),
            role: UserRole::Customer,
        })
        .await?;

    Ok(Actor::customer(uuid))
}

pub(crate) fn new_item(product: ProductUuid, variant: VariantUuid, quantity: u64) -> NewCartItem {
    NewCartItem {
        uuid: CartItemUuid::new(),
        product_uuid: product,
        variant_uuid: variant,
        quantity,
    }
}

pub(crate) fn new_order() -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        address: NewOrderAddress {
            uuid: OrderAddressUuid::new(),
            province: "Ha Noi".to_string(),
            district: "Hoan Kiem".to_string(),
            ward: "Hang Bac".to_string(),
            detail: "12 Hang Bac".to_string(),
            user_phone: "0900000000".to_string(),
            user_name: "Test Customer".to_string(),
        },
        shipping_cost: 0,
        payment_cost: 0,
        note: None,
        payment_method: "cod".to_string(),
        shipping_method: "standard".to_string(),
    }
}
