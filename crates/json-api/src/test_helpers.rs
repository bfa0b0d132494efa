//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use storefront_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::MockCartsService,
        orders::{
            MockOrdersService, OrderStatus,
            records::{Order, OrderAddress, OrderAddressUuid, OrderLine, OrderLineUuid, OrderUuid},
        },
        pricing::DiscountPercent,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid, VariantRecord, VariantUuid},
        },
        users::{
            MockUsersService,
            records::{Actor, UserUuid},
        },
    },
};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::{CheckoutCosts, State},
};

pub(crate) const CUSTOMER: Actor = Actor::customer(UserUuid::from_uuid(Uuid::from_u128(1)));
pub(crate) const STAFF: Actor = Actor::staff(UserUuid::from_uuid(Uuid::from_u128(2)));

/// Service mocks with no expectations; any unexpected call panics.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) users: MockUsersService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(
            AppContext {
                users: Arc::new(self.users),
                products: Arc::new(self.products),
                carts: Arc::new(self.carts),
                orders: Arc::new(self.orders),
                auth: Arc::new(self.auth),
            },
            CheckoutCosts {
                shipping_cost: 30_000,
                payment_cost: 0,
            },
        )
    }
}

struct InjectActor(Actor);

#[handler]
impl InjectActor {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_actor(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

/// Serve `route` as if `actor` had already authenticated.
pub(crate) fn service_as(actor: Actor, mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(InjectActor(actor))
            .push(route),
    )
}

pub(crate) fn make_variant(product: ProductUuid, variant: VariantUuid) -> VariantRecord {
    VariantRecord {
        uuid: variant,
        product_uuid: product,
        name: "M / Blue".to_string(),
        unit_price: 100_000,
        discount_percent: DiscountPercent::ZERO,
        is_available: true,
        stock_count: 5,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(product: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid: product,
        name: "Linen Shirt".to_string(),
        sold_quantity: 0,
        variants: vec![make_variant(product, VariantUuid::new())],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(order: OrderUuid, customer: UserUuid, status: OrderStatus) -> Order {
    Order {
        uuid: order,
        customer_uuid: customer,
        status,
        shipping_cost: 20_000,
        payment_cost: 0,
        total_cost: 200_000,
        note: None,
        payment_method: "cod".to_string(),
        shipping_method: "standard".to_string(),
        updated_by: None,
        address: OrderAddress {
            uuid: OrderAddressUuid::new(),
            province: "Ha Noi".to_string(),
            district: "Hoan Kiem".to_string(),
            ward: "Hang Bac".to_string(),
            detail: "12 Hang Bac".to_string(),
            user_phone: "0900000000".to_string(),
            user_name: "Test Customer".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
        },
        lines: vec![OrderLine {
            uuid: OrderLineUuid::new(),
            order_uuid: order,
            product_uuid: ProductUuid::new(),
            variant_uuid: VariantUuid::new(),
            quantity: 2,
            unit_price: 90_000,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
