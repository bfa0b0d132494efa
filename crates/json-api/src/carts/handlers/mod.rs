//! Cart Handlers

pub(crate) mod add;
pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove;
pub(crate) mod summary;
pub(crate) mod update;
pub(crate) mod validate;

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use storefront_app::domain::{
        carts::records::{CartItem, CartItemUuid},
        products::records::{ProductUuid, VariantUuid},
        users::records::UserUuid,
    };

    pub(super) fn make_item(user: UserUuid, quantity: u64) -> CartItem {
        CartItem {
            uuid: CartItemUuid::new(),
            user_uuid: user,
            product_uuid: ProductUuid::new(),
            variant_uuid: VariantUuid::new(),
            quantity,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
