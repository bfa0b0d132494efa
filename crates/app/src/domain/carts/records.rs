//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{
        inventory::{Availability, check_availability},
        pricing::{PricingError, final_price, order_total},
        products::records::{ProductUuid, VariantRecord, VariantUuid},
        users::records::UserUuid,
    },
    uuids::{Entity, TypedUuid},
};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// A single cart line as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line joined with the current state of its variant.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: CartItem,

    /// `None` when the variant no longer belongs to the line's product.
    pub variant: Option<VariantRecord>,
}

impl CartLine {
    /// Current discounted unit price, if the variant still exists.
    #[must_use]
    pub fn final_price(&self) -> Option<u64> {
        self.variant
            .as_ref()
            .map(|variant| final_price(variant.unit_price, variant.discount_percent))
    }

    #[must_use]
    pub fn availability(&self) -> Availability {
        check_availability(self.variant.as_ref(), self.item.quantity)
    }
}

/// A user's cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub user_uuid: UserUuid,
    pub lines: Vec<CartLine>,
    pub summary: CartSummary,
}

/// Aggregate figures for a cart, priced at current variant prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartSummary {
    pub item_count: u64,
    pub total_quantity: u64,
    pub total_price: u64,
}

impl CartSummary {
    /// Summarise `lines`; lines whose variant is gone count towards
    /// quantities but not the price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in `u64`.
    pub fn from_lines(lines: &[CartLine]) -> Result<Self, PricingError> {
        let total_quantity = lines.iter().try_fold(0_u64, |total, line| {
            total
                .checked_add(line.item.quantity)
                .ok_or(PricingError::Overflow)
        })?;

        let total_price = order_total(
            lines
                .iter()
                .filter_map(|line| line.final_price().map(|price| (price, line.item.quantity))),
            0,
            0,
        )?;

        Ok(Self {
            item_count: lines.len() as u64,
            total_quantity,
            total_price,
        })
    }
}

/// Availability of one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemValidation {
    pub item: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
    pub availability: Availability,
}

/// Availability of every line in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartValidation {
    pub valid: bool,
    pub results: Vec<CartItemValidation>,
}

impl CartValidation {
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let results: Vec<_> = lines
            .iter()
            .map(|line| CartItemValidation {
                item: line.item.uuid,
                product_uuid: line.item.product_uuid,
                variant_uuid: line.item.variant_uuid,
                quantity: line.item.quantity,
                availability: line.availability(),
            })
            .collect();

        Self {
            valid: results.iter().all(|result| result.availability.is_available()),
            results,
        }
    }

    /// Only the lines that cannot currently be purchased.
    #[must_use]
    pub fn failures(&self) -> Vec<CartItemValidation> {
        self.results
            .iter()
            .filter(|result| !result.availability.is_available())
            .copied()
            .collect()
    }
}

impl Entity for CartItem {
    const LABEL: &'static str = "cart_item";
}
