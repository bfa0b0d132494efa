//! Availability checks

use std::fmt;

use crate::domain::products::records::VariantRecord;

/// Outcome of checking whether a quantity of a variant can be purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    VariantNotFound,
    Unavailable,
    InsufficientStock { remaining: u64 },
}

impl Availability {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Stable machine-readable name of the outcome.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::VariantNotFound => "variant_not_found",
            Self::Unavailable => "unavailable",
            Self::InsufficientStock { .. } => "insufficient_stock",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::VariantNotFound => f.write_str("variant not found"),
            Self::Unavailable => f.write_str("variant is no longer available"),
            Self::InsufficientStock { remaining } => {
                write!(f, "only {remaining} left in stock")
            }
        }
    }
}

/// Decide whether `quantity` units of `variant` can be purchased right now.
///
/// This is advisory: stock can move between the check and a reservation.
#[must_use]
pub fn check_availability(variant: Option<&VariantRecord>, quantity: u64) -> Availability {
    let Some(variant) = variant else {
        return Availability::VariantNotFound;
    };

    if !variant.is_available {
        return Availability::Unavailable;
    }

    if variant.stock_count < quantity {
        return Availability::InsufficientStock {
            remaining: variant.stock_count,
        };
    }

    Availability::Available
}
