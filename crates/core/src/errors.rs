use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::product::ProductId;
use crate::view::ViewTransitionError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("product id must be positive, got {0}")]
    InvalidProductId(ProductId),
    #[error("duplicate product id {0} in catalog")]
    DuplicateProductId(ProductId),
    #[error("product {0} has an empty name")]
    EmptyProductName(ProductId),
    #[error("product {id} has a negative price ({price})")]
    NegativePrice { id: ProductId, price: Decimal },
    #[error("total value of {count} products exceeds the representable range")]
    TotalOverflow { count: usize },
    #[error(transparent)]
    ViewTransition(#[from] ViewTransitionError),
}
