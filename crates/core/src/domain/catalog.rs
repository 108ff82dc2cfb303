use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::product::Product;
use crate::errors::DomainError;

/// Read-only product table, built once and shared for the life of the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub count: usize,
    pub total_value: Decimal,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.0 == 0 {
                return Err(DomainError::InvalidProductId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(DomainError::DuplicateProductId(product.id));
            }
            if product.name.trim().is_empty() {
                return Err(DomainError::EmptyProductName(product.id));
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                return Err(DomainError::NegativePrice { id: product.id, price: product.price });
            }
        }
        CatalogSummary::of(&products)?;

        Ok(Self { products })
    }

    /// The fixed demo catalog served by the products endpoint.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::new(vec![
            Product::new(1, "Laptop", Decimal::new(99_999, 2)),
            Product::new(2, "Smartphone", Decimal::new(59_999, 2)),
            Product::new(3, "Tablet", Decimal::new(39_999, 2)),
            Product::new(4, "Headphones", Decimal::new(14_999, 2)),
            Product::new(5, "Smart Watch", Decimal::new(29_999, 2)),
            Product::new(6, "USB-C Cable", Decimal::new(999, 2)),
        ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn summary(&self) -> Result<CatalogSummary, DomainError> {
        CatalogSummary::of(&self.products)
    }
}

impl CatalogSummary {
    /// Exact decimal total; an out-of-range sum is an error.
    pub fn of(products: &[Product]) -> Result<Self, DomainError> {
        let count = products.len();
        let total_value = products
            .iter()
            .try_fold(Decimal::ZERO, |total, product| total.checked_add(product.price))
            .ok_or(DomainError::TotalOverflow { count })?;

        Ok(Self { count, total_value })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::catalog::{Catalog, CatalogSummary};
    use crate::domain::product::{Product, ProductId};
    use crate::errors::DomainError;

    #[test]
    fn builtin_catalog_satisfies_invariants() {
        let builtin = Catalog::builtin().expect("builtin catalog is valid");

        assert_eq!(builtin.len(), 6);
        assert!(!builtin.is_empty());
        assert_eq!(builtin.products()[0].name, "Laptop");
        assert_eq!(builtin.products()[5].name, "USB-C Cable");
    }

    #[test]
    fn builtin_summary_is_exact() {
        let summary =
            Catalog::builtin().expect("builtin catalog is valid").summary().expect("total fits");

        assert_eq!(summary.count, 6);
        assert_eq!(summary.total_value, Decimal::new(245_994, 2));
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = CatalogSummary::of(&[]).expect("empty total fits");

        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_value, Decimal::ZERO);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::new(vec![
            Product::new(1, "Laptop", Decimal::new(99_999, 2)),
            Product::new(1, "Tablet", Decimal::new(39_999, 2)),
        ]);

        assert_eq!(result, Err(DomainError::DuplicateProductId(ProductId(1))));
    }

    #[test]
    fn blank_names_and_negative_prices_are_rejected() {
        let blank = Catalog::new(vec![Product::new(3, "  ", Decimal::ONE)]);
        assert_eq!(blank, Err(DomainError::EmptyProductName(ProductId(3))));

        let negative = Catalog::new(vec![Product::new(4, "Refund", Decimal::new(-100, 2))]);
        assert!(matches!(negative, Err(DomainError::NegativePrice { id: ProductId(4), .. })));

        let zero_id = Catalog::new(vec![Product::new(0, "Ghost", Decimal::ONE)]);
        assert_eq!(zero_id, Err(DomainError::InvalidProductId(ProductId(0))));
    }

    #[test]
    fn free_products_are_allowed() {
        let catalog = Catalog::new(vec![Product::new(9, "Sticker", Decimal::ZERO)])
            .expect("zero price is valid");

        assert_eq!(catalog.summary().expect("total fits").total_value, Decimal::ZERO);
    }

    #[test]
    fn overflowing_total_is_an_error_not_a_panic() {
        let products = vec![
            Product::new(1, "Vault", Decimal::MAX),
            Product::new(2, "Second vault", Decimal::MAX),
        ];

        assert_eq!(CatalogSummary::of(&products), Err(DomainError::TotalOverflow { count: 2 }));
        assert_eq!(Catalog::new(products), Err(DomainError::TotalOverflow { count: 2 }));
    }

    #[test]
    fn single_maximal_price_still_sums() {
        let products = vec![Product::new(1, "Vault", Decimal::MAX)];

        let summary = CatalogSummary::of(&products).expect("one price fits");

        assert_eq!(summary.total_value, Decimal::MAX);
    }
}
