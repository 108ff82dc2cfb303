use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub u64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry as it travels on the wire.
///
/// `price` is kept as an exact decimal in memory and encoded as a JSON number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, price: Decimal) -> Self {
        Self { id: ProductId(id), name: name.into(), price }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::domain::product::{Product, ProductId};

    #[test]
    fn product_serializes_with_bare_id_and_numeric_price() {
        let product = Product::new(6, "USB-C Cable", Decimal::new(999, 2));

        let value = serde_json::to_value(&product).expect("serialize product");

        assert_eq!(value, json!({ "id": 6, "name": "USB-C Cable", "price": 9.99 }));
    }

    #[test]
    fn product_deserializes_float_price_without_drift() {
        let product: Product =
            serde_json::from_str(r#"{"id":1,"name":"Laptop","price":999.99}"#)
                .expect("deserialize product");

        assert_eq!(product.id, ProductId(1));
        assert_eq!(product.price, Decimal::new(99_999, 2));
    }

    #[test]
    fn product_accepts_integer_price() {
        let product: Product = serde_json::from_str(r#"{"id":2,"name":"Gift Card","price":25}"#)
            .expect("deserialize product");

        assert_eq!(product.price, Decimal::new(25, 0));
    }
}
