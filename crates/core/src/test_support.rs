//! Catalog fixtures shared by the reducer tests.

use rust_decimal::Decimal;

use crate::types::{NamedRef, Product, ProductId, ProductImage, Variant, VariantAttribute, VariantId};

pub fn product(id: &str, base_price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        slug: format!("product-{id}"),
        base_price: Decimal::from(base_price),
        compare_at_price: None,
        images: vec![ProductImage {
            url: format!("/img/{id}.jpg"),
            alt: String::new(),
        }],
        brand: Some(NamedRef {
            name: "Atelier".to_string(),
        }),
        category: None,
        sku: format!("SKU-{id}"),
    }
}

pub fn discounted(id: &str, base_price: i64, compare_at: i64) -> Product {
    Product {
        compare_at_price: Some(Decimal::from(compare_at)),
        ..product(id, base_price)
    }
}

pub fn variant(id: &str, price: i64, size: &str) -> Variant {
    Variant {
        id: VariantId::new(id),
        price: Decimal::from(price),
        compare_at_price: None,
        stock: 5,
        attributes: vec![VariantAttribute {
            name: "Size".to_string(),
            value: size.to_string(),
        }],
        sku: format!("SKU-{id}"),
    }
}
