//! Bundled sample catalog, used as the offline fallback and for demos.

use storefront_commerce::catalog::{InMemoryCatalog, Product};
use storefront_commerce::{Currency, Money};

fn usd(amount: f64) -> Money {
    Money::from_decimal(amount, Currency::USD)
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    price: f64,
    category: &str,
    image: &str,
    description: &str,
    stock: u32,
    rating: f64,
) -> Product {
    Product::new(id, name, usd(price), category)
        .with_image(format!("https://images.unsplash.com/{image}"))
        .with_description(description)
        .with_stock(stock)
        .with_rating(rating)
}

/// The twelve sample products, in catalog order.
pub fn sample_products() -> Vec<Product> {
    vec![
        product("1", "Nike Air Max 90", 129.99, "Sneakers", "photo-1582562124811-c09040d0a901",
            "Classic Nike Air Max 90 shoes with air cushioning for all-day comfort.", 25, 4.5)
            .featured(),
        product("2", "Adidas Ultraboost", 179.99, "Sneakers", "photo-1618160702438-9b02ab6515c9",
            "Energy-returning Adidas Ultraboost for a responsive running experience.", 18, 4.8)
            .featured(),
        product("3", "Leather Weekender Bag", 249.99, "Bags", "photo-1487958449943-2429e8be8625",
            "Premium leather weekender bag, perfect for short trips.", 10, 4.6)
            .with_sale_price(usd(199.99)),
        product("4", "Modern Lounge Chair", 399.99, "Furniture", "photo-1721322800607-8c38375eef04",
            "Contemporary lounge chair with ergonomic design for maximum comfort.", 5, 4.7)
            .featured(),
        product("5", "Vintage Denim Jacket", 89.99, "Clothing", "photo-1500673922987-e212871fec22",
            "Classic denim jacket with vintage wash and modern fit.", 30, 4.3),
        product("6", "Bluetooth Headphones", 159.99, "Electronics", "photo-1618160702438-9b02ab6515c9",
            "Wireless Bluetooth headphones with noise cancellation.", 15, 4.4)
            .with_sale_price(usd(129.99)),
        product("7", "Ceramic Plant Pot", 39.99, "Home", "photo-1582562124811-c09040d0a901",
            "Handcrafted ceramic pot, perfect for indoor plants.", 22, 4.2),
        product("8", "Smart Watch", 299.99, "Electronics", "photo-1487958449943-2429e8be8625",
            "Smart watch with health monitoring and notifications.", 12, 4.6)
            .featured(),
        product("9", "Wool Throw Blanket", 79.99, "Home", "photo-1500673922987-e212871fec22",
            "Soft wool throw blanket, perfect for chilly evenings.", 18, 4.7),
        product("10", "Canvas Backpack", 69.99, "Bags", "photo-1721322800607-8c38375eef04",
            "Durable canvas backpack with leather trim.", 20, 4.5),
        product("11", "Stainless Steel Water Bottle", 29.99, "Accessories", "photo-1618160702438-9b02ab6515c9",
            "Vacuum insulated stainless steel water bottle.", 40, 4.4),
        product("12", "Cotton T-Shirt", 24.99, "Clothing", "photo-1487958449943-2429e8be8625",
            "Soft cotton t-shirt with modern fit.", 50, 4.3),
    ]
}

/// An in-memory catalog over [`sample_products`].
pub fn sample_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(sample_products())
}
