//! Starter catalog so a fresh server has something to browse.

use chrono::{DateTime, Utc};

use crate::error::MarketResult;
use crate::identity::UserId;
use crate::marketplace::Marketplace;
use crate::pricing::BulkDiscount;
use crate::product::{DeliveryMode, Product, ProductCategory, ProductId};

struct Listing {
    name: &'static str,
    category: ProductCategory,
    price_paise: u64,
    stock: u32,
    image: &'static str,
    supplier: (&'static str, &'static str, f64),
    distance_km: f64,
    online_only: bool,
    description: &'static str,
    min_order: u32,
    tiers: &'static [(u32, f64)],
}

fn listings() -> [Listing; 4] {
    [
        Listing {
            name: "Fresh Red Onions",
            category: ProductCategory::Vegetables,
            price_paise: 3000,
            stock: 500,
            image: "https://images.pexels.com/photos/3648850/pexels-photo-3648850.jpeg",
            supplier: ("supplier1", "Ravi Vegetable Mart", 4.5),
            distance_km: 1.2,
            online_only: false,
            description: "Fresh, high-quality red onions sourced directly from local farms.",
            min_order: 5,
            tiers: &[(50, 5.0), (100, 10.0)],
        },
        Listing {
            name: "Premium Potatoes",
            category: ProductCategory::Vegetables,
            price_paise: 2500,
            stock: 300,
            image: "https://images.pexels.com/photos/144248/potatoes-vegetables-erdfrucht-bio-144248.jpeg",
            supplier: ("supplier2", "Sharma Fresh Supplies", 4.2),
            distance_km: 2.5,
            online_only: true,
            description: "Grade A potatoes perfect for all your cooking needs.",
            min_order: 10,
            tiers: &[],
        },
        Listing {
            name: "Garam Masala Powder",
            category: ProductCategory::Spices,
            price_paise: 18000,
            stock: 50,
            image: "https://images.pexels.com/photos/4198015/pexels-photo-4198015.jpeg",
            supplier: ("supplier1", "Ravi Vegetable Mart", 4.5),
            distance_km: 1.2,
            online_only: false,
            description: "Authentic garam masala blend with premium spices.",
            min_order: 1,
            tiers: &[],
        },
        Listing {
            name: "Fresh Tomatoes",
            category: ProductCategory::Vegetables,
            price_paise: 3500,
            stock: 200,
            image: "https://images.pexels.com/photos/1327838/pexels-photo-1327838.jpeg",
            supplier: ("supplier3", "Green Valley Farms", 4.8),
            distance_km: 3.1,
            online_only: false,
            description: "Farm-fresh tomatoes with rich flavor and vibrant color.",
            min_order: 5,
            tiers: &[(25, 8.0)],
        },
    ]
}

/// A marketplace holding the demo catalog and nothing else.
pub fn demo_marketplace(now: DateTime<Utc>) -> MarketResult<Marketplace> {
    let mut market = Marketplace::default();
    for listing in listings() {
        let (supplier_id, supplier_name, supplier_rating) = listing.supplier;
        let delivery_modes = if listing.online_only {
            vec![DeliveryMode::Online]
        } else {
            vec![DeliveryMode::Online, DeliveryMode::Offline]
        };
        let product = Product {
            id: ProductId(String::new()),
            name: listing.name.to_string(),
            category: listing.category,
            price_paise: listing.price_paise,
            unit: "kg".to_string(),
            stock: listing.stock,
            image: listing.image.to_string(),
            supplier_id: UserId::from(supplier_id),
            supplier_name: supplier_name.to_string(),
            supplier_rating,
            distance_km: listing.distance_km,
            delivery_modes,
            description: listing.description.to_string(),
            min_order: listing.min_order,
            bulk_discounts: listing
                .tiers
                .iter()
                .map(|&(qty, pct)| BulkDiscount::new(qty, pct))
                .collect(),
            ratings: Vec::new(),
            average_rating: None,
            updated_at: now,
        };
        market.list_seed_product(product, now)?;
    }
    Ok(market)
}
