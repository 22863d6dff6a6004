//! Synthetic product generation.
//!
//! Produces plausible storefront entries from small word lists using a seeded
//! [`StdRng`], so the same seed always yields the same catalog.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Builder;

use super::Product;

const ADJECTIVES: &[&str] = &[
    "Handcrafted", "Sleek", "Rustic", "Ergonomic", "Refined", "Practical",
    "Gorgeous", "Intelligent", "Licensed", "Generic", "Elegant", "Modern",
    "Small", "Tasty", "Awesome", "Fantastic", "Incredible", "Luxurious",
];

const MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Plastic", "Cotton", "Granite", "Rubber",
    "Metal", "Soft", "Fresh", "Frozen", "Bronze", "Ceramic", "Silk",
];

const NOUNS: &[&str] = &[
    "Chair", "Car", "Computer", "Keyboard", "Mouse", "Bike", "Ball", "Gloves",
    "Pants", "Shirt", "Table", "Shoes", "Hat", "Towels", "Soap", "Tuna",
    "Chicken", "Fish", "Cheese", "Bacon", "Pizza", "Salad", "Sausages", "Chips",
];

const DESCRIPTIONS: &[&str] = &[
    "Built to last with a finish that holds up to everyday use.",
    "A favourite among customers who value comfort and simplicity.",
    "Carefully designed for a balance of style and practicality.",
    "Lightweight, easy to clean and ready for daily routines.",
    "Combines durable materials with a clean, modern silhouette.",
    "The kind of piece that quietly becomes part of your day.",
];

/// Lowest and highest generated price, in centavos.
const PRICE_RANGE_CENTS: std::ops::RangeInclusive<u32> = 1_000..=100_000;

/// Generate one random product.
pub fn product(rng: &mut StdRng) -> Product {
    let id = Builder::from_random_bytes(rng.gen()).into_uuid();

    let name = format!(
        "{} {} {}",
        pick(rng, ADJECTIVES),
        pick(rng, MATERIALS),
        pick(rng, NOUNS),
    );

    let price = format_price(rng.gen_range(PRICE_RANGE_CENTS));
    let description = pick(rng, DESCRIPTIONS).to_string();
    let image = format!(
        "https://picsum.photos/seed/{}/640/480",
        id.simple().to_string().get(..8).unwrap_or_default()
    );

    Product {
        id: id.to_string(),
        name,
        price,
        description: Some(description),
        image,
    }
}

/// Format centavos as a Brazilian-real price string: `R$ 123,45`.
pub fn format_price(cents: u32) -> String {
    format!("R$ {},{:02}", cents / 100, cents % 100)
}

fn pick(rng: &mut StdRng, words: &[&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
