//! Domain models for storefront-service.

mod blog;
mod cart;
mod catering;
mod gallery;
mod mealplan;
mod menu;
mod order;
mod payment;
mod shipping;
mod training;

pub use blog::*;
pub use cart::*;
pub use catering::*;
pub use gallery::*;
pub use mealplan::*;
pub use menu::*;
pub use order::*;
pub use payment::*;
pub use shipping::*;
pub use training::*;

/// Derive a url-safe slug from a display name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
