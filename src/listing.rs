use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreError;
use crate::render::escape_html;
use crate::storage::LocalStore;

pub const LISTINGS_KEY: &str = "wasteData";

/// Kilograms as entered by the seller. Form input arrives as text, so both
/// numbers and strings are kept and shown as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Text(String::new())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(t) => f.write_str(t),
        }
    }
}

/// A lot of farm waste offered by a seller. Missing fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WasteListing {
    pub name: String,
    pub quantity: Quantity,
    pub contact: String,
}

/// Listings stored under [`LISTINGS_KEY`], or the parse error if the value is
/// present but not a listings array.
pub fn try_load_listings(store: &LocalStore) -> Result<Vec<WasteListing>, StoreError> {
    match store.get(LISTINGS_KEY) {
        Some(raw) => Ok(serde_json::from_str(raw)?),
        None => Ok(Vec::new()),
    }
}

/// Like [`try_load_listings`], but unreadable data reads as an empty list.
pub fn load_listings(store: &LocalStore) -> Vec<WasteListing> {
    try_load_listings(store).unwrap_or_else(|e| {
        warn!("ignoring unreadable listings: {}", e);
        Vec::new()
    })
}

/// Appends `listing` and returns its index. Refuses to touch a stored value
/// it cannot parse.
pub fn add_listing(store: &mut LocalStore, listing: WasteListing) -> Result<usize, StoreError> {
    let mut listings = try_load_listings(store)?;
    listings.push(listing);
    store.set(LISTINGS_KEY, serde_json::to_string(&listings)?)?;
    Ok(listings.len() - 1)
}

/// Seller contact for the listing at `index`.
pub fn buy(store: &LocalStore, index: usize) -> Result<String, StoreError> {
    load_listings(store)
        .into_iter()
        .nth(index)
        .map(|listing| listing.contact)
        .ok_or(StoreError::NoSuchListing(index))
}

pub fn render_listings_html(listings: &[WasteListing]) -> String {
    listings
        .iter()
        .enumerate()
        .map(|(index, waste)| {
            format!(
                "<li><strong>{}</strong> - {} kg | Contact: {} <button onclick=\"buyWaste({})\">Buy</button></li>",
                escape_html(&waste.name),
                escape_html(&waste.quantity.to_string()),
                escape_html(&waste.contact),
                index
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_listings_text(listings: &[WasteListing]) -> String {
    listings
        .iter()
        .enumerate()
        .map(|(index, waste)| {
            format!(
                "[{}] {} - {} kg | Contact: {}",
                index, waste.name, waste.quantity, waste.contact
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("storage.json")).unwrap();
        (dir, store)
    }

    fn straw() -> WasteListing {
        WasteListing {
            name: "Rice straw".to_string(),
            quantity: Quantity::Number(250.0),
            contact: "+91 98765 43210".to_string(),
        }
    }

    #[test]
    fn empty_store_has_no_listings() {
        let (_dir, store) = store();
        assert!(load_listings(&store).is_empty());
        assert!(matches!(buy(&store, 0), Err(StoreError::NoSuchListing(0))));
    }

    #[test]
    fn added_listing_can_be_bought() {
        let (_dir, mut store) = store();
        assert_eq!(add_listing(&mut store, straw()).unwrap(), 0);
        assert_eq!(buy(&store, 0).unwrap(), "+91 98765 43210");
        assert_eq!(load_listings(&store), vec![straw()]);
    }

    #[test]
    fn reads_array_written_by_the_web_page() {
        let (_dir, mut store) = store();
        store
            .set(
                LISTINGS_KEY,
                r#"[{"name":"Husk","quantity":12.5,"contact":"a@b.c"}]"#,
            )
            .unwrap();
        let listings = load_listings(&store);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].quantity, Quantity::Number(12.5));
    }

    #[test]
    fn unreadable_data_reads_as_empty() {
        let (_dir, mut store) = store();
        store.set(LISTINGS_KEY, "not json").unwrap();
        assert!(load_listings(&store).is_empty());
    }

    #[test]
    fn text_quantity_survives_a_new_listing() {
        let (_dir, mut store) = store();
        store
            .set(
                LISTINGS_KEY,
                r#"[{"name":"Husk","quantity":"12","contact":"a@b.c"}]"#,
            )
            .unwrap();

        assert_eq!(add_listing(&mut store, straw()).unwrap(), 1);
        let listings = load_listings(&store);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "Husk");
        assert_eq!(listings[0].quantity, Quantity::Text("12".to_string()));
        assert!(render_listings_text(&listings).contains("[0] Husk - 12 kg | Contact: a@b.c"));
        assert_eq!(buy(&store, 0).unwrap(), "a@b.c");
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let (_dir, mut store) = store();
        store.set(LISTINGS_KEY, r#"[{"name":"Husk"}]"#).unwrap();
        let listings = load_listings(&store);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].contact, "");
        assert_eq!(listings[0].quantity, Quantity::default());
    }

    #[test]
    fn add_leaves_unreadable_data_alone() {
        let (_dir, mut store) = store();
        store.set(LISTINGS_KEY, r#"{"name":"Husk"}"#).unwrap();

        assert!(matches!(
            add_listing(&mut store, straw()),
            Err(StoreError::Json(_))
        ));
        assert_eq!(store.get(LISTINGS_KEY), Some(r#"{"name":"Husk"}"#));
    }

    #[test]
    fn html_escapes_seller_fields() {
        let listing = WasteListing {
            name: "<script>".to_string(),
            quantity: Quantity::Number(3.0),
            contact: "a&b".to_string(),
        };
        let html = render_listings_html(&[straw(), listing]);
        assert!(html.contains("<strong>Rice straw</strong> - 250 kg | Contact: +91 98765 43210"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&amp;b"));
        assert!(html.contains("buyWaste(1)"));
    }
}
