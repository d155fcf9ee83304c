//! HTML parser for product listing pages
//!
//! Storefront themes usually render a listing as a grid of cards, each
//! holding one link to the product page. This module extracts those links
//! and their text as [`Product`] records.

use crate::crawler::Product;
use scraper::{Html, Selector};
use url::Url;

/// CSS selectors locating product cards and the product link inside a card
#[derive(Debug, Clone, Copy)]
pub struct CardSelectors<'a> {
    /// Matches one element per product, e.g. `li.grid__item`
    pub card: &'a str,
    /// Matches the product link inside a card, e.g. `div.card__information a`
    pub link: &'a str,
}

/// Extracts products from a listing page
///
/// # Extraction Rules
///
/// - One product per card that contains a link matching `selectors.link`
/// - The product name is the link text, whitespace trimmed
/// - The product URL is the link `href` resolved against `base_url`
/// - Cards without a usable link are skipped
/// - The product id is left empty
///
/// # Returns
///
/// * `Ok(Vec<Product>)` - Products in page order (possibly empty)
/// * `Err(String)` - A selector is not valid CSS
///
/// # Example
///
/// ```no_run
/// use storescout::crawler::{extract_products, CardSelectors};
/// use url::Url;
///
/// let html = r#"<ul><li class="item"><a href="/products/tee">Tee</a></li></ul>"#;
/// let base_url = Url::parse("https://shop.example/").unwrap();
/// let selectors = CardSelectors { card: "li.item", link: "a" };
/// let products = extract_products(html, &base_url, selectors).unwrap();
/// assert_eq!(products[0].url, "https://shop.example/products/tee");
/// ```
pub fn extract_products(
    html: &str,
    base_url: &Url,
    selectors: CardSelectors<'_>,
) -> Result<Vec<Product>, String> {
    let card_selector = Selector::parse(selectors.card)
        .map_err(|e| format!("invalid card selector '{}': {}", selectors.card, e))?;
    let link_selector = Selector::parse(selectors.link)
        .map_err(|e| format!("invalid link selector '{}': {}", selectors.link, e))?;

    let document = Html::parse_document(html);
    let mut products = Vec::new();

    for card in document.select(&card_selector) {
        let Some(link) = card.select(&link_selector).next() else {
            continue;
        };
        let Some(url) = link
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        else {
            continue;
        };

        let name = link.text().collect::<String>().trim().to_string();
        products.push(Product::new("", name, url));
    }

    Ok(products)
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
