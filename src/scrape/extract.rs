// src/scrape/extract.rs

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use tracing::trace;
use url::Url;

/// Placeholder written wherever a value could not be found.
pub const NOT_AVAILABLE: &str = "N/A";

/// One recipe card from the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeCard {
    pub item_url: String,
    pub title: String,
    pub category: String,
}

/// Values read from a single recipe page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetails {
    pub ingredients: Vec<String>,
    pub cooking_time: String,
    pub nutrition_facts: BTreeMap<String, String>,
    pub publish_dates: Vec<String>,
}

impl RecipeDetails {
    /// What a recipe gets when its page could not be read.
    pub fn unavailable() -> Self {
        Self {
            ingredients: vec![NOT_AVAILABLE.to_string()],
            cooking_time: NOT_AVAILABLE.to_string(),
            nutrition_facts: BTreeMap::from([(
                NOT_AVAILABLE.to_string(),
                NOT_AVAILABLE.to_string(),
            )]),
            publish_dates: vec![NOT_AVAILABLE.to_string()],
        }
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector should parse")
}

fn clean_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Collect every `a.mntl-card-list-items` card. Relative links are resolved
/// against `base`; a card without `href` keeps `N/A`.
pub fn parse_listing(html: &str, base: &Url) -> Vec<RecipeCard> {
    let doc = Html::parse_document(html);
    let card_sel = selector("a.mntl-card-list-items");
    let title_sel = selector("span.card__title-text");
    let content_sel = selector("div.card__content");

    doc.select(&card_sel)
        .map(|card| {
            let item_url = card
                .value()
                .attr("href")
                .and_then(|href| base.join(href).ok())
                .map(|u| u.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let title = card
                .select(&title_sel)
                .next()
                .map(clean_text)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let category = card
                .select(&content_sel)
                .next()
                .and_then(|c| c.value().attr("data-tag"))
                .unwrap_or(NOT_AVAILABLE)
                .to_string();
            trace!(url = %item_url, "found card");
            RecipeCard {
                item_url,
                title,
                category,
            }
        })
        .collect()
}

/// Read ingredients, cooking time, nutrition and publish dates from a recipe
/// page. A page without an ingredients list is treated as unreadable.
pub fn parse_recipe_page(html: &str) -> RecipeDetails {
    let doc = Html::parse_document(html);
    if doc
        .select(&selector(".structured-ingredients__list"))
        .next()
        .is_none()
    {
        return RecipeDetails::unavailable();
    }

    let ingredients = doc
        .select(&selector(".structured-ingredients__list-item"))
        .map(clean_text)
        .collect();

    let cooking_time = doc
        .select(&selector("span.meta-text__text"))
        .next()
        .map(clean_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let publish_dates = doc
        .select(&selector(".mntl-attribution__item-date"))
        .map(clean_text)
        .collect();

    RecipeDetails {
        ingredients,
        cooking_time,
        nutrition_facts: parse_nutrition(&doc),
        publish_dates,
    }
}

fn parse_nutrition(doc: &Html) -> BTreeMap<String, String> {
    let Some(block) = doc
        .select(&selector(".nutritional-guidelines-block"))
        .next()
    else {
        return RecipeDetails::unavailable().nutrition_facts;
    };

    let mut facts = BTreeMap::new();
    let td_sel = selector("td");

    // summary table: value cell first, nutrient name second
    for row in block.select(&selector(
        ".nutrition-info__table--body .nutrition-info__table--row",
    )) {
        let cells: Vec<String> = row.select(&td_sel).map(clean_text).collect();
        if let [value, key] = cells.as_slice() {
            facts.insert(key.clone(), value.clone());
        }
    }

    // detailed label: the row's text minus its <th> name
    let th_sel = selector("th");
    for row in block.select(&selector(".nutrition-label tr")) {
        if let Some(th) = row.select(&th_sel).next() {
            let name = clean_text(th);
            let value = clean_text(row).replacen(&name, "", 1).trim().to_string();
            facts.insert(name, value);
        }
    }
    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body><div id="taxonomysc_1-0">
<a class="comp mntl-card-list-items" href="/apple-pie-recipe-123">
  <div class="card__content" data-tag="Dessert">
    <span class="card__title"><span class="card__title-text"> Apple Pie </span></span>
  </div>
</a>
<a class="mntl-card-list-items" href="https://www.simplyrecipes.com/chili-456">
  <div class="card__content">
    <span class="card__title-text">Chili, Texas Style</span>
  </div>
</a>
<a class="mntl-card-list-items"><span class="other">no link</span></a>
<a class="unrelated" href="/skip-me">Skip</a>
</div></body></html>"#;

    const RECIPE: &str = r#"<html><body>
<span class="meta-text__text">1 hr 30 mins</span>
<span class="meta-text__text">8 servings</span>
<div class="mntl-attribution__item-date">Updated March 3, 2024</div>
<ul class="structured-ingredients__list">
  <li class="structured-ingredients__list-item"> 2 cups flour </li>
  <li class="structured-ingredients__list-item">1 tsp salt</li>
</ul>
<div class="nutritional-guidelines-block">
  <table class="nutrition-info__table"><tbody class="nutrition-info__table--body">
    <tr class="nutrition-info__table--row"><td>320</td><td>Calories</td></tr>
    <tr class="nutrition-info__table--row"><td>12g</td><td>Fat</td></tr>
    <tr class="nutrition-info__table--row"><td>odd</td></tr>
  </tbody></table>
  <table class="nutrition-label"><tbody>
    <tr><th>Sodium</th><td>210mg</td></tr>
    <tr><td>no header</td></tr>
  </tbody></table>
</div>
</body></html>"#;

    fn base() -> Url {
        Url::parse("https://www.simplyrecipes.com/recipes-5090746").unwrap()
    }

    #[test]
    fn test_parse_listing_cards() {
        let cards = parse_listing(LISTING, &base());
        assert_eq!(cards.len(), 3);
        assert_eq!(
            cards[0],
            RecipeCard {
                item_url: "https://www.simplyrecipes.com/apple-pie-recipe-123".to_string(),
                title: "Apple Pie".to_string(),
                category: "Dessert".to_string(),
            }
        );
        assert_eq!(cards[1].title, "Chili, Texas Style");
        assert_eq!(cards[1].category, "N/A");
        assert_eq!(cards[2].item_url, "N/A");
        assert_eq!(cards[2].title, "N/A");
    }

    #[test]
    fn test_parse_listing_empty_page() {
        assert!(parse_listing("<html></html>", &base()).is_empty());
    }

    #[test]
    fn test_parse_recipe_page_details() {
        let details = parse_recipe_page(RECIPE);
        assert_eq!(details.ingredients, vec!["2 cups flour", "1 tsp salt"]);
        assert_eq!(details.cooking_time, "1 hr 30 mins");
        assert_eq!(details.publish_dates, vec!["Updated March 3, 2024"]);
        assert_eq!(
            details.nutrition_facts,
            BTreeMap::from([
                ("Calories".to_string(), "320".to_string()),
                ("Fat".to_string(), "12g".to_string()),
                ("Sodium".to_string(), "210mg".to_string()),
            ])
        );
    }

    #[test]
    fn test_parse_recipe_page_without_ingredients_is_unavailable() {
        let details = parse_recipe_page("<html><span class=\"meta-text__text\">5 mins</span></html>");
        assert_eq!(details, RecipeDetails::unavailable());
    }

    #[test]
    fn test_parse_recipe_page_missing_nutrition_block() {
        let html = r#"<ul class="structured-ingredients__list">
            <li class="structured-ingredients__list-item">egg</li></ul>"#;
        let details = parse_recipe_page(html);
        assert_eq!(details.ingredients, vec!["egg"]);
        assert_eq!(details.cooking_time, "N/A");
        assert!(details.publish_dates.is_empty());
        assert_eq!(details.nutrition_facts.get("N/A").map(String::as_str), Some("N/A"));
    }
}
