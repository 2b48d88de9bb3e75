//! Printable menu layout
//!
//! Two A4 pages: the front page carries the house header and the categories
//! flagged `is_front`, the back page the remaining categories and the footer.
//!
//! | 模式 | 价格 | 列数 | 横幅 |
//! |------|------|------|------|
//! | business (商业版) | 显示 | 2 | 无 |
//! | family (家庭版) | 隐藏 | 4 | 家宴专享 |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{CategoryConfig, Dish};
use std::fmt;
use std::str::FromStr;

pub const HOUSE_NAME: &str = "SGG · 私房菜";
pub const HOUSE_SUBTITLE: &str = "SGG Private Kitchen";
const TAGLINES: [&str; 2] = ["匠心传承", "地道风味"];
const FAMILY_BANNER: &str = "家宴专享";
const FOOTER_MOTTO: &str = "每一道菜都是岁月的味道";
const FOOTER_WIFI: &str = "SGG_Guest";
const FOOTER_PHONE: &str = "0312-8888888";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Business,
    Family,
}

impl ViewMode {
    pub const fn shows_prices(&self) -> bool {
        matches!(self, ViewMode::Business)
    }

    pub const fn columns(&self) -> u8 {
        match self {
            ViewMode::Business => 2,
            ViewMode::Family => 4,
        }
    }

    /// Suggested file name for an exported PDF
    pub const fn export_file_name(&self) -> &'static str {
        match self {
            ViewMode::Business => "SGG_私房菜_商业菜单.pdf",
            ViewMode::Family => "SGG_私房菜_家宴菜单.pdf",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Business => f.write_str("business"),
            ViewMode::Family => f.write_str("family"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(ViewMode::Business),
            "family" => Ok(ViewMode::Family),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

/// One dish as printed; `price` is `None` when the mode hides prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub spicy_level: Option<u8>,
    pub popular: bool,
}

impl MenuEntry {
    fn from_dish(dish: &Dish, mode: ViewMode) -> Self {
        Self {
            id: dish.id.clone(),
            name: dish.name.clone(),
            description: dish.description.clone(),
            image_url: dish.image_url.clone(),
            price: mode.shows_prices().then_some(dish.price),
            spicy_level: dish.spicy_level.filter(|l| *l > 0),
            popular: dish.is_popular(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub category: CategoryConfig,
    pub dishes: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuHeader {
    pub title: String,
    pub subtitle: String,
    pub taglines: Vec<String>,
    /// Family banner shown next to the taglines
    pub family_banner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuFooter {
    pub motto: String,
    pub wifi: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPage {
    pub is_front: bool,
    pub columns: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<MenuHeader>,
    pub sections: Vec<MenuSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<MenuFooter>,
}

/// Both pages of the printable menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    pub mode: ViewMode,
    pub file_name: String,
    pub pages: Vec<MenuPage>,
}

fn sections(dishes: &[Dish], categories: &[&CategoryConfig], mode: ViewMode) -> Vec<MenuSection> {
    categories
        .iter()
        .filter_map(|category| {
            let entries: Vec<MenuEntry> = dishes
                .iter()
                .filter(|d| d.category == category.name)
                .map(|d| MenuEntry::from_dish(d, mode))
                .collect();
            (!entries.is_empty()).then(|| MenuSection {
                category: (*category).clone(),
                dishes: entries,
            })
        })
        .collect()
}

/// Front and back pages, in that order
pub fn build_pages(dishes: &[Dish], categories: &[CategoryConfig], mode: ViewMode) -> Vec<MenuPage> {
    let (front, back): (Vec<&CategoryConfig>, Vec<&CategoryConfig>) =
        categories.iter().partition(|c| c.is_front);

    let header = MenuHeader {
        title: HOUSE_NAME.to_string(),
        subtitle: HOUSE_SUBTITLE.to_string(),
        taglines: TAGLINES.iter().map(|t| t.to_string()).collect(),
        family_banner: (mode == ViewMode::Family).then(|| FAMILY_BANNER.to_string()),
    };
    let footer = MenuFooter {
        motto: FOOTER_MOTTO.to_string(),
        wifi: FOOTER_WIFI.to_string(),
        phone: FOOTER_PHONE.to_string(),
    };

    vec![
        MenuPage {
            is_front: true,
            columns: mode.columns(),
            header: Some(header),
            sections: sections(dishes, &front, mode),
            footer: None,
        },
        MenuPage {
            is_front: false,
            columns: mode.columns(),
            header: None,
            sections: sections(dishes, &back, mode),
            footer: Some(footer),
        },
    ]
}

pub fn build_view(dishes: &[Dish], categories: &[CategoryConfig], mode: ViewMode) -> MenuView {
    MenuView {
        mode,
        file_name: mode.export_file_name().to_string(),
        pages: build_pages(dishes, categories, mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::defaults::{default_categories, default_dishes};

    #[test]
    fn test_pages_split_by_front_flag() {
        let pages = build_pages(&default_dishes(), &default_categories(), ViewMode::Business);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_front);
        assert!(pages[0].header.is_some() && pages[0].footer.is_none());
        assert!(pages[1].header.is_none() && pages[1].footer.is_some());

        let front: Vec<&str> = pages[0]
            .sections
            .iter()
            .map(|s| s.category.name.as_str())
            .collect();
        assert_eq!(front, vec!["招牌主食", "特色小吃"]);
        assert!(pages[1].sections.iter().all(|s| !s.category.is_front));
    }

    #[test]
    fn test_empty_categories_are_skipped() {
        let mut categories = default_categories();
        categories.push(CategoryConfig {
            id: "cat-empty".into(),
            name: "时令".into(),
            is_front: false,
        });
        let pages = build_pages(&default_dishes(), &categories, ViewMode::Business);
        assert!(pages[1].sections.iter().all(|s| s.category.name != "时令"));
    }

    #[test]
    fn test_family_mode_hides_prices() {
        let pages = build_pages(&default_dishes(), &default_categories(), ViewMode::Family);
        assert_eq!(pages[0].columns, 4);
        assert_eq!(
            pages[0].header.as_ref().unwrap().family_banner.as_deref(),
            Some("家宴专享")
        );
        assert!(
            pages
                .iter()
                .flat_map(|p| &p.sections)
                .flat_map(|s| &s.dishes)
                .all(|d| d.price.is_none())
        );
    }

    #[test]
    fn test_business_mode_shows_prices() {
        let view = build_view(&default_dishes(), &default_categories(), ViewMode::Business);
        assert_eq!(view.file_name, "SGG_私房菜_商业菜单.pdf");
        assert_eq!(view.pages[0].columns, 2);
        assert!(view.pages[0].header.as_ref().unwrap().family_banner.is_none());
        let first = &view.pages[0].sections[0].dishes[0];
        assert_eq!(first.name, "驴肉火烧");
        assert_eq!(first.price, Some(Decimal::from(15)));
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!("family".parse::<ViewMode>(), Ok(ViewMode::Family));
        assert!("kids".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::default(), ViewMode::Business);
    }
}
