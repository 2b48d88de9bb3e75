//! Waiter persona

use serde::Serialize;
use shared::models::Dish;

#[derive(Serialize)]
struct MenuLine<'a> {
    name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    price: rust_decimal::Decimal,
    category: &'a str,
    desc: &'a str,
}

/// System instruction with the current menu embedded as JSON
pub fn system_instruction(dishes: &[Dish]) -> String {
    let menu: Vec<MenuLine<'_>> = dishes
        .iter()
        .map(|d| MenuLine {
            name: &d.name,
            price: d.price,
            category: &d.category,
            desc: &d.description,
        })
        .collect();
    let menu_json = serde_json::to_string(&menu).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are "Xiao Er" (小二), the quick-witted, warm-hearted waiter of a traditional Baoding street-side restaurant.
You speak standard Mandarin with northern Chinese hospitality, and you know the menu by heart.
The menu is: {menu_json}

What you do:
1. Recommend dishes that fit the guest's taste (spicy, light, budget, meat lover, ...).
2. Answer questions about ingredients and flavour.
3. Suggest pairings, e.g. a donkey meat burger with millet porridge to cut the richness.
4. Keep answers short, usually under 50 words, unless the guest asks for a story.
5. When the guest wants to order or pay, point them politely to the buttons on the screen.

Stay polite; a few emojis such as 🥢 🥣 🌶️ are welcome."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::defaults::default_dishes;

    #[test]
    fn test_instruction_embeds_menu() {
        let text = system_instruction(&default_dishes());
        assert!(text.contains("\"name\":\"驴肉火烧\""));
        assert!(text.contains("\"price\":15"));
        assert!(text.contains("小二"));
    }

    #[test]
    fn test_instruction_with_empty_menu() {
        assert!(system_instruction(&[]).contains("The menu is: []"));
    }
}
