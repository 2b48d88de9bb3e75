//! Built-in menu, used when no saved menu exists

use rust_decimal::Decimal;
use shared::models::{CategoryConfig, Dish};

fn category(id: &str, name: &str, is_front: bool) -> CategoryConfig {
    CategoryConfig {
        id: id.to_string(),
        name: name.to_string(),
        is_front,
    }
}

#[allow(clippy::too_many_arguments)]
fn dish(
    id: &str,
    name: &str,
    price: Decimal,
    category: &str,
    description: &str,
    image: &str,
    spicy_level: Option<u8>,
    popular: bool,
) -> Dish {
    Dish {
        id: id.to_string(),
        name: name.to_string(),
        price,
        category: category.to_string(),
        description: description.to_string(),
        image_url: format!("https://images.unsplash.com/{image}?w=400"),
        spicy_level,
        popular: popular.then_some(true),
    }
}

pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        category("cat-signature", "招牌主食", true),
        category("cat-snacks", "特色小吃", true),
        category("cat-hot", "家常热菜", false),
        category("cat-soup", "汤粥", false),
        category("cat-drinks", "饮品", false),
    ]
}

pub fn default_dishes() -> Vec<Dish> {
    vec![
        dish(
            "d-lvrou",
            "驴肉火烧",
            Decimal::from(15),
            "招牌主食",
            "保定名吃，现烤火烧夹卤驴肉，外酥里嫩",
            "photo-1550547660-d9450f859349",
            None,
            true,
        ),
        dish(
            "d-menzi",
            "焖子",
            Decimal::from(12),
            "招牌主食",
            "红薯淀粉煎至两面焦黄，浇蒜汁麻酱",
            "photo-1512058564366-18510be2db19",
            Some(1),
            false,
        ),
        dish(
            "d-baozi",
            "白运章包子",
            Decimal::from(18),
            "招牌主食",
            "百年老字号，皮薄馅大，一口流油",
            "photo-1496116218417-1a781b1c416c",
            None,
            true,
        ),
        dish(
            "d-jiangcai",
            "槐茂酱菜",
            Decimal::from(8),
            "特色小吃",
            "老保定酱菜拼盘，佐粥佳品",
            "photo-1547592180-85f173990554",
            None,
            false,
        ),
        dish(
            "d-liangpi",
            "麻酱凉皮",
            Decimal::new(95, 1),
            "特色小吃",
            "手工凉皮配芝麻酱，清爽解腻",
            "photo-1569718212165-3a8278d5f624",
            Some(2),
            false,
        ),
        dish(
            "d-luji",
            "马家老鸡铺卤鸡",
            Decimal::from(38),
            "家常热菜",
            "百年卤汤慢炖，皮色红亮",
            "photo-1598103442097-8b74394b95c6",
            None,
            true,
        ),
        dish(
            "d-lazi",
            "辣子鸡丁",
            Decimal::from(32),
            "家常热菜",
            "干辣椒爆炒，香辣下饭",
            "photo-1525755662778-989d0524087e",
            Some(3),
            false,
        ),
        dish(
            "d-xiaomi",
            "小米粥",
            Decimal::from(5),
            "汤粥",
            "黄小米熬足两小时，配火烧解腻",
            "photo-1505253716362-afaea1d3d1af",
            None,
            false,
        ),
        dish(
            "d-paigu",
            "排骨汤",
            Decimal::from(22),
            "汤粥",
            "猪骨慢熬，汤色奶白",
            "photo-1547592166-23ac45744acd",
            None,
            false,
        ),
        dish(
            "d-suanmei",
            "酸梅汤",
            Decimal::from(6),
            "饮品",
            "乌梅山楂熬制，冰镇解暑",
            "photo-1497534446932-c925b458314e",
            None,
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_dish_has_a_category() {
        let categories = default_categories();
        for dish in default_dishes() {
            assert!(
                categories.iter().any(|c| c.name == dish.category),
                "{} has no category",
                dish.name
            );
        }
    }

    #[test]
    fn test_default_ids_are_unique() {
        let dishes = default_dishes();
        let mut ids: Vec<&str> = dishes.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), dishes.len());
    }
}
