//! Static lookup tables for the manual product form
//!
//! Brands, grouped categories, colors, materials, seasons and genders offered by
//! the form, plus the size grid which depends on category and gender.

/// Brands offered in the manual form
pub const BRANDS: &[&str] = &[
    "Nike",
    "Adidas",
    "Puma",
    "Lacoste",
    "Hugo Boss",
    "Calvin Klein",
    "Emporio Armani EA7",
    "Ralph Lauren",
    "Tommy Hilfiger",
    "The North Face",
    "Champion",
    "Fila",
    "New Balance",
    "Under Armour",
    "Asics",
    "Reebok",
    "Vans",
    "Converse",
    "Timberland",
    "Columbia",
    "Ellesse",
    "Kappa",
    "Sergio Tacchini",
    "Fred Perry",
    "Gant",
    "Mizuno",
    "Saucony",
    "Le Coq Sportif",
];

/// A labelled group of category slugs
pub struct CategoryGroup {
    pub label: &'static str,
    pub categories: &'static [&'static str],
}

pub const CATEGORY_GROUPS: &[CategoryGroup] = &[
    CategoryGroup {
        label: "Chaussures",
        categories: &[
            "chaussures-running",
            "chaussures-lifestyle",
            "chaussures-basketball",
            "chaussures-football",
            "chaussures-tennis",
            "chaussures-training",
        ],
    },
    CategoryGroup {
        label: "Vêtements",
        categories: &[
            "survetements",
            "sweats",
            "tshirts",
            "polos",
            "pantalons",
            "shorts",
            "vestes",
            "doudounes",
            "chemises",
            "robes",
            "jupes",
            "leggings",
        ],
    },
    CategoryGroup {
        label: "Accessoires",
        categories: &[
            "sacs",
            "casquettes",
            "bonnets",
            "echarpes",
            "gants",
            "chaussettes",
            "ceintures",
        ],
    },
];

/// Named color with its swatch value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOption {
    pub name: &'static str,
    pub hex: &'static str,
}

impl ColorOption {
    /// Swatch as RGB components
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }
}

pub const COLORS: &[ColorOption] = &[
    ColorOption { name: "Noir", hex: "#000000" },
    ColorOption { name: "Blanc", hex: "#FFFFFF" },
    ColorOption { name: "Gris", hex: "#808080" },
    ColorOption { name: "Argent", hex: "#C0C0C0" },
    ColorOption { name: "Or", hex: "#FFD700" },
    ColorOption { name: "Marine", hex: "#000080" },
    ColorOption { name: "Bleu", hex: "#0000FF" },
    ColorOption { name: "Bleu Ciel", hex: "#87CEEB" },
    ColorOption { name: "Rouge", hex: "#FF0000" },
    ColorOption { name: "Bordeaux", hex: "#8B0000" },
    ColorOption { name: "Orange", hex: "#FFA500" },
    ColorOption { name: "Jaune", hex: "#FFFF00" },
    ColorOption { name: "Vert", hex: "#008000" },
    ColorOption { name: "Vert Clair", hex: "#90EE90" },
    ColorOption { name: "Kaki", hex: "#556B2F" },
    ColorOption { name: "Rose", hex: "#FFC0CB" },
    ColorOption { name: "Fuchsia", hex: "#FF1493" },
    ColorOption { name: "Violet", hex: "#800080" },
    ColorOption { name: "Marron", hex: "#8B4513" },
    ColorOption { name: "Beige", hex: "#F5DEB3" },
];

pub const MATERIALS: &[&str] = &[
    "100% Coton",
    "Polyester",
    "Coton/Polyester",
    "Mesh respirant",
    "Cuir",
    "Synthétique",
    "Nylon",
    "Laine",
    "Élasthanne",
    "Gore-Tex",
];

pub const SEASONS: &[&str] = &["Printemps/Été", "Automne/Hiver", "Toutes saisons"];

pub const GENDERS: &[&str] = &["homme", "femme", "enfant", "bebe", "unisexe"];

const APPAREL_BABY: &[&str] = &["3M", "6M", "9M", "12M", "18M", "24M", "36M"];
const APPAREL_ADULT: &[&str] = &["XXS", "XS", "S", "M", "L", "XL", "XXL", "3XL"];

/// Every category slug, in display order
pub fn all_categories() -> impl Iterator<Item = &'static str> {
    CATEGORY_GROUPS
        .iter()
        .flat_map(|g| g.categories.iter().copied())
}

pub fn shoe_categories() -> &'static [&'static str] {
    CATEGORY_GROUPS[0].categories
}

pub fn is_shoe_category(category: &str) -> bool {
    category.contains("chaussures")
}

/// Size options for a category/gender pair
///
/// Shoe categories get numeric ranges, everything else the apparel grid.
/// An unknown gender falls back to the adult range.
pub fn sizes_for(category: &str, gender: &str) -> Vec<String> {
    if is_shoe_category(category) {
        let (from, to) = match gender {
            "homme" => (39, 48),
            "femme" => (35, 42),
            "enfant" => (28, 38),
            "bebe" => (16, 27),
            _ => (36, 46),
        };
        return (from..=to).map(|n: u32| n.to_string()).collect();
    }

    match gender {
        "enfant" => (4..=16).step_by(2).map(|n: u32| format!("{n}A")).collect(),
        "bebe" => APPAREL_BABY.iter().map(|s| s.to_string()).collect(),
        _ => APPAREL_ADULT.iter().map(|s| s.to_string()).collect(),
    }
}

/// Percentage off, only when `old_price` is strictly above `price`
pub fn discount_percent(price: f64, old_price: Option<f64>) -> Option<i64> {
    let old = old_price?;
    if old <= price || old <= 0.0 {
        return None;
    }
    Some(((1.0 - price / old) * 100.0).round() as i64)
}

/// EAN-8 or EAN-13: digits only, length 8 or 13
pub fn is_valid_ean(code: &str) -> bool {
    matches!(code.len(), 8 | 13) && code.bytes().all(|b| b.is_ascii_digit())
}

/// Human label for a gender slug
pub fn gender_label(gender: &str) -> &str {
    match gender {
        "homme" => "Homme",
        "femme" => "Femme",
        "enfant" => "Enfant",
        "bebe" => "Bébé",
        "unisexe" => "Unisexe",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shoe_sizes_depend_on_gender() {
        let men = sizes_for("chaussures-running", "homme");
        assert_eq!(men.first().map(String::as_str), Some("39"));
        assert_eq!(men.last().map(String::as_str), Some("48"));
        assert_eq!(men.len(), 10);

        assert_eq!(
            sizes_for("chaussures-running", "femme"),
            vec!["35", "36", "37", "38", "39", "40", "41", "42"]
        );

        let kids = sizes_for("chaussures-football", "enfant");
        assert_eq!(kids.first().map(String::as_str), Some("28"));
        assert_eq!(kids.last().map(String::as_str), Some("38"));
        assert_eq!(kids.len(), 11);

        let baby = sizes_for("chaussures-lifestyle", "bebe");
        assert_eq!(baby.first().map(String::as_str), Some("16"));
        assert_eq!(baby.last().map(String::as_str), Some("27"));

        let other = sizes_for("chaussures-tennis", "unisexe");
        assert_eq!(other.first().map(String::as_str), Some("36"));
        assert_eq!(other.last().map(String::as_str), Some("46"));
    }

    #[test]
    fn apparel_sizes() {
        assert_eq!(
            sizes_for("sweats", "enfant"),
            vec!["4A", "6A", "8A", "10A", "12A", "14A", "16A"]
        );
        assert_eq!(sizes_for("tshirts", "bebe")[0], "3M");
        assert_eq!(
            sizes_for("vestes", "femme"),
            vec!["XXS", "XS", "S", "M", "L", "XL", "XXL", "3XL"]
        );
    }

    #[test]
    fn discount_only_when_old_price_is_higher() {
        assert_eq!(discount_percent(80.0, Some(100.0)), Some(20));
        assert_eq!(discount_percent(59.99, Some(69.99)), Some(14));
        assert_eq!(discount_percent(100.0, Some(100.0)), None);
        assert_eq!(discount_percent(120.0, Some(100.0)), None);
        assert_eq!(discount_percent(50.0, None), None);
    }

    #[test]
    fn ean_validation() {
        assert!(is_valid_ean("3614270357637"));
        assert!(is_valid_ean("12345670"));
        assert!(!is_valid_ean("36142703576"));
        assert!(!is_valid_ean("36142703576AB"));
    }

    #[test]
    fn color_hex_parses() {
        let gold = COLORS.iter().find(|c| c.name == "Or").unwrap();
        assert_eq!(gold.rgb(), (0xFF, 0xD7, 0x00));
        assert_eq!(all_categories().count(), 25);
    }
}
