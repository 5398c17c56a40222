use rust_decimal::Decimal;

use crate::models::{Category, Product};

/// Current products and their live stock levels.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The store's opening shelf.
    pub fn seeded() -> Self {
        Self::new(vec![
            product(
                "1",
                "Macallan 12 Year Old Double Cask",
                Category::Whiskey,
                Decimal::new(8599, 2),
                12,
                "WH-MAC-12",
                "A rich and complex highland single malt scotch whiskey.",
                "https://picsum.photos/seed/whiskey1/400/400",
            ),
            product(
                "2",
                "Grey Goose Original Vodka",
                Category::Vodka,
                Decimal::new(3450, 2),
                24,
                "VO-GRY-ORG",
                "Premium French vodka made from winter wheat and natural spring water.",
                "https://picsum.photos/seed/vodka1/400/400",
            ),
            product(
                "3",
                "Veuve Clicquot Yellow Label",
                Category::Wine,
                Decimal::new(5999, 2),
                8,
                "WI-VEU-YEL",
                "Classic non-vintage champagne known for its strength and silkiness.",
                "https://picsum.photos/seed/wine1/400/400",
            ),
            product(
                "4",
                "Don Julio 1942 Añejo",
                Category::Tequila,
                Decimal::new(18900, 2),
                4,
                "TE-DON-42",
                "An ultra-premium tequila aged for at least two and a half years.",
                "https://picsum.photos/seed/tequila1/400/400",
            ),
            product(
                "5",
                "Hendricks Gin",
                Category::Gin,
                Decimal::new(3999, 2),
                15,
                "GI-HEN-DR",
                "Distilled in Scotland with infusions of cucumber and rose petals.",
                "https://picsum.photos/seed/gin1/400/400",
            ),
            product(
                "6",
                "Lagavulin 16 Year Old",
                Category::Whiskey,
                Decimal::new(11000, 2),
                6,
                "WH-LAG-16",
                "The definitive Islay malt, intense, smoky, and rich.",
                "https://picsum.photos/seed/whiskey2/400/400",
            ),
            product(
                "7",
                "Château Margaux 2018",
                Category::Wine,
                Decimal::new(85000, 2),
                2,
                "WI-MAR-18",
                "One of the most prestigious wines in the world from the Bordeaux region.",
                "https://picsum.photos/seed/wine2/400/400",
            ),
        ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Case-insensitive match on name or SKU, optionally within one category.
    pub fn search(&self, query: &str, category: Option<Category>) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.sku.to_lowercase().contains(&needle)
            })
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect()
    }

    pub fn low_stock(&self, threshold: u32) -> Vec<&Product> {
        self.products.iter().filter(|p| p.stock < threshold).collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    category: Category,
    price: Decimal,
    stock: u32,
    sku: &str,
    description: &str,
    image: &str,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price,
        stock,
        sku: sku.to_string(),
        description: description.to_string(),
        image: image.to_string(),
    }
}
