//! Static category catalog shared by transactions, budgets and charts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    /// Income-only categories never get a spending budget
    pub income_only: bool,
}

const CATALOG: [CategoryInfo; 9] = [
    CategoryInfo { id: "food", name: "Food", color: "hsl(var(--chart-1))", icon: "utensils-crossed", income_only: false },
    CategoryInfo { id: "transport", name: "Transport", color: "hsl(var(--chart-2))", icon: "car", income_only: false },
    CategoryInfo { id: "entertainment", name: "Entertainment", color: "hsl(var(--chart-3))", icon: "ticket", income_only: false },
    CategoryInfo { id: "housing", name: "Housing", color: "hsl(var(--chart-4))", icon: "home", income_only: false },
    CategoryInfo { id: "utilities", name: "Utilities", color: "hsl(var(--chart-5))", icon: "zap", income_only: false },
    CategoryInfo { id: "health", name: "Health", color: "hsl(340 75% 55%)", icon: "heart-pulse", income_only: false },
    CategoryInfo { id: "shopping", name: "Shopping", color: "hsl(280 65% 60%)", icon: "shopping-bag", income_only: false },
    CategoryInfo { id: "salary", name: "Salary", color: "hsl(160 60% 45%)", icon: "landmark", income_only: true },
    CategoryInfo { id: "other", name: "Other", color: "hsl(0 0% 63.9%)", icon: "sprout", income_only: false },
];

/// Every category in display order
pub fn all() -> &'static [CategoryInfo] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static CategoryInfo> {
    CATALOG.iter().find(|category| category.id == id)
}

pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}

/// Display name, or the raw id for categories outside the catalog
pub fn display_name(id: &str) -> String {
    find(id).map(|c| c.name.to_string()).unwrap_or_else(|| id.to_string())
}

/// Categories a budget may be set for
pub fn budgetable() -> impl Iterator<Item = &'static CategoryInfo> {
    CATALOG.iter().filter(|category| !category.income_only)
}

/// Position in the catalog; unknown ids sort last
pub fn order(id: &str) -> usize {
    CATALOG.iter().position(|category| category.id == id).unwrap_or(CATALOG.len())
}
