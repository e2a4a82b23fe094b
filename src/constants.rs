pub mod ttl {
    pub const WEEK: u64 = 604_800;

    pub const HOUR: u64 = 3_600;

    pub const SIX_HOURS: u64 = 21_600;

    pub const CATEGORIES: u64 = WEEK;
    pub const GROUPED_INGREDIENTS: u64 = WEEK;
    pub const TAGS: u64 = WEEK;
    pub const RECIPE_DETAIL: u64 = WEEK;
    pub const FILTERED_LISTING: u64 = WEEK;
    pub const MATCH_COUNT: u64 = WEEK;

    pub const PLAIN_LISTING: u64 = HOUR;
    pub const PLAIN_COUNT: u64 = HOUR;
    pub const SAVED_RECIPES: u64 = HOUR;
    pub const POPULAR_RECIPES: u64 = HOUR;

    pub const POPULAR_INGREDIENTS: u64 = SIX_HOURS;
}

pub mod limits {
    pub const MIN_PAGE_SIZE: u64 = 1;

    pub const MAX_PAGE_SIZE: u64 = 40;

    pub const DEFAULT_PAGE_SIZE: u64 = 20;

    pub const MAX_OFFSET: u64 = 10_000;

    pub const MAX_POPULAR: u64 = 50;

    pub const MAX_LANGUAGE_LEN: usize = 16;
}

/// Key prefixes, one per cached resource kind.
pub mod prefix {
    pub const RECIPES: &str = "recipes:";
    pub const RECIPE: &str = "recipe:";
    pub const POPULAR_RECIPES: &str = "popular_recipes:";
    pub const RECIPE_COUNT: &str = "recipe_count:";
    pub const CATEGORIES: &str = "categories:";
    pub const GROUPED_INGREDIENTS: &str = "grouped_ingredients:";
    pub const TAGS: &str = "tags:";
    pub const INGREDIENT_STATS: &str = "ingredient_stats:";
    pub const SAVED_RECIPES: &str = "saved_recipes:";
}

pub const DEFAULT_LANGUAGE: &str = "en";
