mod common;

use common::*;
use pantry::services::RecipeQuery;

fn english() -> RecipeQuery {
    RecipeQuery {
        language: "en".to_string(),
        ..RecipeQuery::default()
    }
}

fn with_ingredients(ids: &[i32]) -> RecipeQuery {
    RecipeQuery {
        ingredient_ids: ids.to_vec(),
        ..english()
    }
}

/// A: [1,2,3,4], B: [1,2], C: [5], D: [1, unmatched line].
async fn seed_match_scenario(fx: &Fixture) {
    let store = fx.store();
    ingredients_upto(store, 5).await;
    recipe_with(store, 1, "Recipe A", &[1, 2, 3, 4]).await;
    recipe_with(store, 2, "Recipe B", &[1, 2]).await;
    recipe_with(store, 3, "Recipe C", &[5]).await;
    recipe(store, 4, "Recipe D", "en").await;
    lines(store, 4, &[Some(1), None]).await;
}

#[tokio::test]
async fn test_scored_listing_ranks_by_coverage() {
    let fx = fixture().await;
    seed_match_scenario(&fx).await;

    let page = fx
        .state
        .recipes
        .list_recipes(&with_ingredients(&[1, 2, 3]))
        .await
        .unwrap();

    let ids: Vec<i32> = page.recipes.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![2, 4, 1], "C shares no ingredient and is left out");
    assert!(!page.has_more);

    let a = &page.recipes[2];
    assert_eq!(a.match_percentage, 75);
    let missing: Vec<Option<i32>> = a
        .missing_ingredients
        .iter()
        .map(|l| l.ingredient_id)
        .collect();
    assert_eq!(missing, vec![Some(4)]);

    let b = &page.recipes[0];
    assert_eq!(b.match_percentage, 100);
    assert!(b.missing_ingredients.is_empty());

    let d = &page.recipes[1];
    assert_eq!(d.match_percentage, 100);
    assert_eq!(d.detail.ingredients.len(), 2);
    assert!(d.missing_ingredients.is_empty());
}

#[tokio::test]
async fn test_ingredient_total_counts_only_perfect_matches() {
    let fx = fixture().await;
    seed_match_scenario(&fx).await;

    let page = fx
        .state
        .recipes
        .list_recipes(&with_ingredients(&[1, 2, 3]))
        .await
        .unwrap();

    // B and D are complete, A is browsable but not counted.
    assert_eq!(page.total, 2);
    assert!(page.total <= page.recipes.len() as u64);
    assert!(page.recipes.iter().all(|r| r.match_percentage <= 100));
}

#[tokio::test]
async fn test_unscored_listing_is_newest_first() {
    let fx = fixture().await;
    seed_match_scenario(&fx).await;

    let page = fx.state.recipes.list_recipes(&english()).await.unwrap();

    let ids: Vec<i32> = page.recipes.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);
    assert_eq!(page.total, 4);
    for card in &page.recipes {
        assert_eq!(card.match_percentage, 0);
    }
    assert_eq!(page.recipes[3].missing_ingredients.len(), 4);
}

#[tokio::test]
async fn test_has_more_uses_one_extra_row() {
    let fx = fixture().await;
    for id in 1..=21 {
        recipe(fx.store(), id, &format!("Recipe {id}"), "en").await;
    }

    let first = fx.state.recipes.list_recipes(&english()).await.unwrap();
    assert_eq!(first.recipes.len(), 20);
    assert!(first.has_more);
    assert_eq!(first.total, 21);
    assert_eq!(first.recipes[0].id(), 21);

    let second = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery {
            offset: Some(20),
            ..english()
        })
        .await
        .unwrap();
    assert_eq!(second.recipes.len(), 1);
    assert!(!second.has_more);
    assert_eq!(second.recipes[0].id(), 1);
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let fx = fixture().await;
    for id in 1..=45 {
        recipe(fx.store(), id, &format!("Recipe {id}"), "en").await;
    }

    let page = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery {
            limit: Some(1_000),
            ..english()
        })
        .await
        .unwrap();
    assert_eq!(page.recipes.len(), 40);
    assert!(page.has_more);
}

#[tokio::test]
async fn test_language_filter() {
    let fx = fixture().await;
    recipe(fx.store(), 1, "Borscht", "ru").await;
    recipe(fx.store(), 2, "Pancakes", "en").await;

    let page = fx.state.recipes.list_recipes(&english()).await.unwrap();
    let ids: Vec<i32> = page.recipes.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_tag_axes_or_within_and_across() {
    let fx = fixture().await;
    let store = fx.store();
    diet(store, 1, "Vegan").await;
    diet(store, 2, "Vegetarian").await;
    kitchen(store, 1, "Italian").await;
    kitchen(store, 2, "French").await;
    meal_type(store, 1, "Dinner").await;

    recipe(store, 1, "Vegan Lasagne", "en").await;
    link_diet(store, 1, 1).await;
    link_kitchen(store, 1, 1).await;
    link_meal_type(store, 1, 1).await;

    recipe(store, 2, "Veggie Omelette", "en").await;
    link_diet(store, 2, 2).await;

    recipe(store, 3, "Vegan Ratatouille", "en").await;
    link_diet(store, 3, 1).await;
    link_kitchen(store, 3, 2).await;

    recipe(store, 4, "Steak", "en").await;

    let any_diet = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery {
            diet_tag_ids: vec![2, 1],
            ..english()
        })
        .await
        .unwrap();
    let ids: Vec<i32> = any_diet.recipes.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(any_diet.total, 3);

    let diet_and_kitchen = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery {
            diet_tag_ids: vec![1, 2],
            kitchen_ids: vec![1],
            ..english()
        })
        .await
        .unwrap();
    let ids: Vec<i32> = diet_and_kitchen.recipes.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![1]);

    let lasagne = &diet_and_kitchen.recipes[0].detail;
    assert_eq!(lasagne.diet_tags.len(), 1);
    assert_eq!(lasagne.diet_tags[0].name, "Vegan");
    assert_eq!(lasagne.kitchens[0].name, "Italian");
    assert_eq!(lasagne.meal_types[0].name, "Dinner");
}

#[tokio::test]
async fn test_search_falls_back_to_substring() {
    let fx = fixture().await;
    let store = fx.store();
    ingredients_upto(store, 2).await;
    recipe_with(store, 1, "Tomato Soup", &[1]).await;
    recipe_with(store, 2, "Pasta Bake", &[1, 2]).await;
    recipe(store, 3, "50% Less Sugar Cake", "en").await;

    let page = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery {
            search: Some("  SOUP ".into()),
            ..english()
        })
        .await
        .unwrap();
    let ids: Vec<i32> = page.recipes.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(page.total, 1);

    let scored = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery {
            search: Some("pasta".into()),
            ..with_ingredients(&[1])
        })
        .await
        .unwrap();
    assert_eq!(scored.recipes.len(), 1);
    assert_eq!(scored.recipes[0].match_percentage, 50);
    assert_eq!(scored.total, 0);

    let literal = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery {
            search: Some("50%".into()),
            ..english()
        })
        .await
        .unwrap();
    assert_eq!(literal.recipes.len(), 1);
    assert_eq!(literal.recipes[0].id(), 3);
}

#[tokio::test]
async fn test_missing_language_fails_before_io() {
    let fx = fixture().await;

    let err = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(!err.is_transient());
    assert!(fx.cache.keys().await.is_empty());
}

#[tokio::test]
async fn test_language_with_key_delimiter_is_rejected() {
    let fx = fixture().await;
    recipe(fx.store(), 1, "Pancakes", "en").await;

    let err = fx
        .state
        .recipes
        .list_recipes(&RecipeQuery {
            language: "20:0".to_string(),
            kitchen_ids: vec![5],
            ..RecipeQuery::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = fx.state.recipes.popular_recipes("en:10", 5).await.unwrap_err();
    assert!(err.is_validation());
    assert!(fx.cache.keys().await.is_empty());
}

#[tokio::test]
async fn test_search_matches_cyrillic_titles() {
    let fx = fixture().await;
    let store = fx.store();
    recipe(store, 1, "Борщ", "ru").await;
    recipe(store, 2, "Щи из квашеной капусты", "ru").await;
    recipe(store, 3, "Блины", "ru").await;

    let russian = |search: &str| RecipeQuery {
        language: "ru".to_string(),
        search: Some(search.to_string()),
        ..RecipeQuery::default()
    };

    for text in ["Борщ", "борщ", "БОРЩ", "орщ"] {
        let page = fx.state.recipes.list_recipes(&russian(text)).await.unwrap();
        let ids: Vec<i32> = page.recipes.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![1], "search {text:?}");
        assert_eq!(page.total, 1);
    }

    let page = fx
        .state
        .recipes
        .list_recipes(&russian("квашеной"))
        .await
        .unwrap();
    let ids: Vec<i32> = page.recipes.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![2]);
}

/// Statements needed for one cold scored page with `recipes` rows.
async fn statements_for_page(recipes: i32) -> usize {
    let (fx, statements) = counting_fixture().await;
    let store = fx.store();
    ingredients_upto(store, 3).await;
    diet(store, 1, "Vegan").await;
    kitchen(store, 1, "Thai").await;
    for id in 1..=recipes {
        recipe_with(store, id, &format!("Recipe {id}"), &[1, 2, 3]).await;
        lines(store, id, &[None]).await;
        link_diet(store, id, 1).await;
        link_kitchen(store, id, 1).await;
    }

    statements.store(0, std::sync::atomic::Ordering::SeqCst);
    let page = fx
        .state
        .recipes
        .list_recipes(&with_ingredients(&[1, 2]))
        .await
        .unwrap();
    assert_eq!(page.recipes.len(), usize::try_from(recipes).unwrap());
    assert!(page.recipes.iter().all(|r| r.detail.diet_tags.len() == 1));
    statements.load(std::sync::atomic::Ordering::SeqCst)
}

#[tokio::test]
async fn test_page_cost_does_not_grow_with_rows() {
    let small = statements_for_page(2).await;
    let full = statements_for_page(20).await;
    assert!(small > 0);
    assert_eq!(small, full);
}
