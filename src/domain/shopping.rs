//! Shopping list aggregation. Turns a weekly plan into ingredients grouped by dish.
//!
//! Stateless and infallible: entries without a dish name or without any
//! non-blank ingredient contribute nothing.
//! Matching is exact (case and whitespace sensitive); sorting comes from the
//! `BTreeMap`/`BTreeSet` storage, so output depends only on string content.

use crate::domain::entities::{GroupedShoppingList, WeeklyPlan};
use tracing::debug;

/// Build the dish-grouped shopping list for `plan`.
///
/// The same dish on several days unions its ingredient sets.
pub fn aggregate(plan: &WeeklyPlan) -> GroupedShoppingList {
    let mut list = GroupedShoppingList::new();

    for (day, slot, meal) in plan.meals() {
        if meal.has_blank_dish() {
            debug!(day = %day, slot = %slot, "skipping meal without a dish name");
            continue;
        }
        let ingredients: Vec<&String> = meal
            .ingredients
            .iter()
            .filter(|i| !i.trim().is_empty())
            .collect();
        if ingredients.is_empty() {
            debug!(day = %day, slot = %slot, dish = %meal.dish, "skipping meal without ingredients");
            continue;
        }
        list.merge(&meal.dish, ingredients.into_iter().cloned());
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DayPlan, MealEntry, Weekday};

    fn plan_of(days: Vec<(Weekday, DayPlan)>) -> WeeklyPlan {
        days.into_iter().collect()
    }

    fn items(list: &GroupedShoppingList, dish: &str) -> Vec<String> {
        list.ingredients_for(dish)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_same_dish_across_days_is_unioned() {
        let plan = plan_of(vec![
            (
                Weekday::Monday,
                DayPlan::new(
                    MealEntry::new("Sandwich", &["bread", "ham"]),
                    MealEntry::new("ABC Soup", &["carrot", "potato"]),
                ),
            ),
            (
                Weekday::Wednesday,
                DayPlan::new(
                    MealEntry::new("Sandwich", &["ham", "cheese"]),
                    MealEntry::new("Lotus Root Soup", &["lotus root"]),
                ),
            ),
        ]);

        let list = aggregate(&plan);
        assert_eq!(items(&list, "Sandwich"), vec!["bread", "cheese", "ham"]);
        assert_eq!(list.dish_count(), 3);
    }

    #[test]
    fn test_sandwich_twice_consolidates_to_three_items() {
        let plan = plan_of(vec![
            (
                Weekday::Monday,
                DayPlan::new(MealEntry::new("Sandwich", &["bread", "ham"]), MealEntry::new("", &[])),
            ),
            (
                Weekday::Wednesday,
                DayPlan::new(MealEntry::new("Sandwich", &["ham", "cheese"]), MealEntry::new("", &[])),
            ),
        ]);

        let list = aggregate(&plan);
        assert_eq!(list.dish_count(), 1);
        let total: Vec<String> = list.consolidated_total().into_iter().collect();
        assert_eq!(total, vec!["bread", "cheese", "ham"]);
    }

    #[test]
    fn test_blank_dish_contributes_nothing() {
        let plan = plan_of(vec![(
            Weekday::Friday,
            DayPlan::new(
                MealEntry::new("  ", &["flour", "sugar"]),
                MealEntry::new("Steamed Fish", &["fish"]),
            ),
        )]);

        let list = aggregate(&plan);
        assert_eq!(list.dish_count(), 1);
        assert!(!list.consolidated_total().contains("flour"));
    }

    #[test]
    fn test_empty_plan_yields_empty_list() {
        let list = aggregate(&WeeklyPlan::new());
        assert!(list.is_empty());
        assert!(list.consolidated_total().is_empty());
    }

    #[test]
    fn test_duplicates_within_entry_collapse() {
        let plan = plan_of(vec![(
            Weekday::Tuesday,
            DayPlan::new(
                MealEntry::new("Congee", &["rice", "rice", "ginger", ""]),
                MealEntry::new("Stir-fried Kailan", &[]),
            ),
        )]);

        let list = aggregate(&plan);
        assert_eq!(items(&list, "Congee"), vec!["ginger", "rice"]);
        assert!(list.ingredients_for("Stir-fried Kailan").is_none());
        assert_eq!(list.dish_count(), 1);
    }

    #[test]
    fn test_entries_without_usable_ingredients_contribute_nothing() {
        let plan = plan_of(vec![(
            Weekday::Monday,
            DayPlan::new(MealEntry::new("Toast", &[]), MealEntry::new("Soup", &["", "  "])),
        )]);

        let list = aggregate(&plan);
        assert!(list.is_empty());
        assert!(list.consolidated_total().is_empty());
    }

    #[test]
    fn test_empty_entry_leaves_existing_dish_unchanged() {
        let with_toast = plan_of(vec![(
            Weekday::Monday,
            DayPlan::new(
                MealEntry::new("Toast", &["bread", "butter"]),
                MealEntry::new("ABC Soup", &["carrot"]),
            ),
        )]);
        let mut with_empty_toast = with_toast.clone();
        with_empty_toast.insert(
            Weekday::Tuesday,
            DayPlan::new(MealEntry::new("Toast", &[""]), MealEntry::new("Congee", &[])),
        );

        assert_eq!(aggregate(&with_toast), aggregate(&with_empty_toast));
    }

    #[test]
    fn test_matching_is_exact() {
        let plan = plan_of(vec![(
            Weekday::Sunday,
            DayPlan::new(
                MealEntry::new("Toast", &["Butter", "butter", " butter"]),
                MealEntry::new("toast", &["jam"]),
            ),
        )]);

        let list = aggregate(&plan);
        assert_eq!(list.dish_count(), 2);
        assert_eq!(items(&list, "Toast").len(), 3);
    }

    #[test]
    fn test_aggregate_is_idempotent_and_order_independent() {
        let monday = DayPlan::new(
            MealEntry::new("Kaya Toast", &["kaya", "bread", "butter"]),
            MealEntry::new("Old Cucumber Soup", &["old cucumber", "pork ribs"]),
        );
        let thursday = DayPlan::new(
            MealEntry::new("Kaya Toast", &["eggs", "bread"]),
            MealEntry::new("Steamed Fish", &["fish", "ginger"]),
        );

        let a = plan_of(vec![(Weekday::Monday, monday.clone()), (Weekday::Thursday, thursday.clone())]);
        let b = plan_of(vec![(Weekday::Thursday, thursday), (Weekday::Monday, monday)]);

        assert_eq!(aggregate(&a), aggregate(&a));
        assert_eq!(aggregate(&a), aggregate(&b));
    }
}
