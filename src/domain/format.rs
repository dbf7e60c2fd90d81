//! Plain-text rendering of a plan and its shopping list.
//!
//! Pure functions, no I/O. Delivery adapters send the returned string as-is.

use crate::domain::entities::{GroupedShoppingList, MealEntry, WeeklyPlan};
use regex::Regex;
use std::sync::LazyLock;

pub const EMPTY_LIST_NOTICE: &str = "The shopping list is empty.";
const NO_MEALS_NOTICE: &str = "No meals planned.";
const NO_INSTRUCTIONS: &str = "No instructions available.";
const RULE: &str = "================================";

/// Sentence end: punctuation, whitespace, then something that starts a new sentence.
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([.?!])\s+(["A-Z0-9])"#).expect("static sentence regex")
});

fn dish_or_na(meal: &MealEntry) -> &str {
    if meal.has_blank_dish() { "N/A" } else { meal.dish.trim() }
}

/// Split an instruction block into one bullet line per sentence.
pub fn instructions_by_sentence(instructions: Option<&str>) -> String {
    let text = instructions.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return format!("        - {}", NO_INSTRUCTIONS);
    }
    let split = SENTENCE_BREAK.replace_all(text, "$1\n$2");
    split
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("        - {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full report: day-by-day meals, ingredients per dish, then numbered totals.
pub fn format(plan: &WeeklyPlan, grouped: &GroupedShoppingList) -> String {
    let mut out = String::from("🍽️ WEEKLY MEAL PLAN 🍽️\n\n");

    if plan.is_empty() {
        out.push_str(&format!("{}\n", NO_MEALS_NOTICE));
    }
    for (day, day_plan) in plan.days() {
        out.push_str(&format!("{}\n📅 {}:\n", RULE, day));
        for (slot, meal) in day_plan.meals() {
            out.push_str(&format!("   - {} Dish: {}\n", slot, dish_or_na(meal)));
            out.push_str("     * Instructions:\n");
            out.push_str(&instructions_by_sentence(meal.instructions.as_deref()));
            out.push('\n');
        }
    }
    if !plan.is_empty() {
        out.push_str(&format!("{}\n", RULE));
    }

    out.push_str("\n🛒 FINAL SHOPPING LIST 🛒\n");
    if grouped.is_empty() {
        out.push_str(&format!("{}\n", EMPTY_LIST_NOTICE));
        return out;
    }

    for (dish, ingredients) in grouped.iter() {
        out.push_str(&format!("\n🍜 {} Ingredients:\n", dish));
        for item in ingredients {
            out.push_str(&format!("  - {}\n", item));
        }
    }

    out.push_str("\n--- CONSOLIDATED TOTALS (For Shopping Cart) ---\n");
    out.push_str(&numbered_totals(grouped));
    out
}

/// Short chat variant: one line per day and the numbered totals.
pub fn format_compact(plan: &WeeklyPlan, grouped: &GroupedShoppingList) -> String {
    let mut out = String::from("🍽️ WEEKLY MEAL PLAN 🍽️\n");
    if plan.is_empty() {
        out.push_str(&format!("{}\n", NO_MEALS_NOTICE));
    }
    for (day, day_plan) in plan.days() {
        out.push_str(&format!(
            "{}: B: {} | D: {}\n",
            day,
            dish_or_na(&day_plan.breakfast),
            dish_or_na(&day_plan.dinner)
        ));
    }

    out.push_str("\n🛒 CONSOLIDATED SHOPPING LIST 🛒\n");
    if grouped.is_empty() {
        out.push_str(&format!("{}\n", EMPTY_LIST_NOTICE));
    } else {
        out.push_str(&numbered_totals(grouped));
    }
    out
}

fn numbered_totals(grouped: &GroupedShoppingList) -> String {
    grouped
        .consolidated_total()
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}\n", i + 1, item))
        .collect()
}
