//! Domain entities. Pure data structures for the core business.
//!
//! No backend/HTTP types here. Adapters parse wire payloads into these.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Day of the planned week. Ordered Monday first; serialized by English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// The fixed day set, in plan order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two meals planned per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MealSlot {
    Breakfast,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 2] = [MealSlot::Breakfast, MealSlot::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single meal: dish name, its ingredients, optional cooking instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    pub dish: String,
    /// May repeat items; duplicates are collapsed when the shopping list is built.
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl MealEntry {
    pub fn new(dish: impl Into<String>, ingredients: &[&str]) -> Self {
        Self {
            dish: dish.into(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// True when the dish name is empty or whitespace only.
    pub fn has_blank_dish(&self) -> bool {
        self.dish.trim().is_empty()
    }
}

/// Both meals of one day. Wire keys are `"Breakfast"` and `"Dinner"`, both mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    #[serde(rename = "Breakfast")]
    pub breakfast: MealEntry,
    #[serde(rename = "Dinner")]
    pub dinner: MealEntry,
}

impl DayPlan {
    pub fn new(breakfast: MealEntry, dinner: MealEntry) -> Self {
        Self { breakfast, dinner }
    }

    pub fn meal(&self, slot: MealSlot) -> &MealEntry {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Dinner => &self.dinner,
        }
    }

    /// Meals in slot order (Breakfast, then Dinner).
    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &MealEntry)> {
        MealSlot::ALL.into_iter().map(move |slot| (slot, self.meal(slot)))
    }
}

/// The week's plan, ordered Monday first.
///
/// A plan accepted from a generation backend always holds all seven days
/// (see `WeeklyPlan::missing_days`); the type itself allows fewer so that
/// partial plans can still be aggregated and rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyPlan {
    days: BTreeMap<Weekday, DayPlan>,
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the plan for `day`.
    pub fn insert(&mut self, day: Weekday, plan: DayPlan) -> &mut Self {
        self.days.insert(day, plan);
        self
    }

    pub fn day(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.get(&day)
    }

    /// Planned days in week order.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DayPlan)> {
        self.days.iter().map(|(day, plan)| (*day, plan))
    }

    /// Every meal of the week, in (day, slot) order.
    pub fn meals(&self) -> impl Iterator<Item = (Weekday, MealSlot, &MealEntry)> {
        self.days()
            .flat_map(|(day, plan)| plan.meals().map(move |(slot, meal)| (day, slot, meal)))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days of the fixed week set that have no plan.
    pub fn missing_days(&self) -> Vec<Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(|d| !self.days.contains_key(d))
            .collect()
    }
}

impl FromIterator<(Weekday, DayPlan)> for WeeklyPlan {
    fn from_iter<I: IntoIterator<Item = (Weekday, DayPlan)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Shopping list grouped by dish. Keys are global across the week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedShoppingList {
    dishes: BTreeMap<String, BTreeSet<String>>,
}

impl GroupedShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `ingredients` into the set stored for `dish`.
    ///
    /// No-op when `ingredients` is empty: a dish is only listed once it has something to buy.
    pub fn merge<I, S>(&mut self, dish: &str, ingredients: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items = ingredients.into_iter().map(Into::into).peekable();
        if items.peek().is_none() {
            return;
        }
        self.dishes.entry(dish.to_string()).or_default().extend(items);
    }

    pub fn ingredients_for(&self, dish: &str) -> Option<&BTreeSet<String>> {
        self.dishes.get(dish)
    }

    /// Dishes and their ingredients, sorted by dish name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.dishes.iter().map(|(dish, set)| (dish.as_str(), set))
    }

    pub fn dish_count(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    /// Flat sorted union of every ingredient across all dishes.
    pub fn consolidated_total(&self) -> BTreeSet<String> {
        self.dishes.values().flatten().cloned().collect()
    }
}
