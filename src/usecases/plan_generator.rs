//! Plan generation: prompt construction, one backend call, strict parsing.
//!
//! - Attaches the weekly plan schema as output constraint
//! - Issues exactly one request per `generate` call (no retries)
//! - Accepts only a complete seven-day plan; anything else is a `GenerationFailure`

use crate::domain::{GenerationFailure, Weekday, WeeklyPlan, plan_schema};
use crate::ports::{GenerationBackend, GenerationRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_HOUSEHOLD_SIZE: u32 = 5;

/// Fixed house rules the backend is told to follow on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct MealRules {
    pub household_size: u32,
    /// Household description, e.g. "a Singaporean Chinese family".
    pub household: String,
    /// Dishes pinned to a given day's breakfast.
    pub fixed_breakfasts: Vec<(Weekday, String)>,
    /// Category every dinner must include.
    pub dinner_requirement: Option<String>,
    /// Hint for typical home-cooked dishes.
    pub preferred_dishes: String,
}

impl Default for MealRules {
    fn default() -> Self {
        Self {
            household_size: DEFAULT_HOUSEHOLD_SIZE,
            household: "a Singaporean Chinese family".to_string(),
            fixed_breakfasts: vec![
                (Weekday::Monday, "Ham and Cheese Sandwich".to_string()),
                (Weekday::Wednesday, "Steamed Pau".to_string()),
            ],
            dinner_requirement: Some(
                "a Chinese soup (e.g., ABC soup, Lotus Root Soup, Old Cucumber Soup)".to_string(),
            ),
            preferred_dishes: "Singaporean Chinese home-cooked dishes (e.g., Stir-fried vegetables, Steamed Fish, Tau Yew Bak)".to_string(),
        }
    }
}

impl MealRules {
    pub fn for_household(household_size: u32) -> Self {
        Self {
            household_size,
            ..Self::default()
        }
    }

    /// System instruction sent with every request.
    pub fn system_instruction(&self) -> String {
        let mut s = format!(
            "You are an expert, helpful meal planning assistant for {}. \
             Your task is to generate a complete 7-day meal plan for a family of {}, including Breakfast and Dinner. ",
            self.household, self.household_size
        );
        if let Some(req) = &self.dinner_requirement {
            s.push_str(&format!("**Every dinner MUST include {}.** ", req));
        }
        s.push_str(&format!("Prioritize {}. ", self.preferred_dishes));
        if !self.fixed_breakfasts.is_empty() {
            s.push_str("**CRITICAL BREAKFAST INSTRUCTIONS:** ");
            for (i, (day, dish)) in self.fixed_breakfasts.iter().enumerate() {
                s.push_str(&format!("{}. **{} Breakfast** must be '{}'. ", i + 1, day, dish));
            }
            s.push_str(&format!(
                "{}. All other breakfasts should be simple, non-soup, fast-cooking options (e.g., soft boiled eggs, toast, congee). ",
                self.fixed_breakfasts.len() + 1
            ));
        }
        s.push_str(
            "ONLY respond with a valid, clean JSON object that strictly adheres to the provided schema. \
             Do not include any explanations, greetings, or formatting outside the JSON.",
        );
        s
    }

    /// User prompt embedding the free-text preferences.
    pub fn prompt(&self, preferences: &str) -> String {
        let preferences = preferences.trim();
        let preferences = if preferences.is_empty() {
            "no particular preferences"
        } else {
            preferences
        };
        let mut s = format!(
            "Generate a 7-day family meal plan. The user has the following preferences/restrictions: '{}'.",
            preferences
        );
        if !self.fixed_breakfasts.is_empty() {
            let pinned: Vec<String> = self
                .fixed_breakfasts
                .iter()
                .map(|(day, dish)| format!("{} ({})", day, dish))
                .collect();
            s.push_str(&format!(
                " Ensure the plan strictly follows the mandatory breakfasts: {}.",
                pinned.join(", ")
            ));
        }
        if let Some(req) = &self.dinner_requirement {
            s.push_str(&format!(" All dinners must include {}.", req));
        }
        s
    }
}

/// Generates a validated weekly plan through a `GenerationBackend`.
pub struct PlanGenerator {
    backend: Arc<dyn GenerationBackend>,
    rules: MealRules,
    temperature: f32,
}

impl PlanGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>, rules: MealRules) -> Self {
        Self {
            backend,
            rules,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn rules(&self) -> &MealRules {
        &self.rules
    }

    /// Build the request for `preferences`. Empty preferences are allowed.
    pub fn build_request(&self, preferences: &str) -> GenerationRequest {
        GenerationRequest {
            system_instruction: self.rules.system_instruction(),
            prompt: self.rules.prompt(preferences),
            schema: plan_schema(self.rules.household_size),
            temperature: self.temperature,
        }
    }

    /// One backend round trip, then strict parsing into a complete plan.
    pub async fn generate(&self, preferences: &str) -> Result<WeeklyPlan, GenerationFailure> {
        let request = self.build_request(preferences);
        info!(
            backend = self.backend.name(),
            preferences_len = preferences.len(),
            "calling generation backend for meal plan"
        );

        let raw = self.backend.generate_json(&request).await.map_err(|e| {
            warn!(backend = self.backend.name(), error = %e, "generation backend failed");
            e
        })?;
        debug!(raw_len = raw.len(), raw = %raw, "received plan payload");

        let plan = parse_plan(&raw).map_err(|e| {
            warn!(error = %e, "rejecting plan payload");
            e
        })?;

        for (day, day_plan) in plan.days() {
            info!(
                day = %day,
                breakfast = %day_plan.breakfast.dish,
                dinner = %day_plan.dinner.dish,
                "planned"
            );
        }
        Ok(plan)
    }
}

/// Sanitize JSON response from LLM.
///
/// LLMs sometimes wrap JSON in markdown code blocks. This strips them.
pub fn sanitize_json(raw_text: &str) -> String {
    let trimmed = raw_text.trim();

    // Handle markdown code blocks: ```json ... ``` or ``` ... ```
    if trimmed.starts_with("```") {
        let without_prefix = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .unwrap_or(trimmed);

        if let Some(end_idx) = without_prefix.rfind("```") {
            return without_prefix[..end_idx].trim().to_string();
        }
        return without_prefix.trim().to_string();
    }

    // Prose around a JSON object
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

/// Parse a backend payload into a complete plan. Never fills gaps.
pub fn parse_plan(raw: &str) -> Result<WeeklyPlan, GenerationFailure> {
    let clean = sanitize_json(raw);
    if clean.is_empty() {
        return Err(GenerationFailure::EmptyPlan);
    }

    let value: Value = serde_json::from_str(&clean)
        .map_err(|e| GenerationFailure::MalformedResponse(format!("invalid JSON: {}", e)))?;
    match &value {
        Value::Null => return Err(GenerationFailure::EmptyPlan),
        Value::Object(map) if map.is_empty() => return Err(GenerationFailure::EmptyPlan),
        Value::Object(_) => {}
        other => {
            return Err(GenerationFailure::MalformedResponse(format!(
                "expected a JSON object keyed by day, got {}",
                json_kind(other)
            )));
        }
    }

    let plan: WeeklyPlan = serde_json::from_value(value)
        .map_err(|e| GenerationFailure::MalformedResponse(e.to_string()))?;

    let missing = plan.missing_days();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|d| d.as_str()).collect();
        return Err(GenerationFailure::MalformedResponse(format!(
            "missing days: {}",
            names.join(", ")
        )));
    }

    if plan.meals().all(|(_, _, meal)| meal.has_blank_dish()) {
        return Err(GenerationFailure::EmptyPlan);
    }
    if let Some((day, slot, _)) = plan.meals().find(|(_, _, meal)| meal.has_blank_dish()) {
        return Err(GenerationFailure::MalformedResponse(format!(
            "blank dish for {} {}",
            day, slot
        )));
    }

    Ok(plan)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn full_week_json() -> String {
        let days: Vec<String> = Weekday::ALL
            .iter()
            .map(|d| {
                format!(
                    r#""{}": {{"Breakfast": {{"dish": "Toast", "ingredients": ["bread", "butter"]}},
                              "Dinner": {{"dish": "ABC Soup", "ingredients": ["carrot", "potato"],
                                          "instructions": "Boil. Simmer."}}}}"#,
                    d
                )
            })
            .collect();
        format!("{{{}}}", days.join(","))
    }

    struct FakeBackend {
        reply: Result<String, GenerationFailure>,
        calls: AtomicUsize,
        last: Mutex<Option<GenerationRequest>>,
    }

    impl FakeBackend {
        fn replying(reply: Result<String, GenerationFailure>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait::async_trait]
    impl GenerationBackend for FakeBackend {
        fn name(&self) -> &str {
            "fake"
        }

        async fn generate_json(&self, request: &GenerationRequest) -> Result<String, GenerationFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            self.reply.clone()
        }
    }

    #[test]
    fn test_sanitize_json_clean() {
        let input = r#"{"Monday": {}}"#;
        assert_eq!(sanitize_json(input), input);
    }

    #[test]
    fn test_sanitize_json_markdown() {
        let input = "```json\n{\"Monday\": {}}\n```";
        assert_eq!(sanitize_json(input), r#"{"Monday": {}}"#);
    }

    #[test]
    fn test_sanitize_json_markdown_no_lang() {
        let input = "```\n{\"Monday\": {}}\n```";
        assert_eq!(sanitize_json(input), r#"{"Monday": {}}"#);
    }

    #[test]
    fn test_sanitize_json_with_text() {
        let input = "Here is your plan:\n{\"Monday\": {}}";
        assert_eq!(sanitize_json(input), r#"{"Monday": {}}"#);
    }

    #[test]
    fn test_parse_full_week() {
        let plan = parse_plan(&full_week_json()).unwrap();
        assert_eq!(plan.len(), 7);
        assert_eq!(plan.day(Weekday::Sunday).unwrap().dinner.dish, "ABC Soup");
    }

    #[test]
    fn test_parse_unparseable_is_malformed() {
        let err = parse_plan("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_parse_missing_day_is_malformed() {
        let json = r#"{"Monday": {"Breakfast": {"dish": "Toast", "ingredients": ["bread"]},
                                  "Dinner": {"dish": "Soup", "ingredients": ["water"]}}}"#;
        match parse_plan(json) {
            Err(GenerationFailure::MalformedResponse(msg)) => {
                assert!(msg.contains("Tuesday"));
                assert!(msg.contains("Sunday"));
            }
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_ingredients_is_malformed() {
        let json = full_week_json().replacen(r#", "ingredients": ["bread", "butter"]"#, "", 1);
        assert_eq!(parse_plan(&json).unwrap_err().kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_parse_blank_dish_is_malformed() {
        let json = full_week_json().replacen(r#""dish": "Toast""#, r#""dish": "  ""#, 1);
        assert_eq!(parse_plan(&json).unwrap_err().kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_parse_empty_payloads() {
        assert_eq!(parse_plan("{}").unwrap_err(), GenerationFailure::EmptyPlan);
        assert_eq!(parse_plan("null").unwrap_err(), GenerationFailure::EmptyPlan);
        assert_eq!(parse_plan("   ").unwrap_err(), GenerationFailure::EmptyPlan);
        let no_dishes = full_week_json()
            .replace(r#""dish": "Toast""#, r#""dish": """#)
            .replace(r#""dish": "ABC Soup""#, r#""dish": """#);
        assert_eq!(parse_plan(&no_dishes).unwrap_err(), GenerationFailure::EmptyPlan);
    }

    #[test]
    fn test_parse_array_is_malformed() {
        assert_eq!(parse_plan("[1, 2]").unwrap_err().kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_prompt_with_empty_preferences() {
        let rules = MealRules::default();
        let prompt = rules.prompt("   ");
        assert!(prompt.contains("'no particular preferences'"));
        assert!(prompt.contains("Monday (Ham and Cheese Sandwich)"));
    }

    #[test]
    fn test_system_instruction_carries_rules() {
        let rules = MealRules::for_household(3);
        let s = rules.system_instruction();
        assert!(s.contains("family of 3"));
        assert!(s.contains("**Wednesday Breakfast** must be 'Steamed Pau'"));
        assert!(s.contains("Chinese soup"));
    }

    #[tokio::test]
    async fn test_generate_single_call_with_schema() {
        let backend = FakeBackend::replying(Ok(format!("```json\n{}\n```", full_week_json())));
        let generator = PlanGenerator::new(backend.clone(), MealRules::for_household(4));

        let plan = generator.generate("no nuts").await.unwrap();

        assert_eq!(plan.len(), 7);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        let request = backend.last.lock().unwrap().clone().unwrap();
        assert!(request.prompt.contains("'no nuts'"));
        assert_eq!(request.schema, plan_schema(4));
        assert!((request.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_generate_propagates_backend_failure_without_retry() {
        let backend = FakeBackend::replying(Err(GenerationFailure::BackendCallFailed(
            "429 quota".to_string(),
        )));
        let generator = PlanGenerator::new(backend.clone(), MealRules::default());

        let err = generator.generate("").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BackendCallFailed);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generate_malformed_payload() {
        let backend = FakeBackend::replying(Ok("Sorry, I cannot help with that.".to_string()));
        let generator = PlanGenerator::new(backend, MealRules::default());
        let err = generator.generate("tacos").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
