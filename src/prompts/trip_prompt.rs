//! Trip planning system prompt
//!
//! The instruction block carries every constraint the model has to respect:
//! budget, currency, option counts, meals per day, the tour guide request and
//! the JSON shape of the final answer.

use crate::planner::input::{BudgetType, TripInput};
use crate::planner::result::EXPECTED_OPTION_COUNT;
use crate::planner::TRIP_ID_PLACEHOLDER;

/// First user turn of every planning session
pub const PLAN_REQUEST: &str = "Plan my trip.";

/// Number of meal items required per itinerary day
pub const MEALS_PER_DAY: usize = 3;

fn budget_scope(budget_type: BudgetType) -> &'static str {
    match budget_type {
        BudgetType::Total => "total",
        BudgetType::PerPerson => "per person",
    }
}

/// Generates the system instruction for a planning session
///
/// # Arguments
///
/// * `input` - The traveller's trip parameters
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wanderlust::planner::{Currency, TripInput};
/// use wanderlust::prompts::trip_prompt::generate_trip_prompt;
///
/// let mut input = TripInput::new(
///     "Delhi",
///     "Goa, India",
///     NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 12, 23).unwrap(),
///     80000.0,
/// );
/// input.currency = Currency::Inr;
///
/// let prompt = generate_trip_prompt(&input);
/// assert!(prompt.contains("₹80000 total"));
/// assert!(prompt.contains("Delhi -> Goa, India"));
/// ```
pub fn generate_trip_prompt(input: &TripInput) -> String {
    let currency = input.currency.code();
    let tour_guide_rule = if input.tour_guide {
        "Include a professional tour guide service, either as a daily activity item or as a separate cost note."
    } else {
        "Do not include a tour guide unless the trip cannot work without one."
    };
    let description = if input.description.trim().is_empty() {
        "(none)"
    } else {
        input.description.trim()
    };

    format!(
        r#"You are an expert travel planning agent. Plan the best possible trip for the request below.

RESPONSIBILITIES:
1. If an image is attached, study it and describe the "vibe" the traveller is after.
2. Use the tools to find:
   - {count} distinct transport options (search_transport)
   - {count} distinct accommodation options (search_accommodation)
   - {count} distinct featured dining experiences (search_food)
3. Respect the budget: {symbol}{budget} {scope}.
4. Build a day-by-day itinerary covering every date of the trip.
5. CRITICAL: every itinerary day MUST contain {meals} separate meal items:
   - "Breakfast at [restaurant name or type]"
   - "Lunch at [restaurant name or type]"
   - "Dinner at [restaurant name or type]"
6. All costs for food and activities MUST be in {currency}.
7. {tour_guide_rule}
8. Answer with a single JSON object and nothing else.

TRIP REQUEST:
- Route: {from} -> {destination}
- Dates: {start} to {end} ({nights} nights)
- People: {people}
- Transport preference: {transport}
- Accommodation: {stay_type} ({stay_budget})
- Description: {description}
- Currency: {currency}
- Tour guide requested: {tour_guide}

REQUIRED FINAL JSON FORMAT (no markdown):
{{
  "tripId": "{placeholder}",
  "destination": "string",
  "people": {people},
  "currency": "{currency}",
  "vibeAnalysis": "string",
  "status": "draft",
  "transportOptions": [
    {{ "id": "t1", "type": "string", "provider": "string", "departureTime": "string", "arrivalTime": "string", "duration": "string", "cost": 0, "booked": false }}
  ],
  "accommodationOptions": [
    {{ "id": "a1", "name": "string", "type": "string", "location": "string", "costPerNight": 0, "totalCost": 0, "amenities": ["string"], "rating": 0, "booked": false }}
  ],
  "foodOptions": [
    {{ "id": "f1", "name": "string", "cuisine": "string", "type": "string", "location": "string", "costPerPerson": 0, "rating": 0, "booked": false }}
  ],
  "selectedTransportId": "t1",
  "selectedAccommodationId": "a1",
  "selectedFoodId": "f1",
  "estimatedCosts": {{ "food": 0, "activities": 0 }},
  "itinerary": [
    {{
      "day": 1,
      "date": "YYYY-MM-DD",
      "theme": "string",
      "items": [
        {{ "id": "i_unique", "time": "Morning/10:00 AM", "activity": "string", "costEstimate": 0, "location": "string", "notes": "string" }}
      ]
    }}
  ]
}}
"estimatedCosts.food" is the total estimated food cost for the whole trip."#,
        count = EXPECTED_OPTION_COUNT,
        symbol = input.currency.symbol(),
        budget = input.total_budget,
        scope = budget_scope(input.budget_type),
        meals = MEALS_PER_DAY,
        currency = currency,
        tour_guide_rule = tour_guide_rule,
        from = input.from_location,
        destination = input.destination,
        start = input.start_date,
        end = input.end_date,
        nights = input.nights(),
        people = input.people,
        transport = input.transport.as_str(),
        stay_type = input.accommodation_type.as_str(),
        stay_budget = input.accommodation_budget.as_str(),
        description = description,
        tour_guide = if input.tour_guide { "YES" } else { "NO" },
        placeholder = TRIP_ID_PLACEHOLDER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::input::Currency;
    use chrono::NaiveDate;

    fn input() -> TripInput {
        TripInput::new(
            "Austin",
            "Lisbon",
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 6).unwrap(),
            4500.0,
        )
    }

    #[test]
    fn test_prompt_embeds_budget_and_currency() {
        let mut trip = input();
        trip.budget_type = BudgetType::PerPerson;
        let prompt = generate_trip_prompt(&trip);
        assert!(prompt.contains("$4500 per person"));
        assert!(prompt.contains("MUST be in USD"));
        assert!(prompt.contains("\"currency\": \"USD\""));
    }

    #[test]
    fn test_prompt_switches_symbol_for_rupees() {
        let mut trip = input();
        trip.currency = Currency::Inr;
        let prompt = generate_trip_prompt(&trip);
        assert!(prompt.contains("₹4500 total"));
        assert!(prompt.contains("MUST be in INR"));
    }

    #[test]
    fn test_prompt_requires_three_options_and_meals() {
        let prompt = generate_trip_prompt(&input());
        assert!(prompt.contains("3 distinct transport options"));
        assert!(prompt.contains("3 distinct accommodation options"));
        assert!(prompt.contains("3 distinct featured dining"));
        assert!(prompt.contains("3 separate meal items"));
        assert!(prompt.contains("Breakfast at"));
        assert!(prompt.contains("Dinner at"));
    }

    #[test]
    fn test_prompt_tour_guide_line() {
        let mut trip = input();
        assert!(generate_trip_prompt(&trip).contains("Tour guide requested: NO"));

        trip.tour_guide = true;
        let prompt = generate_trip_prompt(&trip);
        assert!(prompt.contains("Tour guide requested: YES"));
        assert!(prompt.contains("professional tour guide"));
    }

    #[test]
    fn test_prompt_contains_trip_facts_and_template() {
        let mut trip = input();
        trip.people = 2;
        trip.description = "food markets and live music".to_string();
        let prompt = generate_trip_prompt(&trip);
        assert!(prompt.contains("Dates: 2026-05-01 to 2026-05-06 (5 nights)"));
        assert!(prompt.contains("People: 2"));
        assert!(prompt.contains("\"people\": 2"));
        assert!(prompt.contains("food markets and live music"));
        assert!(prompt.contains("\"tripId\": \"generate_uuid\""));
    }
}
