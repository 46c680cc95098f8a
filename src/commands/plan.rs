//! `wanderlust plan`

use super::{print_trip, to_pretty_json};
use crate::agent::AgentOutcome;
use crate::cli::PlanArgs;
use crate::error::{Result, WanderlustError};
use crate::planner::{BookingPreference, TripInput, TripPlanner, TripResult};
use crate::providers::InlineImage;
use crate::storage::TripStore;
use colored::Colorize;

/// Convert command line arguments into trip parameters
///
/// The inspiration image, if any, is read and encoded here.
///
/// # Errors
///
/// Returns `WanderlustError::InvalidInput` if the image cannot be loaded
pub async fn trip_input(args: &PlanArgs) -> Result<TripInput> {
    let image = match &args.image {
        Some(path) => Some(InlineImage::from_path(path).await?),
        None => None,
    };

    let mut input = TripInput::new(
        args.from.clone(),
        args.to.clone(),
        args.start,
        args.end,
        args.budget,
    );
    input.description = args.description.clone();
    input.currency = args.currency;
    input.budget_type = args.budget_type;
    input.people = args.people;
    input.transport = args.transport;
    input.accommodation_type = args.stay;
    input.accommodation_budget = args.stay_budget;
    input.booking_preference = args.booking;
    input.tour_guide = args.tour_guide;
    input.image = image;
    Ok(input)
}

/// Plan a trip, then book and save it as requested
///
/// With `--booking auto_book` the selected option of every category is
/// booked before the plan is saved or printed. A store is only needed when
/// `--save` is given.
///
/// # Errors
///
/// Returns error if planning fails, or `WanderlustError::Config` if saving
/// was requested without a store
pub async fn run_plan(
    planner: &TripPlanner,
    store: Option<&dyn TripStore>,
    args: PlanArgs,
) -> Result<TripResult> {
    tracing::info!("Planning trip from {} to {}", args.from, args.to);

    let input = trip_input(&args).await?;
    let outcome = planner.plan(&input).await?;
    let mut trip = outcome.trip;

    if input.booking_preference == BookingPreference::AutoBook {
        trip.book_selected()?;
        tracing::info!("Booked selected options for trip {}", trip.trip_id);
    }

    if args.save {
        let store = store.ok_or_else(|| {
            WanderlustError::Config("No trip store available for --save".to_string())
        })?;
        let stored = store.save_trip(&args.user, &trip).await?;
        trip = stored.trip;
    }

    if args.json {
        println!("{}", to_pretty_json(&trip)?);
    } else {
        print_summary(&outcome.run);
        print_trip(&trip);
        if args.save {
            println!("Saved trip {} for {}", trip.trip_id.cyan(), args.user);
        }
    }

    Ok(trip)
}

fn print_summary(run: &AgentOutcome) {
    let failed = run.invocations.iter().filter(|inv| !inv.success).count();
    println!(
        "\n{} {} lookups in {} steps",
        "Plan ready:".green().bold(),
        run.invocations.len(),
        run.steps
    );
    if failed > 0 {
        println!("{}", format!("{} lookups failed", failed).yellow());
    }
    if run.hit_step_limit {
        println!(
            "{}",
            "Step limit reached; the plan was extracted from the last response".yellow()
        );
    }
    if let Some(usage) = run.usage() {
        println!(
            "Tokens: {} prompt, {} completion",
            usage.prompt_tokens, usage.completion_tokens
        );
    }
}
