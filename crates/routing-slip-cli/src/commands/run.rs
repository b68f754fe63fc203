use std::sync::Arc;

use routing_slip::{Itinerary, LocalBus, SagaOutcome};
use routing_slip_travel::travel_catalog;
use tracing::info;

use super::RunArgs;
use crate::error::{CliError, Result};

pub(crate) fn run(args: &RunArgs) -> Result<()> {
    let catalog = Arc::new(travel_catalog());
    let slip = Itinerary::load(&args.itinerary)?.into_routing_slip(&catalog)?;
    info!(
        path = %args.itinerary.display(),
        steps = slip.itinerary().len(),
        "loaded itinerary"
    );

    let mut bus = LocalBus::new(catalog).with_max_deliveries(args.max_deliveries);
    let (result, audit_log) = bus.run_with_audit(slip);
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.slip)?);
    } else {
        if !audit_log.records().is_empty() {
            println!("{}", audit_log.summary());
        }
        println!("Saga {}.", report.outcome);
    }

    match report.outcome {
        SagaOutcome::Completed => Ok(()),
        outcome => Err(CliError::SagaNotCompleted(outcome)),
    }
}
