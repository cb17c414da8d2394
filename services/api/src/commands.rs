use crate::infra::{build_catalog_source, LiveCatalog};
use clap::Args;
use guia_saude::config::AppConfig;
use guia_saude::error::AppError;
use guia_saude::workflows::triage::{
    AssessedReport, HealthUnit, SymptomId, TriageReport, TriageService, UnitListing,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct TriageArgs {
    /// Symptom id to include (repeat for several, e.g. --symptom febre --symptom tosse)
    #[arg(long = "symptom", value_name = "ID")]
    pub(crate) symptoms: Vec<String>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct UnitsArgs {
    /// Unit type: hospital, upa, ubs or todas
    #[arg(long = "type", default_value = "todas")]
    pub(crate) unit_type: String,
    /// Text matched against name, neighborhood and address
    #[arg(long, default_value = "")]
    pub(crate) query: String,
    /// Print the listing as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SymptomsArgs {
    /// Text matched against symptom names
    #[arg(long)]
    pub(crate) query: Option<String>,
}

fn triage_service() -> Result<TriageService<LiveCatalog>, AppError> {
    let config = AppConfig::load()?;
    let source = Arc::new(build_catalog_source(&config.catalog));
    Ok(TriageService::new(source, config.triage))
}

pub(crate) async fn run_triage(args: TriageArgs) -> Result<(), AppError> {
    let service = triage_service()?;
    let report = service
        .triage(args.symptoms.into_iter().map(SymptomId::from))
        .await?;

    if args.json {
        print_json(&report);
    } else {
        render_report(&report);
    }
    Ok(())
}

pub(crate) async fn run_units(args: UnitsArgs) -> Result<(), AppError> {
    let service = triage_service()?;
    let listing = service.units(&args.unit_type, &args.query).await?;

    if args.json {
        print_json(&listing);
    } else {
        render_listing(&listing);
    }
    Ok(())
}

pub(crate) async fn run_symptoms(args: SymptomsArgs) -> Result<(), AppError> {
    let service = triage_service()?;
    let symptoms = service.symptoms(args.query.as_deref()).await?;

    if symptoms.is_empty() {
        println!(
            "No symptoms match '{}'",
            args.query.as_deref().unwrap_or_default()
        );
        return Ok(());
    }

    println!("Symptom catalog ({} entries)", symptoms.len());
    for symptom in &symptoms {
        println!(
            "- {} [{}] weight {} ({})",
            symptom.name, symptom.id, symptom.weight, symptom.category
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(payload: &T) {
    match serde_json::to_string_pretty(payload) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("JSON payload unavailable: {err}"),
    }
}

pub(crate) fn render_report(report: &TriageReport) {
    match report {
        TriageReport::NoSelection { prompt } => println!("{prompt}"),
        TriageReport::Assessed(assessed) => render_assessed(assessed),
    }
}

fn render_assessed(report: &AssessedReport) {
    let outcome = &report.outcome;
    println!("Triage result");
    println!(
        "- {} (score {}) -> {}",
        outcome.urgency_label, outcome.score, outcome.destination_label
    );
    if outcome.has_alert {
        println!("- Alert signal selected");
    }
    println!("- {}", outcome.message);

    let unmatched: Vec<_> = outcome.unmatched_symptoms().map(SymptomId::as_str).collect();
    if !unmatched.is_empty() {
        println!(
            "- Not in the catalog (scored with the default weight): {}",
            unmatched.join(", ")
        );
    }

    if !outcome.general_tips.is_empty() {
        println!("General tips:");
        for tip in &outcome.general_tips {
            println!("  - {tip}");
        }
    }

    println!("\nSuggested units");
    if report.suggested_units.is_empty() {
        println!("  - none listed for this destination");
    }
    for suggested in &report.suggested_units {
        render_unit(&suggested.unit);
        println!("    map: {}", suggested.maps_url);
    }
    println!("{}", report.units_note);
    println!("\n{}", report.disclaimer);
}

fn render_listing(listing: &UnitListing) {
    if listing.units.is_empty() {
        println!("No health units match the filter");
        return;
    }

    println!("Health units ({})", listing.units.len());
    for unit in &listing.units {
        render_unit(unit);
    }
    if let Some(notice) = &listing.notice {
        println!("\n{notice}");
    }
}

fn render_unit(unit: &HealthUnit) {
    println!(
        "  - {} [{}] {} | {}",
        unit.name,
        unit.unit_type.destination_label(),
        unit.address,
        unit.hours
    );
    if let Some(phone) = &unit.phone {
        println!("    phone: {phone}");
    }
}
