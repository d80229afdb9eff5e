use crate::infra::{InMemoryCollaborators, InMemoryOpeningService};
use chrono::NaiveDate;
use clap::Args;
use pension_setup::config::{AppConfig, BackgroundCheckDefaults};
use pension_setup::error::AppError;
use pension_setup::workflows::account_opening::{
    AccountOpeningStatus, Applicant, BackgroundCheckResult, UNACCEPTABLE_RISK_PROFILE,
};

#[derive(Args, Debug)]
pub(crate) struct OpenArgs {
    #[arg(long)]
    pub(crate) first_name: String,
    #[arg(long)]
    pub(crate) last_name: String,
    #[arg(long)]
    pub(crate) tax_id: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date_of_birth: NaiveDate,
    /// Risk profile the background check should report (defaults to APP_DEFAULT_RISK_PROFILE)
    #[arg(long)]
    pub(crate) risk_profile: Option<String>,
    /// Upper account limit the background check should report
    #[arg(long)]
    pub(crate) account_limit: Option<u64>,
    /// Simulate a bureau with no record for this applicant
    #[arg(long, conflicts_with_all = ["risk_profile", "account_limit"])]
    pub(crate) no_record: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print stored accounts as JSON after the run
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_open(args: OpenArgs) -> Result<(), AppError> {
    let OpenArgs {
        first_name,
        last_name,
        tax_id,
        date_of_birth,
        risk_profile,
        account_limit,
        no_record,
    } = args;

    let defaults = AppConfig::load()?.background_checks;
    let collaborators = InMemoryCollaborators::new(&defaults);

    if no_record {
        collaborators.background_checks.set_result(&tax_id, None);
    } else if risk_profile.is_some() || account_limit.is_some() {
        let result = BackgroundCheckResult::new(
            risk_profile.unwrap_or_else(|| defaults.risk_profile.clone()),
            account_limit.unwrap_or(defaults.upper_account_limit),
        );
        collaborators
            .background_checks
            .set_result(&tax_id, Some(result));
    }

    let applicant = Applicant {
        first_name,
        last_name,
        tax_id,
        date_of_birth,
    };
    let service = collaborators.service();
    let status = service.open(&applicant)?;

    render_outcome(&applicant, status);
    render_side_effects(&collaborators, true)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let collaborators = demo_collaborators();
    let service = collaborators.service();
    println!("Pension account opening demo");
    for applicant in demo_applicants()? {
        open_and_render(&service, &applicant)?;
    }

    render_side_effects(&collaborators, args.json)
}

/// One low-risk applicant, one with the unacceptable profile, one unknown to the bureau.
fn demo_collaborators() -> InMemoryCollaborators {
    let defaults = BackgroundCheckDefaults {
        risk_profile: "LOW_RISK".to_string(),
        upper_account_limit: 100_000,
    };
    let collaborators = InMemoryCollaborators::new(&defaults);
    collaborators.background_checks.set_result(
        "666BAD1",
        Some(BackgroundCheckResult::new(UNACCEPTABLE_RISK_PROFILE, 0)),
    );
    collaborators.background_checks.set_result("000NONE", None);
    collaborators
}

fn open_and_render(
    service: &InMemoryOpeningService,
    applicant: &Applicant,
) -> Result<(), AppError> {
    let status = service.open(applicant)?;
    render_outcome(applicant, status);
    Ok(())
}

fn demo_applicants() -> Result<Vec<Applicant>, AppError> {
    let applicant = |first: &str, last: &str, tax_id: &str, dob: &str| {
        crate::infra::parse_date(dob)
            .map(|date_of_birth| Applicant {
                first_name: first.to_string(),
                last_name: last.to_string(),
                tax_id: tax_id.to_string(),
                date_of_birth,
            })
            .map_err(AppError::Input)
    };

    Ok(vec![
        applicant("John", "Smith", "123XYZ9", "1990-01-01")?,
        applicant("Mallory", "Jones", "666BAD1", "1985-06-15")?,
        applicant("Nora", "Unknown", "000NONE", "2000-12-31")?,
    ])
}

fn render_outcome(applicant: &Applicant, status: AccountOpeningStatus) {
    println!(
        "- {} {} (tax id {}): {}",
        applicant.first_name,
        applicant.last_name,
        redact(&applicant.tax_id),
        status.label()
    );
}

fn render_side_effects(
    collaborators: &InMemoryCollaborators,
    as_json: bool,
) -> Result<(), AppError> {
    let accounts = collaborators.store.accounts();
    let events = collaborators.notifier.events();

    println!("\nStored accounts: {}", accounts.len());
    for account in &accounts {
        println!(
            "  - {} | risk {} | limit {}",
            account.account_id.0,
            account.background_check.risk_profile,
            account.background_check.upper_account_limit
        );
    }

    println!("Account opened events: {}", events.len());
    for event in &events {
        println!("  - {}", event.account_id.0);
    }

    if as_json {
        let rendered = serde_json::to_string_pretty(&accounts)
            .map_err(|err| AppError::Input(err.to_string()))?;
        println!("{rendered}");
    }

    Ok(())
}

fn redact(tax_id: &str) -> String {
    let visible: String = tax_id
        .chars()
        .rev()
        .take(2)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{visible}")
}
