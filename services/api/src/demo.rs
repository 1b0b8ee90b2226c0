use clap::Args;
use gigboard::error::AppError;
use gigboard::market::{
    round_to_cents, ClientProfile, FreelancerProfile, JobError, LedgerMarketplace, MarketError,
    NewUser, PaymentError, PaymentOutcome, UserProfile,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Service category for the demo job
    #[arg(long, default_value = "content")]
    pub(crate) service: String,
    /// Complexity tier for the demo job (low, medium, high)
    #[arg(long, default_value = "high")]
    pub(crate) complexity: String,
    /// Estimated hours for the demo job
    #[arg(long, default_value_t = 5.0)]
    pub(crate) hours: f64,
}

/// Walk the whole marketplace flow against an in-memory instance, printing
/// each step: signup, quote, posting, acceptance, and payment.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let market = LedgerMarketplace::in_memory();

    println!("Freelance marketplace demo");

    let client = market
        .register_user(NewUser {
            profile: UserProfile::Client(ClientProfile {
                username: "casey".to_string(),
                display_name: "Casey Ortiz".to_string(),
                email: "casey@example.net".to_string(),
                phone: "555-0101".to_string(),
            }),
            secret: "open-sesame".to_string(),
        })
        .map_err(MarketError::from)?;
    let freelancer = market
        .register_user(NewUser {
            profile: UserProfile::Freelancer(FreelancerProfile {
                username: "finley".to_string(),
                display_name: "Finley Vale".to_string(),
                email: "finley@example.net".to_string(),
                phone: "555-0102".to_string(),
                rating: 4.8,
                specialization: "content strategy".to_string(),
            }),
            secret: "let-me-in".to_string(),
        })
        .map_err(MarketError::from)?;
    println!("  registered client '{client}' and freelancer '{freelancer}'");

    let quote = market
        .quote_price(&args.service, &args.complexity, args.hours)
        .map_err(MarketError::from)?;
    println!(
        "  quote for {}/{} at {}h: ${:.2}",
        args.service,
        args.complexity,
        args.hours,
        round_to_cents(quote)
    );

    let job = market
        .post_job(
            &client,
            &args.service,
            &args.complexity,
            args.hours,
            "Launch announcement copy for the fall release",
        )
        .map_err(MarketError::from)?;
    println!("  job #{} posted ({})", job.id, job.status.label());

    let open = market.list_open_jobs().map_err(MarketError::from)?;
    println!("  open jobs visible to freelancers: {}", open.len());

    let matches = market
        .search_freelancers(&args.service)
        .map_err(MarketError::from)?;
    println!("  directory matches for '{}': {}", args.service, matches.len());

    let job = market
        .accept_job(job.id, &freelancer)
        .map_err(MarketError::from)?;
    println!("  job #{} accepted by '{freelancer}'", job.id);

    let inbox = market.inbox(&client).map_err(MarketError::from)?;
    let notification = inbox
        .first()
        .ok_or_else(|| MarketError::Payment(PaymentError::JobNotAccepted(job.id)))?;
    println!(
        "  client notification: \"{}\" (amount ${:.2})",
        notification.title,
        round_to_cents(notification.amount.unwrap_or(job.price))
    );

    let intent = market
        .request_payment(notification.id)
        .map_err(MarketError::from)?;
    let receipt = market
        .confirm_payment(intent.id)
        .map_err(MarketError::from)?;
    println!(
        "  payment of ${:.2} confirmed ({:?})",
        round_to_cents(receipt.amount),
        receipt.outcome
    );

    let repeat = market
        .confirm_payment(intent.id)
        .map_err(MarketError::from)?;
    if repeat.outcome == PaymentOutcome::AlreadySettled {
        println!("  repeated confirmation absorbed as a no-op");
    }

    let job = market
        .fetch_job(job.id)
        .map_err(MarketError::from)?
        .ok_or_else(|| MarketError::Job(JobError::NotFound(job.id)))?;
    println!("  job #{} finished as '{}'", job.id, job.status.label());

    let freelancer_inbox = market.inbox(&freelancer).map_err(MarketError::from)?;
    if let Some(entry) = freelancer_inbox.first() {
        println!("  freelancer notification: \"{}\"", entry.title);
    }

    Ok(())
}
