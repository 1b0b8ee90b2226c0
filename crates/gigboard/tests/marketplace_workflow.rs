//! End-to-end specification of the marketplace flow, driven through the
//! public facade the way the presentation layer would call it.

mod common {
    use gigboard::market::{
        ClientProfile, FreelancerProfile, LedgerMarketplace, NewUser, UserId, UserProfile,
    };

    pub(super) fn marketplace() -> LedgerMarketplace {
        LedgerMarketplace::in_memory()
    }

    pub(super) fn register_pair(market: &LedgerMarketplace) -> (UserId, UserId) {
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
            .expect("client signup");
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
            .expect("freelancer signup");
        (client, freelancer)
    }
}

mod lifecycle {
    use super::common::*;
    use gigboard::market::{round_to_cents, JobStatus, PaymentOutcome};

    #[test]
    fn a_content_job_travels_from_quote_to_paid() {
        let market = marketplace();
        let (client, freelancer) = register_pair(&market);

        let quoted = market
            .quote_price("content", "high", 5.0)
            .expect("quote succeeds");
        assert_eq!(round_to_cents(quoted), 375.0);

        let job = market
            .post_job(&client, "content", "high", 5.0, "Launch announcement copy")
            .expect("job posts");
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.price, 375.0);

        let open = market.list_open_jobs().expect("open listing");
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, job.id);

        let accepted = market
            .accept_job(job.id, &freelancer)
            .expect("job accepts");
        assert_eq!(accepted.status, JobStatus::Accepted);
        assert_eq!(accepted.accepted_by, Some(freelancer.clone()));
        assert!(market.list_open_jobs().expect("open listing").is_empty());

        let inbox = market.inbox(&client).expect("client inbox");
        assert_eq!(inbox.len(), 1);
        assert!(inbox[0].actionable);
        assert_eq!(inbox[0].amount, Some(375.0));

        let intent = market
            .request_payment(inbox[0].id)
            .expect("payment intent");
        assert_eq!(intent.amount, 375.0);
        let receipt = market.confirm_payment(intent.id).expect("payment confirms");
        assert_eq!(receipt.outcome, PaymentOutcome::Settled);

        let job = market
            .fetch_job(job.id)
            .expect("fetch succeeds")
            .expect("job present");
        assert_eq!(job.status, JobStatus::Paid);

        let client_inbox = market.inbox(&client).expect("client inbox");
        assert_eq!(client_inbox[0].paid, Some(true));

        let freelancer_inbox = market.inbox(&freelancer).expect("freelancer inbox");
        assert_eq!(freelancer_inbox.len(), 1);
        assert_eq!(freelancer_inbox[0].title, "Payment Received");
        assert_eq!(freelancer_inbox[0].amount, Some(375.0));
    }

    #[test]
    fn acceptance_notifications_lead_the_inbox() {
        let market = marketplace();
        let (client, freelancer) = register_pair(&market);

        let older = market
            .post_job(&client, "design", "low", 2.0, "Banner set")
            .expect("job posts");
        market.accept_job(older.id, &freelancer).expect("accepted");

        let newer = market
            .post_job(&client, "web", "medium", 8.0, "Checkout polish")
            .expect("job posts");
        market.accept_job(newer.id, &freelancer).expect("accepted");

        let inbox = market.inbox(&client).expect("client inbox");
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].job_id, newer.id);
        assert_eq!(inbox[1].job_id, older.id);
    }

    #[test]
    fn directory_search_finds_registered_freelancers() {
        let market = marketplace();
        let (_, freelancer) = register_pair(&market);

        let found = market
            .search_freelancers("content")
            .expect("search runs");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, freelancer.0);
    }
}
