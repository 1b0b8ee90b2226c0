use std::sync::{Arc, Barrier};

use super::common::*;
use crate::market::domain::{JobStatus, NotificationId, PaymentOutcome};
use crate::market::payment::PaymentError;
use crate::market::store::JobStore;

#[test]
fn request_payment_requires_a_pending_actionable_notification() {
    let (harness, client, freelancer) = seeded_market();

    assert!(matches!(
        harness.market.request_payment(NotificationId(404)),
        Err(PaymentError::UnknownNotification(_))
    ));

    let (_, notification) = accepted_job(&harness, &client, &freelancer);
    let intent = harness
        .market
        .request_payment(notification.id)
        .expect("payment intent");
    assert_eq!(intent.notification_id, notification.id);
    assert_eq!(intent.client, client);
    assert_eq!(intent.freelancer, freelancer);
    assert_eq!(intent.amount, 750.0);

    harness
        .market
        .confirm_payment(intent.id)
        .expect("payment confirms");

    // Settled notification: the job is no longer awaiting payment.
    assert!(matches!(
        harness.market.request_payment(notification.id),
        Err(PaymentError::JobNotAccepted(_))
    ));

    // The freelancer's receipt is informational, not payable.
    let receipt_entry = harness
        .market
        .inbox(&freelancer)
        .expect("freelancer inbox")
        .into_iter()
        .next()
        .expect("payment notification present");
    assert!(matches!(
        harness.market.request_payment(receipt_entry.id),
        Err(PaymentError::NotPayable(_))
    ));
}

#[test]
fn confirmation_marks_the_job_paid_and_settles_the_notification() {
    let (harness, client, freelancer) = seeded_market();
    let (job, notification) = accepted_job(&harness, &client, &freelancer);

    let intent = harness
        .market
        .request_payment(notification.id)
        .expect("payment intent");
    let receipt = harness
        .market
        .confirm_payment(intent.id)
        .expect("payment confirms");
    assert_eq!(receipt.outcome, PaymentOutcome::Settled);
    assert_eq!(receipt.amount, job.price);

    let stored = harness
        .jobs
        .fetch(job.id)
        .expect("fetch succeeds")
        .expect("job present");
    assert_eq!(stored.status, JobStatus::Paid);

    let settled = harness
        .market
        .inbox(&client)
        .expect("client inbox")
        .into_iter()
        .find(|entry| entry.id == notification.id)
        .expect("acceptance notification present");
    assert_eq!(settled.paid, Some(true));
}

#[test]
fn repeat_confirmations_are_absorbed_without_new_notifications() {
    let (harness, client, freelancer) = seeded_market();
    let (job, notification) = accepted_job(&harness, &client, &freelancer);

    let intent = harness
        .market
        .request_payment(notification.id)
        .expect("payment intent");
    let first = harness
        .market
        .confirm_payment(intent.id)
        .expect("first confirmation");
    let second = harness
        .market
        .confirm_payment(intent.id)
        .expect("second confirmation");

    assert_eq!(first.outcome, PaymentOutcome::Settled);
    assert_eq!(second.outcome, PaymentOutcome::AlreadySettled);

    let receipts = harness
        .market
        .inbox(&freelancer)
        .expect("freelancer inbox")
        .into_iter()
        .filter(|entry| entry.title == "Payment Received" && entry.job_id == job.id)
        .count();
    assert_eq!(receipts, 1, "only the first confirmation notifies");
}

#[test]
fn unknown_intents_are_rejected() {
    let (harness, _, _) = seeded_market();
    assert!(matches!(
        harness
            .market
            .confirm_payment(crate::market::domain::IntentId(99)),
        Err(PaymentError::UnknownIntent(_))
    ));
}

#[test]
fn concurrent_confirmations_collapse_to_one_settlement() {
    let (harness, client, freelancer) = seeded_market();
    let (job, notification) = accepted_job(&harness, &client, &freelancer);

    let intent = harness
        .market
        .request_payment(notification.id)
        .expect("payment intent");

    let racers = 6;
    let barrier = Arc::new(Barrier::new(racers));
    let handles: Vec<_> = (0..racers)
        .map(|_| {
            let market = harness.market.clone();
            let barrier = barrier.clone();
            let intent_id = intent.id;
            std::thread::spawn(move || {
                barrier.wait();
                market.confirm_payment(intent_id)
            })
        })
        .collect();

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread joins").expect("confirmation"))
        .collect();

    let settled = outcomes
        .iter()
        .filter(|receipt| receipt.outcome == PaymentOutcome::Settled)
        .count();
    assert_eq!(settled, 1, "exactly one confirmation takes effect");

    let receipts = harness
        .market
        .inbox(&freelancer)
        .expect("freelancer inbox")
        .into_iter()
        .filter(|entry| entry.title == "Payment Received" && entry.job_id == job.id)
        .count();
    assert_eq!(receipts, 1);
}
