use super::common::*;
use crate::market::domain::{ClientProfile, NewUser, UserProfile};
use crate::market::identity::IdentityError;

#[test]
fn signup_then_login_round_trips() {
    let harness = build_market();
    let id = harness
        .market
        .register_user(client_signup("casey"))
        .expect("client signup");
    assert_eq!(id.0, "casey");

    let authenticated = harness
        .market
        .authenticate("casey", "open-sesame")
        .expect("valid credentials");
    assert_eq!(authenticated, id);
}

#[test]
fn duplicate_usernames_are_rejected() {
    let harness = build_market();
    harness
        .market
        .register_user(client_signup("casey"))
        .expect("first signup");

    assert!(matches!(
        harness.market.register_user(client_signup("casey")),
        Err(IdentityError::DuplicateUsername)
    ));
    // Role does not disambiguate: usernames are globally unique.
    assert!(matches!(
        harness
            .market
            .register_user(freelancer_signup("casey", "web development")),
        Err(IdentityError::DuplicateUsername)
    ));
}

#[test]
fn bad_credentials_collapse_to_one_error() {
    let harness = build_market();
    harness
        .market
        .register_user(client_signup("casey"))
        .expect("client signup");

    let wrong_secret = harness.market.authenticate("casey", "guess");
    let unknown_user = harness.market.authenticate("nobody", "open-sesame");
    assert!(matches!(wrong_secret, Err(IdentityError::InvalidCredentials)));
    assert!(matches!(unknown_user, Err(IdentityError::InvalidCredentials)));
    assert_eq!(
        wrong_secret.unwrap_err().to_string(),
        unknown_user.unwrap_err().to_string(),
        "the message must not reveal which field failed"
    );
}

#[test]
fn incomplete_signups_are_rejected() {
    let harness = build_market();

    let mut missing_secret = client_signup("casey");
    missing_secret.secret.clear();
    assert!(matches!(
        harness.market.register_user(missing_secret),
        Err(IdentityError::MissingField("secret"))
    ));

    let blank_username = NewUser {
        profile: UserProfile::Client(ClientProfile {
            username: "   ".to_string(),
            display_name: "Casey Ortiz".to_string(),
            email: "casey@example.net".to_string(),
            phone: "555-0101".to_string(),
        }),
        secret: "open-sesame".to_string(),
    };
    assert!(matches!(
        harness.market.register_user(blank_username),
        Err(IdentityError::MissingField("username"))
    ));
}

#[test]
fn freelancer_signups_feed_the_directory() {
    let harness = build_market();
    harness
        .market
        .register_user(freelancer_signup("finley", "web development"))
        .expect("freelancer signup");

    let found = harness
        .market
        .search_freelancers("finley")
        .expect("search runs");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].specialization, "web development");
}
