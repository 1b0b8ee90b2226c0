use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity key for every user-facing record: the unique username.
///
/// Mailbox recipients, job posters, and acceptors are all matched on this key
/// alone; display names carry no identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier wrapper for posted jobs, assigned monotonically by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for mailbox entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for payment intents. Intents are ephemeral and live
/// only inside the payment processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId(pub u64);

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Service categories with fixed base hourly rates. Labels the catalogue does
/// not recognize fall back to [`ServiceCategory::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Web,
    Design,
    Content,
    General,
}

impl ServiceCategory {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "web" => Self::Web,
            "design" => Self::Design,
            "content" => Self::Content,
            _ => Self::General,
        }
    }

    pub const fn hourly_rate(self) -> f64 {
        match self {
            Self::Web => 50.0,
            Self::Design => 40.0,
            Self::Content => 30.0,
            Self::General => 20.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Design => "design",
            Self::Content => "content",
            Self::General => "general",
        }
    }
}

/// Declared task difficulty, mapping to a fixed price multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 1.5,
            Self::High => 2.5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Lifecycle status of a job. Transitions are strictly forward-only:
/// Open -> Accepted -> Paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Accepted,
    Paid,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Accepted => "accepted",
            Self::Paid => "paid",
        }
    }
}

/// A client-posted unit of work with a computed price.
///
/// `revision` is the optimistic concurrency token: every mutation bumps it by
/// one, and the ledger refuses a swap whose base revision is stale. `price`
/// is fixed at posting time; `accepted_by` is set exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub revision: u64,
    pub posted_by: UserId,
    pub service_type: ServiceCategory,
    pub complexity: Complexity,
    pub hours: f64,
    pub description: String,
    pub price: f64,
    pub status: JobStatus,
    pub accepted_by: Option<UserId>,
    pub posted_at: DateTime<Utc>,
}

impl Job {
    pub fn view(&self) -> JobView {
        JobView {
            id: self.id,
            posted_by: self.posted_by.clone(),
            service_type: self.service_type.label(),
            complexity: self.complexity.label(),
            hours: self.hours,
            description: self.description.clone(),
            price: round_to_cents(self.price),
            status: self.status.label(),
            accepted_by: self.accepted_by.clone(),
            posted_at: self.posted_at,
        }
    }
}

/// Fields of a job before the ledger has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    pub posted_by: UserId,
    pub service_type: ServiceCategory,
    pub complexity: Complexity,
    pub hours: f64,
    pub description: String,
    pub price: f64,
    pub posted_at: DateTime<Utc>,
}

/// Serialized representation of a job for API responses, with the price
/// rounded to cents for display.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub id: JobId,
    pub posted_by: UserId,
    pub service_type: &'static str,
    pub complexity: &'static str,
    pub hours: f64,
    pub description: String,
    pub price: f64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<UserId>,
    pub posted_at: DateTime<Utc>,
}

/// A mailbox entry. Ordering within an inbox is newest-first; the only
/// permitted mutation is flipping `paid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub title: String,
    pub body: String,
    pub actionable: bool,
    pub job_id: JobId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Fields of a notification before the ledger has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub recipient: UserId,
    pub title: String,
    pub body: String,
    pub actionable: bool,
    pub job_id: JobId,
    pub amount: Option<f64>,
    pub paid: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Role-tagged user profile so role-specific fields are never nullable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum UserProfile {
    Client(ClientProfile),
    Freelancer(FreelancerProfile),
}

impl UserProfile {
    pub fn id(&self) -> UserId {
        match self {
            Self::Client(profile) => UserId(profile.username.clone()),
            Self::Freelancer(profile) => UserId(profile.username.clone()),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Client(profile) => &profile.display_name,
            Self::Freelancer(profile) => &profile.display_name,
        }
    }

    pub const fn role_label(&self) -> &'static str {
        match self {
            Self::Client(_) => "client",
            Self::Freelancer(_) => "freelancer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreelancerProfile {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub rating: f32,
    pub specialization: String,
}

impl FreelancerProfile {
    /// Contact reference carried into acceptance notifications.
    pub fn contact_line(&self) -> String {
        format!("{} <{}> / {}", self.display_name, self.email, self.phone)
    }
}

/// Identity record: profile plus credential secret. Created at signup and
/// never deleted in-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub profile: UserProfile,
    pub secret: String,
}

impl UserAccount {
    pub fn id(&self) -> UserId {
        self.profile.id()
    }
}

/// Signup payload accepted by the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub profile: UserProfile,
    pub secret: String,
}

/// An in-flight payment authorization for one actionable notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentIntent {
    pub id: IntentId,
    pub job_id: JobId,
    pub notification_id: NotificationId,
    pub client: UserId,
    pub freelancer: UserId,
    pub amount: f64,
}

/// Outcome flag for payment confirmation. Repeat confirmations of the same
/// intent collapse to `AlreadySettled` instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Settled,
    AlreadySettled,
}

/// Result of a confirmation call, echoing the intent it settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub intent_id: IntentId,
    pub job_id: JobId,
    pub amount: f64,
    pub outcome: PaymentOutcome,
}

/// Round a full-precision price to cents for display. Quotes and job records
/// keep full precision internally.
pub fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
