use super::domain::{Complexity, ServiceCategory};

/// Validation failures raised while pricing a request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("hours must be a positive number, got {0}")]
    InvalidHours(f64),
    #[error("unrecognized complexity '{0}'")]
    UnknownComplexity(String),
}

/// Parse a complexity label from the boundary. Unlike service categories,
/// an unrecognized complexity is rejected rather than defaulted.
pub fn parse_complexity(label: &str) -> Result<Complexity, PricingError> {
    match label.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(Complexity::Low),
        "medium" => Ok(Complexity::Medium),
        "high" => Ok(Complexity::High),
        other => Err(PricingError::UnknownComplexity(other.to_string())),
    }
}

/// Quote a price: base hourly rate for the category, times hours, times the
/// complexity multiplier. Pure; the result keeps full precision and callers
/// round for display.
///
/// For a fixed category the quote is strictly increasing in hours and in
/// complexity rank (low < medium < high), because every rate and multiplier
/// is positive.
pub fn quote(
    service: ServiceCategory,
    complexity: Complexity,
    hours: f64,
) -> Result<f64, PricingError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(PricingError::InvalidHours(hours));
    }
    Ok(service.hourly_rate() * hours * complexity.multiplier())
}
