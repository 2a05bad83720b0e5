use dining_core::DiningStatus;

/// Activity level at or above which an open venue is reported as busy.
pub const BUSY_THRESHOLD: u8 = 70;

/// Maps extracted signals to a status.
///
/// Precedence: a label mentioning "closed" wins outright; then a high
/// activity level makes the venue busy; then a label mentioning "open".
/// Without a label the result is always [`DiningStatus::Unknown`], whatever
/// the activity level says.
#[must_use]
pub fn classify(label: Option<&str>, activity_level: Option<u8>) -> DiningStatus {
    let Some(label) = label else {
        return DiningStatus::Unknown;
    };

    let normalized = label.to_lowercase();
    if normalized.contains("closed") {
        return DiningStatus::Closed;
    }
    if activity_level.is_some_and(|level| level >= BUSY_THRESHOLD) {
        return DiningStatus::Busy;
    }
    if normalized.contains("open") {
        return DiningStatus::Open;
    }
    DiningStatus::Unknown
}
