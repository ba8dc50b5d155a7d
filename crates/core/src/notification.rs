//! Request-scoped failure notifications.
//!
//! Services report bad input by recording notifications instead of returning
//! errors. A fresh [`Notifier`] is created for every request and dropped with
//! it; callers inspect [`Notifier::has_notifications`] to decide the response.

use serde::Serialize;

use crate::validation::ValidationResult;

/// A human-readable failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Notifier {
    notifications: Vec<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    /// Consume the notifier, keeping only the message text.
    pub fn into_messages(self) -> Vec<String> {
        self.notifications.into_iter().map(|n| n.message).collect()
    }
}

/// Run `validate` against `entity`, recording one notification per violation.
///
/// Returns `true` when the entity passed and the caller may go ahead.
pub fn run_validation<T>(
    notifier: &mut Notifier,
    entity: &T,
    validate: impl FnOnce(&T) -> ValidationResult,
) -> bool {
    let result = validate(entity);
    if result.is_valid {
        return true;
    }
    for violation in result.errors {
        notifier.handle(Notification::new(violation.message));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldViolation;

    #[test]
    fn new_notifier_is_empty() {
        let notifier = Notifier::new();
        assert!(!notifier.has_notifications());
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn handled_notifications_are_kept_in_order() {
        let mut notifier = Notifier::new();
        notifier.handle(Notification::new("first"));
        notifier.handle(Notification::new("second"));

        assert!(notifier.has_notifications());
        assert_eq!(notifier.into_messages(), vec!["first", "second"]);
    }

    #[test]
    fn run_validation_passes_without_notifying() {
        let mut notifier = Notifier::new();
        let passed = run_validation(&mut notifier, &(), |_| ValidationResult {
            is_valid: true,
            errors: vec![],
        });
        assert!(passed);
        assert!(!notifier.has_notifications());
    }

    #[test]
    fn run_validation_records_each_violation() {
        let mut notifier = Notifier::new();
        let passed = run_validation(&mut notifier, &(), |_| ValidationResult {
            is_valid: false,
            errors: vec![
                FieldViolation {
                    field: "Title".into(),
                    message: "bad title".into(),
                },
                FieldViolation {
                    field: "Summary".into(),
                    message: "bad summary".into(),
                },
            ],
        });
        assert!(!passed);
        assert_eq!(notifier.into_messages(), vec!["bad title", "bad summary"]);
    }
}
