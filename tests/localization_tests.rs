//! # Localization Tests
//!
//! This module contains unit tests for the localization functionality,
//! testing message retrieval and formatting with various edge cases.

use orzu_dil_bot::localization::LocalizationManager;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        // Create a new localization manager for each test
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    #[test]
    fn test_get_message_existing_key() {
        let manager = setup_localization();

        let message = manager.get_message("button-open", None);
        assert_eq!(message, "Ochish • Открыть • Open");
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.get_message("nonexistent-key", None);
        assert!(message.starts_with("Missing translation:"));
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();

        let message = manager.get_message(
            "order-total",
            Some(&[("total", "125 000"), ("currency", "сум")]),
        );
        assert_eq!(message, "💰 <b>Сумма:</b> 125 000 сум");
    }

    #[test]
    fn test_get_message_missing_args() {
        let manager = setup_localization();

        // Missing arguments are reported by fluent but still produce text
        let message = manager.get_message("order-id", None);
        assert!(message.starts_with("🆔 <b>"));
    }

    #[test]
    fn test_custom_source() {
        let manager = LocalizationManager::from_source("en", "greeting = Hello, { $name }!")
            .expect("valid FTL");
        assert_eq!(
            manager.get_message("greeting", Some(&[("name", "Aziz")])),
            "Hello, Aziz!"
        );
    }

    #[test]
    fn test_invalid_source_is_rejected() {
        assert!(LocalizationManager::from_source("en", "= broken").is_err());
    }

    #[test]
    fn test_convenience_functions() {
        // Initialize the global localization manager for this test
        orzu_dil_bot::localization::init_localization().expect("Failed to initialize localization");

        let message = orzu_dil_bot::localization::t("access-denied");
        assert_eq!(message, "⛔️ Нет доступа.");

        let message_with_args =
            orzu_dil_bot::localization::t_args("order-comment", &[("value", "Без лука")]);
        assert_eq!(message_with_args, "💬 <b>Комментарий:</b> Без лука");
    }
}
