// ABOUTME: Shared utility functions for Tutor
// ABOUTME: Row id generation

use uuid::Uuid;

/// Generate a unique row id (UUIDv4)
pub fn generate_row_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_ids_are_unique() {
        let a = generate_row_id();
        let b = generate_row_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
