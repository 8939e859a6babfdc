//! Shared utility functions

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a human-facing order number: `ORD-YYYYMMDD-XXXXXX`
pub fn generate_order_number() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
    let date = chrono::Utc::now().format("%Y%m%d");
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("ORD-{date}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_shape() {
        let n = generate_order_number();
        assert!(n.starts_with("ORD-"));
        let parts: Vec<&str> = n.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_order_numbers_differ() {
        assert_ne!(generate_order_number(), generate_order_number());
    }
}
