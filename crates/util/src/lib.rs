//! Shared helpers for the LMS shell: on-disk stores, configuration,
//! debouncing, display formatting and id generation.

pub mod config;
pub mod debounce;
pub mod format;
pub mod path_processing;
pub mod preferences;
pub mod session_store;

pub use config::*;
pub use debounce::Debouncer;
pub use format::{DateStyle, format_date, format_file_size};
pub use path_processing::*;
pub use preferences::*;
pub use session_store::*;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Generates `<prefix>_<unix millis>_<9 base-36 chars>`.
///
/// The suffix falls back to the clock's sub-millisecond nanos when the OS
/// random source is unavailable.
pub fn generate_id(prefix: &str) -> String {
    let now = chrono::Utc::now();
    let mut bytes = [0u8; ID_SUFFIX_LEN];
    if getrandom::getrandom(&mut bytes).is_err() {
        let nanos = now.timestamp_subsec_nanos().to_le_bytes();
        for (index, byte) in bytes.iter_mut().enumerate() {
            *byte = nanos[index % nanos.len()].wrapping_add(index as u8 * 31);
        }
    }
    let suffix: String = bytes
        .iter()
        .map(|byte| ID_ALPHABET[*byte as usize % ID_ALPHABET.len()] as char)
        .collect();
    format!("{}_{}_{}", prefix, now.timestamp_millis(), suffix)
}

/// Returns a uniformly distributed value in `0.0..1.0`, or `None` when the OS
/// random source is unavailable.
pub fn random_unit() -> Option<f64> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).ok()?;
    Some((u64::from_le_bytes(bytes) >> 11) as f64 / (1u64 << 53) as f64)
}

/// Interprets common truthy spellings (`1`, `true`, `yes`, `on`).
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_prefix_timestamp_and_suffix() {
        let id = generate_id("user");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "user");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_id("c"), generate_id("c"));
    }

    #[test]
    fn random_unit_stays_in_range() {
        for _ in 0..100 {
            let value = random_unit().unwrap();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy(" Yes "));
        assert!(is_truthy("1"));
        assert!(!is_truthy("off"));
    }
}
