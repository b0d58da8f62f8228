//! Job-code derivation.
//!
//! The prefix is the uppercased initial of each word in the job
//! position name ("Senior Software Engineer" becomes "SSE"); the
//! suffix is the per-prefix counter value, zero-padded to three
//! digits ("SSE001").

/// Uppercased initials of each whitespace-separated word.
pub fn derive_prefix(job_position_name: &str) -> String {
    job_position_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Prefix plus the counter value zero-padded to three digits. Counts
/// past 999 keep their full width rather than wrapping.
pub fn format_job_code(prefix: &str, count: u64) -> String {
    format!("{prefix}{count:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_uppercased_initials() {
        assert_eq!(derive_prefix("Senior Software Engineer"), "SSE");
        assert_eq!(derive_prefix("data analyst"), "DA");
        assert_eq!(derive_prefix("Intern"), "I");
    }

    #[test]
    fn prefix_ignores_extra_whitespace() {
        assert_eq!(derive_prefix("  Quality   Assurance  Engineer "), "QAE");
        assert_eq!(derive_prefix(""), "");
    }

    #[test]
    fn job_code_is_zero_padded() {
        assert_eq!(format_job_code("SSE", 1), "SSE001");
        assert_eq!(format_job_code("SSE", 42), "SSE042");
        assert_eq!(format_job_code("SSE", 1000), "SSE1000");
    }
}
