//! Standalone field syntax predicates used by settings and inline checks.
//! They are not part of the submission rule chain.

use std::sync::LazyLock;

use regex::Regex;

static PROJECT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid project name pattern"));

// [0-9] rather than \d: \d matches any Unicode digit
static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid time pattern")
});

/// Project names are ASCII letters, digits, hyphens and underscores only.
pub fn validate_project_name(project_name: &str) -> bool {
    PROJECT_NAME_PATTERN.is_match(project_name)
}

/// 24-hour "HH:MM" with zero-padded hour and minute.
pub fn validate_time(time: &str) -> bool {
    TIME_PATTERN.is_match(time)
}
