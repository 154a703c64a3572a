pub mod validation;

/// Collapses internal whitespace and trims, mirroring how the domain layer
/// normalizes free-text fields before persistence.
pub fn normalize_ws(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
