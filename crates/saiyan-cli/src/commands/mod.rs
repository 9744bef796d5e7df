pub mod data;
pub mod decay;
pub mod history;
pub mod ki;
pub mod status;
pub mod supplement;
pub mod train;

use saiyan_core::Category;

pub(crate) fn parse_category(value: &str) -> Option<Category> {
    let normalized = value.to_lowercase().replace(['-', '_'], " ");
    match normalized.trim() {
        "upper body" | "upperbody" | "upper" | "ub" => Some(Category::UpperBody),
        "core" => Some(Category::Core),
        "lower body" | "lowerbody" | "lower" | "lb" => Some(Category::LowerBody),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_category_accepts_common_spellings() {
        assert_eq!(parse_category("upper-body"), Some(Category::UpperBody));
        assert_eq!(parse_category("Upper Body"), Some(Category::UpperBody));
        assert_eq!(parse_category("CORE"), Some(Category::Core));
        assert_eq!(parse_category("lb"), Some(Category::LowerBody));
        assert_eq!(parse_category("arms"), None);
    }
}
