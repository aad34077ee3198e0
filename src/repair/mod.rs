//! Deterministic repair of generated source files
//!
//! Generated code tends to repeat the same handful of mistakes. Each mistake is
//! covered by one [`FixRule`]; [`RepairEngine`] runs them in a fixed order. Rules
//! are pure text rewrites: they never fail and leave content they do not
//! recognise untouched.

pub mod app_root;
pub mod circular;
pub mod engine;
pub mod imports;
pub mod renames;
pub mod router;
pub mod rule;
pub mod scan;
pub mod theme;

pub use engine::RepairEngine;
pub use rule::FixRule;

use std::sync::OnceLock;

/// Repairs one file with the default rule set
pub fn repair(content: &str, path: &str) -> String {
    static ENGINE: OnceLock<RepairEngine> = OnceLock::new();
    ENGINE.get_or_init(RepairEngine::new).repair(content, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_router_access_becomes_instance_call() {
        let out = repair(
            "GoRouter get r => AppRouter.router;\n",
            "lib/screens/home_screen.dart",
        );
        assert!(out.contains("AppRouter().router"));
        assert!(!out.contains("AppRouter.router"));
    }

    #[test]
    fn test_clean_file_unchanged() {
        let input = "int add(int a, int b) => a + b;\n";
        assert_eq!(repair(input, "lib/util.dart"), input);
    }
}
