//! Router singleton call canonicalization

use super::rule::FixRule;
use regex::Regex;
use std::sync::OnceLock;

/// Rewrites the static `AppRouter.router` misuse into the instance call
/// `AppRouter().router`
pub struct RouterInstanceRule;

impl FixRule for RouterInstanceRule {
    fn name(&self) -> &'static str {
        "router_instance"
    }

    fn apply(&self, content: &str, _path: &str) -> String {
        static STATIC_CALL: OnceLock<Regex> = OnceLock::new();
        let re = STATIC_CALL
            .get_or_init(|| Regex::new(r"\bAppRouter\.router\b").expect("Invalid router regex"));
        re.replace_all(content, "AppRouter().router").into_owned()
    }
}
