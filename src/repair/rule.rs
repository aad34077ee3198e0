//! Fix rule abstraction

/// A deterministic text rewrite addressing one class of known generation defect
///
/// Implementations must be idempotent (`apply(apply(x)) == apply(x)`) and return
/// the input unchanged when their precondition does not match.
pub trait FixRule: Send + Sync {
    /// Stable name used in logs
    fn name(&self) -> &'static str;

    /// Whether the rule is meaningful for the file at `path`
    fn applies_to(&self, path: &str) -> bool {
        is_dart(path)
    }

    fn apply(&self, content: &str, path: &str) -> String;
}

pub fn is_dart(path: &str) -> bool {
    path.ends_with(".dart")
}

/// File name component of a forward-slash path
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
