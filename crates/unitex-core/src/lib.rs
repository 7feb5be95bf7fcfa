// unitex-core: vocabulary shared by the file gateway, the pipeline
// orchestrator, and the command-line tools.

pub mod enums;
pub mod error;
pub mod record;

pub use error::{Result, UnitexError};

/// Prefix that routes a path to the in-memory virtual filesystem.
///
/// Any path starting with this string lives in the virtual namespace; every
/// other path is a disk path. The gateway and the orchestrator both rely on
/// this exact value, and so does the native toolkit.
pub const VFS_PREFIX: &str = "$:";

/// Returns `true` if `path` addresses the virtual namespace.
#[inline]
pub fn is_virtual(path: &str) -> bool {
    path.starts_with(VFS_PREFIX)
}

/// Prefix `path` with [`VFS_PREFIX`] unless it is already virtual.
pub fn virtualize(path: &str) -> String {
    if is_virtual(path) {
        path.to_string()
    } else {
        format!("{VFS_PREFIX}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_prefix_detection() {
        assert!(is_virtual("$:corpus/foo.snt"));
        assert!(!is_virtual("corpus/foo.snt"));
        assert!(!is_virtual("/tmp/$:foo"));
    }

    #[test]
    fn virtualize_is_idempotent() {
        assert_eq!(virtualize("corpus/foo.txt"), "$:corpus/foo.txt");
        assert_eq!(virtualize("$:corpus/foo.txt"), "$:corpus/foo.txt");
    }
}
