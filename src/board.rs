//! Board variant identification.

use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

const DMI_ROOT: &str = "/sys/class/dmi/id";
const SYS_VENDOR: &str = "TUXEDO";
const BOARD_VENDOR: &str = "NB05";
const UNKNOWN_BOARD: &str = "unknown";

/// Product SKUs the resolver recognises.
pub const KNOWN_SKUS: &[&str] = &["PULSE1403", "PULSE1404", "IFLX14I01"];

/// Opaque identifier of the running board variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardIdentity(Arc<str>);

impl BoardIdentity {
    /// Create an identity from a product identifier.
    pub fn new(ident: impl AsRef<str>) -> Self {
        Self(Arc::from(ident.as_ref()))
    }

    /// Identity used when no known board could be matched.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_BOARD)
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the running board's identity.
///
/// Resolution is infallible: implementations fall back to
/// [`BoardIdentity::unknown`] instead of failing.
pub trait BoardResolver: Send + Sync {
    /// Identify the running board.
    fn resolve(&self) -> BoardIdentity;
}

impl<T: BoardResolver + ?Sized> BoardResolver for Arc<T> {
    fn resolve(&self) -> BoardIdentity {
        (**self).resolve()
    }
}

/// A resolver that always reports the same board.
#[derive(Debug, Clone)]
pub struct StaticResolver(BoardIdentity);

impl StaticResolver {
    /// Always resolve to `ident`.
    pub fn new(ident: impl AsRef<str>) -> Self {
        Self(BoardIdentity::new(ident))
    }
}

impl BoardResolver for StaticResolver {
    fn resolve(&self) -> BoardIdentity {
        self.0.clone()
    }
}

/// Resolves the board from the firmware's DMI tables exposed in sysfs.
///
/// Every [`resolve`](BoardResolver::resolve) re-reads sysfs; wrap it in
/// [`CachedResolver`] before handing it to a controller.
#[derive(Debug, Clone)]
pub struct DmiResolver {
    root: PathBuf,
}

impl DmiResolver {
    /// Read DMI data from `/sys/class/dmi/id`.
    pub fn new() -> Self {
        Self::with_root(DMI_ROOT)
    }

    /// Read DMI data from a different directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether the running board is one of [`KNOWN_SKUS`].
    pub fn is_supported(&self) -> bool {
        self.match_board().is_some()
    }

    fn match_board(&self) -> Option<BoardIdentity> {
        let field = |name: &str| read_field(&self.root, name);

        let sys_vendor = field("sys_vendor")?;
        let board_vendor = field("board_vendor")?;
        let sku = field("product_sku")?;
        debug!(
            "dmi: sys_vendor='{}', board_vendor='{}', sku='{}'",
            sys_vendor, board_vendor, sku
        );

        if !sys_vendor.contains(SYS_VENDOR) || !board_vendor.contains(BOARD_VENDOR) {
            return None;
        }
        KNOWN_SKUS
            .iter()
            .find(|known| sku.contains(*known))
            .map(BoardIdentity::new)
    }
}

impl Default for DmiResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardResolver for DmiResolver {
    fn resolve(&self) -> BoardIdentity {
        match self.match_board() {
            Some(board) => {
                debug!("found model '{}'", board);
                board
            }
            None => {
                debug!("no known board in {}, using default", self.root.display());
                BoardIdentity::unknown()
            }
        }
    }
}

fn read_field(root: &Path, name: &str) -> Option<String> {
    match fs::read_to_string(root.join(name)) {
        Ok(value) => Some(value.trim().to_owned()),
        Err(e) => {
            debug!("dmi: cannot read {}: {}", name, e);
            None
        }
    }
}

/// Resolves once through the inner resolver and reuses the result.
pub struct CachedResolver<R> {
    inner: R,
    cached: OnceLock<BoardIdentity>,
}

impl<R: BoardResolver> CachedResolver<R> {
    /// Wrap `inner`; the first [`resolve`](BoardResolver::resolve) call is forwarded.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cached: OnceLock::new(),
        }
    }
}

impl<R: BoardResolver> BoardResolver for CachedResolver<R> {
    fn resolve(&self) -> BoardIdentity {
        self.cached.get_or_init(|| self.inner.resolve()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn fake_dmi(sys_vendor: &str, board_vendor: &str, sku: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sys_vendor"), format!("{sys_vendor}\n")).unwrap();
        fs::write(tmp.path().join("board_vendor"), format!("{board_vendor}\n")).unwrap();
        fs::write(tmp.path().join("product_sku"), format!("{sku}\n")).unwrap();
        tmp
    }

    #[test]
    fn test_dmi_known_board() {
        let tmp = fake_dmi("TUXEDO", "NB05", "IFLX14I01");
        let resolver = DmiResolver::with_root(tmp.path());
        assert!(resolver.is_supported());
        assert_eq!(resolver.resolve().as_str(), "IFLX14I01");
    }

    #[test]
    fn test_dmi_wrong_vendor_falls_back() {
        let tmp = fake_dmi("Other Corp", "NB05", "PULSE1403");
        let resolver = DmiResolver::with_root(tmp.path());
        assert!(!resolver.is_supported());
        assert_eq!(resolver.resolve(), BoardIdentity::unknown());
    }

    #[test]
    fn test_dmi_missing_files_fall_back() {
        let tmp = TempDir::new().unwrap();
        let resolver = DmiResolver::with_root(tmp.path());
        assert_eq!(resolver.resolve(), BoardIdentity::unknown());
    }

    struct Counting(AtomicUsize);

    impl BoardResolver for Counting {
        fn resolve(&self) -> BoardIdentity {
            self.0.fetch_add(1, Ordering::SeqCst);
            BoardIdentity::new("PULSE1404")
        }
    }

    #[test]
    fn test_cached_resolver_resolves_once() {
        let cached = CachedResolver::new(Counting(AtomicUsize::new(0)));
        assert_eq!(cached.resolve().as_str(), "PULSE1404");
        assert_eq!(cached.resolve().as_str(), "PULSE1404");
        assert_eq!(cached.inner.0.load(Ordering::SeqCst), 1);
    }
}
