//! Structured Reference String management
//!
//! Handles locating, loading and caching the SRS shared by every prove and
//! verify call in the process. The SRS is established once and then only
//! read. Checking whether it already covers a circuit runs alongside
//! in-flight proofs; replacing it takes the write lock and therefore waits
//! for them to finish.

use circuit::CircuitBytecode;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::backend_message;
use crate::{ProverError, ProvingBackend, Result};

/// Where the SRS is cached when no explicit path is given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrsConfig {
    /// Directory holding the cached SRS
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// File name of the cached SRS inside `cache_dir`
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache/srs")
}

fn default_file_name() -> String {
    "srs.local".to_string()
}

impl SrsConfig {
    /// Create a new SRS configuration
    pub fn new(cache_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Get path to the cached SRS file
    pub fn default_path(&self) -> PathBuf {
        self.cache_dir.join(&self.file_name)
    }
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            file_name: default_file_name(),
        }
    }
}

/// Source the current SRS was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrsLocation {
    /// Path supplied by the caller
    Explicit(PathBuf),
    /// File found at the configured default location
    Cached(PathBuf),
    /// Downloaded by the engine because nothing was cached
    Fetched,
}

/// Established SRS and the number of points it provides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrsHandle {
    /// Largest circuit size (in points) the SRS supports
    pub capacity: u32,
    /// Where the SRS came from
    pub location: SrsLocation,
    /// Digest of the bytecode the SRS was set up for
    pub circuit_digest: String,
}

impl SrsHandle {
    /// Whether a circuit needing `required` points fits
    pub fn supports(&self, required: u32) -> bool {
        self.capacity >= required
    }
}

/// Lifecycle state of the shared SRS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrsState {
    /// Nothing set up; prove and verify fail fast
    Uninitialized,
    /// An SRS of `capacity` points is loaded
    Ready { capacity: u32 },
}

/// Process-wide SRS holder with single-writer/many-reader access
#[derive(Debug, Default)]
pub struct SrsManager {
    config: SrsConfig,
    current: RwLock<Option<SrsHandle>>,
}

impl SrsManager {
    /// Create a manager with no SRS loaded
    pub fn new(config: SrsConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
        }
    }

    /// Cache configuration
    pub fn config(&self) -> &SrsConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> SrsState {
        match self.current.read().as_ref() {
            Some(handle) => SrsState::Ready { capacity: handle.capacity },
            None => SrsState::Uninitialized,
        }
    }

    /// Copy of the current handle, if any
    pub fn handle(&self) -> Option<SrsHandle> {
        self.current.read().clone()
    }

    /// Make sure an SRS large enough for `bytecode` is loaded
    ///
    /// A no-op returning the existing handle when it already covers the
    /// circuit. Otherwise loads from `srs_path`, or from the default cache
    /// location, or lets the backend fetch one. An explicit `srs_path` must
    /// exist even when the loaded SRS is already large enough.
    pub fn ensure<B: ProvingBackend + ?Sized>(
        &self,
        backend: &B,
        bytecode: &CircuitBytecode,
        srs_path: Option<&Path>,
    ) -> Result<SrsHandle> {
        self.ensure_points(backend, bytecode, srs_path, 0)
    }

    /// Like [`ensure`](Self::ensure), with a lower bound on the point count
    pub fn ensure_points<B: ProvingBackend + ?Sized>(
        &self,
        backend: &B,
        bytecode: &CircuitBytecode,
        srs_path: Option<&Path>,
        min_points: u32,
    ) -> Result<SrsHandle> {
        if let Some(path) = srs_path {
            check_explicit(path)?;
        }

        let circuit_size = backend.circuit_size(bytecode).map_err(|e| {
            ProverError::SrsMissing(format!("unable to size circuit: {}", backend_message(&e)))
        })?;
        let required = circuit_size.max(min_points);

        // Readers keep running until a new SRS actually has to be installed.
        let current = self.current.upgradable_read();

        if let Some(handle) = current.as_ref() {
            if handle.supports(required) {
                tracing::debug!(
                    "SRS with {} points already covers {} required points",
                    handle.capacity,
                    required
                );
                return Ok(handle.clone());
            }
            tracing::info!(
                "SRS with {} points is too small for {} points, setting up again",
                handle.capacity,
                required
            );
        }

        let mut current = RwLockUpgradableReadGuard::upgrade(current);

        let (location, load_path) = self.resolve(srs_path);
        tracing::info!(
            "Setting up SRS for circuit {} ({} points) from {:?}",
            bytecode.digest(),
            required,
            location
        );

        let capacity = backend
            .setup_srs(bytecode, load_path.as_deref())
            .map_err(|e| ProverError::SrsMissing(format!("SRS setup failed: {}", backend_message(&e))))?;

        if capacity < required {
            tracing::warn!("SRS provides {} points, circuit needs {}", capacity, required);
            return Err(ProverError::SrsTooSmall {
                required,
                available: capacity,
            });
        }

        let handle = SrsHandle {
            capacity,
            location,
            circuit_digest: bytecode.digest(),
        };
        *current = Some(handle.clone());

        tracing::info!("SRS ready with {} points", capacity);
        Ok(handle)
    }

    /// Run `f` while holding the SRS for reading
    ///
    /// Fails with `SrsMissing` when nothing is loaded and `SrsTooSmall` when
    /// the loaded SRS cannot hold `required` points. No setup is attempted.
    pub fn with_ready<T>(&self, required: u32, f: impl FnOnce(&SrsHandle) -> Result<T>) -> Result<T> {
        let current = self.current.read();
        let handle = current.as_ref().ok_or_else(|| {
            ProverError::SrsMissing("no SRS has been set up; call setup_srs first".to_string())
        })?;
        if !handle.supports(required) {
            return Err(ProverError::SrsTooSmall {
                required,
                available: handle.capacity,
            });
        }
        f(handle)
    }

    /// Drop the current SRS; the next prove or verify fails until set up again
    pub fn invalidate(&self) {
        if self.current.write().take().is_some() {
            tracing::info!("SRS invalidated");
        }
    }

    fn resolve(&self, srs_path: Option<&Path>) -> (SrsLocation, Option<PathBuf>) {
        if let Some(path) = srs_path {
            return (SrsLocation::Explicit(path.to_path_buf()), Some(path.to_path_buf()));
        }

        let cached = self.config.default_path();
        if cached.is_file() {
            return (SrsLocation::Cached(cached.clone()), Some(cached));
        }

        tracing::info!("No SRS cached at {:?}, fetching", cached);
        (SrsLocation::Fetched, None)
    }
}

fn check_explicit(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ProverError::SrsMissing(format!("no SRS file at {}", path.display())))
    }
}
