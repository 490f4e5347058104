//! Conversion facade: single units, JSON documents and parallel batches.
//!
//! Each unit gets its own converter and builder stack, so batches need no
//! shared mutable state.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::canonical::CanonicalTree;
use crate::config::TreeGenConfig;
use crate::convert::convert;
use crate::core::Result;
use crate::native::NativeTree;

/// Entry point for callers that convert more than one tree or read them from disk.
#[derive(Debug, Clone, Default)]
pub struct TreeGenerator {
    config: TreeGenConfig,
}

impl TreeGenerator {
    pub fn new(config: TreeGenConfig) -> Self { Self { config } }

    pub fn config(&self) -> &TreeGenConfig { &self.config }

    /// Convert one native tree.
    pub fn generate(&self, tree: &NativeTree) -> Result<CanonicalTree> { convert(tree) }

    /// Load a native JSON document and convert it. Unknown kinds fail at load time.
    pub fn generate_from_json(&self, json: &str) -> Result<CanonicalTree> {
        let tree = NativeTree::from_json(json)?;
        self.generate(&tree)
    }

    /// Read a native JSON dump from disk and convert it.
    pub fn generate_file(&self, path: &Path) -> Result<CanonicalTree> {
        let json = std::fs::read_to_string(path)?;
        self.generate_from_json(&json)
    }

    /// Convert every tree in parallel; results keep input order and one
    /// failing unit does not affect the others.
    pub fn generate_many(&self, trees: &[NativeTree]) -> Vec<Result<CanonicalTree>> {
        self.in_pool(|| trees.par_iter().map(convert).collect())
    }

    /// Parallel conversion of native JSON dumps on disk.
    pub fn generate_files(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<CanonicalTree>)> {
        let results: Vec<_> = self.in_pool(|| {
            paths
                .par_iter()
                .map(|path| {
                    let result = self.generate_file(path);
                    if let Err(e) = &result {
                        warn!("{}: {}", path.display(), e);
                    }
                    (path.clone(), result)
                })
                .collect()
        });
        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        info!("Converted {} file(s), {} failed", results.len() - failed, failed);
        results
    }

    fn in_pool<T: Send>(&self, job: impl FnOnce() -> T + Send) -> T {
        let threads = self.config.parallel.threads;
        if threads == 0 {
            return job();
        }
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => {
                debug!("Using {} worker threads", threads);
                pool.install(job)
            }
            Err(e) => {
                warn!("Failed to build a {}-thread pool ({}), using the global pool", threads, e);
                job()
            }
        }
    }
}
