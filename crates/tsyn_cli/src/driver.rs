//! Reading and processing input files on a rayon pool.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

/// Worker stack size. Deeply nested input recurses once per level in the
/// parser, up to the configured nesting limit.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// One input file and what `work` made of it.
#[derive(Debug)]
pub struct FileResult<T> {
    pub path: PathBuf,
    pub outcome: Result<Processed<T>, io::Error>,
}

#[derive(Debug)]
pub struct Processed<T> {
    pub source: String,
    pub output: T,
}

impl<T> FileResult<T> {
    /// The path as shown in reports.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Read every path and run `work` on its text, in parallel. Results come
/// back in input order.
pub fn process_files<T, F>(
    paths: &[PathBuf],
    jobs: Option<usize>,
    work: F,
) -> Result<Vec<FileResult<T>>, rayon::ThreadPoolBuildError>
where
    T: Send,
    F: Fn(&str) -> T + Sync,
{
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(WORKER_STACK_SIZE);
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build()?;
    tracing::debug!(threads = pool.current_num_threads(), files = paths.len(), "starting workers");

    Ok(pool.install(|| {
        paths
            .par_iter()
            .map(|path| FileResult {
                path: path.clone(),
                outcome: process_one(path, &work),
            })
            .collect()
    }))
}

fn process_one<T>(path: &Path, work: impl Fn(&str) -> T) -> Result<Processed<T>, io::Error> {
    let source = std::fs::read_to_string(path)?;
    let start = Instant::now();
    let output = work(&source);
    tracing::trace!(
        file = %path.display(),
        bytes = source.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "processed"
    );
    Ok(Processed { source, output })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_keep_input_order() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        let paths = vec![dir.join("valid.ts"), dir.join("missing.ts"), dir.join("broken.ts")];
        let results = process_files(&paths, Some(2), |source| source.len()).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].display_name().ends_with("valid.ts"));
        assert!(results[0].outcome.is_ok());
        assert_eq!(
            results[1].outcome.as_ref().unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        let broken = results[2].outcome.as_ref().unwrap();
        assert_eq!(broken.output, broken.source.len());
    }
}
