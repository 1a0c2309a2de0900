//! Suite and test enumeration on disk
//!
//! Suites are the directories directly under the test root; tests are the
//! module files inside a suite directory. Both lists come back sorted so a
//! run's order never depends on the filesystem.

use log::{debug, warn};
use std::fs;
use std::path::{is_separator, Component, Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};
use crate::module::SETUP_MODULE;

/// One suite selected for a run, with its tests in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitePlan {
    pub name: String,
    pub tests: Vec<String>,
}

/// List the suite directories directly under `root`, sorted by name.
pub fn discover_suites(root: &Path) -> HarnessResult<Vec<String>> {
    let entries = fs::read_dir(root).map_err(|e| HarnessError::discovery(root, e))?;

    let mut suites = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| HarnessError::discovery(root, e))?;
        let path = entry.path();

        // stat, not lstat: a symlink to a directory is a suite
        let metadata = fs::metadata(&path).map_err(|e| HarnessError::discovery(&path, e))?;
        if !metadata.is_dir() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => suites.push(name),
            Err(name) => warn!("Skipping suite with non UTF-8 name: {:?}", name),
        }
    }

    suites.sort();
    debug!("Discovered {} suite(s) under {:?}", suites.len(), root);
    Ok(suites)
}

/// List the test modules of a suite directory, sorted, with `suffix`
/// stripped and the reserved `setup` module left out.
pub fn discover_tests(suite_path: &Path, suffix: &str) -> HarnessResult<Vec<String>> {
    let entries = fs::read_dir(suite_path).map_err(|e| HarnessError::discovery(suite_path, e))?;

    let mut tests = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| HarnessError::discovery(suite_path, e))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            warn!("Skipping test with non UTF-8 name: {:?}", file_name);
            continue;
        };

        if let Some(basename) = test_basename(name, suffix) {
            if entry.path().is_dir() {
                continue;
            }
            tests.push(basename.to_string());
        }
    }

    tests.sort();
    debug!("Discovered {} test(s) in {:?}", tests.len(), suite_path);
    Ok(tests)
}

/// Basename of a test module file name, or `None` when the name is not a
/// test module (wrong suffix, nothing before the suffix, or `setup`).
fn test_basename<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let basename = name.strip_suffix(suffix)?;
    if basename.is_empty() || basename == SETUP_MODULE {
        return None;
    }
    Some(basename)
}

/// Which suites a run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every suite directory under the root, sorted
    All,
    /// Exactly these suites, in this order
    Named(Vec<String>),
}

/// Check that a suite named on the command line is a single path
/// component, so it can only name an entry directly under the root.
fn check_suite_name(name: &str) -> HarnessResult<()> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(is_separator) {
        return Err(HarnessError::Argument(format!("Invalid suite name: {:?}", name)));
    }
    Ok(())
}

/// Build the run plan: the selected suites, each with its discovered tests.
///
/// All enumeration happens here, before anything runs, so a bad suite name
/// stops the run before any setup executes.
pub fn plan_run(root: &Path, selection: &Selection, suffix: &str) -> HarnessResult<Vec<SuitePlan>> {
    let names = match selection {
        Selection::All => discover_suites(root)?,
        Selection::Named(names) => {
            for name in names {
                check_suite_name(name)?;
            }
            names.clone()
        }
    };

    names
        .into_iter()
        .map(|name| {
            let suite_path: PathBuf = root.join(&name);
            let tests = discover_tests(&suite_path, suffix)?;
            Ok(SuitePlan { name, tests })
        })
        .collect()
}
