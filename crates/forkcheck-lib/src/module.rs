//! Test modules and how they are resolved
//!
//! A module lives at `root/<suite>/<basename><suffix>` and exposes some
//! subset of three entry points. The reserved `setup` module supplies
//! `setup_env`/`teardown_env`; every other module supplies `test`.
//!
//! Entry points are compiled into the runner binary and registered in a
//! [`Registry`], a dispatch table keyed by suite and basename. The module
//! file on disk marks that the module exists and fixes the discovery order;
//! resolving it needs both the file and the registration.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::context::{Ctx, Fixture};
use crate::error::{HarnessError, HarnessResult};
use crate::trampoline::Outcome;

/// Basename of the module that owns a suite's fixture
pub const SETUP_MODULE: &str = "setup";

/// Default module file suffix
pub const DEFAULT_SUFFIX: &str = ".tst";

/// Signature shared by all three entry points
pub type EntryPoint = fn(&mut Ctx, &mut Fixture) -> Outcome;

/// The named entry points a module may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    SetupEnv,
    TeardownEnv,
    Test,
}

impl Capability {
    pub fn symbol(&self) -> &'static str {
        match self {
            Capability::SetupEnv => "setup_env",
            Capability::TeardownEnv => "teardown_env",
            Capability::Test => "test",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A loaded module: one optional function per capability
#[derive(Clone, Copy, Default)]
pub struct Module {
    setup_env: Option<EntryPoint>,
    teardown_env: Option<EntryPoint>,
    test: Option<EntryPoint>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `setup` module exposing both fixture entry points
    pub fn fixture(setup_env: EntryPoint, teardown_env: EntryPoint) -> Self {
        Self::new()
            .with_setup_env(setup_env)
            .with_teardown_env(teardown_env)
    }

    /// An ordinary test module
    pub fn test(test: EntryPoint) -> Self {
        Self::new().with_test(test)
    }

    pub fn with_setup_env(mut self, f: EntryPoint) -> Self {
        self.setup_env = Some(f);
        self
    }

    pub fn with_teardown_env(mut self, f: EntryPoint) -> Self {
        self.teardown_env = Some(f);
        self
    }

    pub fn with_test(mut self, f: EntryPoint) -> Self {
        self.test = Some(f);
        self
    }

    pub fn exposes(&self, capability: Capability) -> bool {
        self.lookup(capability).is_some()
    }

    fn lookup(&self, capability: Capability) -> Option<EntryPoint> {
        match capability {
            Capability::SetupEnv => self.setup_env,
            Capability::TeardownEnv => self.teardown_env,
            Capability::Test => self.test,
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exposed: Vec<&str> = [Capability::SetupEnv, Capability::TeardownEnv, Capability::Test]
            .iter()
            .filter(|c| self.exposes(**c))
            .map(Capability::symbol)
            .collect();
        f.debug_struct("Module").field("exposes", &exposed).finish()
    }
}

/// A module bound to the path it was loaded from
#[derive(Debug, Clone)]
pub struct LoadedModule {
    path: PathBuf,
    module: Module,
}

impl LoadedModule {
    pub fn new(path: impl Into<PathBuf>, module: Module) -> Self {
        Self {
            path: path.into(),
            module,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve an entry point, failing with `CapabilityMissing` when absent
    pub fn resolve(&self, capability: Capability) -> HarnessResult<EntryPoint> {
        self.module
            .lookup(capability)
            .ok_or_else(|| HarnessError::CapabilityMissing {
                path: self.path.clone(),
                capability,
            })
    }
}

/// Path of a module by convention: `root/suite/basename<suffix>`
pub fn module_path(root: &Path, suite: &str, basename: &str, suffix: &str) -> PathBuf {
    root.join(suite).join(format!("{}{}", basename, suffix))
}

/// Turns a module path into a loaded module.
pub trait ModuleLoader {
    fn load(&self, suite: &str, basename: &str, path: &Path) -> HarnessResult<LoadedModule>;
}

/// Modules of one suite, keyed by basename
#[derive(Debug, Clone, Default)]
pub struct SuiteModules {
    modules: BTreeMap<String, Module>,
}

impl SuiteModules {
    /// Register the suite's `setup` module
    pub fn setup(&mut self, setup_env: EntryPoint, teardown_env: EntryPoint) -> &mut Self {
        self.module(SETUP_MODULE, Module::fixture(setup_env, teardown_env))
    }

    /// Register an ordinary test module
    pub fn test(&mut self, basename: &str, test: EntryPoint) -> &mut Self {
        self.module(basename, Module::test(test))
    }

    /// Register a module with an arbitrary capability set
    pub fn module(&mut self, basename: &str, module: Module) -> &mut Self {
        self.modules.insert(basename.to_string(), module);
        self
    }

    pub fn get(&self, basename: &str) -> Option<&Module> {
        self.modules.get(basename)
    }
}

/// Compile-time dispatch table of every module the runner knows
#[derive(Debug, Clone, Default)]
pub struct Registry {
    suites: BTreeMap<String, SuiteModules>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the module table of `name`
    pub fn suite(&mut self, name: &str) -> &mut SuiteModules {
        self.suites.entry(name.to_string()).or_default()
    }

    pub fn lookup(&self, suite: &str, basename: &str) -> Option<&Module> {
        self.suites.get(suite).and_then(|s| s.get(basename))
    }
}

impl ModuleLoader for Registry {
    fn load(&self, suite: &str, basename: &str, path: &Path) -> HarnessResult<LoadedModule> {
        if !path.is_file() {
            return Err(HarnessError::ModuleLoad {
                path: path.to_path_buf(),
                reason: "no such module file".to_string(),
            });
        }

        let module = self
            .lookup(suite, basename)
            .ok_or_else(|| HarnessError::ModuleLoad {
                path: path.to_path_buf(),
                reason: format!("no module `{}` registered for suite `{}`", basename, suite),
            })?;

        Ok(LoadedModule::new(path, *module))
    }
}
