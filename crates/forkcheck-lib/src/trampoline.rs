//! Recoverable-failure boundary for test code
//!
//! A failing check writes a diagnostic to the current output sink and
//! returns an [`AssertionFailure`] from the enclosing entry point. The `?`
//! operator carries it up to the invocation's top level, where it becomes
//! the "assertion failed" status of that invocation. Nothing past the
//! invocation ever observes it.
//!
//! Diagnostics are written straight to the process's stdout handle so the
//! output capture sees them even when the host program buffers `print!`.
//!
//! # Example
//!
//! ```
//! use forkcheck_lib::{check_eq, check_some, Outcome};
//!
//! fn lookup(keys: &[&str], wanted: &str) -> Outcome<usize> {
//!     let index = check_some!(keys.iter().position(|k| *k == wanted));
//!     check_eq!(keys[index], wanted);
//!     Ok(index)
//! }
//!
//! assert_eq!(lookup(&["a", "b"], "b"), Ok(1));
//! ```

use std::fmt;
use std::io::{self, Write};

/// Result of any code running under a trampoline scope.
pub type Outcome<T = ()> = Result<T, AssertionFailure>;

/// Marker carried back to the trampoline scope by a failed check.
///
/// The diagnostic has already been written when this value exists; it only
/// records where the check was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    file: &'static str,
    line: u32,
    quiet: bool,
}

impl AssertionFailure {
    /// A failure whose diagnostic was emitted
    pub fn at(file: &'static str, line: u32) -> Self {
        Self {
            file,
            line,
            quiet: false,
        }
    }

    /// A failure raised without any diagnostic
    pub fn quiet(file: &'static str, line: u32) -> Self {
        Self {
            file,
            line,
            quiet: true,
        }
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assertion failed at {}:{}", self.file, self.line)
    }
}

impl std::error::Error for AssertionFailure {}

/// Write one diagnostic line in the harness format.
fn emit(file: &str, line: u32, message: fmt::Arguments<'_>) {
    diagnostic(format_args!("{}:{}: {}", file, line, message));
}

/// Write a diagnostic line that has no source location, such as a module
/// that could not be resolved.
pub fn diagnostic(message: fmt::Arguments<'_>) {
    let mut out = io::stdout().lock();
    // A failed write must not mask the failure being reported
    let _ = writeln!(out, " > {}", message);
    let _ = out.flush();
}

/// Report a false binary comparison.
///
/// Called by the `check_*` macros; prints both expressions as written, the
/// operator and both runtime values.
pub fn comparison_failed(
    file: &'static str,
    line: u32,
    lhs_expr: &str,
    op: &str,
    rhs_expr: &str,
    lhs: &dyn fmt::Debug,
    rhs: &dyn fmt::Debug,
) -> AssertionFailure {
    emit(
        file,
        line,
        format_args!(
            "assert({} {} {}) FAILED, {:?} {} {:?} is false",
            lhs_expr, op, rhs_expr, lhs, op, rhs
        ),
    );
    AssertionFailure::at(file, line)
}

/// Report a failed check described by a free-form message.
pub fn message_failed(file: &'static str, line: u32, message: fmt::Arguments<'_>) -> AssertionFailure {
    emit(file, line, message);
    AssertionFailure::at(file, line)
}

/// Informational line in the same format as diagnostics.
pub fn note(file: &'static str, line: u32, message: fmt::Arguments<'_>) {
    emit(file, line, message);
}

/// Compare two values with a binary operator, returning from the enclosing
/// function on failure.
#[macro_export]
macro_rules! check_cmp {
    ($lhs:expr, $op:tt, $rhs:expr) => {
        match (&$lhs, &$rhs) {
            (lhs, rhs) => {
                if !(*lhs $op *rhs) {
                    return ::core::result::Result::Err(
                        $crate::trampoline::comparison_failed(
                            file!(),
                            line!(),
                            stringify!($lhs),
                            stringify!($op),
                            stringify!($rhs),
                            lhs,
                            rhs,
                        )
                        .into(),
                    );
                }
            }
        }
    };
}

#[macro_export]
macro_rules! check_eq {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::check_cmp!($lhs, ==, $rhs)
    };
}

#[macro_export]
macro_rules! check_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::check_cmp!($lhs, !=, $rhs)
    };
}

#[macro_export]
macro_rules! check_lt {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::check_cmp!($lhs, <, $rhs)
    };
}

#[macro_export]
macro_rules! check_le {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::check_cmp!($lhs, <=, $rhs)
    };
}

#[macro_export]
macro_rules! check_gt {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::check_cmp!($lhs, >, $rhs)
    };
}

#[macro_export]
macro_rules! check_ge {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::check_cmp!($lhs, >=, $rhs)
    };
}

/// Check a boolean condition.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::trampoline::message_failed(
                    file!(),
                    line!(),
                    format_args!("assert({}) FAILED", stringify!($cond)),
                )
                .into(),
            );
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::trampoline::message_failed(
                    file!(),
                    line!(),
                    format_args!(
                        "assert({}) FAILED, {}",
                        stringify!($cond),
                        format_args!($($arg)+)
                    ),
                )
                .into(),
            );
        }
    };
}

/// Unwrap an `Option`, failing on `None`.
#[macro_export]
macro_rules! check_some {
    ($opt:expr $(,)?) => {
        match $opt {
            ::core::option::Option::Some(value) => value,
            ::core::option::Option::None => {
                return ::core::result::Result::Err(
                    $crate::trampoline::message_failed(
                        file!(),
                        line!(),
                        format_args!("assert({} != None) FAILED", stringify!($opt)),
                    )
                    .into(),
                );
            }
        }
    };
}

/// Unwrap a `Result`, failing with the error's debug form on `Err`.
#[macro_export]
macro_rules! check_ok {
    ($res:expr $(,)?) => {
        match $res {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err(err) => {
                return ::core::result::Result::Err(
                    $crate::trampoline::message_failed(
                        file!(),
                        line!(),
                        format_args!("assert({} is Ok) FAILED, got Err({:?})", stringify!($res), err),
                    )
                    .into(),
                );
            }
        }
    };
}

/// Fail without writing anything.
#[macro_export]
macro_rules! check_quiet {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::trampoline::AssertionFailure::quiet(file!(), line!()).into(),
            );
        }
    };
}

/// Print an informational line in diagnostic format.
#[macro_export]
macro_rules! note {
    ($($arg:tt)+) => {
        $crate::trampoline::note(file!(), line!(), format_args!($($arg)+))
    };
}
