//! Core traits and shared vocabulary for PALNS.

use rand::Rng;
use std::fmt;

/// Error type returned by destroy and repair operators.
///
/// Operators report failures as boxed errors; the engine wraps them in
/// [`PalnsError::Operator`] together with the operator's name and stops
/// the search.
pub type OperatorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A candidate solution to the optimization problem.
///
/// The engine treats solutions as opaque values: it only ever evaluates
/// the objective, clones them, and hands them to operators. Cloning must
/// produce an independent deep copy; mutating the clone must not affect
/// the original.
pub trait Solution: Clone + Send {
    /// The objective value of this solution. Lower is better.
    fn objective(&self) -> f64;
}

/// Defines a PALNS optimization problem.
///
/// The user implements the construction heuristic that produces the
/// initial solution; destroy and repair operators are provided
/// separately.
///
/// # Examples
///
/// ```ignore
/// struct TspProblem { distances: Vec<Vec<f64>> }
///
/// impl PalnsProblem for TspProblem {
///     type Solution = Tour;
///
///     fn initial_solution<R: Rng>(&self, rng: &mut R) -> Tour {
///         Tour::nearest_neighbor(&self.distances, rng)
///     }
/// }
/// ```
pub trait PalnsProblem {
    /// The solution representation type.
    type Solution: Solution;

    /// Builds the initial solution. Called once, on the caller's thread,
    /// before any worker starts.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;
}

/// A destroy operator removes or perturbs part of a solution.
///
/// Destroy operators partially disassemble a solution to create room for
/// improvement during the repair phase. How much is destroyed, and how,
/// is entirely the operator's business. Operators must not reach into
/// engine state; they read their input and return a new solution.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 2
pub trait DestroyOperator<S>: Send + Sync {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Destroys part of the solution, returning the partial result.
    fn destroy<R: Rng>(&self, solution: &S, rng: &mut R) -> Result<S, OperatorError>;
}

/// A repair operator reconstructs a (partially destroyed) solution.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 2
pub trait RepairOperator<S>: Send + Sync {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Repairs a partially destroyed solution into a complete one.
    fn repair<R: Rng>(&self, solution: &S, rng: &mut R) -> Result<S, OperatorError>;
}

/// Outcome of a single destroy/repair iteration.
///
/// Variants are declared in ascending order of merit, so the derived
/// `Ord` ranks `Rejected < Accepted < Improved < NewBest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// The candidate was worse and the annealing draw discarded it.
    Rejected,
    /// The candidate was worse (or equal) but accepted by the annealing
    /// criterion; it replaced the incumbent.
    Accepted,
    /// The candidate improved on the incumbent.
    Improved,
    /// The candidate improved on the best solution seen so far.
    NewBest,
}

/// Errors surfaced by the engine.
#[derive(Debug)]
pub enum PalnsError {
    /// A configuration parameter is out of range, or an operator set is
    /// empty. Raised before any worker starts.
    InvalidConfig(String),
    /// A destroy or repair operator failed. The search terminates and the
    /// original failure is returned; no best solution is reported.
    Operator {
        /// Name of the failing operator.
        name: String,
        /// The operator's own error.
        source: OperatorError,
    },
}

impl PalnsError {
    pub(crate) fn operator(name: &str, source: OperatorError) -> Self {
        Self::Operator {
            name: name.to_string(),
            source,
        }
    }
}

impl fmt::Display for PalnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(message) => write!(f, "invalid configuration: {message}"),
            Self::Operator { name, source } => write!(f, "operator `{name}` failed: {source}"),
        }
    }
}

impl std::error::Error for PalnsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Operator { source, .. } => {
                let source: &(dyn std::error::Error + 'static) = source.as_ref();
                Some(source)
            }
        }
    }
}
