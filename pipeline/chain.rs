use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    capability::{MotionSolver, PlanStage, RequestAdapter},
    lifecycle::CancellationToken,
    request::PlanningProblem,
    scene::SceneSnapshot,
    solution::PlanSolution,
};

struct SolverStage {
    solver: Arc<dyn MotionSolver>,
}

impl PlanStage for SolverStage {
    fn invoke(
        &self,
        scene: &SceneSnapshot,
        problem: PlanningProblem,
        cancel: &CancellationToken,
    ) -> PlanSolution {
        self.solver.solve(scene, &problem, cancel)
    }
}

struct AdapterStage {
    adapter: Arc<dyn RequestAdapter>,
    inner: Arc<dyn PlanStage>,
}

impl PlanStage for AdapterStage {
    fn invoke(
        &self,
        scene: &SceneSnapshot,
        problem: PlanningProblem,
        cancel: &CancellationToken,
    ) -> PlanSolution {
        self.adapter
            .adapt(scene, problem, self.inner.as_ref(), cancel)
    }
}

/// Ordered nesting of request adapters around one solver.
///
/// The nesting is folded once at construction: the first configured adapter
/// is outermost, so its pre-processing runs first and its post-processing
/// runs last. Execution always yields a solution; a panicking stage is
/// caught at this boundary and reported as a failure.
pub struct AdapterChain {
    entry: Arc<dyn PlanStage>,
    solver_name: String,
    adapter_names: Vec<String>,
}

impl fmt::Debug for AdapterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterChain")
            .field("solver", &self.solver_name)
            .field("adapters", &self.adapter_names)
            .finish()
    }
}

impl AdapterChain {
    /// Composes the adapters (outermost first) around the solver.
    #[must_use]
    pub fn new(solver: Arc<dyn MotionSolver>, adapters: Vec<Arc<dyn RequestAdapter>>) -> Self {
        let solver_name = solver.name().to_string();
        let adapter_names = adapters
            .iter()
            .map(|adapter| adapter.name().to_string())
            .collect();
        let mut entry: Arc<dyn PlanStage> = Arc::new(SolverStage { solver });
        for adapter in adapters.into_iter().rev() {
            entry = Arc::new(AdapterStage {
                adapter,
                inner: entry,
            });
        }
        Self {
            entry,
            solver_name,
            adapter_names,
        }
    }

    /// Runs the composed chain, stamping the elapsed planning time.
    #[must_use]
    pub fn solve(
        &self,
        scene: &SceneSnapshot,
        problem: PlanningProblem,
        cancel: &CancellationToken,
    ) -> PlanSolution {
        let started = Instant::now();
        let mut solution =
            catch_unwind(AssertUnwindSafe(|| self.entry.invoke(scene, problem, cancel)))
                .unwrap_or_else(|payload| {
                    PlanSolution::failure(format!(
                        "planning stage panicked: {}",
                        panic_message(payload.as_ref())
                    ))
                });
        solution.planning_time = started.elapsed().as_secs_f64();
        solution
    }

    /// Identifier of the backing solver.
    #[must_use]
    pub fn solver_name(&self) -> &str {
        &self.solver_name
    }

    /// Identifiers of the composed adapters, outermost first.
    #[must_use]
    pub fn adapter_names(&self) -> &[String] {
        &self.adapter_names
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload.downcast_ref::<&str>().copied().unwrap_or_else(|| {
        payload
            .downcast_ref::<String>()
            .map_or("opaque panic payload", String::as_str)
    })
}
