//! Pruning every target function within one region

use super::report::{RegionReport, UnitFailure};
use super::scheduler::BoundedScheduler;
use super::unit::{PruneUnit, UnitPruner};
use crate::config::{FunctionConfig, ProjectModel};
use crate::provider::RequestScope;
use tracing::{info, warn};

/// Fans a [`UnitPruner`] out over the deployed functions of a region
pub struct RegionOrchestrator<'a> {
    project: &'a dyn ProjectModel,
    pruner: UnitPruner<'a>,
    units: BoundedScheduler,
}

impl<'a> RegionOrchestrator<'a> {
    pub fn new(
        project: &'a dyn ProjectModel,
        pruner: UnitPruner<'a>,
        units: BoundedScheduler,
    ) -> Self {
        Self {
            project,
            pruner,
            units,
        }
    }

    /// Deployed names per function across the matching stages
    ///
    /// Stages that share a deployed name yield a single unit.
    pub fn derive_units(
        &self,
        region: &str,
        functions: &[FunctionConfig],
        stage_filter: Option<&str>,
    ) -> Vec<PruneUnit> {
        let mut units = Vec::new();
        for function in functions {
            let mut lambda_names: Vec<String> = Vec::new();
            for stage in self.project.stages() {
                if stage_filter.is_some_and(|wanted| wanted != stage.name) {
                    continue;
                }
                let lambda_name = self.project.deployed_name(function, &stage.name, region);
                if !lambda_names.contains(&lambda_name) {
                    lambda_names.push(lambda_name);
                }
            }
            units.extend(
                lambda_names
                    .into_iter()
                    .map(|lambda_name| PruneUnit::new(&function.name, lambda_name)),
            );
        }
        units
    }

    /// Prune all units of `functions` in `region`
    ///
    /// A unit that fails is recorded in the report's failures; the others
    /// still run.
    pub async fn prune_region(
        &self,
        region: &str,
        functions: &[FunctionConfig],
        stage_filter: Option<&str>,
    ) -> RegionReport {
        let units = self.derive_units(region, functions, stage_filter);
        info!("Pruning {} deployed functions in {}", units.len(), region);

        let scope = RequestScope::new(region, stage_filter.map(str::to_string));
        let scope = &scope;
        let pruner = self.pruner;
        let outcomes = self
            .units
            .run(units.clone(), move |unit: PruneUnit| async move {
                pruner.prune(scope, &unit).await
            })
            .await;

        let mut report = RegionReport::new(region);
        for (unit, outcome) in units.into_iter().zip(outcomes) {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(err) => {
                    warn!(
                        "Skipping {} ({}) in {}: {}",
                        unit.function_name, unit.lambda_name, region, err
                    );
                    report.failures.push(UnitFailure {
                        function_name: unit.function_name,
                        lambda_name: unit.lambda_name,
                        error: err.user_message(),
                    });
                }
            }
        }
        report
    }
}
