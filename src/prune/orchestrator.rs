//! Top-level prune run: request validation and the per-region loop

use super::region::RegionOrchestrator;
use super::report::RunReport;
use super::retry::ThrottleRetry;
use super::scheduler::BoundedScheduler;
use super::unit::UnitPruner;
use crate::config::{FunctionConfig, ProjectModel, PruneSettings};
use crate::error::{ErrorCode, PruneError};
use crate::provider::LambdaProvider;
use indicatif::ProgressBar;
use tracing::{debug, info};

/// What the user asked to prune
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneRequest {
    /// Function names given explicitly
    pub names: Vec<String>,
    /// Prune every function of the project
    pub all: bool,
    pub region: Option<String>,
    pub stage: Option<String>,
    /// Overrides the project's `keep` setting
    pub keep_count: Option<usize>,
    /// Report what would be deleted without deleting
    pub dry_run: bool,
    /// Functions implied by the working directory, used when nothing else selects
    pub context_functions: Vec<String>,
}

impl PruneRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_all(mut self) -> Self {
        self.all = true;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_keep_count(mut self, keep_count: usize) -> Self {
        self.keep_count = Some(keep_count);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_context_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_functions = names.into_iter().map(Into::into).collect();
        self
    }
}

/// A validated request: the functions and regions a run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunePlan {
    pub functions: Vec<FunctionConfig>,
    pub regions: Vec<String>,
    pub keep_count: usize,
}

/// Runs a prune request against a project and a provider
pub struct PruneOrchestrator<'a> {
    project: &'a dyn ProjectModel,
    provider: &'a dyn LambdaProvider,
    settings: PruneSettings,
    progress: ProgressBar,
}

impl<'a> PruneOrchestrator<'a> {
    pub fn new(
        project: &'a dyn ProjectModel,
        provider: &'a dyn LambdaProvider,
        settings: PruneSettings,
    ) -> Self {
        Self {
            project,
            provider,
            settings,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress through `progress`, one message per region
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Validate `request` and resolve its functions and regions
    ///
    /// Issues no provider calls.
    pub fn plan(&self, request: &PruneRequest) -> Result<PrunePlan, PruneError> {
        let stages = self.project.stages();
        if stages.is_empty() {
            return Err(PruneError::config_with_code(
                ErrorCode::CONFIG_NO_STAGES,
                "No existing stages in the project",
            ));
        }

        if let Some(stage) = &request.stage {
            if !stages.iter().any(|s| &s.name == stage) {
                return Err(PruneError::config_with_code(
                    ErrorCode::CONFIG_UNKNOWN_STAGE,
                    format!("Stage \"{}\" doesn't exist in your project", stage),
                ));
            }
        }

        if let Some(region) = &request.region {
            if !self.provider.is_valid_region(region) {
                return Err(PruneError::config_with_code(
                    ErrorCode::CONFIG_INVALID_REGION,
                    "Invalid region specified",
                ));
            }
        }

        let functions = self.resolve_functions(request)?;
        let regions = match &request.region {
            Some(region) => vec![region.clone()],
            None => self.all_regions(),
        };

        Ok(PrunePlan {
            functions,
            regions,
            keep_count: request.keep_count.unwrap_or(self.settings.keep),
        })
    }

    fn resolve_functions(&self, request: &PruneRequest) -> Result<Vec<FunctionConfig>, PruneError> {
        let functions = if !request.names.is_empty() {
            let mut selected: Vec<FunctionConfig> = Vec::new();
            for name in &request.names {
                let function = self.project.function(name).ok_or_else(|| {
                    PruneError::config_with_code(
                        ErrorCode::CONFIG_UNKNOWN_FUNCTION,
                        format!("Function \"{}\" doesn't exist in your project", name),
                    )
                })?;
                if !selected.iter().any(|f| f.name == function.name) {
                    selected.push(function.clone());
                }
            }
            selected
        } else if request.all {
            self.project.functions().to_vec()
        } else {
            request
                .context_functions
                .iter()
                .filter_map(|name| self.project.function(name))
                .cloned()
                .collect()
        };

        if functions.is_empty() {
            return Err(PruneError::config_with_code(
                ErrorCode::CONFIG_NO_FUNCTIONS,
                "You don't have any functions in your project",
            ));
        }
        Ok(functions)
    }

    /// Regions of every stage, in first-seen order
    fn all_regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = Vec::new();
        for stage in self.project.stages() {
            for region in self.project.regions(&stage.name) {
                if !regions.contains(&region) {
                    regions.push(region);
                }
            }
        }
        regions
    }

    /// Prune the requested functions, one region at a time
    pub async fn run(&self, request: &PruneRequest) -> Result<RunReport, PruneError> {
        let plan = self.plan(request)?;
        info!(
            "Pruning specified functions in the following regions: {}",
            plan.regions.join(", ")
        );

        let pruner = UnitPruner::new(
            self.provider,
            ThrottleRetry::new(self.settings.throttle_delay),
            BoundedScheduler::new(self.settings.delete_concurrency),
            plan.keep_count,
            request.dry_run,
        );
        let regional = RegionOrchestrator::new(
            self.project,
            pruner,
            BoundedScheduler::new(self.settings.unit_concurrency),
        );

        let mut report = RunReport::new(request.dry_run);
        for region in &plan.regions {
            self.progress.set_message(format!("Pruning functions in {}", region));
            let region_report = regional
                .prune_region(region, &plan.functions, request.stage.as_deref())
                .await;
            report.insert(region_report);
        }
        self.progress.finish_and_clear();

        debug!(
            "Prune finished: {} versions across {} regions",
            report.total_deleted(),
            plan.regions.len()
        );
        Ok(report)
    }
}
