//! Result records produced by a prune run

use serde::Serialize;
use std::fmt;

/// A version whose delete call failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionFailure {
    pub version: String,
    pub error: String,
}

/// Outcome of pruning one deployed function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneResult {
    pub lambda_name: String,
    pub function_name: String,
    /// Number of versions deleted (or that would be deleted in a dry run)
    pub deleted: usize,
    pub deleted_versions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<VersionFailure>,
}

impl PruneResult {
    pub fn new(function_name: impl Into<String>, lambda_name: impl Into<String>) -> Self {
        Self {
            lambda_name: lambda_name.into(),
            function_name: function_name.into(),
            deleted: 0,
            deleted_versions: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A unit that could not be pruned at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub function_name: String,
    pub lambda_name: String,
    pub error: String,
}

/// Results for one region, in unit derivation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub region: String,
    pub results: Vec<PruneResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<UnitFailure>,
}

impl RegionReport {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn total_deleted(&self) -> usize {
        self.results.iter().map(|r| r.deleted).sum()
    }

    pub fn result_for(&self, lambda_name: &str) -> Option<&PruneResult> {
        self.results.iter().find(|r| r.lambda_name == lambda_name)
    }
}

/// A failure anywhere in the run, flattened for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunFailure {
    pub region: String,
    pub function_name: String,
    pub lambda_name: String,
    pub version: Option<String>,
    pub error: String,
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(
                f,
                "{} {} ({}) version {}: {}",
                self.region, self.function_name, self.lambda_name, version, self.error
            ),
            None => write!(
                f,
                "{} {} ({}): {}",
                self.region, self.function_name, self.lambda_name, self.error
            ),
        }
    }
}

/// Region to results mapping for a whole run, in region visit order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub regions: Vec<RegionReport>,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            regions: Vec::new(),
        }
    }

    /// Record a finished region; a region is recorded at most once
    pub fn insert(&mut self, report: RegionReport) {
        debug_assert!(self.region(&report.region).is_none());
        self.regions.push(report);
    }

    pub fn region(&self, region: &str) -> Option<&RegionReport> {
        self.regions.iter().find(|r| r.region == region)
    }

    pub fn total_deleted(&self) -> usize {
        self.regions.iter().map(RegionReport::total_deleted).sum()
    }

    /// Every unit and version failure across all regions
    pub fn failures(&self) -> Vec<RunFailure> {
        let mut failures = Vec::new();
        for region in &self.regions {
            for unit in &region.failures {
                failures.push(RunFailure {
                    region: region.region.clone(),
                    function_name: unit.function_name.clone(),
                    lambda_name: unit.lambda_name.clone(),
                    version: None,
                    error: unit.error.clone(),
                });
            }
            for result in &region.results {
                for version in &result.failures {
                    failures.push(RunFailure {
                        region: region.region.clone(),
                        function_name: result.function_name.clone(),
                        lambda_name: result.lambda_name.clone(),
                        version: Some(version.version.clone()),
                        error: version.error.clone(),
                    });
                }
            }
        }
        failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures().is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run {
            "would be deleted"
        } else {
            "deleted"
        };

        writeln!(f, "------------------------")?;
        if self.dry_run {
            writeln!(f, "Dry run, nothing was deleted. Planned prune per region: ")?;
        } else {
            writeln!(
                f,
                "Successfully pruned the following functions in the following regions: "
            )?;
        }
        for region in &self.regions {
            writeln!(f, "{} ------------------------", region.region)?;
            for result in &region.results {
                writeln!(
                    f,
                    "  {} ({}): {} versions {}",
                    result.function_name, result.lambda_name, result.deleted, verb
                )?;
            }
        }

        let failures = self.failures();
        if !failures.is_empty() {
            writeln!(f, "Failed to prune {} item(s):", failures.len())?;
            for failure in failures {
                writeln!(f, "  {}", failure)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(function: &str, lambda: &str, deleted: usize) -> PruneResult {
        PruneResult {
            deleted,
            deleted_versions: (1..=deleted).map(|v| v.to_string()).collect(),
            ..PruneResult::new(function, lambda)
        }
    }

    fn sample() -> RunReport {
        let mut report = RunReport::new(false);
        let mut east = RegionReport::new("us-east-1");
        east.results.push(result("checkout", "shop-checkout", 2));
        east.results.push(result("cart", "shop-cart", 0));
        report.insert(east);

        let mut west = RegionReport::new("eu-west-1");
        let mut partial = result("checkout", "shop-checkout", 1);
        partial.failures.push(VersionFailure {
            version: "4".into(),
            error: "ResourceConflictException".into(),
        });
        west.results.push(partial);
        west.failures.push(UnitFailure {
            function_name: "cart".into(),
            lambda_name: "shop-cart".into(),
            error: "AccessDenied".into(),
        });
        report.insert(west);
        report
    }

    #[test]
    fn test_renders_one_line_per_unit() {
        let mut report = RunReport::new(false);
        let mut east = RegionReport::new("us-east-1");
        east.results.push(result("checkout", "shop-checkout", 2));
        report.insert(east);

        let text = report.to_string();
        assert!(text.contains("Successfully pruned the following functions"));
        assert!(text.contains("us-east-1 ------------------------"));
        assert!(text.contains("  checkout (shop-checkout): 2 versions deleted"));
        assert!(!text.contains("Failed"));
    }

    #[test]
    fn test_totals_and_lookup() {
        let report = sample();
        assert_eq!(report.total_deleted(), 3);
        assert_eq!(report.region("us-east-1").unwrap().total_deleted(), 2);
        assert!(report.region("ap-south-1").is_none());
        assert_eq!(
            report
                .region("us-east-1")
                .unwrap()
                .result_for("shop-cart")
                .unwrap()
                .deleted,
            0
        );
    }

    #[test]
    fn test_failures_are_aggregated_across_regions() {
        let report = sample();
        let failures = report.failures();

        assert!(report.has_failures());
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].version, None);
        assert_eq!(failures[0].lambda_name, "shop-cart");
        assert_eq!(failures[1].version.as_deref(), Some("4"));
        assert!(report.to_string().contains("Failed to prune 2 item(s):"));
    }

    #[test]
    fn test_dry_run_wording() {
        let mut report = RunReport::new(true);
        let mut east = RegionReport::new("us-east-1");
        east.results.push(result("checkout", "shop-checkout", 3));
        report.insert(east);

        let text = report.to_string();
        assert!(text.contains("Dry run"));
        assert!(text.contains("3 versions would be deleted"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["regions"][0]["region"], "us-east-1");
        assert_eq!(json["regions"][0]["results"][0]["deleted"], 2);
        // Empty failure lists are omitted
        assert!(json["regions"][0].get("failures").is_none());
        assert_eq!(json["regions"][1]["failures"][0]["error"], "AccessDenied");
    }
}
