//! Case specifications and comparison report types.

use crate::adapter::{SolveResult, SolveStatus};
use crate::network::{FeasibilityReport, InstanceConfig};
use std::fmt;

/// Size of one comparison case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseSpec {
    pub name: String,
    pub node_count: usize,
    /// Target number of directed edges.
    pub edge_count: usize,
    pub commodity_count: usize,
}

impl CaseSpec {
    pub fn new(
        name: impl Into<String>,
        node_count: usize,
        edge_count: usize,
        commodity_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            node_count,
            edge_count,
            commodity_count,
        }
    }

    /// Instance configuration for this case.
    pub fn instance_config(&self, max_capacity: i64, seed: u64) -> InstanceConfig {
        InstanceConfig::new(self.node_count, self.edge_count, self.commodity_count)
            .with_max_capacity(max_capacity)
            .with_seed(seed)
    }
}

/// Both engines' results on one case.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseComparison {
    pub case: CaseSpec,
    pub feasibility: FeasibilityReport,
    pub ip: SolveResult,
    pub cp: SolveResult,
    /// `cp_elapsed / ip_elapsed`, when IP is optimal and took measurable time.
    pub relative_speedup: Option<f64>,
    /// `(cp − ip) / ip × 100`, when both engines report an objective.
    pub quality_gap_percent: Option<f64>,
}

impl CaseComparison {
    /// Assembles a comparison and derives the speedup and quality gap.
    pub fn new(
        case: CaseSpec,
        feasibility: FeasibilityReport,
        ip: SolveResult,
        cp: SolveResult,
    ) -> Self {
        let relative_speedup = (ip.status == SolveStatus::Optimal
            && ip.elapsed_seconds > 0.0)
            .then(|| cp.elapsed_seconds / ip.elapsed_seconds);
        let quality_gap_percent = match (ip.objective, cp.objective) {
            (Some(ip_obj), Some(cp_obj)) => quality_gap(ip_obj, cp_obj),
            _ => None,
        };
        Self {
            case,
            feasibility,
            ip,
            cp,
            relative_speedup,
            quality_gap_percent,
        }
    }

    /// IP proved optimality and CP either found nothing or was slower.
    pub fn ip_wins(&self) -> bool {
        self.ip.status == SolveStatus::Optimal
            && (!self.cp.status.is_solved() || self.ip.elapsed_seconds < self.cp.elapsed_seconds)
    }

    /// CP found a solution and IP either did not prove optimality or was slower.
    pub fn cp_wins(&self) -> bool {
        self.cp.status.is_solved()
            && (self.ip.status != SolveStatus::Optimal
                || self.cp.elapsed_seconds < self.ip.elapsed_seconds)
    }
}

/// Relative gap of `cp_obj` over `ip_obj` in percent.
///
/// A zero IP objective yields `Some(0.0)` if CP matches it and `None`
/// otherwise.
pub(crate) fn quality_gap(ip_obj: f64, cp_obj: f64) -> Option<f64> {
    if ip_obj == 0.0 {
        (cp_obj == 0.0).then_some(0.0)
    } else {
        Some((cp_obj - ip_obj) / ip_obj * 100.0)
    }
}

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseOutcome {
    Compared(Box<CaseComparison>),
    Failed { name: String, reason: String },
}

impl CaseOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Compared(c) => &c.case.name,
            Self::Failed { name, .. } => name,
        }
    }

    pub fn comparison(&self) -> Option<&CaseComparison> {
        match self {
            Self::Compared(c) => Some(c),
            Self::Failed { .. } => None,
        }
    }
}

/// Counters over all cases of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportSummary {
    pub total: usize,
    /// Cases where IP proved optimality.
    pub ip_optimal: usize,
    /// Cases where CP found any solution.
    pub cp_solved: usize,
    pub ip_wins: usize,
    pub cp_wins: usize,
    /// Cases that could not be compared.
    pub failed: usize,
}

impl ReportSummary {
    pub fn from_outcomes(outcomes: &[CaseOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.comparison() {
                Some(c) => {
                    summary.ip_optimal +=
                        usize::from(c.ip.status == SolveStatus::Optimal);
                    summary.cp_solved += usize::from(c.cp.status.is_solved());
                    summary.ip_wins += usize::from(c.ip_wins());
                    summary.cp_wins += usize::from(c.cp_wins());
                }
                None => summary.failed += 1,
            }
        }
        summary
    }
}

/// Ordered outcomes of a run plus summary counters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonReport {
    pub outcomes: Vec<CaseOutcome>,
    pub summary: ReportSummary,
}

impl ComparisonReport {
    pub fn new(outcomes: Vec<CaseOutcome>) -> Self {
        let summary = ReportSummary::from_outcomes(&outcomes);
        Self { outcomes, summary }
    }

    /// Comparison for the case named `name`, if it was compared.
    pub fn case(&self, name: &str) -> Option<&CaseComparison> {
        self.outcomes
            .iter()
            .find(|o| o.name() == name)
            .and_then(CaseOutcome::comparison)
    }
}

fn write_result(f: &mut fmt::Formatter<'_>, label: &str, result: &SolveResult) -> fmt::Result {
    write!(f, "{label}: {} in {:.3}s", result.status, result.elapsed_seconds)?;
    if let Some(objective) = result.objective {
        write!(f, ", cost {objective}")?;
    }
    let info: Vec<String> = result
        .diagnostics
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    if !info.is_empty() {
        write!(f, " [{}]", info.join(", "))?;
    }
    writeln!(f)
}

impl fmt::Display for CaseComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let case = &self.case;
        writeln!(f, "{} Problem:", case.name)?;
        writeln!(
            f,
            "Nodes: {}, Edges: {}, Commodities: {}",
            case.node_count, self.feasibility.edge_count, case.commodity_count
        )?;
        writeln!(f, "{}", "-".repeat(40))?;
        write!(
            f,
            "Total edge capacity: {}, Total flow needed: {}",
            self.feasibility.total_capacity, self.feasibility.total_flow_needed
        )?;
        match self.feasibility.capacity_ratio() {
            Some(ratio) => writeln!(f, " (ratio {ratio:.2})")?,
            None => writeln!(f)?,
        }

        let ip_optimal = self.ip.status == SolveStatus::Optimal;
        match (ip_optimal, self.cp.status.is_solved()) {
            (true, true) => {
                writeln!(
                    f,
                    "IP time: {:.3}s, CP time: {:.3}s",
                    self.ip.elapsed_seconds, self.cp.elapsed_seconds
                )?;
                if let Some(speedup) = self.relative_speedup {
                    let faster = if speedup > 1.0 { "IP faster" } else { "CP faster" };
                    writeln!(f, "Speedup (CP/IP): {speedup:.2}x ({faster})")?;
                }
                if let Some(gap) = self.quality_gap_percent {
                    writeln!(f, "Solution quality difference: {gap:.1}%")?;
                }
            }
            (true, false) => writeln!(
                f,
                "IP found optimal solution in {:.3}s, CP failed",
                self.ip.elapsed_seconds
            )?,
            (false, true) => writeln!(
                f,
                "CP found solution in {:.3}s, IP failed",
                self.cp.elapsed_seconds
            )?,
            (false, false) => writeln!(f, "Both solvers failed to find solutions")?,
        }
        write_result(f, "IP", &self.ip)?;
        write_result(f, "CP", &self.cp)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "MULTI-COMMODITY FLOW PROBLEM: IP vs CP COMPARISON")?;
        writeln!(f, "{rule}")?;

        for outcome in &self.outcomes {
            writeln!(f)?;
            match outcome {
                CaseOutcome::Compared(c) => write!(f, "{c}")?,
                CaseOutcome::Failed { name, reason } => {
                    writeln!(f, "{name} Problem:")?;
                    writeln!(f, "Case failed: {reason}")?;
                }
            }
        }

        let s = &self.summary;
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Integer Programming solved {}/{} cases optimally",
            s.ip_optimal, s.total
        )?;
        writeln!(f, "Constraint Programming solved {}/{} cases", s.cp_solved, s.total)?;
        writeln!(f, "IP was faster in {}/{} cases", s.ip_wins, s.total)?;
        writeln!(f, "CP was faster in {}/{} cases", s.cp_wins, s.total)?;
        if s.failed > 0 {
            writeln!(f, "{} case(s) failed", s.failed)?;
        }
        Ok(())
    }
}
