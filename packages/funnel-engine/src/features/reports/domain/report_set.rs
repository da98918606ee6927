//! Result tables of one pipeline run

use serde::Serialize;

use super::rows::*;
use crate::config::ReportKind;
use crate::features::lineage::JoinStats;

/// One result table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportTable {
    FunnelSteps(Vec<FunnelStepRow>),
    FunnelByDimensions(Vec<FunnelDimensionRow>),
    FunnelByAgeRange(Vec<AgeRangeFunnelRow>),
    GeneralFunnel(Vec<GeneralFunnelRow>),
    PlatformDistribution(Vec<PlatformDistributionRow>),
    ApprovedRideAverages(Vec<ApprovedRideAveragesRow>),
    CancelWaitHistogram(Vec<CancelWaitRow>),
    FunnelByPlatform(Vec<PlatformFunnelRow>),
}

impl ReportTable {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::FunnelSteps(_) => ReportKind::FunnelSteps,
            Self::FunnelByDimensions(_) => ReportKind::FunnelByDimensions,
            Self::FunnelByAgeRange(_) => ReportKind::FunnelByAgeRange,
            Self::GeneralFunnel(_) => ReportKind::GeneralFunnel,
            Self::PlatformDistribution(_) => ReportKind::PlatformDistribution,
            Self::ApprovedRideAverages(_) => ReportKind::ApprovedRideAverages,
            Self::CancelWaitHistogram(_) => ReportKind::CancelWaitHistogram,
            Self::FunnelByPlatform(_) => ReportKind::FunnelByPlatform,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::FunnelSteps(rows) => rows.len(),
            Self::FunnelByDimensions(rows) => rows.len(),
            Self::FunnelByAgeRange(rows) => rows.len(),
            Self::GeneralFunnel(rows) => rows.len(),
            Self::PlatformDistribution(rows) => rows.len(),
            Self::ApprovedRideAverages(rows) => rows.len(),
            Self::CancelWaitHistogram(rows) => rows.len(),
            Self::FunnelByPlatform(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every table produced by a run, in configured order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSet {
    tables: Vec<ReportTable>,
    /// Present when the run built the lineage table
    pub join_stats: Option<JoinStats>,
}

impl ReportSet {
    pub fn new(tables: Vec<ReportTable>, join_stats: Option<JoinStats>) -> Self {
        Self { tables, join_stats }
    }

    pub fn get(&self, kind: ReportKind) -> Option<&ReportTable> {
        self.tables.iter().find(|t| t.kind() == kind)
    }

    pub fn tables(&self) -> &[ReportTable] {
        &self.tables
    }

    pub fn kinds(&self) -> Vec<ReportKind> {
        self.tables.iter().map(ReportTable::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn general_funnel(&self) -> Option<&[GeneralFunnelRow]> {
        match self.get(ReportKind::GeneralFunnel)? {
            ReportTable::GeneralFunnel(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn funnel_steps(&self) -> Option<&[FunnelStepRow]> {
        match self.get(ReportKind::FunnelSteps)? {
            ReportTable::FunnelSteps(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn platform_distribution(&self) -> Option<&[PlatformDistributionRow]> {
        match self.get(ReportKind::PlatformDistribution)? {
            ReportTable::PlatformDistribution(rows) => Some(rows),
            _ => None,
        }
    }
}
