//! 迁移触发器
//!
//! 无状态的判定函数 + 向协作者的分发：当前利用率超过阈值即判定过载，
//! 过载时恰好调用一次 VM 选择策略；若无可行方案，恰好调用一次
//! 回退放置策略。返回的迁移对可能为空（无可行迁移）。

use tracing::{debug, info};

use crate::net::{HostId, VmId};

/// 一对迁移决定：把 `vm` 迁往 `target`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub vm: VmId,
    pub target: HostId,
}

/// 触发器的判定结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationDecision {
    NotOverloaded,
    /// 过载；迁移对可能为空（选择与回退都未找到可行迁移）。
    Migrate(Vec<Migration>),
}

/// VM 选择策略：给定过载主机上的 VM 与候选目标主机，
/// 返回零或多对 (VM, 目标主机)。
pub trait VmSelectionPolicy {
    fn select(&mut self, host: HostId, vms: &[VmId], candidates: &[HostId]) -> Vec<Migration>;
}

/// 主策略无可行方案时的回退放置策略。契约与选择策略相同。
pub trait FallbackPlacementPolicy {
    fn place(&mut self, host: HostId, vms: &[VmId], candidates: &[HostId]) -> Vec<Migration>;
}

/// 最简单的选择策略：第一台 VM 迁往第一个候选主机。
#[derive(Debug, Default)]
pub struct FirstVmSelection;

impl VmSelectionPolicy for FirstVmSelection {
    fn select(&mut self, _host: HostId, vms: &[VmId], candidates: &[HostId]) -> Vec<Migration> {
        match (vms.first(), candidates.first()) {
            (Some(&vm), Some(&target)) => vec![Migration { vm, target }],
            _ => Vec::new(),
        }
    }
}

/// 回退放置：逐个候选主机尝试，放下第一台 VM 即止。
#[derive(Debug, Default)]
pub struct FirstFitFallback;

impl FallbackPlacementPolicy for FirstFitFallback {
    fn place(&mut self, _host: HostId, vms: &[VmId], candidates: &[HostId]) -> Vec<Migration> {
        match (vms.first(), candidates.first()) {
            (Some(&vm), Some(&target)) => vec![Migration { vm, target }],
            _ => Vec::new(),
        }
    }
}

/// 无状态触发器。
#[derive(Debug, Default, Clone, Copy)]
pub struct MigrationTrigger;

impl MigrationTrigger {
    /// 纯判定：当前利用率严格超过阈值即过载。
    pub fn is_overloaded(&self, current: f64, threshold: f64) -> bool {
        current > threshold
    }

    /// 判定并分发：过载时调用选择策略一次；其结果为空再调用回退策略一次。
    pub fn evaluate(
        &self,
        host: HostId,
        vms: &[VmId],
        candidates: &[HostId],
        current: f64,
        threshold: f64,
        selection: &mut dyn VmSelectionPolicy,
        fallback: &mut dyn FallbackPlacementPolicy,
    ) -> MigrationDecision {
        if !self.is_overloaded(current, threshold) {
            return MigrationDecision::NotOverloaded;
        }

        info!(host = ?host, current, threshold, "⚠️  主机过载，评估迁移");

        let planned = selection.select(host, vms, candidates);
        if !planned.is_empty() {
            debug!(host = ?host, migrations = planned.len(), "选择策略给出迁移方案");
            return MigrationDecision::Migrate(planned);
        }

        let planned = fallback.place(host, vms, candidates);
        debug!(host = ?host, migrations = planned.len(), "回退策略结果");
        MigrationDecision::Migrate(planned)
    }
}
