//! 数据中心场景描述
//!
//! 以 JSON 描述一次仿真：拓扑形状、VM 放置、流量与迁移参数。
//! 由 CLI 读取并校验后构建仿真世界。

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatacenterSpec {
    pub schema_version: u32,
    pub topology: TopologySpec,
    pub vms: Vec<VmSpec>,
    #[serde(default)]
    pub flows: Vec<FlowSpec>,
    #[serde(default)]
    pub migration: Option<MigrationSpec>,
}

/// 三层树形拓扑形状：1 个根交换机、`pods` 个汇聚交换机、
/// 每个汇聚下 `edges_per_pod` 个边缘交换机、每个边缘下 `hosts_per_edge` 台主机。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySpec {
    pub pods: usize,
    pub edges_per_pod: usize,
    pub hosts_per_edge: usize,
    /// 边缘交换机端口数上限（默认 4），`hosts_per_edge` 不得超过它。
    #[serde(default)]
    pub edge_ports: Option<usize>,
    #[serde(default)]
    pub edge_downlink_bps: Option<u64>,
    #[serde(default)]
    pub agg_downlink_bps: Option<u64>,
    #[serde(default)]
    pub root_downlink_bps: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmSpec {
    pub id: u64,
    /// 主机全局索引（按拓扑构建顺序编号）。
    pub host: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSpec {
    pub sender_vm: u64,
    pub receiver_vm: u64,
    #[serde(default = "default_pkt_bytes")]
    pub pkt_bytes: u64,
    #[serde(default = "default_pkts")]
    pub pkts: u64,
    /// 两个 packet 注入间隔（微秒）。
    #[serde(default = "default_gap_us")]
    pub gap_us: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSpec {
    /// 安全系数：动态阈值 = 1 − safety × IQR。
    pub safety: f64,
    /// 历史不足时回退的静态阈值。
    pub static_threshold: f64,
    /// 监控周期（毫秒）。
    #[serde(default = "default_monitor_interval_ms")]
    pub monitor_interval_ms: u64,
}

fn default_pkt_bytes() -> u64 {
    1500
}

fn default_pkts() -> u64 {
    100
}

fn default_gap_us() -> u64 {
    10
}

fn default_monitor_interval_ms() -> u64 {
    10
}

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("unsupported schema_version {0}")]
    UnsupportedSchema(u32),
    #[error("topology must have at least one pod/edge/host")]
    EmptyTopology,
    #[error("hosts_per_edge {hosts} exceeds edge port count {ports}")]
    TooManyHostsPerEdge { hosts: usize, ports: usize },
    #[error("vm {vm} placed on unknown host index {host} (total {total})")]
    UnknownHostIndex { vm: u64, host: usize, total: usize },
    #[error("duplicate vm id {0}")]
    DuplicateVm(u64),
    #[error("flow references unknown vm {0}")]
    UnknownVm(u64),
    #[error("migration safety must be > 0, got {0}")]
    BadSafety(f64),
    #[error("monitor interval must be > 0 ms")]
    BadMonitorInterval,
}

impl DatacenterSpec {
    /// 校验场景内部一致性；通过后才能用于构建世界。
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.schema_version != 1 {
            return Err(SpecError::UnsupportedSchema(self.schema_version));
        }

        let t = &self.topology;
        if t.pods == 0 || t.edges_per_pod == 0 || t.hosts_per_edge == 0 {
            return Err(SpecError::EmptyTopology);
        }
        let ports = t.edge_ports.unwrap_or(crate::net::EDGE_PORTS);
        if t.hosts_per_edge > ports {
            return Err(SpecError::TooManyHostsPerEdge {
                hosts: t.hosts_per_edge,
                ports,
            });
        }

        let total_hosts = t.pods * t.edges_per_pod * t.hosts_per_edge;
        let mut seen = std::collections::HashSet::new();
        for vm in &self.vms {
            if !seen.insert(vm.id) {
                return Err(SpecError::DuplicateVm(vm.id));
            }
            if vm.host >= total_hosts {
                return Err(SpecError::UnknownHostIndex {
                    vm: vm.id,
                    host: vm.host,
                    total: total_hosts,
                });
            }
        }

        for flow in &self.flows {
            for vm in [flow.sender_vm, flow.receiver_vm] {
                if !seen.contains(&vm) {
                    return Err(SpecError::UnknownVm(vm));
                }
            }
        }

        if let Some(m) = &self.migration {
            if m.safety <= 0.0 {
                return Err(SpecError::BadSafety(m.safety));
            }
            // 周期为 0 会让监控 tick 在同一时刻无限自我调度。
            if m.monitor_interval_ms == 0 {
                return Err(SpecError::BadMonitorInterval);
            }
        }

        Ok(())
    }
}
