//! 分层交换机
//!
//! 单一 SwitchNode 类型承载三层（根=0、汇聚=1、边缘=2）的行为差异：
//! 层级差异是数据（带宽、叶/中继分支），不是类型。
//! 边缘层向下直连主机，其余层向下连接低一层的交换机。
//!
//! 每包状态机：
//! - 自上而下到达：解析接收方 VM → 主机，叶层直接入主机队列，
//!   非叶层入覆盖该主机的下行子交换机队列；
//! - 自下而上到达：若目的主机在本交换机覆盖范围内则就地折返
//!   （上行路径的本地短路），否则按上行策略择一上行入队；
//! - 转发 tick：逐目的地整批排空，按方向取带宽算批量时延，
//!   调度 `now + delay` 的交付事件。

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::queue::DestinationQueues;
use crate::sim::{SimTime, Simulator};

use super::delay::batch_delay;
use super::error::NetError;
use super::events::{HostDelivery, PacketDown, PacketUp};
use super::id::{HostId, SwitchId};
use super::packet::NetworkPacket;
use super::placement::PlacementOracle;

/// 边缘交换机默认端口数（可直连主机数上限）。
pub const EDGE_PORTS: usize = 4;
/// 边缘交换机默认下行带宽（bit/s），同时是所连主机的上行带宽。
pub const EDGE_DOWNLINK_BPS: u64 = 100 * 1024 * 1024;
/// 边缘交换机默认交换时延（秒）。
pub const EDGE_SWITCHING_DELAY_SECS: f64 = 0.00157;

pub const AGG_PORTS: usize = 1;
pub const AGG_DOWNLINK_BPS: u64 = 100 * 1024 * 1024;
pub const AGG_SWITCHING_DELAY_SECS: f64 = 0.00245;

pub const ROOT_PORTS: usize = 1;
pub const ROOT_DOWNLINK_BPS: u64 = 40 * 1024 * 1024 * 1024;
pub const ROOT_SWITCHING_DELAY_SECS: f64 = 0.00285;

/// 拓扑层级标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchLevel {
    Root,
    Aggregate,
    Edge,
}

impl SwitchLevel {
    /// 层级编号：根=0、汇聚=1、边缘=2。
    pub fn depth(self) -> u8 {
        match self {
            SwitchLevel::Root => 0,
            SwitchLevel::Aggregate => 1,
            SwitchLevel::Edge => 2,
        }
    }

    /// 叶层（边缘）向下直连主机而非交换机。
    pub fn is_leaf(self) -> bool {
        matches!(self, SwitchLevel::Edge)
    }
}

/// 上行选择策略：存在多条上行时如何为一个 packet 择路。
/// 显式注入而非隐式取第一条，默认 [`FirstConfigured`]。
pub trait UplinkPolicy: std::fmt::Debug + Send {
    /// `uplinks` 非空由调用方保证。
    fn pick(&self, uplinks: &[SwitchId], flow_key: u64) -> SwitchId;
}

/// 取第一条配置的上行。与参考实现的单上行假设一致，
/// 作为文档化的配置默认而非硬编码事实。
#[derive(Debug, Default)]
pub struct FirstConfigured;

impl UplinkPolicy for FirstConfigured {
    fn pick(&self, uplinks: &[SwitchId], _flow_key: u64) -> SwitchId {
        uplinks[0]
    }
}

/// 基于流键的稳定哈希择路：同一 VM 对始终选同一条上行。
#[derive(Debug)]
pub struct HashBased {
    salt: u64,
}

impl HashBased {
    pub fn new(salt: u64) -> Self {
        Self { salt }
    }
}

impl UplinkPolicy for HashBased {
    fn pick(&self, uplinks: &[SwitchId], flow_key: u64) -> SwitchId {
        debug_assert!(!uplinks.is_empty());
        let h = mix64(flow_key ^ self.salt);
        uplinks[(h as usize) % uplinks.len()]
    }
}

/// splitmix64：简单、确定性的 64-bit mixing（避免每次运行 hash 不稳定）。
fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// 交换机构造参数。
#[derive(Debug)]
pub struct SwitchOpts {
    pub ports: usize,
    pub uplink_bps: u64,
    pub downlink_bps: u64,
    pub switching_delay: SimTime,
    pub uplink_policy: Box<dyn UplinkPolicy>,
}

impl SwitchOpts {
    /// 边缘层默认参数；上行带宽即汇聚层的下行带宽。
    pub fn edge() -> Self {
        Self {
            ports: EDGE_PORTS,
            uplink_bps: AGG_DOWNLINK_BPS,
            downlink_bps: EDGE_DOWNLINK_BPS,
            switching_delay: SimTime::from_secs_f64(EDGE_SWITCHING_DELAY_SECS),
            uplink_policy: Box::new(FirstConfigured),
        }
    }

    pub fn aggregate() -> Self {
        Self {
            ports: AGG_PORTS,
            uplink_bps: ROOT_DOWNLINK_BPS,
            downlink_bps: AGG_DOWNLINK_BPS,
            switching_delay: SimTime::from_secs_f64(AGG_SWITCHING_DELAY_SECS),
            uplink_policy: Box::new(FirstConfigured),
        }
    }

    /// 根层没有上行；上行带宽字段不会被使用。
    pub fn root() -> Self {
        Self {
            ports: ROOT_PORTS,
            uplink_bps: 0,
            downlink_bps: ROOT_DOWNLINK_BPS,
            switching_delay: SimTime::from_secs_f64(ROOT_SWITCHING_DELAY_SECS),
            uplink_policy: Box::new(FirstConfigured),
        }
    }

    pub fn with_uplink_policy(mut self, policy: Box<dyn UplinkPolicy>) -> Self {
        self.uplink_policy = policy;
        self
    }
}

#[derive(Debug)]
pub struct SwitchNode {
    id: SwitchId,
    name: String,
    level: SwitchLevel,
    ports: usize,
    uplink_bps: u64,
    downlink_bps: u64,
    switching_delay: SimTime,
    uplinks: Vec<SwitchId>,
    downlinks: Vec<SwitchId>,
    /// 叶层直连的主机集合。
    hosts: HashSet<HostId>,
    /// 非叶层：目的主机 → 覆盖它的下行子交换机。拓扑构建时填充，
    /// 仿真期间只读。
    host_routes: HashMap<HostId, SwitchId>,
    host_queues: DestinationQueues<HostId>,
    down_queues: DestinationQueues<SwitchId>,
    up_queues: DestinationQueues<SwitchId>,
    uplink_policy: Box<dyn UplinkPolicy>,
}

impl SwitchNode {
    pub fn new(id: SwitchId, name: impl Into<String>, level: SwitchLevel, opts: SwitchOpts) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            ports: opts.ports,
            uplink_bps: opts.uplink_bps,
            downlink_bps: opts.downlink_bps,
            switching_delay: opts.switching_delay,
            uplinks: Vec::new(),
            downlinks: Vec::new(),
            hosts: HashSet::new(),
            host_routes: HashMap::new(),
            host_queues: DestinationQueues::default(),
            down_queues: DestinationQueues::default(),
            up_queues: DestinationQueues::default(),
            uplink_policy: opts.uplink_policy,
        }
    }

    pub fn id(&self) -> SwitchId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> SwitchLevel {
        self.level
    }

    pub fn ports(&self) -> usize {
        self.ports
    }

    pub fn uplinks(&self) -> &[SwitchId] {
        &self.uplinks
    }

    pub fn downlinks(&self) -> &[SwitchId] {
        &self.downlinks
    }

    pub fn connected_hosts(&self) -> &HashSet<HostId> {
        &self.hosts
    }

    pub fn add_uplink(&mut self, sw: SwitchId) {
        self.uplinks.push(sw);
    }

    pub fn add_downlink(&mut self, sw: SwitchId) {
        self.downlinks.push(sw);
    }

    /// 直连一台主机（仅叶层）。
    pub fn connect_host(&mut self, host: HostId) {
        debug_assert!(self.level.is_leaf(), "only edge switches connect hosts");
        self.hosts.insert(host);
    }

    /// 登记“主机经由哪个下行子交换机可达”（仅非叶层）。
    pub fn add_host_route(&mut self, host: HostId, via: SwitchId) {
        debug_assert!(!self.level.is_leaf());
        self.host_routes.insert(host, via);
    }

    /// 主机方向（或下行方向）排队中的 packet 数，测试与统计用。
    pub fn queued_for_host(&self, host: HostId) -> usize {
        self.host_queues.queued(host)
    }

    pub fn queued_for_uplink(&self, sw: SwitchId) -> usize {
        self.up_queues.queued(sw)
    }

    pub fn total_queued(&self) -> usize {
        self.host_queues.total_queued()
            + self.down_queues.total_queued()
            + self.up_queues.total_queued()
    }

    /// 自上而下到达（下行交付）。
    ///
    /// 解析接收方 VM → 主机后：叶层入该主机队列（下行 packet 默认已被
    /// 上游正确寻址到本子树，不再做短路检查——与上行路径的不对称是有意保留的）；
    /// 非叶层入覆盖该主机的下行子交换机队列。
    pub fn process_packet_down(
        &mut self,
        mut pkt: NetworkPacket,
        placement: &dyn PlacementOracle,
    ) -> Result<(), NetError> {
        let host = placement.host_for_vm(pkt.receiver_vm)?;
        pkt.receiver_host = Some(host);

        if self.level.is_leaf() {
            trace!(switch = %self.name, host = ?host, pkt = pkt.id, "下行：入主机队列");
            self.host_queues.enqueue(host, pkt);
        } else {
            let via = self.route_down(host)?;
            trace!(switch = %self.name, via = ?via, pkt = pkt.id, "下行：入下级交换机队列");
            self.down_queues.enqueue(via, pkt);
        }
        Ok(())
    }

    /// 自下而上到达（上行交付）。
    ///
    /// 目的主机直连本交换机（或在本子树内）时就地折返，避免多余的上行；
    /// 否则按注入的上行策略择一上行入队。需要上行但未配置任何上行
    /// 是致命配置错误。
    pub fn process_packet_up(
        &mut self,
        mut pkt: NetworkPacket,
        placement: &dyn PlacementOracle,
    ) -> Result<(), NetError> {
        let host = placement.host_for_vm(pkt.receiver_vm)?;
        pkt.receiver_host = Some(host);

        // 本地短路：目的主机直连本边缘交换机。
        if self.level.is_leaf() && self.hosts.contains(&host) {
            trace!(switch = %self.name, host = ?host, pkt = pkt.id, "上行：本地短路入主机队列");
            self.host_queues.enqueue(host, pkt);
            return Ok(());
        }

        // 非叶层：目的主机在本子树内时折返向下。
        if !self.level.is_leaf() {
            if let Some(via) = self.host_routes.get(&host).copied() {
                trace!(switch = %self.name, via = ?via, pkt = pkt.id, "上行：折返下行");
                self.down_queues.enqueue(via, pkt);
                return Ok(());
            }
        }

        if self.uplinks.is_empty() {
            return Err(NetError::UnroutableUplink(self.id));
        }
        let up = self.pick_uplink(&pkt);
        trace!(switch = %self.name, up = ?up, pkt = pkt.id, "上行：入上行队列");
        self.up_queues.enqueue(up, pkt);
        Ok(())
    }

    /// 转发 tick：排空全部非空队列并调度交付事件。
    ///
    /// 主机方向与下行方向用下行带宽，上行方向用上行带宽；
    /// 同一批 packet 共享同一个批量时延。无返回值，
    /// 副作用只有已调度的未来事件；tick 结束后队列为空。
    #[tracing::instrument(skip(self, sim), fields(switch = %self.name))]
    pub fn forward_tick(&mut self, sim: &mut Simulator) {
        let now = sim.now();

        for (host, batch) in self.host_queues.drain_non_empty() {
            let Some(delay) = batch_delay(&batch, self.downlink_bps, self.switching_delay) else {
                continue;
            };
            let at = now.saturating_add(delay);
            debug!(host = ?host, pkts = batch.len(), delay = ?delay, "🚀 批量转发到主机");
            for pkt in batch {
                sim.schedule(at, HostDelivery { host, pkt });
            }
        }

        for (sw, batch) in self.down_queues.drain_non_empty() {
            let Some(delay) = batch_delay(&batch, self.downlink_bps, self.switching_delay) else {
                continue;
            };
            let at = now.saturating_add(delay);
            debug!(to = ?sw, pkts = batch.len(), delay = ?delay, "🚀 批量下行转发");
            for pkt in batch {
                sim.schedule(at, PacketDown { to: sw, pkt });
            }
        }

        for (sw, batch) in self.up_queues.drain_non_empty() {
            let Some(delay) = batch_delay(&batch, self.uplink_bps, self.switching_delay) else {
                continue;
            };
            let at = now.saturating_add(delay);
            debug!(to = ?sw, pkts = batch.len(), delay = ?delay, "🚀 批量上行转发");
            for pkt in batch {
                sim.schedule(at, PacketUp { to: sw, pkt });
            }
        }
    }

    fn route_down(&self, host: HostId) -> Result<SwitchId, NetError> {
        self.host_routes
            .get(&host)
            .copied()
            .ok_or(NetError::UnknownHost(host))
    }

    fn pick_uplink(&self, pkt: &NetworkPacket) -> SwitchId {
        self.uplink_policy.pick(&self.uplinks, pkt.flow_key())
    }
}
