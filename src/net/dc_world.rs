//! 数据中心世界
//!
//! 实现仿真内核的 [`World`]：持有交换机、主机、VM 放置表与全局统计。
//! 事件处理方法驱动交换机状态机；路由错误计数并上报日志，
//! 绝不静默丢弃。

use std::any::Any;

use tracing::error;

use crate::sim::{SimTime, Simulator, World};

use super::events::ForwardTick;
use super::host::NetworkHost;
use super::id::{HostId, SwitchId, VmId};
use super::packet::NetworkPacket;
use super::placement::VmPlacement;
use super::stats::Stats;
use super::switch::{SwitchLevel, SwitchNode, SwitchOpts};

#[derive(Default)]
pub struct DcWorld {
    switches: Vec<SwitchNode>,
    hosts: Vec<NetworkHost>,
    pub placement: VmPlacement,
    next_pkt_id: u64,
    pub stats: Stats,
}

impl DcWorld {
    /// 添加交换机。
    pub fn add_switch(
        &mut self,
        name: impl Into<String>,
        level: SwitchLevel,
        opts: SwitchOpts,
    ) -> SwitchId {
        let id = SwitchId(self.switches.len());
        self.switches.push(SwitchNode::new(id, name, level, opts));
        id
    }

    /// 在边缘交换机下挂一台主机，同时在放置表登记其归属。
    pub fn attach_host(&mut self, name: impl Into<String>, edge: SwitchId) -> HostId {
        let id = HostId(self.hosts.len());
        self.hosts.push(NetworkHost::new(id, name, edge));
        self.switches[edge.0].connect_host(id);
        self.placement.register_host(id, edge);
        id
    }

    /// 建立上下行连接：`lower` 的上行指向 `upper`，`upper` 的下行指向 `lower`。
    pub fn connect(&mut self, lower: SwitchId, upper: SwitchId) {
        self.switches[lower.0].add_uplink(upper);
        self.switches[upper.0].add_downlink(lower);
    }

    /// 在非叶交换机上登记目的主机的下行路由。
    pub fn add_host_route(&mut self, switch: SwitchId, host: HostId, via: SwitchId) {
        self.switches[switch.0].add_host_route(host, via);
    }

    pub fn place_vm(&mut self, vm: VmId, host: HostId) {
        self.placement.place(vm, host);
    }

    pub fn switch(&self, id: SwitchId) -> &SwitchNode {
        &self.switches[id.0]
    }

    pub fn host(&self, id: HostId) -> &NetworkHost {
        &self.hosts[id.0]
    }

    pub fn host_mut(&mut self, id: HostId) -> &mut NetworkHost {
        &mut self.hosts[id.0]
    }

    pub fn hosts(&self) -> &[NetworkHost] {
        &self.hosts
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// 创建一个 packet；id 全局递增。
    pub fn make_packet(
        &mut self,
        sender_vm: VmId,
        receiver_vm: VmId,
        sender_host: HostId,
        size_bytes: u64,
        created_at: SimTime,
    ) -> NetworkPacket {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        NetworkPacket {
            id,
            sender_vm,
            receiver_vm,
            sender_host,
            receiver_host: None,
            size_bytes,
            created_at,
        }
    }

    /// 上行 packet 到达交换机。交换机入队后在当前时刻调度一次转发 tick，
    /// 同一时刻的后续到达会先于 tick 入队（内核按提交序执行），
    /// 因此同 tick 到达的 packet 自然合并成一批。
    pub fn packet_up(&mut self, to: SwitchId, pkt: NetworkPacket, sim: &mut Simulator) {
        let switch = &mut self.switches[to.0];
        match switch.process_packet_up(pkt, &self.placement) {
            Ok(()) => sim.schedule(sim.now(), ForwardTick { switch: to }),
            Err(e) => {
                self.stats.routing_errors += 1;
                error!(switch = ?to, %e, "上行路由失败");
            }
        }
    }

    /// 下行 packet 到达交换机。
    pub fn packet_down(&mut self, to: SwitchId, pkt: NetworkPacket, sim: &mut Simulator) {
        let switch = &mut self.switches[to.0];
        match switch.process_packet_down(pkt, &self.placement) {
            Ok(()) => sim.schedule(sim.now(), ForwardTick { switch: to }),
            Err(e) => {
                self.stats.routing_errors += 1;
                error!(switch = ?to, %e, "下行路由失败");
            }
        }
    }

    pub fn forward_tick(&mut self, switch: SwitchId, sim: &mut Simulator) {
        self.switches[switch.0].forward_tick(sim);
    }

    pub fn deliver_to_host(&mut self, host: HostId, pkt: NetworkPacket, sim: &mut Simulator) {
        self.stats.delivered_pkts += 1;
        self.stats.delivered_bytes += pkt.size_bytes;
        self.hosts[host.0].record_delivery(&pkt, sim.now());
    }
}

impl World for DcWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
