//! 交付与转发事件
//!
//! 外部调度器送达的三类 packet 事件（自上而下、自下而上、转发 tick）
//! 以及最终的主机交付事件。事件执行时向下转型到 [`DcWorld`]
//! 驱动交换机状态机。

use tracing::{debug, info};

use crate::sim::{Event, Simulator, World};

use super::dc_world::DcWorld;
use super::id::{HostId, SwitchId};
use super::packet::NetworkPacket;

fn dc_world(world: &mut dyn World) -> &mut DcWorld {
    world
        .as_any_mut()
        .downcast_mut::<DcWorld>()
        .expect("world must be DcWorld")
}

/// 事件：packet 自下而上到达交换机。
#[derive(Debug)]
pub struct PacketUp {
    pub to: SwitchId,
    pub pkt: NetworkPacket,
}

impl Event for PacketUp {
    #[tracing::instrument(skip(self, sim, world), fields(pkt = self.pkt.id, to = ?self.to))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let PacketUp { to, pkt } = *self;
        debug!("📨 上行 packet 到达交换机");
        dc_world(world).packet_up(to, pkt, sim);
    }
}

/// 事件：packet 自上而下到达交换机。
#[derive(Debug)]
pub struct PacketDown {
    pub to: SwitchId,
    pub pkt: NetworkPacket,
}

impl Event for PacketDown {
    #[tracing::instrument(skip(self, sim, world), fields(pkt = self.pkt.id, to = ?self.to))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let PacketDown { to, pkt } = *self;
        debug!("📨 下行 packet 到达交换机");
        dc_world(world).packet_down(to, pkt, sim);
    }
}

/// 事件：交换机转发 tick，整批排空队列并调度交付。
#[derive(Debug)]
pub struct ForwardTick {
    pub switch: SwitchId,
}

impl Event for ForwardTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let ForwardTick { switch } = *self;
        dc_world(world).forward_tick(switch, sim);
    }
}

/// 事件：packet 送达目的主机。
#[derive(Debug)]
pub struct HostDelivery {
    pub host: HostId,
    pub pkt: NetworkPacket,
}

impl Event for HostDelivery {
    #[tracing::instrument(skip(self, sim, world), fields(pkt = self.pkt.id, host = ?self.host))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let HostDelivery { host, pkt } = *self;
        info!("✅ packet 送达主机");
        dc_world(world).deliver_to_host(host, pkt, sim);
    }
}
