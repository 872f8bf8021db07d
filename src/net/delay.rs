//! 批量传输时延模型
//!
//! 同一转发 tick 内发往同一链路的整批 packet 共享链路带宽：
//! 整批计费 `D + sum(size_i) / B`，而不是逐包独立计费，
//! 以此建模共享链路上的竞争。

use crate::sim::SimTime;

use super::packet::NetworkPacket;

/// 计算一批 packet 在指定链路上的总传输时延。
///
/// `bandwidth_bps` 为链路带宽（bit/s），`switching_delay` 为固定的
/// 每跳交换时延（与负载大小、排队无关）。
/// 空批返回 `None`：时延无定义，调用方必须跳过调度。
pub fn batch_delay(
    batch: &[NetworkPacket],
    bandwidth_bps: u64,
    switching_delay: SimTime,
) -> Option<SimTime> {
    if batch.is_empty() {
        return None;
    }

    let total_bytes: u64 = batch.iter().map(|p| p.size_bytes).sum();
    Some(switching_delay.saturating_add(tx_time(total_bytes, bandwidth_bps)))
}

/// ceil(bytes*8 / bps) 秒 -> 纳秒。带宽为 0 时返回饱和哨兵值。
fn tx_time(bytes: u64, bandwidth_bps: u64) -> SimTime {
    if bandwidth_bps == 0 {
        return SimTime(u64::MAX / 4);
    }
    let bits = (bytes as u128).saturating_mul(8);
    let nanos =
        (bits.saturating_mul(1_000_000_000u128) + (bandwidth_bps as u128 - 1)) / bandwidth_bps as u128;
    SimTime(nanos.min(u64::MAX as u128) as u64)
}
