//! 按目的地分组的队列表
//!
//! 交换机为每个不同目的地（主机或交换机）维护一个独立队列，
//! 首次入队时按需创建。

use std::collections::HashMap;
use std::hash::Hash;

use crate::net::NetworkPacket;

use super::PacketQueue;

#[derive(Debug)]
pub struct DestinationQueues<K> {
    queues: HashMap<K, PacketQueue>,
}

impl<K> Default for DestinationQueues<K> {
    fn default() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Ord + Copy> DestinationQueues<K> {
    pub fn enqueue(&mut self, dest: K, pkt: NetworkPacket) {
        self.queues.entry(dest).or_default().enqueue(pkt);
    }

    /// 排空指定目的地的队列；不存在则返回空。
    pub fn drain(&mut self, dest: K) -> Vec<NetworkPacket> {
        self.queues
            .get_mut(&dest)
            .map(|q| q.drain_all())
            .unwrap_or_default()
    }

    /// 取出所有非空目的地及其整批 packet。表内队列随之清空。
    /// 按目的地键排序，保证同一时刻产生的事件顺序可复现。
    pub fn drain_non_empty(&mut self) -> Vec<(K, Vec<NetworkPacket>)> {
        let mut drained: Vec<(K, Vec<NetworkPacket>)> = self
            .queues
            .iter_mut()
            .filter(|(_, q)| !q.is_empty())
            .map(|(k, q)| (*k, q.drain_all()))
            .collect();
        drained.sort_by_key(|(k, _)| *k);
        drained
    }

    pub fn queued(&self, dest: K) -> usize {
        self.queues.get(&dest).map(|q| q.len()).unwrap_or(0)
    }

    pub fn total_queued(&self) -> usize {
        self.queues.values().map(|q| q.len()).sum()
    }
}
