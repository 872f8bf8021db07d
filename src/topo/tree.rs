//! 三层树形数据中心拓扑构建
//!
//! 1 个根交换机 → `pods` 个汇聚交换机 → 每汇聚 `edges_per_pod` 个
//! 边缘交换机 → 每边缘 `hosts_per_edge` 台主机。
//! 层级不变式：L 层只向下连接 L+1 层（边缘层向下直连主机），
//! 向上只连接配置的上行集合。

use crate::net::{DcWorld, HostId, SwitchId, SwitchLevel, SwitchOpts, EDGE_PORTS};

#[derive(Debug, Clone)]
pub struct TreeOpts {
    pub pods: usize,
    pub edges_per_pod: usize,
    pub hosts_per_edge: usize,
    pub edge_ports: usize,
    /// None 时逐层取参考默认带宽。
    pub edge_downlink_bps: Option<u64>,
    pub agg_downlink_bps: Option<u64>,
    pub root_downlink_bps: Option<u64>,
}

impl Default for TreeOpts {
    fn default() -> Self {
        Self {
            pods: 2,
            edges_per_pod: 2,
            hosts_per_edge: 2,
            edge_ports: EDGE_PORTS,
            edge_downlink_bps: None,
            agg_downlink_bps: None,
            root_downlink_bps: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreeTopology {
    pub root: SwitchId,
    pub aggregates: Vec<SwitchId>,
    pub edges: Vec<SwitchId>,
    pub hosts: Vec<HostId>,
    pub edges_per_pod: usize,
    pub hosts_per_edge: usize,
}

impl TreeTopology {
    pub fn edge(&self, pod: usize, edge: usize) -> SwitchId {
        self.edges[pod * self.edges_per_pod + edge]
    }

    pub fn host(&self, pod: usize, edge: usize, host: usize) -> HostId {
        self.hosts[(pod * self.edges_per_pod + edge) * self.hosts_per_edge + host]
    }
}

/// 构建三层树形拓扑并登记全部下行主机路由。
pub fn build_tree(world: &mut DcWorld, opts: &TreeOpts) -> TreeTopology {
    assert!(
        opts.pods > 0 && opts.edges_per_pod > 0 && opts.hosts_per_edge > 0,
        "tree topology must have at least one pod/edge/host"
    );
    assert!(
        opts.hosts_per_edge <= opts.edge_ports,
        "hosts_per_edge exceeds edge port count"
    );

    let mut root_opts = SwitchOpts::root();
    if let Some(bps) = opts.root_downlink_bps {
        root_opts.downlink_bps = bps;
    }
    let root = world.add_switch("root", SwitchLevel::Root, root_opts);

    let mut aggregates = Vec::with_capacity(opts.pods);
    let mut edges = Vec::with_capacity(opts.pods * opts.edges_per_pod);
    let mut hosts = Vec::with_capacity(opts.pods * opts.edges_per_pod * opts.hosts_per_edge);

    for pod in 0..opts.pods {
        let mut agg_opts = SwitchOpts::aggregate();
        if let Some(bps) = opts.agg_downlink_bps {
            agg_opts.downlink_bps = bps;
        }
        if let Some(bps) = opts.root_downlink_bps {
            agg_opts.uplink_bps = bps;
        }
        let agg = world.add_switch(format!("agg{pod}"), SwitchLevel::Aggregate, agg_opts);
        world.connect(agg, root);
        aggregates.push(agg);

        for e in 0..opts.edges_per_pod {
            let mut edge_opts = SwitchOpts::edge();
            edge_opts.ports = opts.edge_ports;
            if let Some(bps) = opts.edge_downlink_bps {
                edge_opts.downlink_bps = bps;
            }
            if let Some(bps) = opts.agg_downlink_bps {
                edge_opts.uplink_bps = bps;
            }
            let edge = world.add_switch(format!("p{pod}_e{e}"), SwitchLevel::Edge, edge_opts);
            world.connect(edge, agg);
            edges.push(edge);

            for h in 0..opts.hosts_per_edge {
                let host = world.attach_host(format!("h{pod}_{e}_{h}"), edge);
                hosts.push(host);

                // 祖先节点登记“该主机经由哪个下行子节点可达”。
                world.add_host_route(agg, host, edge);
                world.add_host_route(root, host, agg);
            }
        }
    }

    TreeTopology {
        root,
        aggregates,
        edges,
        hosts,
        edges_per_pod: opts.edges_per_pod,
        hosts_per_edge: opts.hosts_per_edge,
    }
}
