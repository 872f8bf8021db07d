//! 数据中心仿真 CLI
//!
//! 构建三层交换拓扑，按场景注入 VM 间流量，周期性监控主机利用率
//! 并评估迁移，最后输出 JSON 报告。
//! 场景可来自 `--spec` JSON 文件，也可完全由命令行参数组装。

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use dcsim_rs::net::{DcWorld, HostId, PlacementOracle, VmId};
use dcsim_rs::power::{
    FirstFitFallback, FirstVmSelection, IqrOverloadDetector, MigrationDecision, MigrationTrigger,
    OverUtilizationThreshold,
};
use dcsim_rs::sim::{DatacenterSpec, Event, FlowSpec, MigrationSpec, SimTime, Simulator, TopologySpec, VmSpec, World};
use dcsim_rs::topo::{build_tree, TreeOpts};

#[derive(Debug, Parser)]
#[command(name = "datacenter", about = "三层交换拓扑 + IQR 迁移触发的数据中心仿真")]
struct Args {
    /// 场景 JSON 文件；省略时由下列参数组装默认场景
    #[arg(long)]
    spec: Option<std::path::PathBuf>,
    #[arg(long, default_value_t = 2)]
    pods: usize,
    #[arg(long, default_value_t = 2)]
    edges_per_pod: usize,
    #[arg(long, default_value_t = 2)]
    hosts_per_edge: usize,
    #[arg(long, default_value_t = 1500)]
    pkt_bytes: u64,
    #[arg(long, default_value_t = 200)]
    pkts: u64,
    /// 两个 packet 注入间隔（微秒）
    #[arg(long, default_value_t = 100)]
    gap_us: u64,
    /// 仿真运行到多少毫秒
    #[arg(long, default_value_t = 500)]
    until_ms: u64,
    /// 动态阈值安全系数
    #[arg(long, default_value_t = 0.5)]
    safety: f64,
    /// 历史不足时的静态阈值
    #[arg(long, default_value_t = 0.8)]
    static_threshold: f64,
    /// 监控周期（毫秒）
    #[arg(long, default_value_t = 10)]
    monitor_interval_ms: u64,
}

/// 流量注入事件：把 packet 作为上行交付送进发送方主机的边缘交换机。
#[derive(Debug)]
struct InjectFlow {
    sender_vm: VmId,
    receiver_vm: VmId,
    pkt_bytes: u64,
    remaining: u64,
    gap: SimTime,
}

impl Event for InjectFlow {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let mut me = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<DcWorld>()
            .expect("world must be DcWorld");

        if me.remaining == 0 {
            return;
        }

        // 发送方可能已被迁移，每次注入都重新解析放置。
        let resolved = w
            .placement
            .host_for_vm(me.sender_vm)
            .and_then(|h| w.placement.edge_for_host(h).map(|e| (h, e)));
        let (sender_host, edge) = match resolved {
            Ok(pair) => pair,
            Err(e) => {
                warn!(%e, "流量注入失败，停止该流");
                return;
            }
        };

        let pkt = w.make_packet(
            me.sender_vm,
            me.receiver_vm,
            sender_host,
            me.pkt_bytes,
            sim.now(),
        );
        w.packet_up(edge, pkt, sim);

        me.remaining -= 1;
        if me.remaining > 0 {
            let next_at = sim.now().saturating_add(me.gap);
            sim.schedule(next_at, InjectFlow { ..me });
        }
    }
}

/// 监控 tick：为每台主机记一个利用率采样（该周期内收包字节数相对
/// 下行容量的占比），再用 IQR 动态阈值评估是否迁移。
struct MonitorTick {
    interval: SimTime,
    until: SimTime,
    /// 单周期容量（字节）：边缘下行带宽 × 监控周期。
    capacity_bytes: f64,
    last_bytes: Vec<u64>,
    detector: IqrOverloadDetector,
    threshold_policy: OverUtilizationThreshold,
    trigger: MigrationTrigger,
    selection: FirstVmSelection,
    fallback: FirstFitFallback,
}

impl Event for MonitorTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let mut me = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<DcWorld>()
            .expect("world must be DcWorld");

        let host_ids: Vec<HostId> = w.hosts().iter().map(|h| h.id()).collect();

        for &host in &host_ids {
            let received = w.host(host).received_bytes();
            let delta = received.saturating_sub(me.last_bytes[host.0]);
            me.last_bytes[host.0] = received;
            let sample = (delta as f64 / me.capacity_bytes).clamp(0.0, 1.0);
            w.host_mut(host).record_utilization(sample);

            let history = w.host(host).utilization_history();
            let threshold = me.threshold_policy.threshold(&me.detector, history);
            let current = sample;

            let vms = w.placement.vms_on_host(host);
            let candidates: Vec<HostId> =
                host_ids.iter().copied().filter(|h| *h != host).collect();

            let decision = me.trigger.evaluate(
                host,
                &vms,
                &candidates,
                current,
                threshold,
                &mut me.selection,
                &mut me.fallback,
            );
            if let MigrationDecision::Migrate(migrations) = decision {
                for m in &migrations {
                    info!(vm = ?m.vm, target = ?m.target, "执行迁移决定");
                    w.placement.migrate(m.vm, m.target);
                }
                w.stats.migrations_planned += migrations.len() as u64;
            }
        }

        let next_at = sim.now().saturating_add(me.interval);
        if next_at <= me.until {
            sim.schedule(next_at, me);
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    delivered_pkts: u64,
    delivered_bytes: u64,
    routing_errors: u64,
    migrations_planned: u64,
    hosts: usize,
    final_time_secs: f64,
}

fn spec_from_args(args: &Args) -> DatacenterSpec {
    // 默认场景：每台主机一台 VM，VM 0 向最后一台 VM 发一条流。
    let total_hosts = args.pods * args.edges_per_pod * args.hosts_per_edge;
    let vms: Vec<VmSpec> = (0..total_hosts as u64)
        .map(|id| VmSpec {
            id,
            host: id as usize,
        })
        .collect();
    let flows = vec![FlowSpec {
        sender_vm: 0,
        receiver_vm: total_hosts as u64 - 1,
        pkt_bytes: args.pkt_bytes,
        pkts: args.pkts,
        gap_us: args.gap_us,
    }];

    DatacenterSpec {
        schema_version: 1,
        topology: TopologySpec {
            pods: args.pods,
            edges_per_pod: args.edges_per_pod,
            hosts_per_edge: args.hosts_per_edge,
            edge_ports: None,
            edge_downlink_bps: None,
            agg_downlink_bps: None,
            root_downlink_bps: None,
        },
        vms,
        flows,
        migration: Some(MigrationSpec {
            safety: args.safety,
            static_threshold: args.static_threshold,
            monitor_interval_ms: args.monitor_interval_ms,
        }),
    }
}

fn main() {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let spec = match &args.spec {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("read spec {}: {e}", path.display());
                std::process::exit(2);
            });
            serde_json::from_str::<DatacenterSpec>(&text).unwrap_or_else(|e| {
                eprintln!("parse spec {}: {e}", path.display());
                std::process::exit(2);
            })
        }
        None => spec_from_args(&args),
    };
    if let Err(e) = spec.validate() {
        eprintln!("invalid spec: {e}");
        std::process::exit(2);
    }

    let mut sim = Simulator::default();
    let mut world = DcWorld::default();

    let topo = build_tree(
        &mut world,
        &TreeOpts {
            pods: spec.topology.pods,
            edges_per_pod: spec.topology.edges_per_pod,
            hosts_per_edge: spec.topology.hosts_per_edge,
            edge_ports: spec
                .topology
                .edge_ports
                .unwrap_or(dcsim_rs::net::EDGE_PORTS),
            edge_downlink_bps: spec.topology.edge_downlink_bps,
            agg_downlink_bps: spec.topology.agg_downlink_bps,
            root_downlink_bps: spec.topology.root_downlink_bps,
        },
    );
    info!(
        hosts = topo.hosts.len(),
        edges = topo.edges.len(),
        aggregates = topo.aggregates.len(),
        "拓扑构建完成"
    );

    for vm in &spec.vms {
        world.place_vm(VmId(vm.id), topo.hosts[vm.host]);
    }

    for flow in &spec.flows {
        sim.schedule(
            SimTime::ZERO,
            InjectFlow {
                sender_vm: VmId(flow.sender_vm),
                receiver_vm: VmId(flow.receiver_vm),
                pkt_bytes: flow.pkt_bytes,
                remaining: flow.pkts,
                gap: SimTime::from_micros(flow.gap_us),
            },
        );
    }

    let until = SimTime::from_millis(args.until_ms);
    if let Some(m) = &spec.migration {
        let interval = SimTime::from_millis(m.monitor_interval_ms);
        let edge_bps = spec
            .topology
            .edge_downlink_bps
            .unwrap_or(dcsim_rs::net::EDGE_DOWNLINK_BPS);
        let capacity_bytes = edge_bps as f64 / 8.0 * interval.as_secs_f64();
        sim.schedule(
            interval,
            MonitorTick {
                interval,
                until,
                capacity_bytes,
                last_bytes: vec![0; world.host_count()],
                detector: IqrOverloadDetector::default(),
                threshold_policy: OverUtilizationThreshold::new(m.safety, m.static_threshold),
                trigger: MigrationTrigger,
                selection: FirstVmSelection,
                fallback: FirstFitFallback,
            },
        );
    }

    sim.run_until(until, &mut world);

    let report = Report {
        delivered_pkts: world.stats.delivered_pkts,
        delivered_bytes: world.stats.delivered_bytes,
        routing_errors: world.stats.routing_errors,
        migrations_planned: world.stats.migrations_planned,
        hosts: world.host_count(),
        final_time_secs: sim.now().as_secs_f64(),
    };
    println!(
        "report {}",
        serde_json::to_string(&report).expect("serialize report")
    );
}
