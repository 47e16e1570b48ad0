use anyhow::{Context, ensure};
use clap::Parser;
use dashmap::DashSet;
use foldhash::fast::RandomState as FoldRandomState;
use heap_collections::hashers::U64Hasher;
use heap_collections::{ArrayLong, MurmurHasher, NoopHasher, SetLong, StatelessU64Hasher, array_utils};
use rayon::prelude::*;
use std::collections::HashSet;
use std::hash::{BuildHasher, BuildHasherDefault};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Benchmarks the primitive collections against std and concurrent hash sets
/// on synthetic heap addresses.
#[derive(Debug, Parser)]
#[command(name = "collect-bench")]
struct BenchConfig {
    /// log2 of the number of addresses per run.
    #[arg(long, value_delimiter = ',', default_values_t = [10u32, 15, 20])]
    sizes: Vec<u32>,

    /// Seed for the address generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// log2 of the total number of keys processed per benchmark; small runs repeat more.
    #[arg(long, default_value_t = 22, value_parser = clap::value_parser!(u32).range(0..=40))]
    budget: u32,

    /// Size of the rayon pool for the concurrent baselines.
    #[arg(long)]
    threads: Option<usize>,
}

const HEAP_BASE: u64 = 0x7f3a_0000_0000;

fn count_unique_by_hash<Hasher: BuildHasher>(data: &[u64], hasher: Hasher) -> usize {
    let mut set = HashSet::with_capacity_and_hasher(data.len(), hasher);
    for d in data {
        set.insert(*d);
    }
    set.len()
}

fn count_unique_set_long<H: StatelessU64Hasher>(data: &[u64]) -> usize {
    let mut set = SetLong::<H>::with_capacity(data.len());
    for d in data {
        set.add(*d);
    }
    set.len()
}

fn count_unique_growing(data: &[u64]) -> usize {
    let mut set = SetLong::new();
    for d in data {
        set.add(*d);
    }
    set.len()
}

fn count_unique_dashmap(data: &[u64], hasher: FoldRandomState) -> usize {
    let set = DashSet::with_capacity_and_hasher(data.len(), hasher);
    data.par_iter().for_each(|d| {
        set.insert(*d);
    });
    set.len()
}

fn count_unique_scc(data: &[u64], hasher: FoldRandomState) -> usize {
    let set = scc::HashSet::with_capacity_and_hasher(data.len(), hasher);
    data.par_iter().for_each(|d| {
        let _ = set.insert(*d);
    });
    set.len()
}

fn remove_half(data: &[u64]) -> usize {
    let mut set = SetLong::<NoopHasher>::with_capacity(data.len());
    for d in data {
        set.add(*d);
    }
    for d in data.iter().step_by(2) {
        set.remove(*d);
    }
    set.len()
}

fn benchmark(name: &str, repeats: usize, mut f: impl FnMut()) {
    // Warmup.
    for _ in 0..repeats {
        f();
    }
    let start = Instant::now();
    for _ in 0..repeats {
        f();
    }
    let duration = start.elapsed();
    println!("  {}: {}", name, human_time(repeats, duration));
}

fn human_time(repeats: usize, duration: Duration) -> String {
    let mut duration = duration.as_nanos() as f64 / repeats as f64;
    if duration < 1000.0 {
        return format!("{:.1}ns", duration);
    }
    duration /= 1000.0;
    if duration < 1000.0 {
        return format!("{:.1}us", duration);
    }
    duration /= 1000.0;
    if duration < 1000.0 {
        return format!("{:.1}ms", duration);
    }
    duration /= 1000.0;
    format!("{:.1}s", duration)
}

fn human_size(size: usize) -> String {
    if size < 1024 {
        return format!("{}B", size);
    }
    let mut size = size as f64;
    size /= 1024.0;
    if size < 1024.0 {
        return format!("{}KiB", size);
    }
    size /= 1024.0;
    if size < 1024.0 {
        return format!("{}MiB", size);
    }
    size /= 1024.0;
    format!("{}GiB", size)
}

/// 8-byte aligned addresses in a heap region sized so that roughly a third of
/// the draws repeat an earlier address.
fn heap_addresses(rng: &mut fastrand::Rng, lg_size: u32) -> Vec<u64> {
    let slots = 1u64 << lg_size;
    (0..slots).map(|_| HEAP_BASE + rng.u64(..slots) * 8).collect()
}

fn run(config: &BenchConfig) -> anyhow::Result<()> {
    let mut rng = fastrand::Rng::with_seed(config.seed);
    for &lg_size in &config.sizes {
        ensure!(lg_size <= 30, "size 2^{lg_size} is too large for a benchmark run");
        let data = heap_addresses(&mut rng, lg_size);
        let repeats = 1usize << config.budget.saturating_sub(lg_size);
        println!("size: {}", human_size(std::mem::size_of::<u64>() * data.len()));

        let foldhash_hasher = FoldRandomState::default();
        let expected = count_unique_by_hash(&data, foldhash_hasher.clone());
        let noop_hasher = BuildHasherDefault::<U64Hasher<NoopHasher>>::default();
        let checks = [
            ("SetLong", count_unique_set_long::<NoopHasher>(&data)),
            ("SetLong (Murmur)", count_unique_set_long::<MurmurHasher>(&data)),
            ("SetLong (growing)", count_unique_growing(&data)),
            ("HashSet (NoOp)", count_unique_by_hash(&data, noop_hasher.clone())),
            ("DashSet", count_unique_dashmap(&data, foldhash_hasher.clone())),
            ("scc::HashSet", count_unique_scc(&data, foldhash_hasher.clone())),
        ];
        for (name, unique) in checks {
            ensure!(unique == expected, "{name} counted {unique} unique addresses, expected {expected}");
        }
        debug!(lg_size, unique = expected, repeats, "unique counts agree");

        benchmark("SetLong (NoOp)", repeats, || {
            count_unique_set_long::<NoopHasher>(&data);
        });
        benchmark("SetLong (Murmur)", repeats, || {
            count_unique_set_long::<MurmurHasher>(&data);
        });
        benchmark("SetLong (growing from 10)", repeats, || {
            count_unique_growing(&data);
        });
        benchmark("SetLong (add + remove half)", repeats, || {
            remove_half(&data);
        });
        benchmark("HashSet (NoOp)", repeats, || {
            count_unique_by_hash(&data, noop_hasher.clone());
        });
        benchmark("HashSet (FoldHash)", repeats, || {
            count_unique_by_hash(&data, foldhash_hasher.clone());
        });
        benchmark("DashSet (FoldHash, rayon)", repeats, || {
            count_unique_dashmap(&data, foldhash_hasher.clone());
        });
        benchmark("scc::HashSet (FoldHash, rayon)", repeats, || {
            count_unique_scc(&data, foldhash_hasher.clone());
        });

        benchmark("ArrayLong::sort", repeats, || {
            let mut array = ArrayLong::from(data.as_slice());
            array.sort();
        });
        benchmark("slice::sort_unstable", repeats, || {
            let mut copy = data.clone();
            copy.sort_unstable();
        });
        let ids: Vec<u32> = (0..data.len() as u32).collect();
        let mut sizes = data.clone();
        array_utils::sort_desc(&mut sizes, &mut ids.clone()).context("sorting retained sizes")?;
        ensure!(sizes.windows(2).all(|w| w[0] >= w[1]), "sort_desc left sizes out of order");
        benchmark("array_utils::sort_desc", repeats, || {
            let mut sizes = data.clone();
            let mut ids = ids.clone();
            array_utils::sort_desc(&mut sizes, &mut ids).expect("lengths match");
        });
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = BenchConfig::parse();
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring the rayon thread pool")?;
    }
    info!(?config, threads = rayon::current_num_threads(), "starting benchmarks");
    run(&config)
}
