//! Shepherd-cache workload driver.
//!
//! This binary runs a synthetic access pattern through one cache
//! configuration per invocation and reports behavioral statistics as JSON.
//! It performs:
//! 1. **Geometry setup:** Cache size, line size, associativity, shepherd capacity.
//! 2. **Policy selection:** Shepherd, FIFO, LRU, or Random over the same trace.
//! 3. **Pattern generation:** Sequential streams, strides, loops, or a mixed
//!    working-set/streaming blend.

use std::process;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use shepcache_core::cache::CacheSim;
use shepcache_core::cache::policies::{
    FifoPolicy, LruPolicy, RandomPolicy, ReplacementPolicy, ShepherdPolicy,
};
use shepcache_core::config::{CacheConfig, PolicyKind};
use shepcache_core::stats::CacheStats;

/// Replacement policy selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// FIFO staging region + NRU main region.
    Shepherd,
    /// First-in, first-out by insertion tick.
    Fifo,
    /// Least recently used by access tick.
    Lru,
    /// LFSR-driven random selection.
    Random,
}

impl From<Policy> for PolicyKind {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Shepherd => Self::Shepherd,
            Policy::Fifo => Self::Fifo,
            Policy::Lru => Self::Lru,
            Policy::Random => Self::Random,
        }
    }
}

/// Synthetic access pattern to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Pattern {
    /// One pass of line-sized steps far beyond the cache capacity.
    Sequential,
    /// Three-line stride over a footprint of eight cache capacities.
    Strided,
    /// A loop over twice the cache capacity (classic recency-thrash case).
    Looping,
    /// 70% hits in a half-capacity working set, 30% streaming pollution.
    Mixed,
}

#[derive(Parser, Debug)]
#[command(
    name = "shepcache",
    version,
    about = "Set-associative cache replacement-policy driver",
    long_about = "Run a synthetic access pattern through a configured cache and print \
                  hit/miss statistics as JSON.\n\nExamples:\n  \
                  shepcache --pattern looping --accesses 2000000\n  \
                  shepcache --policy lru --ways 4 --shepherd-ways 2 --pattern mixed"
)]
struct Cli {
    /// Total cache capacity in bytes.
    #[arg(long, default_value_t = 32 * 1024)]
    size_bytes: usize,

    /// Line size in bytes.
    #[arg(long, default_value_t = 64)]
    line_bytes: usize,

    /// Associativity (lines per set).
    #[arg(long, default_value_t = 8)]
    ways: usize,

    /// Shepherd staging capacity per set (shepherd policy only).
    #[arg(long, default_value_t = 4)]
    shepherd_ways: usize,

    /// Replacement policy to drive.
    #[arg(long, value_enum, default_value_t = Policy::Shepherd)]
    policy: Policy,

    /// Access pattern to generate.
    #[arg(long, value_enum, default_value_t = Pattern::Mixed)]
    pattern: Pattern,

    /// Number of accesses to simulate.
    #[arg(long, default_value_t = 1_000_000)]
    accesses: u64,

    /// Seed for the random components of the workload.
    #[arg(long, default_value_t = 0x00BA_D5EE_D123)]
    seed: u64,
}

/// Stateful generator producing `(address, is_write)` pairs.
struct Workload {
    pattern: Pattern,
    line_bytes: u64,
    capacity: u64,
    state: u64,
    stream_pos: u64,
    index: u64,
}

impl Workload {
    fn new(pattern: Pattern, config: &CacheConfig, seed: u64) -> Self {
        Self {
            pattern,
            line_bytes: config.line_bytes as u64,
            capacity: config.size_bytes as u64,
            // An xorshift generator stuck at zero never leaves it.
            state: if seed == 0 { 1 } else { seed },
            stream_pos: 0,
            index: 0,
        }
    }

    /// Advances the xorshift generator.
    fn rand(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Produces the next access. Every fourth access is a write.
    fn next_access(&mut self) -> (u64, bool) {
        let i = self.index;
        self.index += 1;

        let addr = match self.pattern {
            Pattern::Sequential => i * self.line_bytes,
            Pattern::Strided => (i * 3 * self.line_bytes) % (8 * self.capacity),
            Pattern::Looping => (i * self.line_bytes) % (2 * self.capacity),
            Pattern::Mixed => {
                let roll = self.rand();
                if roll % 10 < 7 {
                    // Working set of half the capacity.
                    let ws_lines = (self.capacity / 2) / self.line_bytes;
                    (self.rand() % ws_lines) * self.line_bytes
                } else {
                    // One-shot streaming pollution, offset past the working set.
                    self.stream_pos += 1;
                    self.capacity + self.stream_pos * self.line_bytes
                }
            }
        };

        (addr, i % 4 == 0)
    }
}

/// Final JSON report for one run.
#[derive(Debug, Serialize)]
struct Report {
    policy: String,
    pattern: String,
    size_bytes: usize,
    line_bytes: usize,
    ways: usize,
    shepherd_ways: Option<usize>,
    hit_rate: f64,
    stats: CacheStats,
}

/// Drives `accesses` generated accesses through one cache instance.
fn drive<P: ReplacementPolicy>(
    config: &CacheConfig,
    policy: P,
    pattern: Pattern,
    accesses: u64,
    seed: u64,
) -> Result<CacheStats, Box<dyn std::error::Error>> {
    let mut cache = CacheSim::new(config, policy)?;
    let mut workload = Workload::new(pattern, config, seed);

    for _ in 0..accesses {
        let (addr, is_write) = workload.next_access();
        let _ = cache.access(addr, is_write);
    }

    Ok(cache.stats.clone())
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CacheConfig {
        size_bytes: cli.size_bytes,
        line_bytes: cli.line_bytes,
        ways: cli.ways,
        shepherd_ways: cli.shepherd_ways,
        policy: cli.policy.into(),
    };

    let stats = match cli.policy {
        Policy::Shepherd => drive(
            &config,
            ShepherdPolicy::from_config(&config)?,
            cli.pattern,
            cli.accesses,
            cli.seed,
        )?,
        Policy::Fifo => drive(&config, FifoPolicy::new(), cli.pattern, cli.accesses, cli.seed)?,
        Policy::Lru => drive(&config, LruPolicy::new(), cli.pattern, cli.accesses, cli.seed)?,
        Policy::Random => drive(
            &config,
            RandomPolicy::with_seed(cli.seed),
            cli.pattern,
            cli.accesses,
            cli.seed,
        )?,
    };

    let report = Report {
        policy: format!("{:?}", cli.policy).to_lowercase(),
        pattern: format!("{:?}", cli.pattern).to_lowercase(),
        size_bytes: cli.size_bytes,
        line_bytes: cli.line_bytes,
        ways: cli.ways,
        shepherd_ways: (cli.policy == Policy::Shepherd).then_some(cli.shepherd_ways),
        hit_rate: stats.hit_rate(),
        stats,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
