//! 1局面を探索して最善手を表示する

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hisha_core::search::{
    DEFAULT_MAX_DEPTH, DEFAULT_QUIESCENCE_DEPTH, DEFAULT_TT_BITS, DEFAULT_TT_MIN_DEPTH, SearchConfig,
    SearchSession,
};
use tools::common::io::write_output;
use tools::position::load_position;
use tools::report::ThinkReport;

#[derive(Parser, Debug)]
#[command(author, version, about = "alpha-beta search with root-split workers")]
struct Cli {
    /// 局面（SFEN または "position ..." 行）
    #[arg(long)]
    sfen: Option<String>,

    /// CSA形式の棋譜ファイル（.gz 可）
    #[arg(long)]
    csa: Option<PathBuf>,

    /// 局面に続けて指すUSI形式の手
    #[arg(long, num_args = 1..)]
    moves: Vec<String>,

    /// 最大探索深さ
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: i32,

    /// 静止探索に入る深さ
    #[arg(long, default_value_t = DEFAULT_QUIESCENCE_DEPTH)]
    quiescence_depth: i32,

    /// ワーカースレッド数
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// 思考時間(ms)。未指定なら無制限
    #[arg(long)]
    time_ms: Option<u64>,

    /// 置換表の升数（手番ごと、2の冪の指数）
    #[arg(long, default_value_t = DEFAULT_TT_BITS)]
    tt_bits: u32,

    /// 置換表に記録する最小の残り深さ
    #[arg(long, default_value_t = DEFAULT_TT_MIN_DEPTH)]
    tt_min_depth: i32,

    /// 根の手を配る順序の乱数シード
    #[arg(long)]
    seed: Option<u64>,

    /// 1スレッドで根の手を順に探索する
    #[arg(long)]
    sequential: bool,

    /// 結果をJSONで出力する
    #[arg(long)]
    json: bool,

    /// JSONの出力先（"-" は標準出力、.gz は圧縮）
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let pos = load_position(cli.sfen.as_deref(), cli.csa.as_deref(), &cli.moves)?;

    let defaults = SearchConfig::default();
    let config = SearchConfig {
        max_depth: cli.depth,
        quiescence_depth: cli.quiescence_depth,
        threads: cli.threads,
        thinking_time: cli.time_ms.map(Duration::from_millis),
        tt_bits: cli.tt_bits,
        tt_min_depth: cli.tt_min_depth,
        seed: cli.seed.unwrap_or(defaults.seed),
        ..defaults
    };
    let session = Arc::new(SearchSession::new(config)?);

    let result = if cli.sequential { session.run_sequential(&pos) } else { session.run(&pos) };
    let result = result.context("search failed")?;

    let report = ThinkReport::new(&pos, &result);
    if cli.json {
        let mut body = serde_json::to_vec_pretty(&report)?;
        body.push(b'\n');
        write_output(&cli.output, &body)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}
