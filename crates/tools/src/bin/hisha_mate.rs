//! df-pn で手番側の詰みを調べる

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hisha_core::mate::{MateConfig, MateSolver};
use tools::common::io::write_output;
use tools::position::load_position;
use tools::report::MateReport;

#[derive(Parser, Debug)]
#[command(author, version, about = "df-pn mate solver for the side to move")]
struct Cli {
    /// 局面（SFEN または "position ..." 行）
    #[arg(long)]
    sfen: Option<String>,

    /// CSA形式の局面ファイル（.gz 可）
    #[arg(long)]
    csa: Option<PathBuf>,

    /// 局面に続けて指すUSI形式の手
    #[arg(long, num_args = 1..)]
    moves: Vec<String>,

    /// 証明数テーブルの升数（2の冪の指数）
    #[arg(long, default_value_t = 20)]
    table_bits: u32,

    /// 展開するノード数の上限（0 なら無制限）
    #[arg(long, default_value_t = 0)]
    max_nodes: u64,

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
    if !(1..=30).contains(&cli.table_bits) {
        anyhow::bail!("--table-bits must be within 1..=30");
    }
    let mut pos = load_position(cli.sfen.as_deref(), cli.csa.as_deref(), &cli.moves)?;

    let mut solver = MateSolver::new(MateConfig {
        table_bits: cli.table_bits,
        max_nodes: cli.max_nodes,
    });
    let result = solver.solve(&mut pos);

    let report = MateReport::new(&pos, &result);
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
