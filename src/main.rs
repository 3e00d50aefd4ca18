// ==========================================
// 港口通航压力指数系统 - 命令行入口
// ==========================================
// 子命令:
//   run  - 导入事件/港口表 → 全流程 → 导出 CSV
//   lane - 单航线月度画像
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::{Path, PathBuf};
use transit_stress::importer::{EventImporter, PortImporter};
use transit_stress::{
    export, logging, LaneKey, PipelineConfig, PipelineInput, PipelineOutput, StressPipeline,
    TrafficFilter, TrafficType,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "港口通航压力指数 - 航段重建与拥堵指标批处理", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 日志以 JSON 行输出
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 执行全流程并导出结果
    Run(RunArgs),
    /// 输出单条航线的月度时长画像
    Lane(LaneArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TrafficOpt {
    All,
    Regional,
    Global,
    Unclassified,
}

impl From<TrafficOpt> for TrafficFilter {
    fn from(opt: TrafficOpt) -> Self {
        match opt {
            TrafficOpt::All => TrafficFilter::All,
            TrafficOpt::Regional => TrafficFilter::Only(TrafficType::Regional),
            TrafficOpt::Global => TrafficFilter::Only(TrafficType::Global),
            TrafficOpt::Unclassified => TrafficFilter::Only(TrafficType::Unclassified),
        }
    }
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// 港口事件表（.csv/.xlsx/.xls）
    #[arg(long, value_hint = ValueHint::FilePath)]
    events: PathBuf,

    /// 港口元数据表（.csv/.xlsx/.xls）
    #[arg(long, value_hint = ValueHint::FilePath)]
    ports: PathBuf,

    /// 流水线配置（JSON,可选）
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// 通航类型过滤
    #[arg(long, value_enum, default_value_t = TrafficOpt::All)]
    traffic: TrafficOpt,

    /// CSV 分隔符
    #[arg(long, default_value_t = ',')]
    csv_delimiter: char,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    input: InputArgs,

    /// 输出目录
    #[arg(short, long, default_value = "output", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct LaneArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long)]
    origin: i64,

    #[arg(long)]
    destination: i64,
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::from_json_file(p)
            .with_context(|| format!("加载配置失败: {}", p.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn execute(input: &InputArgs) -> Result<(StressPipeline, PipelineOutput)> {
    let config = load_config(input.config.as_deref())?;
    let pipeline = StressPipeline::new(config).context("配置校验失败")?;

    let delimiter = u8::try_from(input.csv_delimiter)
        .with_context(|| format!("CSV 分隔符必须为单字节字符: {:?}", input.csv_delimiter))?;

    let batch = EventImporter::with_csv_delimiter(delimiter)
        .import(&input.events)
        .with_context(|| format!("导入事件表失败: {}", input.events.display()))?;
    let ports = PortImporter::with_csv_delimiter(delimiter)
        .import(&input.ports)
        .with_context(|| format!("导入港口表失败: {}", input.ports.display()))?;

    let run_input = PipelineInput::new(batch.events, ports)
        .with_traffic_filter(input.traffic.into())
        .with_violations(batch.violations);
    let output = pipeline.run(run_input).context("流水线执行失败")?;
    Ok((pipeline, output))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    match cli.command {
        Commands::Run(args) => {
            let (_, output) = execute(&args.input)?;
            let files = export::write_all(&args.out_dir, &output)
                .with_context(|| format!("导出结果失败: {}", args.out_dir.display()))?;

            println!("{}", output.report);
            for file in files {
                println!("  -> {}", file.display());
            }
        }
        Commands::Lane(args) => {
            let (pipeline, output) = execute(&args.input)?;
            let lane = LaneKey::new(args.origin, args.destination);
            let profile = pipeline.lane_profile(&output, lane)?;

            println!("航线 {} ({} 个月)", profile.lane, profile.periods);
            println!("  中位数: {:.2} 小时", profile.median);
            println!("  Q25:    {:.2} 小时", profile.q25);
            println!("  Q75:    {:.2} 小时", profile.q75);
            println!("  外推:   {:.2} 小时", profile.extrapolated);
            for (month, hours) in &profile.series {
                println!("  {}  {:.2}", month, hours);
            }
        }
    }

    Ok(())
}
