//! 命令行参数定义

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mlt_core::Pass;

/// MarkerSynth: 根据 Shotcut 时间线标记生成图片 producer、标记轨道和混合 transition
#[derive(Parser, Debug)]
#[command(name = "markersynth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// 配置文件路径，默认使用数据目录下的 markersynth.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 源工程文件，覆盖配置中的 source_path
    #[arg(long, global = true)]
    pub source: Option<PathBuf>,

    /// 日志详细程度 (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 列出源工程中的标记
    Markers(MarkersArgs),

    /// 按文件名为标记绑定图片和视频
    Bind(BindArgs),

    /// 执行合成步骤并输出结果
    Synthesize(SynthesizeArgs),

    /// 比较两个文件
    Diff(DiffArgs),

    /// 合成并写入配置中的导出目录
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct MarkersArgs {
    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BindArgs {
    /// 素材所在目录
    #[arg(long)]
    pub folder: PathBuf,

    /// 标记 JSON 的输出路径，省略时打印到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SynthesizeArgs {
    /// 已绑定素材的标记 JSON，省略时直接从工程中提取
    #[arg(long)]
    pub markers: Option<PathBuf>,

    /// 要执行的步骤，可重复指定，省略时执行全部步骤
    #[arg(long = "pass", value_name = "PASS")]
    pub passes: Vec<Pass>,

    /// 输出文件，省略时打印到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 同时打印差异预览
    #[arg(long)]
    pub diff: bool,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    pub original: PathBuf,
    pub modified: PathBuf,

    /// 每处差异前后保留的行数
    #[arg(long, default_value = "3")]
    pub context: usize,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// 已绑定素材的标记 JSON
    #[arg(long)]
    pub markers: Option<PathBuf>,
}
