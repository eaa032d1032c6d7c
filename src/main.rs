// ==========================================
// 蛋鸡生产记录核心 - 命令行入口
// ==========================================
// 子命令: 导入 / 导出 / 半月汇总
// 约定: 日志写 stderr；导出文本与报告写 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use aviary_records::app::{get_default_db_path, AppState};
use aviary_records::engine::{available_fortnights, FilterSpec, TimeWindow};
use aviary_records::exporter::write_export_file;
use aviary_records::logging::{self, LogFormat};
use aviary_records::{Aviary, RecordImporter};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// 蛋鸡生产记录: 派生指标、批次关联、CSV 导入导出
#[derive(Debug, Parser)]
#[command(name = "aviary-records", version, about, long_about = None)]
struct Cli {
    /// SQLite 数据库路径（默认读取 AVIARY_RECORDS_DB_PATH 或用户数据目录）
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// 以 JSON 行输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 导入日产记录 CSV
    ImportProducao {
        /// .csv / .txt 文件
        file: PathBuf,
    },
    /// 导入鸡群特征快照 CSV
    ImportCaracterizacao {
        /// .csv / .txt 文件
        file: PathBuf,
    },
    /// 导出日产记录（含派生字段）
    ExportProducao {
        /// 输出文件（缺省写 stdout）
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// 导出鸡群特征快照
    ExportCaracterizacao {
        /// 输出文件（缺省写 stdout）
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// 按半月汇总
    Resumo {
        /// 时间窗口
        #[arg(long, value_enum, default_value_t = WindowArg::Todos)]
        janela: WindowArg,

        /// 指定半月（如 "Mar/2024 - 1ª Quinzena"，优先于年份与窗口）
        #[arg(long)]
        quinzena: Option<String>,

        /// 指定年份（优先于窗口）
        #[arg(long)]
        ano: Option<i32>,

        /// 鸡舍编号 1-4
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        aviario: Option<u8>,

        /// 批次号（按批次关联结果匹配）
        #[arg(long)]
        lote: Option<String>,

        /// 列出可选半月后退出
        #[arg(long)]
        listar_quinzenas: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WindowArg {
    #[value(name = "7d")]
    Last7,
    #[value(name = "30d")]
    Last30,
    Mes,
    Ano,
    Todos,
}

impl From<WindowArg> for TimeWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Last7 => TimeWindow::Last7Days,
            WindowArg::Last30 => TimeWindow::Last30Days,
            WindowArg::Mes => TimeWindow::CurrentMonth,
            WindowArg::Ano => TimeWindow::CurrentYear,
            WindowArg::Todos => TimeWindow::All,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_with_format(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });
    tracing::info!(version = aviary_records::VERSION, "{}", aviary_records::APP_NAME);

    let db_path = cli
        .db
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    match cli.command {
        Command::ImportProducao { file } => {
            let report = state
                .importer
                .import_production_file(&file)
                .with_context(|| format!("导入失败: {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::ImportCaracterizacao { file } => {
            let report = state
                .importer
                .import_characterization_file(&file)
                .with_context(|| format!("导入失败: {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::ExportProducao { output } => {
            let text = state.export_production_text()?;
            emit(&text, output.as_deref())?;
        }
        Command::ExportCaracterizacao { output } => {
            let text = state.export_characterization_text()?;
            emit(&text, output.as_deref())?;
        }
        Command::Resumo {
            janela,
            quinzena,
            ano,
            aviario,
            lote,
            listar_quinzenas,
        } => {
            if listar_quinzenas {
                for label in available_fortnights(&state.computed_records()?) {
                    println!("{}", label);
                }
                return Ok(());
            }

            let aviary = match aviario {
                Some(n) => match Aviary::from_number(n) {
                    Some(a) => Some(a),
                    None => bail!("鸡舍编号超出范围: {}", n),
                },
                None => None,
            };
            let filter = FilterSpec {
                window: janela.into(),
                fortnight: quinzena,
                year: ano,
                aviary,
                batch: lote,
            };
            let summary = state.period_summary(&filter)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// 写文件或 stdout
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => write_export_file(path, text)
            .with_context(|| format!("写出失败: {}", path.display()))?,
        None => print!("{}", text),
    }
    Ok(())
}
