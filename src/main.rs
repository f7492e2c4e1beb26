// ==========================================
// 储备分配系统 - 命令行入口
// ==========================================
// 用法:
//   reserve-planner run <demand> <reserve> [--template F] [--output F] [--config F] [开关]
//   reserve-planner batch <manifest.json> [--config F] [开关]
// 开关: --no-template --no-scale --no-without-demand --truck-pallets N
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use reserve_planner::api::{load_manifest, PlanApi, PlanRequest};
use reserve_planner::config::{ConfigManager, RunConfig};
use reserve_planner::logging;
use std::path::PathBuf;

const USAGE: &str = "\
用法:
  reserve-planner run <需求表> <储备表> [--template 模板表] [--output 输出文件] [--config 配置文件] [开关]
  reserve-planner batch <清单.json> [--config 配置文件] [开关]

开关:
  --no-template          不使用历史模板
  --no-scale             不按当前需求缩放模板
  --no-without-demand    不输出无需求的模板键
  --truck-pallets N      默认整车托盘数";

// ==========================================
// 命令行参数
// ==========================================

#[derive(Debug, Clone, Default, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    no_template: bool,
    no_scale: bool,
    no_without_demand: bool,
    truck_pallets: Option<i64>,
}

impl CliOptions {
    /// 命令行开关覆写（最高优先级）
    fn apply(&self, config: &mut RunConfig) {
        if self.no_template {
            config.use_template = false;
        }
        if self.no_scale {
            config.scale_template = false;
        }
        if self.no_without_demand {
            config.include_template_without_demand = false;
        }
        if let Some(pallets) = self.truck_pallets {
            config.default_truck_pallets = pallets;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Run {
        request: PlanRequest,
        options: CliOptions,
    },
    Batch {
        manifest: PathBuf,
        options: CliOptions,
    },
    Help,
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| anyhow!("参数 {} 缺少取值", flag))
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let subcommand = match args.next() {
        Some(s) => s,
        None => return Ok(Command::Help),
    };

    let mut positional: Vec<String> = Vec::new();
    let mut options = CliOptions::default();
    let mut template: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--template" => template = Some(PathBuf::from(flag_value(&mut args, "--template")?)),
            "--output" => output = Some(PathBuf::from(flag_value(&mut args, "--output")?)),
            "--config" => options.config = Some(PathBuf::from(flag_value(&mut args, "--config")?)),
            "--truck-pallets" => {
                let raw = flag_value(&mut args, "--truck-pallets")?;
                let pallets = raw
                    .trim()
                    .parse::<i64>()
                    .with_context(|| format!("--truck-pallets 取值无效: {}", raw))?;
                options.truck_pallets = Some(pallets);
            }
            "--no-template" => options.no_template = true,
            "--no-scale" => options.no_scale = true,
            "--no-without-demand" => options.no_without_demand = true,
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            _ => positional.push(arg.clone()),
        }
    }

    match subcommand.as_str() {
        "run" => {
            let [demand, reserve]: [String; 2] = positional
                .try_into()
                .map_err(|_| anyhow!("run 需要两个位置参数: <需求表> <储备表>"))?;
            let mut request = PlanRequest::new(demand, reserve);
            request.template = template;
            request.output = output;
            Ok(Command::Run { request, options })
        }
        "batch" => {
            let [manifest]: [String; 1] = positional
                .try_into()
                .map_err(|_| anyhow!("batch 需要一个位置参数: <清单.json>"))?;
            Ok(Command::Batch {
                manifest: PathBuf::from(manifest),
                options,
            })
        }
        "-h" | "--help" | "help" => Ok(Command::Help),
        other => bail!("未知子命令: {}", other),
    }
}

/// 配置层级: 默认值 → 配置文件 → 环境变量 → 命令行开关
fn load_config(options: &CliOptions) -> Result<RunConfig> {
    let mut manager = ConfigManager::load(options.config.as_deref())?;
    options.apply(manager.config_mut());
    manager.validate()?;
    tracing::info!(config = %manager.snapshot()?, "生效配置");
    Ok(manager.into_config())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let command = parse_args(std::env::args().skip(1))?;
    if command != Command::Help {
        tracing::info!(
            "{} v{}",
            reserve_planner::APP_NAME,
            reserve_planner::VERSION
        );
    }

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Run { request, options } => {
            let api = PlanApi::new(load_config(&options)?);
            let report = tokio::task::spawn_blocking(move || api.run_files(&request)).await??;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Batch { manifest, options } => {
            let api = PlanApi::new(load_config(&options)?);
            let requests = load_manifest(&manifest)?;
            let results = api.run_batch(requests).await;

            let mut failed = 0usize;
            for (idx, result) in results.iter().enumerate() {
                match result {
                    Ok(report) => println!("[{}] {}", idx, serde_json::to_string(report)?),
                    Err(message) => {
                        failed += 1;
                        eprintln!("[{}] 失败: {}", idx, message);
                    }
                }
            }
            if failed > 0 {
                bail!("批量运行 {} / {} 项失败", failed, results.len());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_run_with_flags() {
        let command = parse_args(args(&[
            "run",
            "demand.xlsx",
            "reserve.xlsx",
            "--template",
            "tpl.xlsx",
            "--no-scale",
            "--truck-pallets",
            "20",
        ]))
        .unwrap();

        let expected_request =
            PlanRequest::new("demand.xlsx", "reserve.xlsx").with_template("tpl.xlsx");
        match command {
            Command::Run { request, options } => {
                assert_eq!(request, expected_request);
                assert!(options.no_scale);
                assert!(!options.no_template);
                assert_eq!(options.truck_pallets, Some(20));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_batch() {
        let command = parse_args(args(&["batch", "jobs.json", "--no-template"])).unwrap();
        assert_eq!(
            command,
            Command::Batch {
                manifest: PathBuf::from("jobs.json"),
                options: CliOptions {
                    no_template: true,
                    ..CliOptions::default()
                },
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&["run", "demand.xlsx"])).is_err());
        assert!(parse_args(args(&["run", "d", "r", "--bogus"])).is_err());
        assert!(parse_args(args(&["run", "d", "r", "--truck-pallets"])).is_err());
        assert!(parse_args(args(&["plan"])).is_err());
        assert_eq!(parse_args(Vec::new()).unwrap(), Command::Help);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let options = CliOptions {
            no_template: true,
            no_without_demand: true,
            truck_pallets: Some(18),
            ..CliOptions::default()
        };
        let mut config = RunConfig::default();
        options.apply(&mut config);

        assert!(!config.use_template);
        assert!(config.scale_template);
        assert!(!config.include_template_without_demand);
        assert_eq!(config.default_truck_pallets, 18);
    }
}
