// ==========================================
// 储备分配系统 - 运行 API
// ==========================================
// 职责: 文件级编排（读取 → 分配 → 装车 → 写出），单次与批量运行
// 隔离: 每次运行独立加载目录与模板，运行间不共享可变状态
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::RunConfig;
use crate::engine::{PlanEvent, PlanEventSink, PlanOrchestrator, TracingEventSink};
use crate::importer::{DemandLoader, OutputWriter, ReserveLoader, TemplateLoader};
use crate::perf::PerfGuard;

// ==========================================
// 请求/响应
// ==========================================

/// 单次运行请求（也是批量清单中的一项）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub demand: PathBuf,
    pub reserve: PathBuf,
    #[serde(default)]
    pub template: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl PlanRequest {
    pub fn new(demand: impl Into<PathBuf>, reserve: impl Into<PathBuf>) -> Self {
        Self {
            demand: demand.into(),
            reserve: reserve.into(),
            template: None,
            output: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// 单次运行报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRunReport {
    pub run_id: String,
    pub output_path: PathBuf,
    pub demand_records: usize,
    pub allocation_items: usize,
    pub output_rows: usize,
    pub trucks: u64,
}

/// 读取批量清单（JSON 数组）
pub fn load_manifest(path: &Path) -> ApiResult<Vec<PlanRequest>> {
    let manifest_error = |message: String| ApiError::Manifest {
        path: path.display().to_string(),
        message,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| manifest_error(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| manifest_error(e.to_string()))
}

/// 默认输出位置: <临时目录>/reserve_output_<run_id>.xlsx
pub fn default_output_path(run_id: &str) -> PathBuf {
    std::env::temp_dir().join(format!("reserve_output_{}.xlsx", run_id))
}

// ==========================================
// PlanApi - 运行 API
// ==========================================

#[derive(Clone)]
pub struct PlanApi {
    config: RunConfig,
    sink: Arc<dyn PlanEventSink>,
    orchestrator: PlanOrchestrator,
}

impl PlanApi {
    /// 创建 API（进度事件写入 tracing 日志）
    pub fn new(config: RunConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingEventSink))
    }

    pub fn with_sink(config: RunConfig, sink: Arc<dyn PlanEventSink>) -> Self {
        Self {
            config,
            sink,
            orchestrator: PlanOrchestrator::new(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// 单次运行
    ///
    /// # 流程
    /// 1. 读取需求表、储备表；模板表仅在提供且 use_template 开启时读取
    /// 2. 分配 + 装车
    /// 3. 写出输出表（排序后）
    #[instrument(skip_all, fields(demand = %request.demand.display()))]
    pub fn run_files(&self, request: &PlanRequest) -> ApiResult<PlanRunReport> {
        let _perf = PerfGuard::new("run_files");
        validate_request(request)?;

        let run_id = Uuid::new_v4().to_string();
        let sink = self.sink.as_ref();

        let demand = DemandLoader::new().load(&request.demand)?;
        sink.emit(&PlanEvent::TableLoaded {
            table: "demand".to_string(),
            records: demand.len(),
        });

        let catalog = ReserveLoader::new().load(&request.reserve)?;
        sink.emit(&PlanEvent::TableLoaded {
            table: "reserve".to_string(),
            records: catalog.reserve.len(),
        });

        let template = match (&request.template, self.config.use_template) {
            (Some(path), true) => {
                let template = TemplateLoader::new().load(path)?;
                sink.emit(&PlanEvent::TableLoaded {
                    table: "template".to_string(),
                    records: template.entries.len(),
                });
                Some(template)
            }
            (Some(path), false) => {
                info!(template = %path.display(), "use_template 关闭，忽略模板文件");
                None
            }
            (None, _) => None,
        };

        let result = self
            .orchestrator
            .run(&demand, catalog, template, &self.config, sink);

        let output_path = request
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&run_id));
        let written = OutputWriter::new().write(&output_path, &result.rows)?;
        sink.emit(&PlanEvent::OutputWritten {
            path: output_path.display().to_string(),
            rows: written,
        });

        info!(
            run_id = %run_id,
            output = %output_path.display(),
            rows = written,
            trucks = result.trucks,
            "运行完成"
        );

        Ok(PlanRunReport {
            run_id,
            output_path,
            demand_records: demand.len(),
            allocation_items: result.allocation_items.len(),
            output_rows: written,
            trucks: result.trucks,
        })
    }

    /// 批量运行
    ///
    /// 每个请求在独立的阻塞任务中执行；单个失败不影响其他请求，结果按请求顺序返回
    pub async fn run_batch(
        &self,
        requests: Vec<PlanRequest>,
    ) -> Vec<Result<PlanRunReport, String>> {
        info!(requests = requests.len(), "开始批量运行");

        let handles = requests.into_iter().map(|request| {
            let api = self.clone();
            tokio::task::spawn_blocking(move || api.run_files(&request))
        });

        let results: Vec<Result<PlanRunReport, String>> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(Ok(report)) => Ok(report),
                Ok(Err(e)) => Err(e.to_string()),
                Err(join_err) => Err(format!("任务执行失败: {}", join_err)),
            })
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = results.len(), "批量运行存在失败项");
        }
        results
    }
}

fn validate_request(request: &PlanRequest) -> ApiResult<()> {
    if request.demand.as_os_str().is_empty() {
        return Err(ApiError::InvalidInput("未指定需求文件".to_string()));
    }
    if request.reserve.as_os_str().is_empty() {
        return Err(ApiError::InvalidInput("未指定储备文件".to_string()));
    }
    Ok(())
}
