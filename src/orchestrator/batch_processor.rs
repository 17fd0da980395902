//! 批量版本处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责所有版本的调度和资源管理。
//!
//! 1. **应用初始化**：校验配置、加载文档模板、创建组卷器和写入服务
//! 2. **加载题目**：扫描题目目录（`Vec<QuestionSource>`）
//! 3. **并发生成**：每个版本一个 tokio 任务，各自持有独立的随机数源
//! 4. **全局统计**：汇总所有版本的处理结果
//!
//! 某个版本失败不会影响其他版本，所有任务结束后返回第一个错误。

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, StorageError, StorageOperation};
use crate::models::loaders::load_question_sources;
use crate::models::question::{QuestionSource, WrittenExam};
use crate::orchestrator::version_processor;
use crate::services::{ExamTemplate, ExamWriter};
use crate::utils::logging::{log_sources_loaded, log_startup, print_final_stats};
use crate::workflow::ExamAssembler;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{error, info};

/// 应用主结构
pub struct App {
    config: Config,
    assembler: Arc<ExamAssembler>,
    writer: Arc<ExamWriter>,
}

/// 运行结果
#[derive(Debug, Default)]
pub struct RunSummary {
    /// 成功写入的版本
    pub written: Vec<WrittenExam>,
    /// 失败的版本数
    pub failed: usize,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;

        log_startup(&config);

        let custom_document = match &config.template.template_path {
            Some(path) => {
                info!("📄 使用自定义文档模板: {}", path.display());
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| StorageError::new(path, StorageOperation::Read, e))?;
                Some(content)
            }
            None => None,
        };

        let template = ExamTemplate::new(&config.template, custom_document)?;
        let assembler = ExamAssembler::new(template, config.strict_validation);
        let writer = ExamWriter::from_config(&config);

        Ok(Self {
            config,
            assembler: Arc::new(assembler),
            writer: Arc::new(writer),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        // 加载所有题目
        let sources = self.load_sources().await?;

        if sources.is_empty() {
            return Err(ConfigError::NoQuestionSources {
                folder: self.config.question_folder.clone(),
                prefix: self.config.question_prefix.clone(),
                extension: self.config.question_extension.clone(),
            }
            .into());
        }

        log_sources_loaded(sources.len(), &self.config.question_folder);

        self.process_all_versions(Arc::new(sources)).await
    }

    /// 加载题目
    async fn load_sources(&self) -> AppResult<Vec<QuestionSource>> {
        info!("\n📁 正在扫描题目文件...");
        let sources = load_question_sources(
            &self.config.question_folder,
            &self.config.question_prefix,
            &self.config.question_extension,
        )
        .await?;
        Ok(sources)
    }

    /// 每个版本的随机数源
    ///
    /// 设置了种子时第 i 个版本使用 `seed + i`，否则从操作系统取熵。
    fn rng_for(&self, version_index: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(version_index as u64)),
            None => StdRng::from_os_rng(),
        }
    }

    /// 并发处理所有版本
    async fn process_all_versions(&self, sources: Arc<Vec<QuestionSource>>) -> AppResult<RunSummary> {
        let mut handles = Vec::new();

        for (index, version) in self.config.versions.iter().enumerate() {
            let rng = self.rng_for(index);
            let assembler = self.assembler.clone();
            let writer = self.writer.clone();
            let sources = sources.clone();
            let version_clone = version.clone();

            let handle = tokio::spawn(async move {
                version_processor::process_version(
                    &assembler,
                    &writer,
                    &sources,
                    &version_clone,
                    rng,
                )
                .await
            });
            handles.push((version.clone(), handle));
        }

        // 等待所有版本完成
        let mut summary = RunSummary::default();
        let mut first_error: Option<AppError> = None;

        for (version, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(AppError::from(e)),
            };

            match outcome {
                Ok(written) => summary.written.push(written),
                Err(e) => {
                    error!("[版本 {}] ❌ 生成失败: {}", version, e);
                    summary.failed += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        print_final_stats(
            summary.written.len(),
            summary.failed,
            self.config.versions.len(),
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }
}
