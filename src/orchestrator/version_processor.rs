//! 单个版本处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责生成单个版本的试卷，是版本级别的编排器。
//!
//! 1. **组卷**：委托 `ExamAssembler` 生成答案卷和学生卷
//! 2. **落盘**：委托 `ExamWriter` 原子写入两份文件
//! 3. **日志输出**：记录开始和完成信息

use crate::error::AppResult;
use crate::models::question::{QuestionSource, WrittenExam};
use crate::services::ExamWriter;
use crate::utils::logging::{log_version_complete, log_version_start};
use crate::workflow::ExamAssembler;
use rand::rngs::StdRng;

/// 生成并写入单个版本
///
/// # 参数
/// - `assembler`: 组卷器
/// - `writer`: 试卷写入服务
/// - `sources`: 全部题目
/// - `version`: 版本标签
/// - `rng`: 本版本独占的随机数源
///
/// # 返回
/// 返回写入的文件信息
pub async fn process_version(
    assembler: &ExamAssembler,
    writer: &ExamWriter,
    sources: &[QuestionSource],
    version: &str,
    mut rng: StdRng,
) -> AppResult<WrittenExam> {
    log_version_start(version, sources.len());

    // 两份试卷都在内存中渲染完成后才开始写文件
    let exam = assembler.assemble(sources, version, &mut rng)?;
    let written = writer.write(&exam).await?;

    log_version_complete(&written);
    Ok(written)
}
