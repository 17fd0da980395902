//! 试卷写入服务
//!
//! 只负责把渲染好的试卷写到磁盘，不关心组卷流程。
//! 每个文件先写入同目录下的隐藏临时文件，再重命名到目标位置，
//! 失败时不会留下写了一半的试卷，也不会只替换答案卷和学生卷中的一份。

use crate::config::Config;
use crate::error::{StorageError, StorageOperation};
use crate::models::question::{RenderedExam, WrittenExam};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// 文件名模板中的版本占位符
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// 试卷写入服务
pub struct ExamWriter {
    output_folder: PathBuf,
    solution_pattern: String,
    student_pattern: String,
}

impl ExamWriter {
    /// 创建新的试卷写入服务
    pub fn new(
        output_folder: impl Into<PathBuf>,
        solution_pattern: impl Into<String>,
        student_pattern: impl Into<String>,
    ) -> Self {
        Self {
            output_folder: output_folder.into(),
            solution_pattern: solution_pattern.into(),
            student_pattern: student_pattern.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.output_folder(),
            config.solution_file_pattern.clone(),
            config.student_file_pattern.clone(),
        )
    }

    /// 答案卷路径
    pub fn solution_path(&self, version: &str) -> PathBuf {
        self.output_folder
            .join(self.solution_pattern.replace(VERSION_PLACEHOLDER, version))
    }

    /// 学生卷路径
    pub fn student_path(&self, version: &str) -> PathBuf {
        self.output_folder
            .join(self.student_pattern.replace(VERSION_PLACEHOLDER, version))
    }

    /// 写入答案卷和学生卷
    ///
    /// 已存在的同名文件会被覆盖。两份文件要么都换成新内容，要么都保持原样：
    /// 先把两份临时文件都写好，再依次重命名；学生卷重命名失败时把答案卷回滚到旧内容。
    pub async fn write(&self, exam: &RenderedExam) -> Result<WrittenExam, StorageError> {
        fs::create_dir_all(&self.output_folder)
            .await
            .map_err(|e| StorageError::new(&self.output_folder, StorageOperation::Write, e))?;

        let solution_path = self.solution_path(&exam.version);
        let student_path = self.student_path(&exam.version);

        let solution_temp = stage(&solution_path, &exam.solution).await?;
        let student_temp = match stage(&student_path, &exam.student).await {
            Ok(temp) => temp,
            Err(e) => {
                let _ = fs::remove_file(&solution_temp).await;
                return Err(e);
            }
        };

        commit_pair(
            (solution_temp.as_path(), solution_path.as_path()),
            (student_temp.as_path(), student_path.as_path()),
        )
        .await?;

        Ok(WrittenExam {
            version: exam.version.clone(),
            question_count: exam.question_count,
            solution_path,
            student_path,
        })
    }
}

/// 同目录下的隐藏兄弟文件，例如 `.exam_A.tex.tmp`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}", file_name, suffix))
}

/// 写入临时文件，返回临时文件路径
async fn stage(path: &Path, content: &str) -> Result<PathBuf, StorageError> {
    let temp_path = sibling(path, "tmp");

    debug!("写入临时文件: {} ({} 字节)", temp_path.display(), content.len());

    if let Err(e) = fs::write(&temp_path, content).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::new(&temp_path, StorageOperation::Write, e));
    }
    Ok(temp_path)
}

/// 把两份临时文件重命名到目标位置
///
/// 第一份目标原有的普通文件先挪到 `.bak`，第二份失败时据此恢复。
async fn commit_pair(
    (first_temp, first_path): (&Path, &Path),
    (second_temp, second_path): (&Path, &Path),
) -> Result<(), StorageError> {
    let backup = match fs::metadata(first_path).await {
        Ok(meta) if meta.is_file() => {
            let backup_path = sibling(first_path, "bak");
            if let Err(e) = fs::rename(first_path, &backup_path).await {
                discard(&[first_temp, second_temp]).await;
                return Err(StorageError::new(first_path, StorageOperation::Rename, e));
            }
            Some(backup_path)
        }
        _ => None,
    };

    if let Err(e) = fs::rename(first_temp, first_path).await {
        restore(first_path, backup.as_deref()).await;
        discard(&[first_temp, second_temp]).await;
        return Err(StorageError::new(first_path, StorageOperation::Rename, e));
    }

    if let Err(e) = fs::rename(second_temp, second_path).await {
        let _ = fs::remove_file(first_path).await;
        restore(first_path, backup.as_deref()).await;
        discard(&[second_temp]).await;
        return Err(StorageError::new(second_path, StorageOperation::Rename, e));
    }

    if let Some(backup_path) = backup {
        let _ = fs::remove_file(&backup_path).await;
    }
    Ok(())
}

/// 把备份挪回原位
async fn restore(path: &Path, backup: Option<&Path>) {
    if let Some(backup_path) = backup {
        if let Err(e) = fs::rename(backup_path, path).await {
            warn!("⚠️ 无法恢复 {} 的旧内容: {}", path.display(), e);
        }
    }
}

async fn discard(temps: &[&Path]) {
    for temp in temps {
        let _ = fs::remove_file(temp).await;
    }
}
