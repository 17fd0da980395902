use crate::error::{StorageError, StorageOperation};
use crate::models::question::QuestionSource;
use std::path::Path;
use tokio::fs;

/// 文件名是否符合题目文件命名规则（固定前缀 + 固定扩展名）
pub fn is_question_file(file_name: &str, prefix: &str, extension: &str) -> bool {
    file_name.starts_with(prefix) && file_name.ends_with(extension)
}

/// 读取单个题目文件
pub async fn load_question_source(path: &Path) -> Result<QuestionSource, StorageError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::new(path, StorageOperation::Read, e))?;

    let id = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(QuestionSource {
        id,
        path: path.to_path_buf(),
        content,
    })
}

/// 从文件夹中加载所有题目文件
///
/// 结果按文件名排序，保证相同种子下组卷结果可复现。
pub async fn load_question_sources(
    folder: &Path,
    prefix: &str,
    extension: &str,
) -> Result<Vec<QuestionSource>, StorageError> {
    let mut entries = fs::read_dir(folder)
        .await
        .map_err(|e| StorageError::new(folder, StorageOperation::ReadDir, e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StorageError::new(folder, StorageOperation::ReadDir, e))?
    {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_question_file(&file_name, prefix, extension) {
            continue;
        }

        let file_type = entry
            .file_type()
            .await
            .map_err(|e| StorageError::new(&path, StorageOperation::Read, e))?;
        if !file_type.is_file() {
            tracing::debug!("跳过非普通文件: {}", path.display());
            continue;
        }

        paths.push(path);
    }
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let source = load_question_source(&path).await?;
        tracing::debug!("已加载题目: {} ({} 字节)", source.id, source.content.len());
        sources.push(source);
    }

    Ok(sources)
}
