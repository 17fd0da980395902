use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 题目文件错误
    #[error("题目错误: {0}")]
    Question(#[from] QuestionError),
    /// 文件读写错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 文档模板错误
    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 后台任务异常退出
    #[error("任务执行失败: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// 题目文档中出问题的部分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionElement {
    /// `\question{...}` 题干标签
    Statement,
    /// `\begin{answers} ... \end{answers}` 选项块
    AnswersBlock,
    /// `\answer{...}` 选项标签
    Answer,
}

impl fmt::Display for QuestionElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionElement::Statement => write!(f, "题干标签 \\question"),
            QuestionElement::AnswersBlock => write!(f, "选项块 answers"),
            QuestionElement::Answer => write!(f, "选项标签 \\answer"),
        }
    }
}

/// 结构问题的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    /// 缺失
    Missing,
    /// 出现多次
    Duplicated,
    /// 花括号不配对
    Unbalanced,
    /// 缺少结束标记
    Unterminated,
    /// 与其他标签交叠
    Overlapping,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Missing => write!(f, "缺失"),
            Problem::Duplicated => write!(f, "重复出现"),
            Problem::Unbalanced => write!(f, "花括号不配对"),
            Problem::Unterminated => write!(f, "缺少结束标记"),
            Problem::Overlapping => write!(f, "与其他标签交叠"),
        }
    }
}

/// 题目文档错误
#[derive(Debug, Error)]
pub enum QuestionError {
    /// 题目文档结构不合法
    #[error("题目 {source_id} 格式错误: {element}{problem}")]
    Malformed {
        source_id: String,
        element: QuestionElement,
        problem: Problem,
    },
    /// 正确选项数量不是恰好一个
    #[error("题目 {source_id} 应当恰好有 1 个正确选项，实际为 {correct_count} 个")]
    InvariantViolation {
        source_id: String,
        correct_count: usize,
    },
    /// 标签正则编译失败
    #[error("题目 {source_id} 无法解析: 标签正则不合法: {source}")]
    Pattern {
        source_id: String,
        #[source]
        source: regex::Error,
    },
}

impl QuestionError {
    /// 出错的题目来源标识
    pub fn source_id(&self) -> &str {
        match self {
            QuestionError::Malformed { source_id, .. }
            | QuestionError::InvariantViolation { source_id, .. }
            | QuestionError::Pattern { source_id, .. } => source_id,
        }
    }
}

/// 文件操作种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    /// 读取文件
    Read,
    /// 读取目录
    ReadDir,
    /// 写入文件
    Write,
    /// 重命名临时文件
    Rename,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageOperation::Read => write!(f, "读取文件"),
            StorageOperation::ReadDir => write!(f, "读取目录"),
            StorageOperation::Write => write!(f, "写入文件"),
            StorageOperation::Rename => write!(f, "重命名文件"),
        }
    }
}

/// 文件读写错误
#[derive(Debug, Error)]
#[error("{operation}失败 ({}): {source}", .path.display())]
pub struct StorageError {
    pub path: PathBuf,
    pub operation: StorageOperation,
    #[source]
    pub source: std::io::Error,
}

impl StorageError {
    pub fn new(path: impl AsRef<Path>, operation: StorageOperation, source: std::io::Error) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            operation,
            source,
        }
    }
}

/// 文档模板错误
#[derive(Debug, Error)]
pub enum TemplateError {
    /// 模板编译失败
    #[error("模板 {name} 编译失败: {source}")]
    Compile {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    /// 模板渲染失败
    #[error("模板 {name} 渲染失败: {source}")]
    Render {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 题目目录中没有符合命名规则的文件
    #[error("目录 {} 中没有找到 {prefix}*{extension} 题目文件", .folder.display())]
    NoQuestionSources {
        folder: PathBuf,
        prefix: String,
        extension: String,
    },
    /// 传入组卷的题目列表为空
    #[error("题目列表为空，无法组卷")]
    EmptyQuestionPool,
    /// 没有配置任何试卷版本
    #[error("至少需要配置一个试卷版本")]
    NoVersions,
    /// 版本标签不合法
    #[error("版本标签 '{label}' 不合法: 不能为空，也不能包含路径分隔符")]
    InvalidVersionLabel { label: String },
    /// 版本标签重复
    #[error("版本标签 '{label}' 重复")]
    DuplicateVersion { label: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("无法读取配置文件 {}: {source}", .path.display())]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件 {} 解析失败: {source}", .path.display())]
    FileParseFailed {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
}

// ========== 便捷构造函数 ==========

impl QuestionError {
    /// 创建题目格式错误
    pub fn malformed(source_id: impl Into<String>, element: QuestionElement, problem: Problem) -> Self {
        QuestionError::Malformed {
            source_id: source_id.into(),
            element,
            problem,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
