use std::path::PathBuf;

/// 正确选项标记
pub const CORRECT_MARKER: &str = "[correct]";

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerEntry {
    /// 是否为正确选项
    pub correct: bool,
    /// 选项原文
    pub text: String,
}

impl AnswerEntry {
    pub fn new(correct: bool, text: impl Into<String>) -> Self {
        Self {
            correct,
            text: text.into(),
        }
    }

    /// 序列化为 `\answer{...}` 或 `\answer[correct]{...}`
    pub fn to_tex(&self) -> String {
        let marker = if self.correct { CORRECT_MARKER } else { "" };
        format!("\\answer{}{{{}}}", marker, self.text)
    }
}

/// 从磁盘读取的题目源文件
#[derive(Debug, Clone)]
pub struct QuestionSource {
    /// 来源标识（文件名）
    pub id: String,
    /// 文件完整路径
    pub path: PathBuf,
    /// 文件全文
    pub content: String,
}

impl QuestionSource {
    /// 不经过磁盘直接构造（测试和内存组卷用）
    pub fn in_memory(id: impl Into<String>, content: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            path: PathBuf::from(&id),
            id,
            content: content.into(),
        }
    }
}

/// 组卷结果：答案卷与学生卷
#[derive(Debug, Clone)]
pub struct RenderedExam {
    /// 版本标签
    pub version: String,
    /// 题目数量
    pub question_count: usize,
    /// 带正确标记的答案卷
    pub solution: String,
    /// 去掉正确标记的学生卷
    pub student: String,
}

impl RenderedExam {
    /// 答案卷中正确标记出现的次数
    pub fn marker_count(&self) -> usize {
        self.solution.matches(CORRECT_MARKER).count()
    }
}

/// 已落盘的试卷
#[derive(Debug, Clone)]
pub struct WrittenExam {
    pub version: String,
    pub question_count: usize,
    pub solution_path: PathBuf,
    pub student_path: PathBuf,
}
