//! 题目处理上下文
//!
//! 封装"我正在组哪个版本的第几题"这一信息

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 试卷版本标签
    pub version: String,

    /// 题目来源（文件名）
    pub source_id: String,

    /// 题号（从1开始）
    pub question_number: usize,

    /// 本卷题目总数
    pub question_count: usize,
}

impl QuestionCtx {
    /// 创建新的题目上下文
    pub fn new(
        version: impl Into<String>,
        source_id: impl Into<String>,
        question_number: usize,
        question_count: usize,
    ) -> Self {
        Self {
            version: version.into(),
            source_id: source_id.into(),
            question_number,
            question_count,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[版本 {} 第 {}/{} 题 来源 {}]",
            self.version, self.question_number, self.question_count, self.source_id
        )
    }
}
