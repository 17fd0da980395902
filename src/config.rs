use crate::error::ConfigError;
use crate::services::exam_template::DEFAULT_INSTRUCTIONS;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 指定 TOML 配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "EXAM_CONFIG_FILE";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题目文件所在目录
    pub question_folder: PathBuf,
    /// 输出目录，未设置时与题目目录相同
    pub output_folder: Option<PathBuf>,
    /// 题目文件名前缀
    pub question_prefix: String,
    /// 题目文件扩展名
    pub question_extension: String,
    /// 要生成的试卷版本
    pub versions: Vec<String>,
    /// 答案卷文件名，`{version}` 会被替换为版本标签
    pub solution_file_pattern: String,
    /// 学生卷文件名
    pub student_file_pattern: String,
    /// 随机种子，设置后结果可复现
    pub seed: Option<u64>,
    /// 是否严格校验题目（恰好一个题干、一个选项块、一个正确选项）
    pub strict_validation: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 文档模板配置
    pub template: TemplateSettings,
}

/// 文档模板配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// 试卷标题，渲染时追加 ` (版本)`
    pub exam_title: String,
    /// 是否输出答题说明
    pub include_instructions: bool,
    /// 答题说明模板
    pub instructions: String,
    /// 答题说明中是否写出题目数量
    pub show_question_count: bool,
    /// 答案卷中是否加粗正确选项
    pub highlight_correct: bool,
    /// 自定义文档模板文件
    pub template_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_folder: PathBuf::from("./"),
            output_folder: None,
            question_prefix: "q".to_string(),
            question_extension: ".tex".to_string(),
            versions: vec!["A".to_string(), "B".to_string()],
            solution_file_pattern: "exam_{version}_solution.tex".to_string(),
            student_file_pattern: "exam_{version}.tex".to_string(),
            seed: None,
            strict_validation: true,
            verbose_logging: false,
            template: TemplateSettings::default(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            exam_title: "Module 2: Exam".to_string(),
            include_instructions: true,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            show_question_count: true,
            highlight_correct: false,
            template_path: None,
        }
    }
}

impl Config {
    /// 加载配置：先读 `EXAM_CONFIG_FILE` 指定的 TOML 文件（如有），再应用环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::FileParseFailed {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用外部键值覆盖配置项
    ///
    /// `lookup` 根据变量名返回取值，便于测试时不依赖真实环境变量。
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("EXAM_QUESTION_FOLDER") {
            self.question_folder = PathBuf::from(v);
        }
        if let Some(v) = lookup("EXAM_OUTPUT_FOLDER") {
            self.output_folder = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("EXAM_QUESTION_PREFIX") {
            self.question_prefix = v;
        }
        if let Some(v) = lookup("EXAM_QUESTION_EXTENSION") {
            self.question_extension = v;
        }
        if let Some(v) = lookup("EXAM_VERSIONS") {
            self.versions = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("EXAM_SEED") {
            self.seed = Some(parse_var("EXAM_SEED", &v, "u64")?);
        }
        if let Some(v) = lookup("EXAM_STRICT_VALIDATION") {
            self.strict_validation = parse_var("EXAM_STRICT_VALIDATION", &v, "bool")?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        if let Some(v) = lookup("EXAM_TITLE") {
            self.template.exam_title = v;
        }
        if let Some(v) = lookup("EXAM_TEMPLATE_PATH") {
            self.template.template_path = Some(PathBuf::from(v));
        }
        Ok(self)
    }

    /// 检查版本标签：至少一个、不能重复、不能含路径分隔符
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.versions.is_empty() {
            return Err(ConfigError::NoVersions);
        }

        let mut seen = HashSet::new();
        for label in &self.versions {
            if label.trim().is_empty() || label.contains(['/', '\\']) || label == "." || label == ".." {
                return Err(ConfigError::InvalidVersionLabel {
                    label: label.clone(),
                });
            }
            if !seen.insert(label.as_str()) {
                return Err(ConfigError::DuplicateVersion {
                    label: label.clone(),
                });
            }
        }
        Ok(())
    }

    /// 实际输出目录
    pub fn output_folder(&self) -> &Path {
        self.output_folder
            .as_deref()
            .unwrap_or(self.question_folder.as_path())
    }
}

fn parse_var<T: std::str::FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    })
}
