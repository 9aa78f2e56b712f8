use crate::error::FormatRejectedError;
use std::path::Path;

/// 支持的输入格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// JSON：数组逐项拆分，其它值整体作为一条引用
    Json,
    /// 纯文本 / CSV：按行拆分
    Lines,
}

impl ContentFormat {
    /// 根据声明的 content type 和文件扩展名推断格式
    ///
    /// 两者都无法识别时返回 `None`
    pub fn infer(file_name: &str, content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let extension = Path::new(file_name)
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());

        if mime == "application/json"
            || mime.ends_with("+json")
            || extension.as_deref() == Some("json")
        {
            return Some(ContentFormat::Json);
        }
        if matches!(mime.as_str(), "text/plain" | "text/csv")
            || matches!(extension.as_deref(), Some("txt") | Some("csv"))
        {
            return Some(ContentFormat::Lines);
        }
        None
    }
}

/// 用户提交的一个文件
///
/// 入队后不可变；字节内容只在提取阶段使用一次
#[derive(Debug, Clone)]
pub struct InputFile {
    pub id: String,
    pub name: String,
    pub content_type: String,
    pub payload: Vec<u8>,
}

impl InputFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            content_type: content_type.into(),
            payload: payload.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// 推断格式，不支持时返回入队拒绝错误
    pub fn format(&self) -> Result<ContentFormat, FormatRejectedError> {
        ContentFormat::infer(&self.name, &self.content_type).ok_or_else(|| FormatRejectedError {
            file_name: self.name.clone(),
            content_type: self.content_type.clone(),
        })
    }
}
