use crate::models::InputFile;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 根据扩展名给出 content type，未知扩展名返回 `application/octet-stream`
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

/// 读取单个文件为 InputFile
pub async fn load_input_file(path: &Path) -> Result<InputFile> {
    let payload = fs::read(path)
        .await
        .with_context(|| format!("无法读取文件: {}", path.display()))?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(InputFile::new(name, content_type_for(path), payload))
}

/// 读取文件夹下的所有文件（不递归），按文件名排序
///
/// 格式检查留给入队阶段，这里不过滤扩展名
pub async fn load_input_files(folder_path: &str) -> Result<Vec<InputFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match load_input_file(&path).await {
            Ok(file) => {
                tracing::info!("正在加载: {} ({} bytes)", file.name, file.size());
                files.push(file);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(files)
}
