use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 沒有 scheme 時補上的預設值
const DEFAULT_SCHEME: &str = "https://";

/// 可直接使用的 scheme 前綴
const KNOWN_SCHEMES: [&str; 2] = ["http://", "https://"];

/// 讀取網址檔案
pub fn load_url_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("while reading URLs from {:?}", path.display().to_string()))?;

    read_urls(BufReader::new(file))
        .with_context(|| format!("while reading URLs from {:?}", path.display().to_string()))
}

/// 逐行解析網址
/// 空行略過，缺少 scheme 的補上 https://
pub fn read_urls<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    for line in reader.lines() {
        let line = line.context("讀取行失敗")?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        urls.push(normalize_url(line));
    }

    Ok(urls)
}

/// 正規化 URL（補上預設 scheme）
fn normalize_url(url: &str) -> String {
    if has_known_scheme(url) {
        url.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, url)
    }
}

fn has_known_scheme(url: &str) -> bool {
    KNOWN_SCHEMES.iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
