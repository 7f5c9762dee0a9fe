use anyhow::{bail, Result};
use rand::Rng;

/// 目標網址列表（載入後不再變動）
#[derive(Debug, Clone)]
pub struct TargetList {
    urls: Vec<String>,
}

impl TargetList {
    /// 建立目標列表，空列表或空字串視為錯誤
    pub fn new(urls: Vec<String>) -> Result<Self> {
        if urls.is_empty() {
            bail!("there is no valid URLs in the target list");
        }
        if urls.iter().any(|url| url.is_empty()) {
            bail!("target list contains an empty URL");
        }

        Ok(Self { urls })
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// 均勻隨機挑選一個目標
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.urls[rng.random_range(0..self.urls.len())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

/// 派發統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// 已啟動的 worker 數量
    pub dispatched: u64,
}

impl DispatchStats {
    pub fn record_dispatch(&mut self) {
        self.dispatched += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_empty_target_list_rejected() {
        let err = TargetList::new(vec![]).unwrap_err();
        assert!(err.to_string().contains("no valid URLs"));
    }

    #[test]
    fn test_empty_entry_rejected() {
        let urls = vec!["https://example.com".to_string(), String::new()];
        assert!(TargetList::new(urls).is_err());
    }

    #[test]
    fn test_pick_stays_in_list() {
        let targets = TargetList::new(vec![
            "https://example.com".to_string(),
            "https://example.org".to_string(),
            "https://foo.test".to_string(),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            let url = targets.pick(&mut rng);
            assert!(targets.iter().any(|t| t == url));
            seen.insert(url.to_string());
        }

        assert_eq!(seen.len(), targets.len());
    }
}
