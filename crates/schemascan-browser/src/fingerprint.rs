use rand::Rng;

/// Fingerprint configuration for anti-detection.
///
/// A fresh fingerprint is drawn for every fetch so repeated scans do not
/// present an identical automation signature to the target site.
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    pub user_agent: String,
    pub accept_language: String,
}

impl FingerprintConfig {
    /// Generate a randomized fingerprint configuration
    pub fn randomized() -> Self {
        let mut rng = rand::thread_rng();

        // Common desktop user agents
        let user_agents = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ];

        let ua_idx = rng.gen_range(0..user_agents.len());

        Self {
            user_agent: user_agents[ua_idx].to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_randomized_fingerprint() {
        let config = FingerprintConfig::randomized();
        assert!(!config.user_agent.is_empty());
        assert!(config.user_agent.contains("Chrome"));
        assert!(!config.accept_language.is_empty());
    }

    #[test]
    fn test_fingerprint_variation() {
        // Configs should be different at least some of the time
        // (This is probabilistic but very unlikely to fail)
        let configs: Vec<_> = (0..10).map(|_| FingerprintConfig::randomized()).collect();

        let first_ua = &configs[0].user_agent;
        let all_same = configs.iter().all(|c| &c.user_agent == first_ua);
        assert!(!all_same, "Expected variation in user agents");
    }
}
