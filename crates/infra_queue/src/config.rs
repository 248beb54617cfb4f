//! Redis notifier configuration

/// Queue that receives bill notifications when none are configured
pub const DEFAULT_QUEUE: &str = "billing-mail-queue";

/// Connection settings and target queues for [`crate::RedisBillNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisNotifierConfig {
    /// Redis connection URL, e.g. `redis://localhost:6379`
    pub url: String,
    /// Lists every notification is pushed onto
    pub queues: Vec<String>,
}

impl RedisNotifierConfig {
    /// Creates a configuration targeting the default queue
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            queues: vec![DEFAULT_QUEUE.to_string()],
        }
    }

    /// Replaces the target queues
    ///
    /// Blank names are dropped; an empty result falls back to the default queue.
    pub fn queues<I, S>(mut self, queues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queues: Vec<String> = queues
            .into_iter()
            .map(Into::into)
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();

        self.queues = if queues.is_empty() {
            vec![DEFAULT_QUEUE.to_string()]
        } else {
            queues
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_queue() {
        let config = RedisNotifierConfig::new("redis://localhost");
        assert_eq!(config.queues, vec![DEFAULT_QUEUE.to_string()]);
    }

    #[test]
    fn test_queues_trimmed_and_blank_dropped() {
        let config = RedisNotifierConfig::new("redis://localhost")
            .queues([" billing-mail-queue ", "", "audit-queue"]);
        assert_eq!(config.queues, vec!["billing-mail-queue", "audit-queue"]);
    }

    #[test]
    fn test_empty_queues_fall_back_to_default() {
        let config = RedisNotifierConfig::new("redis://localhost").queues(Vec::<String>::new());
        assert_eq!(config.queues, vec![DEFAULT_QUEUE.to_string()]);
    }
}
