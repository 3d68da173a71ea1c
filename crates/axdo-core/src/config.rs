/*!
Engine configuration and builder (SPEC_FULL.md §D): a `#[must_use]`
builder with `const fn` setters over a plain `Default`-able config
struct.
*/

use std::time::Duration;

/// Resolved configuration values. `Default` matches the spec's stated
/// defaults (500 ms cache TTL, 100 ms verify delay, 2 verify retries,
/// 500 ms poll interval, 200 px near radius, 20 max display elements,
/// 200-element web agent cap).
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
  pub cache_ttl: Option<Duration>,
  pub verify_delay: Duration,
  pub verify_max_retries: u32,
  pub poll_interval: Duration,
  pub near_radius: f64,
  pub max_display_elements: usize,
  pub agent_element_cap_web: usize,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      cache_ttl: Some(Duration::from_millis(500)),
      verify_delay: Duration::from_millis(100),
      verify_max_retries: 2,
      poll_interval: Duration::from_millis(500),
      near_radius: 200.0,
      max_display_elements: 20,
      agent_element_cap_web: 200,
    }
  }
}

/// Builder for [`EngineConfig`].
///
/// # Example
///
/// ```ignore
/// let config = EngineConfig::builder()
///     .cache_ttl(Duration::from_millis(500))
///     .verify_delay(Duration::from_millis(100))
///     .verify_max_retries(2)
///     .poll_interval(Duration::from_millis(500))
///     .near_radius(200.0)
///     .max_display_elements(20)
///     .agent_element_cap_web(200)
///     .build();
/// ```
#[derive(Debug, Default, Clone, Copy)]
#[must_use = "builder does nothing until .build() is called"]
pub struct EngineConfigBuilder {
  config: EngineConfig,
}

impl EngineConfigBuilder {
  /// Tree Cache TTL. `None` disables caching (spec §3.6).
  pub const fn cache_ttl(mut self, ttl: Option<Duration>) -> Self {
    self.config.cache_ttl = ttl;
    self
  }

  /// Delay before the first verify re-read. Default: 100ms.
  pub const fn verify_delay(mut self, delay: Duration) -> Self {
    self.config.verify_delay = delay;
    self
  }

  /// Max verify fallback retries. Default: 2.
  pub const fn verify_max_retries(mut self, retries: u32) -> Self {
    self.config.verify_max_retries = retries;
    self
  }

  /// Polling interval for `wait`/`assert`. Default: 500ms.
  pub const fn poll_interval(mut self, interval: Duration) -> Self {
    self.config.poll_interval = interval;
    self
  }

  /// Search radius in pixels for resolver "near" mode. Default: 200.0.
  pub const fn near_radius(mut self, radius: f64) -> Self {
    self.config.near_radius = radius;
    self
  }

  /// Cap on the display-element side read. Default: 20.
  pub const fn max_display_elements(mut self, cap: usize) -> Self {
    self.config.max_display_elements = cap;
    self
  }

  /// Default agent-format element cap for web content. Default: 200.
  pub const fn agent_element_cap_web(mut self, cap: usize) -> Self {
    self.config.agent_element_cap_web = cap;
    self
  }

  /// Finish building.
  pub const fn build(self) -> EngineConfig {
    self.config
  }
}

impl EngineConfig {
  /// Start building a config from defaults.
  pub fn builder() -> EngineConfigBuilder {
    EngineConfigBuilder::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_spec() {
    let config = EngineConfig::default();
    assert_eq!(config.cache_ttl, Some(Duration::from_millis(500)));
    assert_eq!(config.verify_max_retries, 2);
    assert_eq!(config.near_radius, 200.0);
  }

  #[test]
  fn builder_overrides_only_set_fields() {
    let config = EngineConfig::builder().near_radius(50.0).build();
    assert_eq!(config.near_radius, 50.0);
    assert_eq!(config.verify_max_retries, 2);
  }
}
