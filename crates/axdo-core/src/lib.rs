/*!
axdo-core - Accessibility Automation Core

A platform-agnostic engine for resolving UI elements by fuzzy descriptors and
driving them: click, type, drag, scroll, fill forms, read back state, batch
multiple steps with control flow, and render a filtered tree for an LLM or a
human. The OS-specific half (the actual accessibility backend) is out of
scope here — only its contract, [`platform::PlatformAdapter`], is specified,
with [`platform::mock::MockAdapter`] standing in for tests.

```ignore
use axdo_core::{Engine, batch};
use axdo_core::types::Scope;
use axdo_core::executor::{Action, Target};

let engine = Engine::builder()
    .cache_ttl(Duration::from_millis(500))
    .build(adapter);

let scope = Scope::for_app("Mail");
let result = engine.execute(&scope, &Action::Click {
    target: Target::Text { query: "Send".into(), roles: vec![], exact: false },
    button: MouseButton::Left,
    count: 1,
    verify: VerifyRequest::default(),
    post_read: false,
    display: false,
})?;

let steps = batch::parse::parse_program(&program_json)?;
let outcome = engine.run_batch(scope, true, &steps);
```
*/

pub mod a11y;
pub mod batch;
pub mod cache;
pub mod config;
pub mod executor;
pub mod model;
pub mod platform;
pub mod resolver;
pub mod serializer;
pub mod types;
mod verifier;

use std::sync::Arc;
use std::time::Duration;

use cache::TreeCache;
use config::{EngineConfig, EngineConfigBuilder};
use executor::{Action, ActionResult, Executor};
use model::Element;
use platform::PlatformAdapter;
use serializer::{RenderContext, RenderHeader, Rendered, SerializeOptions};
use types::{CoreResult, Scope};

/// The engine: a Platform Adapter, a Tree Cache, and resolved config,
/// bundled behind the one entry point callers need (spec §4.2, §4.4,
/// §4.7). Cheap to clone — the adapter is an `Arc`, the cache is its own
/// mutex-guarded state.
pub struct Engine {
  adapter: Arc<dyn PlatformAdapter>,
  cache: TreeCache,
  config: EngineConfig,
}

impl std::fmt::Debug for Engine {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Engine").field("config", &self.config).finish_non_exhaustive()
  }
}

/// Builder for [`Engine`], mirroring `EngineConfigBuilder`'s shape but
/// deferring construction to `.build(adapter)` since the engine also
/// owns the adapter and the Tree Cache.
#[derive(Debug, Default)]
#[must_use = "builder does nothing until .build() is called"]
pub struct EngineBuilder {
  config: EngineConfigBuilder,
}

impl EngineBuilder {
  /// Tree Cache TTL. `None` disables caching (spec §3.6).
  pub const fn cache_ttl(mut self, ttl: Option<Duration>) -> Self {
    self.config = self.config.cache_ttl(ttl);
    self
  }

  /// Delay before the first verify re-read. Default: 100ms.
  pub const fn verify_delay(mut self, delay: Duration) -> Self {
    self.config = self.config.verify_delay(delay);
    self
  }

  /// Max verify fallback retries. Default: 2.
  pub const fn verify_max_retries(mut self, retries: u32) -> Self {
    self.config = self.config.verify_max_retries(retries);
    self
  }

  /// Polling interval for `wait`/`assert`. Default: 500ms.
  pub const fn poll_interval(mut self, interval: Duration) -> Self {
    self.config = self.config.poll_interval(interval);
    self
  }

  /// Search radius in pixels for resolver "near" mode. Default: 200.0.
  pub const fn near_radius(mut self, radius: f64) -> Self {
    self.config = self.config.near_radius(radius);
    self
  }

  /// Cap on the display-element side read. Default: 20.
  pub const fn max_display_elements(mut self, cap: usize) -> Self {
    self.config = self.config.max_display_elements(cap);
    self
  }

  /// Default agent-format element cap for web content. Default: 200.
  pub const fn agent_element_cap_web(mut self, cap: usize) -> Self {
    self.config = self.config.agent_element_cap_web(cap);
    self
  }

  /// Finish building, wiring in the Platform Adapter.
  pub fn build(self, adapter: Arc<dyn PlatformAdapter>) -> Engine {
    let config = self.config.build();
    Engine {
      adapter,
      cache: TreeCache::new(config.cache_ttl),
      config,
    }
  }
}

impl Engine {
  /// Start building an engine from default config.
  pub fn builder() -> EngineBuilder {
    EngineBuilder::default()
  }

  /// Build an engine with default config over `adapter`.
  pub fn new(adapter: Arc<dyn PlatformAdapter>) -> Self {
    Self::builder().build(adapter)
  }

  /// Execute a single action (spec §4.4).
  pub fn execute(&self, scope: &Scope, action: &Action) -> CoreResult<ActionResult> {
    Executor::new(self.adapter.as_ref(), &self.cache, self.config).execute(scope, action)
  }

  /// Run a parsed batch program (spec §4.7).
  pub fn run_batch(&self, defaults: Scope, stop_on_error: bool, steps: &[batch::Step]) -> batch::BatchResult {
    batch::run_batch(self.adapter.as_ref(), &self.cache, self.config, defaults, stop_on_error, steps)
  }

  /// Read the current element tree for `scope`, through the Tree Cache.
  pub fn read(&self, scope: &Scope) -> CoreResult<Arc<Element>> {
    self.cache.get_or_read(self.adapter.as_ref(), scope)
  }

  /// Render a tree snapshot for `scope` in agent or structured format
  /// (spec §4.6).
  pub fn render(&self, scope: &Scope, header: &RenderHeader, opts: &SerializeOptions, ctx: RenderContext) -> CoreResult<Rendered> {
    let tree = self.read(scope)?;
    Ok(serializer::render(&tree, header, opts, ctx))
  }

  /// Drop cached reads for `app`, forcing the next read to hit the
  /// adapter (spec §4.2 "Invalidation").
  pub fn invalidate(&self, app: &str) {
    self.cache.invalidate(app);
  }
}
