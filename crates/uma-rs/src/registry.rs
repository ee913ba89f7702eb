//! Per-target include hooks.
//!
//! An accelerator target can register the headers its generated modules need
//! (typically the vendor header declaring its driver API). `SourceModule`
//! consults this registry when `ModuleOptions::target` is set.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

pub type IncludeProvider = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

struct IncludeRegistry {
    providers: RwLock<HashMap<String, IncludeProvider>>,
}

impl IncludeRegistry {
    fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    fn register(&self, target: &str, provider: IncludeProvider) {
        self.providers
            .write()
            .expect("include registry poisoned")
            .insert(target.to_string(), provider);
    }

    fn get(&self, target: &str) -> Option<IncludeProvider> {
        self.providers
            .read()
            .expect("include registry poisoned")
            .get(target)
            .cloned()
    }

    fn list(&self) -> Vec<String> {
        let mut targets: Vec<String> = self
            .providers
            .read()
            .expect("include registry poisoned")
            .keys()
            .cloned()
            .collect();
        targets.sort();
        targets
    }
}

static GLOBAL_REGISTRY: OnceLock<IncludeRegistry> = OnceLock::new();

fn registry() -> &'static IncludeRegistry {
    GLOBAL_REGISTRY.get_or_init(IncludeRegistry::new)
}

/// Registers (or replaces) the include provider for `target`.
pub fn register_include_provider<F>(target: &str, provider: F)
where
    F: Fn() -> Vec<String> + Send + Sync + 'static,
{
    registry().register(target, Arc::new(provider));
}

/// Headers registered for `target`, empty when nothing is registered.
pub fn includes_for(target: &str) -> Vec<String> {
    registry()
        .get(target)
        .map(|provider| provider())
        .unwrap_or_default()
}

pub fn list_targets() -> Vec<String> {
    registry().list()
}
