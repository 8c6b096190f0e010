//! Adapter selection by table URI.

use log::debug;

use super::errors::{AdapterError, AdapterResult};
use super::Adapter;

/// Builds adapters for the URIs it recognizes.
pub trait AdapterFactory {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Whether this factory handles the URI. With `fast` set the answer
    /// must come without I/O; `None` means "can't tell cheaply", and the
    /// registry will ask again with `fast` unset.
    fn supports(&self, uri: &str, fast: bool) -> Option<bool>;

    /// Builds an adapter for a URI this factory supports.
    fn create(&self, uri: &str) -> AdapterResult<Box<dyn Adapter>>;
}

/// An explicitly constructed set of adapter factories.
///
/// Resolution is two-pass: every factory gets a cheap look first, and
/// only the undecided ones are asked to do real work (network probes,
/// file sniffing). First match wins in registration order, so cheap
/// deciders registered early shield expensive ones.
#[derive(Default)]
pub struct AdapterRegistry {
    factories: Vec<Box<dyn AdapterFactory>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, factory: Box<dyn AdapterFactory>) {
        self.factories.push(factory);
    }

    /// Finds the factory responsible for a URI.
    pub fn find(&self, uri: &str) -> AdapterResult<&dyn AdapterFactory> {
        let mut undecided = Vec::new();
        for factory in &self.factories {
            match factory.supports(uri, true) {
                Some(true) => {
                    debug!("Adapter {} claimed {uri}", factory.name());
                    return Ok(factory.as_ref());
                }
                Some(false) => {}
                None => undecided.push(factory),
            }
        }
        for factory in undecided {
            if factory.supports(uri, false) == Some(true) {
                debug!("Adapter {} claimed {uri} on the slow pass", factory.name());
                return Ok(factory.as_ref());
            }
        }
        Err(AdapterError::NoAdapter(uri.to_string()))
    }

    /// Resolves and builds an adapter in one step.
    pub fn open(&self, uri: &str) -> AdapterResult<Box<dyn Adapter>> {
        self.find(uri)?.create(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct PrefixFactory {
        name: &'static str,
        prefix: &'static str,
        decisive: bool,
        slow_calls: Cell<usize>,
    }

    impl PrefixFactory {
        fn new(name: &'static str, prefix: &'static str, decisive: bool) -> Self {
            Self {
                name,
                prefix,
                decisive,
                slow_calls: Cell::new(0),
            }
        }
    }

    impl AdapterFactory for PrefixFactory {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports(&self, uri: &str, fast: bool) -> Option<bool> {
            if fast && !self.decisive {
                return None;
            }
            if !fast {
                self.slow_calls.set(self.slow_calls.get() + 1);
            }
            Some(uri.starts_with(self.prefix))
        }

        fn create(&self, _uri: &str) -> AdapterResult<Box<dyn Adapter>> {
            Err(AdapterError::Other("not built in tests".to_string()))
        }
    }

    #[test]
    fn test_fast_pass_wins_without_slow_probes() {
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(PrefixFactory::new("slow", "csv:", false)));
        registry.register(Box::new(PrefixFactory::new("fast", "csv:", true)));
        let found = registry.find("csv:/tmp/data.csv").unwrap();
        assert_eq!(found.name(), "fast");
    }

    #[test]
    fn test_undecided_factories_get_a_slow_pass() {
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(PrefixFactory::new("sniffing", "csv:", false)));
        let found = registry.find("csv:/tmp/data.csv").unwrap();
        assert_eq!(found.name(), "sniffing");
    }

    #[test]
    fn test_unclaimed_uri_is_an_error() {
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(PrefixFactory::new("csv", "csv:", true)));
        assert!(matches!(
            registry.find("https://example.com/sheet"),
            Err(AdapterError::NoAdapter(_))
        ));
    }
}
