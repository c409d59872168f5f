//! Route enablement lookup.
//!
//! Gateway routes are gated at startup by `(module, route)` pairs parsed from
//! the `ENABLED_ROUTES` environment variable. A route whose flag resolves
//! false is never registered with the router; the path is simply absent.
//!
//! Spec format: comma-separated `module.route` entries, `module.*` wildcards,
//! or the literal `all`. An unset variable enables everything; a set-but-empty
//! value enables nothing.

use std::collections::HashSet;
use std::env;

use crate::domain::ConfigError;

const ENABLED_ROUTES_VAR: &str = "ENABLED_ROUTES";

/// Parsed route enablement flags, consulted once while building the router.
#[derive(Debug, Clone)]
pub struct RouteToggles {
    all: bool,
    modules: HashSet<String>,
    routes: HashSet<(String, String)>,
}

impl RouteToggles {
    /// Every route enabled (the unset-variable default).
    #[must_use]
    pub fn all_enabled() -> Self {
        Self {
            all: true,
            modules: HashSet::new(),
            routes: HashSet::new(),
        }
    }

    /// Every route disabled.
    #[must_use]
    pub fn none_enabled() -> Self {
        Self {
            all: false,
            modules: HashSet::new(),
            routes: HashSet::new(),
        }
    }

    /// Parse a spec string like `embedding.index,inference.*,token.count`.
    pub fn from_spec(spec: &str) -> Result<Self, ConfigError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Ok(Self::none_enabled());
        }
        if spec.eq_ignore_ascii_case("all") {
            return Ok(Self::all_enabled());
        }

        let mut modules = HashSet::new();
        let mut routes = HashSet::new();
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let Some((module, route)) = entry.split_once('.') else {
                return Err(ConfigError::InvalidValue {
                    key: ENABLED_ROUTES_VAR.to_string(),
                    message: format!("entry '{entry}' is not of the form module.route"),
                });
            };
            if module.is_empty() || route.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: ENABLED_ROUTES_VAR.to_string(),
                    message: format!("entry '{entry}' has an empty module or route name"),
                });
            }
            if route == "*" {
                modules.insert(module.to_string());
            } else {
                routes.insert((module.to_string(), route.to_string()));
            }
        }

        Ok(Self {
            all: false,
            modules,
            routes,
        })
    }

    /// Read the spec from `ENABLED_ROUTES`; unset means everything enabled.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(ENABLED_ROUTES_VAR) {
            Ok(spec) => Self::from_spec(&spec),
            Err(env::VarError::NotPresent) => Ok(Self::all_enabled()),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
                key: ENABLED_ROUTES_VAR.to_string(),
                message: "value is not valid unicode".to_string(),
            }),
        }
    }

    #[must_use]
    pub fn is_enabled(&self, module: &str, route: &str) -> bool {
        self.all
            || self.modules.contains(module)
            || self
                .routes
                .contains(&(module.to_string(), route.to_string()))
    }
}
