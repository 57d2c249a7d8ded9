//! Fixed page route table of the GridMind front-end.

use serde::Serialize;

/// A page of the demo site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    /// Landing page.
    Home,
    /// Diagnostics upload and verdict.
    Diagnostics,
    /// Grid command map with cascade simulation.
    GridCommand,
    /// Operator training modules.
    Training,
    /// 3D transformer viewer.
    ArView,
    /// Camera overlay demo.
    ArCamera,
    /// Manual node ingestion form.
    DataIngestion,
    /// Technology overview.
    Technology,
}

impl Route {
    /// Every route in navigation order.
    pub const ALL: [Route; 8] = [
        Route::Home,
        Route::Diagnostics,
        Route::GridCommand,
        Route::Training,
        Route::ArView,
        Route::ArCamera,
        Route::DataIngestion,
        Route::Technology,
    ];

    /// URL path.
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Diagnostics => "/diagnostics",
            Self::GridCommand => "/grid-command",
            Self::Training => "/training",
            Self::ArView => "/ar-view",
            Self::ArCamera => "/ar-camera",
            Self::DataIngestion => "/data-ingestion",
            Self::Technology => "/technology",
        }
    }

    /// Navigation title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Diagnostics => "AI Diagnostics",
            Self::GridCommand => "Grid Command",
            Self::Training => "Training",
            Self::ArView => "AR Transformer View",
            Self::ArCamera => "AR Camera",
            Self::DataIngestion => "Data Ingestion",
            Self::Technology => "Technology",
        }
    }

    /// Resolves a path, ignoring a trailing slash and any query string.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|r| r.path() == trimmed)
    }
}

/// Serializable route entry.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    /// Route key.
    pub route: Route,
    /// URL path.
    pub path: &'static str,
    /// Navigation title.
    pub title: &'static str,
}

/// The full route table.
pub fn route_table() -> Vec<RouteInfo> {
    Route::ALL
        .into_iter()
        .map(|route| RouteInfo {
            route,
            path: route.path(),
            title: route.title(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_back() {
        for r in Route::ALL {
            assert_eq!(Route::from_path(r.path()), Some(r));
        }
    }

    #[test]
    fn trailing_slash_and_query_ignored() {
        assert_eq!(Route::from_path("/grid-command/"), Some(Route::GridCommand));
        assert_eq!(Route::from_path("/diagnostics?asset=X"), Some(Route::Diagnostics));
        assert_eq!(Route::from_path(""), Some(Route::Home));
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[test]
    fn table_has_unique_paths() {
        let table = route_table();
        let mut paths: Vec<&str> = table.iter().map(|r| r.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), Route::ALL.len());
    }
}
