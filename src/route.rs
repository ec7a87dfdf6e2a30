//! Hash Routes
//!
//! `#/` and `#/dashboard` show the dashboard (also the fallback for unknown
//! paths); `#/scan` shows the scanner.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Scan,
}

impl Route {
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').trim_end_matches('/');
        match path {
            "/scan" | "scan" => Route::Scan,
            _ => Route::Dashboard,
        }
    }

    /// Route for the current `location.hash`
    pub fn current() -> Self {
        Self::from_hash(&crate::browser::current_hash())
    }

    pub fn href(&self) -> &'static str {
        match self {
            Route::Dashboard => "#/dashboard",
            Route::Scan => "#/scan",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Scan => "Scan",
        }
    }
}
