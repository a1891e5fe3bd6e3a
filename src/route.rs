//! URL paths and the screens they map to.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardTab {
    Home,
    Transactions,
    Profile,
    Statistics,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    Dashboard(DashboardTab),
}

impl Route {
    /// Map a path to a route. The root and unknown paths go to the login screen.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "/register" => Route::Register,
            "/forgot-password" => Route::ForgotPassword,
            "/dashboard" => Route::Dashboard(DashboardTab::Home),
            "/dashboard/transactions" => Route::Dashboard(DashboardTab::Transactions),
            "/dashboard/profile" => Route::Dashboard(DashboardTab::Profile),
            "/dashboard/statistics" => Route::Dashboard(DashboardTab::Statistics),
            _ => Route::Login,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::ForgotPassword => "/forgot-password",
            Route::Dashboard(DashboardTab::Home) => "/dashboard",
            Route::Dashboard(DashboardTab::Transactions) => "/dashboard/transactions",
            Route::Dashboard(DashboardTab::Profile) => "/dashboard/profile",
            Route::Dashboard(DashboardTab::Statistics) => "/dashboard/statistics",
        }
    }

    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard(_))
    }

    /// The route to actually show: protected routes fall back to the login
    /// screen when there is no session.
    pub fn resolve(self, has_session: bool) -> Self {
        if self.is_protected() && !has_session {
            Route::Login
        } else {
            self
        }
    }
}

/// What the root component has to change so that both its route state and
/// the address bar show `resolved`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Redirect {
    pub route: Option<Route>,
    pub path: Option<&'static str>,
}

impl Redirect {
    pub fn between(route: Route, resolved: Route, current_path: &str) -> Self {
        Self {
            route: (route != resolved).then_some(resolved),
            path: (current_path != resolved.path()).then(|| resolved.path()),
        }
    }

    pub fn is_none(&self) -> bool {
        self.route.is_none() && self.path.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardTab, Redirect, Route};

    #[test]
    fn root_and_unknown_paths_go_to_login() {
        assert_eq!(Route::from_path("/"), Route::Login);
        assert_eq!(Route::from_path(""), Route::Login);
        assert_eq!(Route::from_path("/nowhere"), Route::Login);
    }

    #[test]
    fn every_route_round_trips_through_its_path() {
        let routes = [
            Route::Login,
            Route::Register,
            Route::ForgotPassword,
            Route::Dashboard(DashboardTab::Home),
            Route::Dashboard(DashboardTab::Transactions),
            Route::Dashboard(DashboardTab::Profile),
            Route::Dashboard(DashboardTab::Statistics),
        ];

        for route in routes {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(
            Route::from_path("/dashboard/profile/"),
            Route::Dashboard(DashboardTab::Profile)
        );
    }

    #[test]
    fn dashboard_requires_a_session() {
        let statistics = Route::Dashboard(DashboardTab::Statistics);

        assert_eq!(statistics.resolve(false), Route::Login);
        assert_eq!(statistics.resolve(true), statistics);
        assert_eq!(Route::Register.resolve(false), Route::Register);
    }

    #[test]
    fn back_to_dashboard_after_logout_returns_to_login() {
        let dashboard = Route::Dashboard(DashboardTab::Home);
        let resolved = dashboard.resolve(false);

        let redirect = Redirect::between(dashboard, resolved, "/dashboard");

        assert_eq!(redirect.route, Some(Route::Login));
        assert_eq!(redirect.path, Some("/login"));
    }

    #[test]
    fn matching_state_and_address_need_no_redirect() {
        let profile = Route::Dashboard(DashboardTab::Profile);

        assert!(Redirect::between(profile, profile.resolve(true), "/dashboard/profile").is_none());
        assert!(Redirect::between(Route::Login, Route::Login, "/login").is_none());
    }

    #[test]
    fn root_path_is_rewritten_without_changing_the_route() {
        let redirect = Redirect::between(Route::Login, Route::Login, "/");

        assert_eq!(redirect.route, None);
        assert_eq!(redirect.path, Some("/login"));
    }
}
