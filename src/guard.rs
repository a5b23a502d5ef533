//! Routes and the two authentication guards.
//!
//! | Route       | Path                      | Guard      |
//! |-------------|---------------------------|------------|
//! | `Login`     | `/login`                  | guest-only |
//! | `Register`  | `/register`               | guest-only |
//! | `Home`      | `/`                       | protected  |
//! | `Releases`  | `/releases`               | protected  |
//!
//! Both guards ask the backend `auth/status` and fail closed: any error
//! while checking counts as "not authenticated".

use crate::api::AuthApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Home,
    Releases,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Authenticated visitors are sent home.
    GuestOnly,
    /// Unauthenticated visitors are sent to the login route.
    Protected,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Home => "/",
            Route::Releases => "/releases",
        }
    }

    pub fn access(self) -> Access {
        match self {
            Route::Login | Route::Register => Access::GuestOnly,
            Route::Home | Route::Releases => Access::Protected,
        }
    }
}

/// What a settled guard shows: the view or a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Render,
    Redirect(Route),
}

/// Pure decision once the authentication status is known.
pub fn decide(access: Access, authenticated: bool) -> GuardState {
    match (access, authenticated) {
        (Access::GuestOnly, true) => GuardState::Redirect(Route::Home),
        (Access::GuestOnly, false) => GuardState::Render,
        (Access::Protected, true) => GuardState::Render,
        (Access::Protected, false) => GuardState::Redirect(Route::Login),
    }
}

/// Ask the backend whether the session is valid. Never errors.
pub async fn check_authenticated(api: &dyn AuthApi) -> bool {
    match api.auth_status().await {
        Ok(status) => status.authenticated,
        Err(e) => {
            tracing::warn!("auth status check failed, treating as signed out: {}", e);
            false
        }
    }
}

/// Run the guard for `route` to completion.
pub async fn resolve(route: Route, api: &dyn AuthApi) -> GuardState {
    let authenticated = check_authenticated(api).await;
    let state = decide(route.access(), authenticated);
    tracing::debug!(route = route.path(), authenticated, ?state, "route guard resolved");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthStatus, LoginResponse};
    use crate::errors::ApiError;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    enum FakeStatus {
        Authenticated(bool),
        Unauthorized,
        ServerDown,
    }

    struct FakeAuth(FakeStatus);

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn register(&self, _: &str, _: &str, _: &str) -> Result<(), ApiError> {
            unreachable!()
        }
        async fn login(&self, _: &str, _: &str) -> Result<LoginResponse, ApiError> {
            unreachable!()
        }
        async fn logout(&self) -> Result<(), ApiError> {
            unreachable!()
        }
        async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
            match self.0 {
                FakeStatus::Authenticated(authenticated) => Ok(AuthStatus { authenticated }),
                FakeStatus::Unauthorized => Err(ApiError::Unauthorized),
                FakeStatus::ServerDown => Err(ApiError::Status {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                }),
            }
        }
    }

    #[test]
    fn decision_table() {
        assert_eq!(decide(Access::GuestOnly, true), GuardState::Redirect(Route::Home));
        assert_eq!(decide(Access::GuestOnly, false), GuardState::Render);
        assert_eq!(decide(Access::Protected, true), GuardState::Render);
        assert_eq!(decide(Access::Protected, false), GuardState::Redirect(Route::Login));
    }

    #[test]
    fn route_access() {
        assert_eq!(Route::Login.access(), Access::GuestOnly);
        assert_eq!(Route::Releases.access(), Access::Protected);
    }

    #[tokio::test]
    async fn protected_route_renders_when_authenticated() {
        let api = FakeAuth(FakeStatus::Authenticated(true));
        assert_eq!(resolve(Route::Home, &api).await, GuardState::Render);
    }

    #[tokio::test]
    async fn guest_route_redirects_home_when_authenticated() {
        let api = FakeAuth(FakeStatus::Authenticated(true));
        assert_eq!(
            resolve(Route::Login, &api).await,
            GuardState::Redirect(Route::Home)
        );
    }

    #[tokio::test]
    async fn failed_check_fails_closed() {
        for status in [FakeStatus::Unauthorized, FakeStatus::ServerDown] {
            let api = FakeAuth(status);
            assert!(!check_authenticated(&api).await);
            assert_eq!(
                resolve(Route::Releases, &api).await,
                GuardState::Redirect(Route::Login)
            );
            assert_eq!(resolve(Route::Register, &api).await, GuardState::Render);
        }
    }
}
