use actix_web::HttpRequest;
use metrics::counter;
use tracing::warn;

use contest_hub_domain::model::UserRole;
use contest_hub_domain::storage::UserStore;

use crate::handlers::ApiError;
use crate::state::AppState;

/// Identity the guard chain attaches to a request once it passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub email: String,
}

/// One predicate in an endpoint's guard chain. Rules run in the order they
/// are listed and the first failure decides the response.
#[derive(Debug, Clone, Copy)]
pub enum GuardRule<'a> {
    /// The bearer credential must verify with the identity provider.
    Authenticated,
    /// The verified email must match the given one. `None` passes, so an
    /// unfiltered listing stays reachable to any authenticated caller.
    OwnsEmail(Option<&'a str>),
    /// The verified email must belong to a registered admin. Callers without
    /// a user row count as plain users.
    Admin,
}

/// Pulls the bearer credential out of the `Authorization` header.
pub fn bearer_token(request: &HttpRequest) -> Option<&str> {
    request
        .headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Walks the rules in order and short-circuits on the first failure. A
/// missing or rejected credential reads as `Unauthenticated`; ownership and
/// role mismatches as `Forbidden`. Verification failures of any kind fail
/// closed.
pub async fn authorize(
    state: &AppState,
    token: Option<&str>,
    rules: &[GuardRule<'_>],
) -> Result<CallerIdentity, ApiError> {
    let mut caller: Option<CallerIdentity> = None;

    for rule in rules.iter().copied() {
        match rule {
            GuardRule::Authenticated => {
                let token = token.ok_or(ApiError::Unauthenticated)?;
                match state.identity().verify(token).await {
                    Ok(identity) => {
                        caller = Some(CallerIdentity {
                            email: identity.email,
                        });
                    }
                    Err(err) => {
                        warn!(error = %err, "bearer token verification failed");
                        counter!("api_guard_rejections_total", "rule" => "authenticated")
                            .increment(1);
                        return Err(ApiError::Unauthenticated);
                    }
                }
            }
            GuardRule::OwnsEmail(expected) => {
                let Some(expected) = expected else {
                    continue;
                };
                let identity = caller.as_ref().ok_or(ApiError::Unauthenticated)?;
                if identity.email != expected {
                    counter!("api_guard_rejections_total", "rule" => "ownership").increment(1);
                    return Err(ApiError::Forbidden);
                }
            }
            GuardRule::Admin => {
                let identity = caller.as_ref().ok_or(ApiError::Unauthenticated)?;
                let is_admin = state
                    .storage()
                    .find_user_by_email(&identity.email)
                    .await?
                    .map(|user| user.role == UserRole::Admin)
                    .unwrap_or(false);
                if !is_admin {
                    counter!("api_guard_rejections_total", "rule" => "admin").increment(1);
                    return Err(ApiError::Forbidden);
                }
            }
        }
    }

    caller.ok_or(ApiError::Unauthenticated)
}
