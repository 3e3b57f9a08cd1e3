use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer` scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /api/auth/login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Store Rating API",
        version = "0.1.0",
        description = "Register, browse and rate stores; owner dashboards; admin management"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/auth", api = domain_users::AuthApiDoc),
        (path = "/admin", api = domain_users::AdminUsersApiDoc),
        (path = "/admin", api = domain_stores::AdminStoresApiDoc),
        (path = "/user", api = domain_users::AccountApiDoc),
        (path = "/user", api = domain_stores::UserStoresApiDoc),
        (path = "/store", api = domain_stores::OwnerApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/auth/register",
            "/auth/login",
            "/admin/users",
            "/admin/users/{id}",
            "/admin/stores",
            "/admin/stores/{id}/owner",
            "/admin/dashboard",
            "/user/password",
            "/user/stores",
            "/user/rating",
            "/store/dashboard",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
