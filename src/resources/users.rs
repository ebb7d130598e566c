//! Admin user management
//!
//! Creation goes through the registration endpoint (issued with the admin's
//! bearer, the returned tokens for the new account are discarded) and
//! updates use PATCH, so these operations sit beside the generic controller
//! instead of its submit path. Listing and deletion reuse it.

use reqwest::Method;

use placetrack_protocol::{
    RegisterRequest, RegisterResponse, Role, UserAccount, UserUpdate, VerifyUserResponse,
};
use validator::Validate;

use crate::client::ApiClient;
use crate::error::Result;
use crate::resource::{contains_ci, Filter, Resource};

impl Resource for UserAccount {
    type Draft = UserUpdate;
    const COLLECTION: &'static str = "/auth/users/";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Client-side filter state for the user management list.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: String,
    pub role: Option<Role>,
}

impl Filter<UserAccount> for UserFilter {
    fn matches(&self, user: &UserAccount) -> bool {
        let matches_search = self.search.is_empty()
            || contains_ci(&user.username, &self.search)
            || contains_ci(&user.email, &self.search)
            || contains_ci(&user.first_name, &self.search)
            || contains_ci(&user.last_name, &self.search);

        let matches_role = self.role.map_or(true, |r| user.role == r);

        matches_search && matches_role
    }
}

/// The management view shows staff accounts only, not student logins.
pub fn admin_faculty(users: &[UserAccount]) -> Vec<&UserAccount> {
    users.iter().filter(|u| u.role == Role::Admin).collect()
}

/// Create an account on behalf of an admin. The new account's tokens in
/// the response are ignored; the admin's own session is untouched.
pub async fn create<C: ApiClient>(client: &C, request: &RegisterRequest) -> Result<UserAccount> {
    request.validate()?;
    let response: RegisterResponse = client
        .request(Method::POST, "/auth/register/", Some(request))
        .await?;
    response
        .user
        .ok_or_else(|| crate::error::TrackError::invalid_response("registration response carried no user"))
}

pub async fn update<C: ApiClient>(
    client: &C,
    user_id: i64,
    update: &UserUpdate,
) -> Result<UserAccount> {
    client
        .request(
            Method::PATCH,
            &format!("/auth/users/{}/", user_id),
            Some(update),
        )
        .await
}

pub async fn verify<C: ApiClient>(client: &C, user_id: i64) -> Result<VerifyUserResponse> {
    client
        .request(
            Method::POST,
            &format!("/auth/users/{}/verify/", user_id),
            None::<&()>,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::apply_filters;

    fn user(id: i64, username: &str, role: Role) -> UserAccount {
        UserAccount {
            id,
            username: username.to_string(),
            email: format!("{}@example.edu", username),
            first_name: String::new(),
            last_name: String::new(),
            role,
            phone: String::new(),
            profile_picture: None,
            is_verified: true,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn staff_listing_excludes_students() {
        let users = vec![
            user(1, "tpo.office", Role::Admin),
            user(2, "cs2021042", Role::Student),
            user(3, "nimbus.hr", Role::Company),
        ];
        let staff = admin_faculty(&users);
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].username, "tpo.office");
    }

    #[test]
    fn search_and_role_filter() {
        let users = vec![
            user(1, "tpo.office", Role::Admin),
            user(2, "dean.office", Role::Admin),
        ];

        let filter = UserFilter {
            search: "dean".to_string(),
            role: Some(Role::Admin),
        };
        let hits = apply_filters(&users, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }
}
