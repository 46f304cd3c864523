use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The three dashboards a login can fan out into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Teacher,
    Student,
    Admin,
}

/// Every screen reachable from one of the role menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Publish,
    Upload,
    Grading,
    Insights,
    Tasks,
    Group,
    Resources,
    Query,
    Format,
    Users,
    Notifications,
    Profile,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Publish => "Publish assignment",
            View::Upload => "Upload materials",
            View::Grading => "Review & grading",
            View::Insights => "Teaching insights",
            View::Tasks => "Task center",
            View::Group => "My group",
            View::Resources => "Resource center",
            View::Query => "Submission lookup",
            View::Format => "Format check",
            View::Users => "User management",
            View::Notifications => "Reminders",
            View::Profile => "Profile",
        }
    }
}

impl Role {
    /// Sidebar entries, in display order.
    pub fn menu(self) -> &'static [View] {
        match self {
            Role::Teacher => &[View::Publish, View::Upload, View::Grading, View::Insights],
            Role::Student => &[
                View::Tasks,
                View::Group,
                View::Resources,
                View::Query,
                View::Format,
            ],
            Role::Admin => &[View::Users, View::Notifications],
        }
    }

    pub fn default_view(self) -> View {
        match self {
            Role::Teacher => View::Grading,
            Role::Student => View::Tasks,
            Role::Admin => View::Users,
        }
    }
}

/// Identity of whoever is behind a bearer token. Handed explicitly to every
/// workspace operation that needs to know who is acting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Session id
    pub name: String,
    pub role: Role,
    pub iat: usize, // Issued at (Unix timestamp)
}

impl Claims {
    pub fn session(&self) -> Option<Session> {
        let id = Uuid::parse_str(&self.sub).ok()?;
        Some(Session {
            id,
            name: self.name.clone(),
            role: self.role,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "Name is required"))]
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MenuItem {
    pub id: View,
    pub label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub session: Session,
    pub menu: Vec<MenuItem>,
    pub default_view: View,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        SessionResponse {
            session: session.clone(),
            menu: session
                .role
                .menu()
                .iter()
                .map(|view| MenuItem {
                    id: *view,
                    label: view.label().to_string(),
                })
                .collect(),
            default_view: session.role.default_view(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponseData {
    pub token: String,
    pub session: SessionResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_lands_on_a_view_from_its_own_menu() {
        for role in [Role::Teacher, Role::Student, Role::Admin] {
            assert!(role.menu().contains(&role.default_view()), "{:?}", role);
        }
    }

    #[test]
    fn claims_with_a_malformed_subject_yield_no_session() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            name: "Li Hua".to_string(),
            role: Role::Student,
            iat: 0,
        };
        assert!(claims.session().is_none());
    }

    #[test]
    fn session_response_lists_menu_labels() {
        let session = Session {
            id: Uuid::new_v4(),
            name: "Prof. Zhang".to_string(),
            role: Role::Teacher,
        };
        let response = SessionResponse::from(&session);
        assert_eq!(response.default_view, View::Grading);
        assert_eq!(response.menu.len(), 4);
        assert_eq!(response.menu[2].label, "Review & grading");
    }
}
