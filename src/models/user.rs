use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::session::Role;
use crate::utils::errors::WorkflowError;

pub const DEFAULT_UPLOAD_LIMIT_MB: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminUserRecord {
    pub id: u64,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub upload_limit_mb: u32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub role: Option<Role>,
    pub upload_limit_mb: Option<u32>,
}

/// Full replacement of a record's editable fields.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub role: Role,
    pub upload_limit_mb: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteUserQuery {
    pub confirm: Option<bool>,
}

fn required(value: &str, field: &str) -> Result<String, WorkflowError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(WorkflowError::validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// In-memory user list behind the admin dashboard.
#[derive(Debug, Clone)]
pub struct UserRegistry {
    users: Vec<AdminUserRecord>,
    next_id: u64,
}

impl UserRegistry {
    pub fn new(users: Vec<AdminUserRecord>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        UserRegistry { users, next_id }
    }

    pub fn list(&self) -> &[AdminUserRecord] {
        &self.users
    }

    pub fn get(&self, id: u64) -> Option<&AdminUserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn add(&mut self, request: &CreateUserRequest) -> Result<&AdminUserRecord, WorkflowError> {
        let name = required(&request.name, "Name")?;
        let email = required(&request.email, "Email")?;

        let record = AdminUserRecord {
            id: self.next_id,
            name,
            role: request.role.unwrap_or(Role::Student),
            email,
            upload_limit_mb: request
                .upload_limit_mb
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_UPLOAD_LIMIT_MB),
        };
        self.next_id += 1;
        self.users.push(record);

        let index = self.users.len() - 1;
        Ok(&self.users[index])
    }

    pub fn update(&mut self, id: u64, request: &UpdateUserRequest) -> Result<&AdminUserRecord, WorkflowError> {
        let name = required(&request.name, "Name")?;
        let email = required(&request.email, "Email")?;

        let record = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| WorkflowError::not_found("User", id.to_string()))?;

        *record = AdminUserRecord {
            id,
            name,
            role: request.role,
            email,
            upload_limit_mb: request.upload_limit_mb,
        };
        Ok(&*record)
    }

    /// Removes a user. Nothing happens unless `confirmed` is set.
    pub fn delete(&mut self, id: u64, confirmed: bool) -> Result<AdminUserRecord, WorkflowError> {
        if !confirmed {
            return Err(WorkflowError::ConfirmationRequired);
        }

        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| WorkflowError::not_found("User", id.to_string()))?;
        Ok(self.users.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> UserRegistry {
        UserRegistry::new(vec![
            AdminUserRecord {
                id: 1,
                name: "Li Hua".into(),
                role: Role::Student,
                email: "lihua@uni.edu".into(),
                upload_limit_mb: 50,
            },
            AdminUserRecord {
                id: 2,
                name: "Prof. Zhang".into(),
                role: Role::Teacher,
                email: "zhang@uni.edu".into(),
                upload_limit_mb: 500,
            },
        ])
    }

    fn create(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.into(),
            email: email.into(),
            role: None,
            upload_limit_mb: None,
        }
    }

    #[test]
    fn new_users_get_defaults_and_fresh_ids() {
        let mut registry = registry();
        let first = registry.add(&create("Wang Qiang", "wang@uni.edu")).unwrap().clone();
        let second = registry.add(&create("Zhao Min", "zhao@uni.edu")).unwrap().clone();

        assert_eq!(first.id, 3);
        assert_eq!(second.id, 4);
        assert_eq!(first.role, Role::Student);
        assert_eq!(first.upload_limit_mb, DEFAULT_UPLOAD_LIMIT_MB);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut registry = registry();
        registry.delete(2, true).unwrap();
        let added = registry.add(&create("Zhao Min", "zhao@uni.edu")).unwrap();
        assert_eq!(added.id, 3);
    }

    #[test]
    fn name_and_email_are_required() {
        let mut registry = registry();
        assert!(registry.add(&create("  ", "a@uni.edu")).is_err());
        assert!(registry.add(&create("Zhao Min", "")).is_err());
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn edit_replaces_the_whole_record() {
        let mut registry = registry();
        let update = UpdateUserRequest {
            name: "Li Hua".into(),
            email: "li.hua@uni.edu".into(),
            role: Role::Teacher,
            upload_limit_mb: 200,
        };
        registry.update(1, &update).unwrap();

        let record = registry.get(1).unwrap();
        assert_eq!(record.role, Role::Teacher);
        assert_eq!(record.email, "li.hua@uni.edu");
        assert_eq!(record.upload_limit_mb, 200);
    }

    #[test]
    fn editing_a_missing_user_fails() {
        let mut registry = registry();
        let update = UpdateUserRequest {
            name: "Ghost".into(),
            email: "ghost@uni.edu".into(),
            role: Role::Admin,
            upload_limit_mb: 1,
        };
        assert!(matches!(
            registry.update(99, &update),
            Err(WorkflowError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut registry = registry();
        assert_eq!(registry.delete(1, false), Err(WorkflowError::ConfirmationRequired));
        assert!(registry.get(1).is_some());

        registry.delete(1, true).unwrap();
        assert!(registry.get(1).is_none());
    }

    #[test]
    fn request_validation_checks_email_shape() {
        assert!(create("Zhao Min", "not-an-email").validate().is_err());
        assert!(create("Zhao Min", "zhao@uni.edu").validate().is_ok());
    }
}
