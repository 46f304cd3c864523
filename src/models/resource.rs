use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::file::format_file_size;
use crate::utils::errors::WorkflowError;

/// A course material listed in the resource center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Resource {
    pub id: u32,
    pub name: String,
    pub size_bytes: u64,
    pub size: String,
    pub published_on: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PublishResourceRequest {
    #[validate(length(min = 1, max = 128, message = "Resource name is required"))]
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceShelf {
    resources: Vec<Resource>,
}

impl ResourceShelf {
    pub fn list(&self) -> &[Resource] {
        &self.resources
    }

    pub fn publish(&mut self, name: &str, size_bytes: u64, published_on: NaiveDate) -> Result<&Resource, WorkflowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkflowError::validation("Resource name is required"));
        }

        let id = self.resources.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        self.resources.push(Resource {
            id,
            name: name.to_string(),
            size_bytes,
            size: format_file_size(size_bytes),
            published_on,
        });

        let index = self.resources.len() - 1;
        Ok(&self.resources[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishing_assigns_ids_and_size_labels() {
        let mut shelf = ResourceShelf::default();
        let day = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();

        shelf.publish("Survey methodology.pdf", 2_516_582, day).unwrap();
        let second = shelf.publish("Questionnaire template.docx", 1_153_434, day).unwrap();

        assert_eq!(second.id, 2);
        assert_eq!(second.size, "1.1 MB");
        assert_eq!(shelf.list()[0].size, "2.4 MB");
    }

    #[test]
    fn blank_names_are_refused() {
        let mut shelf = ResourceShelf::default();
        let day = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
        assert!(shelf.publish(" ", 10, day).is_err());
        assert!(shelf.list().is_empty());
    }
}
