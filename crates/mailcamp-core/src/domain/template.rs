use crate::domain::ids::TemplateId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: TemplateId,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl EmailTemplate {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName("template"));
        }
        if self.subject.trim().is_empty() {
            return Err(CoreError::EmptySubject);
        }
        Ok(())
    }
}
