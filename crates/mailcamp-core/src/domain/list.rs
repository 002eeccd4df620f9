use crate::domain::ids::ContactListId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
    pub id: ContactListId,
    pub name: String,
    pub description: String,
    pub created_at: i64,
}
