//! Todo entity.

use chrono::{DateTime, Utc};

/// A todo item owned by a single user.
#[derive(Debug, Clone)]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: i64,
    pub title: String,
    pub description: String,
}

/// Replacement values for an existing todo.
#[derive(Debug, Clone)]
pub struct TodoPatch {
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owned_by() {
        let todo = Todo {
            id: 3,
            user_id: 7,
            title: "Buy milk".to_string(),
            description: "Two litres".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(todo.is_owned_by(7));
        assert!(!todo.is_owned_by(8));
    }
}
