use crate::common::User;

/// Danh sách người dùng đang online. Tầng mạng là nguồn sự thật:
/// mỗi snapshot thay thế toàn bộ danh sách cũ.
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    users: Vec<User>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_snapshot(&mut self, users: Vec<User>) {
        self.users = users;
    }

    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.users.iter().any(|user| user.id == id)
    }

    pub fn contains_username(&self, username: &str) -> bool {
        self.users.iter().any(|user| user.username == username)
    }
}
